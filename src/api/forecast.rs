use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{error::ApiError, response::ApiResponse, AppState};
use crate::domain::{
    Anomaly, ForecastConfig, ForecastPoint, GrowthMode, SeasonalityMode, SeasonalityToggle,
};
use crate::analytics::AccuracyMetrics;
use crate::ingest::Frame;
use crate::pipeline::Analysis;
use crate::report::ReportBundle;

/// Query parameters for a forecast request. Anything omitted falls back to
/// the configured defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastParams {
    pub days: Option<u32>,
    pub seasonality_mode: Option<SeasonalityMode>,
    pub growth: Option<GrowthMode>,
    pub daily_seasonality: Option<SeasonalityToggle>,
    pub weekly_seasonality: Option<SeasonalityToggle>,
    pub yearly_seasonality: Option<SeasonalityToggle>,
    pub uncertainty_samples: Option<u32>,
}

impl ForecastParams {
    fn into_config(self, defaults: &crate::config::ForecastDefaults) -> ForecastConfig {
        ForecastConfig {
            horizon_days: self.days.unwrap_or(defaults.horizon_days),
            seasonality_mode: self.seasonality_mode.unwrap_or_default(),
            growth: self.growth.unwrap_or_default(),
            daily_seasonality: self.daily_seasonality.unwrap_or_default(),
            weekly_seasonality: self.weekly_seasonality.unwrap_or_default(),
            yearly_seasonality: self.yearly_seasonality.unwrap_or_default(),
            uncertainty_samples: self.uncertainty_samples.unwrap_or(defaults.uncertainty_samples),
        }
    }
}

/// Parameters echoed back with the result.
#[derive(Debug, Serialize)]
pub struct EchoedParameters {
    pub seasonality_mode: SeasonalityMode,
    pub growth: GrowthMode,
    pub horizon_days: u32,
}

/// Full forecast payload: the horizon projection plus the decision-ready
/// analytics around it.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub message: String,
    pub parameters: EchoedParameters,
    /// Forecast points for the requested horizon only.
    pub data: Vec<ForecastPoint>,
    pub metrics: AccuracyMetrics,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub anomalies: Vec<Anomaly>,
    pub report: ReportBundle,
}

/// POST /api/v1/forecast - run the full analysis pipeline over a CSV body.
pub async fn create_forecast(
    State(state): State<AppState>,
    Query(params): Query<ForecastParams>,
    body: String,
) -> Result<Json<ApiResponse<ForecastResponse>>, ApiError> {
    let config = params.into_config(&state.defaults);
    let pipeline = state.pipeline.clone();

    // Fit+predict is blocking CPU work; keep it off the async workers.
    let task_config = config.clone();
    let analysis: Analysis = tokio::task::spawn_blocking(move || {
        let frame = Frame::from_csv(body.as_bytes())
            .map_err(|e| ApiError::BadRequest(format!("failed to read CSV: {e}")))?;
        pipeline
            .analyze_frame(&frame, &task_config)
            .map_err(ApiError::from)
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("forecast task failed: {e}")))??;

    let horizon = analysis.forecast.future();
    let response = ForecastResponse {
        message: format!("Forecast generated for next {} days", config.horizon_days),
        parameters: EchoedParameters {
            seasonality_mode: config.seasonality_mode,
            growth: config.growth,
            horizon_days: config.horizon_days,
        },
        data: horizon,
        metrics: analysis.metrics,
        insights: analysis.insights,
        recommendations: analysis.recommendations,
        anomalies: analysis.anomalies,
        report: analysis.report,
    };

    Ok(Json(ApiResponse::success(response)))
}
