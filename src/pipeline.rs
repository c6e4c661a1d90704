//! End-to-end analysis pipeline.
//!
//! Wires the stages in their fixed order: normalize → forecast →
//! {anomalies, metrics} → insights → report. Each run is an independent
//! unit of work owning its inputs and intermediates; nothing is shared
//! across requests.

use serde::Serialize;

use crate::analytics::{detect_anomalies, recommendations, synthesize_insights, AccuracyMetrics};
use crate::analytics::insight::InsightInputs;
use crate::domain::{Anomaly, ForecastConfig, ForecastResult, Series, SeverityPolicy};
use crate::error::PipelineError;
use crate::forecast::ForecastEngine;
use crate::ingest::{normalize, Frame};
use crate::report::{build_report, ReportBundle, ReportPolicy};

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub series: Series,
    pub forecast: ForecastResult,
    pub anomalies: Vec<Anomaly>,
    pub metrics: AccuracyMetrics,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub report: ReportBundle,
}

pub struct Pipeline {
    engine: ForecastEngine,
    severity_policy: SeverityPolicy,
    report_policy: ReportPolicy,
}

impl Pipeline {
    pub fn new(
        engine: ForecastEngine,
        severity_policy: SeverityPolicy,
        report_policy: ReportPolicy,
    ) -> Self {
        Self { engine, severity_policy, report_policy }
    }

    /// Normalize a raw frame and analyze the resulting series.
    pub fn analyze_frame(
        &self,
        frame: &Frame,
        config: &ForecastConfig,
    ) -> Result<Analysis, PipelineError> {
        let series = normalize(frame)?;
        self.analyze(series, config)
    }

    /// Analyze an already-normalized series.
    pub fn analyze(
        &self,
        series: Series,
        config: &ForecastConfig,
    ) -> Result<Analysis, PipelineError> {
        let forecast = self.engine.run(&series, config)?;

        let historical = forecast.historical_overlap(&series);
        let anomalies = detect_anomalies(&series, &historical, &self.severity_policy);

        let pairs = join_actual_predicted(&series, &historical);
        let metrics = AccuracyMetrics::compute(pairs);

        let inputs = InsightInputs { forecast: &forecast, anomalies: &anomalies, series: &series };
        let insights = synthesize_insights(&inputs);
        let recs = recommendations(&inputs);

        let report = build_report(
            &metrics,
            insights.clone(),
            recs.clone(),
            &anomalies,
            &self.report_policy,
        );

        Ok(Analysis {
            series,
            forecast,
            anomalies,
            metrics,
            insights,
            recommendations: recs,
            report,
        })
    }
}

/// Index-align actuals with retrodicted estimates on timestamp.
fn join_actual_predicted(
    series: &Series,
    historical: &[crate::domain::ForecastPoint],
) -> Vec<(f64, f64)> {
    use std::collections::HashMap;

    let by_day: HashMap<chrono::NaiveDate, f64> = historical
        .iter()
        .map(|p| (p.timestamp, p.point_estimate))
        .collect();

    series
        .iter()
        .filter_map(|o| by_day.get(&o.timestamp).map(|p| (o.value, *p)))
        .collect()
}
