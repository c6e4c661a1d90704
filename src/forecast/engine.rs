use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::domain::{ForecastConfig, ForecastResult, Observation, Series};
use crate::error::PipelineError;

use super::oracle::ForecastOracle;

/// Owns the contract with the forecasting oracle: input validation, the
/// duplicate-timestamp policy, the oracle call, and partitioning of the
/// returned points.
pub struct ForecastEngine {
    oracle: Box<dyn ForecastOracle>,
}

impl ForecastEngine {
    pub fn new(oracle: Box<dyn ForecastOracle>) -> Self {
        Self { oracle }
    }

    /// Run fit+predict over the series.
    ///
    /// Duplicate timestamps resolve last-wins before the oracle sees the
    /// data; the normalizer deliberately passes them through. Oracle
    /// failures are opaque and terminal for the request.
    pub fn run(
        &self,
        series: &Series,
        config: &ForecastConfig,
    ) -> Result<ForecastResult, PipelineError> {
        if config.horizon_days == 0 {
            return Err(PipelineError::InvalidHorizon);
        }
        let deduped = dedup_last_wins(series);
        let Some(last_observed) = deduped.last_timestamp() else {
            return Err(PipelineError::EmptySeries);
        };

        if deduped.len() < series.len() {
            warn!(
                dropped = series.len() - deduped.len(),
                "duplicate timestamps in input, keeping last occurrence"
            );
        }

        let points = self
            .oracle
            .forecast(&deduped, config)
            .map_err(PipelineError::Oracle)?;

        info!(
            observations = deduped.len(),
            points = points.len(),
            horizon_days = config.horizon_days,
            "forecast complete"
        );

        Ok(ForecastResult::new(points, last_observed))
    }
}

/// Last occurrence wins per calendar day; output stays ascending.
fn dedup_last_wins(series: &Series) -> Series {
    let mut by_day = BTreeMap::new();
    for obs in series.iter() {
        by_day.insert(obs.timestamp, obs.value);
    }
    Series::new(
        by_day
            .into_iter()
            .map(|(timestamp, value)| Observation { timestamp, value })
            .collect(),
    )
}
