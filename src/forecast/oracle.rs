use anyhow::Result;

use crate::domain::{ForecastConfig, ForecastPoint, Series};

/// The external trend/seasonality forecasting model, as a pure function
/// boundary.
///
/// Given the observed series and a configuration, the oracle returns one
/// point per timestamp covering the full history span plus
/// `config.horizon_days` beyond the last observation, each with a point
/// estimate and a lower/upper uncertainty bound satisfying
/// `lower <= point <= upper`.
///
/// Fit+predict is blocking CPU work; async callers wrap the invocation in
/// `spawn_blocking`. Implementations must tolerate duplicate-free input
/// only: the engine deduplicates before calling.
pub trait ForecastOracle: Send + Sync {
    fn forecast(&self, series: &Series, config: &ForecastConfig) -> Result<Vec<ForecastPoint>>;
}
