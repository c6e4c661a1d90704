use serde::{Deserialize, Serialize};
use std::fmt;

/// Forecast accuracy over the historical overlap. Frozen after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error, rounded to 4 decimals.
    pub mae: f64,
    /// Root Mean Square Error, rounded to 4 decimals.
    pub rmse: f64,
    /// Mean Absolute Percentage Error (%), rounded to 2 decimals.
    pub mape: f64,
}

impl AccuracyMetrics {
    /// Compute metrics from index-aligned (actual, predicted) pairs.
    ///
    /// Pairs with a non-finite side are dropped first. Zero surviving pairs
    /// is a defined degenerate case, not an error: all metrics are 0.
    ///
    /// A MAPE that comes out non-finite (zero actuals in the input)
    /// collapses to 0.0 instead of propagating NaN/infinity. Crude, but it
    /// keeps the report renderable; a known accuracy limitation.
    pub fn compute(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let valid: Vec<(f64, f64)> = pairs
            .into_iter()
            .filter(|(a, p)| a.is_finite() && p.is_finite())
            .collect();

        if valid.is_empty() {
            return Self { mae: 0.0, rmse: 0.0, mape: 0.0 };
        }

        let n = valid.len() as f64;
        let mae = valid.iter().map(|(a, p)| (a - p).abs()).sum::<f64>() / n;
        let mse = valid.iter().map(|(a, p)| (a - p).powi(2)).sum::<f64>() / n;
        let rmse = mse.sqrt();

        let mape_raw = valid.iter().map(|(a, p)| ((a - p) / a).abs()).sum::<f64>() / n * 100.0;
        let mape = if mape_raw.is_finite() { mape_raw } else { 0.0 };

        Self {
            mae: round_to(mae, 4),
            rmse: round_to(rmse, 4),
            mape: round_to(mape, 2),
        }
    }
}

impl fmt::Display for AccuracyMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAE={:.4}, RMSE={:.4}, MAPE={:.2}%", self.mae, self.rmse, self.mape)
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
