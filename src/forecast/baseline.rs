//! Built-in deterministic oracle.
//!
//! A least-squares trend plus optional weekly/yearly seasonal means, with
//! uncertainty bounds from the spread of in-sample residuals. It exists so
//! the service runs stand-alone; any heavier model can replace it behind
//! [`ForecastOracle`](super::oracle::ForecastOracle) without touching the
//! pipeline.

use anyhow::{bail, Result};
use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{ForecastConfig, ForecastPoint, GrowthMode, SeasonalityMode, Series};

use super::oracle::ForecastOracle;

// z-score for a ~95% interval, matching the model's default band width.
const INTERVAL_Z: f64 = 1.96;

#[derive(Debug, Default)]
pub struct BaselineOracle;

impl ForecastOracle for BaselineOracle {
    fn forecast(&self, series: &Series, config: &ForecastConfig) -> Result<Vec<ForecastPoint>> {
        if series.is_empty() {
            bail!("cannot fit on an empty series");
        }
        let model = Fitted::fit(series, config);
        let first = series.observations()[0].timestamp;
        let last = series.last_timestamp().unwrap_or(first);

        let mut points = Vec::with_capacity(series.len() + config.horizon_days as usize);
        for obs in series.iter() {
            points.push(model.predict(first, obs.timestamp));
        }
        for day in 1..=config.horizon_days {
            points.push(model.predict(first, last + Duration::days(day as i64)));
        }
        Ok(points)
    }
}

struct Fitted {
    intercept: f64,
    slope: f64,
    mode: SeasonalityMode,
    weekly: Option<[f64; 7]>,
    yearly: Option<[f64; 12]>,
    margin: f64,
}

impl Fitted {
    fn fit(series: &Series, config: &ForecastConfig) -> Self {
        let first = series.observations()[0].timestamp;
        let xs: Vec<f64> = series
            .iter()
            .map(|o| (o.timestamp - first).num_days() as f64)
            .collect();
        let ys: Vec<f64> = series.values().collect();

        let (intercept, slope) = match config.growth {
            GrowthMode::Linear => least_squares(&xs, &ys),
            GrowthMode::Flat => (mean(&ys), 0.0),
        };

        let span_days = (series.last_timestamp().unwrap_or(first) - first).num_days();
        let use_weekly = config.weekly_seasonality.resolve(span_days >= 14);
        let use_yearly = config.yearly_seasonality.resolve(span_days >= 730);
        let mode = config.seasonality_mode;

        let trend_at = |x: f64| intercept + slope * x;

        let weekly: Option<[f64; 7]> = use_weekly.then(|| {
            seasonal_means(
                series.iter().zip(&xs).map(|(o, &x)| {
                    (o.timestamp.weekday().num_days_from_monday() as usize, o.value, trend_at(x))
                }),
                mode,
            )
        });
        let yearly: Option<[f64; 12]> = use_yearly.then(|| {
            seasonal_means(
                series.iter().zip(&xs).map(|(o, &x)| {
                    (o.timestamp.month0() as usize, o.value, trend_at(x))
                }),
                mode,
            )
        });

        let partial = Self { intercept, slope, mode, weekly, yearly, margin: 0.0 };
        let residuals: Vec<f64> = series
            .iter()
            .zip(&xs)
            .map(|(o, &x)| o.value - partial.estimate(x, o.timestamp))
            .collect();
        let margin = INTERVAL_Z * std_dev(&residuals);

        Self { margin, ..partial }
    }

    fn estimate(&self, x: f64, date: NaiveDate) -> f64 {
        let trend = self.intercept + self.slope * x;
        let weekly = self
            .weekly
            .map(|w| w[date.weekday().num_days_from_monday() as usize]);
        let yearly = self.yearly.map(|y| y[date.month0() as usize]);

        match self.mode {
            SeasonalityMode::Additive => {
                trend + weekly.unwrap_or(0.0) + yearly.unwrap_or(0.0)
            }
            SeasonalityMode::Multiplicative => {
                trend * weekly.unwrap_or(1.0) * yearly.unwrap_or(1.0)
            }
        }
    }

    fn predict(&self, first: NaiveDate, date: NaiveDate) -> ForecastPoint {
        let x = (date - first).num_days() as f64;
        let point_estimate = self.estimate(x, date);
        ForecastPoint {
            timestamp: date,
            point_estimate,
            lower_bound: point_estimate - self.margin,
            upper_bound: point_estimate + self.margin,
        }
    }
}

/// Per-bucket mean deviation from trend: additive offsets or multiplicative
/// factors. Buckets without samples stay neutral.
fn seasonal_means<const N: usize>(
    samples: impl Iterator<Item = (usize, f64, f64)>,
    mode: SeasonalityMode,
) -> [f64; N] {
    let neutral = match mode {
        SeasonalityMode::Additive => 0.0,
        SeasonalityMode::Multiplicative => 1.0,
    };
    let mut sums = [0.0; N];
    let mut counts = [0usize; N];
    for (bucket, value, trend) in samples {
        let dev = match mode {
            SeasonalityMode::Additive => value - trend,
            SeasonalityMode::Multiplicative => {
                if trend.abs() < 1e-9 {
                    continue;
                }
                value / trend
            }
        };
        sums[bucket] += dev;
        counts[bucket] += 1;
    }

    let mut out = [neutral; N];
    for i in 0..N {
        if counts[i] > 0 {
            out[i] = sums[i] / counts[i] as f64;
        }
    }
    out
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

fn least_squares(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let mx = mean(xs);
    let my = mean(ys);
    let sxx: f64 = xs.iter().map(|x| (x - mx).powi(2)).sum();
    if n < 2.0 || sxx < 1e-12 {
        return (my, 0.0);
    }
    let sxy: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let slope = sxy / sxx;
    (my - slope * mx, slope)
}
