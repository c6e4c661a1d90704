use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};

use super::series::Series;

/// How seasonal components combine with the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeasonalityMode {
    #[default]
    Additive,
    Multiplicative,
}

/// Trend growth assumption handed to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GrowthMode {
    #[default]
    Linear,
    Flat,
}

/// Tri-state seasonality toggle: let the oracle decide, or force on/off.
///
/// The wire format also accepts the plain boolean spellings (`true`/`false`)
/// that older clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SeasonalityToggle {
    #[default]
    Auto,
    #[serde(alias = "true")]
    #[strum(to_string = "on", serialize = "true")]
    On,
    #[serde(alias = "false")]
    #[strum(to_string = "off", serialize = "false")]
    Off,
}

impl SeasonalityToggle {
    /// Resolve against what the oracle would pick automatically.
    pub fn resolve(&self, auto_default: bool) -> bool {
        match self {
            Self::Auto => auto_default,
            Self::On => true,
            Self::Off => false,
        }
    }
}

/// Immutable per-request forecast configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Days to project beyond the last observed timestamp. Must be > 0.
    pub horizon_days: u32,
    pub seasonality_mode: SeasonalityMode,
    pub growth: GrowthMode,
    pub daily_seasonality: SeasonalityToggle,
    pub weekly_seasonality: SeasonalityToggle,
    pub yearly_seasonality: SeasonalityToggle,
    /// Uncertainty-sample count. Lowered from the model's high-fidelity
    /// default to keep request latency acceptable.
    pub uncertainty_samples: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            seasonality_mode: SeasonalityMode::Additive,
            growth: GrowthMode::Linear,
            daily_seasonality: SeasonalityToggle::Auto,
            weekly_seasonality: SeasonalityToggle::Auto,
            yearly_seasonality: SeasonalityToggle::Auto,
            uncertainty_samples: 300,
        }
    }
}

/// One predicted timestamp with its uncertainty band.
///
/// Invariant: `lower_bound <= point_estimate <= upper_bound`. Produced only
/// by the oracle; the pipeline reads these values and never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Oracle output covering the full history span plus the horizon, ascending
/// by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    last_observed: NaiveDate,
}

impl ForecastResult {
    pub fn new(points: Vec<ForecastPoint>, last_observed: NaiveDate) -> Self {
        Self { points, last_observed }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn last_observed(&self) -> NaiveDate {
        self.last_observed
    }

    /// Last point overall (historical or future), used by the confidence
    /// insight.
    pub fn last_point(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }

    /// Points whose timestamps appear in the input series. Feeds the anomaly
    /// detector and the metrics calculator.
    pub fn historical_overlap(&self, series: &Series) -> Vec<ForecastPoint> {
        let observed: HashSet<NaiveDate> = series.iter().map(|o| o.timestamp).collect();
        self.points
            .iter()
            .filter(|p| observed.contains(&p.timestamp))
            .copied()
            .collect()
    }

    /// Points strictly after the last observed timestamp. Feeds the peak
    /// insight and the API's horizon payload.
    pub fn future(&self) -> Vec<ForecastPoint> {
        self.points
            .iter()
            .filter(|p| p.timestamp > self.last_observed)
            .copied()
            .collect()
    }
}
