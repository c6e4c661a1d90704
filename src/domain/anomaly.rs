use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Severity tier for a detected anomaly. Used only by reporting, never by
/// detection itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Threshold table for severity bucketing, relative to the point estimate.
///
/// The deviation ratio is `severity / max(|predicted|, epsilon)`. Ratios at
/// or above `high_ratio` classify High, at or above `medium_ratio` Medium,
/// anything below Low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityPolicy {
    pub medium_ratio: f64,
    pub high_ratio: f64,
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self { medium_ratio: 0.10, high_ratio: 0.25 }
    }
}

impl SeverityPolicy {
    pub fn classify(&self, severity: f64, predicted: f64) -> SeverityLevel {
        let ratio = severity / predicted.abs().max(1e-9);
        if ratio >= self.high_ratio {
            SeverityLevel::High
        } else if ratio >= self.medium_ratio {
            SeverityLevel::Medium
        } else {
            SeverityLevel::Low
        }
    }
}

/// A historical observation that fell strictly outside the oracle's
/// uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub timestamp: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Absolute deviation from the point estimate, not from the violated
    /// bound.
    pub severity: f64,
    pub severity_level: SeverityLevel,
}
