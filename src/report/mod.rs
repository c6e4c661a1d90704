//! Report aggregation.
//!
//! Assembles metrics, narrative paragraphs and ranked anomalies into the
//! renderer-agnostic bundle the document engine consumes. Layout and
//! pagination stay on the renderer's side of the boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analytics::AccuracyMetrics;
use crate::domain::{Anomaly, SeverityLevel};

/// Aggregation policy: headline threshold and table depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportPolicy {
    /// Model confidence (100 - MAPE) above this reads "Optimal".
    pub confidence_optimal_pct: f64,
    /// MAPE below this reads "Acceptable".
    pub mape_acceptable_pct: f64,
    /// Rows in the top-anomaly table.
    pub top_anomaly_limit: usize,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            confidence_optimal_pct: 85.0,
            mape_acceptable_pct: 15.0,
            top_anomaly_limit: 10,
        }
    }
}

/// One row of the model-performance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub metric: String,
    pub value: String,
    pub status: String,
}

/// Anomaly counts bucketed by severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnomalySummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// One row of the top-anomaly table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRow {
    pub priority: String,
    pub date: NaiveDate,
    pub actual: f64,
    pub forecast: f64,
    /// Severity relative to the forecast, in percent. Zero when the
    /// forecast itself is zero.
    pub variance_pct: f64,
}

/// The structured handoff to the document renderer. Created fresh per
/// request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub metrics_table: Vec<MetricRow>,
    pub insight_paragraphs: Vec<String>,
    pub recommendation_paragraphs: Vec<String>,
    pub anomaly_summary: AnomalySummary,
    pub anomaly_table: Vec<AnomalyRow>,
}

/// Assemble the bundle. Insights keep their category order; anomalies rank
/// by severity descending with ties resolved by original order.
pub fn build_report(
    metrics: &AccuracyMetrics,
    insights: Vec<String>,
    recommendations: Vec<String>,
    anomalies: &[Anomaly],
    policy: &ReportPolicy,
) -> ReportBundle {
    ReportBundle {
        metrics_table: metrics_table(metrics, policy),
        insight_paragraphs: insights,
        recommendation_paragraphs: recommendations,
        anomaly_summary: summarize(anomalies),
        anomaly_table: top_anomalies(anomalies, policy.top_anomaly_limit),
    }
}

fn metrics_table(metrics: &AccuracyMetrics, policy: &ReportPolicy) -> Vec<MetricRow> {
    let confidence = 100.0 - metrics.mape;
    vec![
        MetricRow {
            metric: "Model Confidence".to_string(),
            value: format!("{confidence:.1}%"),
            status: if confidence > policy.confidence_optimal_pct {
                "Optimal".to_string()
            } else {
                "Review Required".to_string()
            },
        },
        MetricRow {
            metric: "Relative Error (MAPE)".to_string(),
            value: format!("{:.1}%", metrics.mape),
            status: if metrics.mape < policy.mape_acceptable_pct {
                "Acceptable".to_string()
            } else {
                "Variable".to_string()
            },
        },
        MetricRow {
            metric: "Root Mean Sq Error".to_string(),
            value: format!("{:.4}", metrics.rmse),
            status: "N/A".to_string(),
        },
    ]
}

fn summarize(anomalies: &[Anomaly]) -> AnomalySummary {
    let mut summary = AnomalySummary { total: anomalies.len(), ..Default::default() };
    for a in anomalies {
        match a.severity_level {
            SeverityLevel::High => summary.high += 1,
            SeverityLevel::Medium => summary.medium += 1,
            SeverityLevel::Low => summary.low += 1,
        }
    }
    summary
}

fn top_anomalies(anomalies: &[Anomaly], limit: usize) -> Vec<AnomalyRow> {
    let mut ranked: Vec<&Anomaly> = anomalies.iter().collect();
    // Stable sort: equal severities keep their input (timestamp) order.
    ranked.sort_by(|a, b| b.severity.total_cmp(&a.severity));
    ranked
        .into_iter()
        .take(limit)
        .map(|a| AnomalyRow {
            priority: a.severity_level.to_string(),
            date: a.timestamp,
            actual: a.actual,
            forecast: a.predicted,
            variance_pct: if a.predicted == 0.0 {
                0.0
            } else {
                a.severity / a.predicted.abs() * 100.0
            },
        })
        .collect()
}
