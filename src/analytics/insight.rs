//! Rule-based narrative synthesis.
//!
//! Each analytical category is one independent predicate→template rule.
//! Categories run in a fixed order (trend, peak, volatility, confidence)
//! and each contributes at most one statement, so the output ranking is the
//! category precedence. Pure string assembly: deterministic, no I/O.

use chrono::Duration;

use crate::domain::{Anomaly, ForecastResult, Series};

const RECENT_WINDOW_DAYS: i64 = 30;
const HIGH_CONFIDENCE_SPREAD_PCT: f64 = 15.0;

/// Everything a rule may look at.
pub struct InsightInputs<'a> {
    pub forecast: &'a ForecastResult,
    pub anomalies: &'a [Anomaly],
    pub series: &'a Series,
}

type Rule = fn(&InsightInputs) -> Option<String>;

const RULES: [Rule; 4] = [trend_rule, peak_rule, volatility_rule, confidence_rule];

/// Run every rule in category order, collecting the statements that fire.
pub fn synthesize_insights(inputs: &InsightInputs) -> Vec<String> {
    RULES.iter().filter_map(|rule| rule(inputs)).collect()
}

/// Direction and magnitude of the projected change, measured from the last
/// observed value to the last future estimate. Skipped when the last actual
/// is zero: the relative change is undefined there.
fn trend_rule(inputs: &InsightInputs) -> Option<String> {
    let last_actual = inputs.series.last()?.value;
    if last_actual == 0.0 {
        return None;
    }
    let last_future = inputs.forecast.future().last().copied()?;
    let trend_pct = (last_future.point_estimate - last_actual) / last_actual * 100.0;

    let intensity = match trend_pct.abs() {
        m if m > 10.0 => "Significant",
        m if m > 3.0 => "Moderate",
        _ => "Minimal",
    };
    // Growth only for a strictly positive change; a dead-flat projection
    // reads as decline, not growth.
    let (direction, relation) = if trend_pct > 0.0 {
        ("growth", "above")
    } else {
        ("decline", "below")
    };

    Some(format!(
        "{intensity} {direction} trend: the forecast ends {:.1}% {relation} the last observed value.",
        trend_pct.abs()
    ))
}

/// Maximum point estimate among strictly-future points. Skipped when the
/// horizon produced nothing, or when the projection never rises above the
/// last observed value (a flat forecast has no peak worth reporting).
fn peak_rule(inputs: &InsightInputs) -> Option<String> {
    let future = inputs.forecast.future();
    let peak = future
        .iter()
        .max_by(|a, b| a.point_estimate.total_cmp(&b.point_estimate))?;
    if let Some(last) = inputs.series.last() {
        if peak.point_estimate <= last.value {
            return None;
        }
    }

    Some(format!(
        "Projected peak of {:.2} expected on {}.",
        peak.point_estimate, peak.timestamp
    ))
}

/// Anomaly recency against a 30-day cutoff before the end of history.
/// Silent when no anomalies exist at all.
fn volatility_rule(inputs: &InsightInputs) -> Option<String> {
    if inputs.anomalies.is_empty() {
        return None;
    }
    let cutoff = inputs.series.last_timestamp()? - Duration::days(RECENT_WINDOW_DAYS);
    let recent = inputs
        .anomalies
        .iter()
        .filter(|a| a.timestamp > cutoff)
        .count();

    Some(if recent > 0 {
        format!(
            "Recent volatility: {recent} anomal{} detected within the last {RECENT_WINDOW_DAYS} days of history.",
            if recent == 1 { "y" } else { "ies" }
        )
    } else {
        format!(
            "Historical stability: all {} anomal{} predate the last {RECENT_WINDOW_DAYS} days of history.",
            inputs.anomalies.len(),
            if inputs.anomalies.len() == 1 { "y" } else { "ies" }
        )
    })
}

/// Width of the uncertainty band at the very last forecast point, relative
/// to its estimate. Skipped when that estimate is zero.
fn confidence_rule(inputs: &InsightInputs) -> Option<String> {
    let last = inputs.forecast.last_point()?;
    if last.point_estimate == 0.0 {
        return None;
    }
    let spread = (last.upper_bound - last.lower_bound) / last.point_estimate * 100.0;

    Some(if spread < HIGH_CONFIDENCE_SPREAD_PCT {
        format!(
            "High confidence: the uncertainty interval spans only {spread:.1}% of the projected value at the horizon."
        )
    } else {
        format!(
            "Variable forecast: the uncertainty interval spans {spread:.1}% of the projected value at the horizon."
        )
    })
}

/// Action statements paired with the findings. Optional in the report; an
/// empty list means nothing warranted a recommendation.
pub fn recommendations(inputs: &InsightInputs) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(last) = inputs.series.last() {
        if last.value != 0.0 {
            if let Some(future_last) = inputs.forecast.future().last().copied() {
                let trend_pct = (future_last.point_estimate - last.value) / last.value * 100.0;
                if trend_pct < -3.0 {
                    out.push(
                        "Investigate drivers of the projected decline and prepare mitigation before it materializes."
                            .to_string(),
                    );
                }
            }
        }
    }

    if let Some(cutoff) = inputs
        .series
        .last_timestamp()
        .map(|t| t - Duration::days(RECENT_WINDOW_DAYS))
    {
        let recent = inputs
            .anomalies
            .iter()
            .filter(|a| a.timestamp > cutoff)
            .count();
        if recent > 0 {
            out.push(format!(
                "Review operational events behind the {recent} recent anomal{}; fresh irregularities degrade forecast reliability.",
                if recent == 1 { "y" } else { "ies" }
            ));
        }
    }

    if let Some(last) = inputs.forecast.last_point() {
        if last.point_estimate != 0.0 {
            let spread = (last.upper_bound - last.lower_bound) / last.point_estimate * 100.0;
            if spread >= HIGH_CONFIDENCE_SPREAD_PCT {
                out.push(
                    "Collect more history or shorten the horizon to tighten the uncertainty interval."
                        .to_string(),
                );
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, Observation, SeverityLevel};
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn obs(ts: &str, value: f64) -> Observation {
        Observation { timestamp: d(ts), value }
    }

    fn point(ts: &str, y: f64, margin: f64) -> ForecastPoint {
        ForecastPoint {
            timestamp: d(ts),
            point_estimate: y,
            lower_bound: y - margin,
            upper_bound: y + margin,
        }
    }

    fn anomaly(ts: &str, severity: f64) -> Anomaly {
        Anomaly {
            timestamp: d(ts),
            actual: 0.0,
            predicted: 0.0,
            lower_bound: 0.0,
            upper_bound: 0.0,
            severity,
            severity_level: SeverityLevel::Low,
        }
    }

    fn basic_series() -> Series {
        Series::new(vec![obs("2023-01-01", 100.0), obs("2023-01-02", 100.0)])
    }

    #[test]
    fn test_category_order_is_fixed() {
        let series = basic_series();
        let forecast = ForecastResult::new(
            vec![
                point("2023-01-01", 100.0, 5.0),
                point("2023-01-02", 100.0, 5.0),
                point("2023-01-03", 120.0, 5.0),
            ],
            d("2023-01-02"),
        );
        let anomalies = vec![anomaly("2023-01-01", 10.0)];
        let inputs = InsightInputs { forecast: &forecast, anomalies: &anomalies, series: &series };

        let insights = synthesize_insights(&inputs);
        assert_eq!(insights.len(), 4);
        assert!(insights[0].contains("trend"));
        assert!(insights[1].contains("peak"));
        assert!(insights[2].contains("volatility") || insights[2].contains("stability"));
        assert!(insights[3].contains("uncertainty interval"));
    }

    #[test]
    fn test_trend_tiers() {
        let run = |future_value: f64| {
            let series = basic_series();
            let forecast = ForecastResult::new(
                vec![point("2023-01-03", future_value, 1.0)],
                d("2023-01-02"),
            );
            let inputs = InsightInputs { forecast: &forecast, anomalies: &[], series: &series };
            trend_rule(&inputs).unwrap()
        };

        assert!(run(115.0).starts_with("Significant growth"));
        assert!(run(105.0).starts_with("Moderate growth"));
        assert!(run(101.0).starts_with("Minimal growth"));
        assert!(run(85.0).starts_with("Significant decline"));
    }

    #[test]
    fn test_flat_projection_does_not_read_as_growth() {
        let series = basic_series();
        let forecast =
            ForecastResult::new(vec![point("2023-01-03", 100.0, 1.0)], d("2023-01-02"));
        let inputs = InsightInputs { forecast: &forecast, anomalies: &[], series: &series };

        let text = trend_rule(&inputs).unwrap();
        assert!(!text.contains("growth"));
        assert!(text.starts_with("Minimal decline"));
        assert!(text.contains("0.0%"));
    }

    #[test]
    fn test_trend_guard_on_zero_last_actual() {
        let series = Series::new(vec![obs("2023-01-01", 0.0)]);
        let forecast =
            ForecastResult::new(vec![point("2023-01-02", 10.0, 1.0)], d("2023-01-01"));
        let inputs = InsightInputs { forecast: &forecast, anomalies: &[], series: &series };

        assert!(trend_rule(&inputs).is_none());
    }

    #[test]
    fn test_peak_skipped_without_future_points() {
        let series = basic_series();
        let forecast =
            ForecastResult::new(vec![point("2023-01-02", 100.0, 1.0)], d("2023-01-02"));
        let inputs = InsightInputs { forecast: &forecast, anomalies: &[], series: &series };

        assert!(peak_rule(&inputs).is_none());
    }

    #[test]
    fn test_peak_reports_maximum_future_estimate() {
        let series = basic_series();
        let forecast = ForecastResult::new(
            vec![
                point("2023-01-03", 110.0, 1.0),
                point("2023-01-04", 140.0, 1.0),
                point("2023-01-05", 130.0, 1.0),
            ],
            d("2023-01-02"),
        );
        let inputs = InsightInputs { forecast: &forecast, anomalies: &[], series: &series };

        let text = peak_rule(&inputs).unwrap();
        assert!(text.contains("140.00"));
        assert!(text.contains("2023-01-04"));
    }

    #[test]
    fn test_volatility_silent_without_anomalies() {
        let series = basic_series();
        let forecast =
            ForecastResult::new(vec![point("2023-01-02", 100.0, 1.0)], d("2023-01-02"));
        let inputs = InsightInputs { forecast: &forecast, anomalies: &[], series: &series };

        assert!(volatility_rule(&inputs).is_none());
    }

    #[test]
    fn test_volatility_recent_vs_stable() {
        let series = Series::new(vec![obs("2023-01-01", 1.0), obs("2023-06-01", 1.0)]);
        let forecast =
            ForecastResult::new(vec![point("2023-06-01", 1.0, 0.1)], d("2023-06-01"));

        let recent = vec![anomaly("2023-05-20", 5.0)];
        let inputs = InsightInputs { forecast: &forecast, anomalies: &recent, series: &series };
        assert!(volatility_rule(&inputs).unwrap().contains("Recent volatility"));

        let old = vec![anomaly("2023-01-01", 5.0), anomaly("2023-02-01", 2.0)];
        let inputs = InsightInputs { forecast: &forecast, anomalies: &old, series: &series };
        let text = volatility_rule(&inputs).unwrap();
        assert!(text.contains("Historical stability"));
        assert!(text.contains("all 2 anomalies"));
    }

    #[test]
    fn test_confidence_wording_by_spread() {
        let series = basic_series();

        let narrow =
            ForecastResult::new(vec![point("2023-01-03", 100.0, 5.0)], d("2023-01-02"));
        let inputs = InsightInputs { forecast: &narrow, anomalies: &[], series: &series };
        assert!(confidence_rule(&inputs).unwrap().starts_with("High confidence"));

        let wide =
            ForecastResult::new(vec![point("2023-01-03", 100.0, 20.0)], d("2023-01-02"));
        let inputs = InsightInputs { forecast: &wide, anomalies: &[], series: &series };
        assert!(confidence_rule(&inputs).unwrap().starts_with("Variable forecast"));
    }

    #[test]
    fn test_confidence_guard_on_zero_estimate() {
        let series = basic_series();
        let forecast =
            ForecastResult::new(vec![point("2023-01-03", 0.0, 5.0)], d("2023-01-02"));
        let inputs = InsightInputs { forecast: &forecast, anomalies: &[], series: &series };

        assert!(confidence_rule(&inputs).is_none());
    }

    #[test]
    fn test_recommendations_for_decline_and_volatility() {
        let series = basic_series();
        let forecast = ForecastResult::new(
            vec![point("2023-01-03", 80.0, 30.0)],
            d("2023-01-02"),
        );
        let anomalies = vec![anomaly("2023-01-02", 9.0)];
        let inputs = InsightInputs { forecast: &forecast, anomalies: &anomalies, series: &series };

        let recs = recommendations(&inputs);
        assert_eq!(recs.len(), 3);
        assert!(recs[0].contains("decline"));
        assert!(recs[1].contains("recent anomaly"));
        assert!(recs[2].contains("uncertainty interval"));
    }

    #[test]
    fn test_no_recommendations_when_everything_is_calm() {
        let series = basic_series();
        let forecast =
            ForecastResult::new(vec![point("2023-01-03", 102.0, 2.0)], d("2023-01-02"));
        let inputs = InsightInputs { forecast: &forecast, anomalies: &[], series: &series };

        assert!(recommendations(&inputs).is_empty());
    }
}
