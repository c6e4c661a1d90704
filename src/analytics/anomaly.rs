use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{Anomaly, ForecastPoint, Series, SeverityPolicy};

/// Flag historical observations falling strictly outside the retrodicted
/// uncertainty band.
///
/// The series and the historical forecast points inner-join on timestamp;
/// an observation with no matching point gets no verdict. Output order
/// follows the input series, not severity. Values equal to a bound are
/// never anomalies.
pub fn detect_anomalies(
    series: &Series,
    historical: &[ForecastPoint],
    policy: &SeverityPolicy,
) -> Vec<Anomaly> {
    let by_day: HashMap<NaiveDate, &ForecastPoint> =
        historical.iter().map(|p| (p.timestamp, p)).collect();

    let anomalies: Vec<Anomaly> = series
        .iter()
        .filter_map(|obs| {
            let point = by_day.get(&obs.timestamp)?;
            let outside = obs.value < point.lower_bound || obs.value > point.upper_bound;
            if !outside {
                return None;
            }
            let severity = (obs.value - point.point_estimate).abs();
            Some(Anomaly {
                timestamp: obs.timestamp,
                actual: obs.value,
                predicted: point.point_estimate,
                lower_bound: point.lower_bound,
                upper_bound: point.upper_bound,
                severity,
                severity_level: policy.classify(severity, point.point_estimate),
            })
        })
        .collect();

    debug!(count = anomalies.len(), "anomaly detection complete");
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, SeverityLevel};

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn obs(ts: &str, value: f64) -> Observation {
        Observation { timestamp: d(ts), value }
    }

    fn band(ts: &str, estimate: f64, margin: f64) -> ForecastPoint {
        ForecastPoint {
            timestamp: d(ts),
            point_estimate: estimate,
            lower_bound: estimate - margin,
            upper_bound: estimate + margin,
        }
    }

    #[test]
    fn test_strictly_outside_band_flags() {
        let series = Series::new(vec![
            obs("2023-01-01", 100.0),
            obs("2023-01-02", 130.0),
            obs("2023-01-03", 60.0),
        ]);
        let historical = vec![
            band("2023-01-01", 100.0, 10.0),
            band("2023-01-02", 100.0, 10.0),
            band("2023-01-03", 100.0, 10.0),
        ];

        let anomalies = detect_anomalies(&series, &historical, &SeverityPolicy::default());
        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].timestamp, d("2023-01-02"));
        assert_eq!(anomalies[0].severity, 30.0);
        assert_eq!(anomalies[0].severity_level, SeverityLevel::High);
        assert_eq!(anomalies[1].timestamp, d("2023-01-03"));
        assert_eq!(anomalies[1].severity, 40.0);
    }

    #[test]
    fn test_boundary_equal_values_are_not_anomalies() {
        let series = Series::new(vec![obs("2023-01-01", 110.0), obs("2023-01-02", 90.0)]);
        let historical = vec![
            band("2023-01-01", 100.0, 10.0),
            band("2023-01-02", 100.0, 10.0),
        ];

        assert!(detect_anomalies(&series, &historical, &SeverityPolicy::default()).is_empty());
    }

    #[test]
    fn test_severity_measured_from_point_estimate_not_bound() {
        let series = Series::new(vec![obs("2023-01-01", 115.0)]);
        let historical = vec![band("2023-01-01", 100.0, 10.0)];

        let anomalies = detect_anomalies(&series, &historical, &SeverityPolicy::default());
        // 115 - 100, not 115 - 110.
        assert_eq!(anomalies[0].severity, 15.0);
    }

    #[test]
    fn test_unmatched_timestamps_get_no_verdict() {
        let series = Series::new(vec![obs("2023-01-01", 500.0), obs("2023-01-02", 500.0)]);
        let historical = vec![band("2023-01-02", 100.0, 10.0)];

        let anomalies = detect_anomalies(&series, &historical, &SeverityPolicy::default());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].timestamp, d("2023-01-02"));
    }

    #[test]
    fn test_output_ordered_by_timestamp_not_severity() {
        let series = Series::new(vec![obs("2023-01-01", 120.0), obs("2023-01-02", 190.0)]);
        let historical = vec![
            band("2023-01-01", 100.0, 10.0),
            band("2023-01-02", 100.0, 10.0),
        ];

        let anomalies = detect_anomalies(&series, &historical, &SeverityPolicy::default());
        assert!(anomalies[0].severity < anomalies[1].severity);
        assert!(anomalies[0].timestamp < anomalies[1].timestamp);
    }
}
