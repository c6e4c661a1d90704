pub mod anomaly;
pub mod insight;
pub mod metrics;

pub use anomaly::detect_anomalies;
pub use insight::{recommendations, synthesize_insights};
pub use metrics::AccuracyMetrics;
