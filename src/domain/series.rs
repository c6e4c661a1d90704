use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cleaned data point: one calendar day, one finite value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: NaiveDate,
    pub value: f64,
}

/// Canonical time series produced by the normalizer, ascending by timestamp.
///
/// Immutable once handed to the forecast engine; all downstream components
/// only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series(Vec<Observation>);

impl Series {
    /// Build a series from raw observations, sorting ascending by timestamp.
    /// The sort is stable, so duplicate timestamps keep their input order.
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by_key(|o| o.timestamp);
        Self(observations)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.0.last()
    }

    /// Last observed timestamp; the forecast horizon extends beyond this.
    pub fn last_timestamp(&self) -> Option<NaiveDate> {
        self.0.last().map(|o| o.timestamp)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|o| o.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.0.iter()
    }
}
