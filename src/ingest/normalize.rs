//! Heuristic schema normalization.
//!
//! Maps an arbitrary tabular frame onto the canonical `(timestamp, value)`
//! series. Column resolution is deterministic, case-insensitive and ordered:
//! exact canonical names win, then curated common names in source column
//! order, then (for the value role) the first structurally numeric column.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::domain::{Observation, Series};
use crate::error::{NormalizeError, PipelineError};

use super::frame::{Column, Frame};

const DATE_NAMES: [&str; 4] = ["date", "ds", "timestamp", "time"];
const VALUE_NAMES: [&str; 7] = ["value", "sales", "revenue", "quantity", "amount", "close", "price"];

/// Resolve column roles and project the frame to a [`Series`].
///
/// Rows whose value cell does not parse as a finite number are dropped, not
/// the whole request. A date cell that is present but unparseable fails the
/// request with [`PipelineError::Parse`]. Duplicate timestamps pass through
/// untouched; the forecast engine owns the deduplication policy.
pub fn normalize(frame: &Frame) -> Result<Series, PipelineError> {
    let date_col = resolve_date_column(frame).ok_or(NormalizeError::DateColumnNotFound)?;
    let value_col =
        resolve_value_column(frame, &date_col.name).ok_or(NormalizeError::ValueColumnNotFound)?;

    debug!(
        date_column = %date_col.name,
        value_column = %value_col.name,
        rows = frame.row_count(),
        "resolved column roles"
    );

    let mut observations = Vec::with_capacity(frame.row_count());
    for (date_cell, value_cell) in date_col.values.iter().zip(&value_col.values) {
        let Some(raw_date) = date_cell else { continue };
        let timestamp = parse_date(raw_date).ok_or_else(|| PipelineError::Parse {
            column: date_col.name.clone(),
            sample: raw_date.clone(),
        })?;

        let Some(raw_value) = value_cell else { continue };
        let Ok(value) = raw_value.trim().parse::<f64>() else { continue };
        if !value.is_finite() {
            continue;
        }

        observations.push(Observation { timestamp, value });
    }

    Ok(Series::new(observations))
}

fn resolve_date_column(frame: &Frame) -> Option<&Column> {
    if let Some(col) = frame.column("ds") {
        return Some(col);
    }
    frame
        .columns()
        .iter()
        .find(|c| DATE_NAMES.contains(&c.name.to_lowercase().as_str()))
}

fn resolve_value_column<'a>(frame: &'a Frame, date_name: &str) -> Option<&'a Column> {
    let candidates = || frame.columns().iter().filter(|c| c.name != date_name);

    if let Some(col) = candidates().find(|c| c.name == "y") {
        return Some(col);
    }
    if let Some(col) = candidates().find(|c| c.name.eq_ignore_ascii_case("y")) {
        return Some(col);
    }
    if let Some(col) = candidates().find(|c| VALUE_NAMES.contains(&c.name.to_lowercase().as_str())) {
        return Some(col);
    }
    candidates().find(|c| c.is_numeric())
}

/// Parse one date cell, accepting plain dates, clock times and RFC 3339
/// timestamps. Timezone offsets are stripped, keeping the local calendar
/// day: the oracle is timezone-naive.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y/%m/%d") {
        return Some(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local().date());
    }
    None
}
