use thiserror::Error;

/// Column role the normalizer failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Date,
    Value,
}

impl std::fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date => write!(f, "date"),
            Self::Value => write!(f, "value"),
        }
    }
}

/// Input-schema defects. Recoverable by the caller fixing the file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("no date column found: expected 'ds' or one of date, timestamp, time")]
    DateColumnNotFound,

    #[error("no value column found: expected 'y', a known value name, or a numeric column")]
    ValueColumnNotFound,
}

impl NormalizeError {
    pub fn role(&self) -> ColumnRole {
        match self {
            Self::DateColumnNotFound => ColumnRole::Date,
            Self::ValueColumnNotFound => ColumnRole::Value,
        }
    }
}

/// Request-scoped pipeline failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The resolved date column could not be interpreted as dates.
    #[error("could not parse column '{column}' as dates: '{sample}'")]
    Parse { column: String, sample: String },

    #[error("input contains no usable observations")]
    EmptySeries,

    #[error("horizon_days must be greater than zero")]
    InvalidHorizon,

    /// Oracle-side failure. Opaque and terminal for the request; never
    /// retried.
    #[error("forecast model failed: {0}")]
    Oracle(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_error_roles() {
        assert_eq!(NormalizeError::DateColumnNotFound.role(), ColumnRole::Date);
        assert_eq!(NormalizeError::ValueColumnNotFound.role(), ColumnRole::Value);
    }

    #[test]
    fn test_error_display() {
        let err = PipelineError::Parse {
            column: "ds".to_string(),
            sample: "not-a-date".to_string(),
        };
        assert!(err.to_string().contains("not-a-date"));
    }
}
