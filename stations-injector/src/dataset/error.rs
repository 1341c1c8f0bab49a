//! Dataset error types.

use std::path::PathBuf;

/// Errors that can occur while reading the compressed dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file does not exist
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be opened
    #[error("failed to open dataset {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Corrupt gzip data, truncated stream or invalid UTF-8
    #[error("failed to decode dataset: {0}")]
    Decode(#[from] std::io::Error),
}

/// Errors from mapping a single dataset line to a cache entry.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Not valid JSON, or a required field is missing or mistyped
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    /// Station id is not a non-negative integer
    #[error("invalid station id: {0:?}")]
    InvalidStationId(String),

    /// Departure timestamp cannot be represented
    #[error("departure timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DatasetError::NotFound(PathBuf::from("data/stops.jsonl.gz"));
        assert_eq!(err.to_string(), "dataset not found: data/stops.jsonl.gz");

        let err = ParseError::InvalidStationId("abc".into());
        assert_eq!(err.to_string(), "invalid station id: \"abc\"");

        let err = ParseError::TimestampOutOfRange(i64::MAX);
        assert!(err.to_string().contains("out of range"));
    }
}
