//! Ingestion loop error types.

use crate::cache::CacheError;
use crate::dataset::{DatasetError, ParseError};

/// Errors that stop an ingestion loop.
///
/// None of these are retried; a new trigger starts a fresh loop.
#[derive(Debug, thiserror::Error)]
pub enum InjectorError {
    /// Dataset missing, unreadable or corrupt
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// A dataset line could not be mapped to a cache entry
    #[error("line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: ParseError,
    },

    /// A cache operation failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A background task (dataset reader or progress reporter) panicked
    #[error("{task} stopped: {message}")]
    Task {
        task: &'static str,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn error_display() {
        let err = InjectorError::from(DatasetError::NotFound(PathBuf::from("stops.jsonl.gz")));
        assert_eq!(err.to_string(), "dataset not found: stops.jsonl.gz");

        let err = InjectorError::Parse {
            line: 42,
            source: ParseError::InvalidStationId("x".into()),
        };
        assert_eq!(err.to_string(), "line 42: invalid station id: \"x\"");

        let err = InjectorError::from(CacheError::Unavailable("refused".into()));
        assert_eq!(err.to_string(), "cache unavailable: refused");

        let err = InjectorError::Task {
            task: "progress reporter",
            message: "panicked".into(),
        };
        assert_eq!(err.to_string(), "progress reporter stopped: panicked");
    }
}
