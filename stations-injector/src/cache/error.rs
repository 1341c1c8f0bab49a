//! Cache error types.

/// Errors from cache operations.
///
/// Every variant means the operation was not applied.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Transport failure talking to the cache server
    #[error("cache unavailable: {0}")]
    Http(#[from] reqwest::Error),

    /// Cache could not be reached for another reason
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// Server answered with an error status
    #[error("cache rejected {operation}: {status} {message}")]
    Rejected {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// Size response was not an integer
    #[error("invalid size response: {0:?}")]
    InvalidSize(String),

    /// Value could not be serialized
    #[error("failed to encode cache value: {0}")]
    Encode(#[from] serde_json::Error),

    /// Cache base URL could not be built
    #[error("invalid cache address: {0}")]
    InvalidAddress(String),
}

impl CacheError {
    /// Whether the cache could not be reached at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CacheError::Http(_) | CacheError::Unavailable(_))
    }
}
