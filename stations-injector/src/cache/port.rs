//! The capability the ingestion loop needs from a key-value store.

use std::future::Future;

use crate::domain::Stop;

use super::error::CacheError;

/// Remote key-value store holding station board entries.
///
/// Implementations must be safe to call concurrently from the loop and its
/// progress reporter; no extra locking is layered on top.
pub trait CachePort: Send + Sync + 'static {
    /// Remove every entry.
    fn clear(&self) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: String, value: Stop) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Number of stored entries. Best-effort while writers are active.
    fn size(&self) -> impl Future<Output = Result<u64, CacheError>> + Send;
}
