//! In-process cache backend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::Stop;

use super::error::CacheError;
use super::port::CachePort;

/// Thread-safe in-memory key-value store.
///
/// Sizes are exact, which makes it the backend of choice for local runs
/// without a data grid.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, Stop>>>,
}

impl InMemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single entry.
    pub async fn get(&self, key: &str) -> Option<Stop> {
        let guard = self.entries.read().await;
        guard.get(key).cloned()
    }

    /// Copy of all current entries.
    pub async fn snapshot(&self) -> HashMap<String, Stop> {
        self.entries.read().await.clone()
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl CachePort for InMemoryCache {
    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn put(&self, key: String, value: Stop) -> Result<(), CacheError> {
        self.entries.write().await.insert(key, value);
        Ok(())
    }

    async fn size(&self) -> Result<u64, CacheError> {
        Ok(self.len().await as u64)
    }
}
