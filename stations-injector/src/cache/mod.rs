//! Station boards cache.
//!
//! [`CachePort`] is the only thing the ingestion loop knows about the
//! store. [`RemoteCache`] talks to the data grid over REST;
//! [`InMemoryCache`] keeps everything in process.

mod error;
mod memory;
mod port;
mod remote;

pub use error::CacheError;
pub use memory::InMemoryCache;
pub use port::CachePort;
pub use remote::{DEFAULT_CACHE_NAME, DEFAULT_PORT, RemoteCache, RemoteCacheConfig};
