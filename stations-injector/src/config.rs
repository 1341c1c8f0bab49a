//! Process configuration, read from environment variables.
//!
//! | variable                 | default                                  |
//! |--------------------------|------------------------------------------|
//! | `INJECTOR_BIND`          | `0.0.0.0:8080`                           |
//! | `INJECTOR_PATH`          | `/inject`                                |
//! | `DATASET_PATH`           | `data/cff-stop-2016-02-29__.jsonl.gz`    |
//! | `CACHE_BACKEND`          | `remote` (`remote` or `memory`)          |
//! | `DATAGRID_HOST`          | `localhost`                              |
//! | `DATAGRID_PORT`          | `11222`                                  |
//! | `STATION_BOARDS_CACHE`   | `station-boards`                         |
//! | `DATAGRID_USERNAME`      | unset                                    |
//! | `DATAGRID_PASSWORD`      | unset                                    |
//! | `PROGRESS_INTERVAL_SECS` | `5`                                      |
//! | `WRITE_CONCURRENCY`      | `1`                                      |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_CACHE_NAME, DEFAULT_PORT, RemoteCacheConfig};
use crate::dataset::{DEFAULT_DATASET, DatasetResource};
use crate::injector::LoopSettings;
use crate::web::DEFAULT_INJECTION_PATH;

/// Error returned for an unusable configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

impl ConfigError {
    fn new(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Name of the offending variable.
    pub fn var(&self) -> &'static str {
        self.var
    }
}

/// Where station boards are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// The data grid, over REST
    Remote,
    /// In process, lost on exit
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(CacheBackend::Remote),
            "memory" => Ok(CacheBackend::Memory),
            _ => Err("expected \"remote\" or \"memory\"".to_string()),
        }
    }
}

/// Configuration for the injector process.
#[derive(Debug, Clone)]
pub struct InjectorConfig {
    /// Address the trigger endpoint listens on
    pub bind: SocketAddr,
    /// Path of the trigger endpoint
    pub injection_path: String,
    /// Gzip-compressed JSON-lines dataset
    pub dataset_path: PathBuf,
    /// Cache implementation to write to
    pub cache_backend: CacheBackend,
    /// Data grid host
    pub datagrid_host: String,
    /// Data grid REST port
    pub datagrid_port: u16,
    /// Name of the station boards cache
    pub cache_name: String,
    /// Optional data grid credentials
    pub credentials: Option<(String, String)>,
    /// How often progress is logged
    pub progress_interval: Duration,
    /// Maximum cache writes in flight per loop
    pub write_concurrency: usize,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            injection_path: DEFAULT_INJECTION_PATH.to_string(),
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            cache_backend: CacheBackend::Remote,
            datagrid_host: "localhost".to_string(),
            datagrid_port: DEFAULT_PORT,
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            credentials: None,
            progress_interval: Duration::from_secs(5),
            write_concurrency: 1,
        }
    }
}

impl InjectorConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("INJECTOR_BIND") {
            config.bind = parse("INJECTOR_BIND", &v)?;
        }
        if let Some(v) = lookup("INJECTOR_PATH") {
            if !v.starts_with('/') {
                return Err(ConfigError::new("INJECTOR_PATH", &v, "must start with '/'"));
            }
            config.injection_path = v;
        }
        if let Some(v) = lookup("DATASET_PATH") {
            config.dataset_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("CACHE_BACKEND") {
            config.cache_backend = parse("CACHE_BACKEND", &v)?;
        }
        if let Some(v) = lookup("DATAGRID_HOST") {
            config.datagrid_host = v;
        }
        if let Some(v) = lookup("DATAGRID_PORT") {
            config.datagrid_port = parse("DATAGRID_PORT", &v)?;
        }
        if let Some(v) = lookup("STATION_BOARDS_CACHE") {
            config.cache_name = v;
        }
        if let (Some(user), Some(password)) =
            (lookup("DATAGRID_USERNAME"), lookup("DATAGRID_PASSWORD"))
        {
            config.credentials = Some((user, password));
        }
        if let Some(v) = lookup("PROGRESS_INTERVAL_SECS") {
            let secs: u64 = parse("PROGRESS_INTERVAL_SECS", &v)?;
            if secs == 0 {
                return Err(ConfigError::new("PROGRESS_INTERVAL_SECS", &v, "must be positive"));
            }
            config.progress_interval = Duration::from_secs(secs);
        }
        if let Some(v) = lookup("WRITE_CONCURRENCY") {
            let n: usize = parse("WRITE_CONCURRENCY", &v)?;
            if n == 0 {
                return Err(ConfigError::new("WRITE_CONCURRENCY", &v, "must be positive"));
            }
            config.write_concurrency = n;
        }

        Ok(config)
    }

    /// Remote cache client configuration.
    pub fn remote_cache(&self) -> RemoteCacheConfig {
        let config = RemoteCacheConfig::new(&self.datagrid_host, self.datagrid_port)
            .with_cache_name(&self.cache_name);
        match &self.credentials {
            Some((user, password)) => config.with_credentials(user, password),
            None => config,
        }
    }

    /// The dataset to replay.
    pub fn dataset(&self) -> DatasetResource {
        DatasetResource::new(&self.dataset_path)
    }

    /// Settings for each ingestion loop.
    pub fn loop_settings(&self) -> LoopSettings {
        LoopSettings::default()
            .with_progress_interval(self.progress_interval)
            .with_write_concurrency(self.write_concurrency)
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::new(var, value, e))
}
