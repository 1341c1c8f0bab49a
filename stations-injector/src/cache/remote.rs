//! REST client for the station boards data grid.
//!
//! Talks to an Infinispan-style REST endpoint:
//!
//! | operation | request                                       |
//! |-----------|-----------------------------------------------|
//! | clear     | `POST /rest/v2/caches/{cache}?action=clear`   |
//! | size      | `GET  /rest/v2/caches/{cache}?action=size`    |
//! | put       | `PUT  /rest/v2/caches/{cache}/{key}` (JSON)   |
//! | ping      | `HEAD /rest/v2/caches/{cache}`                |
//!
//! Keys contain `/`, so they are sent as a single percent-encoded segment.

use reqwest::{RequestBuilder, Response, Url};

use crate::domain::Stop;

use super::error::CacheError;
use super::port::CachePort;

/// Default data grid REST port.
pub const DEFAULT_PORT: u16 = 11222;

/// Default name of the station boards cache.
pub const DEFAULT_CACHE_NAME: &str = "station-boards";

/// Configuration for the remote cache client.
#[derive(Debug, Clone)]
pub struct RemoteCacheConfig {
    /// Data grid host name
    pub host: String,
    /// Data grid REST port
    pub port: u16,
    /// Name of the cache holding station boards
    pub cache_name: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Optional basic auth credentials
    pub credentials: Option<(String, String)>,
}

impl RemoteCacheConfig {
    /// Create a config for the given server with default cache name and timeout.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            timeout_secs: 30,
            credentials: None,
        }
    }

    /// Use a different cache.
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Authenticate with basic auth.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// URL of the cache resource.
    pub fn cache_url(&self) -> Result<Url, CacheError> {
        let mut url = Url::parse(&format!("http://{}:{}/", self.host, self.port))
            .map_err(|e| CacheError::InvalidAddress(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CacheError::InvalidAddress(self.host.clone()))?
            .clear()
            .extend(["rest", "v2", "caches", self.cache_name.as_str()]);
        Ok(url)
    }
}

/// Client for a remote station boards cache.
///
/// Constructed once at process start and shared by every ingestion loop.
/// The underlying connection pool is thread-safe.
#[derive(Debug, Clone)]
pub struct RemoteCache {
    http: reqwest::Client,
    cache_url: Url,
    credentials: Option<(String, String)>,
}

impl RemoteCache {
    /// Build a client. No request is sent until the first operation.
    pub fn connect(config: RemoteCacheConfig) -> Result<Self, CacheError> {
        let cache_url = config.cache_url()?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            cache_url,
            credentials: config.credentials,
        })
    }

    /// URL of the cache resource.
    pub fn cache_url(&self) -> &Url {
        &self.cache_url
    }

    /// Check the cache exists on the server.
    pub async fn ping(&self) -> Result<(), CacheError> {
        let request = self.http.head(self.cache_url.clone());
        self.send("ping", request).await?;
        Ok(())
    }

    /// Release pooled connections. Call once at shutdown.
    pub fn close(self) {
        tracing::info!(url = %self.cache_url, "Closing cache client");
        drop(self.http);
    }

    fn action_url(&self, action: &str) -> Url {
        let mut url = self.cache_url.clone();
        url.query_pairs_mut().append_pair("action", action);
        url
    }

    fn entry_url(&self, key: &str) -> Result<Url, CacheError> {
        let mut url = self.cache_url.clone();
        url.path_segments_mut()
            .map_err(|_| CacheError::InvalidAddress(self.cache_url.to_string()))?
            .push(key);
        Ok(url)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, CacheError> {
        let request = match &self.credentials {
            Some((user, password)) => request.basic_auth(user, Some(password)),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CacheError::Rejected {
                operation,
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

impl CachePort for RemoteCache {
    async fn clear(&self) -> Result<(), CacheError> {
        let request = self.http.post(self.action_url("clear"));
        self.send("clear", request).await?;
        Ok(())
    }

    async fn put(&self, key: String, value: Stop) -> Result<(), CacheError> {
        let body = serde_json::to_vec(&value)?;
        let request = self
            .http
            .put(self.entry_url(&key)?)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body);
        self.send("put", request).await?;
        Ok(())
    }

    async fn size(&self) -> Result<u64, CacheError> {
        let request = self.http.get(self.action_url("size"));
        let body = self.send("size", request).await?.text().await?;
        body.trim()
            .parse()
            .map_err(|_| CacheError::InvalidSize(body))
    }
}
