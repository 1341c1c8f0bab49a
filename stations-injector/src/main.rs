use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stations_injector::cache::{CachePort, InMemoryCache, RemoteCache};
use stations_injector::config::{CacheBackend, InjectorConfig};
use stations_injector::injector::{Injector, Launcher};
use stations_injector::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = InjectorConfig::from_env()?;

    match config.cache_backend {
        CacheBackend::Remote => {
            let cache = Arc::new(RemoteCache::connect(config.remote_cache())?);
            // Not fatal: loops report cache errors when triggered
            if let Err(e) = cache.ping().await {
                warn!(error = %e, url = %cache.cache_url(), "Station boards cache not reachable");
            }

            let cache = serve(&config, cache).await?;
            match Arc::try_unwrap(cache) {
                Ok(cache) => cache.close(),
                Err(_) => warn!("Cache client still referenced at shutdown"),
            }
        }
        CacheBackend::Memory => {
            warn!("Using in-memory cache, entries are not visible to other processes");
            serve(&config, Arc::new(InMemoryCache::new())).await?;
        }
    }

    Ok(())
}

/// Run the trigger endpoint until Ctrl-C, then stop every loop.
///
/// Hands the cache back once nothing else uses it.
async fn serve<C: CachePort>(config: &InjectorConfig, cache: Arc<C>) -> std::io::Result<Arc<C>> {
    let shutdown = CancellationToken::new();
    let injector = Injector::new(cache.clone(), config.dataset(), config.loop_settings());
    let launcher = Launcher::new(injector, shutdown);
    let app = create_router(AppState::new(launcher.clone()), &config.injection_path);

    let listener = match TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind, error = %e, "Station injector HTTP server failed to start");
            return Err(e);
        }
    };
    info!(
        addr = %config.bind,
        path = %config.injection_path,
        dataset = %config.dataset_path.display(),
        "Station injector HTTP server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(loops = launcher.launched(), "Shutting down, stopping ingestion loops");
    launcher.shutdown().await;
    drop(launcher);

    Ok(cache)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
