//! HTTP route handlers.

use axum::{Router, extract::State, routing::get};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::CachePort;

use super::state::AppState;

/// Default path of the trigger endpoint.
pub const DEFAULT_INJECTION_PATH: &str = "/inject";

/// Create the application router.
///
/// `injection_path` is the route that starts a new ingestion loop.
pub fn create_router<C: CachePort>(state: AppState<C>, injection_path: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(injection_path, get(inject::<C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Start an ingestion loop and answer right away.
///
/// Cache or dataset problems only show up later, in the loop's logs.
async fn inject<C: CachePort>(State(state): State<AppState<C>>) -> &'static str {
    let run = state.launcher.launch();
    info!(run, "Injector started");
    "Injector started"
}
