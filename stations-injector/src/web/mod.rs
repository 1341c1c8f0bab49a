//! Web layer for the stations injector.
//!
//! Exposes the trigger endpoint that starts ingestion loops.

mod routes;
mod state;

pub use routes::{DEFAULT_INJECTION_PATH, create_router};
pub use state::AppState;
