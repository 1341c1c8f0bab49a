//! Application state for the web layer.

use crate::injector::Launcher;

/// Shared application state.
pub struct AppState<C> {
    /// Starts ingestion loops on demand
    pub launcher: Launcher<C>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            launcher: self.launcher.clone(),
        }
    }
}

impl<C> AppState<C> {
    /// Create a new app state.
    pub fn new(launcher: Launcher<C>) -> Self {
        Self { launcher }
    }
}
