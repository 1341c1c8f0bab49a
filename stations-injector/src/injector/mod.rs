//! Ingestion loop.
//!
//! Clears the cache, replays the dataset into it, and starts over each time
//! the dataset runs out. Loops are started by the trigger endpoint and run
//! until cancelled or until the first error.

mod error;
mod launcher;
mod pipeline;
mod progress;

pub use error::InjectorError;
pub use launcher::Launcher;
pub use pipeline::{Injector, LoopSettings, LoopSummary};
pub use progress::report_progress;
