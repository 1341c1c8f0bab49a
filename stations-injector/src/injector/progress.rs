//! Periodic progress reporting.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cache::{CacheError, CachePort};

/// Log the cache size every `every` until `token` is cancelled.
///
/// Returns `Ok` once cancelled, including while a sample is in flight.
/// An unreachable cache ends reporting with the error; any other failed
/// sample is logged and skipped.
pub async fn report_progress<C: CachePort>(
    cache: Arc<C>,
    every: Duration,
    token: CancellationToken,
) -> Result<(), CacheError> {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // First tick is immediate, skip it

    loop {
        let sampled = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            sampled = async {
                interval.tick().await;
                cache.size().await
            } => sampled,
        };

        match sampled {
            Ok(stored) => info!(stored, "Progress"),
            Err(e) if e.is_unavailable() => return Err(e),
            Err(e) => warn!(error = %e, "Failed to sample cache size"),
        }
    }
}
