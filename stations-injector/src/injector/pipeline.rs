//! The clear-then-replay ingestion loop.
//!
//! A loop clears the cache, then streams the dataset into it pass after
//! pass. Every pass ends with a clear, so the cache only ever holds
//! entries written since the most recent clear:
//!
//! ```text
//! clear → pass → clear → pass → clear → ...
//! ```
//!
//! Decoding runs on a blocking worker and feeds lines through a bounded
//! channel; mapping and cache writes run on the async side in source order.

use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, TryStreamExt, future};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheError, CachePort};
use crate::dataset::{DatasetError, DatasetResource, to_entry};

use super::error::InjectorError;
use super::progress::report_progress;

/// Tuning for an ingestion loop.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// How often the cache size is logged.
    pub progress_interval: Duration,

    /// Maximum cache writes in flight. 1 applies writes strictly in order.
    pub write_concurrency: usize,

    /// Decoded lines buffered between the reader and the writers.
    channel_capacity: usize,
}

impl LoopSettings {
    /// Set the progress interval.
    pub fn with_progress_interval(mut self, every: Duration) -> Self {
        self.progress_interval = every;
        self
    }

    /// Set the number of concurrent writes (at least 1).
    pub fn with_write_concurrency(mut self, n: usize) -> Self {
        self.write_concurrency = n.max(1);
        self
    }

    /// Set how many decoded lines may wait for a writer (at least 1).
    pub fn with_channel_capacity(mut self, n: usize) -> Self {
        self.channel_capacity = n.max(1);
        self
    }

    /// Decoded lines buffered between the reader and the writers.
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_secs(5),
            write_concurrency: 1,
            channel_capacity: 1024,
        }
    }
}

/// What a cancelled loop got through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Passes that reached end of file.
    pub passes_completed: u64,

    /// Cache writes applied across all passes.
    pub entries_written: u64,
}

/// Whichever of the passes and the progress reporter stopped first.
enum Finished {
    Passes(Result<(), InjectorError>),
    Reporter(Result<Result<(), CacheError>, JoinError>),
}

enum PassOutcome {
    Completed { written: u64 },
    Cancelled { written: u64 },
}

/// Streams the dataset into the cache, forever.
pub struct Injector<C> {
    cache: Arc<C>,
    dataset: DatasetResource,
    settings: LoopSettings,
}

impl<C: CachePort> Injector<C> {
    /// Create an injector writing `dataset` into `cache`.
    pub fn new(cache: Arc<C>, dataset: DatasetResource, settings: LoopSettings) -> Self {
        Self {
            cache,
            dataset,
            settings,
        }
    }

    /// The dataset this injector replays.
    pub fn dataset(&self) -> &DatasetResource {
        &self.dataset
    }

    /// Run until `token` is cancelled or something fails.
    ///
    /// Only returns `Ok` on cancellation. Any decode, parse or cache error
    /// ends the loop, including an unreachable cache seen by the progress
    /// reporter; nothing is retried or skipped. The reporter has stopped by
    /// the time this returns.
    pub async fn run(&self, token: CancellationToken) -> Result<LoopSummary, InjectorError> {
        self.dataset.locate()?;

        let mut summary = LoopSummary::default();
        if token.is_cancelled() {
            return Ok(summary);
        }

        // Start clean
        self.cache.clear().await?;

        let reporter_token = token.child_token();
        let _stop_reporter = reporter_token.clone().drop_guard();
        let mut reporter = tokio::spawn(report_progress(
            self.cache.clone(),
            self.settings.progress_interval,
            reporter_token.clone(),
        ));

        let finished = tokio::select! {
            biased;
            result = self.run_passes(&token, &mut summary) => Finished::Passes(result),
            reported = &mut reporter => Finished::Reporter(reported),
        };

        match finished {
            Finished::Passes(result) => {
                reporter_token.cancel();
                // Cancelled reporters return promptly, even mid-sample
                if let Err(e) = reporter.await {
                    warn!(error = %e, "Progress reporter did not stop cleanly");
                }
                result.map(|()| summary)
            }
            Finished::Reporter(Ok(Ok(()))) => Ok(summary),
            Finished::Reporter(Ok(Err(e))) => Err(e.into()),
            Finished::Reporter(Err(e)) => Err(InjectorError::Task {
                task: "progress reporter",
                message: e.to_string(),
            }),
        }
    }

    /// Clear-then-replay passes until cancelled or failed.
    async fn run_passes(
        &self,
        token: &CancellationToken,
        summary: &mut LoopSummary,
    ) -> Result<(), InjectorError> {
        loop {
            match self.run_pass(token).await? {
                PassOutcome::Cancelled { written } => {
                    summary.entries_written += written;
                    return Ok(());
                }
                PassOutcome::Completed { written } => {
                    summary.passes_completed += 1;
                    summary.entries_written += written;
                    info!(
                        pass = summary.passes_completed,
                        written, "Reached end of file, clear and restart"
                    );
                    self.cache.clear().await?;
                    if token.is_cancelled() {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// One traversal of the dataset. Returns once every write of the pass
    /// has been applied, or as soon as `token` is cancelled.
    async fn run_pass(&self, token: &CancellationToken) -> Result<PassOutcome, InjectorError> {
        let (tx, mut rx) = mpsc::channel(self.settings.channel_capacity.max(1));
        let dataset = self.dataset.clone();
        let reader = tokio::task::spawn_blocking(move || read_lines(&dataset, &tx));

        let mut written = 0u64;
        let writes = futures::stream::poll_fn(move |cx| rx.poll_recv(cx))
            .enumerate()
            .map(|(index, line)| {
                let cache = self.cache.clone();
                async move {
                    let line = line?;
                    let (key, stop) = to_entry(&line).map_err(|source| InjectorError::Parse {
                        line: index as u64 + 1,
                        source,
                    })?;
                    cache.put(key, stop).await?;
                    Ok::<_, InjectorError>(())
                }
            })
            .buffered(self.settings.write_concurrency.max(1))
            .try_for_each(|()| {
                written += 1;
                future::ready(Ok(()))
            });

        let finished = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = writes => Some(result),
        };

        match finished {
            None => {
                debug!(written, "Pass cancelled");
                Ok(PassOutcome::Cancelled { written })
            }
            Some(result) => {
                result?;
                reader
                    .await
                    .map_err(|e| InjectorError::Task {
                        task: "dataset reader",
                        message: e.to_string(),
                    })?;
                Ok(PassOutcome::Completed { written })
            }
        }
    }
}

/// Blocking half of a pass: send decoded lines until end of file, the first
/// decode error, or the receiving side goes away.
fn read_lines(dataset: &DatasetResource, tx: &mpsc::Sender<Result<String, DatasetError>>) {
    let lines = match dataset.open() {
        Ok(lines) => lines,
        Err(e) => {
            let _ = tx.blocking_send(Err(e));
            return;
        }
    };

    for line in lines {
        if tx.blocking_send(line).is_err() {
            debug!("Pass abandoned, stopping dataset reader");
            return;
        }
    }
}
