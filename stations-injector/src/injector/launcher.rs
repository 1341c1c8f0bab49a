//! Fire-and-forget ingestion loops.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, error, info, info_span};

use crate::cache::CachePort;

use super::pipeline::Injector;

/// Starts ingestion loops in the background.
///
/// Each [`launch`](Self::launch) spawns an independent loop. Loops are not
/// mutually exclusive: two launches race against the same cache.
pub struct Launcher<C> {
    injector: Arc<Injector<C>>,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    launched: Arc<AtomicU64>,
}

impl<C> Clone for Launcher<C> {
    fn clone(&self) -> Self {
        Self {
            injector: self.injector.clone(),
            shutdown: self.shutdown.clone(),
            tracker: self.tracker.clone(),
            launched: self.launched.clone(),
        }
    }
}

impl<C: CachePort> Launcher<C> {
    /// Create a launcher. Cancelling `shutdown` stops every loop it started.
    pub fn new(injector: Injector<C>, shutdown: CancellationToken) -> Self {
        Self {
            injector: Arc::new(injector),
            shutdown,
            tracker: TaskTracker::new(),
            launched: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Spawn a new loop and return its run number. Does not wait for it.
    pub fn launch(&self) -> u64 {
        let run = self.launched.fetch_add(1, Ordering::Relaxed) + 1;
        let injector = self.injector.clone();
        let token = self.shutdown.child_token();

        self.tracker.spawn(
            async move {
                info!(dataset = %injector.dataset().path().display(), "Ingestion loop started");
                match injector.run(token).await {
                    Ok(summary) => info!(
                        passes = summary.passes_completed,
                        written = summary.entries_written,
                        "Ingestion loop stopped"
                    ),
                    Err(e) => error!(error = %e, "Error while loading"),
                }
            }
            .instrument(info_span!("injection", run)),
        );

        run
    }

    /// Number of loops started so far.
    pub fn launched(&self) -> u64 {
        self.launched.load(Ordering::Relaxed)
    }

    /// Number of loops still running.
    pub fn running(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel every loop and wait for them to finish.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, InMemoryCache};
    use crate::dataset::{DatasetResource, write_dataset};
    use crate::domain::Stop;
    use crate::injector::LoopSettings;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    const BERN_LINE: &str = r#"{"name":"IC1","to":"Zurich","category":"IC","operator":"SBB","stop":{"station":{"id":"100","name":"Bern"},"departureTimestamp":1456700000,"departure":"14:00"}}"#;

    #[tokio::test]
    async fn launch_runs_in_background_until_shutdown() {
        let file = write_dataset(&[BERN_LINE]);
        let cache = Arc::new(InMemoryCache::new());
        let injector = Injector::new(
            cache.clone(),
            DatasetResource::new(file.path()),
            LoopSettings::default(),
        );
        let launcher = Launcher::new(injector, CancellationToken::new());

        assert_eq!(launcher.launch(), 1);
        assert_eq!(launcher.launch(), 2);
        assert_eq!(launcher.launched(), 2);

        // Loops keep going until told to stop
        while cache.get("100/IC1/Zurich/14:00").await.is_none() {
            tokio::task::yield_now().await;
        }
        assert_eq!(launcher.running(), 2);

        launcher.shutdown().await;
        assert_eq!(launcher.running(), 0);
    }

    #[tokio::test]
    async fn failed_loop_finishes_on_its_own() {
        let dir = tempfile::tempdir().unwrap();
        let injector = Injector::new(
            Arc::new(InMemoryCache::new()),
            DatasetResource::new(dir.path().join("missing.jsonl.gz")),
            LoopSettings::default(),
        );
        let launcher = Launcher::new(injector, CancellationToken::new());
        launcher.launch();

        while launcher.running() > 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(launcher.launched(), 1);

        // A failed loop does not prevent new ones
        launcher.launch();
        assert_eq!(launcher.launched(), 2);
        launcher.shutdown().await;
    }

    /// In-memory cache whose size calls stall like a network timeout.
    #[derive(Default)]
    struct SlowSizeCache {
        inner: InMemoryCache,
        sizing: AtomicBool,
    }

    impl CachePort for SlowSizeCache {
        async fn clear(&self) -> Result<(), CacheError> {
            self.inner.clear().await
        }

        async fn put(&self, key: String, value: Stop) -> Result<(), CacheError> {
            self.inner.put(key, value).await
        }

        async fn size(&self) -> Result<u64, CacheError> {
            self.sizing.store(true, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(30)).await;
            self.inner.size().await
        }
    }

    #[tokio::test]
    async fn shutdown_releases_the_cache() {
        let file = write_dataset(&[BERN_LINE]);
        let cache = Arc::new(SlowSizeCache::default());
        let settings = LoopSettings::default().with_progress_interval(Duration::from_millis(20));
        let injector = Injector::new(cache.clone(), DatasetResource::new(file.path()), settings);
        let launcher = Launcher::new(injector, CancellationToken::new());
        launcher.launch();

        // Wait until the reporter is stuck in a size call
        tokio::time::timeout(Duration::from_secs(10), async {
            while !cache.sizing.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("progress reporter never sampled");

        tokio::time::timeout(Duration::from_secs(5), launcher.shutdown())
            .await
            .expect("shutdown waited on a stalled size call");
        assert_eq!(launcher.running(), 0);
        drop(launcher);

        assert_eq!(Arc::strong_count(&cache), 1);
    }
}
