//! Download orchestration
//!
//! The orchestrator dispatches one pipeline per item (destination,
//! skip-check, resolve, fetch, write) through a semaphore-capped set of
//! tokio tasks and folds the outcomes into a [`DownloadSummary`]. Failure is
//! item-scoped: a failed item becomes a labeled summary entry and the batch
//! keeps going. A cancellation token stops dispatching new items while
//! letting in-flight pipelines finish.
//!
//! No ordering is guaranteed between items; within one item the pipeline
//! steps are strictly sequential. Destination paths are one-to-one with
//! items, so writes never collide and the summary is the only shared
//! accumulator (folded by a single collector).

pub mod config;

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::client::RetryingFetcher;
use crate::app::models::{Destination, DownloadOutcome, DownloadSummary, ItemDescriptor};
use crate::app::paths;
use crate::app::resolver::UrlResolver;
use crate::app::writer;
use crate::errors::Result;

pub use config::OrchestratorConfig;

/// Maps an item to the directory (and optionally filename) it lands in
pub type DestinationFn = dyn Fn(&ItemDescriptor) -> Destination + Send + Sync;

/// Batch download scheduler
pub struct Orchestrator {
    resolver: Arc<dyn UrlResolver>,
    fetcher: Arc<RetryingFetcher>,
    config: OrchestratorConfig,
    cancel: CancellationToken,
}

impl Orchestrator {
    /// Create an orchestrator over a resolver and fetcher pair
    pub fn new(
        resolver: Arc<dyn UrlResolver>,
        fetcher: Arc<RetryingFetcher>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Share a cancellation token with other batches or a signal handler
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops dispatch of further items when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run one batch to completion
    ///
    /// Every item produces exactly one outcome; processing and completion
    /// order are unspecified. The returned summary is the only artifact the
    /// calling layer needs to render.
    ///
    /// # Errors
    ///
    /// Only configuration validation can fail; item failures are recorded in
    /// the summary instead of propagating.
    pub async fn run<F>(
        &self,
        items: Vec<ItemDescriptor>,
        destination_for: F,
    ) -> Result<DownloadSummary>
    where
        F: Fn(&ItemDescriptor) -> Destination + Send + Sync + 'static,
    {
        self.config.validate()?;

        info!(
            "Dispatching {} items across up to {} concurrent pipelines",
            items.len(),
            self.config.worker_count
        );

        let semaphore = Arc::new(Semaphore::new(self.config.worker_count));
        let destination_for: Arc<DestinationFn> = Arc::new(destination_for);
        let mut join_set = JoinSet::new();

        for item in items {
            let semaphore = semaphore.clone();
            let destination_for = destination_for.clone();
            let resolver = self.resolver.clone();
            let fetcher = self.fetcher.clone();
            let cancel = self.cancel.clone();
            let item_timeout = self.config.item_timeout;

            join_set.spawn(async move {
                // The permit is taken inside the task: all items are queued
                // immediately, at most `worker_count` pipelines run at once.
                let Ok(_permit) = semaphore.acquire().await else {
                    return (item, DownloadOutcome::Cancelled);
                };
                if cancel.is_cancelled() {
                    return (item, DownloadOutcome::Cancelled);
                }

                let destination = destination_for(&item);
                let outcome = match item_timeout {
                    Some(limit) => {
                        let pipeline = run_pipeline(&item, &destination, &resolver, &fetcher);
                        match tokio::time::timeout(limit, pipeline).await {
                            Ok(outcome) => outcome,
                            Err(_) => DownloadOutcome::DeadlineExceeded(limit),
                        }
                    }
                    None => run_pipeline(&item, &destination, &resolver, &fetcher).await,
                };
                (item, outcome)
            });
        }

        let mut summary = DownloadSummary::default();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((item, outcome)) => {
                    if let Some(reason) = outcome.failure_reason() {
                        warn!("{}: {}", item.label(), reason);
                    }
                    summary.record(item, outcome);
                }
                Err(e) => {
                    // The item identity is lost with the panicked task; the
                    // summary still reflects every joined outcome.
                    warn!("Item pipeline panicked: {}", e);
                }
            }
        }

        info!(
            "Batch complete: {} succeeded, {} skipped, {} failed, {} cancelled",
            summary.succeeded,
            summary.skipped,
            summary.failed.len(),
            summary.cancelled
        );
        Ok(summary)
    }
}

/// One item's pipeline: skip-check, resolve, re-check, fetch, write
async fn run_pipeline(
    item: &ItemDescriptor,
    destination: &Destination,
    resolver: &Arc<dyn UrlResolver>,
    fetcher: &Arc<RetryingFetcher>,
) -> DownloadOutcome {
    // A pre-known filename lets the skip decision happen before any
    // network traffic for this item.
    if let Some(path) = destination.known_path() {
        if !paths::is_absent(&path) {
            info!("Skipping {} (already present)", item.label());
            return DownloadOutcome::Skipped;
        }
    }

    let resolved = match resolver.resolve(item).await {
        Ok(resolved) => resolved,
        Err(e) => return DownloadOutcome::ResolutionFailed(e),
    };

    let final_path = destination.resolved_path(&resolved.filename);
    if !paths::is_absent(&final_path) {
        info!("Skipping {} (already present)", resolved.filename);
        return DownloadOutcome::Skipped;
    }

    let response = match fetcher.fetch(&resolved.url).await {
        Ok(response) => response,
        Err(e) => return DownloadOutcome::FetchFailed(e),
    };

    match writer::write_response(response, &final_path).await {
        Ok(bytes) => {
            debug!("{} -> {} ({} bytes)", resolved.url, final_path.display(), bytes);
            info!("Downloaded {}", resolved.filename);
            DownloadOutcome::Succeeded
        }
        Err(e) => DownloadOutcome::WriteFailed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::app::client::{ClientConfig, FetchConfig};
    use crate::app::models::ResolvedTarget;
    use crate::app::resolver::ForgeInstallerResolver;
    use crate::errors::{ResolutionError, ResolutionResult};

    fn test_fetcher() -> Arc<RetryingFetcher> {
        let client = ClientConfig::default().build_http_client().unwrap();
        Arc::new(RetryingFetcher::new(client, FetchConfig::default()))
    }

    /// Resolver that records peak concurrency and always fails after a pause
    struct GaugeResolver {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl GaugeResolver {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UrlResolver for GaugeResolver {
        async fn resolve(&self, item: &ItemDescriptor) -> ResolutionResult<ResolvedTarget> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(30)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Err(ResolutionError::FileNotFound {
                project: item.project_ref.clone(),
                file_id: item.file_ref.unwrap_or_default(),
            })
        }
    }

    fn mod_items(count: usize) -> Vec<ItemDescriptor> {
        (0..count)
            .map(|i| ItemDescriptor::mod_file(format!("project-{}", i), 1000 + i as u64, "1.16.4"))
            .collect()
    }

    #[tokio::test]
    async fn test_all_items_complete_within_concurrency_cap() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = Arc::new(GaugeResolver::new());
        let orchestrator = Orchestrator::new(
            resolver.clone(),
            test_fetcher(),
            OrchestratorConfig::default().with_worker_count(3),
        );

        let dir = temp_dir.path().to_path_buf();
        let summary = orchestrator
            .run(mod_items(10), move |_| Destination::directory(dir.clone()))
            .await
            .unwrap();

        // No item is silently dropped, every outcome is a resolution failure
        assert_eq!(summary.total(), 10);
        assert_eq!(summary.failed.len(), 10);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 10);
        assert!(resolver.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn test_known_destination_skips_without_resolution() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("already-here.jar"), b"bytes").unwrap();

        let resolver = Arc::new(GaugeResolver::new());
        let orchestrator = Orchestrator::new(
            resolver.clone(),
            test_fetcher(),
            OrchestratorConfig::default(),
        );

        let dir = temp_dir.path().to_path_buf();
        let summary = orchestrator
            .run(mod_items(1), move |_| {
                Destination::file(dir.clone(), "already-here.jar")
            })
            .await
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert!(summary.is_clean());
        // The resolver was never consulted for a present destination
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_dispatch() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = Arc::new(GaugeResolver::new());
        let orchestrator = Orchestrator::new(
            resolver.clone(),
            test_fetcher(),
            OrchestratorConfig::default(),
        );

        orchestrator.cancellation_token().cancel();

        let dir = temp_dir.path().to_path_buf();
        let summary = orchestrator
            .run(mod_items(5), move |_| Destination::directory(dir.clone()))
            .await
            .unwrap();

        assert_eq!(summary.cancelled, 5);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_item_deadline_bounds_a_stuck_pipeline() {
        /// Resolver that never finishes
        struct StuckResolver;

        #[async_trait]
        impl UrlResolver for StuckResolver {
            async fn resolve(&self, _item: &ItemDescriptor) -> ResolutionResult<ResolvedTarget> {
                loop {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
            }
        }

        let temp_dir = TempDir::new().unwrap();
        let orchestrator = Orchestrator::new(
            Arc::new(StuckResolver),
            test_fetcher(),
            OrchestratorConfig::default().with_item_timeout(Duration::from_millis(50)),
        );

        let dir = temp_dir.path().to_path_buf();
        let summary = orchestrator
            .run(mod_items(1), move |_| Destination::directory(dir.clone()))
            .await
            .unwrap();

        assert_eq!(summary.failed.len(), 1);
        let reason = summary.failed.values().next().unwrap();
        assert!(reason.contains("deadline"));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let orchestrator = Orchestrator::new(
            Arc::new(ForgeInstallerResolver::new("35.1.13")),
            test_fetcher(),
            OrchestratorConfig::default().with_worker_count(0),
        );

        let result = orchestrator
            .run(Vec::new(), |_| Destination::directory("/tmp"))
            .await;
        assert!(result.is_err());
    }
}
