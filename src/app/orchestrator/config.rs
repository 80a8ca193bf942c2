//! Orchestrator configuration

use std::time::Duration;

use crate::constants::workers;
use crate::errors::{AppError, Result};

/// Configuration for one batch run
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum concurrently in-flight item pipelines
    pub worker_count: usize,
    /// Optional deadline for one whole item pipeline; `None` relies on the
    /// per-call HTTP timeouts and the bounded resolver/fetch retry ceilings
    pub item_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            item_timeout: None,
        }
    }
}

impl OrchestratorConfig {
    /// Set the concurrency cap
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set a per-item pipeline deadline
    pub fn with_item_timeout(mut self, item_timeout: Duration) -> Self {
        self.item_timeout = Some(item_timeout);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(AppError::Configuration {
                reason: "worker_count must be at least 1".to_string(),
            });
        }
        if self.worker_count > workers::MAX_WORKER_COUNT {
            return Err(AppError::Configuration {
                reason: format!(
                    "worker_count {} exceeds the maximum of {}",
                    self.worker_count,
                    workers::MAX_WORKER_COUNT
                ),
            });
        }
        Ok(())
    }
}
