//! Core application logic for modpack_fetcher
//!
//! This module contains the download pipeline components: manifest parsing,
//! URL resolution, the retrying HTTP fetcher, atomic file writes, and the
//! orchestrator that schedules them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use modpack_fetcher::app::{
//!     ClientConfig, Destination, FetchConfig, LookupConfig, Manifest, Orchestrator,
//!     OrchestratorConfig, RetryingFetcher, WidgetResolver,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = Manifest::load(Path::new("manifest.json"))?;
//! let client = ClientConfig::default().build_http_client()?;
//!
//! let resolver = Arc::new(WidgetResolver::new(client.clone(), LookupConfig::default()));
//! let fetcher = Arc::new(RetryingFetcher::new(client, FetchConfig::default()));
//! let orchestrator = Orchestrator::new(resolver, fetcher, OrchestratorConfig::default());
//!
//! let summary = orchestrator
//!     .run(manifest.items()?, |_| Destination::directory("mods"))
//!     .await?;
//! println!("{} downloaded, {} skipped", summary.succeeded, summary.skipped);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod manifest;
pub mod models;
pub mod orchestrator;
pub mod paths;
pub mod resolver;
pub mod writer;

// Re-export main public API
pub use client::{ClientConfig, FetchConfig, RetryingFetcher};
pub use manifest::Manifest;
pub use models::{
    Destination, DownloadOutcome, DownloadSummary, ItemDescriptor, ProviderKind, ResolvedTarget,
};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use resolver::{ForgeInstallerResolver, LookupConfig, UrlResolver, WidgetResolver};
