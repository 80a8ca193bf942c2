//! URL resolution strategies
//!
//! A resolver turns a logical item descriptor into a concrete download URL
//! and filename. Two implementations exist, selected once per run: the
//! direct-template [`ForgeInstallerResolver`] (pure string templating, no
//! network) and the lookup-based [`WidgetResolver`] (one metadata request per
//! descriptor with retry-until-indexed semantics).

pub mod direct;
pub mod lookup;

use async_trait::async_trait;

use crate::app::models::{ItemDescriptor, ResolvedTarget};
use crate::errors::ResolutionResult;

pub use direct::ForgeInstallerResolver;
pub use lookup::{LookupConfig, WidgetResolver};

/// Resolution seam between the orchestrator and provider-specific lookup
#[async_trait]
pub trait UrlResolver: Send + Sync {
    /// Produce a download URL and destination filename for one item
    async fn resolve(&self, item: &ItemDescriptor) -> ResolutionResult<ResolvedTarget>;
}
