//! Core data models for modpack_fetcher
//!
//! This module contains the value types that flow through a download run:
//! item descriptors parsed from the manifest, resolved download targets,
//! per-item outcomes, and the aggregated run summary.

use std::collections::HashMap;
use std::path::PathBuf;

use url::Url;

/// Which resolution strategy an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// A mod artifact resolved through the project-widget metadata API
    CurseMod,
    /// The Forge loader installer, resolved by pure URL templating
    ForgeInstaller,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::CurseMod => f.write_str("mod"),
            ProviderKind::ForgeInstaller => f.write_str("forge-installer"),
        }
    }
}

/// One logical artifact to acquire, parsed from a manifest entry
///
/// Immutable once created. The manifest yields one descriptor per `files`
/// entry, plus an optional synthetic entry for the loader installer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemDescriptor {
    /// Resolution strategy this item belongs to
    pub provider: ProviderKind,
    /// Project identifier (numeric id or slug, kept verbatim)
    pub project_ref: String,
    /// Requested file id; absent for the synthetic installer entry
    pub file_ref: Option<u64>,
    /// Minecraft version the pack targets
    pub minecraft_version: String,
}

impl ItemDescriptor {
    /// Descriptor for a mod artifact from a manifest `files` entry
    pub fn mod_file(
        project_ref: impl Into<String>,
        file_ref: u64,
        minecraft_version: impl Into<String>,
    ) -> Self {
        Self {
            provider: ProviderKind::CurseMod,
            project_ref: project_ref.into(),
            file_ref: Some(file_ref),
            minecraft_version: minecraft_version.into(),
        }
    }

    /// Synthetic descriptor for the loader installer
    pub fn loader_installer(minecraft_version: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::ForgeInstaller,
            project_ref: "forge".to_string(),
            file_ref: None,
            minecraft_version: minecraft_version.into(),
        }
    }

    /// Short human-readable label for progress lines and failure reports
    pub fn label(&self) -> String {
        match self.file_ref {
            Some(file_id) => format!("{}:{}", self.project_ref, file_id),
            None => format!("{} ({})", self.project_ref, self.minecraft_version),
        }
    }
}

/// A concrete download target produced by a resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Filename the artifact should be saved under
    pub filename: String,
    /// Concrete download URL
    pub url: Url,
}

/// A validated destination directory plus an optionally pre-known filename
///
/// When `filename` is known before resolution (installer batch, re-runs with
/// cached knowledge), the skip-if-present check runs before any network call.
/// Otherwise the check runs right after resolution, still before any fetch.
#[derive(Debug, Clone)]
pub struct Destination {
    /// Directory that receives the artifact
    pub dir: PathBuf,
    /// Target filename, if known ahead of resolution
    pub filename: Option<String>,
}

impl Destination {
    /// Destination with a filename only known after resolution
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            filename: None,
        }
    }

    /// Destination with a pre-known target filename
    pub fn file(dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: Some(filename.into()),
        }
    }

    /// Full target path, if the filename is already known
    pub fn known_path(&self) -> Option<PathBuf> {
        self.filename.as_ref().map(|name| self.dir.join(name))
    }

    /// Full target path for a resolved filename
    pub fn resolved_path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

/// Terminal state of one dispatched item
///
/// Exactly one outcome is produced per item; outcomes are never mutated
/// after creation.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Destination already existed; no network call was made past this point
    Skipped,
    /// Artifact fully written and visible at its final path
    Succeeded,
    /// Resolver could not produce a download URL
    ResolutionFailed(crate::errors::ResolutionError),
    /// Fetch failed after classification and bounded retries
    FetchFailed(crate::errors::FetchError),
    /// Body streaming or the atomic rename failed
    WriteFailed(crate::errors::WriteError),
    /// The per-item deadline elapsed before the pipeline finished
    DeadlineExceeded(std::time::Duration),
    /// The run was cancelled before this item was dispatched
    Cancelled,
}

impl DownloadOutcome {
    /// Failure reason, if this outcome is a failure
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            DownloadOutcome::ResolutionFailed(e) => Some(format!("resolution failed: {}", e)),
            DownloadOutcome::FetchFailed(e) => Some(format!("fetch failed: {}", e)),
            DownloadOutcome::WriteFailed(e) => Some(format!("write failed: {}", e)),
            DownloadOutcome::DeadlineExceeded(limit) => {
                Some(format!("item deadline of {:?} exceeded", limit))
            }
            _ => None,
        }
    }
}

/// Aggregated result of one batch run
///
/// Accumulated by the orchestrator's single collector; failure is item-scoped,
/// so a summary with failures still represents a completed dispatch.
#[derive(Debug, Default)]
pub struct DownloadSummary {
    /// Items fully downloaded in this run
    pub succeeded: usize,
    /// Items whose destination already existed
    pub skipped: usize,
    /// Items never dispatched because the run was cancelled
    pub cancelled: usize,
    /// Failed items with their human-readable reasons
    pub failed: HashMap<ItemDescriptor, String>,
}

impl DownloadSummary {
    /// Record one item outcome
    pub fn record(&mut self, item: ItemDescriptor, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Succeeded => self.succeeded += 1,
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Cancelled => self.cancelled += 1,
            ref failure => {
                let reason = failure
                    .failure_reason()
                    .unwrap_or_else(|| "unknown failure".to_string());
                self.failed.insert(item, reason);
            }
        }
    }

    /// Total items accounted for
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.cancelled + self.failed.len()
    }

    /// Whether every dispatched item either succeeded or was skipped
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.cancelled == 0
    }

    /// Fold another batch's summary into this one
    pub fn merge(&mut self, other: DownloadSummary) {
        self.succeeded += other.succeeded;
        self.skipped += other.skipped;
        self.cancelled += other.cancelled;
        self.failed.extend(other.failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FetchError;

    #[test]
    fn test_descriptor_label() {
        let item = ItemDescriptor::mod_file("238222", 3040523, "1.16.4");
        assert_eq!(item.label(), "238222:3040523");

        let installer = ItemDescriptor::loader_installer("1.16.4");
        assert_eq!(installer.label(), "forge (1.16.4)");
        assert_eq!(installer.provider, ProviderKind::ForgeInstaller);
        assert!(installer.file_ref.is_none());
    }

    #[test]
    fn test_destination_paths() {
        let dir_only = Destination::directory("/packs/mods");
        assert!(dir_only.known_path().is_none());
        assert_eq!(
            dir_only.resolved_path("jei.jar"),
            PathBuf::from("/packs/mods/jei.jar")
        );

        let pinned = Destination::file("/packs", "forge-installer.jar");
        assert_eq!(
            pinned.known_path(),
            Some(PathBuf::from("/packs/forge-installer.jar"))
        );
    }

    #[test]
    fn test_summary_records_mutually_exclusive_outcomes() {
        let mut summary = DownloadSummary::default();
        let ok = ItemDescriptor::mod_file("1", 100, "1.16.4");
        let skip = ItemDescriptor::mod_file("2", 200, "1.16.4");
        let bad = ItemDescriptor::mod_file("3", 300, "1.16.4");

        summary.record(ok, DownloadOutcome::Succeeded);
        summary.record(skip, DownloadOutcome::Skipped);
        summary.record(
            bad.clone(),
            DownloadOutcome::FetchFailed(FetchError::HttpStatus { status: 404 }),
        );

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_clean());
        assert!(summary.failed[&bad].contains("404"));
    }

    #[test]
    fn test_summary_merge() {
        let mut first = DownloadSummary {
            succeeded: 2,
            skipped: 1,
            ..Default::default()
        };
        let mut second = DownloadSummary::default();
        second.record(
            ItemDescriptor::loader_installer("1.16.4"),
            DownloadOutcome::Succeeded,
        );

        first.merge(second);
        assert_eq!(first.succeeded, 3);
        assert_eq!(first.skipped, 1);
        assert!(first.is_clean());
    }
}
