//! Modpack manifest parsing
//!
//! This module reads the CurseForge-style JSON manifest that enumerates a
//! pack's required artifacts and its loader version, and turns it into the
//! item descriptors the orchestrator dispatches. Manifest authors emit
//! `projectID`/`fileID` as either JSON integers or numeric strings, so both
//! are accepted.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::app::models::ItemDescriptor;
use crate::errors::{ManifestError, ManifestResult};

/// Loader id prefix expected in `minecraft.modLoaders`
const FORGE_ID_PREFIX: &str = "forge-";

/// A parsed modpack manifest
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Pack name
    pub name: String,
    /// Pack version
    pub version: String,
    /// Minecraft section (game version + loaders)
    pub minecraft: MinecraftSection,
    /// Required artifacts
    pub files: Vec<FileEntry>,
}

/// The `minecraft` section of the manifest
#[derive(Debug, Clone, Deserialize)]
pub struct MinecraftSection {
    /// Game version the pack targets (e.g. "1.16.4")
    pub version: String,
    /// Declared mod loaders
    #[serde(rename = "modLoaders", default)]
    pub mod_loaders: Vec<ModLoader>,
}

/// One declared mod loader, e.g. `{"id": "forge-36.2.39", "primary": true}`
#[derive(Debug, Clone, Deserialize)]
pub struct ModLoader {
    /// Loader identifier
    pub id: String,
    /// Whether this loader is the pack's primary one
    #[serde(default)]
    pub primary: bool,
}

/// One required artifact entry
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "projectID")]
    project_id: IdValue,
    #[serde(rename = "fileID")]
    file_id: IdValue,
}

/// Manifest id that may be a JSON integer or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Int(u64),
    Str(String),
}

impl IdValue {
    fn as_string(&self) -> String {
        match self {
            IdValue::Int(n) => n.to_string(),
            IdValue::Str(s) => s.clone(),
        }
    }

    fn as_u64(&self, field: &'static str) -> ManifestResult<u64> {
        match self {
            IdValue::Int(n) => Ok(*n),
            IdValue::Str(s) => s.trim().parse().map_err(|_| ManifestError::InvalidId {
                field,
                value: s.clone(),
            }),
        }
    }
}

impl FileEntry {
    /// Project reference, kept verbatim (numeric id or slug)
    pub fn project_ref(&self) -> String {
        self.project_id.as_string()
    }

    /// Numeric file id
    pub fn file_id(&self) -> ManifestResult<u64> {
        self.file_id.as_u64("fileID")
    }
}

impl Manifest {
    /// Load and parse a manifest file
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::NotFound` if the path does not exist and
    /// `ManifestError::JsonParse` on malformed JSON. Both are fatal to the
    /// run before any download is dispatched.
    pub fn load(path: &Path) -> ManifestResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ManifestError::Io(e)
            }
        })?;
        let manifest: Manifest = serde_json::from_str(&content)?;
        debug!(
            "Loaded manifest '{}' v{} with {} file entries",
            manifest.name,
            manifest.version,
            manifest.files.len()
        );
        Ok(manifest)
    }

    /// Forge loader version declared by the pack
    ///
    /// Prefers the loader marked `primary`, otherwise takes the first entry
    /// carrying the `forge-` prefix.
    pub fn forge_version(&self) -> ManifestResult<&str> {
        let forge_loaders = || {
            self.minecraft
                .mod_loaders
                .iter()
                .filter(|loader| loader.id.starts_with(FORGE_ID_PREFIX))
        };
        forge_loaders()
            .find(|loader| loader.primary)
            .or_else(|| forge_loaders().next())
            .map(|loader| &loader.id[FORGE_ID_PREFIX.len()..])
            .ok_or_else(|| ManifestError::NoLoader {
                expected: "forge".to_string(),
            })
    }

    /// Item descriptors for every `files` entry
    pub fn items(&self) -> ManifestResult<Vec<ItemDescriptor>> {
        self.files
            .iter()
            .map(|entry| {
                Ok(ItemDescriptor::mod_file(
                    entry.project_ref(),
                    entry.file_id()?,
                    self.minecraft.version.clone(),
                ))
            })
            .collect()
    }
}
