//! Error types for modpack_fetcher
//!
//! This module defines error types for all components of the application.
//! Every per-item error (resolution, fetch, write) is recovered at the
//! orchestrator boundary and recorded in the run summary; only manifest
//! parsing and destination validation are fatal to the whole process.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving an item descriptor to a download URL
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// A version string could not be templated into a URL
    #[error("Invalid version string: {value:?}")]
    InvalidVersion { value: String },

    /// The metadata service never finished indexing the requested project
    #[error("Project {project} still not indexed after {attempts} polls")]
    NeverIndexed { project: String, attempts: u32 },

    /// Metadata was available but contained no record for the requested file
    #[error("File {file_id} not found in metadata for project {project}")]
    FileNotFound { project: String, file_id: u64 },

    /// Metadata was present but could not be interpreted
    #[error("Malformed metadata for project {project}: {reason}")]
    MalformedMetadata { project: String, reason: String },

    /// The metadata service answered with an unexpected HTTP status
    #[error("Metadata request for project {project} returned HTTP {status}")]
    UnexpectedStatus { project: String, status: u16 },

    /// The descriptor cannot be handled by the selected resolver
    #[error("Descriptor not supported by this resolver: {reason}")]
    UnsupportedDescriptor { reason: String },

    /// Transport failure while talking to the metadata service
    #[error("Metadata request failed")]
    Http(#[from] reqwest::Error),
}

/// Errors produced while fetching a resolved download URL
#[derive(Error, Debug)]
pub enum FetchError {
    /// Every attempt hit a transient status; the last one is preserved
    #[error("Retries exhausted after {attempts} attempts (last status: {last_status})")]
    RetriesExhausted { attempts: u32, last_status: u16 },

    /// Non-transient, non-success HTTP status; not retried
    #[error("Server returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// Transport-level failure (timeout, refused connection, TLS, redirects)
    #[error("Transport failure ({kind})")]
    Transport {
        kind: TransportKind,
        #[source]
        source: reqwest::Error,
    },
}

/// Classification of transport-level failures, preserved for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Redirect,
    Other,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransportKind::Timeout => "timeout",
            TransportKind::Connect => "connect",
            TransportKind::Redirect => "redirect",
            TransportKind::Other => "other",
        };
        f.write_str(label)
    }
}

impl TransportKind {
    /// Classify a reqwest transport error
    pub fn from_error(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportKind::Timeout
        } else if err.is_connect() {
            TransportKind::Connect
        } else if err.is_redirect() {
            TransportKind::Redirect
        } else {
            TransportKind::Other
        }
    }
}

/// Errors produced while persisting a response body to disk
#[derive(Error, Debug)]
pub enum WriteError {
    /// File I/O failure while creating or writing the temporary file
    #[error("File I/O error")]
    Io(#[from] std::io::Error),

    /// The response body stream failed mid-copy
    #[error("Response stream failed mid-copy")]
    Stream(#[source] reqwest::Error),

    /// The finished temporary file could not be renamed into place
    #[error("Could not rename {temp_path} to {final_path}")]
    Rename {
        temp_path: PathBuf,
        final_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Manifest parsing and validation errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found or unreadable
    #[error("Manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// JSON parsing error
    #[error("JSON parsing error in manifest")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error reading manifest
    #[error("I/O error reading manifest")]
    Io(#[from] std::io::Error),

    /// No usable mod loader entry in the manifest
    #[error("Manifest declares no {expected} mod loader")]
    NoLoader { expected: String },

    /// A project or file id was neither an integer nor a numeric string
    #[error("Invalid {field} in manifest entry: {value:?}")]
    InvalidId { field: &'static str, value: String },
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Destination path invalid or not writable (pre-flight)
    #[error("Invalid destination path: {path}")]
    InvalidDestination { path: PathBuf },

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// HTTP client construction failure
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Invalid component configuration
    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Resolution(_) => "resolution",
            AppError::Fetch(_) => "fetch",
            AppError::Write(_) => "write",
            AppError::Manifest(_) => "manifest",
            AppError::InvalidDestination { .. } => "destination",
            AppError::Io(_) => "io",
            AppError::ClientBuild(_) => "client",
            AppError::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Resolution result type alias
pub type ResolutionResult<T> = std::result::Result<T, ResolutionError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Write result type alias
pub type WriteResult<T> = std::result::Result<T, WriteError>;

/// Manifest result type alias
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;
