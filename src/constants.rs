//! Application constants for modpack_fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "modpack-fetcher/0.1.0 (Modpack Download Tool)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 16;
}

/// Retry and backoff configuration
pub mod limits {
    use super::Duration;

    /// HTTP status codes treated as transient and safe to retry
    pub const TRANSIENT_STATUSES: [u16; 3] = [500, 503, 504];

    /// Maximum fetch attempts per URL (initial attempt included)
    pub const FETCH_MAX_ATTEMPTS: u32 = 3;

    /// Fixed delay between fetch retries
    pub const FETCH_RETRY_DELAY: Duration = Duration::from_millis(2500);

    /// Delay between metadata polls while a file is still being indexed
    pub const INDEX_POLL_DELAY: Duration = Duration::from_secs(2);

    /// Maximum metadata polls before giving up on an unindexed file
    pub const INDEX_MAX_ATTEMPTS: u32 = 30;
}

/// Project-widget metadata API and download CDN
pub mod curse {
    /// Widget API base URL (one GET per project returns its file metadata)
    pub const WIDGET_API_BASE: &str = "https://api.cfwidget.com";

    /// CDN base URL for built file downloads
    pub const MEDIA_BASE: &str = "https://media.forgecdn.net";

    /// Status returned by the widget API while a project is still being indexed
    pub const QUEUED_STATUS: u16 = 202;
}

/// Forge installer artifact location
pub mod forge {
    /// Forge Maven repository base URL
    pub const MAVEN_BASE: &str = "https://maven.minecraftforge.net";

    /// Path under the Maven base holding installer artifacts
    pub const INSTALLER_PATH: &str = "net/minecraftforge/forge";
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".part";

    /// Subdirectory of the target directory that receives mod files
    pub const MODS_DIR: &str = "mods";
}

/// Worker and concurrency configuration
pub mod workers {
    /// Default number of concurrent download pipelines
    pub const DEFAULT_WORKER_COUNT: usize = 4;

    /// Maximum recommended concurrent pipelines
    pub const MAX_WORKER_COUNT: usize = 16;
}

// Re-export commonly used constants for convenience
pub use files::{MODS_DIR, TEMP_FILE_SUFFIX};
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::{FETCH_MAX_ATTEMPTS, FETCH_RETRY_DELAY, TRANSIENT_STATUSES};
pub use workers::DEFAULT_WORKER_COUNT;
