//! Modpack Fetcher Library
//!
//! A Rust library for downloading the artifacts a Minecraft modpack manifest
//! enumerates. Provides concurrent downloads with bounded retries,
//! skip-if-present resume semantics, and atomic file writes.

pub mod app;
pub mod cli;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_WORKER_COUNT, 4);
        assert!(USER_AGENT.contains("modpack-fetcher"));
        assert_eq!(TRANSIENT_STATUSES, [500, 503, 504]);
    }

    #[test]
    fn test_error_types() {
        let fetch_error = errors::FetchError::HttpStatus { status: 404 };
        let app_error = AppError::Fetch(fetch_error);
        assert_eq!(app_error.category(), "fetch");
    }
}
