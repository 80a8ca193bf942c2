//! HTTP client construction and the retrying fetcher
//!
//! The client configuration builds one shared `reqwest::Client`; the
//! [`RetryingFetcher`] layers the bounded transient-status retry loop on top
//! of it and hands open responses to the file writer.

pub mod config;
pub mod fetch;

pub use config::ClientConfig;
pub use fetch::{is_transient, FetchConfig, RetryingFetcher};
