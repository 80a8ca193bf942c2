//! Command-line interface for modpack_fetcher
//!
//! Argument parsing and command handling. Everything here is plumbing around
//! the core in [`crate::app`]: it validates inputs, wires the components
//! together, and renders the run summary.

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::handle_download;
