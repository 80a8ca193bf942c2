//! Command-line argument parsing for modpack_fetcher
//!
//! This module defines the CLI structure using clap derive macros. The CLI
//! is plumbing only: it validates paths, loads the manifest, and hands the
//! core a set of item descriptors and destinations.

use std::path::PathBuf;

use clap::Parser;

use crate::constants::workers;

/// Modpack Fetcher - download the artifacts a modpack manifest enumerates
#[derive(Parser, Debug)]
#[command(
    name = "modpack_fetcher",
    version,
    about = "Download the mods and loader installer a modpack manifest requires",
    long_about = "Downloads every artifact a CurseForge-style modpack manifest enumerates.
Already-present files are skipped, so an interrupted run can simply be restarted."
)]
pub struct Cli {
    /// Mod manifest file location
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Target download location (defaults to the manifest's directory)
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Also download the required Forge installer
    #[arg(short = 'f', long)]
    pub include_forge: bool,

    /// Number of concurrent download pipelines
    #[arg(short = 'w', long, default_value_t = workers::DEFAULT_WORKER_COUNT)]
    pub workers: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long)]
    pub very_verbose: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level directive derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.very_verbose {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}
