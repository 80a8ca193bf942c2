//! modpack_fetcher CLI application
//!
//! Command-line interface for downloading the artifacts a modpack manifest
//! enumerates. Features concurrent downloads, skip-if-present resume, and
//! per-item retry with a final summary report.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use modpack_fetcher::cli::{handle_download, Cli};
use modpack_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    // Per-item failures are reported in the summary and exit 0; only
    // pre-flight failures (manifest, paths) reach this branch.
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(&cli);

    info!("modpack_fetcher v{} starting", env!("CARGO_PKG_VERSION"));
    handle_download(cli).await
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::from_default_env().add_directive(
        format!("modpack_fetcher={}", cli.log_level())
            .parse()
            .expect("static logging directive is well-formed"),
    );

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.very_verbose)
        .init();
}
