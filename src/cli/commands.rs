//! Download command handling
//!
//! Pre-flight (manifest parsing, path validation, directory creation) happens
//! here and is the only part of a run that can fail the whole process; once
//! dispatch starts, failures are item-scoped and land in the summary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::app::models::{Destination, DownloadSummary, ItemDescriptor};
use crate::app::resolver::{ForgeInstallerResolver, WidgetResolver};
use crate::app::{
    paths, ClientConfig, FetchConfig, LookupConfig, Manifest, Orchestrator, OrchestratorConfig,
    RetryingFetcher,
};
use crate::cli::args::Cli;
use crate::constants::files;
use crate::errors::{AppError, ManifestError, Result};

/// Run the download command end to end
///
/// Exit semantics: any error returned here is fatal (manifest parse, invalid
/// destination); a run that completed dispatch returns `Ok` even when the
/// summary contains per-item failures.
pub async fn handle_download(cli: Cli) -> Result<()> {
    let manifest_path = paths::full_path(&cli.manifest);
    if !paths::is_valid(&manifest_path) {
        return Err(ManifestError::NotFound {
            path: manifest_path,
        }
        .into());
    }
    let manifest = Manifest::load(&manifest_path)?;
    info!(
        "Loaded manifest '{}' v{} ({} mods)",
        manifest.name,
        manifest.version,
        manifest.files.len()
    );

    let target_dir = resolve_target_dir(&cli, &manifest_path)?;
    let mods_dir = target_dir.join(files::MODS_DIR);
    std::fs::create_dir_all(&mods_dir)?;
    if !paths::is_valid(&mods_dir) {
        return Err(AppError::InvalidDestination { path: mods_dir });
    }

    let client = ClientConfig::default().build_http_client()?;
    let fetcher = Arc::new(RetryingFetcher::new(client.clone(), FetchConfig::default()));
    let config = OrchestratorConfig::default().with_worker_count(cli.workers);

    // One token shared by every batch, triggered by CTRL-C
    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    // Mod batch: lookup strategy into <target>/mods
    let resolver = Arc::new(WidgetResolver::new(client, LookupConfig::default()));
    let orchestrator = Orchestrator::new(resolver, fetcher.clone(), config.clone())
        .with_cancellation_token(cancel.clone());

    let items = manifest.items()?;
    let mods_destination = mods_dir.clone();
    let mut summary = orchestrator
        .run(items, move |_| {
            Destination::directory(mods_destination.clone())
        })
        .await?;

    // Installer batch: direct strategy next to the mods folder
    if cli.include_forge && !cancel.is_cancelled() {
        summary.merge(run_installer_batch(&manifest, &target_dir, &fetcher, &config, &cancel).await?);
    }

    render_summary(&summary);
    Ok(())
}

/// Target directory: `--directory` if given, otherwise the manifest's parent
fn resolve_target_dir(cli: &Cli, manifest_path: &Path) -> Result<PathBuf> {
    let target = match &cli.directory {
        Some(dir) => paths::full_path(dir),
        None => manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    std::fs::create_dir_all(&target)?;
    if !paths::is_valid(&target) {
        return Err(AppError::InvalidDestination { path: target });
    }
    Ok(target)
}

/// Second batch downloading the Forge installer via the direct strategy
async fn run_installer_batch(
    manifest: &Manifest,
    target_dir: &Path,
    fetcher: &Arc<RetryingFetcher>,
    config: &OrchestratorConfig,
    cancel: &CancellationToken,
) -> Result<DownloadSummary> {
    let forge_version = manifest.forge_version()?.to_string();
    let minecraft_version = manifest.minecraft.version.clone();
    info!(
        "Including Forge installer {} for Minecraft {}",
        forge_version, minecraft_version
    );

    let resolver = Arc::new(ForgeInstallerResolver::new(forge_version.clone()));
    let orchestrator = Orchestrator::new(resolver, fetcher.clone(), config.clone())
        .with_cancellation_token(cancel.clone());

    // The installer filename is known up front, so skip-if-present decides
    // before any network call.
    let installer_name =
        ForgeInstallerResolver::installer_filename(&minecraft_version, &forge_version);
    let installer_dir = target_dir.to_path_buf();
    orchestrator
        .run(
            vec![ItemDescriptor::loader_installer(minecraft_version)],
            move |_| Destination::file(installer_dir.clone(), installer_name.clone()),
        )
        .await
}

/// Trigger cancellation on CTRL-C; a second CTRL-C kills the process
fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight downloads");
            cancel.cancel();
        }
    });
}

/// Render the run summary as plain text
fn render_summary(summary: &DownloadSummary) {
    let mut failures: Vec<_> = summary
        .failed
        .iter()
        .map(|(item, reason)| format!("  {}: {}", item.label(), reason))
        .collect();
    failures.sort();
    for line in &failures {
        println!("failed {}", line.trim_start());
    }

    println!(
        "done: {} downloaded, {} skipped, {} failed, {} cancelled",
        summary.succeeded,
        summary.skipped,
        summary.failed.len(),
        summary.cancelled
    );
}
