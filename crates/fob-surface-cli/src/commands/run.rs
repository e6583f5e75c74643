//! Run command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use fob_surface::{AnalyzeOptions, NativeRuntime, PackageManifest, SurfaceAnalyzer, SurfaceError};
use tracing::{info, warn};

use crate::cli::Cli;
use crate::config::SurfaceConfig;
use crate::error::{CliError, Result, ResultExt};
use crate::{output, ui};

/// Execute an analysis run.
///
/// # Steps
///
/// 1. Validate and canonicalize the package path
/// 2. Load configuration and `package.json`
/// 3. Discover entry points and analyze the package
/// 4. Write the timestamped report and echo it on stdout
///
/// # Errors
///
/// Fails only before analysis starts (missing path or manifest, bad
/// configuration) or when the report cannot be written. Problems found
/// while analyzing are recorded in the report instead.
pub async fn execute(args: Cli) -> Result<()> {
    let package_path = args.package_path.clone().ok_or(CliError::MissingPackagePath)?;
    let package_root = canonical_package_root(package_path).await?;
    let config = SurfaceConfig::load(&args, &package_root)?;

    let runtime = Arc::new(NativeRuntime::new());
    let manifest = PackageManifest::load(runtime.as_ref(), &package_root).await?;
    let analyzer = SurfaceAnalyzer::new(runtime);

    let entries = manifest.entry_files(analyzer.resolver(), &package_root).await;
    if entries.is_empty() {
        warn!("package.json names no existing entry point");
    }

    let package_name = manifest.display_name();
    info!(package = %package_name, root = %package_root.display(), "analyzing package");

    let options = AnalyzeOptions::new(&package_root, package_name)
        .with_version(manifest.version.clone())
        .with_entries(entries)
        .with_exposures(config.exposure_source())
        .with_max_modules(config.max_modules);
    let mut report = analyzer.analyze(options).await;

    let now = Local::now();
    report.generated_at = Some(now.to_rfc3339());
    let (path, json) = output::write_report(&config.out_dir, &report, now).await?;

    if config.echo {
        println!("{json}");
    }
    if !args.quiet {
        ui::print_summary(&report, &path);
    }
    Ok(())
}

async fn canonical_package_root(package_path: PathBuf) -> Result<PathBuf> {
    let is_dir = tokio::fs::metadata(&package_path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(SurfaceError::PackageNotFound(package_path).into());
    }
    tokio::fs::canonicalize(&package_path).await.with_path(&package_path)
}
