//! Shared test utilities for fob-surface integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fob_surface::{
    AnalyzeOptions, ExposureSource, NativeRuntime, PackageManifest, Report, SurfaceAnalyzer,
};
use tempfile::TempDir;

/// Create a throwaway package from `(relative path, contents)` pairs.
pub fn create_package(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (rel, content) in files {
        let path = temp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    temp
}

/// Run the full manifest → analysis flow the CLI uses.
pub async fn analyze_package(root: &Path, exposures: Option<ExposureSource>) -> Report {
    let runtime = Arc::new(NativeRuntime::new());
    let manifest = PackageManifest::load(runtime.as_ref(), root)
        .await
        .expect("package.json should load");

    let analyzer = SurfaceAnalyzer::new(runtime);
    let entries = manifest.entry_files(analyzer.resolver(), root).await;
    let mut options = AnalyzeOptions::new(root, manifest.display_name())
        .with_version(manifest.version.clone())
        .with_entries(entries);
    if let Some(exposures) = exposures {
        options = options.with_exposures(exposures);
    }
    analyzer.analyze(options).await
}
