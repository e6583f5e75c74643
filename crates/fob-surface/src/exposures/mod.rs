//! Federated exposure maps.
//!
//! The map either comes from the caller ([`ExposureSource::Explicit`]) or
//! is discovered by scanning build configuration files
//! ([`ExposureSource::Discover`]). Every entry becomes an undocumented
//! `Exposure` record; string targets that exist on disk seed the walker.

mod heuristic;

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use indexmap::IndexMap;
use oxc_allocator::Allocator;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::IGNORED_DIRS;
use crate::error::{ExtractError, SurfaceError};
use crate::extract::ModuleExtraction;
use crate::extract::source::{parse_program, read_source};
use crate::report::{Category, ExportRecord};
use crate::resolver::{MODULE_SUFFIXES, ModuleResolver};

pub use heuristic::{
    EXPOSURE_KEY_PREFIX, EXPOSURE_KEY_RATIO, ExposureEntry, MatchKind, is_exposure_like,
    scan_exposures,
};

/// Where the exposure map comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExposureSource {
    /// Name → package-root-relative path, supplied by the caller.
    Explicit(IndexMap<String, String>),
    /// Scan configuration files. `config` restricts the scan to one file;
    /// otherwise every file under the package root matching `glob` is read.
    Discover {
        config: Option<PathBuf>,
        glob: String,
    },
}

/// Locates and expands a package's exposure map.
#[derive(Debug, Clone)]
pub struct ExposuresFinder {
    resolver: ModuleResolver,
}

impl ExposuresFinder {
    pub fn new(resolver: ModuleResolver) -> Self {
        Self { resolver }
    }

    /// Collect exposure records and the modules they point at.
    ///
    /// Only an invalid glob is fatal; unreadable configs and missing
    /// targets end up in the returned extraction's errors.
    pub async fn find(
        &self,
        package_root: &Path,
        source: &ExposureSource,
    ) -> Result<ModuleExtraction, SurfaceError> {
        let mut extraction = ModuleExtraction::default();
        match source {
            ExposureSource::Explicit(map) => {
                for (name, target) in map {
                    let entry = ExposureEntry {
                        name: name.clone(),
                        target: Some(target.clone()),
                    };
                    self.expose(package_root, entry, &mut extraction).await;
                }
            }
            ExposureSource::Discover { config, glob } => {
                let candidates = match config {
                    Some(config) => vec![package_root.join(config)],
                    None => discover_config_files(package_root, glob)?,
                };
                debug!(count = candidates.len(), "scanning configuration files");
                for candidate in candidates {
                    self.scan_config(&candidate, &mut extraction).await;
                }
            }
        }

        info!(
            exposures = extraction.records.len(),
            targets = extraction.discovered.len(),
            "exposure map collected"
        );
        Ok(extraction)
    }

    async fn scan_config(&self, config: &Path, extraction: &mut ModuleExtraction) {
        let source = match read_source(self.resolver.runtime().as_ref(), config).await {
            Ok(source) => source,
            Err(error) => {
                warn!(%error, "unreadable configuration file");
                extraction.errors.push(error);
                return;
            }
        };

        let found = {
            let allocator = Allocator::default();
            match parse_program(&allocator, config, &source) {
                Ok(program) => scan_exposures(&program),
                Err(error) => {
                    warn!(%error, "unparsable configuration file");
                    extraction.errors.push(error);
                    return;
                }
            }
        };

        let Some((kind, entries)) = found else {
            debug!(config = %config.display(), "no exposure map");
            return;
        };
        debug!(config = %config.display(), ?kind, entries = entries.len(), "exposure map found");

        let base_dir = config.parent().unwrap_or(config);
        for entry in entries {
            self.expose(base_dir, entry, extraction).await;
        }
    }

    async fn expose(&self, base_dir: &Path, entry: ExposureEntry, extraction: &mut ModuleExtraction) {
        extraction
            .records
            .push(ExportRecord::new(entry.name.clone(), Category::Exposure, false));

        let Some(target) = entry.target else {
            return;
        };
        match self.resolver.resolve(base_dir, &target, MODULE_SUFFIXES).await {
            Some(path) => extraction.discovered.push(path),
            None => extraction.errors.push(ExtractError::MissingExposureTarget {
                name: entry.name,
                target,
            }),
        }
    }
}

/// Configuration files under `root` matching `pattern`, sorted.
/// `node_modules` and `.git` are never entered.
pub fn discover_config_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, SurfaceError> {
    let matcher = compile_glob(pattern)?;
    let mut found = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !entry.file_type().is_dir()
            || !IGNORED_DIRS
                .iter()
                .any(|ignored| entry.file_name() == *ignored)
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) if error.depth() == 0 => {
                return Err(SurfaceError::Discovery {
                    root: root.to_path_buf(),
                    message: error.to_string(),
                });
            }
            Err(error) => {
                warn!(%error, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if matcher.is_match(relative) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, SurfaceError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|error| SurfaceError::InvalidGlob {
            pattern: pattern.to_string(),
            message: error.to_string(),
        })
}
