//! `package.json` loading and entry-point discovery.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::MAX_FILE_SIZE;
use crate::error::{Result, SurfaceError};
use crate::resolver::{FileKind, MODULE_SUFFIXES, ModuleResolver};
use crate::runtime::Runtime;

/// Manifest file name looked up in the package root.
pub const MANIFEST_FILE: &str = "package.json";

/// The subset of `package.json` the analyzer reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    pub main: Option<String>,
    pub module: Option<String>,
    /// String form only; the object form remaps files and names no entry.
    pub browser: Option<Value>,
    pub types: Option<String>,
    pub typings: Option<String>,
    pub exports: Option<Value>,
    /// File this was loaded from.
    #[serde(skip)]
    pub path: PathBuf,
}

/// Entry files split by extraction dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFileSet {
    pub value_entries: BTreeSet<PathBuf>,
    pub typed_entries: BTreeSet<PathBuf>,
}

impl EntryFileSet {
    /// Sort a file into the matching set; unsupported kinds are dropped.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        match FileKind::from_path(&path) {
            FileKind::Value => self.value_entries.insert(path),
            FileKind::Typed => self.typed_entries.insert(path),
            FileKind::Unsupported => false,
        }
    }

    /// Value entries first, then typed entries.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.value_entries.iter().chain(self.typed_entries.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.value_entries.is_empty() && self.typed_entries.is_empty()
    }
}

impl PackageManifest {
    /// Load `package.json` from `package_root`.
    pub async fn load(runtime: &dyn Runtime, package_root: &Path) -> Result<Self> {
        let path = package_root.join(MANIFEST_FILE);
        if !runtime.is_file(&path).await {
            return Err(SurfaceError::ManifestNotFound(path));
        }

        let invalid = |message: String| SurfaceError::InvalidManifest {
            path: path.clone(),
            message,
        };

        let bytes = runtime
            .read_file(&path)
            .await
            .map_err(|e| invalid(e.to_string()))?;
        if bytes.len() > MAX_FILE_SIZE {
            return Err(invalid(format!("file exceeds {MAX_FILE_SIZE} bytes")));
        }

        let mut manifest: Self =
            serde_json::from_slice(&bytes).map_err(|e| invalid(e.to_string()))?;
        manifest.path = path;
        Ok(manifest)
    }

    /// Package name for display, falling back to the directory name.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            return name.to_string();
        }
        self.path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown-package".to_string())
    }

    /// Entry paths named by the manifest, deduplicated, in field order:
    /// `main`, `module`, `browser`, `types`, `typings`, then `exports` leaves.
    pub fn entry_candidates(&self) -> Vec<String> {
        let mut candidates = IndexSet::new();
        for field in [&self.main, &self.module] {
            if let Some(value) = field {
                candidates.insert(value.clone());
            }
        }
        if let Some(Value::String(browser)) = &self.browser {
            candidates.insert(browser.clone());
        }
        for field in [&self.types, &self.typings] {
            if let Some(value) = field {
                candidates.insert(value.clone());
            }
        }
        if let Some(exports) = &self.exports {
            collect_export_leaves(exports, &mut candidates);
        }
        candidates.into_iter().collect()
    }

    /// Resolve entry candidates to existing files.
    ///
    /// Missing candidates are dropped with a warning. A manifest naming no
    /// entry at all falls back to `index.js` / `index.d.ts` in the root.
    pub async fn entry_files(&self, resolver: &ModuleResolver, package_root: &Path) -> EntryFileSet {
        let mut entries = EntryFileSet::default();
        let candidates = self.entry_candidates();

        if candidates.is_empty() {
            for fallback in ["index.js", "index.d.ts"] {
                let path = package_root.join(fallback);
                if resolver.runtime().is_file(&path).await {
                    entries.insert(path);
                }
            }
            debug!(count = entries.iter().count(), "using root index fallback");
            return entries;
        }

        for candidate in candidates {
            match resolver.resolve(package_root, &candidate, MODULE_SUFFIXES).await {
                Some(path) => {
                    if !entries.insert(path.clone()) {
                        debug!(path = %path.display(), "ignoring non-module entry");
                    }
                }
                None => warn!(candidate, "entry point does not exist"),
            }
        }
        entries
    }
}

fn collect_export_leaves(value: &Value, out: &mut IndexSet<String>) {
    match value {
        Value::String(path) if !path.contains('*') => {
            out.insert(path.clone());
        }
        Value::Array(items) => items.iter().for_each(|item| collect_export_leaves(item, out)),
        Value::Object(map) => map.values().for_each(|item| collect_export_leaves(item, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::NativeRuntime;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn manifest(json: &str) -> PackageManifest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_entry_candidates_order_and_dedup() {
        let manifest = manifest(
            r#"{
              "main": "./dist/index.cjs",
              "module": "./dist/index.js",
              "browser": { "./dist/node.js": "./dist/browser.js" },
              "types": "./dist/index.d.ts",
              "exports": {
                ".": { "import": "./dist/index.js", "types": "./dist/index.d.ts" },
                "./utils": ["./dist/utils.js"],
                "./features/*": "./dist/features/*.js"
              }
            }"#,
        );
        assert_eq!(
            manifest.entry_candidates(),
            vec![
                "./dist/index.cjs",
                "./dist/index.js",
                "./dist/index.d.ts",
                "./dist/utils.js",
            ]
        );
    }

    #[test]
    fn test_display_name_falls_back_to_directory() {
        let mut manifest = manifest(r#"{ "version": "1.0.0" }"#);
        manifest.path = PathBuf::from("/work/my-lib/package.json");
        assert_eq!(manifest.display_name(), "my-lib");
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let err = PackageManifest::load(&NativeRuntime::new(), temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, SurfaceError::ManifestNotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), "{ not json").unwrap();
        let err = PackageManifest::load(&NativeRuntime::new(), temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidManifest { .. }));
    }

    #[tokio::test]
    async fn test_entry_files_split_by_kind() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("dist")).unwrap();
        fs::write(temp.path().join("dist/index.js"), "").unwrap();
        fs::write(temp.path().join("dist/index.d.ts"), "").unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{ "name": "x", "main": "./dist/index", "types": "./dist/index.d.ts", "module": "./gone.js" }"#,
        )
        .unwrap();

        let runtime = NativeRuntime::new();
        let manifest = PackageManifest::load(&runtime, temp.path()).await.unwrap();
        let resolver = ModuleResolver::new(Arc::new(runtime));
        let entries = manifest.entry_files(&resolver, temp.path()).await;

        assert_eq!(
            entries.value_entries.into_iter().collect::<Vec<_>>(),
            vec![temp.path().join("dist/index.js")]
        );
        assert_eq!(
            entries.typed_entries.into_iter().collect::<Vec<_>>(),
            vec![temp.path().join("dist/index.d.ts")]
        );
    }

    #[tokio::test]
    async fn test_root_index_fallback() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.js"), "").unwrap();
        fs::write(temp.path().join("package.json"), r#"{ "name": "x" }"#).unwrap();

        let runtime = NativeRuntime::new();
        let manifest = PackageManifest::load(&runtime, temp.path()).await.unwrap();
        let resolver = ModuleResolver::new(Arc::new(runtime));
        let entries = manifest.entry_files(&resolver, temp.path()).await;
        assert_eq!(entries.iter().count(), 1);
        assert!(entries.value_entries.contains(&temp.path().join("index.js")));
    }
}
