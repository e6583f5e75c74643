//! Module resolution for surface analysis.
//!
//! Relative specifiers are resolved by suffix probing against the runtime;
//! bare specifiers go through `oxc_resolver` from the importing directory
//! (see [`node_modules`]).

pub mod extensions;
mod node_modules;

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use oxc_resolver::Resolver;
use path_clean::clean;

use crate::runtime::Runtime;

pub use extensions::{
    DECLARATION_FIRST_SUFFIXES, FileKind, MODULE_SUFFIXES, TYPED_SUFFIXES, VALUE_SUFFIXES,
};

/// Returns `true` for `./x`, `../x`, `.` and `..`.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Locates the concrete file behind a module specifier.
#[derive(Clone)]
pub struct ModuleResolver {
    runtime: Arc<dyn Runtime>,
    packages: Arc<Resolver>,
}

impl fmt::Debug for ModuleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleResolver")
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}

impl ModuleResolver {
    /// Create a resolver that probes the filesystem through `runtime`.
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        Self {
            runtime,
            packages: node_modules::package_resolver(),
        }
    }

    /// The runtime used for existence checks.
    pub fn runtime(&self) -> &Arc<dyn Runtime> {
        &self.runtime
    }

    /// Resolve `specifier` against `base_dir`, first hit wins:
    ///
    /// 1. `base_dir/specifier + suffix` for each suffix, in order
    /// 2. `base_dir/specifier/index + suffix` for each suffix
    /// 3. `base_dir/specifier` verbatim
    /// 4. if the specifier names a compiled file (`./a.js`), step 1 on its stem
    ///
    /// Only existing files are ever returned.
    pub async fn resolve(
        &self,
        base_dir: &Path,
        specifier: &str,
        suffixes: &[&str],
    ) -> Option<PathBuf> {
        let candidate = base_dir.join(specifier);

        if let Some(hit) = self.first_with_suffix(&candidate, suffixes).await {
            return Some(hit);
        }

        for suffix in suffixes {
            let index = candidate.join(format!("index{suffix}"));
            if self.runtime.is_file(&index).await {
                return Some(clean(&index));
            }
        }

        if self.runtime.is_file(&candidate).await {
            return Some(clean(&candidate));
        }

        if let Some(stem) = extensions::strip_value_extension(specifier) {
            return self.first_with_suffix(&base_dir.join(stem), suffixes).await;
        }

        None
    }

    /// Resolve an import written in `from_file`.
    ///
    /// Relative specifiers go through [`resolve`](Self::resolve); bare ones
    /// through Node package resolution with `types` conditions first.
    pub async fn resolve_import(
        &self,
        from_file: &Path,
        specifier: &str,
        suffixes: &[&str],
    ) -> Option<PathBuf> {
        let from_dir = from_file.parent().unwrap_or_else(|| Path::new("."));
        if is_relative_specifier(specifier) || Path::new(specifier).is_absolute() {
            self.resolve(from_dir, specifier, suffixes).await
        } else {
            node_modules::resolve_bare(self, from_dir, specifier).await
        }
    }

    async fn first_with_suffix(&self, candidate: &Path, suffixes: &[&str]) -> Option<PathBuf> {
        for suffix in suffixes {
            let path = with_suffix(candidate, suffix);
            if self.runtime.is_file(&path).await {
                return Some(clean(&path));
            }
        }
        None
    }
}

/// Append `suffix` to the final path component (`a.config` + `.js`).
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(suffix);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::NativeRuntime;
    use std::fs;
    use tempfile::TempDir;

    fn resolver() -> ModuleResolver {
        ModuleResolver::new(Arc::new(NativeRuntime::new()))
    }

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_relative_specifiers() {
        assert!(is_relative_specifier("./a"));
        assert!(is_relative_specifier("../a"));
        assert!(is_relative_specifier("."));
        assert!(is_relative_specifier(".."));
        assert!(!is_relative_specifier("react"));
        assert!(!is_relative_specifier("@scope/pkg"));
        assert!(!is_relative_specifier(".hidden"));
    }

    #[tokio::test]
    async fn test_first_suffix_wins() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "x.a");
        touch(temp.path(), "x.b");

        let hit = resolver().resolve(temp.path(), "./x", &[".a", ".b"]).await;
        assert_eq!(hit, Some(temp.path().join("x.a")));

        let hit = resolver().resolve(temp.path(), "./x", &[".b", ".a"]).await;
        assert_eq!(hit, Some(temp.path().join("x.b")));
    }

    #[tokio::test]
    async fn test_suffix_beats_index_file() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "lib.js");
        touch(temp.path(), "lib/index.js");

        let hit = resolver().resolve(temp.path(), "./lib", MODULE_SUFFIXES).await;
        assert_eq!(hit, Some(temp.path().join("lib.js")));
    }

    #[tokio::test]
    async fn test_index_fallback() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "lib/index.d.ts");

        let hit = resolver().resolve(temp.path(), "./lib", MODULE_SUFFIXES).await;
        assert_eq!(hit, Some(temp.path().join("lib/index.d.ts")));
    }

    #[tokio::test]
    async fn test_verbatim_path_with_extension() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/util.js");

        let hit = resolver()
            .resolve(&temp.path().join("src"), "./util.js", MODULE_SUFFIXES)
            .await;
        assert_eq!(hit, Some(temp.path().join("src/util.js")));
    }

    #[tokio::test]
    async fn test_compiled_name_maps_to_declaration() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "types.d.ts");

        let hit = resolver().resolve(temp.path(), "./types.js", MODULE_SUFFIXES).await;
        assert_eq!(hit, Some(temp.path().join("types.d.ts")));
    }

    #[tokio::test]
    async fn test_parent_segments_are_cleaned() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "shared.js");
        touch(temp.path(), "src/index.js");

        let hit = resolver()
            .resolve(&temp.path().join("src"), "../shared", MODULE_SUFFIXES)
            .await;
        assert_eq!(hit, Some(temp.path().join("shared.js")));
    }

    #[tokio::test]
    async fn test_missing_target_and_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("empty")).unwrap();

        assert_eq!(resolver().resolve(temp.path(), "./nope", MODULE_SUFFIXES).await, None);
        assert_eq!(resolver().resolve(temp.path(), "./empty", MODULE_SUFFIXES).await, None);
    }
}
