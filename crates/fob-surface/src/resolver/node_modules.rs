//! Bare-specifier lookup through `node_modules`.
//!
//! Only used for type-level alias resolution: the goal is to find the file
//! that declares a dependency's symbols so it can be reported as external.
//! Package layout (`exports` conditions, main fields, index files) is left
//! to `oxc_resolver`; DefinitelyTyped packages are tried when the package
//! itself does not resolve.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use oxc_resolver::{ResolveOptions, Resolver};
use tracing::trace;

use super::extensions::{FileKind, strip_value_extension};
use super::{DECLARATION_FIRST_SUFFIXES, ModuleResolver};

/// `exports` conditions, in priority order.
const CONDITION_NAMES: &[&str] = &["types", "import", "default"];

/// Package manifest fields consulted when there is no `exports` map.
const MAIN_FIELDS: &[&str] = &["types", "typings", "main"];

/// Declaration siblings looked for next to a resolved `.js` file.
const DECLARATION_SUFFIXES: &[&str] = &[".d.ts", ".d.mts", ".d.cts"];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Resolver configured for declaration lookup.
pub(super) fn package_resolver() -> Arc<Resolver> {
    Arc::new(Resolver::new(ResolveOptions {
        condition_names: owned(CONDITION_NAMES),
        main_fields: owned(MAIN_FIELDS),
        extensions: owned(DECLARATION_FIRST_SUFFIXES),
        symlinks: false,
        ..Default::default()
    }))
}

pub(super) async fn resolve_bare(
    resolver: &ModuleResolver,
    from_dir: &Path,
    specifier: &str,
) -> Option<PathBuf> {
    let (package, subpath) = split_bare_specifier(specifier)?;
    let mut candidates = vec![specifier.to_string()];
    if let Some(types) = types_package_name(package) {
        candidates.push(match subpath {
            Some(subpath) => format!("{types}/{subpath}"),
            None => types,
        });
    }

    for candidate in candidates {
        let packages = Arc::clone(&resolver.packages);
        let dir = from_dir.to_path_buf();
        let request = candidate.clone();
        let outcome =
            tokio::task::spawn_blocking(move || packages.resolve(&dir, &request)).await;

        match outcome {
            Ok(Ok(resolution)) => {
                let hit = prefer_declaration(resolver, resolution.into_path_buf()).await;
                trace!(specifier, resolved = %hit.display(), "resolved bare specifier");
                return Some(hit);
            }
            Ok(Err(error)) => trace!(specifier = %candidate, %error, "bare specifier not resolved"),
            Err(error) => trace!(specifier = %candidate, %error, "resolution task failed"),
        }
    }
    None
}

/// `dist/index.js` → `dist/index.d.ts` when the declaration exists.
async fn prefer_declaration(resolver: &ModuleResolver, path: PathBuf) -> PathBuf {
    if FileKind::from_path(&path) != FileKind::Value {
        return path;
    }
    let Some(stem) = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(strip_value_extension)
    else {
        return path;
    };
    let candidate = path.with_file_name(stem);
    match resolver.first_with_suffix(&candidate, DECLARATION_SUFFIXES).await {
        Some(declaration) => declaration,
        None => path,
    }
}

/// Split `@scope/name/sub` into (`@scope/name`, `Some("sub")`).
fn split_bare_specifier(specifier: &str) -> Option<(&str, Option<&str>)> {
    if specifier.is_empty() || specifier.contains(':') {
        return None;
    }
    let boundary = if specifier.starts_with('@') {
        let first = specifier.find('/')?;
        specifier[first + 1..].find('/').map(|second| first + 1 + second)
    } else {
        specifier.find('/')
    };
    match boundary {
        Some(index) => {
            let subpath = &specifier[index + 1..];
            Some((&specifier[..index], (!subpath.is_empty()).then_some(subpath)))
        }
        None => Some((specifier, None)),
    }
}

/// `@scope/name` → `@types/scope__name`, `name` → `@types/name`.
fn types_package_name(package: &str) -> Option<String> {
    if package.starts_with("@types/") {
        return None;
    }
    match package.strip_prefix('@') {
        Some(scoped) => Some(format!("@types/{}", scoped.replacen('/', "__", 1))),
        None => Some(format!("@types/{package}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::NativeRuntime;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, files: &[(&str, &str)]) {
        for (rel, content) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    fn resolver() -> ModuleResolver {
        ModuleResolver::new(Arc::new(NativeRuntime::new()))
    }

    #[test]
    fn test_split_bare_specifier() {
        assert_eq!(split_bare_specifier("react"), Some(("react", None)));
        assert_eq!(
            split_bare_specifier("react/jsx-runtime"),
            Some(("react", Some("jsx-runtime")))
        );
        assert_eq!(split_bare_specifier("@scope/pkg"), Some(("@scope/pkg", None)));
        assert_eq!(
            split_bare_specifier("@scope/pkg/deep/path"),
            Some(("@scope/pkg", Some("deep/path")))
        );
        assert_eq!(split_bare_specifier("node:fs"), None);
        assert_eq!(split_bare_specifier("@scope"), None);
    }

    #[test]
    fn test_types_package_name() {
        assert_eq!(types_package_name("react").as_deref(), Some("@types/react"));
        assert_eq!(
            types_package_name("@babel/core").as_deref(),
            Some("@types/babel__core")
        );
        assert_eq!(types_package_name("@types/node"), None);
    }

    #[tokio::test]
    async fn test_resolves_types_field_from_ancestor() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            &[
                ("node_modules/dep/package.json", r#"{"types": "./lib/main.d.ts"}"#),
                ("node_modules/dep/lib/main.d.ts", "export declare const x: number;"),
            ],
        );
        fs::create_dir_all(temp.path().join("src/deep")).unwrap();

        let hit = resolve_bare(&resolver(), &temp.path().join("src/deep"), "dep").await;
        assert_eq!(hit, Some(temp.path().join("node_modules/dep/lib/main.d.ts")));
    }

    #[tokio::test]
    async fn test_exports_types_condition() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            &[
                (
                    "node_modules/dep/package.json",
                    r#"{"exports": {".": {"types": "./dist/types.d.ts", "import": "./dist/index.mjs"}}}"#,
                ),
                ("node_modules/dep/dist/types.d.ts", "export declare class Thing {}"),
                ("node_modules/dep/dist/index.mjs", "export class Thing {}"),
            ],
        );

        let hit = resolve_bare(&resolver(), temp.path(), "dep").await;
        assert_eq!(hit, Some(temp.path().join("node_modules/dep/dist/types.d.ts")));
    }

    #[tokio::test]
    async fn test_import_condition_prefers_sibling_declaration() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            &[
                (
                    "node_modules/dep/package.json",
                    r#"{"exports": {"./button": {"import": "./esm/button.js"}}}"#,
                ),
                ("node_modules/dep/esm/button.js", "export const Button = 1;"),
                ("node_modules/dep/esm/button.d.ts", "export declare const Button: number;"),
            ],
        );

        let hit = resolve_bare(&resolver(), temp.path(), "dep/button").await;
        assert_eq!(hit, Some(temp.path().join("node_modules/dep/esm/button.d.ts")));
    }

    #[tokio::test]
    async fn test_falls_back_to_definitely_typed() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            &[("node_modules/@types/dep/index.d.ts", "export declare const x: number;")],
        );

        let hit = resolve_bare(&resolver(), temp.path(), "dep").await;
        assert_eq!(hit, Some(temp.path().join("node_modules/@types/dep/index.d.ts")));
    }

    #[tokio::test]
    async fn test_unknown_package() {
        let temp = TempDir::new().unwrap();
        assert_eq!(resolve_bare(&resolver(), temp.path(), "nope").await, None);
    }
}
