//! Export extraction for TypeScript sources and declaration files.

use std::path::{Component, Path};

use tracing::trace;

use super::{ExtractContext, ModuleExtraction};
use crate::checker::{CheckedExport, ResolvedSymbol};
use crate::error::ExtractError;
use crate::jsdoc::is_valid_doc;
use crate::report::{Category, ExportRecord};

/// Checker-driven extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeExtractor;

impl TypeExtractor {
    pub async fn extract(
        &self,
        ctx: &ExtractContext,
        path: &Path,
    ) -> Result<ModuleExtraction, ExtractError> {
        let exports = ctx
            .checker
            .exports_of_module(path)
            .await?
            .ok_or_else(|| ExtractError::MissingModuleSymbol {
                path: path.to_path_buf(),
            })?;

        let specifiers = ctx.checker.relative_star_sources(path).await?;

        let mut extraction = ModuleExtraction::default();
        for export in &exports {
            // synthetic bindings such as `__esModule`
            if export.name.starts_with("__") {
                continue;
            }
            let target = ctx
                .checker
                .aliased_symbol(export)
                .await
                .unwrap_or_else(|| export.symbol.clone());
            classify(export, &target, &ctx.package_root, &mut extraction);
        }

        ctx.resolve_targets(path, specifiers, &mut extraction).await;
        Ok(extraction)
    }
}

fn classify(
    export: &CheckedExport,
    target: &ResolvedSymbol,
    package_root: &Path,
    extraction: &mut ModuleExtraction,
) {
    let name = export.name.as_str();

    if is_external(target, package_root) {
        trace!(name, "externally originated export");
        extraction.external_origins.push(name.to_string());
    }

    let type_only = !export.declarations.is_empty()
        && export
            .declarations
            .iter()
            .all(|site| site.kind.is_type_only());
    let documented = target.documentation.iter().any(|raw| is_valid_doc(raw));

    if !type_only && target.facets.value {
        extraction
            .records
            .push(ExportRecord::new(name, Category::Value, documented));
    }
    if type_only || target.facets.ty {
        extraction
            .records
            .push(ExportRecord::new(name, Category::Type, documented));
    }
}

/// No declaration inside the package, or any declaration under a
/// `node_modules` directory of the package. Only the part of the path below
/// `package_root` is inspected, so an installed package can analyze itself.
fn is_external(symbol: &ResolvedSymbol, package_root: &Path) -> bool {
    let inside = symbol
        .declarations
        .iter()
        .any(|file| file.starts_with(package_root));
    let vendored = symbol.declarations.iter().any(|file| {
        file.strip_prefix(package_root).is_ok_and(|relative| {
            relative.components().any(
                |component| matches!(component, Component::Normal(part) if part == "node_modules"),
            )
        })
    });
    !inside || vendored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::{DeclarationKind, DeclarationSite, SymbolFacets};
    use std::path::PathBuf;

    fn export(name: &str, kinds: &[DeclarationKind]) -> CheckedExport {
        CheckedExport {
            name: name.to_string(),
            module: PathBuf::from("/pkg/index.d.ts"),
            declarations: kinds
                .iter()
                .map(|kind| DeclarationSite {
                    file: PathBuf::from("/pkg/index.d.ts"),
                    kind: *kind,
                })
                .collect(),
            symbol: symbol(SymbolFacets::VALUE, &["/pkg/index.d.ts"], &[]),
            alias: None,
        }
    }

    fn symbol(facets: SymbolFacets, files: &[&str], docs: &[&str]) -> ResolvedSymbol {
        ResolvedSymbol {
            name: "x".to_string(),
            facets,
            declarations: files.iter().map(PathBuf::from).collect(),
            documentation: docs.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn run(export: &CheckedExport, target: &ResolvedSymbol) -> ModuleExtraction {
        let mut extraction = ModuleExtraction::default();
        classify(export, target, Path::new("/pkg"), &mut extraction);
        extraction
    }

    const TYPE_SPECIFIER: DeclarationKind = DeclarationKind::ExportSpecifier {
        type_only: false,
        clause_type_only: true,
    };

    #[test]
    fn test_type_only_export_of_merged_symbol_is_type_only() {
        let target = symbol(SymbolFacets::BOTH, &["/pkg/index.d.ts"], &[]);
        let extraction = run(&export("Foo", &[TYPE_SPECIFIER]), &target);
        assert_eq!(
            extraction.records,
            vec![ExportRecord::new("Foo", Category::Type, false)]
        );
    }

    #[test]
    fn test_mixed_declarations_are_not_type_only() {
        let target = symbol(SymbolFacets::BOTH, &["/pkg/index.d.ts"], &[]);
        let extraction = run(
            &export("Foo", &[TYPE_SPECIFIER, DeclarationKind::Declaration]),
            &target,
        );
        let categories: Vec<Category> = extraction.records.iter().map(|r| r.category).collect();
        assert_eq!(categories, vec![Category::Value, Category::Type]);
    }

    #[test]
    fn test_documentation_and_origin() {
        let target = symbol(
            SymbolFacets::VALUE,
            &["/pkg/node_modules/dep/index.d.ts"],
            &["* Documented upstream. "],
        );
        let extraction = run(&export("dep", &[DeclarationKind::Declaration]), &target);
        assert_eq!(extraction.external_origins, vec!["dep"]);
        assert_eq!(
            extraction.records,
            vec![ExportRecord::new("dep", Category::Value, true)]
        );
    }

    #[test]
    fn test_outside_root_is_external() {
        let outside = symbol(SymbolFacets::TYPE, &["/elsewhere/a.d.ts"], &[]);
        assert!(is_external(&outside, Path::new("/pkg")));
        let inside = symbol(SymbolFacets::TYPE, &["/pkg/src/a.d.ts"], &[]);
        assert!(!is_external(&inside, Path::new("/pkg")));
        let none = symbol(SymbolFacets::TYPE, &[], &[]);
        assert!(is_external(&none, Path::new("/pkg")));
    }

    #[test]
    fn test_installed_package_is_not_external_to_itself() {
        let root = Path::new("/app/node_modules/widgets");
        let own = symbol(SymbolFacets::TYPE, &["/app/node_modules/widgets/index.d.ts"], &[]);
        assert!(!is_external(&own, root));
        let nested = symbol(
            SymbolFacets::TYPE,
            &["/app/node_modules/widgets/node_modules/dep/index.d.ts"],
            &[],
        );
        assert!(is_external(&nested, root));
        let sibling = symbol(SymbolFacets::TYPE, &["/app/node_modules/dep/index.d.ts"], &[]);
        assert!(is_external(&sibling, root));
    }
}
