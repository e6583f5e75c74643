//! Type-level view of typed modules.
//!
//! The [`TypeChecker`] trait is the oracle the type extractor talks to. It
//! answers which names a module exports (including names pulled in through
//! `export *` chains), what symbol an exported alias finally refers to and
//! which sibling modules a file re-exports wholesale. [`OxcChecker`] implements it on top of
//! `oxc_semantic` symbol flags plus a cross-module export table.

mod facts;
mod oxc;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ExtractError;

pub use facts::{
    EntryTarget, ExportEntry, ImportBinding, Imported, LocalSymbol, ModuleFacts, StarExport,
};
pub use oxc::OxcChecker;

/// Which meanings a symbol carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SymbolFacets {
    /// Usable as a runtime value.
    pub value: bool,
    /// Usable as a type.
    pub ty: bool,
}

impl SymbolFacets {
    pub const VALUE: Self = Self {
        value: true,
        ty: false,
    };
    pub const TYPE: Self = Self {
        value: false,
        ty: true,
    };
    pub const BOTH: Self = Self {
        value: true,
        ty: true,
    };

    pub fn union(self, other: Self) -> Self {
        Self {
            value: self.value || other.value,
            ty: self.ty || other.ty,
        }
    }
}

/// Syntactic form of one declaration of an exported name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// A declaration statement (function, class, variable, interface, ...).
    Declaration,
    /// An entry of an `export { ... }` clause.
    ExportSpecifier {
        /// `export { type a }`
        type_only: bool,
        /// `export type { a }`
        clause_type_only: bool,
    },
    /// `export * from`, `export * as ns from`, `export default <expr>`, `export =`.
    ExportDeclaration { type_only: bool },
}

impl DeclarationKind {
    pub fn is_type_only(&self) -> bool {
        match self {
            Self::Declaration => false,
            Self::ExportSpecifier {
                type_only,
                clause_type_only,
            } => *type_only || *clause_type_only,
            Self::ExportDeclaration { type_only } => *type_only,
        }
    }
}

/// Where and how an exported name is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSite {
    pub file: PathBuf,
    pub kind: DeclarationKind,
}

/// A symbol after alias resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    pub name: String,
    pub facets: SymbolFacets,
    /// Files containing a declaration of the symbol.
    pub declarations: Vec<PathBuf>,
    /// Raw doc-comment bodies attached to the declarations.
    pub documentation: Vec<String>,
}

/// Where an alias export points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasTarget {
    /// A module-scope binding (`export { a }`, `export default a`).
    Binding { module: PathBuf, local: String },
    /// An export of another module.
    Export { module: PathBuf, name: String },
    /// A whole module object (`export * as ns from`).
    Namespace { module: PathBuf },
    /// The source specifier could not be resolved to a file.
    Unresolved { specifier: String },
}

/// One name in a module's export table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedExport {
    pub name: String,
    /// Module whose export table contains the name.
    pub module: PathBuf,
    pub declarations: Vec<DeclarationSite>,
    /// The export symbol itself, before alias resolution.
    pub symbol: ResolvedSymbol,
    /// Set when the export is an alias of some other symbol.
    pub alias: Option<AliasTarget>,
}

/// Symbol oracle for typed modules.
#[async_trait]
pub trait TypeChecker: Send + Sync {
    /// Export table of `path`; `Ok(None)` when the file is not a module.
    async fn exports_of_module(
        &self,
        path: &Path,
    ) -> Result<Option<Vec<CheckedExport>>, ExtractError>;

    /// Final target of an alias export; `None` if the export is not an
    /// alias or resolution fails.
    async fn aliased_symbol(&self, export: &CheckedExport) -> Option<ResolvedSymbol>;

    /// Relative specifiers of the blanket `export * from` statements in
    /// `path`, in source order.
    async fn relative_star_sources(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_only_kinds() {
        assert!(!DeclarationKind::Declaration.is_type_only());
        assert!(
            DeclarationKind::ExportSpecifier {
                type_only: false,
                clause_type_only: true
            }
            .is_type_only()
        );
        assert!(
            DeclarationKind::ExportSpecifier {
                type_only: true,
                clause_type_only: false
            }
            .is_type_only()
        );
        assert!(DeclarationKind::ExportDeclaration { type_only: true }.is_type_only());
        assert!(!DeclarationKind::ExportDeclaration { type_only: false }.is_type_only());
    }

    #[test]
    fn test_facet_union() {
        assert_eq!(SymbolFacets::VALUE.union(SymbolFacets::TYPE), SymbolFacets::BOTH);
        assert_eq!(SymbolFacets::default().union(SymbolFacets::TYPE), SymbolFacets::TYPE);
    }
}
