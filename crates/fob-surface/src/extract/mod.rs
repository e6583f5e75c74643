//! Per-module export extraction.
//!
//! Two strategies share one output shape: [`SyntaxExtractor`] walks the
//! syntax tree of plain JavaScript, [`TypeExtractor`] asks the
//! [`TypeChecker`](crate::checker::TypeChecker) about typed modules. The
//! walker picks one per file with [`Extractor::for_path`].

mod comments;
pub mod source;
mod syntax;
mod typed;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::checker::TypeChecker;
use crate::error::ExtractError;
use crate::report::ExportRecord;
use crate::resolver::{FileKind, MODULE_SUFFIXES, ModuleResolver};
use crate::runtime::Runtime;

pub use comments::DocComments;
pub use syntax::{DESTRUCTURED_PLACEHOLDER, SyntaxExtractor};
pub use typed::TypeExtractor;

/// Everything one module contributes to the report.
#[derive(Debug, Default)]
pub struct ModuleExtraction {
    pub records: Vec<ExportRecord>,
    /// Bare specifiers reached through a blanket re-export.
    pub re_exports: Vec<String>,
    /// Exported names declared outside the package.
    pub external_origins: Vec<String>,
    /// Existing files reached through relative re-exports.
    pub discovered: Vec<PathBuf>,
    /// Recoverable problems; the module still counts as analyzed.
    pub errors: Vec<ExtractError>,
}

/// Shared, read-only state handed to every extractor call.
#[derive(Clone)]
pub struct ExtractContext {
    pub runtime: Arc<dyn Runtime>,
    pub resolver: ModuleResolver,
    pub checker: Arc<dyn TypeChecker>,
    pub package_root: PathBuf,
}

impl ExtractContext {
    /// Resolve relative specifiers written in `from`, appending hits to
    /// `discovered` and misses to `errors`.
    pub async fn resolve_targets(
        &self,
        from: &Path,
        specifiers: Vec<String>,
        extraction: &mut ModuleExtraction,
    ) {
        let base_dir = from.parent().unwrap_or(&self.package_root);
        for specifier in specifiers {
            match self.resolver.resolve(base_dir, &specifier, MODULE_SUFFIXES).await {
                Some(path) => {
                    debug!(from = %from.display(), to = %path.display(), "discovered module");
                    extraction.discovered.push(path);
                }
                None => extraction.errors.push(ExtractError::UnresolvedReExport {
                    specifier,
                    from: from.to_path_buf(),
                }),
            }
        }
    }
}

/// Extraction strategy, selected by file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    Syntax(SyntaxExtractor),
    Typed(TypeExtractor),
}

impl Extractor {
    /// `None` for files neither strategy understands.
    pub fn for_path(path: &Path) -> Option<Self> {
        match FileKind::from_path(path) {
            FileKind::Value => Some(Self::Syntax(SyntaxExtractor)),
            FileKind::Typed => Some(Self::Typed(TypeExtractor)),
            FileKind::Unsupported => None,
        }
    }

    pub async fn extract(
        &self,
        ctx: &ExtractContext,
        path: &Path,
    ) -> Result<ModuleExtraction, ExtractError> {
        match self {
            Self::Syntax(extractor) => extractor.extract(ctx, path).await,
            Self::Typed(extractor) => extractor.extract(ctx, path).await,
        }
    }
}
