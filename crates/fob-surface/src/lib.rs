//! # fob-surface
//!
//! Public API surface analysis for JavaScript/TypeScript packages.
//!
//! Given a package directory, `fob-surface` finds every module reachable
//! from the package's entry points (and from its federated exposure map),
//! extracts what each module exports and classifies the result:
//!
//! - **Category**: runtime value, type-only declaration, or federated exposure
//! - **Documentation**: whether a JSDoc block with a summary or tags precedes it
//! - **Origin**: declared in the package, or re-exported from a dependency
//!
//! ## Architecture
//!
//! ```text
//!  package.json ──► EntryFileSet ─┐
//!                                 ├──► Worklist ──► GraphWalker ──► ReportBuilder ──► Report
//!  exposure map ──► ExposuresFinder┘        ▲            │
//!                                           │            ▼
//!                                           │   SyntaxExtractor (.js)
//!                                           │   TypeExtractor   (.ts / .d.ts) ──► TypeChecker
//!                                           └────── discovered modules
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use fob_surface::{AnalyzeOptions, NativeRuntime, PackageManifest, SurfaceAnalyzer};
//!
//! # async fn example() -> fob_surface::Result<()> {
//! let root = Path::new("./my-package");
//! let runtime = Arc::new(NativeRuntime::new());
//! let manifest = PackageManifest::load(runtime.as_ref(), root).await?;
//!
//! let analyzer = SurfaceAnalyzer::new(runtime);
//! let entries = manifest.entry_files(analyzer.resolver(), root).await;
//! let options = AnalyzeOptions::new(root, manifest.display_name())
//!     .with_version(manifest.version.clone())
//!     .with_entries(entries);
//!
//! let report = analyzer.analyze(options).await;
//! println!("{} values, {} documented", report.value.total(), report.value.documented_count());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod checker;
pub mod config;
pub mod error;
pub mod exposures;
pub mod extract;
pub mod jsdoc;
pub mod manifest;
pub mod report;
pub mod resolver;
pub mod runtime;
pub mod walker;

pub use analyzer::{AnalyzeOptions, SurfaceAnalyzer};
pub use checker::{OxcChecker, TypeChecker};
pub use error::{ExtractError, Result, SurfaceError};
pub use exposures::{ExposureSource, ExposuresFinder};
pub use extract::{Extractor, SyntaxExtractor, TypeExtractor};
pub use manifest::{EntryFileSet, PackageManifest};
pub use report::{Category, CategoryReport, ExportRecord, Report, ReportBuilder};
pub use resolver::{FileKind, ModuleResolver};
pub use runtime::{NativeRuntime, Runtime, RuntimeError};
pub use walker::{GraphWalker, Worklist};
