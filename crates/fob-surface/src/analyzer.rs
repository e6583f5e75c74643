//! One-shot surface analysis of a package.
//!
//! [`SurfaceAnalyzer::analyze`] seeds a worklist with the package's entry
//! files, expands the exposure map, walks the module graph and folds
//! everything into a [`Report`]. The returned report always exists: a
//! failing or panicking phase leaves its message in `errors` and the
//! findings gathered so far are kept.

use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info};

use crate::checker::{OxcChecker, TypeChecker};
use crate::config::{DEFAULT_CONFIG_GLOB, DEFAULT_MAX_MODULES};
use crate::error::{Result, panic_report};
use crate::exposures::{ExposureSource, ExposuresFinder};
use crate::extract::ExtractContext;
use crate::manifest::EntryFileSet;
use crate::report::{Report, ReportBuilder};
use crate::resolver::ModuleResolver;
use crate::runtime::Runtime;
use crate::walker::{GraphWalker, Worklist, absorb, display_path};

/// Inputs of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Absolute package directory.
    pub package_root: PathBuf,
    pub package_name: String,
    pub version: Option<String>,
    pub entries: EntryFileSet,
    pub exposures: ExposureSource,
    pub max_modules: usize,
}

impl AnalyzeOptions {
    /// Options with no entries, glob discovery of exposures and the default
    /// module limit.
    pub fn new(package_root: impl Into<PathBuf>, package_name: impl Into<String>) -> Self {
        Self {
            package_root: package_root.into(),
            package_name: package_name.into(),
            version: None,
            entries: EntryFileSet::default(),
            exposures: ExposureSource::Discover {
                config: None,
                glob: DEFAULT_CONFIG_GLOB.to_string(),
            },
            max_modules: DEFAULT_MAX_MODULES,
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    pub fn with_entries(mut self, entries: EntryFileSet) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_exposures(mut self, exposures: ExposureSource) -> Self {
        self.exposures = exposures;
        self
    }

    pub fn with_max_modules(mut self, max_modules: usize) -> Self {
        self.max_modules = max_modules;
        self
    }
}

/// Entry point of the library.
pub struct SurfaceAnalyzer {
    runtime: Arc<dyn Runtime>,
    resolver: ModuleResolver,
    checker: Arc<dyn TypeChecker>,
}

impl SurfaceAnalyzer {
    /// Analyzer backed by the built-in [`OxcChecker`].
    pub fn new(runtime: Arc<dyn Runtime>) -> Self {
        let resolver = ModuleResolver::new(Arc::clone(&runtime));
        let checker = Arc::new(OxcChecker::new(resolver.clone()));
        Self {
            runtime,
            resolver,
            checker,
        }
    }

    /// Replace the type checker.
    pub fn with_checker(mut self, checker: Arc<dyn TypeChecker>) -> Self {
        self.checker = checker;
        self
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    pub async fn analyze(&self, options: AnalyzeOptions) -> Report {
        let mut report = ReportBuilder::new();
        let mut worklist = Worklist::new();
        for entry in options.entries.iter() {
            worklist.enqueue(entry.clone());
        }

        let outcome = AssertUnwindSafe(self.run_phases(&options, &mut worklist, &mut report))
            .catch_unwind()
            .await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(failure)) => {
                let message = error_chain(&failure);
                error!("analysis aborted: {message}");
                report.add_error(message);
            }
            Err(payload) => {
                let message = panic_report(payload.as_ref());
                error!("{message}");
                report.add_error(message);
            }
        }

        let entry_points = options
            .entries
            .iter()
            .map(|entry| display_path(&options.package_root, entry))
            .collect();
        let report = report.finish(options.package_name, options.version, entry_points);
        info!(
            values = report.value.total(),
            types = report.ty.total(),
            exposures = report.exposure.total(),
            errors = report.errors.len(),
            "analysis complete"
        );
        report
    }

    async fn run_phases(
        &self,
        options: &AnalyzeOptions,
        worklist: &mut Worklist,
        report: &mut ReportBuilder,
    ) -> Result<()> {
        let exposures = ExposuresFinder::new(self.resolver.clone())
            .find(&options.package_root, &options.exposures)
            .await?;
        absorb(exposures, worklist, report);

        let ctx = ExtractContext {
            runtime: Arc::clone(&self.runtime),
            resolver: self.resolver.clone(),
            checker: Arc::clone(&self.checker),
            package_root: options.package_root.clone(),
        };
        GraphWalker::new(ctx, options.max_modules)
            .walk(worklist, report)
            .await;
        Ok(())
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
