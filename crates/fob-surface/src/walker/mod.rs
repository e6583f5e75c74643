//! Module graph traversal.
//!
//! The walker drains a [`Worklist`], hands each module to the extractor
//! matching its file kind and feeds discovered modules back into the list.
//! Extraction failures, panics included, are recorded and never stop the
//! walk.

mod worklist;

use std::panic::AssertUnwindSafe;
use std::path::Path;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use crate::error::{ExtractError, panic_report};
use crate::extract::{ExtractContext, Extractor, ModuleExtraction};
use crate::report::ReportBuilder;

pub use worklist::Worklist;

/// Drives extraction over the module graph.
pub struct GraphWalker {
    ctx: ExtractContext,
    max_modules: usize,
}

impl GraphWalker {
    pub fn new(ctx: ExtractContext, max_modules: usize) -> Self {
        Self { ctx, max_modules }
    }

    /// Process queued modules until the worklist is empty (or the module
    /// limit is hit).
    pub async fn walk(&self, worklist: &mut Worklist, report: &mut ReportBuilder) {
        while let Some(path) = worklist.next() {
            if worklist.is_processed(&path) {
                continue;
            }
            if worklist.processed_len() >= self.max_modules {
                let error = ExtractError::ModuleLimit {
                    max: self.max_modules,
                };
                warn!(skipped = worklist.pending_len() + 1, "{error}");
                report.add_error(error.to_string());
                break;
            }

            worklist.mark_processed(&path);
            report.add_module(display_path(&self.ctx.package_root, &path));

            let Some(extractor) = Extractor::for_path(&path) else {
                let error = ExtractError::UnsupportedFile { path };
                warn!("{error}");
                report.add_error(error.to_string());
                continue;
            };

            debug!(path = %path.display(), ?extractor, "extracting module");
            let outcome = AssertUnwindSafe(extractor.extract(&self.ctx, &path))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Ok(extraction)) => absorb(extraction, worklist, report),
                Ok(Err(failure)) => {
                    warn!("{failure}");
                    report.add_error(failure.to_string());
                }
                Err(payload) => {
                    let message = panic_report(payload.as_ref());
                    error!(path = %path.display(), "{message}");
                    report.add_error(message);
                }
            }
        }

        info!(modules = worklist.processed_len(), "module graph walked");
    }
}

/// Merge one extraction into the run state.
pub fn absorb(extraction: ModuleExtraction, worklist: &mut Worklist, report: &mut ReportBuilder) {
    for record in extraction.records {
        report.push(record);
    }
    for specifier in extraction.re_exports {
        report.add_re_export(specifier);
    }
    for name in extraction.external_origins {
        report.add_external_origin(name);
    }
    for error in extraction.errors {
        warn!("{error}");
        report.add_error(error.to_string());
    }
    for path in extraction.discovered {
        worklist.enqueue(path);
    }
}

/// `path` relative to `root` when possible, with `/` separators.
pub fn display_path(root: &Path, path: &Path) -> String {
    let Ok(relative) = path.strip_prefix(root) else {
        return path.to_string_lossy().into_owned();
    };
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::OxcChecker;
    use crate::resolver::ModuleResolver;
    use crate::runtime::{NativeRuntime, Runtime};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn write(root: &Path, files: &[(&str, &str)]) {
        for (rel, content) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    fn walker(root: &Path, max_modules: usize) -> GraphWalker {
        let runtime: Arc<dyn Runtime> = Arc::new(NativeRuntime::new());
        let resolver = ModuleResolver::new(Arc::clone(&runtime));
        let ctx = ExtractContext {
            runtime,
            checker: Arc::new(OxcChecker::new(resolver.clone())),
            resolver,
            package_root: root.to_path_buf(),
        };
        GraphWalker::new(ctx, max_modules)
    }

    #[test]
    fn test_display_path() {
        assert_eq!(display_path(Path::new("/pkg"), Path::new("/pkg/src/a.js")), "src/a.js");
        assert_eq!(display_path(Path::new("/pkg"), Path::new("/other/a.js")), "/other/a.js");
    }

    #[tokio::test]
    async fn test_shared_module_is_analyzed_once() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            &[
                ("index.js", "export * from './a';\nexport * from './b';\n"),
                ("a.js", "export * from './shared';\nexport const a = 1;\n"),
                ("b.js", "export * from './shared';\nexport const b = 1;\n"),
                ("shared.js", "export * from './a';\nexport const shared = 1;\n"),
            ],
        );

        let mut worklist = Worklist::new();
        worklist.enqueue(temp.path().join("index.js"));
        let mut report = ReportBuilder::new();
        walker(temp.path(), 100).walk(&mut worklist, &mut report).await;

        let report = report.finish("pkg".into(), None, Vec::new());
        assert_eq!(report.modules, vec!["index.js", "a.js", "b.js", "shared.js"]);
        assert_eq!(report.value.list, vec!["a", "b", "shared"]);
        assert!(report.errors.is_empty(), "{:?}", report.errors);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_walk() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            &[
                ("index.js", "export * from './broken';\nexport * from './missing';\nexport * from './data.json';\nexport const ok = 1;\n"),
                ("broken.js", "export const = ;\n"),
                ("data.json", "{}"),
            ],
        );

        let mut worklist = Worklist::new();
        worklist.enqueue(temp.path().join("index.js"));
        let mut report = ReportBuilder::new();
        walker(temp.path(), 100).walk(&mut worklist, &mut report).await;

        let report = report.finish("pkg".into(), None, Vec::new());
        assert_eq!(report.value.list, vec!["ok"]);
        assert_eq!(report.errors.len(), 3, "{:?}", report.errors);
        assert!(report.errors.iter().any(|e| e.contains("./missing")));
        assert!(report.errors.iter().any(|e| e.starts_with("Failed to parse")));
        assert!(report.errors.iter().any(|e| e.starts_with("Unsupported file type")));
    }

    #[tokio::test]
    async fn test_module_limit_records_one_error() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            &[
                ("index.js", "export * from './a';\n"),
                ("a.js", "export * from './b';\n"),
                ("b.js", "export const b = 1;\n"),
            ],
        );

        let mut worklist = Worklist::new();
        worklist.enqueue(temp.path().join("index.js"));
        let mut report = ReportBuilder::new();
        walker(temp.path(), 2).walk(&mut worklist, &mut report).await;

        let report = report.finish("pkg".into(), None, Vec::new());
        assert_eq!(report.modules.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Module limit reached"));
    }
}
