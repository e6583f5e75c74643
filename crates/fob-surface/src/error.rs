use std::any::Any;
use std::path::PathBuf;

use thiserror::Error;

use crate::runtime::RuntimeError;

/// Result type alias for run-level operations.
pub type Result<T> = std::result::Result<T, SurfaceError>;

/// Errors that abort an analysis run before (or outside) the module walk.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The package directory does not exist.
    #[error("package path does not exist: {}", .0.display())]
    PackageNotFound(PathBuf),

    /// No `package.json` in the package directory.
    #[error("package manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    /// The manifest exists but cannot be read or parsed.
    #[error("invalid package manifest '{}': {message}", path.display())]
    InvalidManifest {
        /// Path to the manifest.
        path: PathBuf,
        /// Reader or parser message.
        message: String,
    },

    /// The configuration-file glob does not compile.
    #[error("invalid configuration glob '{pattern}': {message}")]
    InvalidGlob {
        /// The rejected pattern.
        pattern: String,
        /// Message from the glob compiler.
        message: String,
    },

    /// Walking the package tree for configuration files failed.
    #[error("failed to scan '{}' for configuration files: {message}", root.display())]
    Discovery {
        /// Directory being scanned.
        root: PathBuf,
        /// Underlying error message.
        message: String,
    },

    /// Filesystem error outside of per-module extraction.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Recoverable, per-module failures.
///
/// The `Display` text of each variant is what ends up in the report's
/// `errors` list; analysis continues with the next module.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Module text could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: RuntimeError,
    },

    /// Module exceeds `MAX_FILE_SIZE`.
    #[error("File too large: {} ({size} bytes, max {max})", path.display())]
    FileTooLarge { path: PathBuf, size: usize, max: usize },

    /// The structural parser rejected the module.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A typed module has no module symbol (no import/export syntax).
    #[error("No module symbol for {}", path.display())]
    MissingModuleSymbol { path: PathBuf },

    /// A relative re-export target does not exist on disk.
    #[error("Cannot resolve re-export '{specifier}' from {}", from.display())]
    UnresolvedReExport { specifier: String, from: PathBuf },

    /// An exposure map entry points at a missing file.
    #[error("Exposure target not found: '{target}' (exposed as '{name}')")]
    MissingExposureTarget { name: String, target: String },

    /// No extractor handles this file suffix.
    #[error("Unsupported file type: {}", path.display())]
    UnsupportedFile { path: PathBuf },

    /// The walker stopped after `max` processed modules.
    #[error("Module limit reached: {max} modules analyzed, remaining files skipped")]
    ModuleLimit { max: usize },
}

impl ExtractError {
    /// Helper to create a parse error from multiple diagnostic strings.
    pub fn parse_error(path: PathBuf, diagnostics: &[String]) -> Self {
        let message = diagnostics.join("; ");
        Self::Parse { path, message }
    }
}

/// `Analysis panicked: <payload>` for a caught panic.
pub(crate) fn panic_report(payload: &(dyn Any + Send)) -> String {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    };
    format!("Analysis panicked: {message}")
}
