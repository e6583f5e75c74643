//! Error handling for the `fob-surface` command.
//!
//! Everything that stops the command before a report is written is a
//! [`CliError`]. Per-module analysis problems never reach this layer; they
//! are part of the report's `errors` list.

use std::path::PathBuf;

use fob_surface::SurfaceError;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No package directory was given.
    #[error("Missing package path\n\nHint: Run `fob-surface <PACKAGE_PATH>`")]
    MissingPackagePath,

    /// Fatal errors from the analysis library (missing manifest, etc.).
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file doesn't exist.
    #[error("Config file not found: {}\n\nHint: Create fob-surface.config.json in the package or fix --config", .0.display())]
    NotFound(PathBuf),

    /// A configuration value failed to deserialize.
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

/// Convert a `CliError` into a miette report for display.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Surface(SurfaceError::ManifestNotFound(path)) => miette::miette!(
            help = "The package path must contain a package.json",
            "Package manifest not found: {}",
            path.display()
        ),
        CliError::Surface(SurfaceError::PackageNotFound(path)) => miette::miette!(
            help = "Check the PACKAGE_PATH argument",
            "Package path does not exist: {}",
            path.display()
        ),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("surface.json"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("surface.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_surface_error_is_transparent() {
        let err: CliError = SurfaceError::ManifestNotFound(PathBuf::from("/pkg/package.json")).into();
        assert_eq!(err.to_string(), "package manifest not found: /pkg/package.json");
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let err = result.with_path("/test/path.txt").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), CliError> = Err(CliError::MissingPackagePath);
        let msg = result.context("Cannot start").unwrap_err().to_string();
        assert!(msg.starts_with("Cannot start: Missing package path"));
    }
}
