//! Native runtime backed by `std::fs`.

// NativeRuntime is platform-specific and wraps std::fs
#![allow(clippy::disallowed_methods)]

use async_trait::async_trait;
use std::path::Path;
use tokio::task;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// Native filesystem runtime.
///
/// Blocking `std::fs` calls run on tokio's blocking pool so the analysis
/// future only yields at these boundaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    /// Create a new NativeRuntime instance.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            std::fs::read(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RuntimeError::FileNotFound(path.clone())
                } else {
                    RuntimeError::Io(format!("Failed to read {}: {}", path.display(), e))
                }
            })
        })
        .await
        .map_err(|e| RuntimeError::Other(format!("Task join error: {}", e)))?
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path = path.to_path_buf();

        task::spawn_blocking(move || {
            let metadata = std::fs::metadata(&path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RuntimeError::FileNotFound(path.clone())
                } else {
                    RuntimeError::Io(format!(
                        "Failed to get metadata for {}: {}",
                        path.display(),
                        e
                    ))
                }
            })?;

            Ok(FileMetadata {
                size: metadata.len(),
                is_dir: metadata.is_dir(),
                is_file: metadata.is_file(),
            })
        })
        .await
        .map_err(|e| RuntimeError::Other(format!("Task join error: {}", e)))?
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_missing_file_reports_not_found() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.js");

        let err = NativeRuntime::new().read_file(&missing).await.unwrap_err();
        assert!(matches!(err, RuntimeError::FileNotFound(path) if path == missing));
    }

    #[tokio::test]
    async fn test_is_file_rejects_directories() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("lib")).unwrap();
        std::fs::write(temp.path().join("lib.js"), "export {}").unwrap();

        let runtime = NativeRuntime::new();
        assert!(!runtime.is_file(&temp.path().join("lib")).await);
        assert!(runtime.is_file(&temp.path().join("lib.js")).await);
    }
}
