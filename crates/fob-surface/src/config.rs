//! Shared limits and defaults for surface analysis.

/// Maximum size of a single module in bytes (DoS protection).
///
/// Larger files are reported as a per-module error and skipped.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum number of modules to analyze in one run.
///
/// The walker records a single error and stops dequeuing once this many
/// modules have been processed.
pub const DEFAULT_MAX_MODULES: usize = 100_000;

/// Default glob used to discover build configuration files that may carry
/// a federated exposure map.
pub const DEFAULT_CONFIG_GLOB: &str = "**/{webpack,rspack,rsbuild,vite,rollup,module-federation,federation}.config.{js,mjs,cjs,ts,mts,cts}";

/// Directories never descended into while discovering configuration files.
pub const IGNORED_DIRS: &[&str] = &["node_modules", ".git"];

/// Maximum number of alias hops followed when resolving a re-exported symbol.
pub const MAX_ALIAS_HOPS: usize = 64;
