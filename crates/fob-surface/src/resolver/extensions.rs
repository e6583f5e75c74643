//! Module suffixes and file-kind classification.
//!
//! Both dialects share one candidate list so a value module can reach a
//! typed one (and vice versa) through a relative specifier.

use std::path::Path;

/// Suffixes handled by the syntax extractor.
pub const VALUE_SUFFIXES: &[&str] = &[".js", ".mjs", ".cjs", ".jsx"];

/// Suffixes handled by the type extractor. Declaration suffixes come first
/// so that `x.d.ts` is never mistaken for a `.ts` source.
pub const TYPED_SUFFIXES: &[&str] = &[".d.ts", ".d.mts", ".d.cts", ".ts", ".mts", ".cts", ".tsx"];

/// Candidate suffixes tried, in order, when resolving a relative specifier.
pub const MODULE_SUFFIXES: &[&str] = &[
    ".js", ".mjs", ".cjs", ".jsx", ".d.ts", ".ts", ".tsx", ".d.mts", ".mts", ".d.cts", ".cts",
];

/// Candidate suffixes for type-level resolution (declarations win over
/// their compiled JavaScript).
pub const DECLARATION_FIRST_SUFFIXES: &[&str] = &[
    ".d.ts", ".ts", ".tsx", ".d.mts", ".mts", ".d.cts", ".cts", ".js", ".mjs", ".cjs", ".jsx",
];

/// Extraction dialect of a module, derived from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Plain JavaScript, handled by pure syntax traversal.
    Value,
    /// TypeScript sources and declaration files, handled through the checker.
    Typed,
    /// Anything else.
    Unsupported,
}

impl FileKind {
    /// Classify a path by suffix.
    pub fn from_path(path: &Path) -> Self {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return Self::Unsupported;
        };
        if TYPED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            Self::Typed
        } else if VALUE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            Self::Value
        } else {
            Self::Unsupported
        }
    }
}

/// Strip a value-dialect extension from a specifier (`./a.js` → `./a`).
///
/// Declaration files commonly refer to siblings by their compiled name.
pub fn strip_value_extension(specifier: &str) -> Option<&str> {
    VALUE_SUFFIXES
        .iter()
        .find_map(|suffix| specifier.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty() && !stem.ends_with('/'))
}
