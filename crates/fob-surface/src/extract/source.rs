//! Reading and parsing module text.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{ModuleExportName, Program};
use oxc_parser::{Parser, ParserReturn};
use oxc_span::SourceType;

use crate::config::MAX_FILE_SIZE;
use crate::error::ExtractError;
use crate::runtime::{Runtime, RuntimeError};

/// Read a module as UTF-8 with size validation.
///
/// Enforces `MAX_FILE_SIZE` before and after reading (the metadata call may
/// be unavailable on some runtimes).
pub async fn read_source(runtime: &dyn Runtime, path: &Path) -> Result<String, ExtractError> {
    if let Ok(metadata) = runtime.metadata(path).await {
        if metadata.size > MAX_FILE_SIZE as u64 {
            return Err(ExtractError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.size as usize,
                max: MAX_FILE_SIZE,
            });
        }
    }

    let bytes = runtime
        .read_file(path)
        .await
        .map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    if bytes.len() > MAX_FILE_SIZE {
        return Err(ExtractError::FileTooLarge {
            path: path.to_path_buf(),
            size: bytes.len(),
            max: MAX_FILE_SIZE,
        });
    }

    String::from_utf8(bytes).map_err(|e| ExtractError::Read {
        path: path.to_path_buf(),
        source: RuntimeError::Other(format!("Invalid UTF-8: {}", e)),
    })
}

/// Source type inferred from the path, always parsed as an ES module.
pub fn source_type_for(path: &Path) -> SourceType {
    SourceType::from_path(path)
        .unwrap_or_else(|_| SourceType::mjs())
        .with_module(true)
}

/// Parse `source`, rejecting the module on any diagnostic.
pub fn parse_program<'a>(
    allocator: &'a Allocator,
    path: &Path,
    source: &'a str,
) -> Result<Program<'a>, ExtractError> {
    let ParserReturn {
        program,
        errors,
        panicked,
        ..
    } = Parser::new(allocator, source, source_type_for(path)).parse();

    if panicked || !errors.is_empty() {
        let diagnostics: Vec<String> = errors.iter().map(|error| error.to_string()).collect();
        return Err(ExtractError::parse_error(path.to_path_buf(), &diagnostics));
    }
    Ok(program)
}

/// Name written in an import/export clause.
pub fn export_name(name: &ModuleExportName<'_>) -> String {
    match name {
        ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
        ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
        ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
    }
}
