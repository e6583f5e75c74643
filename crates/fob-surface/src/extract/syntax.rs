//! Export extraction for plain JavaScript modules.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingPatternKind, Declaration, ExportAllDeclaration, ExportNamedDeclaration,
    ModuleDeclaration, Program,
};
use oxc_span::GetSpan;

use super::comments::DocComments;
use super::source::{export_name, parse_program, read_source};
use super::{ExtractContext, ModuleExtraction};
use crate::error::ExtractError;
use crate::report::{Category, ExportRecord};
use crate::resolver::is_relative_specifier;

/// Name recorded for exported destructuring patterns
/// (`export const { a, b } = obj`).
pub const DESTRUCTURED_PLACEHOLDER: &str = "<destructured>";

/// Pure syntax-tree extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyntaxExtractor;

#[derive(Debug, Default)]
struct ValueScan {
    records: Vec<ExportRecord>,
    relative: Vec<String>,
    external: Vec<String>,
}

impl ValueScan {
    fn value(&mut self, name: impl Into<String>, documented: bool) {
        self.records
            .push(ExportRecord::new(name, Category::Value, documented));
    }

    fn route(&mut self, specifier: &str) {
        if is_relative_specifier(specifier) {
            self.relative.push(specifier.to_string());
        } else {
            self.external.push(specifier.to_string());
        }
    }
}

impl SyntaxExtractor {
    pub async fn extract(
        &self,
        ctx: &ExtractContext,
        path: &Path,
    ) -> Result<ModuleExtraction, ExtractError> {
        let source = read_source(ctx.runtime.as_ref(), path).await?;
        let scan = {
            let allocator = Allocator::default();
            let program = parse_program(&allocator, path, &source)?;
            scan_program(&program)
        };

        let mut extraction = ModuleExtraction {
            records: scan.records,
            re_exports: scan.external,
            ..ModuleExtraction::default()
        };
        ctx.resolve_targets(path, scan.relative, &mut extraction).await;
        Ok(extraction)
    }
}

fn scan_program(program: &Program<'_>) -> ValueScan {
    let docs = DocComments::new(program);
    let mut scan = ValueScan::default();

    for statement in program.body.iter() {
        let Some(declaration) = statement.as_module_declaration() else {
            continue;
        };
        let documented = docs.documents(declaration.span().start);
        match declaration {
            ModuleDeclaration::ExportNamedDeclaration(named) => {
                scan_named(named, documented, &mut scan);
            }
            ModuleDeclaration::ExportDefaultDeclaration(_) => {
                scan.value("default", documented);
            }
            ModuleDeclaration::ExportAllDeclaration(all) => {
                scan_all(all, documented, &mut scan);
            }
            _ => {}
        }
    }
    scan
}

fn scan_named(named: &ExportNamedDeclaration<'_>, documented: bool, scan: &mut ValueScan) {
    if let Some(source) = &named.source {
        scan.route(source.value.as_str());
    }

    if let Some(declaration) = &named.declaration {
        match declaration {
            Declaration::VariableDeclaration(variable) => {
                for declarator in variable.declarations.iter() {
                    match &declarator.id.kind {
                        BindingPatternKind::BindingIdentifier(ident) => {
                            scan.value(ident.name.as_str(), documented);
                        }
                        _ => scan.value(DESTRUCTURED_PLACEHOLDER, documented),
                    }
                }
            }
            Declaration::FunctionDeclaration(function) => {
                if let Some(id) = &function.id {
                    scan.value(id.name.as_str(), documented);
                }
            }
            Declaration::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    scan.value(id.name.as_str(), documented);
                }
            }
            _ => {}
        }
    }

    for specifier in named.specifiers.iter() {
        scan.value(export_name(&specifier.exported), documented);
    }
}

fn scan_all(all: &ExportAllDeclaration<'_>, documented: bool, scan: &mut ValueScan) {
    scan.route(all.source.value.as_str());
    if let Some(exported) = &all.exported {
        scan.value(export_name(exported), documented);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> ValueScan {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, Path::new("/pkg/index.js"), source).unwrap();
        scan_program(&program)
    }

    fn names(scan: &ValueScan, documented: bool) -> Vec<&str> {
        scan.records
            .iter()
            .filter(|record| record.documented == documented)
            .map(|record| record.name.as_str())
            .collect()
    }

    #[test]
    fn test_documented_function_and_anonymous_default() {
        let scan = scan("/** Says hi. */\nexport function foo() {}\n\nexport default class {}\n");
        assert_eq!(names(&scan, true), vec!["foo"]);
        assert_eq!(names(&scan, false), vec!["default"]);
        assert!(scan.records.iter().all(|r| r.category == Category::Value));
    }

    #[test]
    fn test_empty_or_line_comments_do_not_document() {
        let scan = scan("/** */\nexport const a = 1;\n// note\nexport const b = 2;\n/* plain */\nexport const c = 3;\n");
        assert_eq!(names(&scan, false), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_doc_block_must_be_the_nearest_comment() {
        let scan = scan(
            "/** Stale. */\n// eslint-disable-next-line\nexport const a = 1;\n// note\n/** Fresh. */\nexport const b = 2;\n",
        );
        assert_eq!(names(&scan, false), vec!["a"]);
        assert_eq!(names(&scan, true), vec!["b"]);
    }

    #[test]
    fn test_tag_only_comment_documents() {
        let scan = scan("/** @deprecated */\nexport const old = 1;\n");
        assert_eq!(names(&scan, true), vec!["old"]);
    }

    #[test]
    fn test_destructuring_uses_placeholder() {
        let scan = scan("const o = { a: 1 };\nexport const { a } = o, plain = 2, [first] = [1];\n");
        let all: Vec<&str> = scan.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(all, vec![DESTRUCTURED_PLACEHOLDER, "plain", DESTRUCTURED_PLACEHOLDER]);
    }

    #[test]
    fn test_specifier_lists_use_exported_names() {
        let scan = scan("const a = 1, b = 2;\nexport { a, b as renamed };\n");
        let all: Vec<&str> = scan.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(all, vec!["a", "renamed"]);
    }

    #[test]
    fn test_reexport_sources_are_routed() {
        let scan = scan(
            "export * from './local';\nexport * from 'react';\nexport { x } from '../up';\nexport { y } from 'lodash';\nexport * as ns from './ns';\n",
        );
        assert_eq!(scan.relative, vec!["./local", "../up", "./ns"]);
        assert_eq!(scan.external, vec!["react", "lodash"]);
        let all: Vec<&str> = scan.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(all, vec!["x", "y", "ns"]);
    }

    #[test]
    fn test_imports_are_ignored() {
        let scan = scan("import a from './a';\nimport { b } from 'b';\nconst c = a + b;\n");
        assert!(scan.records.is_empty());
        assert!(scan.relative.is_empty());
        assert!(scan.external.is_empty());
    }
}
