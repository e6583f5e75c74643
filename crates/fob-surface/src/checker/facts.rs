//! Per-module symbol facts gathered from one parse.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingPattern, BindingPatternKind, Declaration, ExportDefaultDeclarationKind, Expression,
    ImportDeclarationSpecifier, ModuleDeclaration, Program, Statement, TSModuleDeclarationName,
};
use oxc_semantic::{SemanticBuilder, SymbolFlags};
use oxc_span::GetSpan;
use rustc_hash::FxHashMap;

use super::{DeclarationKind, SymbolFacets};
use crate::error::ExtractError;
use crate::extract::DocComments;
use crate::extract::source::{export_name, parse_program};

/// What an export entry refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryTarget {
    /// `export function f`, `export interface I`, `export default class C`.
    Declared(String),
    /// Anonymous default export with the given meanings.
    Inline(SymbolFacets),
    /// `export { a }`, `export default a`, `export = a`.
    Local(String),
    /// `export { a as b } from './x'` (`imported` is `a`).
    Reexport { source: String, imported: String },
    /// `export * as ns from './x'`.
    Namespace { source: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub target: EntryTarget,
    pub kind: DeclarationKind,
    /// Doc comments attached to the export statement itself.
    pub docs: Vec<String>,
}

/// `export * from './x'` (or `export type * from`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarExport {
    pub source: String,
    pub type_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
    Named(String),
    Default,
    Namespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub source: String,
    pub imported: Imported,
    pub type_only: bool,
}

/// A module-scope binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalSymbol {
    pub facets: SymbolFacets,
    pub docs: Vec<String>,
    pub import: Option<ImportBinding>,
}

#[derive(Debug, Clone)]
pub struct ModuleFacts {
    pub path: PathBuf,
    /// `false` for scripts without any import or export.
    pub has_module_syntax: bool,
    pub exports: IndexMap<String, Vec<ExportEntry>>,
    pub stars: Vec<StarExport>,
    pub locals: FxHashMap<String, LocalSymbol>,
}

impl ModuleFacts {
    /// Parse `source` and collect facts; any parse diagnostic rejects the module.
    pub fn parse(path: &Path, source: &str) -> Result<Self, ExtractError> {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, path, source)?;
        Ok(Self::from_program(path, &program))
    }

    pub fn from_program(path: &Path, program: &Program<'_>) -> Self {
        let mut facts = Self {
            path: path.to_path_buf(),
            has_module_syntax: false,
            exports: IndexMap::new(),
            stars: Vec::new(),
            locals: root_scope_locals(program),
        };
        let docs = DocComments::new(program);

        for statement in program.body.iter() {
            let doc: Vec<String> = docs
                .raw(statement_start(statement))
                .map(|raw| vec![raw.to_string()])
                .unwrap_or_default();

            if let Some(declaration) = statement.as_declaration() {
                for name in declared_names(declaration) {
                    facts.local_mut(&name).docs.extend(doc.iter().cloned());
                }
                continue;
            }

            let Some(module_decl) = statement.as_module_declaration() else {
                continue;
            };
            facts.has_module_syntax = true;
            facts.collect_module_declaration(module_decl, doc);
        }
        facts
    }

    fn collect_module_declaration(&mut self, declaration: &ModuleDeclaration<'_>, doc: Vec<String>) {
        match declaration {
            ModuleDeclaration::ImportDeclaration(import) => {
                let Some(specifiers) = &import.specifiers else {
                    return;
                };
                let source = import.source.value.to_string();
                for specifier in specifiers.iter() {
                    let (local, imported, type_only) = match specifier {
                        ImportDeclarationSpecifier::ImportSpecifier(named) => (
                            named.local.name.to_string(),
                            Imported::Named(export_name(&named.imported)),
                            named.import_kind.is_type(),
                        ),
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(default) => {
                            (default.local.name.to_string(), Imported::Default, false)
                        }
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(namespace) => {
                            (namespace.local.name.to_string(), Imported::Namespace, false)
                        }
                    };
                    self.local_mut(&local).import = Some(ImportBinding {
                        source: source.clone(),
                        imported,
                        type_only: type_only || import.import_kind.is_type(),
                    });
                }
            }
            ModuleDeclaration::ExportNamedDeclaration(named) => {
                let clause_type_only = named.export_kind.is_type();
                if let Some(declared) = &named.declaration {
                    for name in declared_names(declared) {
                        self.local_mut(&name).docs.extend(doc.iter().cloned());
                        self.add_export(
                            name.clone(),
                            EntryTarget::Declared(name),
                            DeclarationKind::Declaration,
                            Vec::new(),
                        );
                    }
                }
                for specifier in named.specifiers.iter() {
                    let local = export_name(&specifier.local);
                    let target = match &named.source {
                        Some(source) => EntryTarget::Reexport {
                            source: source.value.to_string(),
                            imported: local,
                        },
                        None => EntryTarget::Local(local),
                    };
                    let kind = DeclarationKind::ExportSpecifier {
                        type_only: specifier.export_kind.is_type(),
                        clause_type_only,
                    };
                    self.add_export(export_name(&specifier.exported), target, kind, doc.clone());
                }
            }
            ModuleDeclaration::ExportDefaultDeclaration(default) => {
                let (target, kind) = match &default.declaration {
                    ExportDefaultDeclarationKind::FunctionDeclaration(function) => {
                        match &function.id {
                            Some(id) => (
                                EntryTarget::Declared(id.name.to_string()),
                                DeclarationKind::Declaration,
                            ),
                            None => (
                                EntryTarget::Inline(SymbolFacets::VALUE),
                                DeclarationKind::Declaration,
                            ),
                        }
                    }
                    ExportDefaultDeclarationKind::ClassDeclaration(class) => match &class.id {
                        Some(id) => (
                            EntryTarget::Declared(id.name.to_string()),
                            DeclarationKind::Declaration,
                        ),
                        None => (
                            EntryTarget::Inline(SymbolFacets::BOTH),
                            DeclarationKind::Declaration,
                        ),
                    },
                    ExportDefaultDeclarationKind::TSInterfaceDeclaration(interface) => (
                        EntryTarget::Declared(interface.id.name.to_string()),
                        DeclarationKind::Declaration,
                    ),
                    ExportDefaultDeclarationKind::Identifier(ident) => (
                        EntryTarget::Local(ident.name.to_string()),
                        DeclarationKind::ExportDeclaration { type_only: false },
                    ),
                    _ => (
                        EntryTarget::Inline(SymbolFacets::VALUE),
                        DeclarationKind::ExportDeclaration { type_only: false },
                    ),
                };
                if let EntryTarget::Declared(name) = &target {
                    let name = name.clone();
                    self.local_mut(&name).docs.extend(doc.iter().cloned());
                }
                self.add_export("default".to_string(), target, kind, doc);
            }
            ModuleDeclaration::TSExportAssignment(assignment) => {
                let target = match &assignment.expression {
                    Expression::Identifier(ident) => EntryTarget::Local(ident.name.to_string()),
                    _ => EntryTarget::Inline(SymbolFacets::VALUE),
                };
                self.add_export(
                    "default".to_string(),
                    target,
                    DeclarationKind::ExportDeclaration { type_only: false },
                    doc,
                );
            }
            ModuleDeclaration::ExportAllDeclaration(all) => {
                let type_only = all.export_kind.is_type();
                let source = all.source.value.to_string();
                match &all.exported {
                    Some(exported) => self.add_export(
                        export_name(exported),
                        EntryTarget::Namespace { source },
                        DeclarationKind::ExportDeclaration { type_only },
                        doc,
                    ),
                    None => self.stars.push(StarExport { source, type_only }),
                }
            }
            _ => {}
        }
    }

    fn add_export(
        &mut self,
        name: String,
        target: EntryTarget,
        kind: DeclarationKind,
        docs: Vec<String>,
    ) {
        self.exports
            .entry(name)
            .or_default()
            .push(ExportEntry { target, kind, docs });
    }

    fn local_mut(&mut self, name: &str) -> &mut LocalSymbol {
        self.locals.entry(name.to_string()).or_default()
    }
}

/// Module-scope symbols with their value/type meanings, merged by name
/// (`interface Foo` + `declare const Foo` is one name with both facets).
fn root_scope_locals(program: &Program<'_>) -> FxHashMap<String, LocalSymbol> {
    let semantic_ret = SemanticBuilder::new().build(program);
    let scoping = semantic_ret.semantic.scoping();
    let root = scoping.root_scope_id();

    let mut locals: FxHashMap<String, LocalSymbol> = FxHashMap::default();
    for symbol_id in scoping.symbol_ids() {
        if scoping.symbol_scope_id(symbol_id) != root {
            continue;
        }
        let flags = scoping.symbol_flags(symbol_id);
        let facets = SymbolFacets {
            value: flags.intersects(SymbolFlags::Value),
            ty: flags.intersects(SymbolFlags::Type),
        };
        let local = locals
            .entry(scoping.symbol_name(symbol_id).to_string())
            .or_default();
        local.facets = local.facets.union(facets);
    }
    locals
}

fn statement_start(statement: &Statement<'_>) -> u32 {
    statement.span().start
}

/// Names bound by a declaration.
pub(crate) fn declared_names(declaration: &Declaration<'_>) -> Vec<String> {
    match declaration {
        Declaration::VariableDeclaration(variable) => {
            let mut names = Vec::new();
            for declarator in variable.declarations.iter() {
                collect_binding_names(&declarator.id, &mut names);
            }
            names
        }
        Declaration::FunctionDeclaration(function) => function
            .id
            .as_ref()
            .map(|id| vec![id.name.to_string()])
            .unwrap_or_default(),
        Declaration::ClassDeclaration(class) => class
            .id
            .as_ref()
            .map(|id| vec![id.name.to_string()])
            .unwrap_or_default(),
        Declaration::TSTypeAliasDeclaration(alias) => vec![alias.id.name.to_string()],
        Declaration::TSInterfaceDeclaration(interface) => vec![interface.id.name.to_string()],
        Declaration::TSEnumDeclaration(enumeration) => vec![enumeration.id.name.to_string()],
        Declaration::TSModuleDeclaration(module) => match &module.id {
            TSModuleDeclarationName::Identifier(ident) => vec![ident.name.to_string()],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn collect_binding_names(pattern: &BindingPattern<'_>, names: &mut Vec<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(ident) => names.push(ident.name.to_string()),
        BindingPatternKind::ObjectPattern(object) => {
            for property in object.properties.iter() {
                collect_binding_names(&property.value, names);
            }
            if let Some(rest) = &object.rest {
                collect_binding_names(&rest.argument, names);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                collect_binding_names(element, names);
            }
            if let Some(rest) = &array.rest {
                collect_binding_names(&rest.argument, names);
            }
        }
        BindingPatternKind::AssignmentPattern(assignment) => {
            collect_binding_names(&assignment.left, names);
        }
    }
}
