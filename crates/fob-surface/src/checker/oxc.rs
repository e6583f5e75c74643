//! [`TypeChecker`] backed by `oxc_semantic`.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use super::facts::{EntryTarget, ExportEntry, Imported, ModuleFacts};
use super::{
    AliasTarget, CheckedExport, DeclarationKind, DeclarationSite, ResolvedSymbol, SymbolFacets,
    TypeChecker,
};
use crate::config::MAX_ALIAS_HOPS;
use crate::error::ExtractError;
use crate::extract::source::read_source;
use crate::resolver::{DECLARATION_FIRST_SUFFIXES, ModuleResolver, is_relative_specifier};

/// Cross-module symbol resolution over cached [`ModuleFacts`].
///
/// Each file is read and parsed at most once per checker.
#[derive(Debug)]
pub struct OxcChecker {
    resolver: ModuleResolver,
    cache: Mutex<FxHashMap<PathBuf, Arc<ModuleFacts>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Step {
    Local { module: PathBuf, name: String },
    Export { module: PathBuf, name: String },
}

impl OxcChecker {
    pub fn new(resolver: ModuleResolver) -> Self {
        Self {
            resolver,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    async fn facts(&self, path: &Path) -> Result<Arc<ModuleFacts>, ExtractError> {
        let cached = self.cache.lock().get(path).cloned();
        if let Some(facts) = cached {
            return Ok(facts);
        }

        let source = read_source(self.resolver.runtime().as_ref(), path).await?;
        let facts = Arc::new(ModuleFacts::parse(path, &source)?);
        self.cache
            .lock()
            .insert(path.to_path_buf(), Arc::clone(&facts));
        Ok(facts)
    }

    /// Facts of a module reached while following an alias; failures there
    /// only end the chain.
    async fn linked_facts(&self, path: &Path) -> Option<Arc<ModuleFacts>> {
        match self.facts(path).await {
            Ok(facts) => Some(facts),
            Err(error) => {
                debug!(path = %path.display(), %error, "skipping unreadable linked module");
                None
            }
        }
    }

    async fn resolve_from(&self, module: &Path, specifier: &str) -> Option<PathBuf> {
        self.resolver
            .resolve_import(module, specifier, DECLARATION_FIRST_SUFFIXES)
            .await
    }

    /// Every name `path` exports, including `export *` contributions.
    async fn export_names(&self, path: &Path) -> FxHashSet<String> {
        let mut names = FxHashSet::default();
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([path.to_path_buf()]);

        while let Some(module) = queue.pop_front() {
            if !visited.insert(module.clone()) {
                continue;
            }
            let Some(facts) = self.linked_facts(&module).await else {
                continue;
            };
            let is_root = module.as_path() == path;
            names.extend(
                facts
                    .exports
                    .keys()
                    .filter(|name| is_root || name.as_str() != "default")
                    .cloned(),
            );
            for star in &facts.stars {
                if let Some(target) = self.resolve_from(&module, &star.source).await {
                    queue.push_back(target);
                }
            }
        }
        names
    }

    async fn check_entries(
        &self,
        facts: &ModuleFacts,
        name: &str,
        entries: &[ExportEntry],
    ) -> CheckedExport {
        let declarations = entries
            .iter()
            .map(|entry| DeclarationSite {
                file: facts.path.clone(),
                kind: entry.kind,
            })
            .collect();

        if let Some(symbol) = direct_symbol(facts, name, entries) {
            return CheckedExport {
                name: name.to_string(),
                module: facts.path.clone(),
                declarations,
                symbol,
                alias: None,
            };
        }

        // entries is never empty for a name present in the export table
        let alias = match entries.first().map(|entry| &entry.target) {
            Some(EntryTarget::Local(local)) => AliasTarget::Binding {
                module: facts.path.clone(),
                local: local.clone(),
            },
            Some(EntryTarget::Reexport { source, imported }) => {
                match self.resolve_from(&facts.path, source).await {
                    Some(module) => AliasTarget::Export {
                        module,
                        name: imported.clone(),
                    },
                    None => AliasTarget::Unresolved {
                        specifier: source.clone(),
                    },
                }
            }
            Some(EntryTarget::Namespace { source }) => {
                match self.resolve_from(&facts.path, source).await {
                    Some(module) => AliasTarget::Namespace { module },
                    None => AliasTarget::Unresolved {
                        specifier: source.clone(),
                    },
                }
            }
            _ => AliasTarget::Unresolved {
                specifier: name.to_string(),
            },
        };

        CheckedExport {
            name: name.to_string(),
            module: facts.path.clone(),
            declarations,
            symbol: alias_symbol(facts, name, entries),
            alias: Some(alias),
        }
    }

    /// Follow an alias chain to its declaration.
    async fn follow(&self, start: Step, export_name: &str) -> Option<ResolvedSymbol> {
        let mut step = start;
        let mut type_only = false;
        let mut seen = FxHashSet::default();

        for _ in 0..MAX_ALIAS_HOPS {
            if !seen.insert(step.clone()) {
                trace!(export_name, "alias cycle");
                return None;
            }
            step = match step {
                Step::Local { module, name } => {
                    let facts = self.linked_facts(&module).await?;
                    let local = facts.locals.get(&name)?;
                    let Some(import) = &local.import else {
                        let symbol = ResolvedSymbol {
                            name,
                            facets: local.facets,
                            declarations: vec![module],
                            documentation: local.docs.clone(),
                        };
                        return Some(strip_value(symbol, type_only));
                    };
                    type_only |= import.type_only;
                    let target = self.resolve_from(&module, &import.source).await?;
                    match &import.imported {
                        Imported::Named(imported) => Step::Export {
                            module: target,
                            name: imported.clone(),
                        },
                        Imported::Default => Step::Export {
                            module: target,
                            name: "default".to_string(),
                        },
                        Imported::Namespace => {
                            return Some(strip_value(namespace_symbol(&name, target), type_only));
                        }
                    }
                }
                Step::Export { module, name } => {
                    let facts = self.linked_facts(&module).await?;
                    match facts.exports.get(&name) {
                        Some(entries) => {
                            if let Some(symbol) = direct_symbol(&facts, &name, entries) {
                                type_only |= entries.iter().all(|entry| entry.kind.is_type_only());
                                return Some(strip_value(symbol, type_only));
                            }
                            let entry = entries.first()?;
                            type_only |= entry.kind.is_type_only();
                            match &entry.target {
                                EntryTarget::Local(local) => Step::Local {
                                    module,
                                    name: local.clone(),
                                },
                                EntryTarget::Reexport { source, imported } => Step::Export {
                                    module: self.resolve_from(&module, source).await?,
                                    name: imported.clone(),
                                },
                                EntryTarget::Namespace { source } => {
                                    let target = self.resolve_from(&module, source).await?;
                                    return Some(strip_value(
                                        namespace_symbol(&name, target),
                                        type_only,
                                    ));
                                }
                                EntryTarget::Declared(_) | EntryTarget::Inline(_) => return None,
                            }
                        }
                        None if name != "default" => {
                            let mut found = None;
                            for star in &facts.stars {
                                let Some(target) = self.resolve_from(&module, &star.source).await
                                else {
                                    continue;
                                };
                                if self.export_names(&target).await.contains(&name) {
                                    found = Some((target, star.type_only));
                                    break;
                                }
                            }
                            let (target, star_type_only) = found?;
                            type_only |= star_type_only;
                            Step::Export {
                                module: target,
                                name,
                            }
                        }
                        None => return None,
                    }
                }
            };
        }
        trace!(export_name, "alias hop limit reached");
        None
    }
}

#[async_trait]
impl TypeChecker for OxcChecker {
    async fn exports_of_module(
        &self,
        path: &Path,
    ) -> Result<Option<Vec<CheckedExport>>, ExtractError> {
        let facts = self.facts(path).await?;
        if !facts.has_module_syntax {
            return Ok(None);
        }

        let mut table: IndexMap<String, CheckedExport> = IndexMap::new();
        for (name, entries) in &facts.exports {
            let checked = self.check_entries(&facts, name, entries).await;
            table.insert(name.clone(), checked);
        }

        // `export *` contributions: never `default`, never shadowing a local name
        let mut visited = FxHashSet::default();
        visited.insert(path.to_path_buf());
        let mut queue: VecDeque<(PathBuf, String, bool)> = facts
            .stars
            .iter()
            .map(|star| (facts.path.clone(), star.source.clone(), star.type_only))
            .collect();

        while let Some((from, source, type_only)) = queue.pop_front() {
            let Some(target) = self.resolve_from(&from, &source).await else {
                debug!(from = %from.display(), source, "unresolved star export");
                continue;
            };
            if !visited.insert(target.clone()) {
                continue;
            }
            let Some(target_facts) = self.linked_facts(&target).await else {
                continue;
            };

            for (name, entries) in &target_facts.exports {
                if name == "default" || table.contains_key(name) {
                    continue;
                }
                let declarations = entries
                    .iter()
                    .map(|entry| DeclarationSite {
                        file: target.clone(),
                        kind: if type_only {
                            DeclarationKind::ExportDeclaration { type_only: true }
                        } else {
                            entry.kind
                        },
                    })
                    .collect();
                table.insert(
                    name.clone(),
                    CheckedExport {
                        name: name.clone(),
                        module: facts.path.clone(),
                        declarations,
                        symbol: alias_symbol(&target_facts, name, entries),
                        alias: Some(AliasTarget::Export {
                            module: target.clone(),
                            name: name.clone(),
                        }),
                    },
                );
            }

            for star in &target_facts.stars {
                queue.push_back((target.clone(), star.source.clone(), type_only || star.type_only));
            }
        }

        Ok(Some(table.into_values().collect()))
    }

    async fn aliased_symbol(&self, export: &CheckedExport) -> Option<ResolvedSymbol> {
        let start = match export.alias.as_ref()? {
            AliasTarget::Binding { module, local } => Step::Local {
                module: module.clone(),
                name: local.clone(),
            },
            AliasTarget::Export { module, name } => Step::Export {
                module: module.clone(),
                name: name.clone(),
            },
            AliasTarget::Namespace { module } => {
                let symbol = namespace_symbol(&export.name, module.clone());
                let type_only = export.declarations.iter().all(|d| d.kind.is_type_only());
                return Some(strip_value(symbol, type_only));
            }
            AliasTarget::Unresolved { .. } => return None,
        };
        self.follow(start, &export.name).await
    }

    async fn relative_star_sources(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let facts = self.facts(path).await?;
        Ok(facts
            .stars
            .iter()
            .filter(|star| is_relative_specifier(&star.source))
            .map(|star| star.source.clone())
            .collect())
    }
}

/// Symbol for an export whose entries declare it in place.
fn direct_symbol(facts: &ModuleFacts, name: &str, entries: &[ExportEntry]) -> Option<ResolvedSymbol> {
    let mut facets = SymbolFacets::default();
    let mut documentation = Vec::new();
    let mut seen_locals = FxHashSet::default();
    let mut direct = false;

    for entry in entries {
        match &entry.target {
            EntryTarget::Declared(local) => {
                direct = true;
                if !seen_locals.insert(local.as_str()) {
                    continue;
                }
                match facts.locals.get(local) {
                    Some(symbol) => {
                        facets = facets.union(symbol.facets);
                        documentation.extend(symbol.docs.iter().cloned());
                    }
                    None => facets = facets.union(SymbolFacets::VALUE),
                }
            }
            EntryTarget::Inline(inline) => {
                direct = true;
                facets = facets.union(*inline);
                documentation.extend(entry.docs.iter().cloned());
            }
            _ => {}
        }
    }

    direct.then(|| ResolvedSymbol {
        name: name.to_string(),
        facets,
        declarations: vec![facts.path.clone()],
        documentation,
    })
}

/// The alias itself, used when its target cannot be resolved: a type-only
/// alias means a type, anything else a value.
fn alias_symbol(facts: &ModuleFacts, name: &str, entries: &[ExportEntry]) -> ResolvedSymbol {
    if let Some(symbol) = direct_symbol(facts, name, entries) {
        return symbol;
    }
    let type_only = !entries.is_empty() && entries.iter().all(|entry| entry.kind.is_type_only());
    ResolvedSymbol {
        name: name.to_string(),
        facets: if type_only {
            SymbolFacets::TYPE
        } else {
            SymbolFacets::VALUE
        },
        declarations: vec![facts.path.clone()],
        documentation: entries.iter().flat_map(|entry| entry.docs.iter().cloned()).collect(),
    }
}

fn namespace_symbol(name: &str, module: PathBuf) -> ResolvedSymbol {
    ResolvedSymbol {
        name: name.to_string(),
        facets: SymbolFacets::VALUE,
        declarations: vec![module],
        documentation: Vec::new(),
    }
}

/// A chain through a type-only import or export keeps only the type meaning.
fn strip_value(mut symbol: ResolvedSymbol, type_only: bool) -> ResolvedSymbol {
    if type_only {
        symbol.facets.value = false;
    }
    symbol
}
