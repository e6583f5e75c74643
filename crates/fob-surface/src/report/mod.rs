//! Report aggregation.
//!
//! Extractors push raw [`ExportRecord`]s; [`ReportBuilder::finish`] collapses
//! them into duplicate-free, order-stable lists. A name that was seen
//! documented at least once is never listed as undocumented.

use indexmap::IndexSet;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Report bucket an export belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Has a runtime representation.
    Value,
    /// Exists only in the type system.
    Type,
    /// Declared in a federated exposure map.
    Exposure,
}

/// One sighting of an exported name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub name: String,
    pub category: Category,
    pub documented: bool,
}

impl ExportRecord {
    pub fn new(name: impl Into<String>, category: Category, documented: bool) -> Self {
        Self {
            name: name.into(),
            category,
            documented,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RawBucket {
    all: Vec<String>,
    documented: Vec<String>,
    undocumented: Vec<String>,
}

impl RawBucket {
    fn push(&mut self, name: String, documented: bool) {
        if documented {
            self.documented.push(name.clone());
        } else {
            self.undocumented.push(name.clone());
        }
        self.all.push(name);
    }

    fn finish(self) -> CategoryReport {
        let list: IndexSet<String> = self.all.into_iter().collect();
        let documented: IndexSet<String> = self.documented.into_iter().collect();
        let undocumented = self
            .undocumented
            .into_iter()
            .filter(|name| !documented.contains(name))
            .collect::<IndexSet<String>>();
        CategoryReport {
            list: list.into_iter().collect(),
            documented: documented.into_iter().collect(),
            undocumented: undocumented.into_iter().collect(),
        }
    }
}

/// Mutable accumulator owned by a single analysis run.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    value: RawBucket,
    ty: RawBucket,
    exposure: RawBucket,
    re_exports: IndexSet<String>,
    externally_originated: IndexSet<String>,
    modules: Vec<String>,
    errors: Vec<String>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ExportRecord) {
        let bucket = match record.category {
            Category::Value => &mut self.value,
            Category::Type => &mut self.ty,
            Category::Exposure => &mut self.exposure,
        };
        bucket.push(record.name, record.documented);
    }

    pub fn add_re_export(&mut self, specifier: impl Into<String>) {
        self.re_exports.insert(specifier.into());
    }

    pub fn add_external_origin(&mut self, name: impl Into<String>) {
        self.externally_originated.insert(name.into());
    }

    /// Record an analyzed module (display form, usually root-relative).
    pub fn add_module(&mut self, module: impl Into<String>) {
        self.modules.push(module.into());
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Collapse raw sightings into the final report.
    pub fn finish(self, package: String, version: Option<String>, entry_points: Vec<String>) -> Report {
        Report {
            package,
            version,
            generated_at: None,
            value: self.value.finish(),
            ty: self.ty.finish(),
            exposure: self.exposure.finish(),
            re_exports: self.re_exports.into_iter().collect(),
            externally_originated: self.externally_originated.into_iter().collect(),
            entry_points,
            modules: self.modules,
            errors: self.errors,
        }
    }
}

/// Final, deduplicated view of one bucket. Counts are derived from the lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryReport {
    pub list: Vec<String>,
    pub documented: Vec<String>,
    pub undocumented: Vec<String>,
}

impl CategoryReport {
    pub fn total(&self) -> usize {
        self.list.len()
    }

    pub fn documented_count(&self) -> usize {
        self.documented.len()
    }

    pub fn undocumented_count(&self) -> usize {
        self.undocumented.len()
    }
}

impl Serialize for CategoryReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CategoryReport", 6)?;
        state.serialize_field("total", &self.total())?;
        state.serialize_field("documentedCount", &self.documented_count())?;
        state.serialize_field("undocumentedCount", &self.undocumented_count())?;
        state.serialize_field("list", &self.list)?;
        state.serialize_field("documented", &self.documented)?;
        state.serialize_field("undocumented", &self.undocumented)?;
        state.end()
    }
}

/// The public API surface of one package.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub package: String,
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub value: CategoryReport,
    #[serde(rename = "type")]
    pub ty: CategoryReport,
    pub exposure: CategoryReport,
    pub re_exports: Vec<String>,
    pub externally_originated: Vec<String>,
    pub entry_points: Vec<String>,
    pub modules: Vec<String>,
    pub errors: Vec<String>,
}
