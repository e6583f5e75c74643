//! Finding the exposure map inside a build configuration file.

use oxc_ast::ast::{Expression, ObjectExpression, ObjectPropertyKind, PropertyKey};
use oxc_ast_visit::{Visit, walk};

/// Prefix carried by federated exposure keys (`"./Button"`).
pub const EXPOSURE_KEY_PREFIX: &str = "./";

/// An object is exposure-like when strictly more than this share of its
/// keys carry [`EXPOSURE_KEY_PREFIX`].
pub const EXPOSURE_KEY_RATIO: f64 = 0.5;

/// Shape test for objects not found under an `exposes` key.
///
/// `keys` are the object's string and identifier keys; computed keys and
/// spreads are not counted.
pub fn is_exposure_like(keys: &[&str]) -> bool {
    if keys.is_empty() {
        return false;
    }
    let prefixed = keys
        .iter()
        .filter(|key| key.starts_with(EXPOSURE_KEY_PREFIX))
        .count();
    prefixed as f64 / keys.len() as f64 > EXPOSURE_KEY_RATIO
}

/// One property of an exposure map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposureEntry {
    pub name: String,
    /// Present only for string-literal values.
    pub target: Option<String>,
}

/// How the map was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Value of a key literally named `exposes`.
    Exact,
    /// First object passing [`is_exposure_like`].
    Heuristic,
}

#[derive(Default)]
struct ObjectScanner {
    exact: Option<Vec<ExposureEntry>>,
    heuristic: Option<Vec<ExposureEntry>>,
}

impl<'a> Visit<'a> for ObjectScanner {
    fn visit_object_expression(&mut self, object: &ObjectExpression<'a>) {
        if self.exact.is_some() {
            return;
        }

        for property in object.properties.iter() {
            let ObjectPropertyKind::ObjectProperty(property) = property else {
                continue;
            };
            if key_name(&property.key).as_deref() != Some("exposes") {
                continue;
            }
            if let Expression::ObjectExpression(inner) = &property.value {
                self.exact = Some(entries(inner));
                return;
            }
        }

        if self.heuristic.is_none() {
            let keys = entries(object);
            let names: Vec<&str> = keys.iter().map(|entry| entry.name.as_str()).collect();
            if is_exposure_like(&names) {
                self.heuristic = Some(keys);
            }
        }

        walk::walk_object_expression(self, object);
    }
}

/// Scan a parsed config for an exposure map; an `exposes` key wins over
/// any heuristic match.
pub fn scan_exposures(program: &oxc_ast::ast::Program<'_>) -> Option<(MatchKind, Vec<ExposureEntry>)> {
    let mut scanner = ObjectScanner::default();
    scanner.visit_program(program);
    match (scanner.exact, scanner.heuristic) {
        (Some(exact), _) => Some((MatchKind::Exact, exact)),
        (None, Some(heuristic)) => Some((MatchKind::Heuristic, heuristic)),
        (None, None) => None,
    }
}

fn entries(object: &ObjectExpression<'_>) -> Vec<ExposureEntry> {
    object
        .properties
        .iter()
        .filter_map(|property| match property {
            ObjectPropertyKind::ObjectProperty(property) => {
                let name = key_name(&property.key)?;
                let target = match &property.value {
                    Expression::StringLiteral(lit) => Some(lit.value.to_string()),
                    _ => None,
                };
                Some(ExposureEntry { name, target })
            }
            ObjectPropertyKind::SpreadProperty(_) => None,
        })
        .collect()
}

fn key_name(key: &PropertyKey<'_>) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(ident) => Some(ident.name.to_string()),
        PropertyKey::StringLiteral(lit) => Some(lit.value.to_string()),
        _ => None,
    }
}
