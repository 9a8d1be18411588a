//! Constant table loader
//!
//! Parses named-constant tables from JSON. Entries keep their file order,
//! which is the order the matcher enumerates operands in.

pub mod tables;

pub use tables::{load_table, load_tables};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Name of the target entry in the built-in table
pub const DEFAULT_TARGET: &str = "TARGET";

/// Table loader result
pub type LoadResult<T> = Result<T, LoadError>;

/// Table loading and validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Duplicate constant name: {0}")]
    DuplicateConstant(String),

    #[error("Target constant {0} is not in the table")]
    MissingTarget(String),

    #[error("Constant {name} has non-finite value {value}")]
    NonFiniteValue { name: String, value: f64 },
}

/// A named numeric constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedConstant {
    pub name: String,
    pub value: f64,
}

impl NamedConstant {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Validated table of named constants with one designated target
///
/// Names are unique, the target is present and every value is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableDocument", into = "TableDocument")]
pub struct ConstantTable {
    id: String,
    description: String,
    target: String,
    entries: Vec<NamedConstant>,
}

/// On-disk JSON layout of a table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableDocument {
    id: String,

    #[serde(default)]
    description: String,

    #[serde(default = "default_target")]
    target: String,

    constants: Vec<NamedConstant>,
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

impl TryFrom<TableDocument> for ConstantTable {
    type Error = LoadError;

    fn try_from(doc: TableDocument) -> LoadResult<Self> {
        Ok(ConstantTable::new(doc.id, doc.target, doc.constants)?.with_description(doc.description))
    }
}

impl From<ConstantTable> for TableDocument {
    fn from(table: ConstantTable) -> Self {
        TableDocument {
            id: table.id,
            description: table.description,
            target: table.target,
            constants: table.entries,
        }
    }
}

impl ConstantTable {
    /// Build and validate a table
    pub fn new(
        id: impl Into<String>,
        target: impl Into<String>,
        entries: Vec<NamedConstant>,
    ) -> LoadResult<Self> {
        let target = target.into();

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(LoadError::DuplicateConstant(entry.name.clone()));
            }
            if !entry.value.is_finite() {
                return Err(LoadError::NonFiniteValue {
                    name: entry.name.clone(),
                    value: entry.value,
                });
            }
        }
        if !seen.contains(target.as_str()) {
            return Err(LoadError::MissingTarget(target));
        }

        Ok(Self {
            id: id.into(),
            description: String::new(),
            target,
            entries,
        })
    }

    /// Build from `(name, value)` pairs
    pub fn from_pairs(id: &str, target: &str, pairs: &[(&str, f64)]) -> LoadResult<Self> {
        let entries = pairs
            .iter()
            .map(|(name, value)| NamedConstant::new(*name, *value))
            .collect();
        Self::new(id, target, entries)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Three hypothetical constants and a mystery value close to `C3**2`
    pub fn builtin() -> Self {
        Self {
            id: "builtin".to_string(),
            description: "Hypothetical constants near the golden ratio, e and pi".to_string(),
            target: DEFAULT_TARGET.to_string(),
            entries: vec![
                NamedConstant::new("C1", 1.618),
                NamedConstant::new("C2", 2.718),
                NamedConstant::new("C3", 3.1415),
                NamedConstant::new(DEFAULT_TARGET, 9.869),
            ],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Value of the target entry
    pub fn target_value(&self) -> f64 {
        self.value_of(&self.target).unwrap_or(f64::NAN)
    }

    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value)
    }

    /// All entries, target included, in table order
    pub fn entries(&self) -> &[NamedConstant] {
        &self.entries
    }

    /// Non-target entries in table order
    pub fn operands(&self) -> impl Iterator<Item = &NamedConstant> + '_ {
        self.entries.iter().filter(move |e| e.name != self.target)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = ConstantTable::builtin();

        assert_eq!(table.len(), 4);
        assert_eq!(table.target(), "TARGET");
        assert_eq!(table.target_value(), 9.869);

        let operands: Vec<&str> = table.operands().map(|e| e.name.as_str()).collect();
        assert_eq!(operands, vec!["C1", "C2", "C3"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = ConstantTable::from_pairs("dup", "T", &[("A", 1.0), ("A", 2.0), ("T", 3.0)]);
        assert_eq!(result, Err(LoadError::DuplicateConstant("A".to_string())));
    }

    #[test]
    fn test_missing_target_rejected() {
        let result = ConstantTable::from_pairs("nt", "T", &[("A", 1.0)]);
        assert_eq!(result, Err(LoadError::MissingTarget("T".to_string())));
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = ConstantTable::from_pairs("nan", "T", &[("A", f64::INFINITY), ("T", 1.0)]);
        assert!(matches!(result, Err(LoadError::NonFiniteValue { .. })));
    }

    #[test]
    fn test_target_only_table_has_no_operands() {
        let table = ConstantTable::from_pairs("lonely", "T", &[("T", 4.0)]).unwrap();
        assert_eq!(table.operands().count(), 0);
    }

    #[test]
    fn test_json_preserves_order_and_validates() {
        let json = r#"{
            "id": "ordered",
            "target": "T",
            "constants": [
                {"name": "Z", "value": 1.0},
                {"name": "A", "value": 2.0},
                {"name": "T", "value": 3.0}
            ]
        }"#;
        let table: ConstantTable = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = table.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "T"]);
        assert_eq!(table.description(), "");

        let bad = r#"{"id": "bad", "target": "T", "constants": [{"name": "A", "value": 1.0}]}"#;
        assert!(serde_json::from_str::<ConstantTable>(bad).is_err());
    }

    #[test]
    fn test_target_defaults_to_target_name() {
        let json = r#"{"id": "d", "constants": [{"name": "TARGET", "value": 1.0}]}"#;
        let table: ConstantTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.target(), DEFAULT_TARGET);
    }
}
