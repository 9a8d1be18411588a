//! Symbol declarations
//!
//! A `SymbolTable` records every name used in a derivation together with
//! its role (variable, physical constant, quantity or undefined function)
//! and hands out the corresponding `Expr` leaves.

use super::expr::Expr;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Newtype wrapper for symbol identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Role a declared name plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Independent variable such as `x` or `t`
    Variable,
    /// Positive physical constant such as `m`, `k` or `hbar`
    Constant,
    /// Physical quantity such as velocity or force
    Quantity,
    /// Undefined function such as `psi(x, t)`
    Function,
}

/// One declared name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub label: String,
    pub kind: SymbolKind,
    /// Argument names, only non-empty for functions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

/// Thread-safe symbol table
///
/// Each label maps to exactly one `SymbolId`; redeclaring a label returns
/// the existing id and keeps the first declared kind.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    inner: Arc<RwLock<SymbolTableInner>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SymbolTableInner {
    ids: FxHashMap<String, SymbolId>,
    entries: Vec<SymbolEntry>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SymbolTableInner::default())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SymbolTableInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SymbolTableInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn intern(&self, label: &str, kind: SymbolKind, arguments: Vec<String>) -> SymbolId {
        let mut inner = self.write();
        if let Some(&id) = inner.ids.get(label) {
            return id;
        }
        let id = SymbolId(inner.entries.len() as u32);
        inner.ids.insert(label.to_string(), id);
        inner.entries.push(SymbolEntry {
            label: label.to_string(),
            kind,
            arguments,
        });
        id
    }

    /// Declare a single symbol and return it as an expression leaf
    pub fn declare(&self, label: &str, kind: SymbolKind) -> Expr {
        self.intern(label, kind, Vec::new());
        Expr::symbol(label)
    }

    /// Declare several symbols at once from a space or comma separated list
    pub fn declare_many(&self, labels: &str, kind: SymbolKind) -> Vec<Expr> {
        labels
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|label| !label.is_empty())
            .map(|label| self.declare(label, kind))
            .collect()
    }

    /// Declare an undefined function of the given argument variables
    ///
    /// Arguments not yet declared are added as variables.
    pub fn declare_function(&self, name: &str, arguments: &[&str]) -> Expr {
        let args: Vec<Expr> = arguments
            .iter()
            .map(|arg| self.declare(arg, SymbolKind::Variable))
            .collect();
        self.intern(
            name,
            SymbolKind::Function,
            arguments.iter().map(|arg| arg.to_string()).collect(),
        );
        Expr::apply(name, args)
    }

    pub fn get(&self, label: &str) -> Option<SymbolId> {
        self.read().ids.get(label).copied()
    }

    pub fn label(&self, id: SymbolId) -> Option<String> {
        self.read().entries.get(id.0 as usize).map(|e| e.label.clone())
    }

    pub fn kind(&self, label: &str) -> Option<SymbolKind> {
        let inner = self.read();
        let id = inner.ids.get(label)?;
        inner.entries.get(id.0 as usize).map(|e| e.kind)
    }

    /// Labels of a given kind, in declaration order
    pub fn labels_of_kind(&self, kind: SymbolKind) -> Vec<String> {
        self.read()
            .entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.label.clone())
            .collect()
    }

    pub fn entries(&self) -> Vec<SymbolEntry> {
        self.read().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Serialize the table contents, not the lock around them
impl Serialize for SymbolTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.read().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SymbolTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let inner = SymbolTableInner::deserialize(deserializer)?;
        Ok(SymbolTable {
            inner: Arc::new(RwLock::new(inner)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_interning() {
        let table = SymbolTable::new();
        let m1 = table.declare("m", SymbolKind::Constant);
        table.declare("k", SymbolKind::Constant);
        let m2 = table.declare("m", SymbolKind::Quantity);

        assert_eq!(m1, m2, "Same label should give the same symbol");
        assert_eq!(table.len(), 2);
        assert_eq!(table.kind("m"), Some(SymbolKind::Constant), "First kind wins");
    }

    #[test]
    fn test_declare_many() {
        let table = SymbolTable::new();
        let symbols = table.declare_many("m k c G hbar", SymbolKind::Constant);

        assert_eq!(symbols.len(), 5);
        assert_eq!(symbols[4], Expr::symbol("hbar"));
        assert_eq!(
            table.labels_of_kind(SymbolKind::Constant),
            vec!["m", "k", "c", "G", "hbar"]
        );

        let more = table.declare_many("v, a,F", SymbolKind::Quantity);
        assert_eq!(more.len(), 3);
    }

    #[test]
    fn test_declare_function() {
        let table = SymbolTable::new();
        let psi = table.declare_function("psi", &["x", "t"]);

        assert_eq!(psi.to_string(), "psi(x, t)");
        assert_eq!(table.kind("psi"), Some(SymbolKind::Function));
        assert_eq!(table.kind("x"), Some(SymbolKind::Variable));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_label_lookup() {
        let table = SymbolTable::new();
        table.declare("c", SymbolKind::Constant);
        let id = table.get("c").unwrap();

        assert_eq!(table.label(id), Some("c".to_string()));
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn test_json_roundtrip() {
        let table = SymbolTable::new();
        table.declare_many("x t", SymbolKind::Variable);
        table.declare_function("psi", &["x", "t"]);

        let json = serde_json::to_string(&table).unwrap();
        let restored: SymbolTable = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.entries(), table.entries());
        assert_eq!(restored.get("psi"), table.get("psi"));
    }

    #[test]
    fn test_thread_safety() {
        use std::thread;

        let table = SymbolTable::new();
        let table_clone = table.clone();

        let handle = thread::spawn(move || table_clone.declare("X", SymbolKind::Variable));

        table.declare("X", SymbolKind::Variable);
        handle.join().unwrap();

        assert_eq!(table.len(), 1);
    }
}
