//! Intermediate Representation (IR) module
//!
//! This module provides the core data structures for symbolic derivations:
//! - **expr**: Canonical symbolic expressions and their constructors
//! - **printer**: Human-readable rendering of expressions
//! - **equation**: Equations between two expressions
//! - **symbols**: Declared names and their roles
//! - **derivation**: Derivation steps and complete traces with serialization
//!
//! # Example
//!
//! ```rust
//! use symbolic_discovery_core::ir::*;
//!
//! let symbols = SymbolTable::new();
//! let m = symbols.declare("m", SymbolKind::Constant);
//! let a = symbols.declare("a", SymbolKind::Quantity);
//! let f = symbols.declare("F", SymbolKind::Quantity);
//!
//! let newton = Equation::new(f, m * a);
//! assert_eq!(newton.to_string(), "F = a*m");
//!
//! let mut trace = DerivationTrace::new("Newton");
//! trace.record(Operation::Axiom, "second law", &newton);
//! assert_eq!(trace.len(), 1);
//! ```

mod derivation;
mod equation;
mod expr;
mod printer;
mod symbols;

pub use derivation::{
    DerivationError, DerivationResult, DerivationStatistics, DerivationStep, DerivationTrace,
    Operation, StepId,
};
pub use equation::Equation;
pub use expr::{Expr, Func};
pub use symbols::{SymbolEntry, SymbolId, SymbolKind, SymbolTable};
