//! Symbolic Discovery Core
//!
//! Small computer-algebra core for deriving connections between formulae,
//! plus a brute-force matcher that searches a table of constants for a
//! simple relation to a target value

pub mod ir;        // Intermediate representation (expressions, equations, symbols, derivations)
pub mod algebra;   // Symbolic operations (substitute, calculus, evaluate, solve, structure)
pub mod search;    // Constant-relation matcher
pub mod loader;    // Constant table loaders
pub mod narrative; // The six worked derivations

pub use ir::*;
pub use algebra::{Bindings, EvalError, OdeSignature, SolveError, StructureError};
pub use search::{Candidate, ConstantMatcher, MatchError, MatchResult, MatcherConfig, Operator};
pub use loader::{ConstantTable, LoadError, LoadResult, NamedConstant};
pub use narrative::{run_all, run_part, NarrativeError, PART_COUNT};
