//! Algebra module - Symbolic manipulation of expressions and equations
//!
//! Substitution, calculus, numeric evaluation, linear solving and the
//! structural comparison of linear ODEs. Everything here returns new
//! canonical expressions; nothing mutates in place.

pub mod calculus;
pub mod evaluate;
pub mod solve;
pub mod structure;
pub mod substitute;

pub use evaluate::{Bindings, EvalError, EvalResult};
pub use solve::{SolveError, SolveResult};
pub use structure::{OdeSignature, StructureError, StructureResult};
