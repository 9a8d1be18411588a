//! Search module - Exhaustive constant-relation matching
//!
//! Enumerate operator/operand combinations, score by distance to the
//! target, keep the best and every candidate within tolerance.

pub mod matcher;
pub mod operators;
pub mod scoring;

pub use matcher::*;
pub use operators::*;
pub use scoring::*;
