//! Narrative module - Six worked derivations
//!
//! Each part builds a `DerivationTrace` from the algebra and search
//! modules: a symbol knowledge base, Euler's formula, the work-energy
//! theorem, the oscillator analogy, the fine-structure constant and a
//! brute-force constant search. Printing is left to the caller.

pub mod constant_search;
pub mod euler;
pub mod fine_structure;
pub mod knowledge_base;
pub mod oscillators;
pub mod work_energy;

use crate::algebra::{EvalError, SolveError, StructureError};
use crate::ir::DerivationTrace;
use crate::search::MatchError;
use thiserror::Error;

/// Number of parts
pub const PART_COUNT: u8 = 6;

/// Errors raised while running a part
#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("Solve failed: {0}")]
    Solve(#[from] SolveError),

    #[error("Structural analysis failed: {0}")]
    Structure(#[from] StructureError),

    #[error("Constant search failed: {0}")]
    Match(#[from] MatchError),

    #[error("Evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("Integral could not be evaluated: {0}")]
    Integration(String),

    #[error("Equations are not structurally analogous: {0}")]
    NoAnalogy(String),

    #[error("No part {0} (parts are numbered 1 to 6)")]
    UnknownPart(u8),
}

/// Result type for narrative parts
pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Title of a part, `None` outside `1..=PART_COUNT`
pub fn part_title(number: u8) -> Option<&'static str> {
    match number {
        1 => Some(knowledge_base::TITLE),
        2 => Some(euler::TITLE),
        3 => Some(work_energy::TITLE),
        4 => Some(oscillators::TITLE),
        5 => Some(fine_structure::TITLE),
        6 => Some(constant_search::TITLE),
        _ => None,
    }
}

/// Run one part by number
pub fn run_part(number: u8) -> NarrativeResult<DerivationTrace> {
    let mut trace = match number {
        1 => knowledge_base::run(),
        2 => euler::run()?,
        3 => work_energy::run()?,
        4 => oscillators::run()?,
        5 => fine_structure::run()?,
        6 => constant_search::run_builtin()?,
        other => return Err(NarrativeError::UnknownPart(other)),
    };
    trace.add_metadata("part", number.to_string());
    Ok(trace)
}

/// Run every part in order
pub fn run_all() -> NarrativeResult<Vec<DerivationTrace>> {
    (1..=PART_COUNT).map(run_part).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_part() {
        assert!(matches!(run_part(0), Err(NarrativeError::UnknownPart(0))));
        assert!(matches!(run_part(7), Err(NarrativeError::UnknownPart(7))));
        assert!(part_title(7).is_none());
    }

    #[test]
    fn test_run_all_parts() {
        let traces = run_all().unwrap();
        assert_eq!(traces.len(), PART_COUNT as usize);

        for (index, trace) in traces.iter().enumerate() {
            let number = index as u8 + 1;
            assert_eq!(Some(trace.title.as_str()), part_title(number));
            assert_eq!(trace.get_metadata("part"), Some(number.to_string().as_str()));
            assert!(trace.is_concluded(), "part {} has no conclusion", number);
            assert!(trace.validate_step_ids().is_ok());
            assert!(trace.validate_premises().is_ok());
        }
    }
}
