//! Brute-force constant matcher
//!
//! Tries every operator on every operand (unary) or every unordered pair of
//! operands with repetition (binary) and reports how close each result
//! lands to the target value. Candidates are evaluated in a fixed order:
//! operators in configured order, then operands in table order, so the
//! outcome is fully deterministic.

use crate::algebra::{Bindings, EvalError};
use crate::ir::Expr;
use crate::loader::ConstantTable;
use crate::search::operators::{all_operators, Arity, Operator};
use crate::search::scoring::{improves, score_candidate};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised by the matcher
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Invalid tolerance: {0} (must be finite and non-negative)")]
    InvalidTolerance(f64),

    #[error("No operators configured")]
    NoOperators,

    #[error("Unknown constant in candidate: {0}")]
    UnknownConstant(String),

    #[error("Operator {operator} takes {expected} operand(s), candidate has {found}")]
    ArityMismatch {
        operator: Operator,
        expected: usize,
        found: usize,
    },

    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] EvalError),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for matcher operations
pub type MatcherResult<T> = Result<T, MatchError>;

/// Matcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// A candidate whose error is strictly below this is a discovery
    pub tolerance: f64,

    /// Operators to try, in enumeration order
    pub operators: Vec<Operator>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            operators: all_operators(),
        }
    }
}

impl MatcherConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> MatcherResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn validate(&self) -> MatcherResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(MatchError::InvalidTolerance(self.tolerance));
        }
        if self.operators.is_empty() {
            return Err(MatchError::NoOperators);
        }
        Ok(())
    }
}

/// One operator applied to named operands
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub operator: Operator,
    pub operands: Vec<String>,
}

impl Candidate {
    pub fn unary(operator: Operator, operand: &str) -> Self {
        Self {
            operator,
            operands: vec![operand.to_string()],
        }
    }

    pub fn binary(operator: Operator, left: &str, right: &str) -> Self {
        Self {
            operator,
            operands: vec![left.to_string(), right.to_string()],
        }
    }

    /// Fail unless the operand count matches the operator's arity
    pub fn check_arity(&self) -> MatcherResult<()> {
        let expected = self.operator.arity().count();
        if self.operands.len() != expected {
            return Err(MatchError::ArityMismatch {
                operator: self.operator,
                expected,
                found: self.operands.len(),
            });
        }
        Ok(())
    }

    /// Canonical symbolic form, e.g. `C3**2` for `C3 * C3`
    pub fn expression(&self) -> MatcherResult<Expr> {
        self.check_arity()?;
        let names: Vec<&str> = self.operands.iter().map(String::as_str).collect();
        self.operator
            .build(&names)
            .ok_or(MatchError::ArityMismatch {
                operator: self.operator,
                expected: self.operator.arity().count(),
                found: names.len(),
            })
    }

    /// Numeric value using the table's constants
    pub fn evaluate(&self, table: &ConstantTable) -> MatcherResult<f64> {
        self.check_arity()?;
        let values = self
            .operands
            .iter()
            .map(|name| {
                table
                    .value_of(name)
                    .ok_or_else(|| MatchError::UnknownConstant(name.clone()))
            })
            .collect::<MatcherResult<Vec<f64>>>()?;
        Ok(self.operator.apply(&values).unwrap_or(f64::NAN))
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operands.as_slice() {
            [operand] => write!(f, "{}({})", self.operator.symbol(), operand),
            [left, right] => write!(f, "{} {} {}", left, self.operator.symbol(), right),
            operands => write!(f, "{}({})", self.operator.symbol(), operands.join(", ")),
        }
    }
}

/// An evaluated candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub candidate: Candidate,

    /// Rendered symbolic form
    pub expression: String,

    pub value: f64,

    /// Absolute distance to the target value
    pub error: f64,
}

/// Outcome of one matcher run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub table_id: String,

    /// Name of the target constant
    pub target: String,

    pub target_value: f64,

    pub tolerance: f64,

    /// Lowest-error candidate, earliest on ties; `None` if nothing was evaluated
    pub best: Option<Evaluation>,

    /// Every candidate with error strictly below the tolerance, in evaluation order
    pub discoveries: Vec<Evaluation>,

    pub candidates_evaluated: usize,
}

impl MatchResult {
    /// Whether any candidate fell within tolerance
    pub fn has_discovery(&self) -> bool {
        !self.discoveries.is_empty()
    }

    /// Re-evaluate the best expression symbolically, binding only the
    /// constants that occur in it
    pub fn best_value_from_references(&self, table: &ConstantTable) -> MatcherResult<Option<f64>> {
        let Some(best) = &self.best else {
            return Ok(None);
        };
        let expression = best.candidate.expression()?;
        let free = expression.free_symbols();
        let bindings: Bindings = table
            .entries()
            .iter()
            .filter(|e| free.contains(&e.name))
            .map(|e| (e.name.clone(), e.value))
            .collect();
        Ok(Some(expression.evaluate(&bindings)?))
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> MatcherResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> MatcherResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write pretty JSON to `path`
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> MatcherResult<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> MatcherResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// Exhaustive matcher over a constant table
pub struct ConstantMatcher {
    config: MatcherConfig,
}

impl Default for ConstantMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

impl ConstantMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// All candidates in evaluation order
    ///
    /// Binary operators pair operand `i` with operand `j >= i`, so each
    /// unordered pair appears once and every operand is paired with itself.
    pub fn enumerate(&self, table: &ConstantTable) -> Vec<Candidate> {
        let operands: Vec<&str> = table.operands().map(|e| e.name.as_str()).collect();
        let mut candidates = Vec::new();

        for &operator in &self.config.operators {
            match operator.arity() {
                Arity::Unary => {
                    for name in &operands {
                        candidates.push(Candidate::unary(operator, name));
                    }
                }
                Arity::Binary => {
                    for (i, left) in operands.iter().enumerate() {
                        for right in &operands[i..] {
                            candidates.push(Candidate::binary(operator, left, right));
                        }
                    }
                }
            }
        }

        candidates
    }

    /// Evaluate every candidate against the table's target
    pub fn search(&self, table: &ConstantTable) -> MatcherResult<MatchResult> {
        self.config.validate()?;

        let target_value = table.target_value();
        let tolerance = self.config.tolerance;

        let mut best: Option<Evaluation> = None;
        let mut best_error = f64::INFINITY;
        let mut discoveries = Vec::new();
        let mut candidates_evaluated = 0;

        info!(
            "searching table {} for {} = {} (tolerance {})",
            table.id(),
            table.target(),
            target_value,
            tolerance
        );

        for candidate in self.enumerate(table) {
            let value = candidate.evaluate(table)?;
            let score = score_candidate(value, target_value, tolerance);
            candidates_evaluated += 1;

            debug!("{} = {} (error {})", candidate, value, score.error);

            if !score.discovery && !improves(score.error, best_error) {
                continue;
            }

            let evaluation = Evaluation {
                expression: candidate.expression()?.to_string(),
                candidate,
                value,
                error: score.error,
            };

            if score.discovery {
                info!(
                    "Potential discovery: {} ~ {} (error {:.5})",
                    table.target(),
                    evaluation.expression,
                    evaluation.error
                );
                discoveries.push(evaluation.clone());
            }

            if improves(score.error, best_error) {
                best_error = score.error;
                best = Some(evaluation);
            }
        }

        match &best {
            Some(b) => info!(
                "search complete: {} candidates, best {} (error {:.5})",
                candidates_evaluated, b.expression, b.error
            ),
            None => info!(
                "search complete: {} candidates, no finite match",
                candidates_evaluated
            ),
        }

        Ok(MatchResult {
            table_id: table.id().to_string(),
            target: table.target().to_string(),
            target_value,
            tolerance,
            best,
            discoveries,
            candidates_evaluated,
        })
    }
}
