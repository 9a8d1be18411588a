//! Derivation steps and traces
//!
//! A derivation is an ordered list of steps, each recording the symbolic
//! operation performed, the earlier steps it builds on and the rendered
//! result. Traces serialize to JSON for export.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during derivation trace operations
#[derive(Error, Debug)]
pub enum DerivationError {
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid derivation step: {0}")]
    InvalidStep(String),

    #[error("Derivation step not found: {0}")]
    StepNotFound(StepId),
}

/// Result type for derivation operations
pub type DerivationResult<T> = Result<T, DerivationError>;

/// Newtype wrapper for derivation step identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepId(pub u32);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of symbolic operation a step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Declare,
    Axiom,
    Substitute,
    Simplify,
    Combine,
    Solve,
    Differentiate,
    Integrate,
    Compare,
    Search,
    Conclude,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Declare => "declare",
            Operation::Axiom => "axiom",
            Operation::Substitute => "substitute",
            Operation::Simplify => "simplify",
            Operation::Combine => "combine",
            Operation::Solve => "solve",
            Operation::Differentiate => "differentiate",
            Operation::Integrate => "integrate",
            Operation::Compare => "compare",
            Operation::Search => "search",
            Operation::Conclude => "conclude",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single step in a derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivationStep {
    /// Unique identifier for this step
    pub id: StepId,

    /// Operation performed
    pub operation: Operation,

    /// Earlier steps this one builds on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub premises: Vec<StepId>,

    /// Rendered result (an expression, an equation or a short report)
    pub result: String,

    /// Optional human-readable explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl DerivationStep {
    pub fn new(id: StepId, operation: Operation, premises: Vec<StepId>, result: String) -> Self {
        Self {
            id,
            operation,
            premises,
            result,
            explanation: None,
        }
    }

    /// Create a step with an explanation
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// Complete trace of one derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationTrace {
    /// Short title of the derivation
    pub title: String,

    /// Ordered sequence of steps
    pub steps: Vec<DerivationStep>,

    /// Final statement, once the derivation has reached one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,

    /// Additional metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl DerivationTrace {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            steps: Vec::new(),
            conclusion: None,
            metadata: HashMap::new(),
        }
    }

    /// Append a pre-built step
    pub fn add_step(&mut self, step: DerivationStep) {
        self.steps.push(step);
    }

    /// Record a step with no premises, assigning the next free id
    pub fn record(
        &mut self,
        operation: Operation,
        explanation: &str,
        result: impl ToString,
    ) -> StepId {
        self.record_from(operation, explanation, &[], result)
    }

    /// Record a step building on `premises`, assigning the next free id
    pub fn record_from(
        &mut self,
        operation: Operation,
        explanation: &str,
        premises: &[StepId],
        result: impl ToString,
    ) -> StepId {
        let id = self.next_id();
        let step = DerivationStep::new(id, operation, premises.to_vec(), result.to_string())
            .with_explanation(explanation);
        self.steps.push(step);
        id
    }

    fn next_id(&self) -> StepId {
        StepId(self.steps.iter().map(|s| s.id.0 + 1).max().unwrap_or(1))
    }

    /// Set the final statement of the derivation
    pub fn conclude(&mut self, conclusion: impl Into<String>) {
        self.conclusion = Some(conclusion.into());
    }

    pub fn is_concluded(&self) -> bool {
        self.conclusion.is_some()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    /// Get a step by ID
    pub fn get_step(&self, id: StepId) -> Option<&DerivationStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Like `get_step`, but reports a missing id as an error
    pub fn require_step(&self, id: StepId) -> DerivationResult<&DerivationStep> {
        self.get_step(id).ok_or(DerivationError::StepNotFound(id))
    }

    /// Result of the most recent step
    pub fn last_result(&self) -> Option<&str> {
        self.steps.last().map(|s| s.result.as_str())
    }

    /// Steps that performed a given operation
    pub fn steps_with_operation(&self, operation: Operation) -> Vec<&DerivationStep> {
        self.steps
            .iter()
            .filter(|s| s.operation == operation)
            .collect()
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> DerivationResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to compact JSON string
    pub fn to_json_compact(&self) -> DerivationResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> DerivationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn statistics(&self) -> DerivationStatistics {
        let mut operations_used = HashMap::new();
        let mut num_premise_links = 0;
        for step in &self.steps {
            *operations_used
                .entry(step.operation.as_str().to_string())
                .or_insert(0) += 1;
            num_premise_links += step.premises.len();
        }

        DerivationStatistics {
            num_steps: self.steps.len(),
            num_premise_links,
            concluded: self.is_concluded(),
            operations_used,
        }
    }

    /// Validate that all step IDs are unique
    pub fn validate_step_ids(&self) -> DerivationResult<()> {
        let mut seen = HashSet::new();

        for step in &self.steps {
            if !seen.insert(step.id) {
                return Err(DerivationError::InvalidStep(format!(
                    "Duplicate step ID: {}",
                    step.id
                )));
            }
        }

        Ok(())
    }

    /// Validate that every premise refers to an earlier step
    pub fn validate_premises(&self) -> DerivationResult<()> {
        let mut earlier = HashSet::new();

        for step in &self.steps {
            if let Some(missing) = step.premises.iter().find(|p| !earlier.contains(*p)) {
                return Err(DerivationError::InvalidStep(format!(
                    "Step {} depends on {} which does not precede it",
                    step.id, missing
                )));
            }
            earlier.insert(step.id);
        }

        Ok(())
    }
}

/// Statistics about a derivation trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationStatistics {
    /// Total number of steps
    pub num_steps: usize,

    /// Total number of premise references across all steps
    pub num_premise_links: usize,

    /// Whether the derivation reached a conclusion
    pub concluded: bool,

    /// Count of how many times each operation was used
    pub operations_used: HashMap<String, usize>,
}

impl DerivationStatistics {
    /// Get the most frequently used operation
    pub fn most_used_operation(&self) -> Option<(&str, usize)> {
        self.operations_used
            .iter()
            .max_by_key(|(name, count)| (**count, std::cmp::Reverse(name.as_str())))
            .map(|(name, count)| (name.as_str(), *count))
    }
}
