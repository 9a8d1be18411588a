//! Part 1: the symbolic knowledge base

use crate::ir::{DerivationTrace, Operation, SymbolKind, SymbolTable};

pub const TITLE: &str = "Symbolic knowledge base";

/// Declare the variables, constants, quantities and wave function shared
/// by the later parts
pub fn build() -> SymbolTable {
    let symbols = SymbolTable::new();
    symbols.declare_many("x t", SymbolKind::Variable);
    symbols.declare_many("m k c G hbar", SymbolKind::Constant);
    symbols.declare_many("v a F W K", SymbolKind::Quantity);
    symbols.declare_function("psi", &["x", "t"]);
    symbols
}

pub fn run() -> DerivationTrace {
    let symbols = build();
    let mut trace = DerivationTrace::new(TITLE);

    let groups = [
        (SymbolKind::Variable, "independent variables"),
        (SymbolKind::Constant, "positive physical constants"),
        (SymbolKind::Quantity, "physical quantities"),
    ];
    for (kind, explanation) in groups {
        trace.record(
            Operation::Declare,
            explanation,
            symbols.labels_of_kind(kind).join(", "),
        );
    }

    for entry in symbols.entries() {
        if entry.kind == SymbolKind::Function {
            trace.record(
                Operation::Declare,
                "wave function",
                format!("{}({})", entry.label, entry.arguments.join(", ")),
            );
        }
    }

    trace.add_metadata("symbols", symbols.len().to_string());
    trace.conclude(format!("{} symbols declared", symbols.len()));
    trace
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knowledge_base_contents() {
        let symbols = build();

        assert_eq!(symbols.len(), 13);
        assert_eq!(symbols.kind("hbar"), Some(SymbolKind::Constant));
        assert_eq!(symbols.kind("psi"), Some(SymbolKind::Function));
        assert_eq!(symbols.kind("t"), Some(SymbolKind::Variable));
    }

    #[test]
    fn test_trace_lists_groups() {
        let trace = run();

        assert_eq!(trace.len(), 4);
        assert_eq!(trace.steps[0].result, "x, t");
        assert_eq!(trace.steps[1].result, "m, k, c, G, hbar");
        assert_eq!(trace.steps[3].result, "psi(x, t)");
        assert_eq!(trace.conclusion.as_deref(), Some("13 symbols declared"));
    }
}
