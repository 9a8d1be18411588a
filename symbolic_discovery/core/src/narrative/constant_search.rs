//! Part 6: searching a constant table for an unknown relation

use super::NarrativeResult;
use crate::ir::{DerivationTrace, Operation};
use crate::loader::ConstantTable;
use crate::search::{ConstantMatcher, MatcherConfig};

pub const TITLE: &str = "Search for an unknown connection";

/// Run the matcher on `table` and record what it found
pub fn run(table: &ConstantTable, config: MatcherConfig) -> NarrativeResult<DerivationTrace> {
    let mut trace = DerivationTrace::new(TITLE);

    let constants: Vec<String> = table
        .entries()
        .iter()
        .map(|e| format!("{} = {}", e.name, e.value))
        .collect();
    let table_step = trace.record(
        Operation::Declare,
        "knowledge base of constants",
        constants.join(", "),
    );

    let operators: Vec<&str> = config.operators.iter().map(|op| op.symbol()).collect();
    let matcher = ConstantMatcher::new(config.clone());
    let result = matcher.search(table)?;
    let search_step = trace.record_from(
        Operation::Search,
        &format!("try {} with tolerance {}", operators.join(" "), config.tolerance),
        &[table_step],
        format!("{} candidates evaluated", result.candidates_evaluated),
    );

    for discovery in &result.discoveries {
        trace.record_from(
            Operation::Compare,
            "potential discovery",
            &[search_step],
            format!(
                "{} ~ {} (error {:.5})",
                result.target, discovery.expression, discovery.error
            ),
        );
    }

    match &result.best {
        Some(best) => {
            let value = result
                .best_value_from_references(table)?
                .unwrap_or(best.value);
            trace.record_from(
                Operation::Conclude,
                "best symbolic expression",
                &[search_step],
                format!(
                    "{} ~ {} = {} (target {}, error {:.5})",
                    result.target, best.expression, value, result.target_value, best.error
                ),
            );
            trace.conclude(format!("{} ~ {}", result.target, best.expression));
        }
        None => trace.conclude(format!("no candidate approximates {}", result.target)),
    }

    trace.add_metadata("table", result.table_id.clone());
    trace.add_metadata("discoveries", result.discoveries.len().to_string());
    Ok(trace)
}

/// Search the built-in table with default settings
pub fn run_builtin() -> NarrativeResult<DerivationTrace> {
    run(&ConstantTable::builtin(), MatcherConfig::default())
}
