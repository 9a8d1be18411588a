//! End-to-end loader integration tests
//!
//! Tests table loading → matching → re-evaluation

use symbolic_discovery_core::*;

/// Helper to load a table from fixtures
fn load_fixture(name: &str) -> ConstantTable {
    let path = format!("tests/fixtures/tables/{}.json", name);
    loader::load_table(&path).expect("Failed to load table")
}

#[test]
fn test_builtin_fixture_matches_builtin_table() {
    let table = load_fixture("builtin");
    assert_eq!(table, ConstantTable::builtin());
}

#[test]
fn test_builtin_fixture_finds_square() {
    let table = load_fixture("builtin");
    let result = ConstantMatcher::default().search(&table).unwrap();

    assert_eq!(result.table_id, "builtin");
    assert_eq!(result.candidates_evaluated, 21);

    let best = result.best.as_ref().expect("Builtin table should have a best match");
    assert_eq!(best.expression, "C3**2");

    let value = result.best_value_from_references(&table).unwrap().unwrap();
    assert!((value - 9.86902225).abs() < 1e-9);

    println!(
        "builtin: {} ~ {} (error {:.6})",
        result.target, best.expression, best.error
    );
}

#[test]
fn test_square_fixture_reports_every_exact_relation() {
    let table = load_fixture("square");
    let result = ConstantMatcher::default().search(&table).unwrap();

    let found: Vec<&str> = result
        .discoveries
        .iter()
        .map(|e| e.expression.as_str())
        .collect();
    assert_eq!(found, vec!["2*A", "A**2", "A**A"]);

    // Ties keep the first candidate evaluated
    let best = result.best.unwrap();
    assert_eq!(best.candidate, Candidate::binary(Operator::Add, "A", "A"));
}

#[test]
fn test_square_root_misses_square_target() {
    let table = load_fixture("square");
    let value = Candidate::unary(Operator::Sqrt, "A").evaluate(&table).unwrap();
    let error = search::absolute_error(value, table.target_value());

    assert!((error - 2.585_786).abs() < 1e-6);
}

#[test]
fn test_best_is_minimal_and_repeatable() {
    let table = load_fixture("builtin");
    let matcher = ConstantMatcher::default();
    let result = matcher.search(&table).unwrap();
    let best = result.best.as_ref().unwrap();

    for candidate in matcher.enumerate(&table) {
        let value = candidate.evaluate(&table).unwrap();
        let error = search::absolute_error(value, table.target_value());
        assert!(error >= 0.0, "{} has negative error", candidate);
        assert!(best.error <= error, "{} beats the best match", candidate);
    }

    let again = matcher.search(&table).unwrap();
    assert_eq!(again.to_json().unwrap(), result.to_json().unwrap());
}

#[test]
fn test_restricted_operators() {
    let table = load_fixture("builtin");
    let config = MatcherConfig {
        operators: search::parse_operator_list("add, sqrt").unwrap(),
        ..MatcherConfig::default()
    };
    let result = ConstantMatcher::new(config).search(&table).unwrap();

    assert_eq!(result.candidates_evaluated, 9);
    assert!(!result.has_discovery());
    assert_eq!(result.best.unwrap().candidate.to_string(), "C3 + C3");
}

#[test]
fn test_target_only_fixture() {
    let table = load_fixture("lonely");
    let result = ConstantMatcher::default().search(&table).unwrap();

    assert_eq!(result.candidates_evaluated, 0);
    assert!(result.best.is_none());
}

#[test]
fn test_duplicate_fixture_rejected() {
    let result = loader::load_table("tests/fixtures/tables/duplicate.json");
    match result {
        Err(LoadError::ParseError(message)) => {
            assert!(message.contains("Duplicate constant name: A"), "{}", message)
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_load_directory_skips_invalid_tables() {
    let tables = loader::load_tables("tests/fixtures/tables").unwrap();
    let ids: Vec<&str> = tables.iter().map(|t| t.id()).collect();

    assert_eq!(ids, vec!["builtin", "lonely", "square"]);
}
