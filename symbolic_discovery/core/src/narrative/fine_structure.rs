//! Part 5: the fine-structure constant in terms of Coulomb's constant

use super::NarrativeResult;
use crate::algebra::Bindings;
use crate::ir::{DerivationTrace, Equation, Expr, Operation};

pub const TITLE: &str = "Fine-structure constant";

/// CODATA 2018 values in SI units
const REFERENCE_VALUES: [(&str, f64); 4] = [
    ("e", 1.602_176_634e-19),
    ("k_e", 8.987_551_792_3e9),
    ("hbar", 1.054_571_817e-34),
    ("c", 299_792_458.0),
];

/// `alpha = e**2 / (4*pi*epsilon_0*hbar*c)`
pub fn fine_structure_definition() -> Equation {
    let [e, epsilon_0, hbar, c] = ["e", "epsilon_0", "hbar", "c"].map(Expr::symbol);
    Equation::new(
        Expr::symbol("alpha"),
        e.powi(2) / (Expr::int(4) * Expr::Pi * epsilon_0 * hbar * c),
    )
}

/// `k_e = 1 / (4*pi*epsilon_0)`
pub fn coulomb_definition() -> Equation {
    Equation::new(
        Expr::symbol("k_e"),
        Expr::one() / (Expr::int(4) * Expr::Pi * Expr::symbol("epsilon_0")),
    )
}

pub fn run() -> NarrativeResult<DerivationTrace> {
    let mut trace = DerivationTrace::new(TITLE);

    let alpha = fine_structure_definition();
    let alpha_step = trace.record(Operation::Axiom, "definition of the fine-structure constant", &alpha);
    let coulomb = coulomb_definition();
    let coulomb_step = trace.record(Operation::Axiom, "definition of Coulomb's constant", &coulomb);

    let derived = alpha.subs(&coulomb.rhs, &coulomb.lhs);
    let derived_step = trace.record_from(
        Operation::Substitute,
        "replace 1/(4*pi*epsilon_0) by k_e",
        &[alpha_step, coulomb_step],
        &derived,
    );

    let bindings: Bindings = REFERENCE_VALUES
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect();
    let value = derived.rhs.evaluate(&bindings)?;
    trace.record_from(
        Operation::Compare,
        "numeric value from reference constants",
        &[derived_step],
        format!("alpha = {:.10} = 1/{:.3}", value, 1.0 / value),
    );
    trace.add_metadata("alpha", value.to_string());

    trace.conclude(derived.to_string());
    Ok(trace)
}
