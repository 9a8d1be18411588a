//! Part 4: the mass-spring / LC circuit analogy
//!
//! Both systems obey `a * f''(t) + b * f(t) = 0`. Reading each equation's
//! coefficient per derivative order and pairing them exposes the analogy
//! mass to inductance and stiffness to inverse capacitance.

use super::{NarrativeError, NarrativeResult};
use crate::algebra::OdeSignature;
use crate::ir::{DerivationTrace, Equation, Expr, Operation};

pub const TITLE: &str = "Structural analogy of oscillators";

/// `m * x''(t) + k * x(t) = 0`
pub fn mass_spring() -> (Equation, Expr) {
    let x = Expr::apply("x", vec![Expr::symbol("t")]);
    let eq = Equation::new(
        Expr::symbol("m") * Expr::derivative(x.clone(), "t", 2) + Expr::symbol("k") * x.clone(),
        Expr::zero(),
    );
    (eq, x)
}

/// `L * q''(t) + q(t) / C = 0`
pub fn lc_circuit() -> (Equation, Expr) {
    let q = Expr::apply("q", vec![Expr::symbol("t")]);
    let current = q.diff("t");
    let eq = Equation::new(
        Expr::symbol("L") * current.diff("t") + q.clone() / Expr::symbol("C"),
        Expr::zero(),
    );
    (eq, q)
}

pub fn run() -> NarrativeResult<DerivationTrace> {
    let mut trace = DerivationTrace::new(TITLE);

    let (spring, x) = mass_spring();
    let spring_step = trace.record(Operation::Axiom, "mechanical system (mass-spring)", &spring);
    let (circuit, q) = lc_circuit();
    let circuit_step = trace.record(Operation::Axiom, "electrical system (LC circuit)", &circuit);

    let spring_signature = OdeSignature::from_equation(&spring, &x, "t")?;
    let circuit_signature = OdeSignature::from_equation(&circuit, &q, "t")?;

    let pairs = spring_signature
        .analogy(&circuit_signature)
        .ok_or_else(|| NarrativeError::NoAnalogy(format!("{} vs {}", spring, circuit)))?;

    let mut pair_steps = Vec::new();
    for pair in &pairs {
        let id = trace.record_from(
            Operation::Compare,
            &format!("coefficients of derivative order {}", pair.order),
            &[spring_step, circuit_step],
            format!("{} <-> {}", pair.left, pair.right),
        );
        pair_steps.push(id);
    }

    // Both are harmonic with omega**2 = (order 0 coefficient) / (order 2 coefficient)
    for (signature, name) in [(&spring_signature, "mass-spring"), (&circuit_signature, "LC circuit")] {
        if let (Some(c0), Some(c2)) = (signature.coefficient(0), signature.coefficient(2)) {
            let omega_squared = c0.clone() / c2.clone();
            trace.record_from(
                Operation::Solve,
                &format!("angular frequency of the {}", name),
                &pair_steps,
                format!("omega**2 = {}", omega_squared),
            );
        }
    }

    let correspondence: Vec<String> = pairs
        .iter()
        .rev()
        .map(|p| format!("{} <-> {}", p.left, p.right))
        .collect();
    trace.conclude(format!(
        "same structure of order {}: {}",
        spring_signature.order(),
        correspondence.join(", ")
    ));
    Ok(trace)
}
