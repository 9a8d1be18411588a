//! Part 2: cos(x) from Euler's formula
//!
//! Add `exp(I*x) = cos(x) + I*sin(x)` to its reflection at `-x`; the sine
//! terms cancel and solving for `cos(x)` gives its exponential form.

use super::NarrativeResult;
use crate::ir::{DerivationTrace, Equation, Expr, Operation};

pub const TITLE: &str = "Euler's formula and the cosine";

/// `exp(I*u) = cos(u) + I*sin(u)`
pub fn euler_formula(u: Expr) -> Equation {
    Equation::new(
        (Expr::ImaginaryUnit * u.clone()).exp(),
        u.clone().cos() + Expr::ImaginaryUnit * u.sin(),
    )
}

pub fn run() -> NarrativeResult<DerivationTrace> {
    let x = Expr::symbol("x");
    let mut trace = DerivationTrace::new(TITLE);

    let euler = euler_formula(x.clone());
    let axiom = trace.record(Operation::Axiom, "Euler's formula", &euler);

    let reflected = euler_formula(-x.clone()).simplify();
    let reflection = trace.record(
        Operation::Axiom,
        "Euler's formula at -x, using cos(-x) = cos(x) and sin(-x) = -sin(x)",
        &reflected,
    );

    let combined = euler.combine(&reflected);
    let sum = trace.record_from(
        Operation::Combine,
        "sum of both sides",
        &[axiom, reflection],
        &combined,
    );

    let cosine = combined.solve_for(&x.cos())?;
    trace.record_from(Operation::Solve, "solve for cos(x)", &[sum], &cosine);

    trace.conclude(cosine.to_string());
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflected_formula_uses_parity() {
        let reflected = euler_formula(-Expr::symbol("x"));
        assert_eq!(reflected.to_string(), "exp(-I*x) = cos(x) - I*sin(x)");
    }

    #[test]
    fn test_sine_terms_cancel() {
        let x = Expr::symbol("x");
        let combined = euler_formula(x.clone()).combine(&euler_formula(-x.clone()));
        assert_eq!(combined.rhs, Expr::int(2) * x.cos());
    }

    #[test]
    fn test_cosine_definition() {
        let trace = run().unwrap();

        assert_eq!(trace.len(), 4);
        assert_eq!(
            trace.conclusion.as_deref(),
            Some("cos(x) = exp(-I*x)/2 + exp(I*x)/2")
        );
        assert_eq!(trace.steps[3].premises.len(), 1);
    }
}
