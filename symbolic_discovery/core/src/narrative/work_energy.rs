//! Part 3: kinetic energy from the work-energy theorem
//!
//! Substituting Newton's second law into `W = Integral(F, x)` and writing
//! the acceleration as `v(x) * dv/dx` turns the work integral into one the
//! substitution rule can evaluate.

use super::{NarrativeError, NarrativeResult};
use crate::ir::{DerivationTrace, Equation, Expr, Operation};

pub const TITLE: &str = "Work-energy theorem";

pub fn run() -> NarrativeResult<DerivationTrace> {
    let [m, a, f, w, k] = ["m", "a", "F", "W", "K"].map(Expr::symbol);

    let t = Expr::symbol("t");
    let x = Expr::symbol("x");
    let v_of_t = Expr::apply("v", vec![t.clone()]);
    let x_of_t = Expr::apply("x", vec![t]);
    let v_of_x = Expr::apply("v", vec![x.clone()]);

    let mut trace = DerivationTrace::new(TITLE);

    let newton = Equation::new(f.clone(), m * a.clone());
    let newton_step = trace.record(Operation::Axiom, "Newton's second law", &newton);
    trace.record(
        Operation::Axiom,
        "definition of acceleration",
        Equation::new(a.clone(), Expr::derivative(v_of_t, "t", 1)),
    );
    trace.record(
        Operation::Axiom,
        "definition of velocity",
        Equation::new(Expr::symbol("v"), Expr::derivative(x_of_t, "t", 1)),
    );
    let work = Equation::new(w.clone(), Expr::integral(f.clone(), "x"));
    let work_step = trace.record(Operation::Axiom, "work is force integrated over distance", &work);

    let with_force = work.subs(&f, &newton.rhs);
    let force_step = trace.record_from(
        Operation::Substitute,
        "substitute F = m*a",
        &[newton_step, work_step],
        &with_force,
    );

    // a = dv/dt = (dv/dx)(dx/dt) = v * dv/dx
    let chain = v_of_x.clone() * Expr::derivative(v_of_x, "x", 1);
    let with_chain = with_force.subs(&a, &chain);
    let chain_step = trace.record_from(
        Operation::Substitute,
        "chain rule a = v(x)*Derivative(v(x), x)",
        &[force_step],
        &with_chain,
    );

    let integrated = with_chain.rhs.doit();
    if integrated.has_integral() {
        return Err(NarrativeError::Integration(with_chain.rhs.to_string()));
    }
    let integral_step = trace.record_from(
        Operation::Integrate,
        "evaluate the integral",
        &[chain_step],
        Equation::new(w, integrated.clone()),
    );

    let check = integrated.diff("x");
    trace.record_from(
        Operation::Differentiate,
        "differentiating recovers the integrand",
        &[integral_step],
        &check,
    );

    let kinetic = Equation::new(k, integrated);
    trace.record_from(
        Operation::Conclude,
        "work done equals kinetic energy gained",
        &[integral_step],
        &kinetic,
    );

    trace.conclude(kinetic.to_string());
    Ok(trace)
}
