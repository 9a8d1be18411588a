//! Solving equations that are linear in a chosen sub-expression
//!
//! The target may be any expression, not only a symbol: solving Euler's
//! combined identity "for cos(x)" treats `cos(x)` as the unknown.

use crate::ir::{Equation, Expr};
use thiserror::Error;

/// Errors raised while solving an equation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("Target {target} does not occur in {equation}")]
    TargetAbsent { target: String, equation: String },

    #[error("Equation is not linear in {target}: offending term {term}")]
    NonLinear { target: String, term: String },

    #[error("Coefficient of {0} vanishes")]
    ZeroCoefficient(String),
}

/// Result type for solving
pub type SolveResult<T> = Result<T, SolveError>;

impl Equation {
    /// Solve for `target`, returning `target = solution`
    pub fn solve_for(&self, target: &Expr) -> SolveResult<Equation> {
        let residual = self.residual();
        if !residual.contains(target) {
            return Err(SolveError::TargetAbsent {
                target: target.to_string(),
                equation: self.to_string(),
            });
        }

        let terms = match residual {
            Expr::Add(terms) => terms,
            other => vec![other],
        };

        let mut coefficient = Vec::new();
        let mut remainder = Vec::new();
        for term in terms {
            if !term.contains(target) {
                remainder.push(term);
            } else if term == *target {
                coefficient.push(Expr::one());
            } else {
                coefficient.push(linear_factor(&term, target).ok_or_else(|| {
                    SolveError::NonLinear {
                        target: target.to_string(),
                        term: term.to_string(),
                    }
                })?);
            }
        }

        let coefficient = Expr::add_all(coefficient);
        if coefficient.is_zero() {
            return Err(SolveError::ZeroCoefficient(target.to_string()));
        }

        let solution = -Expr::add_all(remainder) / coefficient;
        Ok(Equation::new(target.clone(), solution))
    }
}

/// `c` such that `term = c * target` with `c` free of `target`
fn linear_factor(term: &Expr, target: &Expr) -> Option<Expr> {
    let Expr::Mul(factors) = term else {
        return None;
    };
    let (hits, others): (Vec<&Expr>, Vec<&Expr>) = factors.iter().partition(|f| *f == target);
    if hits.len() != 1 || others.iter().any(|f| f.contains(target)) {
        return None;
    }
    Some(Expr::mul_all(others.into_iter().cloned().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn test_solve_linear_symbol() {
        // F = m*a  ->  a = F/m
        let eq = Equation::new(s("F"), s("m") * s("a"));
        let solved = eq.solve_for(&s("a")).unwrap();
        assert_eq!(solved.rhs, s("F") / s("m"));
        assert_eq!(solved.to_string(), "a = F/m");
    }

    #[test]
    fn test_solve_for_function_of_variable() {
        // 2*cos(x) = exp(I*x) + exp(-I*x)
        let x = s("x");
        let ix = Expr::ImaginaryUnit * x.clone();
        let eq = Equation::new(
            ix.clone().exp() + (-ix.clone()).exp(),
            Expr::int(2) * x.clone().cos(),
        );

        let solved = eq.solve_for(&x.clone().cos()).unwrap();
        let expected = Expr::rational(1, 2) * ix.clone().exp() + Expr::rational(1, 2) * (-ix).exp();
        assert_eq!(solved.rhs, expected);
        assert_eq!(solved.lhs, x.cos());
    }

    #[test]
    fn test_solve_target_absent() {
        let eq = Equation::new(s("x"), Expr::int(1));
        assert!(matches!(
            eq.solve_for(&s("y")),
            Err(SolveError::TargetAbsent { .. })
        ));
    }

    #[test]
    fn test_solve_non_linear() {
        let eq = Equation::new(s("x").powi(2), Expr::int(4));
        assert!(matches!(
            eq.solve_for(&s("x")),
            Err(SolveError::NonLinear { .. })
        ));
    }

    #[test]
    fn test_solve_with_cancelling_terms() {
        let x = s("x");
        let eq = Equation::new(x.clone() + s("y"), x + Expr::int(1));
        assert!(matches!(
            eq.solve_for(&s("y")).map(|e| e.rhs),
            Ok(ref rhs) if *rhs == Expr::int(1)
        ));

        // x appears on both sides and cancels
        let eq = Equation::new(s("x") + s("y"), s("x") + Expr::int(1));
        assert!(matches!(
            eq.solve_for(&s("x")),
            Err(SolveError::TargetAbsent { .. })
        ));
    }
}
