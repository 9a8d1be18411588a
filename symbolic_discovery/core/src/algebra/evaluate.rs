//! Numeric evaluation of real-valued expressions

use crate::ir::{Expr, Func};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors raised while evaluating an expression numerically
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Symbol has no numeric value: {0}")]
    Unbound(String),

    #[error("Expression is not real-valued: {0}")]
    Complex(String),

    #[error("Cannot evaluate unevaluated expression: {0}")]
    Unevaluated(String),
}

/// Result type for evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Numeric values for symbols
pub type Bindings = FxHashMap<String, f64>;

impl Expr {
    /// Evaluate with the given symbol values
    ///
    /// IEEE semantics apply: `sqrt` of a negative number yields NaN and
    /// overflow yields infinity, neither is an error.
    pub fn evaluate(&self, bindings: &Bindings) -> EvalResult<f64> {
        match self {
            Expr::Num(n) => Ok(*n.numer() as f64 / *n.denom() as f64),
            Expr::Pi => Ok(std::f64::consts::PI),
            Expr::ImaginaryUnit => Err(EvalError::Complex(self.to_string())),
            Expr::Symbol(name) => bindings
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::Unbound(name.clone())),
            Expr::Add(terms) => terms
                .iter()
                .try_fold(0.0, |acc, t| t.evaluate(bindings).map(|v| acc + v)),
            Expr::Mul(factors) => factors
                .iter()
                .try_fold(1.0, |acc, f| f.evaluate(bindings).map(|v| acc * v)),
            Expr::Pow(base, exponent) => {
                let b = base.evaluate(bindings)?;
                match exponent.as_integer().and_then(|n| i32::try_from(n).ok()) {
                    Some(n) => Ok(b.powi(n)),
                    None => Ok(b.powf(exponent.evaluate(bindings)?)),
                }
            }
            Expr::Func(func, arg) => {
                let x = arg.evaluate(bindings)?;
                Ok(match func {
                    Func::Exp => x.exp(),
                    Func::Ln => x.ln(),
                    Func::Sin => x.sin(),
                    Func::Cos => x.cos(),
                })
            }
            Expr::Apply(..) | Expr::Derivative(..) | Expr::Integral(..) => {
                Err(EvalError::Unevaluated(self.to_string()))
            }
        }
    }

    /// Evaluate with bindings given as `(name, value)` pairs
    pub fn evaluate_with(&self, pairs: &[(&str, f64)]) -> EvalResult<f64> {
        let bindings: Bindings = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        self.evaluate(&bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_arithmetic() {
        let x = Expr::symbol("x");
        let e = Expr::int(3) * x.clone().powi(2) + Expr::rational(1, 2);
        assert_eq!(e.evaluate_with(&[("x", 2.0)]), Ok(12.5));
    }

    #[test]
    fn test_evaluate_sqrt_and_pi() {
        let e = Expr::Pi.sqrt();
        let value = e.evaluate(&Bindings::default()).unwrap();
        assert!((value - 1.7724538509055159).abs() < 1e-12);
    }

    #[test]
    fn test_sqrt_of_negative_is_nan() {
        let e = Expr::symbol("a").sqrt();
        assert!(e.evaluate_with(&[("a", -1.0)]).unwrap().is_nan());
    }

    #[test]
    fn test_unbound_symbol() {
        let e = Expr::symbol("a") + Expr::symbol("b");
        assert_eq!(
            e.evaluate_with(&[("a", 1.0)]),
            Err(EvalError::Unbound("b".to_string()))
        );
    }

    #[test]
    fn test_complex_and_unevaluated() {
        assert!(matches!(
            Expr::ImaginaryUnit.evaluate(&Bindings::default()),
            Err(EvalError::Complex(_))
        ));
        let f = Expr::apply("f", vec![Expr::symbol("t")]);
        assert!(matches!(
            f.evaluate_with(&[("t", 0.0)]),
            Err(EvalError::Unevaluated(_))
        ));
    }
}
