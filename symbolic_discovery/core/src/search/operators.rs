//! Arithmetic operators tried by the constant matcher
//!
//! The declared order (Add, Mul, Pow, Sqrt) is the enumeration order and so
//! decides which candidate wins an exact tie.

use crate::ir::Expr;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of operands an operator takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

impl Arity {
    pub fn count(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Mul,
    Pow,
    Sqrt,
}

impl Operator {
    pub fn arity(self) -> Arity {
        match self {
            Operator::Add | Operator::Mul | Operator::Pow => Arity::Binary,
            Operator::Sqrt => Arity::Unary,
        }
    }

    /// Symbol used when printing a candidate
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Mul => "*",
            Operator::Pow => "**",
            Operator::Sqrt => "sqrt",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Mul => "mul",
            Operator::Pow => "pow",
            Operator::Sqrt => "sqrt",
        }
    }

    /// Apply to numeric operands with IEEE semantics
    ///
    /// Returns `None` when the operand count does not match the arity.
    pub fn apply(self, operands: &[f64]) -> Option<f64> {
        match (self, operands) {
            (Operator::Add, [a, b]) => Some(a + b),
            (Operator::Mul, [a, b]) => Some(a * b),
            (Operator::Pow, [a, b]) => Some(a.powf(*b)),
            (Operator::Sqrt, [a]) => Some(a.sqrt()),
            _ => None,
        }
    }

    /// Symbolic form over the named operands
    pub fn build(self, operands: &[&str]) -> Option<Expr> {
        let symbols: Vec<Expr> = operands.iter().map(|name| Expr::symbol(name)).collect();
        match (self, symbols.as_slice()) {
            (Operator::Add, [a, b]) => Some(a.clone() + b.clone()),
            (Operator::Mul, [a, b]) => Some(a.clone() * b.clone()),
            (Operator::Pow, [a, b]) => Some(a.clone().pow(b.clone())),
            (Operator::Sqrt, [a]) => Some(a.clone().sqrt()),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an operator name that is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operator: {0} (expected add, mul, pow or sqrt)")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(Operator::Add),
            "mul" | "*" => Ok(Operator::Mul),
            "pow" | "**" | "^" => Ok(Operator::Pow),
            "sqrt" => Ok(Operator::Sqrt),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

/// All operators in enumeration order
pub fn all_operators() -> Vec<Operator> {
    vec![Operator::Add, Operator::Mul, Operator::Pow, Operator::Sqrt]
}

/// Parse a comma separated operator list such as `"add,mul,sqrt"`
pub fn parse_operator_list(list: &str) -> Result<Vec<Operator>, UnknownOperator> {
    list.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_numeric() {
        assert_eq!(Operator::Add.apply(&[1.5, 2.0]), Some(3.5));
        assert_eq!(Operator::Mul.apply(&[1.5, 2.0]), Some(3.0));
        assert_eq!(Operator::Pow.apply(&[2.0, 3.0]), Some(8.0));
        assert_eq!(Operator::Sqrt.apply(&[9.0]), Some(3.0));
    }

    #[test]
    fn test_apply_arity_mismatch() {
        assert_eq!(Operator::Add.apply(&[1.0]), None);
        assert_eq!(Operator::Sqrt.apply(&[1.0, 2.0]), None);
    }

    #[test]
    fn test_sqrt_of_negative_is_nan() {
        assert!(Operator::Sqrt.apply(&[-1.0]).unwrap().is_nan());
    }

    #[test]
    fn test_build_symbolic() {
        assert_eq!(Operator::Mul.build(&["C3", "C3"]).unwrap().to_string(), "C3**2");
        assert_eq!(Operator::Add.build(&["C1", "C2"]).unwrap().to_string(), "C1 + C2");
        assert_eq!(Operator::Pow.build(&["C1", "C2"]).unwrap().to_string(), "C1**C2");
        assert_eq!(Operator::Sqrt.build(&["C1"]).unwrap().to_string(), "sqrt(C1)");
        assert!(Operator::Pow.build(&["C1"]).is_none());
    }

    #[test]
    fn test_parse() {
        assert_eq!("add".parse::<Operator>(), Ok(Operator::Add));
        assert_eq!("**".parse::<Operator>(), Ok(Operator::Pow));
        assert_eq!(" SQRT ".parse::<Operator>(), Ok(Operator::Sqrt));
        assert!("div".parse::<Operator>().is_err());

        assert_eq!(
            parse_operator_list("mul, sqrt"),
            Ok(vec![Operator::Mul, Operator::Sqrt])
        );
        assert!(parse_operator_list("mul,div").is_err());
    }

    #[test]
    fn test_declared_order() {
        let ops = all_operators();
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[0], Operator::Add);
        assert_eq!(ops[3], Operator::Sqrt);
        assert_eq!(Operator::Sqrt.arity().count(), 1);
    }
}
