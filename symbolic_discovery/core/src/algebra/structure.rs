//! Structural signatures of linear homogeneous ODEs
//!
//! A linear ODE in one unknown function is summarised by the coefficient of
//! each derivative order. Two systems are analogous when their signatures
//! have the same orders; the analogy pairs up the coefficients order by
//! order (mass with inductance, stiffness with inverse capacitance).

use crate::ir::{Equation, Expr};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while reading an ODE's structure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Term {0} does not involve the unknown function")]
    ForcingTerm(String),

    #[error("Term {0} is not linear in the unknown function or its derivatives")]
    NonLinearTerm(String),
}

/// Result type for structural analysis
pub type StructureResult<T> = Result<T, StructureError>;

/// One matched derivative order of two analogous equations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoefficientPair {
    pub order: u32,
    pub left: String,
    pub right: String,
}

/// Derivative order -> coefficient of a linear homogeneous ODE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdeSignature {
    function: Expr,
    var: String,
    coefficients: BTreeMap<u32, Expr>,
}

impl OdeSignature {
    /// Read the signature of `equation` in the unknown `function` of `var`
    pub fn from_equation(equation: &Equation, function: &Expr, var: &str) -> StructureResult<Self> {
        let terms = match equation.residual() {
            Expr::Add(terms) => terms,
            other => vec![other],
        };

        let mut coefficients: BTreeMap<u32, Expr> = BTreeMap::new();
        for term in terms {
            let (order, coefficient) = split_term(&term, function, var)?;
            let entry = coefficients.remove(&order).unwrap_or_else(Expr::zero);
            let sum = entry + coefficient;
            if !sum.is_zero() {
                coefficients.insert(order, sum);
            }
        }

        Ok(Self {
            function: function.clone(),
            var: var.to_string(),
            coefficients,
        })
    }

    pub fn function(&self) -> &Expr {
        &self.function
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    /// Highest derivative order present
    pub fn order(&self) -> u32 {
        self.coefficients.keys().next_back().copied().unwrap_or(0)
    }

    pub fn coefficient(&self, order: u32) -> Option<&Expr> {
        self.coefficients.get(&order)
    }

    pub fn orders(&self) -> Vec<u32> {
        self.coefficients.keys().copied().collect()
    }

    /// Pair coefficients order by order; `None` if the orders differ
    pub fn analogy(&self, other: &OdeSignature) -> Option<Vec<CoefficientPair>> {
        if self.orders() != other.orders() {
            return None;
        }
        Some(
            self.coefficients
                .iter()
                .zip(other.coefficients.values())
                .map(|((order, left), right)| CoefficientPair {
                    order: *order,
                    left: left.to_string(),
                    right: right.to_string(),
                })
                .collect(),
        )
    }
}

fn split_term(term: &Expr, function: &Expr, var: &str) -> StructureResult<(u32, Expr)> {
    if let Some(order) = derivative_order(term, function, var) {
        return Ok((order, Expr::one()));
    }
    if !term.contains(function) {
        return Err(StructureError::ForcingTerm(term.to_string()));
    }

    let Expr::Mul(factors) = term else {
        return Err(StructureError::NonLinearTerm(term.to_string()));
    };

    let mut order = None;
    let mut rest = Vec::new();
    for factor in factors {
        match derivative_order(factor, function, var) {
            Some(found) if order.is_none() => order = Some(found),
            _ if factor.contains(function) => {
                return Err(StructureError::NonLinearTerm(term.to_string()))
            }
            _ => rest.push(factor.clone()),
        }
    }

    match order {
        Some(order) => Ok((order, Expr::mul_all(rest))),
        None => Err(StructureError::NonLinearTerm(term.to_string())),
    }
}

fn derivative_order(expr: &Expr, function: &Expr, var: &str) -> Option<u32> {
    if expr == function {
        return Some(0);
    }
    match expr {
        Expr::Derivative(inner, bound, order) if inner.as_ref() == function && bound == var => {
            Some(*order)
        }
        _ => None,
    }
}
