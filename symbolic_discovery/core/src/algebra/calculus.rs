//! Differentiation and integration
//!
//! `diff` is total: derivatives of undefined functions stay unevaluated as
//! `Derivative` nodes. `integrate` knows the power rule, linearity, the
//! elementary functions of a linear argument and `u'(x) * f(u(x))`
//! substitution; anything else returns `None`.

use crate::ir::{Equation, Expr, Func};
use log::trace;

/// Placeholder symbol used while integrating by substitution
const SUBSTITUTION_SYMBOL: &str = "_u";

impl Expr {
    /// First derivative with respect to `var`
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Num(_) | Expr::ImaginaryUnit | Expr::Pi => Expr::zero(),
            Expr::Symbol(name) => {
                if name == var {
                    Expr::one()
                } else {
                    Expr::zero()
                }
            }
            Expr::Add(terms) => Expr::add_all(terms.iter().map(|t| t.diff(var)).collect()),
            Expr::Mul(factors) => {
                let mut terms = Vec::new();
                for (i, factor) in factors.iter().enumerate() {
                    let derivative = factor.diff(var);
                    if derivative.is_zero() {
                        continue;
                    }
                    let mut product: Vec<Expr> = factors
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, f)| f.clone())
                        .collect();
                    product.push(derivative);
                    terms.push(Expr::mul_all(product));
                }
                Expr::add_all(terms)
            }
            Expr::Pow(base, exponent) => {
                let base = base.as_ref();
                let exponent = exponent.as_ref();
                if exponent.is_free_of(var) {
                    Expr::mul_all(vec![
                        exponent.clone(),
                        Expr::pow_of(base.clone(), exponent.clone() - Expr::one()),
                        base.diff(var),
                    ])
                } else {
                    // d(b^e) = b^e * (e' * ln(b) + e * b' / b)
                    let log_term = exponent.diff(var) * base.clone().ln();
                    let base_term = exponent.clone() * base.diff(var) / base.clone();
                    self.clone() * (log_term + base_term)
                }
            }
            Expr::Func(func, arg) => {
                let inner = arg.diff(var);
                if inner.is_zero() {
                    return Expr::zero();
                }
                let arg = arg.as_ref().clone();
                let outer = match func {
                    Func::Exp => self.clone(),
                    Func::Ln => arg.recip(),
                    Func::Sin => arg.cos(),
                    Func::Cos => -arg.sin(),
                };
                outer * inner
            }
            Expr::Apply(_, args) => {
                if args.iter().any(|a| a.depends_on(var)) {
                    Expr::derivative(self.clone(), var, 1)
                } else {
                    Expr::zero()
                }
            }
            Expr::Derivative(inner, _, _) => {
                if inner.depends_on(var) {
                    Expr::derivative(self.clone(), var, 1)
                } else {
                    Expr::zero()
                }
            }
            Expr::Integral(inner, bound) => {
                if bound == var {
                    inner.as_ref().clone()
                } else {
                    Expr::integral(inner.diff(var), bound)
                }
            }
        }
    }

    /// `order`-th derivative with respect to `var`
    pub fn diff_n(&self, var: &str, order: u32) -> Expr {
        (0..order).fold(self.clone(), |acc, _| acc.diff(var))
    }

    /// Antiderivative with respect to `var`, without integration constant
    pub fn integrate(&self, var: &str) -> Option<Expr> {
        if self.is_free_of(var) {
            return Some(self.clone() * Expr::symbol(var));
        }

        match self {
            Expr::Symbol(_) => Some(Expr::rational(1, 2) * self.clone().powi(2)),
            Expr::Add(terms) => terms
                .iter()
                .map(|t| t.integrate(var))
                .collect::<Option<Vec<_>>>()
                .map(Expr::add_all),
            Expr::Mul(factors) => {
                let (constant, dependent): (Vec<Expr>, Vec<Expr>) =
                    factors.iter().cloned().partition(|f| f.is_free_of(var));
                if !constant.is_empty() {
                    let inner = Expr::mul_all(dependent).integrate(var)?;
                    let mut out = constant;
                    out.push(inner);
                    return Some(Expr::mul_all(out));
                }
                integrate_by_substitution(factors, var)
            }
            Expr::Pow(base, exponent) => {
                if base.as_symbol() != Some(var) || !exponent.is_free_of(var) {
                    return None;
                }
                let x = base.as_ref().clone();
                if exponent.as_integer() == Some(-1) {
                    Some(x.ln())
                } else {
                    let raised = exponent.as_ref().clone() + Expr::one();
                    Some(x.pow(raised.clone()) / raised)
                }
            }
            Expr::Func(func, arg) => {
                let k = linear_coefficient(arg, var)?;
                let arg = arg.as_ref().clone();
                let antiderivative = match func {
                    Func::Exp => arg.exp(),
                    Func::Sin => -arg.cos(),
                    Func::Cos => arg.sin(),
                    Func::Ln => return None,
                };
                Some(antiderivative / k)
            }
            Expr::Derivative(inner, bound, order) if bound == var => {
                Some(Expr::derivative(inner.as_ref().clone(), bound, order - 1))
            }
            _ => None,
        }
    }

    /// True if an unevaluated `Integral` remains anywhere in the expression
    pub fn has_integral(&self) -> bool {
        matches!(self, Expr::Integral(..)) || self.children().into_iter().any(Expr::has_integral)
    }

    /// Evaluate every `Integral` node that can be integrated
    pub fn doit(&self) -> Expr {
        match self {
            Expr::Integral(inner, var) => {
                let inner = inner.doit();
                match inner.integrate(var) {
                    Some(result) => result,
                    None => {
                        trace!("leaving Integral({}, {}) unevaluated", inner, var);
                        Expr::integral(inner, var)
                    }
                }
            }
            _ => self.map_children(Expr::doit),
        }
    }
}

/// `k` such that `arg = k * var` with `k` free of `var`
fn linear_coefficient(arg: &Expr, var: &str) -> Option<Expr> {
    if arg.as_symbol() == Some(var) {
        return Some(Expr::one());
    }
    let Expr::Mul(factors) = arg else {
        return None;
    };
    let mut rest = Vec::new();
    let mut hits = 0;
    for factor in factors {
        if factor.as_symbol() == Some(var) {
            hits += 1;
        } else if factor.is_free_of(var) {
            rest.push(factor.clone());
        } else {
            return None;
        }
    }
    (hits == 1).then(|| Expr::mul_all(rest))
}

/// `Integral(f(g) * Derivative(g, var), var) = F(g)`
fn integrate_by_substitution(factors: &[Expr], var: &str) -> Option<Expr> {
    let u = Expr::symbol(SUBSTITUTION_SYMBOL);
    for (i, factor) in factors.iter().enumerate() {
        let Expr::Derivative(inner, bound, 1) = factor else {
            continue;
        };
        if bound != var {
            continue;
        }
        let rest: Vec<Expr> = factors
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, f)| f.clone())
            .collect();
        let in_u = Expr::mul_all(rest).subs(inner, &u);
        if in_u.is_free_of(var) {
            let antiderivative = in_u.integrate(SUBSTITUTION_SYMBOL)?;
            return Some(antiderivative.subs(&u, inner));
        }
    }
    None
}

impl Equation {
    pub fn doit(&self) -> Equation {
        self.map_sides(Expr::doit)
    }

    pub fn diff(&self, var: &str) -> Equation {
        self.map_sides(|side| side.diff(var))
    }
}
