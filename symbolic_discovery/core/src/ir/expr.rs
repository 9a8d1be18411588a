//! Symbolic expression tree
//!
//! Every `Expr` built through the constructors in this module is kept in a
//! canonical form:
//! - sums and products are flattened and their numbers folded
//! - like terms are collected (`2*x + 3*x` becomes `5*x`)
//! - like bases are collected (`x*x` becomes `x**2`)
//! - a numeric coefficient on a single sum is distributed
//! - `I**2 = -1`, `cos(-u) = cos(u)`, `sin(-u) = -sin(u)`
//!
//! Two expressions that are equal after canonicalisation compare equal with
//! `==`, which is what substitution and equation solving rely on.

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, One, Signed, Zero};
use std::collections::{BTreeMap, BTreeSet};
use std::ops;

/// Elementary functions of one argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    Exp,
    Ln,
    Sin,
    Cos,
}

impl Func {
    /// Name used when rendering
    pub fn name(self) -> &'static str {
        match self {
            Func::Exp => "exp",
            Func::Ln => "log",
            Func::Sin => "sin",
            Func::Cos => "cos",
        }
    }
}

/// Symbolic expression
///
/// Variant order matters: the derived `Ord` decides the order of terms in a
/// sum and of factors in a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expr {
    /// Exact rational number
    Num(Rational64),

    /// The imaginary unit `I`
    ImaginaryUnit,

    /// The constant `pi`
    Pi,

    /// Named symbol
    Symbol(String),

    /// Undefined function applied to arguments, e.g. `psi(x, t)`
    Apply(String, Vec<Expr>),

    /// Unevaluated derivative `d^n expr / d var^n`
    Derivative(Box<Expr>, String, u32),

    /// Elementary function
    Func(Func, Box<Expr>),

    /// `base ** exponent`
    Pow(Box<Expr>, Box<Expr>),

    /// Product; a numeric coefficient, if any, comes first
    Mul(Vec<Expr>),

    /// Sum
    Add(Vec<Expr>),

    /// Unevaluated indefinite integral
    Integral(Box<Expr>, String),
}

impl Expr {
    pub fn int(n: i64) -> Self {
        Expr::Num(Rational64::from_integer(n))
    }

    /// Exact fraction `numer/denom`
    ///
    /// Panics if `denom` is zero.
    pub fn rational(numer: i64, denom: i64) -> Self {
        Expr::Num(Rational64::new(numer, denom))
    }

    pub fn zero() -> Self {
        Expr::int(0)
    }

    pub fn one() -> Self {
        Expr::int(1)
    }

    pub fn symbol(name: &str) -> Self {
        Expr::Symbol(name.to_string())
    }

    /// Undefined function applied to `args`
    pub fn apply(name: &str, args: Vec<Expr>) -> Self {
        Expr::Apply(name.to_string(), args)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Num(n) if n.is_zero())
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Num(n) if n.is_one())
    }

    pub fn as_rational(&self) -> Option<Rational64> {
        match self {
            Expr::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.as_rational()
            .filter(|r| r.is_integer())
            .map(|r| r.to_integer())
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// True for negative numbers and products with a negative coefficient
    pub fn is_negative_form(&self) -> bool {
        match self {
            Expr::Num(n) => n.is_negative(),
            Expr::Mul(factors) => matches!(factors.first(), Some(Expr::Num(c)) if c.is_negative()),
            _ => false,
        }
    }

    /// Split off the numeric coefficient: `3*x*y` gives `(3, x*y)`
    pub fn split_coefficient(&self) -> (Rational64, Expr) {
        match self {
            Expr::Num(n) => (*n, Expr::one()),
            Expr::Mul(factors) => match factors.split_first() {
                Some((Expr::Num(c), rest)) => {
                    let rest = match rest {
                        [single] => single.clone(),
                        _ => Expr::Mul(rest.to_vec()),
                    };
                    (*c, rest)
                }
                _ => (Rational64::one(), self.clone()),
            },
            _ => (Rational64::one(), self.clone()),
        }
    }

    /// Decompose a product into its coefficient and a base -> exponent map
    pub fn as_powers(&self) -> (Rational64, BTreeMap<Expr, Expr>) {
        let mut coefficient = Rational64::one();
        let mut powers = BTreeMap::new();
        let factors: Vec<&Expr> = match self {
            Expr::Mul(factors) => factors.iter().collect(),
            other => vec![other],
        };
        for factor in factors {
            match factor {
                Expr::Num(n) => match coefficient.checked_mul(n) {
                    Some(product) => coefficient = product,
                    None => accumulate(&mut powers, factor.clone(), Expr::one()),
                },
                Expr::Pow(base, exponent) => {
                    accumulate(&mut powers, (**base).clone(), (**exponent).clone())
                }
                other => accumulate(&mut powers, other.clone(), Expr::one()),
            }
        }
        (coefficient, powers)
    }

    /// Canonical sum of `terms`
    ///
    /// Numbers whose sum would overflow `i64` stay as separate terms.
    pub fn add_all(terms: Vec<Expr>) -> Expr {
        let mut constant = Rational64::zero();
        let mut collected: BTreeMap<Expr, Rational64> = BTreeMap::new();
        let mut unfolded = Vec::new();
        let mut pending = terms;

        while let Some(term) = pending.pop() {
            match term {
                Expr::Add(inner) => pending.extend(inner),
                Expr::Num(n) => match constant.checked_add(&n) {
                    Some(sum) => constant = sum,
                    None => unfolded.push(Expr::Num(n)),
                },
                other => {
                    let (coefficient, rest) = other.split_coefficient();
                    let entry = collected.entry(rest).or_insert_with(Rational64::zero);
                    match entry.checked_add(&coefficient) {
                        Some(sum) => *entry = sum,
                        None => unfolded.push(other),
                    }
                }
            }
        }

        let mut out: Vec<Expr> = collected
            .into_iter()
            .filter(|(_, coefficient)| !coefficient.is_zero())
            .map(|(rest, coefficient)| scaled(coefficient, rest))
            .collect();
        out.extend(unfolded);
        if !constant.is_zero() {
            out.push(Expr::Num(constant));
        }

        match out.len() {
            0 => Expr::zero(),
            1 => out.remove(0),
            _ => Expr::Add(out),
        }
    }

    /// Canonical product of `factors`
    ///
    /// Numbers whose product would overflow `i64` stay as separate factors
    /// after the coefficient.
    pub fn mul_all(factors: Vec<Expr>) -> Expr {
        let mut coefficient = Rational64::one();
        let mut powers: BTreeMap<Expr, Expr> = BTreeMap::new();
        let mut unfolded = Vec::new();
        let mut pending = factors;

        while let Some(factor) = pending.pop() {
            match factor {
                Expr::Mul(inner) => pending.extend(inner),
                Expr::Num(n) => {
                    if n.is_zero() {
                        return Expr::zero();
                    }
                    fold_factor(&mut coefficient, n, &mut unfolded);
                }
                Expr::Pow(base, exponent) => accumulate(&mut powers, *base, *exponent),
                other => accumulate(&mut powers, other, Expr::one()),
            }
        }

        let mut rebuilt = Vec::with_capacity(powers.len());
        let mut reprocess = false;
        for (base, exponent) in powers {
            match Expr::pow_of(base, exponent) {
                Expr::Num(n) => {
                    if n.is_zero() {
                        return Expr::zero();
                    }
                    fold_factor(&mut coefficient, n, &mut unfolded);
                }
                Expr::Mul(inner) => {
                    reprocess = true;
                    rebuilt.extend(inner);
                }
                other => rebuilt.push(other),
            }
        }

        if reprocess {
            rebuilt.push(Expr::Num(coefficient));
            rebuilt.extend(unfolded);
            return Expr::mul_all(rebuilt);
        }

        if rebuilt.is_empty() && unfolded.is_empty() {
            return Expr::Num(coefficient);
        }

        if rebuilt.len() == 1 && unfolded.is_empty() {
            if coefficient.is_one() {
                return rebuilt.remove(0);
            }
            if let Expr::Add(terms) = &rebuilt[0] {
                return Expr::add_all(
                    terms
                        .iter()
                        .map(|term| Expr::mul_all(vec![Expr::Num(coefficient), term.clone()]))
                        .collect(),
                );
            }
        }

        let mut out = Vec::with_capacity(rebuilt.len() + unfolded.len() + 1);
        if !coefficient.is_one() {
            out.push(Expr::Num(coefficient));
        }
        out.extend(unfolded);
        out.extend(rebuilt);
        if out.len() == 1 {
            return out.remove(0);
        }
        Expr::Mul(out)
    }

    /// Canonical power `base ** exponent`
    pub fn pow_of(base: Expr, exponent: Expr) -> Expr {
        if exponent.is_zero() || base.is_one() {
            return Expr::one();
        }
        if exponent.is_one() {
            return base;
        }

        if let Some(n) = exponent.as_integer() {
            return match base {
                Expr::Num(b) => match rational_powi(b, n) {
                    Some(value) => Expr::Num(value),
                    None => Expr::Pow(Box::new(Expr::Num(b)), Box::new(exponent)),
                },
                Expr::ImaginaryUnit => match n.rem_euclid(4) {
                    0 => Expr::one(),
                    1 => Expr::ImaginaryUnit,
                    2 => Expr::int(-1),
                    _ => Expr::Mul(vec![Expr::int(-1), Expr::ImaginaryUnit]),
                },
                Expr::Pow(inner_base, inner_exponent) => {
                    Expr::pow_of(*inner_base, Expr::mul_all(vec![*inner_exponent, exponent]))
                }
                Expr::Mul(factors) => Expr::mul_all(
                    factors
                        .into_iter()
                        .map(|factor| Expr::pow_of(factor, exponent.clone()))
                        .collect(),
                ),
                other => Expr::Pow(Box::new(other), Box::new(exponent)),
            };
        }

        if base.is_zero() && exponent.as_rational().is_some_and(|r| r.is_positive()) {
            return Expr::zero();
        }

        Expr::Pow(Box::new(base), Box::new(exponent))
    }

    pub fn pow(self, exponent: Expr) -> Expr {
        Expr::pow_of(self, exponent)
    }

    pub fn powi(self, exponent: i64) -> Expr {
        Expr::pow_of(self, Expr::int(exponent))
    }

    pub fn sqrt(self) -> Expr {
        Expr::pow_of(self, Expr::rational(1, 2))
    }

    pub fn recip(self) -> Expr {
        Expr::pow_of(self, Expr::int(-1))
    }

    /// Canonical elementary function application
    pub fn func(func: Func, arg: Expr) -> Expr {
        match func {
            Func::Exp => {
                if arg.is_zero() {
                    return Expr::one();
                }
                if let Expr::Func(Func::Ln, inner) = arg {
                    return *inner;
                }
            }
            Func::Ln => {
                if arg.is_one() {
                    return Expr::zero();
                }
                if let Expr::Func(Func::Exp, inner) = arg {
                    return *inner;
                }
            }
            Func::Sin => {
                if arg.is_zero() {
                    return Expr::zero();
                }
                if arg.is_negative_form() {
                    return -Expr::func(Func::Sin, -arg);
                }
            }
            Func::Cos => {
                if arg.is_zero() {
                    return Expr::one();
                }
                if arg.is_negative_form() {
                    return Expr::func(Func::Cos, -arg);
                }
            }
        }
        Expr::Func(func, Box::new(arg))
    }

    pub fn exp(self) -> Expr {
        Expr::func(Func::Exp, self)
    }

    pub fn ln(self) -> Expr {
        Expr::func(Func::Ln, self)
    }

    pub fn sin(self) -> Expr {
        Expr::func(Func::Sin, self)
    }

    pub fn cos(self) -> Expr {
        Expr::func(Func::Cos, self)
    }

    /// Unevaluated derivative; nested derivatives in the same variable merge
    pub fn derivative(expr: Expr, var: &str, order: u32) -> Expr {
        if order == 0 {
            return expr;
        }
        match expr {
            Expr::Derivative(inner, inner_var, inner_order) if inner_var == var => {
                Expr::Derivative(inner, inner_var, inner_order + order)
            }
            other => Expr::Derivative(Box::new(other), var.to_string(), order),
        }
    }

    /// Unevaluated indefinite integral
    pub fn integral(expr: Expr, var: &str) -> Expr {
        Expr::Integral(Box::new(expr), var.to_string())
    }

    /// Direct sub-expressions
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Num(_) | Expr::ImaginaryUnit | Expr::Pi | Expr::Symbol(_) => Vec::new(),
            Expr::Apply(_, args) => args.iter().collect(),
            Expr::Derivative(inner, _, _) | Expr::Integral(inner, _) => vec![inner.as_ref()],
            Expr::Func(_, arg) => vec![arg.as_ref()],
            Expr::Pow(base, exponent) => vec![base.as_ref(), exponent.as_ref()],
            Expr::Mul(items) | Expr::Add(items) => items.iter().collect(),
        }
    }

    /// Rebuild this node through the canonical constructors after mapping
    /// every direct child with `f`
    pub fn map_children<F>(&self, mut f: F) -> Expr
    where
        F: FnMut(&Expr) -> Expr,
    {
        match self {
            Expr::Num(_) | Expr::ImaginaryUnit | Expr::Pi | Expr::Symbol(_) => self.clone(),
            Expr::Apply(name, args) => Expr::Apply(name.clone(), args.iter().map(&mut f).collect()),
            Expr::Derivative(inner, var, order) => Expr::derivative(f(inner), var, *order),
            Expr::Integral(inner, var) => Expr::integral(f(inner), var),
            Expr::Func(func, arg) => Expr::func(*func, f(arg)),
            Expr::Pow(base, exponent) => {
                let base = f(base);
                let exponent = f(exponent);
                Expr::pow_of(base, exponent)
            }
            Expr::Mul(factors) => Expr::mul_all(factors.iter().map(&mut f).collect()),
            Expr::Add(terms) => Expr::add_all(terms.iter().map(&mut f).collect()),
        }
    }

    /// Re-canonicalise bottom-up; idempotent
    pub fn simplify(&self) -> Expr {
        self.map_children(|child| child.simplify())
    }

    /// True if `target` occurs anywhere in this expression
    pub fn contains(&self, target: &Expr) -> bool {
        self == target || self.children().into_iter().any(|child| child.contains(target))
    }

    /// True if the value of this expression depends on the symbol `var`
    pub fn depends_on(&self, var: &str) -> bool {
        match self {
            Expr::Symbol(name) => name == var,
            Expr::Integral(inner, bound) => bound == var || inner.depends_on(var),
            _ => self.children().into_iter().any(|child| child.depends_on(var)),
        }
    }

    pub fn is_free_of(&self, var: &str) -> bool {
        !self.depends_on(var)
    }

    /// Names of all symbols occurring in the expression
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Symbol(name) => {
                out.insert(name.clone());
            }
            Expr::Integral(inner, var) => {
                out.insert(var.clone());
                inner.collect_symbols(out);
            }
            _ => {
                for child in self.children() {
                    child.collect_symbols(out);
                }
            }
        }
    }
}

fn accumulate(powers: &mut BTreeMap<Expr, Expr>, base: Expr, exponent: Expr) {
    let combined = match powers.remove(&base) {
        Some(existing) => Expr::add_all(vec![existing, exponent]),
        None => exponent,
    };
    powers.insert(base, combined);
}

/// Multiply `n` into `coefficient`, or set it aside when that would overflow
fn fold_factor(coefficient: &mut Rational64, n: Rational64, unfolded: &mut Vec<Expr>) {
    match coefficient.checked_mul(&n) {
        Some(product) => *coefficient = product,
        None => unfolded.push(Expr::Num(n)),
    }
}

fn scaled(coefficient: Rational64, rest: Expr) -> Expr {
    if coefficient.is_one() {
        rest
    } else {
        Expr::mul_all(vec![Expr::Num(coefficient), rest])
    }
}

/// Exact `base ** n`; `None` on overflow, division by zero or huge `n`
fn rational_powi(base: Rational64, n: i64) -> Option<Rational64> {
    if n.abs() > 64 || (base.is_zero() && n < 0) {
        return None;
    }
    let mut acc = Rational64::one();
    for _ in 0..n.abs() {
        acc = acc.checked_mul(&base)?;
    }
    if n < 0 {
        Some(acc.recip())
    } else {
        Some(acc)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::int(n)
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::add_all(vec![self, rhs])
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::add_all(vec![self, -rhs])
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::mul_all(vec![self, rhs])
    }
}

impl ops::Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::mul_all(vec![self, rhs.recip()])
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::mul_all(vec![Expr::int(-1), self])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    #[test]
    fn test_like_terms_collect() {
        let e = Expr::int(2) * x() + Expr::int(3) * x();
        assert_eq!(e, Expr::int(5) * x());
    }

    #[test]
    fn test_cancelling_terms_vanish() {
        let e = x() + y() - x();
        assert_eq!(e, y());
        assert!((x() - x()).is_zero());
    }

    #[test]
    fn test_like_bases_collect() {
        assert_eq!(x() * x(), x().powi(2));
        assert_eq!(x().powi(2) / x(), x());
        assert_eq!(x() / x(), Expr::one());
    }

    #[test]
    fn test_numbers_fold() {
        assert_eq!(Expr::int(2) + Expr::int(3), Expr::int(5));
        assert_eq!(Expr::int(2) * Expr::rational(1, 4), Expr::rational(1, 2));
        assert_eq!(Expr::int(2).powi(-2), Expr::rational(1, 4));
        assert!((Expr::int(0) * x()).is_zero());
    }

    #[test]
    fn test_imaginary_unit_powers() {
        let i = Expr::ImaginaryUnit;
        assert_eq!(i.clone() * i.clone(), Expr::int(-1));
        assert_eq!(i.clone().powi(4), Expr::one());
        assert_eq!(i.clone().powi(3), -Expr::ImaginaryUnit);
    }

    #[test]
    fn test_trig_parity() {
        assert_eq!((-x()).cos(), x().cos());
        assert_eq!((-x()).sin(), -(x().sin()));
        assert_eq!(Expr::zero().cos(), Expr::one());
        assert_eq!(Expr::zero().exp(), Expr::one());
    }

    #[test]
    fn test_exp_ln_inverse() {
        assert_eq!(x().exp().ln(), x());
        assert_eq!(x().ln().exp(), x());
    }

    #[test]
    fn test_coefficient_distributes_over_single_sum() {
        let e = Expr::int(2) * (x() + y());
        assert_eq!(e, Expr::int(2) * x() + Expr::int(2) * y());
    }

    #[test]
    fn test_integer_power_of_product_distributes() {
        let e = (Expr::int(2) * x()).powi(2);
        assert_eq!(e, Expr::int(4) * x().powi(2));
    }

    #[test]
    fn test_nested_derivatives_merge() {
        let f = Expr::apply("f", vec![Expr::symbol("t")]);
        let d = Expr::derivative(Expr::derivative(f.clone(), "t", 1), "t", 1);
        assert_eq!(d, Expr::derivative(f, "t", 2));
    }

    #[test]
    fn test_split_coefficient() {
        let e = Expr::int(3) * x() * y();
        let (c, rest) = e.split_coefficient();
        assert_eq!(c, Rational64::from_integer(3));
        assert_eq!(rest, x() * y());
    }

    #[test]
    fn test_free_symbols_and_dependence() {
        let psi = Expr::apply("psi", vec![x(), Expr::symbol("t")]);
        let e = Expr::symbol("m") * psi;
        let symbols: Vec<String> = e.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["m", "t", "x"]);
        assert!(e.depends_on("x"));
        assert!(e.is_free_of("y"));
    }

    #[test]
    fn test_coefficient_overflow_keeps_factors_unfolded() {
        // 3**30 fits in i64, 3**60 does not
        let e = (Expr::int(3) * x()).powi(30) * (Expr::int(3) * x()).powi(30);
        assert!(e.contains(&x().powi(60)));

        let value = e.evaluate_with(&[("x", 1.0)]).unwrap();
        let expected = 3f64.powi(60);
        assert!(((value - expected) / expected).abs() < 1e-12);
    }

    #[test]
    fn test_sum_overflow_keeps_terms_unfolded() {
        let big = Expr::int(i64::MAX / 2 + 1);
        let e = big.clone() * x() + big * x();
        assert!(matches!(&e, Expr::Add(terms) if terms.len() == 2));

        let value = e.evaluate_with(&[("x", 1.0)]).unwrap();
        assert!((value / 2f64.powi(63) - 1.0).abs() < 1e-12);

        let constant = Expr::int(i64::MAX) + Expr::int(1);
        assert!(matches!(&constant, Expr::Add(terms) if terms.len() == 2));
        assert!((constant.evaluate_with(&[]).unwrap() / 2f64.powi(63) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let e = (x() + Expr::int(1)).powi(2) * x().cos();
        assert_eq!(e.simplify(), e);
        assert_eq!(e.simplify().simplify(), e.simplify());
    }
}
