//! Substitution of sub-expressions
//!
//! Besides exact structural matches, a product pattern is replaced inside a
//! larger product when every one of its factors divides out, so
//! `1/(4*pi*epsilon_0)` is found inside `e**2/(4*pi*epsilon_0*hbar*c)`.

use crate::ir::{Equation, Expr};
use num_traits::Signed;

impl Expr {
    /// Replace every occurrence of `old` with `new`
    pub fn subs(&self, old: &Expr, new: &Expr) -> Expr {
        if self == old {
            return new.clone();
        }
        if let (Expr::Mul(_), Expr::Mul(_)) = (self, old) {
            if let Some(replaced) = self.subs_product(old, new) {
                return replaced;
            }
        }
        self.map_children(|child| child.subs(old, new))
    }

    /// Apply several substitutions in order
    pub fn subs_all(&self, pairs: &[(Expr, Expr)]) -> Expr {
        pairs
            .iter()
            .fold(self.clone(), |acc, (old, new)| acc.subs(old, new))
    }

    fn subs_product(&self, old: &Expr, new: &Expr) -> Option<Expr> {
        let (own_coefficient, mut own) = self.as_powers();
        let (old_coefficient, pattern) = old.as_powers();

        for (base, exponent) in &pattern {
            let wanted = exponent.as_rational()?;
            let have = own.get(base)?.as_rational()?;
            if wanted.is_negative() != have.is_negative() || have.abs() < wanted.abs() {
                return None;
            }
        }

        for (base, exponent) in pattern {
            if let Some(have) = own.remove(&base) {
                own.insert(base, have - exponent);
            }
        }

        let mut factors = vec![Expr::Num(own_coefficient / old_coefficient), new.clone()];
        factors.extend(own.into_iter().map(|(base, exponent)| Expr::pow_of(base, exponent)));
        Some(Expr::mul_all(factors))
    }
}

impl Equation {
    pub fn subs(&self, old: &Expr, new: &Expr) -> Equation {
        self.map_sides(|side| side.subs(old, new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn test_subs_symbol() {
        let e = s("m") * s("a");
        let replaced = e.subs(&s("a"), &(s("v") * s("w")));
        assert_eq!(replaced, s("m") * s("v") * s("w"));
    }

    #[test]
    fn test_subs_inside_function() {
        let e = (s("x") * s("y")).cos();
        assert_eq!(e.subs(&s("y"), &Expr::int(2)), (Expr::int(2) * s("x")).cos());
    }

    #[test]
    fn test_subs_product_pattern() {
        let alpha = s("e").powi(2) / (Expr::int(4) * Expr::Pi * s("epsilon_0") * s("hbar") * s("c"));
        let coulomb = Expr::one() / (Expr::int(4) * Expr::Pi * s("epsilon_0"));

        let replaced = alpha.subs(&coulomb, &s("k_e"));
        assert_eq!(replaced, s("e").powi(2) * s("k_e") / (s("hbar") * s("c")));
        assert_eq!(replaced.to_string(), "e**2*k_e/(c*hbar)");
    }

    #[test]
    fn test_subs_product_pattern_requires_every_factor() {
        let e = s("a") * s("b");
        let pattern = s("a") * s("c");
        assert_eq!(e.subs(&pattern, &s("z")), e);
    }

    #[test]
    fn test_subs_all() {
        let e = s("x") + s("y");
        let out = e.subs_all(&[(s("x"), Expr::int(1)), (s("y"), Expr::int(2))]);
        assert_eq!(out, Expr::int(3));
    }
}
