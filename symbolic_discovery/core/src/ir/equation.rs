//! Equations between two expressions

use super::expr::Expr;
use std::fmt;

/// `lhs = rhs`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn new(lhs: Expr, rhs: Expr) -> Self {
        Self { lhs, rhs }
    }

    /// `lhs - rhs`, zero exactly when the equation holds
    pub fn residual(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }

    /// Add two equations side by side
    pub fn combine(&self, other: &Equation) -> Equation {
        Equation::new(
            self.lhs.clone() + other.lhs.clone(),
            self.rhs.clone() + other.rhs.clone(),
        )
    }

    /// Apply `f` to both sides
    pub fn map_sides<F>(&self, mut f: F) -> Equation
    where
        F: FnMut(&Expr) -> Expr,
    {
        Equation::new(f(&self.lhs), f(&self.rhs))
    }

    pub fn simplify(&self) -> Equation {
        self.map_sides(Expr::simplify)
    }

    pub fn swap(&self) -> Equation {
        Equation::new(self.rhs.clone(), self.lhs.clone())
    }

    /// True if both sides are structurally identical
    pub fn is_identity(&self) -> bool {
        self.residual().is_zero()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_residual() {
        let eq = Equation::new(Expr::symbol("F"), Expr::symbol("m") * Expr::symbol("a"));
        assert_eq!(eq.to_string(), "F = a*m");
        assert_eq!(eq.residual().to_string(), "F - a*m");
    }

    #[test]
    fn test_combine() {
        let x = Expr::symbol("x");
        let first = Equation::new(x.clone(), Expr::int(1));
        let second = Equation::new(x.clone(), Expr::int(2));

        let sum = first.combine(&second);
        assert_eq!(sum, Equation::new(Expr::int(2) * x, Expr::int(3)));
    }

    #[test]
    fn test_identity() {
        let x = Expr::symbol("x");
        assert!(Equation::new(x.clone() + x.clone(), Expr::int(2) * x.clone()).is_identity());
        assert!(!Equation::new(x, Expr::int(2)).is_identity());
    }
}
