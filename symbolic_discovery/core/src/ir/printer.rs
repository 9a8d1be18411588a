//! Human-readable rendering of expressions
//!
//! Output follows the usual computer-algebra conventions: `**` for powers,
//! `sqrt(..)` for square roots, negative powers written as denominators and
//! subtraction instead of adding negated terms.

use super::expr::Expr;
use num_rational::Rational64;
use num_traits::Signed;
use std::fmt;

const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

fn half() -> Rational64 {
    Rational64::new(1, 2)
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Num(n) if n.is_negative() => PREC_ADD,
        Expr::Num(n) if !n.is_integer() => PREC_MUL,
        Expr::Add(_) => PREC_ADD,
        Expr::Mul(_) if expr.is_negative_form() => PREC_ADD,
        Expr::Mul(_) => PREC_MUL,
        Expr::Pow(_, exponent) => match exponent.as_rational() {
            Some(r) if r == half() => PREC_ATOM,
            Some(r) if r.is_negative() => PREC_MUL,
            _ => PREC_POW,
        },
        _ => PREC_ATOM,
    }
}

fn render_in(expr: &Expr, min_prec: u8) -> String {
    let text = render(expr);
    if precedence(expr) < min_prec {
        format!("({})", text)
    } else {
        text
    }
}

fn render(expr: &Expr) -> String {
    match expr {
        Expr::Num(n) => {
            if n.is_integer() {
                n.to_integer().to_string()
            } else {
                format!("{}/{}", n.numer(), n.denom())
            }
        }
        Expr::ImaginaryUnit => "I".to_string(),
        Expr::Pi => "pi".to_string(),
        Expr::Symbol(name) => name.clone(),
        Expr::Apply(name, args) => {
            let args: Vec<String> = args.iter().map(render).collect();
            format!("{}({})", name, args.join(", "))
        }
        Expr::Derivative(inner, var, 1) => format!("Derivative({}, {})", render(inner), var),
        Expr::Derivative(inner, var, order) => {
            format!("Derivative({}, ({}, {}))", render(inner), var, order)
        }
        Expr::Integral(inner, var) => format!("Integral({}, {})", render(inner), var),
        Expr::Func(func, arg) => format!("{}({})", func.name(), render(arg)),
        Expr::Pow(base, exponent) => render_pow(base, exponent),
        Expr::Mul(factors) => render_mul(factors),
        Expr::Add(terms) => render_add(terms),
    }
}

fn render_pow(base: &Expr, exponent: &Expr) -> String {
    match exponent.as_rational() {
        Some(r) if r == half() => format!("sqrt({})", render(base)),
        Some(r) if r.is_negative() => {
            let flipped = Expr::pow_of(base.clone(), Expr::Num(-r));
            format!("1/{}", render_in(&flipped, PREC_POW))
        }
        _ => format!(
            "{}**{}",
            render_in(base, PREC_ATOM),
            render_in(exponent, PREC_ATOM)
        ),
    }
}

fn render_mul(factors: &[Expr]) -> String {
    let (coefficient, rest) = match factors.split_first() {
        Some((Expr::Num(c), rest)) => (*c, rest),
        _ => (Rational64::from_integer(1), factors),
    };
    let magnitude = coefficient.abs();

    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    if *magnitude.numer() != 1 {
        numerator.push(magnitude.numer().to_string());
    }
    if *magnitude.denom() != 1 {
        denominator.push(magnitude.denom().to_string());
    }

    for factor in rest {
        match factor {
            Expr::Pow(base, exponent) if exponent.is_negative_form() => {
                let flipped = Expr::pow_of((**base).clone(), -(**exponent).clone());
                denominator.push(render_in(&flipped, PREC_MUL));
            }
            other => numerator.push(render_in(other, PREC_MUL)),
        }
    }

    let numerator = if numerator.is_empty() {
        "1".to_string()
    } else {
        numerator.join("*")
    };
    let body = match denominator.len() {
        0 => numerator,
        1 => format!("{}/{}", numerator, denominator[0]),
        _ => format!("{}/({})", numerator, denominator.join("*")),
    };

    if coefficient.is_negative() {
        format!("-{}", body)
    } else {
        body
    }
}

fn render_add(terms: &[Expr]) -> String {
    let mut out = String::new();
    for (index, term) in terms.iter().enumerate() {
        if index == 0 {
            out.push_str(&render(term));
        } else if term.is_negative_form() {
            out.push_str(" - ");
            out.push_str(&render(&-term.clone()));
        } else {
            out.push_str(" + ");
            out.push_str(&render(term));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn test_render_atoms() {
        assert_eq!(Expr::int(-3).to_string(), "-3");
        assert_eq!(Expr::rational(1, 2).to_string(), "1/2");
        assert_eq!(Expr::ImaginaryUnit.to_string(), "I");
        assert_eq!(Expr::Pi.to_string(), "pi");
    }

    #[test]
    fn test_render_powers() {
        assert_eq!(s("x").powi(2).to_string(), "x**2");
        assert_eq!(s("x").sqrt().to_string(), "sqrt(x)");
        assert_eq!(s("x").recip().to_string(), "1/x");
        assert_eq!((s("x") + s("y")).powi(2).to_string(), "(x + y)**2");
    }

    #[test]
    fn test_render_products_with_denominators() {
        let e = s("e").powi(2) / (Expr::int(4) * Expr::Pi * s("epsilon_0") * s("hbar") * s("c"));
        assert_eq!(e.to_string(), "e**2/(4*pi*c*epsilon_0*hbar)");

        let half_mv2 = Expr::rational(1, 2) * s("m") * s("v").powi(2);
        assert_eq!(half_mv2.to_string(), "m*v**2/2");
    }

    #[test]
    fn test_render_subtraction() {
        let e = s("x").cos() - Expr::ImaginaryUnit * s("x").sin();
        assert_eq!(e.to_string(), "cos(x) - I*sin(x)");
        assert_eq!((s("x") - Expr::int(1)).to_string(), "x - 1");
    }

    #[test]
    fn test_render_derivative() {
        let x_t = Expr::apply("x", vec![s("t")]);
        let d2 = Expr::derivative(x_t.clone(), "t", 2);
        assert_eq!(d2.to_string(), "Derivative(x(t), (t, 2))");
        assert_eq!(Expr::derivative(x_t, "t", 1).to_string(), "Derivative(x(t), t)");
    }
}
