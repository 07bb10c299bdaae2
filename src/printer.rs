use std::fmt::{self, Write};

use crate::poly::{Monomial, Polynomial};

/// Options for printing polynomials and monomials.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// The number of decimals of every printed coefficient.
    /// `None` prints the shortest representation that round-trips.
    pub precision: Option<usize>,
}

/// A printer for a single term.
///
/// The coefficient is omitted when its magnitude is 1 and the term has a variable.
/// Variables are separated by `*` and a power is only written when it exceeds 1,
/// for example `-2.5x*y^3`.
pub struct MonomialPrinter<'a> {
    pub monomial: &'a Monomial,
    pub opts: PrintOptions,
}

impl<'a> MonomialPrinter<'a> {
    pub fn new(monomial: &'a Monomial) -> MonomialPrinter<'a> {
        MonomialPrinter {
            monomial,
            opts: PrintOptions::default(),
        }
    }

    /// Write the term without its sign.
    fn fmt_magnitude(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let magnitude = self.monomial.coefficient.abs();
        let exponents = self.monomial.exponents();

        if exponents.is_empty() || magnitude != 1. {
            match self.opts.precision {
                Some(p) => write!(f, "{:.*}", p, magnitude)?,
                None => write!(f, "{}", magnitude)?,
            }
        }

        let mut first = true;
        for (v, e) in exponents {
            if !first {
                f.write_char('*')?;
            }
            first = false;

            f.write_str(v)?;
            if *e > 1 {
                write!(f, "^{}", e)?;
            }
        }

        Ok(())
    }
}

impl<'a> fmt::Display for MonomialPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.monomial.coefficient == 0. {
            return f.write_char('0');
        }

        if self.monomial.coefficient < 0. {
            f.write_char('-')?;
        }

        self.fmt_magnitude(f)
    }
}

/// A printer for polynomials. Terms are written in their stored order and joined
/// with `" + "` or `" - "` depending on their sign; the zero polynomial prints as `0`.
pub struct PolynomialPrinter<'a> {
    pub poly: &'a Polynomial,
    pub opts: PrintOptions,
}

impl<'a> PolynomialPrinter<'a> {
    pub fn new(poly: &'a Polynomial) -> PolynomialPrinter<'a> {
        PolynomialPrinter {
            poly,
            opts: PrintOptions::default(),
        }
    }

    pub fn new_with_options(poly: &'a Polynomial, opts: PrintOptions) -> PolynomialPrinter<'a> {
        PolynomialPrinter { poly, opts }
    }
}

impl<'a> fmt::Display for PolynomialPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.poly.is_zero() {
            return f.write_char('0');
        }

        let mut first = true;
        for t in self.poly.terms() {
            let negative = t.coefficient < 0.;
            if first {
                if negative {
                    f.write_char('-')?;
                }
            } else if negative {
                f.write_str(" - ")?;
            } else {
                f.write_str(" + ")?;
            }
            first = false;

            MonomialPrinter {
                monomial: t,
                opts: self.opts,
            }
            .fmt_magnitude(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{MonomialPrinter, PolynomialPrinter, PrintOptions};
    use crate::poly::{Monomial, Polynomial};

    #[test]
    fn monomial() {
        let m = Monomial::new(1., [("x", 1), ("y", 1), ("z", 2)]);
        assert_eq!(MonomialPrinter::new(&m).to_string(), "x*y*z^2");

        let m = Monomial::new(-2.1, [("x", 1), ("y", 1)]);
        assert_eq!(m.to_string(), "-2.1x*y");

        assert_eq!(Monomial::new(-1., [("x", 3)]).to_string(), "-x^3");
        assert_eq!(Monomial::constant(1.).to_string(), "1");
        assert_eq!(Monomial::constant(-1.).to_string(), "-1");
        assert_eq!(Monomial::constant(0.).to_string(), "0");
    }

    #[test]
    fn polynomial() {
        let p = Polynomial::canonicalize([
            Monomial::new(1., [("x", 1), ("y", 1), ("z", 2)]),
            Monomial::new(2.1, [("x", 1), ("y", 1)]),
            Monomial::new(1., [("x", 6), ("y", 9)]),
            Monomial::new(-84., [("x", 1), ("y", 2)]),
            Monomial::constant(-1.),
        ]);
        assert_eq!(
            PolynomialPrinter::new(&p).to_string(),
            "x*y*z^2 + 2.1x*y + x^6*y^9 - 84x*y^2 - 1"
        );

        let q = -p;
        assert_eq!(q.to_string(), "-x*y*z^2 - 2.1x*y - x^6*y^9 + 84x*y^2 + 1");
    }

    #[test]
    fn zero() {
        assert_eq!(Polynomial::zero().to_string(), "0");
    }

    #[test]
    fn precision() {
        let p = Polynomial::canonicalize([
            Monomial::new(1. / 3., [("x", 1)]),
            Monomial::constant(-2.),
        ]);
        assert_eq!(
            PolynomialPrinter::new_with_options(&p, PrintOptions { precision: Some(2) })
                .to_string(),
            "0.33x - 2.00"
        );
        assert_eq!(format!("{:.3}", p), "0.333x - 2.000");
    }
}
