use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;

use ahash::HashMap;
use smallvec::SmallVec;

use crate::error::ExpressionError;
use crate::printer::{MonomialPrinter, PrintOptions};

use super::{Exponent, Variable, INLINED_EXPONENTS};

/// The variable part of a monomial: `(variable, power)` pairs sorted by variable name.
pub type Exponents = SmallVec<[(Variable, Exponent); INLINED_EXPONENTS]>;

/// A coefficient times a product of variables raised to positive powers.
///
/// The exponent list is kept sorted by variable name and never contains a zero
/// power, so two monomials have the same variable part exactly when their exponent
/// lists compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Monomial {
    pub coefficient: f64,
    pub(crate) exponents: Exponents,
}

impl Monomial {
    /// Create a monomial from `(variable, power)` pairs in any order. Zero powers are
    /// dropped and repeated variables have their powers summed.
    pub fn new<V: Into<Variable>>(
        coefficient: f64,
        exponents: impl IntoIterator<Item = (V, Exponent)>,
    ) -> Monomial {
        let mut exponents: Exponents = exponents
            .into_iter()
            .filter(|(_, e)| *e != 0)
            .map(|(v, e)| (v.into(), e))
            .collect();

        exponents.sort_by(|a, b| a.0.cmp(&b.0));
        exponents.dedup_by(|next, kept| {
            if next.0 == kept.0 {
                kept.1 += next.1;
                true
            } else {
                false
            }
        });

        Monomial {
            coefficient,
            exponents,
        }
    }

    #[inline]
    pub fn constant(coefficient: f64) -> Monomial {
        Monomial {
            coefficient,
            exponents: SmallVec::new(),
        }
    }

    /// The monomial `name^1` with coefficient 1.
    pub fn variable(name: &str) -> Monomial {
        let mut exponents = SmallVec::new();
        exponents.push((Variable::from(name), 1));
        Monomial {
            coefficient: 1.,
            exponents,
        }
    }

    #[inline]
    pub fn exponents(&self) -> &[(Variable, Exponent)] {
        &self.exponents
    }

    /// The power of `var` in this monomial, 0 if it does not occur.
    pub fn degree(&self, var: &str) -> Exponent {
        match self.exponents.binary_search_by(|(v, _)| v.as_str().cmp(var)) {
            Ok(pos) => self.exponents[pos].1,
            Err(_) => 0,
        }
    }

    pub fn total_degree(&self) -> Exponent {
        self.exponents.iter().map(|(_, e)| *e).sum()
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.exponents.is_empty()
    }

    /// Returns `true` if both monomials have the same variables with the same powers.
    #[inline]
    pub fn same_exponents(&self, other: &Monomial) -> bool {
        self.exponents == other.exponents
    }

    /// Add two like terms.
    pub fn try_add(&self, other: &Monomial) -> Result<Monomial, ExpressionError> {
        if !self.same_exponents(other) {
            return Err(ExpressionError::InvalidDegree(format!(
                "cannot add {} and {}: the degrees do not match",
                self, other
            )));
        }

        Ok(Monomial {
            coefficient: self.coefficient + other.coefficient,
            exponents: self.exponents.clone(),
        })
    }

    /// Subtract two like terms.
    pub fn try_sub(&self, other: &Monomial) -> Result<Monomial, ExpressionError> {
        if !self.same_exponents(other) {
            return Err(ExpressionError::InvalidDegree(format!(
                "cannot subtract {} from {}: the degrees do not match",
                other, self
            )));
        }

        Ok(Monomial {
            coefficient: self.coefficient - other.coefficient,
            exponents: self.exponents.clone(),
        })
    }

    /// Divide by another monomial. Every variable of the divisor must occur in `self`
    /// with at least the same power, since negative powers cannot be represented.
    pub fn try_div(&self, other: &Monomial) -> Result<Monomial, ExpressionError> {
        if other.coefficient == 0. {
            return Err(ExpressionError::DivisionByZero);
        }

        let mut exponents = self.exponents.clone();
        for (v, e) in &other.exponents {
            match exponents.binary_search_by(|(w, _)| w.cmp(v)) {
                Ok(pos) if exponents[pos].1 >= *e => {
                    exponents[pos].1 -= *e;
                    if exponents[pos].1 == 0 {
                        exponents.remove(pos);
                    }
                }
                _ => {
                    return Err(ExpressionError::InvalidDegree(format!(
                        "the degree of {} in the divisor {} is higher than in the dividend {}",
                        v, other, self
                    )))
                }
            }
        }

        Ok(Monomial {
            coefficient: self.coefficient / other.coefficient,
            exponents,
        })
    }

    pub fn scale(&self, factor: f64) -> Monomial {
        Monomial {
            coefficient: self.coefficient * factor,
            exponents: self.exponents.clone(),
        }
    }

    pub fn try_div_scalar(&self, divisor: f64) -> Result<Monomial, ExpressionError> {
        if divisor == 0. {
            return Err(ExpressionError::DivisionByZero);
        }

        Ok(Monomial {
            coefficient: self.coefficient / divisor,
            exponents: self.exponents.clone(),
        })
    }

    /// Split off `var`, returning the rest of the monomial and the power of `var`.
    pub(crate) fn remove_variable(&self, var: &str) -> (Monomial, Exponent) {
        let mut rest = self.clone();
        match rest
            .exponents
            .binary_search_by(|(v, _)| v.as_str().cmp(var))
        {
            Ok(pos) => {
                let (_, e) = rest.exponents.remove(pos);
                (rest, e)
            }
            Err(_) => (rest, 0),
        }
    }

    /// Evaluate the monomial numerically. Returns `None` if a variable has no value.
    pub fn evaluate(&self, values: &HashMap<Variable, f64>) -> Option<f64> {
        let mut r = self.coefficient;
        for (v, e) in &self.exponents {
            r *= pow_coefficient(*values.get(v)?, *e);
        }
        Some(r)
    }

    /// Multiply coefficients and add the powers over the union of both variable sets.
    /// Fails when a power exceeds [`Exponent::MAX`].
    pub fn try_mul(&self, other: &Monomial) -> Result<Monomial, ExpressionError> {
        let (a, b) = (&self.exponents, &other.exponents);
        let mut exponents = Exponents::with_capacity(a.len() + b.len());

        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                Ordering::Less => {
                    exponents.push(a[i].clone());
                    i += 1;
                }
                Ordering::Greater => {
                    exponents.push(b[j].clone());
                    j += 1;
                }
                Ordering::Equal => {
                    let e = a[i].1.checked_add(b[j].1).ok_or_else(|| {
                        ExpressionError::InvalidDegree(format!(
                            "the power of {} in ({})*({}) exceeds {}",
                            a[i].0,
                            self,
                            other,
                            Exponent::MAX
                        ))
                    })?;
                    exponents.push((a[i].0.clone(), e));
                    i += 1;
                    j += 1;
                }
            }
        }
        exponents.extend(a[i..].iter().cloned());
        exponents.extend(b[j..].iter().cloned());

        Ok(Monomial {
            coefficient: self.coefficient * other.coefficient,
            exponents,
        })
    }

    /// Raise the monomial to the power `exp` by multiplying every power with `exp`.
    /// Fails when a power exceeds [`Exponent::MAX`].
    pub fn try_pow(&self, exp: Exponent) -> Result<Monomial, ExpressionError> {
        if exp == 0 {
            return Ok(Monomial::constant(1.));
        }

        let mut exponents = Exponents::with_capacity(self.exponents.len());
        for (v, e) in &self.exponents {
            let p = e.checked_mul(exp).ok_or_else(|| {
                ExpressionError::InvalidDegree(format!(
                    "the power of {} in ({})^{} exceeds {}",
                    v,
                    self,
                    exp,
                    Exponent::MAX
                ))
            })?;
            exponents.push((v.clone(), p));
        }

        Ok(Monomial {
            coefficient: pow_coefficient(self.coefficient, exp),
            exponents,
        })
    }
}

/// `c^e` with `powi` when `e` fits an `i32`.
#[inline]
fn pow_coefficient(c: f64, e: Exponent) -> f64 {
    match i32::try_from(e) {
        Ok(e) => c.powi(e),
        Err(_) => c.powf(e as f64),
    }
}

impl Neg for Monomial {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        self.coefficient = -self.coefficient;
        self
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(
            &MonomialPrinter {
                monomial: self,
                opts: PrintOptions {
                    precision: f.precision(),
                },
            },
            f,
        )
    }
}

#[cfg(test)]
mod test {
    use ahash::HashMap;

    use super::Monomial;
    use crate::{error::ExpressionError, poly::Exponent};

    #[test]
    fn canonical_exponents() {
        let m = Monomial::new(2.5, [("z", 1), ("x", 3), ("y", 0), ("x", 1)]);
        assert_eq!(m.degree("x"), 4);
        assert_eq!(m.degree("y"), 0);
        assert_eq!(m.degree("z"), 1);
        assert_eq!(m.exponents().len(), 2);
        assert_eq!(m.total_degree(), 5);
        assert_eq!(m, Monomial::new(2.5, [("x", 4), ("z", 1)]));
    }

    #[test]
    fn add_like_terms() {
        let a = Monomial::new(2., [("x", 1), ("y", 2), ("z", 3)]);
        let b = Monomial::new(3., [("x", 1), ("y", 2), ("z", 3)]);
        assert_eq!(a.try_add(&b).unwrap().coefficient, 5.);
        assert_eq!(b.try_sub(&a).unwrap().coefficient, 1.);

        let c = Monomial::new(-2., [("x", 1), ("y", 2), ("z", 3)]);
        assert_eq!(a.try_add(&c).unwrap().coefficient, 0.);
    }

    #[test]
    fn add_mismatched_degrees() {
        let a = Monomial::new(1., [("x", 1), ("y", 1), ("z", 1)]);
        let b = Monomial::new(2., [("x", 2), ("y", 2), ("z", 2)]);
        assert!(matches!(
            a.try_add(&b),
            Err(ExpressionError::InvalidDegree(_))
        ));
        assert!(matches!(
            a.try_sub(&b),
            Err(ExpressionError::InvalidDegree(_))
        ));
    }

    #[test]
    fn multiply() {
        let a = Monomial::new(2., [("x", 1), ("y", 2), ("z", 3)]);
        let b = Monomial::new(3., [("x", 4), ("y", 5), ("w", 6)]);
        let r = a.try_mul(&b).unwrap();
        assert_eq!(r.coefficient, 6.);
        assert_eq!(r.degree("w"), 6);
        assert_eq!(r.degree("x"), 5);
        assert_eq!(r.degree("y"), 7);
        assert_eq!(r.degree("z"), 3);

        let s = a.try_mul(&a).unwrap();
        assert_eq!(s, Monomial::new(4., [("x", 2), ("y", 4), ("z", 6)]));
    }

    #[test]
    fn multiply_overflowing_power() {
        let a = Monomial::new(1., [("x", Exponent::MAX)]);
        assert!(matches!(
            a.try_mul(&Monomial::variable("x")),
            Err(ExpressionError::InvalidDegree(_))
        ));
        assert_eq!(
            a.try_mul(&Monomial::variable("y")).unwrap().degree("x"),
            Exponent::MAX
        );
    }

    #[test]
    fn power() {
        let a = Monomial::new(-2., [("x", 3), ("y", 1)]);
        assert_eq!(
            a.try_pow(3).unwrap(),
            Monomial::new(-8., [("x", 9), ("y", 3)])
        );
        assert_eq!(a.try_pow(0).unwrap(), Monomial::constant(1.));

        let x = Monomial::variable("x");
        assert_eq!(x.try_pow(4_000_000_000).unwrap().degree("x"), 4_000_000_000);
        assert!(matches!(
            Monomial::new(1., [("x", 65536)]).try_pow(65536),
            Err(ExpressionError::InvalidDegree(_))
        ));
    }

    #[test]
    fn divide() {
        let a = Monomial::new(6., [("x", 5), ("y", 5), ("z", 5)]);
        let b = Monomial::new(2., [("x", 2), ("y", 3), ("z", 5)]);
        let r = a.try_div(&b).unwrap();
        assert_eq!(r, Monomial::new(3., [("x", 3), ("y", 2)]));

        assert!(matches!(
            b.try_div(&a),
            Err(ExpressionError::InvalidDegree(_))
        ));
        assert_eq!(
            a.try_div(&Monomial::constant(0.)),
            Err(ExpressionError::DivisionByZero)
        );
    }

    #[test]
    fn scalars() {
        let m = Monomial::new(3., [("x", 2)]);
        assert_eq!(m.scale(2.).coefficient, 6.);
        assert_eq!(m.try_div_scalar(2.).unwrap().coefficient, 1.5);
        assert_eq!(m.try_div_scalar(0.), Err(ExpressionError::DivisionByZero));
        assert_eq!((-m).coefficient, -3.);
    }

    #[test]
    fn evaluate() {
        let m = Monomial::new(-2., [("x", 2), ("y", 1)]);
        let mut values = HashMap::default();
        values.insert("x".into(), 3.);
        assert_eq!(m.evaluate(&values), None);
        values.insert("y".into(), 0.5);
        assert_eq!(m.evaluate(&values), Some(-9.));
    }
}
