use std::collections::hash_map::Entry;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use ahash::{HashMap, HashMapExt};

use crate::error::ExpressionError;
use crate::printer::{PolynomialPrinter, PrintOptions};

use super::monomial::{Exponents, Monomial};
use super::{Exponent, Variable};

/// The largest number of term products a single multiplication may form.
pub const MAX_PRODUCT_TERMS: usize = 1 << 20;
/// The largest power a polynomial with more than one term may be raised to.
pub const MAX_EXPANSION_POWER: Exponent = 4096;

/// A sparse multivariate polynomial with `f64` coefficients.
///
/// The terms are always canonical: no two terms share the same variable part and
/// no term has a zero coefficient. Terms are kept in order of first occurrence,
/// so `x + 1` and `1 + x` are different term sequences of equal value. The zero
/// polynomial has no terms.
///
/// All arithmetic produces a new polynomial and leaves its operands untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
    terms: Vec<Monomial>,
}

impl Polynomial {
    #[inline]
    pub fn zero() -> Polynomial {
        Polynomial { terms: vec![] }
    }

    #[inline]
    pub fn one() -> Polynomial {
        Polynomial::constant(1.)
    }

    /// Constructs a constant polynomial. A zero constant yields the zero polynomial.
    #[inline]
    pub fn constant(coeff: f64) -> Polynomial {
        if coeff == 0. {
            return Polynomial::zero();
        }

        Polynomial {
            terms: vec![Monomial::constant(coeff)],
        }
    }

    /// The polynomial `name`, a single variable of degree one.
    #[inline]
    pub fn variable(name: &str) -> Polynomial {
        Polynomial {
            terms: vec![Monomial::variable(name)],
        }
    }

    /// Merge like terms and drop terms whose coefficients sum to exactly zero.
    /// The surviving terms keep the position of their first occurrence.
    pub fn canonicalize(terms: impl IntoIterator<Item = Monomial>) -> Polynomial {
        let mut index: HashMap<Exponents, usize> = HashMap::new();
        let mut merged: Vec<Monomial> = vec![];

        for t in terms {
            match index.entry(t.exponents.clone()) {
                Entry::Occupied(o) => {
                    merged[*o.get()].coefficient += t.coefficient;
                }
                Entry::Vacant(v) => {
                    v.insert(merged.len());
                    merged.push(t);
                }
            }
        }

        merged.retain(|t| t.coefficient != 0.);
        Polynomial { terms: merged }
    }

    /// Add a single term in place, merging it with a like term if there is one.
    pub fn add_monomial(&mut self, monomial: Monomial) {
        if monomial.coefficient == 0. {
            return;
        }

        if let Some(pos) = self
            .terms
            .iter()
            .position(|t| t.same_exponents(&monomial))
        {
            self.terms[pos].coefficient += monomial.coefficient;
            if self.terms[pos].coefficient == 0. {
                self.terms.remove(pos);
            }
        } else {
            self.terms.push(monomial);
        }
    }

    #[inline]
    pub fn terms(&self) -> &[Monomial] {
        &self.terms
    }

    /// Returns the number of terms in the polynomial.
    #[inline]
    pub fn nterms(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.nterms() == 1 && self.terms[0].is_constant() && self.terms[0].coefficient == 1.
    }

    /// Returns true if the polynomial has no variables. The zero polynomial is constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        match self.terms.as_slice() {
            [] => true,
            [t] => t.is_constant(),
            _ => false,
        }
    }

    /// Get the constant term of the polynomial.
    pub fn get_constant(&self) -> f64 {
        self.terms
            .iter()
            .find(|t| t.is_constant())
            .map(|t| t.coefficient)
            .unwrap_or(0.)
    }

    pub fn total_degree(&self) -> Exponent {
        self.terms
            .iter()
            .map(|t| t.total_degree())
            .max()
            .unwrap_or(0)
    }

    /// All variables that occur in the polynomial, sorted by name.
    pub fn variables(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = self
            .terms
            .iter()
            .flat_map(|t| t.exponents().iter().map(|(v, _)| v.as_str()))
            .collect();
        vars.sort_unstable();
        vars.dedup();
        vars
    }

    /// Multiply every coefficient by `factor`.
    pub fn scale(&self, factor: f64) -> Polynomial {
        Polynomial::canonicalize(self.terms.iter().map(|t| t.scale(factor)))
    }

    /// Divide by a nonzero constant polynomial.
    pub fn divide(&self, divisor: &Polynomial) -> Result<Polynomial, ExpressionError> {
        let scalar = match divisor.terms.as_slice() {
            [] => return Err(ExpressionError::DivisionByZero),
            [t] if t.is_constant() => t.coefficient,
            _ => return Err(ExpressionError::NonConstantDivisor),
        };

        if scalar == 0. {
            return Err(ExpressionError::DivisionByZero);
        }

        let mut terms = Vec::with_capacity(self.nterms());
        for t in &self.terms {
            terms.push(t.try_div_scalar(scalar)?);
        }
        Ok(Polynomial::canonicalize(terms))
    }

    /// Multiply two polynomials term by term.
    ///
    /// Fails when a power exceeds [`Exponent::MAX`] or when more than
    /// [`MAX_PRODUCT_TERMS`] term products would be formed.
    pub fn try_mul(&self, other: &Polynomial) -> Result<Polynomial, ExpressionError> {
        let n = self.nterms().saturating_mul(other.nterms());
        if n > MAX_PRODUCT_TERMS {
            return Err(ExpressionError::ExpansionTooLarge(format!(
                "a product of {} and {} terms",
                self.nterms(),
                other.nterms()
            )));
        }

        let mut terms = Vec::with_capacity(n);
        for a in &self.terms {
            for b in &other.terms {
                terms.push(a.try_mul(b)?);
            }
        }
        Ok(Polynomial::canonicalize(terms))
    }

    /// Raise the polynomial to the power `exp`. Any polynomial to the power zero is one.
    ///
    /// A single term is raised directly: its powers are multiplied by `exp` and its
    /// coefficient is raised with `powi`, which may differ in the last bit from
    /// multiplying the coefficient `exp` times. Other polynomials are expanded by
    /// repeated multiplication, up to the power [`MAX_EXPANSION_POWER`].
    pub fn pow(&self, exp: Exponent) -> Result<Polynomial, ExpressionError> {
        if exp == 0 {
            return Ok(Polynomial::one());
        }

        match self.terms.as_slice() {
            [] => Ok(Polynomial::zero()),
            [t] => Ok(Polynomial::from(t.try_pow(exp)?)),
            _ => {
                if exp > MAX_EXPANSION_POWER {
                    return Err(ExpressionError::ExpansionTooLarge(format!(
                        "({})^{} exceeds the power {} for a polynomial with several terms",
                        self, exp, MAX_EXPANSION_POWER
                    )));
                }

                let mut result = self.clone();
                for _ in 1..exp {
                    result = result.try_mul(self)?;
                }
                Ok(result)
            }
        }
    }

    /// Evaluate the polynomial numerically. Returns `None` if a variable has no value.
    pub fn evaluate(&self, values: &HashMap<Variable, f64>) -> Option<f64> {
        let mut sum = 0.;
        for t in &self.terms {
            sum += t.evaluate(values)?;
        }
        Some(sum)
    }

    /// Replace every occurrence of `var` by `value`.
    pub fn substitute(&self, var: &str, value: &Polynomial) -> Result<Polynomial, ExpressionError> {
        let mut terms = vec![];
        for t in &self.terms {
            let (rest, power) = t.remove_variable(var);
            if power == 0 {
                terms.push(rest);
            } else {
                for s in value.pow(power)?.terms {
                    terms.push(rest.try_mul(&s)?);
                }
            }
        }
        Ok(Polynomial::canonicalize(terms))
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(
            &PolynomialPrinter {
                poly: self,
                opts: PrintOptions {
                    precision: f.precision(),
                },
            },
            f,
        )
    }
}

impl From<Monomial> for Polynomial {
    fn from(monomial: Monomial) -> Self {
        Polynomial::canonicalize([monomial])
    }
}

impl<'a> Add<&'a Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, other: &'a Polynomial) -> Polynomial {
        Polynomial::canonicalize(self.terms.iter().chain(&other.terms).cloned())
    }
}

impl<'a> Sub<&'a Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn sub(self, other: &'a Polynomial) -> Polynomial {
        self + &(-other)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self.terms.iter().cloned().map(Neg::neg).collect(),
        }
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self.terms.into_iter().map(Neg::neg).collect(),
        }
    }
}
