//! Polycalc translates infix expressions into multivariate polynomials.
//!
//! An expression is split into tokens, reordered into postfix form and
//! evaluated on a stack of polynomials. Identifiers that are bound in an
//! [`Environment`] are replaced by their value; all others are free variables.
//!
//! For example:
//!
//! ```
//! use polycalc::{environment::Environment, evaluate::evaluate};
//!
//! fn main() {
//!     let mut env = Environment::new();
//!     env.store("a", "2x + 3").unwrap();
//!
//!     let r = evaluate("a*a", &env).unwrap();
//!     assert_eq!(r.to_string(), "4x^2 + 12x + 9");
//!
//!     let c = evaluate("(4^2)*(2 + 3/(2+2)) + (4*5)/(2+3)", &env).unwrap();
//!     assert_eq!(c.get_constant(), 48.);
//! }
//! ```

pub mod environment;
pub mod error;
pub mod evaluate;
pub mod parser;
pub mod poly;
pub mod postfix;
pub mod printer;
pub mod table;

pub use environment::Environment;
pub use error::ExpressionError;
pub use evaluate::{evaluate, execute, Outcome};
pub use poly::{Monomial, Polynomial};
