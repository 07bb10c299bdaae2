pub mod monomial;
pub mod polynomial;

use smartstring::{LazyCompact, SmartString};

pub use self::monomial::Monomial;
pub use self::polynomial::Polynomial;

/// The number of variables per monomial that are stored without a heap allocation.
pub const INLINED_EXPONENTS: usize = 4;

/// The name of a polynomial variable.
pub type Variable = SmartString<LazyCompact>;

/// The power of a single variable in a monomial. Zero powers are never stored.
pub type Exponent = u32;
