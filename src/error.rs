use std::fmt;

/// Errors that can occur while translating or evaluating an expression.
///
/// Every error aborts only the translation that raised it: no partial
/// result is produced and the [`Environment`](crate::environment::Environment)
/// is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// An unscannable character or a malformed number.
    Syntax { message: String, position: usize },
    /// A bracket without a partner, `'('` or `')'`.
    UnbalancedParenthesis { unmatched: char },
    /// The postfix stream does not reduce to exactly one value.
    MalformedExpression(String),
    DivisionByZero,
    /// The divisor has more than one term or contains a variable.
    NonConstantDivisor,
    /// The exponent is negative, fractional or not a constant.
    InvalidExponent(String),
    /// Monomial arithmetic on incompatible degrees, or a power above `u32::MAX`.
    InvalidDegree(String),
    /// An expansion that would form too many terms.
    ExpansionTooLarge(String),
}

impl ExpressionError {
    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> ExpressionError {
        ExpressionError::Syntax {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::Syntax { message, position } => {
                write!(f, "syntax error at position {}: {}", position, message)
            }
            ExpressionError::UnbalancedParenthesis { unmatched } => {
                write!(f, "unbalanced parentheses: unmatched '{}'", unmatched)
            }
            ExpressionError::MalformedExpression(m) => write!(f, "malformed expression: {}", m),
            ExpressionError::DivisionByZero => f.write_str("division by zero"),
            ExpressionError::NonConstantDivisor => {
                f.write_str("can only divide by a nonzero constant")
            }
            ExpressionError::InvalidExponent(e) => write!(
                f,
                "invalid exponent {}: expected a non-negative integer constant",
                e
            ),
            ExpressionError::InvalidDegree(m) => write!(f, "invalid degree: {}", m),
            ExpressionError::ExpansionTooLarge(m) => write!(f, "expansion too large: {}", m),
        }
    }
}

impl std::error::Error for ExpressionError {}
