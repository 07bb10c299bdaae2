use tracing::debug;

use crate::error::ExpressionError;
use crate::parser::Token;

/// The precedence of `^`. It is the only right-associative binary operator.
const POW_PRECEDENCE: u8 = 4;

/// Convert infix tokens to postfix (reverse Polish) order with the shunting-yard
/// algorithm.
///
/// Operands go straight to the output. A left-associative binary operator first
/// moves every stacked operator of greater or equal precedence to the output;
/// `^` only moves operators of strictly greater precedence, so `2^3^2` is
/// `2^(3^2)`. A unary minus is pushed without popping, which places it below `^`
/// and above `*` and `/`: `-2^2` is `-(2^2)`.
pub fn to_postfix(tokens: Vec<Token>) -> Result<Vec<Token>, ExpressionError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::with_capacity(16);

    for token in tokens {
        match token {
            Token::Number(_) | Token::Identifier(_) => output.push(token),
            Token::LParen => stack.push(token),
            Token::RParen => loop {
                match stack.pop() {
                    Some(Token::LParen) => break,
                    Some(t) => output.push(t),
                    None => {
                        return Err(ExpressionError::UnbalancedParenthesis { unmatched: ')' })
                    }
                }
            },
            Token::Operator(ref op) => {
                let precedence = op.get_precedence();
                while let Some(top) = stack.last() {
                    if top.get_precedence().map_or(false, |p| p >= precedence) {
                        output.extend(stack.pop());
                    } else {
                        break;
                    }
                }
                stack.push(token);
            }
            Token::Caret => {
                while let Some(top) = stack.last() {
                    if top.get_precedence().map_or(false, |p| p > POW_PRECEDENCE) {
                        output.extend(stack.pop());
                    } else {
                        break;
                    }
                }
                stack.push(token);
            }
            Token::UnaryMinus => stack.push(token),
        }
    }

    while let Some(t) = stack.pop() {
        if t == Token::LParen {
            return Err(ExpressionError::UnbalancedParenthesis { unmatched: '(' });
        }
        output.push(t);
    }

    debug!(
        "postfix: {}",
        output
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );

    Ok(output)
}

#[cfg(test)]
mod test {
    use super::to_postfix;
    use crate::{error::ExpressionError, parser::tokenize};

    fn postfix(input: &str) -> Result<String, ExpressionError> {
        Ok(to_postfix(tokenize(input)?)?
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" "))
    }

    #[test]
    fn precedence() {
        assert_eq!(postfix("-3 + 4 * 2").unwrap(), "3 ~ 4 2 * +");
        assert_eq!(postfix("2*(3+4)").unwrap(), "2 3 4 + *");
        assert_eq!(postfix("1 - 2 - 3").unwrap(), "1 2 - 3 -");
        assert_eq!(postfix("8 / 2 / 2").unwrap(), "8 2 / 2 /");
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(postfix("2^3^2").unwrap(), "2 3 2 ^ ^");
        assert_eq!(postfix("2*x^2").unwrap(), "2 x 2 ^ *");
    }

    #[test]
    fn unary_minus() {
        assert_eq!(postfix("-2^2").unwrap(), "2 2 ^ ~");
        assert_eq!(postfix("-2*3").unwrap(), "2 ~ 3 *");
        assert_eq!(postfix("-(3+4)").unwrap(), "3 4 + ~");
        assert_eq!(postfix("2^-1").unwrap(), "2 1 ~ ^");
        assert_eq!(postfix("--x").unwrap(), "x ~ ~");
    }

    #[test]
    fn unbalanced() {
        assert_eq!(
            postfix("((5+5)"),
            Err(ExpressionError::UnbalancedParenthesis { unmatched: '(' })
        );
        assert_eq!(
            postfix(")5+5("),
            Err(ExpressionError::UnbalancedParenthesis { unmatched: ')' })
        );
        assert_eq!(
            postfix("(1+2))"),
            Err(ExpressionError::UnbalancedParenthesis { unmatched: ')' })
        );
    }
}
