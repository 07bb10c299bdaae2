use std::fmt::{self, Write};

use smartstring::{LazyCompact, SmartString};
use tracing::trace;

use crate::error::ExpressionError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ParseState {
    Identifier,
    Number,
    Any,
}

/// A binary arithmetic operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Add => f.write_char('+'),
            Operator::Sub => f.write_char('-'),
            Operator::Mul => f.write_char('*'),
            Operator::Div => f.write_char('/'),
        }
    }
}

impl Operator {
    #[inline]
    pub fn get_precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(SmartString<LazyCompact>),
    Operator(Operator),
    Caret,
    LParen,
    RParen,
    UnaryMinus,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Identifier(v) => f.write_str(v),
            Token::Operator(o) => fmt::Display::fmt(o, f),
            Token::Caret => f.write_char('^'),
            Token::LParen => f.write_char('('),
            Token::RParen => f.write_char(')'),
            Token::UnaryMinus => f.write_char('~'),
        }
    }
}

impl Token {
    /// The binding strength of an operator token: `^` 4, unary minus 3,
    /// `*` and `/` 2, `+` and `-` 1. Operands and parentheses have none.
    #[inline]
    pub fn get_precedence(&self) -> Option<u8> {
        match self {
            Token::Operator(o) => Some(o.get_precedence()),
            Token::UnaryMinus => Some(3),
            Token::Caret => Some(4),
            _ => None,
        }
    }

    #[inline]
    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Identifier(_))
    }

    /// Return if the token completes an operand, so that the next token
    /// is expected to be an operator.
    #[inline]
    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Identifier(_) | Token::RParen
        )
    }
}

/// Convert a digit run into a number token. At most one `.` is allowed and it
/// may be leading or trailing: `2.` and `.5` are valid.
fn parse_number(buffer: &str, position: usize) -> Result<Token, ExpressionError> {
    if buffer.chars().filter(|c| *c == '.').count() > 1 {
        return Err(ExpressionError::syntax(
            format!("malformed number '{}': more than one '.'", buffer),
            position,
        ));
    }

    buffer.parse::<f64>().map(Token::Number).map_err(|_| {
        ExpressionError::syntax(format!("malformed number '{}'", buffer), position)
    })
}

/// Split an infix expression into tokens.
///
/// A `-` is unary when an operand is expected: at the start of the input, after an
/// operator or after `(`. A unary `+` is dropped. A multiplication is inserted
/// between an operand or `)` and a following identifier or `(`, so that
/// `2x(x+1)` reads as `2*x*(x+1)`. Whitespace only separates tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens: Vec<Token> = Vec::with_capacity(input.len());
    let mut state = ParseState::Any;
    let mut buffer = String::with_capacity(16);
    let mut start = 0;

    // add EOF as `None`
    for (pos, c) in input
        .chars()
        .map(Some)
        .chain(std::iter::once(None))
        .enumerate()
    {
        match state {
            ParseState::Number => {
                if let Some(c @ ('0'..='9' | '.')) = c {
                    buffer.push(c);
                    continue;
                }

                tokens.push(parse_number(&buffer, start)?);
                buffer.clear();
                state = ParseState::Any;
            }
            ParseState::Identifier => {
                if let Some(c) = c.filter(|c| c.is_alphabetic()) {
                    buffer.push(c);
                    continue;
                }

                tokens.push(Token::Identifier(buffer.as_str().into()));
                buffer.clear();
                state = ParseState::Any;
            }
            ParseState::Any => {}
        }

        let Some(c) = c else {
            break;
        };

        if c.is_whitespace() {
            continue;
        }

        let expect_operand = tokens.last().map_or(true, |t| !t.ends_operand());

        match c {
            '0'..='9' | '.' => {
                state = ParseState::Number;
                start = pos;
                buffer.push(c);
            }
            '(' => {
                if !expect_operand {
                    // insert multiplication: x(...) -> x*(...)
                    tokens.push(Token::Operator(Operator::Mul));
                }
                tokens.push(Token::LParen);
            }
            ')' => tokens.push(Token::RParen),
            '+' => {
                if !expect_operand {
                    tokens.push(Token::Operator(Operator::Add));
                }
                // a unary plus can be ignored
            }
            '-' => {
                if expect_operand {
                    tokens.push(Token::UnaryMinus);
                } else {
                    tokens.push(Token::Operator(Operator::Sub));
                }
            }
            '*' => tokens.push(Token::Operator(Operator::Mul)),
            '/' => tokens.push(Token::Operator(Operator::Div)),
            '^' => tokens.push(Token::Caret),
            _ if c.is_alphabetic() => {
                if !expect_operand {
                    // insert multiplication: 2x -> 2*x
                    tokens.push(Token::Operator(Operator::Mul));
                }
                state = ParseState::Identifier;
                buffer.push(c);
            }
            _ => {
                return Err(ExpressionError::syntax(
                    format!("unexpected '{}' in input", c),
                    pos,
                ));
            }
        }
    }

    trace!("tokens of '{}': {:?}", input, tokens);
    Ok(tokens)
}

#[cfg(test)]
mod test {
    use super::{tokenize, Operator, Token};
    use crate::error::ExpressionError;

    fn id(name: &str) -> Token {
        Token::Identifier(name.into())
    }

    const MUL: Token = Token::Operator(Operator::Mul);
    const ADD: Token = Token::Operator(Operator::Add);
    const SUB: Token = Token::Operator(Operator::Sub);

    #[test]
    fn numbers() {
        assert_eq!(
            tokenize("2.+3.").unwrap(),
            vec![Token::Number(2.), ADD, Token::Number(3.)]
        );
        assert_eq!(tokenize(" .5 ").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("0.111").unwrap(), vec![Token::Number(0.111)]);
    }

    #[test]
    fn malformed_numbers() {
        assert!(matches!(
            tokenize("1.2.3 + 1"),
            Err(ExpressionError::Syntax { position: 0, .. })
        ));
        assert!(matches!(
            tokenize("2 + ."),
            Err(ExpressionError::Syntax { position: 4, .. })
        ));
    }

    #[test]
    fn unexpected_character() {
        assert_eq!(
            tokenize("2 # 3"),
            Err(ExpressionError::Syntax {
                message: "unexpected '#' in input".into(),
                position: 2
            })
        );
        assert!(tokenize("x_1").is_err());
        assert!(tokenize("a = 3").is_err());
    }

    #[test]
    fn unary_minus() {
        assert_eq!(tokenize("-5").unwrap(), vec![Token::UnaryMinus, Token::Number(5.)]);
        assert_eq!(
            tokenize("3-4").unwrap(),
            vec![Token::Number(3.), SUB, Token::Number(4.)]
        );
        assert_eq!(
            tokenize("2*-(3)").unwrap(),
            vec![
                Token::Number(2.),
                MUL,
                Token::UnaryMinus,
                Token::LParen,
                Token::Number(3.),
                Token::RParen
            ]
        );
        assert_eq!(
            tokenize("2^-x").unwrap(),
            vec![Token::Number(2.), Token::Caret, Token::UnaryMinus, id("x")]
        );
        assert_eq!(
            tokenize("(x)-y").unwrap(),
            vec![Token::LParen, id("x"), Token::RParen, SUB, id("y")]
        );
    }

    #[test]
    fn unary_plus() {
        assert_eq!(tokenize("+3").unwrap(), vec![Token::Number(3.)]);
        assert_eq!(
            tokenize("(+x)").unwrap(),
            vec![Token::LParen, id("x"), Token::RParen]
        );
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(
            tokenize("2x(x+1)").unwrap(),
            vec![
                Token::Number(2.),
                MUL,
                id("x"),
                MUL,
                Token::LParen,
                id("x"),
                ADD,
                Token::Number(1.),
                Token::RParen
            ]
        );
        assert_eq!(
            tokenize("(a)(b) c").unwrap(),
            vec![
                Token::LParen,
                id("a"),
                Token::RParen,
                MUL,
                Token::LParen,
                id("b"),
                Token::RParen,
                MUL,
                id("c")
            ]
        );
    }

    #[test]
    fn no_implicit_multiplication_before_numbers() {
        assert_eq!(
            tokenize("2 3").unwrap(),
            vec![Token::Number(2.), Token::Number(3.)]
        );
        assert_eq!(tokenize("x2").unwrap(), vec![id("x"), Token::Number(2.)]);
    }

    #[test]
    fn identifiers() {
        assert_eq!(
            tokenize("xyz^2").unwrap(),
            vec![id("xyz"), Token::Caret, Token::Number(2.)]
        );
        assert_eq!(tokenize("").unwrap(), vec![]);
    }
}
