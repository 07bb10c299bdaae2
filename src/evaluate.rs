use tracing::{debug, instrument};

use crate::environment::Environment;
use crate::error::ExpressionError;
use crate::parser::{tokenize, Operator, Token};
use crate::poly::{Exponent, Polynomial, Variable};
use crate::postfix::to_postfix;

/// Translate and evaluate an infix expression. Identifiers bound in `env` are
/// replaced by their value; all other identifiers are free variables.
#[instrument(level = "debug", skip(env))]
pub fn evaluate(input: &str, env: &Environment) -> Result<Polynomial, ExpressionError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExpressionError::syntax("expression is empty", 0));
    }

    let postfix = to_postfix(tokens)?;
    let r = evaluate_postfix(&postfix, env)?;
    debug!("{} = {}", input, r);
    Ok(r)
}

/// Run the postfix stack machine over `tokens`.
pub fn evaluate_postfix(tokens: &[Token], env: &Environment) -> Result<Polynomial, ExpressionError> {
    let mut stack: Vec<Polynomial> = Vec::with_capacity(tokens.len());

    for t in tokens {
        match t {
            Token::Number(n) => stack.push(Polynomial::constant(*n)),
            Token::Identifier(name) => stack.push(
                env.lookup(name)
                    .cloned()
                    .unwrap_or_else(|| Polynomial::variable(name)),
            ),
            Token::UnaryMinus => {
                let a = pop_operand(&mut stack, t)?;
                stack.push(-a);
            }
            Token::Operator(op) => {
                let b = pop_operand(&mut stack, t)?;
                let a = pop_operand(&mut stack, t)?;
                stack.push(match op {
                    Operator::Add => &a + &b,
                    Operator::Sub => &a - &b,
                    Operator::Mul => a.try_mul(&b)?,
                    Operator::Div => a.divide(&b)?,
                });
            }
            Token::Caret => {
                let e = pop_operand(&mut stack, t)?;
                let b = pop_operand(&mut stack, t)?;
                stack.push(b.pow(to_exponent(&e)?)?);
            }
            Token::LParen | Token::RParen => {
                return Err(ExpressionError::MalformedExpression(format!(
                    "unexpected '{}' in postfix stream",
                    t
                )));
            }
        }
    }

    if stack.len() != 1 {
        return Err(ExpressionError::MalformedExpression(format!(
            "expected a single value, but {} remain",
            stack.len()
        )));
    }

    Ok(stack.pop().unwrap_or_default())
}

fn pop_operand(stack: &mut Vec<Polynomial>, op: &Token) -> Result<Polynomial, ExpressionError> {
    stack.pop().ok_or_else(|| {
        ExpressionError::MalformedExpression(format!("operator '{}' is missing an operand", op))
    })
}

/// Convert an exponent operand to a power. It must be a constant with a
/// non-negative integer value; the zero polynomial is the power 0.
fn to_exponent(e: &Polynomial) -> Result<Exponent, ExpressionError> {
    if !e.is_constant() {
        return Err(ExpressionError::InvalidExponent(e.to_string()));
    }

    let c = e.get_constant();
    if c < 0. || c.fract() != 0. || c > Exponent::MAX as f64 {
        return Err(ExpressionError::InvalidExponent(e.to_string()));
    }

    Ok(c as Exponent)
}

/// A line of input: either an assignment `name = expression` or an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'a> {
    Assignment { name: &'a str, expression: &'a str },
    Expression(&'a str),
}

impl<'a> Statement<'a> {
    /// Split off the assignment target, if any. The name must consist of letters.
    pub fn parse(line: &'a str) -> Result<Statement<'a>, ExpressionError> {
        match line.split_once('=') {
            Some((lhs, expression)) => {
                let name = lhs.trim();
                if !is_valid_name(name) {
                    return Err(ExpressionError::syntax(
                        format!("cannot assign to '{}': a name consists of letters only", name),
                        0,
                    ));
                }

                Ok(Statement::Assignment { name, expression })
            }
            None => Ok(Statement::Expression(line)),
        }
    }
}

/// Returns `true` if `name` can be bound in an [`Environment`].
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphabetic())
}

/// The result of [`execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Assigned { name: Variable, value: Polynomial },
    Value(Polynomial),
}

/// Execute a line of input: bind the value of an assignment in `env`, or
/// evaluate an expression. On error `env` is unchanged.
pub fn execute(line: &str, env: &mut Environment) -> Result<Outcome, ExpressionError> {
    match Statement::parse(line)? {
        Statement::Assignment { name, expression } => {
            let value = env.store(name, expression)?.clone();
            Ok(Outcome::Assigned {
                name: name.into(),
                value,
            })
        }
        Statement::Expression(expression) => Ok(Outcome::Value(evaluate(expression, env)?)),
    }
}
