//! Slot-count formula evaluation
//!
//! Inventory tabs derive their slot counts from arithmetic expressions over
//! attribute ids, e.g. `"STR * 2 + 1"`. Expressions support the four
//! operators, parentheses, unary sign, and decimal literals; nothing else.
//! Parsed by hand to keep regex out of the domain layer.
//!
//! Identifiers are maximal `[A-Za-z_][A-Za-z0-9_]*` tokens, so substituting
//! a value for `STR` can never touch part of `STRENGTH`. Any identifier that
//! is not a known variable, and any character outside identifiers, digits,
//! `+ - * / ( ) .` and whitespace, fails the whole evaluation.

use std::collections::HashMap;
use thiserror::Error;

/// Error when evaluating a slot-count formula
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// An identifier in the expression has no value in the variable map
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    /// A character outside the allowed expression alphabet
    #[error("illegal character '{0}' in expression")]
    IllegalCharacter(char),
    /// A numeric literal that does not parse
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    /// Structurally malformed expression
    #[error("malformed expression: {0}")]
    Malformed(String),
    /// Division by zero, or a result that is not a finite number
    #[error("expression did not produce a finite number")]
    NotFinite,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
}

/// Evaluate `expression` against `variables`, returning an integer >= 0.
///
/// Total function: every failure (unknown variable, malformed expression,
/// division by zero) degrades to 0 with a logged diagnostic, because a
/// slot count must always render something. The empty expression is 0 by
/// definition, not a failure.
pub fn evaluate(expression: &str, variables: &HashMap<String, f64>) -> u32 {
    if expression.trim().is_empty() {
        return 0;
    }
    match try_evaluate(expression, variables) {
        Ok(count) => count,
        Err(error) => {
            tracing::warn!(%expression, %error, "formula evaluation failed, defaulting to 0");
            0
        }
    }
}

/// Fallible evaluation; [`evaluate`] is the degrading wrapper.
pub fn try_evaluate(
    expression: &str,
    variables: &HashMap<String, f64>,
) -> Result<u32, FormulaError> {
    let tokens = tokenize(expression, variables)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
    };
    let value = parser.expression()?;
    if parser.pos != parser.tokens.len() {
        return Err(FormulaError::Malformed(
            "trailing input after expression".to_string(),
        ));
    }
    if !value.is_finite() {
        return Err(FormulaError::NotFinite);
    }
    // Floor, then clamp negatives to zero; saturate on overflow.
    Ok(value.floor().clamp(0.0, u32::MAX as f64) as u32)
}

fn tokenize(expression: &str, variables: &HashMap<String, f64>) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = expression.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LeftParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RightParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let value: f64 = literal
                    .parse()
                    .map_err(|_| FormulaError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                match variables.get(&name) {
                    Some(value) => tokens.push(Token::Number(*value)),
                    None => return Err(FormulaError::UnknownVariable(name)),
                }
            }
            other => return Err(FormulaError::IllegalCharacter(other)),
        }
    }
    Ok(tokens)
}

/// Recursive-descent parser with conventional precedence:
/// expression := term (('+' | '-') term)*
/// term       := factor (('*' | '/') factor)*
/// factor     := ('+' | '-')* primary
/// primary    := number | '(' expression ')'
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                Token::Star => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(FormulaError::NotFinite);
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, FormulaError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.factor()
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, FormulaError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(*value),
            Some(Token::LeftParen) => {
                let value = self.expression()?;
                match self.advance() {
                    Some(Token::RightParen) => Ok(value),
                    _ => Err(FormulaError::Malformed("unclosed parenthesis".to_string())),
                }
            }
            Some(other) => Err(FormulaError::Malformed(format!(
                "unexpected token {:?}",
                other
            ))),
            None => Err(FormulaError::Malformed(
                "expression ended unexpectedly".to_string(),
            )),
        }
    }
}
