use std::ops::{Bound, RangeBounds};

pub mod lexer;
pub mod limits;
pub mod parser;
pub mod token;
pub mod value;

pub use lexer::{tokenize, tokenize_with, LexError};
pub use limits::Limits;
pub use parser::{parse, parse_with, ParseError};
pub use token::{ScalarKind, Token, TokenKind};
pub use value::{CoercionError, NodeType, Scalar, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Tokenizes and parses `input` with the default [`Limits`].
pub fn from_str(input: &str) -> Result<Value, Error> {
    from_str_with(input, Limits::default())
}

pub fn from_str_with(input: &str, limits: Limits) -> Result<Value, Error> {
    let tokens = tokenize_with(input, limits)?;
    let value = parse_with(&tokens, limits)?;
    Ok(value)
}

impl std::str::FromStr for Value {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        crate::from_str(input)
    }
}

/// Converts range bounds to a minimum and an inclusive maximum.
fn get_bounds(bounds: impl RangeBounds<usize>) -> (usize, Option<usize>) {
    let min = match bounds.start_bound() {
        Bound::Included(n) => *n,
        Bound::Excluded(n) => *n + 1,
        Bound::Unbounded => 0,
    };
    let max = match bounds.end_bound() {
        Bound::Included(n) => Some(*n),
        Bound::Excluded(n) => Some(n.saturating_sub(1)),
        Bound::Unbounded => None,
    };
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert_eq!(get_bounds(..), (0, None));
        assert_eq!(get_bounds(1..), (1, None));
        assert_eq!(get_bounds(0..=1), (0, Some(1)));
        assert_eq!(get_bounds(2..5), (2, Some(4)));
    }

    #[test]
    fn errors_from_both_stages() {
        assert_eq!(
            from_str("[x]"),
            Err(Error::Lex(LexError::UnexpectedCharacter {
                ch: 'x',
                position: 1
            }))
        );
        assert_eq!(
            from_str(""),
            Err(Error::Parse(ParseError::InsufficientTokens { count: 0 }))
        );
    }

    #[test]
    fn value_from_str() {
        let value: Value = r#"{"a": "b"}"#.parse().unwrap();
        assert_eq!(value.get("a").unwrap().as_str(), Ok("b"));
    }

    #[test]
    fn error_messages_pass_through() {
        let err = from_str("[tttt]").unwrap_err();
        assert_eq!(err.to_string(), "unexpected character 't' at position 1");
    }
}
