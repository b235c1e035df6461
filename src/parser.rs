use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::limits::Limits;
use crate::token::{ScalarKind, Token, TokenKind};
use crate::value::{Scalar, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("insufficient tokens to parse: found {count}, need at least 2")]
    InsufficientTokens { count: usize },
    #[error("unexpected {found} at top level, expected left-brace or left-bracket")]
    UnexpectedTopLevel { found: TokenKind },
    #[error("expected a string key or right-brace, found {found}")]
    ExpectedKey { found: TokenKind },
    #[error("expected a colon after key {key:?}, found {found}")]
    ExpectedColon { key: String, found: TokenKind },
    #[error("expected a value, found end of tokens")]
    ExpectedValue,
    #[error("expected a comma after key:value pair {key:?}, found {found}")]
    ExpectedComma { key: String, found: TokenKind },
    #[error("expected an array element or right-bracket, found {found}")]
    ExpectedElement { found: TokenKind },
    #[error("expected a comma or right-bracket, found {found}")]
    ExpectedCommaOrBracket { found: TokenKind },
    #[error("unexpected token type {found}")]
    UnexpectedToken { found: TokenKind },
    #[error("{kind} token has malformed text {text:?}")]
    MalformedLiteral { kind: ScalarKind, text: String },
    #[error("object is missing its closing right-brace")]
    UnterminatedObject,
    #[error("array is missing its closing right-bracket")]
    UnterminatedArray,
    #[error("nesting exceeds the limit of {max} levels")]
    NestingTooDeep { max: usize },
}

#[derive(Debug, thiserror::Error)]
#[error("expected {0}")]
struct Mismatch(String);

trait Parser {
    type Token;
    type Output;

    fn parse(&self, input: &[Self::Token]) -> Result<(usize, Self::Output), Mismatch>;

    fn expected(&self) -> String;
}

type RcParser<T, O> = Rc<dyn Parser<Token = T, Output = O>>;

/// Matches exactly one token, mapping it with `F`.
struct Terminal<T, O, F>(&'static str, F, PhantomData<fn(&T) -> O>)
where
    F: Fn(&T) -> Option<O>;

impl<T, O, F> Parser for Terminal<T, O, F>
where
    F: Fn(&T) -> Option<O>,
{
    type Output = O;
    type Token = T;

    fn parse(&self, input: &[Self::Token]) -> Result<(usize, Self::Output), Mismatch> {
        input
            .first()
            .and_then(|token| (self.1)(token))
            .map(|value| (1, value))
            .ok_or_else(|| Mismatch(self.expected()))
    }

    fn expected(&self) -> String {
        self.0.to_string()
    }
}

fn terminal<T, O, F>(expected: &'static str, f: F) -> RcParser<T, O>
where
    T: 'static,
    O: 'static,
    F: 'static + Fn(&T) -> Option<O>,
{
    Rc::new(Terminal(expected, f, PhantomData))
}

fn punct(expected: &'static str, kind: TokenKind) -> RcParser<Token, ()> {
    terminal(expected, move |t: &Token| (t.kind() == kind).then_some(()))
}

struct Grammar {
    key: RcParser<Token, String>,
    colon: RcParser<Token, ()>,
    comma: RcParser<Token, ()>,
    close_object: RcParser<Token, ()>,
    close_array: RcParser<Token, ()>,
    scalar: RcParser<Token, (ScalarKind, String)>,
}

impl Grammar {
    fn new() -> Self {
        Grammar {
            key: terminal("a string key", |t: &Token| {
                (t.kind() == TokenKind::String).then(|| t.text().to_string())
            }),
            colon: punct("a colon", TokenKind::Colon),
            comma: punct("a comma", TokenKind::Comma),
            close_object: punct("a right-brace", TokenKind::RightBrace),
            close_array: punct("a right-bracket", TokenKind::RightBracket),
            // `null` is a literal but not a value
            scalar: terminal("a string, number or boolean", |t: &Token| {
                t.kind()
                    .scalar_kind()
                    .filter(|kind| *kind != ScalarKind::Null)
                    .map(|kind| (kind, t.text().to_string()))
            }),
        }
    }
}

/// Position in the token slice, shared by every nested sub-parser of one call.
struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    limits: Limits,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token], limits: Limits) -> Self {
        Cursor {
            tokens,
            pos: 0,
            depth: 0,
            limits,
        }
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(Token::kind)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Runs `parser` at the cursor, advancing past its match.
    fn eat<O>(&mut self, parser: &RcParser<Token, O>) -> Option<O> {
        match parser.parse(&self.tokens[self.pos..]) {
            Ok((len, out)) => {
                self.pos += len;
                Some(out)
            }
            Err(mismatch) => {
                tracing::trace!(position = self.pos, %mismatch, "no match");
                None
            }
        }
    }

    /// The error for whatever sits at the cursor: `found` for a token, `at_end` past the last one.
    fn fail(&self, found: impl FnOnce(TokenKind) -> ParseError, at_end: ParseError) -> ParseError {
        self.peek().map_or(at_end, found)
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.limits.max_nesting_depth {
            return Err(ParseError::NestingTooDeep {
                max: self.limits.max_nesting_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Parses `tokens` with the default [`Limits`].
pub fn parse(tokens: &[Token]) -> Result<Value, ParseError> {
    parse_with(tokens, Limits::default())
}

pub fn parse_with(tokens: &[Token], limits: Limits) -> Result<Value, ParseError> {
    let result = parse_document(tokens, limits);
    match &result {
        Ok(value) => tracing::debug!(
            tokens = tokens.len(),
            node_type = %value.node_type(),
            "parsed tokens"
        ),
        Err(err) => tracing::debug!(%err, "parsing failed"),
    }
    result
}

fn parse_document(tokens: &[Token], limits: Limits) -> Result<Value, ParseError> {
    if tokens.len() < 2 {
        return Err(ParseError::InsufficientTokens {
            count: tokens.len(),
        });
    }

    let grammar = Grammar::new();
    let mut cursor = Cursor::new(tokens, limits);
    let value = match tokens[0].kind() {
        TokenKind::LeftBrace => parse_object(&grammar, &mut cursor)?,
        TokenKind::LeftBracket => parse_array(&grammar, &mut cursor)?,
        found => return Err(ParseError::UnexpectedTopLevel { found }),
    };

    if cursor.pos < tokens.len() {
        tracing::debug!(
            ignored = tokens.len() - cursor.pos,
            "ignoring tokens after the top-level value"
        );
    }
    Ok(value)
}

/// Entered at a left-brace; leaves the cursor past the matching right-brace.
fn parse_object(grammar: &Grammar, cursor: &mut Cursor<'_>) -> Result<Value, ParseError> {
    cursor.advance();
    cursor.enter()?;

    let mut children = HashMap::new();
    loop {
        if cursor.eat(&grammar.close_object).is_some() {
            break;
        }

        let key = match cursor.eat(&grammar.key) {
            Some(key) => key,
            None => {
                return Err(cursor.fail(
                    |found| ParseError::ExpectedKey { found },
                    ParseError::UnterminatedObject,
                ))
            }
        };
        if cursor.eat(&grammar.colon).is_none() {
            return Err(cursor.fail(
                |found| ParseError::ExpectedColon { key, found },
                ParseError::UnterminatedObject,
            ));
        }

        let value = parse_value(grammar, cursor)?;

        // a comma directly before the right-brace is accepted
        if cursor.eat(&grammar.comma).is_none() && cursor.peek() != Some(TokenKind::RightBrace) {
            return Err(cursor.fail(
                |found| ParseError::ExpectedComma { key, found },
                ParseError::UnterminatedObject,
            ));
        }
        children.insert(key, value);
    }

    cursor.leave();
    Ok(Value::Object(children))
}

/// Entered at a left-bracket. Elements are literals only, never nested
/// objects or arrays.
fn parse_array(grammar: &Grammar, cursor: &mut Cursor<'_>) -> Result<Value, ParseError> {
    cursor.advance();
    cursor.enter()?;

    let mut elements = vec![];
    loop {
        if cursor.eat(&grammar.close_array).is_some() {
            break;
        }

        match cursor.peek() {
            Some(kind) if kind.is_literal() => elements.push(parse_value(grammar, cursor)?),
            Some(found) => return Err(ParseError::ExpectedElement { found }),
            None => return Err(ParseError::UnterminatedArray),
        }

        if cursor.eat(&grammar.comma).is_none() && cursor.peek() != Some(TokenKind::RightBracket)
        {
            return Err(cursor.fail(
                |found| ParseError::ExpectedCommaOrBracket { found },
                ParseError::UnterminatedArray,
            ));
        }
    }

    cursor.leave();
    Ok(Value::Array(elements))
}

/// Object values: string, number and boolean scalars or nested objects.
fn parse_value(grammar: &Grammar, cursor: &mut Cursor<'_>) -> Result<Value, ParseError> {
    if let Some((kind, text)) = cursor.eat(&grammar.scalar) {
        return scalar(kind, text).map(Value::Scalar);
    }

    match cursor.peek() {
        Some(TokenKind::LeftBrace) => parse_object(grammar, cursor),
        Some(found) => Err(ParseError::UnexpectedToken { found }),
        None => Err(ParseError::ExpectedValue),
    }
}

fn scalar(kind: ScalarKind, text: String) -> Result<Scalar, ParseError> {
    if kind.accepts(&text) {
        Ok(Scalar::new(kind, text))
    } else {
        Err(ParseError::MalformedLiteral { kind, text })
    }
}
