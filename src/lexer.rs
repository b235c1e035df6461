use std::ops::RangeBounds;
use std::rc::Rc;

use crate::limits::Limits;
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character {ch:?} at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },
    #[error("input of {len} characters exceeds the limit of {max}")]
    InputTooLarge { len: usize, max: usize },
}

impl LexError {
    /// Character index of the offending character, if the error has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            LexError::UnexpectedCharacter { position, .. } => Some(*position),
            LexError::InputTooLarge { .. } => None,
        }
    }
}

/// Matches a prefix of its input, returning the matched length in bytes.
pub trait Lexer {
    fn lex(&self, input: &str) -> Option<usize>;
    fn expected(&self) -> String;
}

pub type RcLexer = Rc<dyn Lexer>;

pub struct Pred<F>(&'static str, F)
where
    F: Fn(char) -> bool;

impl<F> Lexer for Pred<F>
where
    F: Fn(char) -> bool,
{
    fn lex(&self, input: &str) -> Option<usize> {
        input.chars().next().and_then(|c| {
            if (self.1)(c) {
                Some(c.len_utf8())
            } else {
                None
            }
        })
    }

    fn expected(&self) -> String {
        self.0.to_string()
    }
}

pub fn pred(description: &'static str, predicate: impl 'static + Fn(char) -> bool) -> RcLexer {
    Rc::new(Pred(description, predicate))
}

pub struct Is(char);

impl Lexer for Is {
    fn lex(&self, input: &str) -> Option<usize> {
        input.chars().next().and_then(|c| {
            if c == self.0 {
                Some(c.len_utf8())
            } else {
                None
            }
        })
    }

    fn expected(&self) -> String {
        format!("'{}'", self.0)
    }
}

pub fn is(c: char) -> RcLexer {
    Rc::new(Is(c))
}

/// A fixed string at the start of the input. No word boundary is required after it.
pub struct Exact(String);

impl Lexer for Exact {
    fn lex(&self, input: &str) -> Option<usize> {
        if input.starts_with(&self.0) {
            Some(self.0.len())
        } else {
            None
        }
    }

    fn expected(&self) -> String {
        format!("the string \"{}\"", &self.0)
    }
}

pub fn exact(string: impl AsRef<str>) -> RcLexer {
    Rc::new(Exact(string.as_ref().to_string()))
}

fn join_with_last<S: ToString>(items: impl AsRef<[S]>, sep: &str, last_sep: &str) -> String {
    let items = items.as_ref();
    let mut buf = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push_str(if i + 1 == items.len() { last_sep } else { sep });
        }
        buf.push_str(&item.to_string());
    }
    buf
}

pub struct Any;

impl Lexer for Any {
    fn lex(&self, input: &str) -> Option<usize> {
        input.chars().next().map(char::len_utf8)
    }

    fn expected(&self) -> String {
        "any character".to_string()
    }
}

pub fn any() -> RcLexer {
    Rc::new(Any)
}

pub struct Repeat {
    lexer: RcLexer,
    min: usize,
    max: Option<usize>,
}

impl Lexer for Repeat {
    fn lex(&self, input: &str) -> Option<usize> {
        let mut count = 0;
        let mut len = 0;
        while count < self.max.unwrap_or(usize::MAX) {
            match self.lexer.lex(&input[len..]) {
                // an empty match would repeat forever
                Some(0) => break,
                Some(n) => {
                    count += 1;
                    len += n;
                }
                None => break,
            }
        }
        if count >= self.min {
            Some(len)
        } else {
            None
        }
    }

    fn expected(&self) -> String {
        let quantity = match self.max {
            Some(max) => format!("between {} and {}", self.min, max),
            None => format!("at least {}", self.min),
        };
        format!("{} {}", quantity, self.lexer.expected())
    }
}

pub fn repeat(lexer: RcLexer, bounds: impl RangeBounds<usize>) -> RcLexer {
    let (min, max) = crate::get_bounds(bounds);
    Rc::new(Repeat { lexer, min, max })
}

pub fn optional(lexer: RcLexer) -> RcLexer {
    repeat(lexer, 0..=1)
}

pub fn many(lexer: RcLexer) -> RcLexer {
    repeat(lexer, ..)
}

pub struct Seq(Vec<RcLexer>);

impl Lexer for Seq {
    fn lex(&self, input: &str) -> Option<usize> {
        let mut len = 0;
        for lexer in &self.0 {
            len += lexer.lex(&input[len..])?;
        }
        Some(len)
    }

    fn expected(&self) -> String {
        self.0
            .iter()
            .map(|l| l.expected())
            .collect::<Vec<_>>()
            .join(" then ")
    }
}

pub fn seq(lexers: impl AsRef<[RcLexer]>) -> RcLexer {
    Rc::new(Seq(lexers.as_ref().into()))
}

/// Zero-width match that succeeds only where the inner lexer fails.
struct Reject(RcLexer);

impl Lexer for Reject {
    fn lex(&self, input: &str) -> Option<usize> {
        if self.0.lex(input).is_none() {
            Some(0)
        } else {
            None
        }
    }

    fn expected(&self) -> String {
        format!("anything but {}", self.0.expected())
    }
}

pub fn reject(lexer: RcLexer) -> RcLexer {
    Rc::new(Reject(lexer))
}

pub fn many_until(lexer: RcLexer, stop_before: RcLexer) -> RcLexer {
    many(seq(&[reject(stop_before), lexer]))
}

/// Ordered lexing rules. A rule producing `None` consumes its match without emitting a token.
pub type TokenMap<T> = Vec<(RcLexer, Box<dyn Fn(&str) -> T>)>;

fn rule<T>(
    lexer: RcLexer,
    to_token: impl 'static + Fn(&str) -> T,
) -> (RcLexer, Box<dyn Fn(&str) -> T>) {
    (lexer, Box::new(to_token))
}

macro_rules! token_map {
    ($($lexer:expr => $to_token:expr),* $(,)?) => {
        vec![$(
            rule($lexer, $to_token),
        )*]
    };
}

macro_rules! always {
    ($value:expr) => {
        |_: &str| $value
    };
}

fn punct(kind: TokenKind, c: char) -> Option<Token> {
    Some(Token::new(kind, c.to_string()))
}

/// A double quote, then everything up to the next double quote. Backslashes
/// are ordinary characters, and a missing closing quote runs to end of input.
fn string_lit() -> RcLexer {
    let quote = is('"');
    seq(&[
        quote.clone(),
        many_until(any(), quote.clone()),
        optional(quote),
    ])
}

fn string_lit_value(input: &str) -> Option<Token> {
    let content = &input[1..];
    let content = content.strip_suffix('"').unwrap_or(content);
    Some(Token::new(TokenKind::String, content))
}

fn number_lit() -> RcLexer {
    seq(&[
        pred("a digit", char::is_numeric),
        many(pred("a digit, comma or period", |c| {
            c.is_numeric() || c == ',' || c == '.'
        })),
    ])
}

pub fn json_token_map() -> TokenMap<Option<Token>> {
    token_map!(
        pred("whitespace", char::is_whitespace) => always!(None),
        is('{') => always!(punct(TokenKind::LeftBrace, '{')),
        is('}') => always!(punct(TokenKind::RightBrace, '}')),
        is('[') => always!(punct(TokenKind::LeftBracket, '[')),
        is(']') => always!(punct(TokenKind::RightBracket, ']')),
        is(':') => always!(punct(TokenKind::Colon, ':')),
        is(',') => always!(punct(TokenKind::Comma, ',')),
        string_lit() => string_lit_value,
        number_lit() => |s: &str| Some(Token::new(TokenKind::Number, s)),
        exact("true") => always!(Some(Token::new(TokenKind::True, "true"))),
        exact("false") => always!(Some(Token::new(TokenKind::False, "false"))),
        exact("null") => always!(Some(Token::new(TokenKind::Null, "null"))),
    )
}

/// What any rule of `token_map` would have accepted.
pub fn describe<T>(token_map: &TokenMap<T>) -> String {
    join_with_last(
        token_map
            .iter()
            .map(|(lexer, _)| lexer.expected())
            .collect::<Vec<_>>(),
        ", ",
        ", or ",
    )
}

/// Runs `token_map` over `input`, trying rules in order at each position.
///
/// Fails on the first character no rule matches; nothing scanned before it
/// is returned. Positions in errors count characters, not bytes.
pub fn get_tokens<T>(token_map: &TokenMap<Option<T>>, input: &str) -> Result<Vec<T>, LexError> {
    let mut tokens = vec![];
    let mut pos = 0;
    let mut position = 0;
    'outer: while let Some(ch) = input[pos..].chars().next() {
        for (lexer, make_token) in token_map {
            match lexer.lex(&input[pos..]) {
                Some(n) if n > 0 => {
                    let lexeme = &input[pos..pos + n];
                    tracing::trace!(position, len = n, "rule matched");
                    if let Some(token) = make_token(lexeme) {
                        tokens.push(token);
                    }
                    pos += n;
                    position += lexeme.chars().count();
                    continue 'outer;
                }
                _ => {}
            }
        }
        tracing::trace!(position, expected = %describe(token_map), "no rule matched");
        return Err(LexError::UnexpectedCharacter { ch, position });
    }
    Ok(tokens)
}

/// Tokenizes `input` with the default [`Limits`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with(input, Limits::default())
}

pub fn tokenize_with(input: &str, limits: Limits) -> Result<Vec<Token>, LexError> {
    let len = input.chars().count();
    if len > limits.max_input_chars {
        tracing::debug!(len, max = limits.max_input_chars, "input too large");
        return Err(LexError::InputTooLarge {
            len,
            max: limits.max_input_chars,
        });
    }

    match get_tokens(&json_token_map(), input) {
        Ok(tokens) => {
            tracing::debug!(chars = len, tokens = tokens.len(), "tokenized input");
            Ok(tokens)
        }
        Err(err) => {
            tracing::debug!(%err, "tokenizing failed");
            Err(err)
        }
    }
}
