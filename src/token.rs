use std::fmt;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// Raw content between double quotes
    String,
    /// Digits, commas and periods
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
}

impl TokenKind {
    /// Kinds that can stand on their own as a leaf value.
    pub fn is_literal(self) -> bool {
        self.scalar_kind().is_some()
    }

    pub fn scalar_kind(self) -> Option<ScalarKind> {
        match self {
            TokenKind::String => Some(ScalarKind::String),
            TokenKind::Number => Some(ScalarKind::Number),
            TokenKind::True => Some(ScalarKind::True),
            TokenKind::False => Some(ScalarKind::False),
            TokenKind::Null => Some(ScalarKind::Null),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::LeftBrace => "left-brace",
            TokenKind::RightBrace => "right-brace",
            TokenKind::LeftBracket => "left-bracket",
            TokenKind::RightBracket => "right-bracket",
            TokenKind::Colon => "colon",
            TokenKind::Comma => "comma",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
        })
    }
}

/// The token kinds a [`Scalar`](crate::Scalar) can carry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ScalarKind {
    String,
    Number,
    True,
    False,
    Null,
}

impl ScalarKind {
    /// Whether `text` is a lexeme the tokenizer could have produced for this kind.
    pub fn accepts(self, text: &str) -> bool {
        match self {
            ScalarKind::String => !text.contains('"'),
            ScalarKind::Number => {
                let mut chars = text.chars();
                chars.next().map_or(false, char::is_numeric)
                    && chars.all(|c| c.is_numeric() || c == ',' || c == '.')
            }
            ScalarKind::True => text == "true",
            ScalarKind::False => text == "false",
            ScalarKind::Null => text == "null",
        }
    }
}

impl From<ScalarKind> for TokenKind {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::String => TokenKind::String,
            ScalarKind::Number => TokenKind::Number,
            ScalarKind::True => TokenKind::True,
            ScalarKind::False => TokenKind::False,
            ScalarKind::Null => TokenKind::Null,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TokenKind::from(*self).fmt(f)
    }
}

/// A classified lexical unit. Tokens carry no position information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The literal text. For strings this excludes the surrounding quotes.
    pub fn text(&self) -> &str {
        &self.text
    }
}
