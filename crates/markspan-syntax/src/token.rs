//! Token types shared by the lexer and the parser.
//!
//! The token set is closed and small. Delimiter kinds carry a [`Flank`] so the
//! parser knows whether a run may open a scope, close one, or both; everything
//! else about nesting is left to the parser.

use serde::{Deserialize, Serialize};

/// ATX header level. The discriminant is the number of `#` characters.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeaderLevel {
    H1 = 1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeaderLevel {
    /// Numeric level, `1..=6`.
    pub fn get(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for HeaderLevel {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(HeaderLevel::H1),
            2 => Ok(HeaderLevel::H2),
            3 => Ok(HeaderLevel::H3),
            4 => Ok(HeaderLevel::H4),
            5 => Ok(HeaderLevel::H5),
            6 => Ok(HeaderLevel::H6),
            other => Err(other),
        }
    }
}

impl TryFrom<usize> for HeaderLevel {
    type Error = usize;

    fn try_from(level: usize) -> Result<Self, Self::Error> {
        u8::try_from(level)
            .ok()
            .and_then(|l| HeaderLevel::try_from(l).ok())
            .ok_or(level)
    }
}

/// Which side of a delimiter run touches styled text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flank {
    /// Followed by non-whitespace only: may open a scope.
    Open,
    /// Preceded by non-whitespace only: may close a scope.
    Close,
    /// Non-whitespace on both sides: may do either.
    Both,
}

impl Flank {
    pub fn can_open(self) -> bool {
        matches!(self, Flank::Open | Flank::Both)
    }

    pub fn can_close(self) -> bool {
        matches!(self, Flank::Close | Flank::Both)
    }
}

/// Token kinds produced by [`tokenize`](crate::lexer::tokenize).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `*` or `_`
    Em(Flank),
    /// `**` or `__`
    Strong(Flank),
    /// `***` or `___`, both scopes at once
    StrongEm(Flank),
    /// Line-leading `#` run plus the whitespace after it
    Header(HeaderLevel),
    /// Destination of a link, emitted after the link text
    Url,
    /// Link tooltip, only ever directly after [`TokenKind::Url`]
    Href,
    /// Literal text
    Text,
    /// Marker-looking run that is not valid markup; rendered as text
    Unknown,
    /// The `[` of a link whose `](url)` tail was found
    LinkStart,
    /// Line-leading `>` markers, carrying the quote depth
    BlockQuote(u32),
    /// Line ending
    Newline,
}

/// A token with the source text it stands for and its 1-based line number.
///
/// For links, `text` of [`TokenKind::Url`] is the destination and `text` of
/// [`TokenKind::Href`] is the tooltip without its quotes. Both are raw source
/// text, escapes included. A backslash escape in running text starts a new
/// `Text` token with the escaped character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: u32,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, line: u32) -> Self {
        Self { kind, text, line }
    }
}
