//! # Lexer - Tokenizing Markdown Source
//!
//! Lexing happens in two stages:
//!
//! 1. [`lex_raw`] runs the [Logos] generated [`RawKind`] lexer over the input.
//!    Raw tokens are context-free: a `*` run is just a `Stars` token whether it
//!    opens emphasis or sits between two spaces.
//! 2. [`tokenize`] walks the raw tokens line by line and "cooks" them into
//!    [`Token`]s. This is where line position (headers, block quotes), delimiter
//!    flanking and link shape are decided.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ```
//! use markspan_syntax::lexer::tokenize;
//! use markspan_syntax::token::{HeaderLevel, TokenKind};
//!
//! let tokens = tokenize("## Hello\n");
//! assert_eq!(tokens[0].kind, TokenKind::Header(HeaderLevel::H2));
//! assert_eq!(tokens[1].text, "Hello");
//! assert_eq!(tokens[2].kind, TokenKind::Newline);
//! ```
//!
//! ## Degradation
//!
//! The lexer never fails. Anything Logos does not recognise, and any marker
//! that turns out not to be markup, ends up in a `Text` or `Unknown` token.

use std::ops::Range;

use logos::Logos;

use crate::token::{Flank, HeaderLevel, Token, TokenKind};

/// Maximum number of `#` characters in an ATX header marker.
const MAX_HEADER_LEVEL: usize = 6;

/// Raw, context-free token kinds produced by Logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// Horizontal whitespace (spaces, tabs)
    #[regex(r"[ \t]+")]
    Whitespace,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    /// Run of `*`
    #[regex(r"\*+")]
    Stars,

    /// Run of `_`
    #[regex(r"_+")]
    Underscores,

    /// Run of `#`
    #[regex(r"#+")]
    Hashes,

    /// `>` for block quotes
    #[token(">")]
    Gt,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    /// `"` around link tooltips
    #[token("\"")]
    Quote,

    /// Backslash followed by escapable punctuation
    #[regex(r#"\\[\\`*_#>\[\]()"]"#)]
    Escape,

    /// Anything without special meaning
    #[regex(r#"[^\s*_#>\[\]()"\\]+"#)]
    Text,
}

/// Lex the input into raw tokens with their byte spans.
///
/// Every byte of the input is covered by exactly one span. Input Logos cannot
/// match is reported as [`RawKind::Text`].
pub fn lex_raw(input: &str) -> Vec<(RawKind, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = RawKind::lexer(input);

    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(RawKind::Text);
        tokens.push((kind, lexer.span()));
    }

    tokens
}

/// Tokenize markdown source into cooked [`Token`]s.
///
/// Each call builds its own state, so this is safe to call from several
/// threads at once.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Cooker::new(source).run()
}

/// Shape of a link tail `](url "tooltip")`, as raw token indices/spans.
struct LinkTail {
    /// Index of the closing `]`
    close: usize,
    url: Range<usize>,
    tooltip: Option<Range<usize>>,
    /// Index just past the closing `)`
    after: usize,
}

/// Link-shape lookups for one line, built in a single pass so that finding a
/// link tail never rescans the line.
#[derive(Debug, Default)]
struct LineIndex {
    /// Raw index of the first token of the line.
    base: usize,
    /// For each `[`, the raw index of its matching `]`.
    closing: Vec<Option<usize>>,
    /// First raw index at or after each position that ends a URL.
    url_stop: Vec<usize>,
    /// First raw index at or after each position holding a `"`.
    next_quote: Vec<usize>,
}

impl LineIndex {
    fn new(raw: &[(RawKind, Range<usize>)], start: usize, end: usize) -> Self {
        let len = end - start;
        let mut closing = vec![None; len];
        let mut open = Vec::new();
        for i in start..end {
            match raw[i].0 {
                RawKind::LBracket => open.push(i),
                RawKind::RBracket => {
                    if let Some(o) = open.pop() {
                        closing[o - start] = Some(i);
                    }
                }
                _ => {}
            }
        }

        let mut url_stop = vec![end; len];
        let mut next_quote = vec![end; len];
        let (mut stop, mut quote) = (end, end);
        for i in (start..end).rev() {
            match raw[i].0 {
                RawKind::Quote => {
                    stop = i;
                    quote = i;
                }
                RawKind::Whitespace | RawKind::RParen => stop = i,
                _ => {}
            }
            url_stop[i - start] = stop;
            next_quote[i - start] = quote;
        }

        Self {
            base: start,
            closing,
            url_stop,
            next_quote,
        }
    }

    fn closing(&self, open: usize) -> Option<usize> {
        self.closing.get(open - self.base).copied().flatten()
    }

    fn url_stop(&self, i: usize) -> Option<usize> {
        self.url_stop.get(i - self.base).copied()
    }

    fn next_quote(&self, i: usize) -> Option<usize> {
        self.next_quote.get(i - self.base).copied()
    }
}

/// Turns raw tokens into cooked tokens.
struct Cooker<'a> {
    source: &'a str,
    raw: Vec<(RawKind, Range<usize>)>,
    out: Vec<Token<'a>>,
    /// Text not yet pushed, kept so adjacent fragments become one token.
    pending_text: Option<Range<usize>>,
    line: u32,
    index: LineIndex,
}

impl<'a> Cooker<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            raw: lex_raw(source),
            out: Vec::new(),
            pending_text: None,
            line: 1,
            index: LineIndex::default(),
        }
    }

    fn run(mut self) -> Vec<Token<'a>> {
        let mut i = 0;
        while i < self.raw.len() {
            i = self.line_at(i);
        }
        self.flush_text();
        self.out
    }

    fn kind(&self, i: usize) -> Option<RawKind> {
        self.raw.get(i).map(|(kind, _)| *kind)
    }

    fn span(&self, i: usize) -> Range<usize> {
        self.raw[i].1.clone()
    }

    fn push(&mut self, kind: TokenKind, span: Range<usize>) {
        self.flush_text();
        let source = self.source;
        self.out.push(Token::new(kind, &source[span], self.line));
    }

    fn text(&mut self, span: Range<usize>) {
        match &mut self.pending_text {
            Some(pending) if pending.end == span.start => pending.end = span.end,
            _ => {
                self.flush_text();
                self.pending_text = Some(span);
            }
        }
    }

    fn flush_text(&mut self) {
        if let Some(span) = self.pending_text.take() {
            let source = self.source;
            self.out
                .push(Token::new(TokenKind::Text, &source[span], self.line));
        }
    }

    /// Cook one line starting at raw index `start`; returns the index of the
    /// first raw token of the next line.
    fn line_at(&mut self, start: usize) -> usize {
        let end = (start..self.raw.len())
            .find(|&i| self.kind(i) == Some(RawKind::Newline))
            .unwrap_or(self.raw.len());

        let mut i = start;
        if !self.is_blank(i, end) {
            self.index = LineIndex::new(&self.raw, start, end);
            i = self.block_quote_prefix(i, end);
            i = self.header_prefix(i, end);
            self.inline(i, end, false);
        }

        if end < self.raw.len() {
            let span = self.span(end);
            self.push(TokenKind::Newline, span);
            self.line += 1;
            end + 1
        } else {
            end
        }
    }

    fn is_blank(&self, start: usize, end: usize) -> bool {
        (start..end).all(|i| self.kind(i) == Some(RawKind::Whitespace))
    }

    /// Consume leading `>` markers, each optionally followed by whitespace.
    fn block_quote_prefix(&mut self, start: usize, end: usize) -> usize {
        let mut i = start;
        let mut depth = 0u32;
        while i < end && self.kind(i) == Some(RawKind::Gt) {
            depth += 1;
            i += 1;
            if i < end && self.kind(i) == Some(RawKind::Whitespace) {
                i += 1;
            }
        }

        if depth > 0 {
            let span = self.span(start).start..self.span(i - 1).end;
            self.push(TokenKind::BlockQuote(depth), span);
        }
        i
    }

    /// Consume a `#` run followed by whitespace at the start of the line.
    fn header_prefix(&mut self, start: usize, end: usize) -> usize {
        if start + 1 >= end
            || self.kind(start) != Some(RawKind::Hashes)
            || self.kind(start + 1) != Some(RawKind::Whitespace)
        {
            return start;
        }

        let hashes = self.span(start);
        match HeaderLevel::try_from(hashes.len()) {
            Ok(level) => {
                let span = hashes.start..self.span(start + 1).end;
                self.push(TokenKind::Header(level), span);
                start + 2
            }
            Err(count) => {
                debug_assert!(count > MAX_HEADER_LEVEL);
                self.push(TokenKind::Unknown, hashes);
                start + 1
            }
        }
    }

    /// Cook inline content in raw range `start..end`.
    fn inline(&mut self, start: usize, end: usize, in_link: bool) {
        let mut i = start;
        while i < end {
            let (kind, span) = self.raw[i].clone();
            match kind {
                RawKind::Stars | RawKind::Underscores => self.delimiter(span),
                RawKind::Escape => {
                    // The backslash is dropped, so the escaped character
                    // cannot join the text before it, only the text after.
                    self.flush_text();
                    self.text(span.start + 1..span.end);
                }
                RawKind::LBracket if !in_link => {
                    if let Some(tail) = self.link_tail(i, end) {
                        self.push(TokenKind::LinkStart, span);
                        self.inline(i + 1, tail.close, true);
                        self.push(TokenKind::Url, tail.url);
                        if let Some(tooltip) = tail.tooltip {
                            self.push(TokenKind::Href, tooltip);
                        }
                        i = tail.after;
                        continue;
                    }
                    log::trace!("line {}: `[` without link tail kept as text", self.line);
                    self.text(span);
                }
                _ => self.text(span),
            }
            i += 1;
        }
    }

    /// Classify a `*`/`_` run by length and flanking.
    fn delimiter(&mut self, span: Range<usize>) {
        let before = self.source[..span.start].chars().next_back();
        let after = self.source[span.end..].chars().next();
        let marker = self.source[span.start..].chars().next();

        let opens = after.is_some_and(|c| !c.is_whitespace());
        let closes = before.is_some_and(|c| !c.is_whitespace());
        let intraword = marker == Some('_')
            && before.is_some_and(char::is_alphanumeric)
            && after.is_some_and(char::is_alphanumeric);

        let flank = match (opens, closes) {
            _ if intraword => None,
            (true, true) => Some(Flank::Both),
            (true, false) => Some(Flank::Open),
            (false, true) => Some(Flank::Close),
            (false, false) => None,
        };

        let Some(flank) = flank else {
            self.text(span);
            return;
        };

        let kind = match span.len() {
            1 => TokenKind::Em(flank),
            2 => TokenKind::Strong(flank),
            3 => TokenKind::StrongEm(flank),
            _ => TokenKind::Unknown,
        };
        self.push(kind, span);
    }

    /// Look for `](url)` or `](url "tooltip")` after the `[` at `open`,
    /// without crossing `end`.
    ///
    /// The destination and tooltip are raw source text; escapes inside them
    /// are kept as written.
    fn link_tail(&self, open: usize, end: usize) -> Option<LinkTail> {
        let close = self.index.closing(open).filter(|&close| close < end)?;

        let mut i = close + 1;
        if i >= end || self.kind(i) != Some(RawKind::LParen) {
            return None;
        }
        i += 1;

        let url_start = i;
        i = self.index.url_stop(i).unwrap_or(end).min(end);
        if i == url_start {
            return None;
        }
        let url = self.span(url_start).start..self.span(i - 1).end;

        i = self.skip_whitespace(i, end);
        let mut tooltip = None;
        if i < end && self.kind(i) == Some(RawKind::Quote) {
            let tip_end = self.index.next_quote(i + 1).filter(|&k| k < end)?;
            let from = self.span(i).end;
            let to = self.span(tip_end).start;
            tooltip = Some(from..to);
            i = self.skip_whitespace(tip_end + 1, end);
        }

        if i < end && self.kind(i) == Some(RawKind::RParen) {
            Some(LinkTail {
                close,
                url,
                tooltip,
                after: i + 1,
            })
        } else {
            None
        }
    }

    fn skip_whitespace(&self, mut i: usize, end: usize) -> usize {
        while i < end && self.kind(i) == Some(RawKind::Whitespace) {
            i += 1;
        }
        i
    }
}
