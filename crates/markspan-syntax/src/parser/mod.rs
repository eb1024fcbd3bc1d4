//! # Parser - Folding Tokens into Plain Text and Spans
//!
//! The parser walks the token stream once, keeping a small `ParseState`
//! record of every open scope, and emits [`Event`]s that the [`Sink`] replays
//! into the final [`ParseResult`].
//!
//! ## Two Coordinate Spaces
//!
//! Tokens point into the markdown source; spans point into the output text.
//! The parser carries the output length forward itself (`out_len`) as it emits
//! text, so every scope records its start in output coordinates at the moment
//! it opens. Nothing is ever mapped back from one space to the other.
//!
//! ## Scopes
//!
//! | Scope | Opens at | Closes at |
//! |-------|----------|-----------|
//! | Emphasis / Strong | delimiter that can open | matching delimiter, end of paragraph, end of link text |
//! | Header | `Header` token | end of line |
//! | Block quote line | `BlockQuote` token or continuation line | end of line |
//! | Link | `LinkStart` | `Url` |
//!
//! Emphasis and Strong are independent toggles. Whenever the set of open
//! toggles changes, the run of text since the previous change is closed as a
//! span of the old set's kind: `{Em}` is Emphasis, `{Strong}` is Strong and
//! both together are StrongEmphasis. Every inline span therefore has exactly
//! one kind and spans of different inline kinds never overlap.
//!
//! ```
//! use markspan_syntax::{parse, StyleKind};
//!
//! let result = parse("**bold *and italic* end**");
//! assert_eq!(result.plain_text, "bold and italic end");
//!
//! let kinds: Vec<_> = result.spans.iter().map(|s| s.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [StyleKind::Strong, StyleKind::StrongEmphasis, StyleKind::Strong]
//! );
//! ```
//!
//! ## Error Tolerance
//!
//! Parsing is total. Delimiters that can neither open nor close are emitted as
//! text, unclosed scopes close at the end of their paragraph, and stray link
//! tokens are emitted literally.

pub mod event;
pub mod sink;

use log::trace;

use crate::lexer::tokenize;
use crate::result::{ParseResult, StyleKind};
use crate::token::{Flank, HeaderLevel, Token, TokenKind};
use event::Event;
use sink::Sink;

/// Inline toggle styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Emphasis,
    Strong,
}

impl Style {
    /// Marker characters this style takes out of a delimiter run.
    fn width(self) -> usize {
        match self {
            Style::Emphasis => 1,
            Style::Strong => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenScope {
    style: Style,
    marker: char,
    /// Output offset the scope opened at.
    start: usize,
    /// Open order, used to find scopes opened inside link text.
    seq: usize,
}

#[derive(Debug, Clone, Copy)]
struct PendingLink {
    start: usize,
    first_inner_seq: usize,
}

/// Everything the parser knows about open scopes.
#[derive(Debug, Default)]
struct ParseState {
    /// Open inline scopes in open order. At most one of each style outside
    /// link text; link text may reopen a style already open around it.
    scopes: Vec<OpenScope>,
    opened: usize,
    /// Start of the current run of unchanged inline styling.
    segment_start: usize,
    header: Option<(HeaderLevel, usize)>,
    quote_depth: u32,
    quote_line_start: Option<usize>,
    link: Option<PendingLink>,
    out_len: usize,
}

impl ParseState {
    /// Open-order number of the first scope a delimiter may touch. Inside
    /// link text, scopes opened before the link are out of reach.
    fn floor(&self) -> usize {
        self.link.map_or(0, |link| link.first_inner_seq)
    }

    /// Innermost scope of `style` a delimiter at this point may close.
    fn scope(&self, style: Style) -> Option<&OpenScope> {
        let floor = self.floor();
        self.scopes
            .iter()
            .rev()
            .find(|scope| scope.style == style && scope.seq >= floor)
    }

    fn is_open(&self, style: Style) -> bool {
        self.scopes.iter().any(|scope| scope.style == style)
    }

    fn segment_kind(&self) -> Option<StyleKind> {
        let em = self.is_open(Style::Emphasis);
        let strong = self.is_open(Style::Strong);
        match (em, strong) {
            (true, true) => Some(StyleKind::StrongEmphasis),
            (true, false) => Some(StyleKind::Emphasis),
            (false, true) => Some(StyleKind::Strong),
            (false, false) => None,
        }
    }

    /// End the current segment. Must run before the open set changes.
    fn cut_segment(&mut self, events: &mut Vec<Event<'_>>) {
        if let Some(kind) = self.segment_kind() {
            if self.out_len > self.segment_start {
                events.push(Event::close(kind, self.segment_start));
            }
        }
        self.segment_start = self.out_len;
    }

    fn open(&mut self, style: Style, marker: char) {
        self.scopes.push(OpenScope {
            style,
            marker,
            start: self.out_len,
            seq: self.opened,
        });
        self.opened += 1;
    }
}

/// The parser state machine.
///
/// Holds the token stream, the current position, the scope record and the
/// events emitted so far.
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    state: ParseState,
    events: Vec<Event<'input>>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            state: ParseState::default(),
            events: Vec::new(),
        }
    }

    /// Parse the tokens into plain text, spans and links.
    pub fn parse(mut self) -> ParseResult {
        while let Some(token) = self.bump() {
            self.token(token);
        }
        self.end_line(true);
        Sink::new().assemble(self.events)
    }

    /// Kind of the next unconsumed token.
    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn bump(&mut self) -> Option<&'t Token<'input>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn text(&mut self, text: &'input str) {
        if text.is_empty() {
            return;
        }
        self.events.push(Event::Text(text));
        self.state.out_len += text.len();
    }

    fn token(&mut self, token: &'t Token<'input>) {
        match token.kind {
            TokenKind::Text | TokenKind::Unknown | TokenKind::Href => self.text(token.text),
            TokenKind::Em(flank) => self.delimiter(token, flank, &[Style::Emphasis]),
            TokenKind::Strong(flank) => self.delimiter(token, flank, &[Style::Strong]),
            TokenKind::StrongEm(flank) => {
                self.delimiter(token, flank, &[Style::Emphasis, Style::Strong])
            }
            TokenKind::Header(level) => {
                if self.state.header.is_some() {
                    self.text(token.text);
                } else {
                    self.state.header = Some((level, self.state.out_len));
                }
            }
            TokenKind::BlockQuote(depth) => {
                self.state.quote_depth = depth;
                self.state.quote_line_start = Some(self.state.out_len);
            }
            TokenKind::LinkStart => self.link_start(token),
            TokenKind::Url => self.link_end(token),
            TokenKind::Newline => self.newline(token),
        }
    }

    /// Open, close or pass through a `*`/`_` run.
    ///
    /// Each style in `styles` takes its share of the run. A share that can
    /// neither close a matching scope nor open a new one is emitted as text.
    fn delimiter(&mut self, token: &Token<'input>, flank: Flank, styles: &[Style]) {
        let marker = token.text.chars().next().unwrap_or('*');
        let mut closing = Vec::new();
        let mut opening = Vec::new();
        let mut literal = 0;

        for &style in styles {
            match self.state.scope(style) {
                Some(scope) if flank.can_close() && scope.marker == marker => {
                    closing.push(scope.seq)
                }
                None if flank.can_open() => opening.push(style),
                _ => literal += style.width(),
            }
        }

        if closing.is_empty() && opening.is_empty() {
            trace!("line {}: delimiter {:?} kept as text", token.line, token.text);
            self.text(token.text);
            return;
        }

        self.state.cut_segment(&mut self.events);
        self.state.scopes.retain(|scope| !closing.contains(&scope.seq));
        for style in opening {
            self.state.open(style, marker);
        }
        if literal > 0 {
            let run = token.text;
            self.text(&run[..literal.min(run.len())]);
        }
    }

    /// Close every open inline scope at the current offset.
    fn close_scopes(&mut self) {
        if self.state.scopes.is_empty() {
            return;
        }
        for scope in &self.state.scopes {
            trace!(
                "auto-closing {:?} opened at {} at offset {}",
                scope.style, scope.start, self.state.out_len
            );
        }
        self.state.cut_segment(&mut self.events);
        self.state.scopes.clear();
    }

    fn link_start(&mut self, token: &Token<'input>) {
        if self.state.link.is_some() {
            self.text(token.text);
            return;
        }
        self.state.link = Some(PendingLink {
            start: self.state.out_len,
            first_inner_seq: self.state.opened,
        });
    }

    fn link_end(&mut self, token: &Token<'input>) {
        let Some(link) = self.state.link.take() else {
            self.text(token.text);
            return;
        };

        let inner_open = self
            .state
            .scopes
            .iter()
            .any(|scope| scope.seq >= link.first_inner_seq);
        if inner_open {
            trace!("line {}: closing scopes left open in link text", token.line);
            self.state.cut_segment(&mut self.events);
            self.state
                .scopes
                .retain(|scope| scope.seq < link.first_inner_seq);
        }

        let tooltip = if self.at(TokenKind::Href) {
            self.bump().map(|t| t.text).unwrap_or_default()
        } else {
            ""
        };

        self.events.push(Event::Link {
            start: link.start,
            url: token.text,
            tooltip,
        });
    }

    fn newline(&mut self, token: &Token<'input>) {
        // A blank line or a header ends the paragraph.
        let paragraph_end = matches!(
            self.peek(),
            None | Some(TokenKind::Newline) | Some(TokenKind::Header(_))
        );
        self.end_line(paragraph_end);
        self.text(token.text);

        if self.state.quote_depth > 0 {
            self.state.quote_line_start = Some(self.state.out_len);
        }
    }

    /// Close line-bound scopes; with `paragraph_end` also inline scopes and
    /// the block quote.
    fn end_line(&mut self, paragraph_end: bool) {
        if let Some((level, start)) = self.state.header.take() {
            self.close_scopes();
            self.events.push(Event::close(StyleKind::Header(level), start));
        }
        if paragraph_end {
            self.close_scopes();
        }
        if self.state.link.take().is_some() {
            trace!("link text ended without a destination");
        }
        if let Some(start) = self.state.quote_line_start.take() {
            if self.state.quote_depth > 0 {
                self.events
                    .push(Event::close(StyleKind::BlockQuote(self.state.quote_depth), start));
            }
        }
        if paragraph_end {
            self.state.quote_depth = 0;
        }
    }
}

/// Parse markdown source into plain text, style spans and links.
pub fn parse(source: &str) -> ParseResult {
    let tokens = tokenize(source);
    Parser::new(&tokens).parse()
}
