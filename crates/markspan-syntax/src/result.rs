//! Output types: style spans, links and the parse result that owns them.
//!
//! All offsets are UTF-8 byte offsets into [`ParseResult::plain_text`], never
//! into the markdown source.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::token::HeaderLevel;

/// The visual style a span describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleKind {
    Emphasis,
    Strong,
    StrongEmphasis,
    Header(HeaderLevel),
    /// Quote depth, always at least 1
    BlockQuote(u32),
}

impl StyleKind {
    /// True for the inline kinds produced by `*`/`_` delimiters.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            StyleKind::Emphasis | StyleKind::Strong | StyleKind::StrongEmphasis
        )
    }
}

/// A style applied to `start..end` of the plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleSpan {
    pub start: usize,
    pub end: usize,
    pub kind: StyleKind,
}

impl StyleSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A hyperlink over a range of the plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub range: Range<usize>,
    /// Empty when the markdown gave no tooltip.
    pub tooltip: String,
}

/// Plain text with its style spans and links.
///
/// Spans are ordered by start offset, longer spans first when two start at the
/// same offset. Links are in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseResult {
    pub plain_text: String,
    pub spans: Vec<StyleSpan>,
    pub links: Vec<Link>,
}

impl ParseResult {
    /// Text covered by `range`, or `None` if the range is out of bounds.
    pub fn text_of(&self, range: Range<usize>) -> Option<&str> {
        self.plain_text.get(range)
    }

    /// Spans matching `pred`, in result order.
    pub fn spans_where(
        &self,
        pred: impl Fn(StyleKind) -> bool,
    ) -> impl Iterator<Item = &StyleSpan> {
        self.spans.iter().filter(move |span| pred(span.kind))
    }

    /// Spans covering the byte at `offset`, outermost first.
    pub fn spans_at(&self, offset: usize) -> impl Iterator<Item = &StyleSpan> {
        self.spans
            .iter()
            .filter(move |span| span.start <= offset && offset < span.end)
    }

    /// The link whose text covers the byte at `offset`.
    pub fn link_at(&self, offset: usize) -> Option<&Link> {
        self.links.iter().find(|link| link.range.contains(&offset))
    }
}
