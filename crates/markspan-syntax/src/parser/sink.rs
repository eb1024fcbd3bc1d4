//! Span assembler: replays parser events into the output buffer.

use std::cmp::Reverse;
use std::ops::Range;

use crate::parser::event::Event;
use crate::result::{Link, ParseResult, StyleKind, StyleSpan};

/// Accumulates plain text and records spans and links against it.
#[derive(Debug, Default)]
pub struct Sink {
    buffer: String,
    spans: Vec<StyleSpan>,
    links: Vec<Link>,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain-text fragment.
    pub fn text(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Record `kind` over `start..` the current buffer length.
    pub fn record_span(&mut self, kind: StyleKind, start: usize) {
        let end = self.buffer.len();
        debug_assert!(start <= end, "span {kind:?} starts past the buffer");
        self.spans.push(StyleSpan {
            start: start.min(end),
            end,
            kind,
        });
    }

    /// Record a link over `range` of the buffer.
    pub fn record_link(&mut self, range: Range<usize>, url: &str, tooltip: &str) {
        self.links.push(Link {
            url: url.to_string(),
            range,
            tooltip: tooltip.to_string(),
        });
    }

    /// Apply a single parser event.
    pub fn apply(&mut self, event: Event<'_>) {
        match event {
            Event::Text(text) => self.text(text),
            Event::CloseSpan { kind, start } => self.record_span(kind, start),
            Event::Link {
                start,
                url,
                tooltip,
            } => {
                let end = self.buffer.len();
                self.record_link(start.min(end)..end, url, tooltip);
            }
        }
    }

    /// Replay all events and produce the result.
    pub fn assemble<'a>(mut self, events: impl IntoIterator<Item = Event<'a>>) -> ParseResult {
        for event in events {
            self.apply(event);
        }
        self.finish()
    }

    /// Sort spans into nesting order and hand out the result.
    ///
    /// Spans are recorded in the order their scopes close; consumers want
    /// them by start offset with enclosing spans before enclosed ones.
    pub fn finish(mut self) -> ParseResult {
        self.spans
            .sort_by_key(|span| (span.start, Reverse(span.len())));
        ParseResult {
            plain_text: self.buffer,
            spans: self.spans,
            links: self.links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::HeaderLevel;
    use pretty_assertions::assert_eq;

    #[test]
    fn sink_builds_plain_text() {
        let result = Sink::new().assemble([Event::Text("hello"), Event::Text(" world")]);
        assert_eq!(result.plain_text, "hello world");
        assert!(result.spans.is_empty());
        assert!(result.links.is_empty());
    }

    #[test]
    fn close_uses_current_length() {
        let result = Sink::new().assemble([
            Event::Text("ab"),
            Event::Text("cd"),
            Event::close(StyleKind::Emphasis, 2),
            Event::Text("ef"),
        ]);
        assert_eq!(
            result.spans,
            vec![StyleSpan {
                start: 2,
                end: 4,
                kind: StyleKind::Emphasis
            }]
        );
    }

    #[test]
    fn spans_sorted_outer_first() {
        let result = Sink::new().assemble([
            Event::Text("abc"),
            Event::close(StyleKind::Emphasis, 0),
            Event::Text("def"),
            Event::close(StyleKind::Header(HeaderLevel::H1), 0),
        ]);
        let kinds: Vec<_> = result.spans.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![StyleKind::Header(HeaderLevel::H1), StyleKind::Emphasis]
        );
    }

    #[test]
    fn links_keep_document_order() {
        let result = Sink::new().assemble([
            Event::Text("one"),
            Event::Link {
                start: 0,
                url: "a",
                tooltip: "",
            },
            Event::Text(" two"),
            Event::Link {
                start: 4,
                url: "b",
                tooltip: "tip",
            },
        ]);
        assert_eq!(
            result.links,
            vec![
                Link {
                    url: "a".to_string(),
                    range: 0..3,
                    tooltip: String::new()
                },
                Link {
                    url: "b".to_string(),
                    range: 4..7,
                    tooltip: "tip".to_string()
                },
            ]
        );
    }
}
