//! # Parser Events
//!
//! The parser never touches the output buffer itself. It emits a flat
//! sequence of events and the [`Sink`](super::sink::Sink) replays them:
//!
//! ```text
//! "**hi** there"
//!
//! Text("hi")                              ← buffer is "hi"
//! CloseSpan { kind: Strong, start: 0 }    ← Strong over 0..2
//! Text(" there")
//! ```
//!
//! Close events carry only the start offset. The end is whatever length the
//! buffer has when the event is replayed, which is exactly the output length
//! the parser saw when it emitted the event.

use crate::result::StyleKind;

/// An event emitted by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<'a> {
    /// Append literal text to the output buffer.
    Text(&'a str),

    /// A scope ended: record `kind` over `start..` current buffer length.
    CloseSpan { kind: StyleKind, start: usize },

    /// A link's text ended: record a link over `start..` current buffer length.
    Link {
        start: usize,
        url: &'a str,
        tooltip: &'a str,
    },
}

impl<'a> Event<'a> {
    /// Create a close event for `kind` starting at `start`.
    pub fn close(kind: StyleKind, start: usize) -> Self {
        Event::CloseSpan { kind, start }
    }
}
