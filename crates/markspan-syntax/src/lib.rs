//! # markspan-syntax
//!
//! Turns a markdown document into plain text plus the style spans and links a
//! text renderer needs, without exposing any markdown syntax to the renderer.
//!
//! ## Architecture Overview
//!
//! The pipeline has three stages:
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → ParseResult
//!               (Logos)          (scope state)    (span assembler)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Logos splits the source into raw tokens, which are then cooked into
//! [`Token`]s: delimiter runs with their flanking, line-leading headers and
//! block-quote markers, link openers and destinations, and text.
//!
//! ```text
//! "## Hi *there*" → [Header(H2), Text("Hi "), Em(Open), Text("there"), Em(Close)]
//! ```
//!
//! ### 2. Parser ([`parser`] module)
//!
//! The parser folds tokens into events while tracking which scopes are open
//! and how long the output text is so far.
//!
//! ```text
//! Tokens → Events: [Text("Hi "), Text("there"), CloseSpan(Emphasis, 3),
//!                   CloseSpan(Header(H2), 0)]
//! ```
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! The sink replays events into the output buffer, records spans at buffer
//! offsets and sorts them into nesting order.
//!
//! ## Quick Start
//!
//! ```
//! use markspan_syntax::{parse, HeaderLevel, StyleKind};
//!
//! let result = parse("### Title\nBody with [a link](https://example.com \"tip\")");
//!
//! assert_eq!(result.plain_text, "Title\nBody with a link");
//! assert_eq!(result.spans[0].kind, StyleKind::Header(HeaderLevel::H3));
//! assert_eq!(result.text_of(result.spans[0].range()), Some("Title"));
//!
//! let link = &result.links[0];
//! assert_eq!(link.url, "https://example.com");
//! assert_eq!(link.tooltip, "tip");
//! assert_eq!(result.text_of(link.range.clone()), Some("a link"));
//! ```
//!
//! ## Guarantees
//!
//! - **Total**: every string parses; malformed markup degrades to text.
//! - **Deterministic**: the same input always gives an equal [`ParseResult`].
//! - **No shared state**: each call owns its state, so documents can be
//!   parsed on different threads at once.

pub mod lexer;
pub mod parser;
pub mod result;
pub mod token;

pub use lexer::tokenize;
pub use parser::parse;
pub use result::{Link, ParseResult, StyleKind, StyleSpan};
pub use token::{Flank, HeaderLevel, Token, TokenKind};
