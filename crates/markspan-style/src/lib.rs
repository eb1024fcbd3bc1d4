//! # markspan-style
//!
//! Turns the abstract [`StyleKind`]s produced by `markspan-syntax` into
//! concrete formatting: a font, an optional color and an indent. The parser
//! never calls into this crate; a renderer pairs the two.
//!
//! ```
//! use markspan_style::{DefaultStyleResolver, StyleResolver, Stylesheet};
//!
//! let resolver = DefaultStyleResolver::new(Stylesheet::default());
//! let result = markspan_syntax::parse("# Title\n*soft*");
//!
//! let resolved = resolver.resolve_all(&result);
//! assert_eq!(resolved[0].1.font.size, 24.0);
//! assert!(resolved[1].1.font.italic);
//! ```

pub mod config;

use markspan_syntax::{HeaderLevel, ParseResult, StyleKind, StyleSpan};
use serde::{Deserialize, Serialize};

pub use config::StyleConfigError;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const DARK_GRAY: Rgb = Rgb::new(0x55, 0x55, 0x55);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Concrete formatting for one span.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattingDescriptor {
    pub font: FontSpec,
    /// `None` means the renderer's default text color.
    pub color: Option<Rgb>,
    /// Left indent in points.
    pub indent: f32,
}

impl FormattingDescriptor {
    pub fn plain(font: FontSpec) -> Self {
        Self {
            font,
            color: None,
            indent: 0.0,
        }
    }
}

/// Structural facts about a span that a resolver may need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleContext {
    pub header_level: Option<HeaderLevel>,
    pub quote_depth: u32,
}

impl From<StyleKind> for StyleContext {
    fn from(kind: StyleKind) -> Self {
        match kind {
            StyleKind::Header(level) => Self {
                header_level: Some(level),
                quote_depth: 0,
            },
            StyleKind::BlockQuote(depth) => Self {
                header_level: None,
                quote_depth: depth,
            },
            _ => Self::default(),
        }
    }
}

/// Maps a style kind to concrete formatting.
pub trait StyleResolver {
    fn resolve(&self, kind: StyleKind, ctx: &StyleContext) -> FormattingDescriptor;

    /// Resolve every span of a parse result, in result order.
    fn resolve_all(&self, result: &ParseResult) -> Vec<(StyleSpan, FormattingDescriptor)> {
        result
            .spans
            .iter()
            .map(|span| {
                let ctx = StyleContext::from(span.kind);
                (*span, self.resolve(span.kind, &ctx))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockQuoteStyle {
    pub italic: bool,
    pub color: Rgb,
    /// Indent added per nesting level, in points.
    pub indent_per_level: f32,
}

impl Default for BlockQuoteStyle {
    fn default() -> Self {
        Self {
            italic: true,
            color: Rgb::DARK_GRAY,
            indent_per_level: 20.0,
        }
    }
}

/// User-editable formatting settings, loadable from TOML.
///
/// Missing keys fall back to [`Stylesheet::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stylesheet {
    pub paragraph_font: FontSpec,
    pub bold_font_name: String,
    pub italic_font_name: String,
    pub bold_italic_font_name: String,
    /// Indexed by header level minus one.
    pub header_fonts: [FontSpec; 6],
    pub block_quote: BlockQuoteStyle,
}

const DEFAULT_HEADER_SIZES: [f32; 6] = [24.0, 20.0, 18.0, 16.0, 14.0, 12.0];

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            paragraph_font: FontSpec::new("Helvetica", 12.0),
            bold_font_name: "Helvetica-Bold".to_string(),
            italic_font_name: "Helvetica-Oblique".to_string(),
            bold_italic_font_name: "Helvetica-BoldOblique".to_string(),
            header_fonts: DEFAULT_HEADER_SIZES.map(|size| FontSpec::new("Helvetica-Bold", size).bold()),
            block_quote: BlockQuoteStyle::default(),
        }
    }
}

impl Stylesheet {
    pub fn font_for_header(&self, level: HeaderLevel) -> &FontSpec {
        &self.header_fonts[usize::from(level.get()) - 1]
    }

    pub fn set_font_for_header(&mut self, level: HeaderLevel, font: FontSpec) {
        self.header_fonts[usize::from(level.get()) - 1] = font;
    }

    /// The paragraph font with `family` swapped in.
    fn paragraph_variant(&self, family: &str) -> FontSpec {
        FontSpec {
            family: family.to_string(),
            ..self.paragraph_font.clone()
        }
    }
}

/// Resolver backed by a [`Stylesheet`].
#[derive(Debug, Clone, Default)]
pub struct DefaultStyleResolver {
    stylesheet: Stylesheet,
}

impl DefaultStyleResolver {
    pub fn new(stylesheet: Stylesheet) -> Self {
        Self { stylesheet }
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }
}

impl StyleResolver for DefaultStyleResolver {
    fn resolve(&self, kind: StyleKind, ctx: &StyleContext) -> FormattingDescriptor {
        let sheet = &self.stylesheet;
        match kind {
            StyleKind::Emphasis => {
                FormattingDescriptor::plain(sheet.paragraph_variant(&sheet.italic_font_name).italic())
            }
            StyleKind::Strong => {
                FormattingDescriptor::plain(sheet.paragraph_variant(&sheet.bold_font_name).bold())
            }
            StyleKind::StrongEmphasis => FormattingDescriptor::plain(
                sheet
                    .paragraph_variant(&sheet.bold_italic_font_name)
                    .bold()
                    .italic(),
            ),
            StyleKind::Header(level) => {
                let level = ctx.header_level.unwrap_or(level);
                FormattingDescriptor::plain(sheet.font_for_header(level).clone())
            }
            StyleKind::BlockQuote(depth) => {
                let depth = depth.max(ctx.quote_depth);
                let quote = &sheet.block_quote;
                let font = if quote.italic {
                    sheet.paragraph_variant(&sheet.italic_font_name).italic()
                } else {
                    sheet.paragraph_font.clone()
                };
                FormattingDescriptor {
                    font,
                    color: Some(quote.color),
                    indent: quote.indent_per_level * depth as f32,
                }
            }
        }
    }
}
