#![forbid(unsafe_code)]

//! Font metrics and text measurement.
//!
//! The token field never rasterizes glyphs; it only needs to know how wide a
//! piece of text is and how tall a line is. [`Font`] approximates a
//! proportional font with a per-column advance applied to the Unicode display
//! width of each grapheme cluster, so wide (CJK, emoji) clusters take two
//! columns and combining marks take none.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::geometry::Size;

/// Default point size used when no font is configured.
pub const DEFAULT_POINT_SIZE: f32 = 15.0;

/// Line height as a multiple of point size.
const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Advance of a single display column as a multiple of point size.
const ADVANCE_RATIO: f32 = 0.5;

/// Font used for the label, token titles and the text field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Font {
    /// Family name, passed through to the host for rendering.
    pub family: Option<String>,
    /// Point size.
    pub point_size: f32,
    /// Height of one line of text.
    pub line_height: f32,
    /// Horizontal advance of one display column.
    pub advance: f32,
}

impl Font {
    /// The platform default font at the given point size.
    pub fn system(point_size: f32) -> Self {
        Self {
            family: None,
            point_size,
            line_height: point_size * LINE_HEIGHT_RATIO,
            advance: point_size * ADVANCE_RATIO,
        }
    }

    /// A named font family at the given point size.
    pub fn named(family: impl Into<String>, point_size: f32) -> Self {
        Self {
            family: Some(family.into()),
            ..Self::system(point_size)
        }
    }

    /// Override the line height (builder).
    #[must_use]
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// Override the per-column advance (builder).
    #[must_use]
    pub fn with_advance(mut self, advance: f32) -> Self {
        self.advance = advance;
        self
    }

    /// Display width of `text` in columns.
    pub fn columns(text: &str) -> usize {
        text.graphemes(true).map(UnicodeWidthStr::width).sum()
    }

    /// Width of `text` rendered in this font.
    pub fn text_width(&self, text: &str) -> f32 {
        Self::columns(text) as f32 * self.advance
    }

    /// Intrinsic single-line size of `text` rendered in this font.
    pub fn measure(&self, text: &str) -> Size {
        Size::new(self.text_width(text), self.line_height)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(DEFAULT_POINT_SIZE)
    }
}
