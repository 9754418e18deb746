#![forbid(unsafe_code)]

//! Per-cell sizing.
//!
//! Every cell shares one row height, the *effective item height*: the
//! explicit override when one is configured, otherwise the font's line height
//! plus [`ITEM_VERTICAL_PADDING`]. Widths depend on the cell kind:
//!
//! | Cell       | Width                                                      |
//! |------------|------------------------------------------------------------|
//! | Label      | intrinsic text width                                       |
//! | Text field | configured minimum (stretched later by the flow engine)    |
//! | Token      | custom width, or padding + text width clamped to available |

use tokenfield_core::{Font, Size};

use crate::cell::CellDescriptor;

/// Vertical padding added to the font line height when no item height
/// override is set.
pub const ITEM_VERTICAL_PADDING: f32 = 12.0;

/// Horizontal padding (both sides together) around a default token title.
pub const TOKEN_HORIZONTAL_PADDING: f32 = 16.0;

/// Default minimum width of the text field cell.
pub const DEFAULT_TEXT_FIELD_MIN_WIDTH: f32 = 60.0;

/// Effective item height for `font` and an optional override.
#[inline]
pub fn effective_item_height(font: &Font, custom_item_height: Option<f32>) -> f32 {
    custom_item_height.unwrap_or(font.line_height + ITEM_VERTICAL_PADDING)
}

/// Computes cell sizes for one layout pass.
#[derive(Debug, Clone, Copy)]
pub struct CellSizer<'a> {
    font: &'a Font,
    item_height: f32,
    text_field_min_width: f32,
}

impl<'a> CellSizer<'a> {
    /// Create a sizer for the given presentation state.
    pub fn new(font: &'a Font, custom_item_height: Option<f32>, text_field_min_width: f32) -> Self {
        Self {
            font,
            item_height: effective_item_height(font, custom_item_height),
            text_field_min_width,
        }
    }

    /// Font used for measurement.
    pub fn font(&self) -> &Font {
        self.font
    }

    /// Height shared by every cell.
    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    /// Intrinsic label size.
    pub fn label_size(&self, text: &str) -> Size {
        Size::new(self.font.text_width(text), self.item_height)
    }

    /// Minimum text field size. The flow engine may widen it.
    pub fn text_field_min_size(&self) -> Size {
        Size::new(self.text_field_min_width, self.item_height)
    }

    /// Default token size: padded title width, never wider than
    /// `available_width`.
    pub fn default_token_size(&self, title: &str, available_width: f32) -> Size {
        let natural = TOKEN_HORIZONTAL_PADDING + self.font.text_width(title);
        Size::new(natural, self.item_height).clamp_width(available_width)
    }

    /// Token size when a custom cell provider supplies the width.
    pub fn custom_token_size(&self, width: f32) -> Size {
        Size::new(width.max(0.0), self.item_height)
    }

    /// Size of any cell.
    pub fn size(&self, cell: &CellDescriptor<'_>, available_width: f32) -> Size {
        match *cell {
            CellDescriptor::Label { text } => self.label_size(text),
            CellDescriptor::TextField => self.text_field_min_size(),
            CellDescriptor::Token {
                custom_width: Some(width),
                ..
            } => self.custom_token_size(width),
            CellDescriptor::Token {
                title,
                custom_width: None,
            } => self.default_token_size(title, available_width),
        }
    }
}
