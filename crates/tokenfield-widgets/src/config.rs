#![forbid(unsafe_code)]

//! Token field configuration.
//!
//! [`TokenFieldConfig`] collects every presentation setting in one value so a
//! field can be built from a file or a test fixture in one step. The
//! equivalent runtime setters on [`TokenField`](crate::TokenField) never fail;
//! they clamp bad values with [`sanitize_length`] instead.

use std::fmt;

use tokenfield_core::{Font, Insets};
use tokenfield_layout::DEFAULT_TEXT_FIELD_MIN_WIDTH;

/// Default content insets around the wrapped cells.
pub const DEFAULT_CONTENT_INSETS: Insets = Insets::symmetric(4.0, 8.0);

/// Kind of submit key shown while editing the text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReturnKey {
    #[default]
    Default,
    Go,
    Next,
    Done,
    Send,
    Search,
    Join,
}

impl ReturnKey {
    /// Short label a text-mode host can render on the key.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "return",
            Self::Go => "go",
            Self::Next => "next",
            Self::Done => "done",
            Self::Send => "send",
            Self::Search => "search",
            Self::Join => "join",
        }
    }
}

/// Presentation settings for a token field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TokenFieldConfig {
    /// Font for the label, tokens and text field.
    pub font: Font,
    /// Insets between the field's bounds and its cells.
    pub content_insets: Insets,
    /// Fixed height for every cell. `None` derives it from the font.
    pub item_height: Option<f32>,
    /// Minimum width of the text field before it wraps.
    pub text_field_min_width: f32,
    /// Horizontal gap between cells on a row.
    pub interitem_spacing: f32,
    /// Vertical gap between rows.
    pub line_spacing: f32,
    /// Show the leading label.
    pub show_label: bool,
    /// Label text.
    pub label_text: Option<String>,
    /// Placeholder shown in an empty text field.
    pub placeholder: Option<String>,
    /// Submit key kind.
    pub return_key: ReturnKey,
    /// Give the text field focus as soon as it is configured.
    pub focus_text_field_on_load: bool,
}

impl Default for TokenFieldConfig {
    fn default() -> Self {
        Self {
            font: Font::default(),
            content_insets: DEFAULT_CONTENT_INSETS,
            item_height: None,
            text_field_min_width: DEFAULT_TEXT_FIELD_MIN_WIDTH,
            interitem_spacing: 0.0,
            line_spacing: 0.0,
            show_label: false,
            label_text: None,
            placeholder: None,
            return_key: ReturnKey::Default,
            focus_text_field_on_load: false,
        }
    }
}

impl TokenFieldConfig {
    #[must_use]
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn with_content_insets(mut self, insets: Insets) -> Self {
        self.content_insets = insets;
        self
    }

    #[must_use]
    pub fn with_item_height(mut self, height: f32) -> Self {
        self.item_height = Some(height);
        self
    }

    #[must_use]
    pub fn with_text_field_min_width(mut self, width: f32) -> Self {
        self.text_field_min_width = width;
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, interitem: f32, line: f32) -> Self {
        self.interitem_spacing = interitem;
        self.line_spacing = line;
        self
    }

    /// Show the label with `text` (builder).
    #[must_use]
    pub fn with_label(mut self, text: impl Into<String>) -> Self {
        self.show_label = true;
        self.label_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn with_return_key(mut self, return_key: ReturnKey) -> Self {
        self.return_key = return_key;
        self
    }

    #[must_use]
    pub fn with_focus_on_load(mut self, focus: bool) -> Self {
        self.focus_text_field_on_load = focus;
        self
    }

    /// Check that every length is finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_length(ConfigField::PointSize, self.font.point_size)?;
        check_length(ConfigField::LineHeight, self.font.line_height)?;
        check_length(ConfigField::Advance, self.font.advance)?;
        if let Some(height) = self.item_height {
            check_length(ConfigField::ItemHeight, height)?;
        }
        check_length(ConfigField::TextFieldMinWidth, self.text_field_min_width)?;
        check_length(ConfigField::InteritemSpacing, self.interitem_spacing)?;
        check_length(ConfigField::LineSpacing, self.line_spacing)?;

        let insets = self.content_insets;
        for value in [insets.top, insets.right, insets.bottom, insets.left] {
            check_length(ConfigField::ContentInsets, value)?;
        }
        Ok(())
    }
}

fn check_length(field: ConfigField, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Clamp a runtime length to a finite, non-negative value.
///
/// Returns `0.0` (and logs a warning) for negative, NaN or infinite input.
pub fn sanitize_length(field: ConfigField, value: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        return value;
    }
    tokenfield_core::warn!(%field, value, "invalid length clamped to zero");
    0.0
}

/// Clamp each edge of `insets` with [`sanitize_length`].
pub fn sanitize_insets(insets: Insets) -> Insets {
    Insets::new(
        sanitize_length(ConfigField::ContentInsets, insets.top),
        sanitize_length(ConfigField::ContentInsets, insets.right),
        sanitize_length(ConfigField::ContentInsets, insets.bottom),
        sanitize_length(ConfigField::ContentInsets, insets.left),
    )
}

/// Clamp the metrics of `font` with [`sanitize_length`].
pub fn sanitize_font(font: Font) -> Font {
    Font {
        point_size: sanitize_length(ConfigField::PointSize, font.point_size),
        line_height: sanitize_length(ConfigField::LineHeight, font.line_height),
        advance: sanitize_length(ConfigField::Advance, font.advance),
        ..font
    }
}

/// A length-valued configuration setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    PointSize,
    LineHeight,
    Advance,
    ContentInsets,
    ItemHeight,
    TextFieldMinWidth,
    InteritemSpacing,
    LineSpacing,
    AvailableWidth,
}

impl ConfigField {
    pub const fn name(self) -> &'static str {
        match self {
            Self::PointSize => "font.point_size",
            Self::LineHeight => "font.line_height",
            Self::Advance => "font.advance",
            Self::ContentInsets => "content_insets",
            Self::ItemHeight => "item_height",
            Self::TextFieldMinWidth => "text_field_min_width",
            Self::InteritemSpacing => "interitem_spacing",
            Self::LineSpacing => "line_spacing",
            Self::AvailableWidth => "available_width",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validation failures for [`TokenFieldConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    Negative { field: ConfigField, value: f32 },
    NonFinite { field: ConfigField },
}

impl ConfigError {
    /// The offending setting.
    pub const fn field(&self) -> ConfigField {
        match self {
            Self::Negative { field, .. } | Self::NonFinite { field } => *field,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative { field, value } => {
                write!(f, "{field} must be non-negative (got {value})")
            }
            Self::NonFinite { field } => write!(f, "{field} must be finite"),
        }
    }
}

impl std::error::Error for ConfigError {}
