#![forbid(unsafe_code)]

//! Token entities and custom token cell sizing.

use tokenfield_core::Font;

/// A removable chip shown in the token field.
///
/// Equality is used when removing tokens by value. Tokens that compare equal
/// may appear more than once.
pub trait Token: PartialEq {
    /// Text shown on the chip.
    fn title(&self) -> &str;

    /// Optional image reference passed through to the host.
    fn image(&self) -> Option<&str> {
        None
    }
}

impl Token for String {
    fn title(&self) -> &str {
        self
    }
}

impl Token for &str {
    fn title(&self) -> &str {
        self
    }
}

/// A plain text token with an optional image reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextToken {
    title: String,
    image: Option<String>,
}

impl TextToken {
    /// Create a token with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: None,
        }
    }

    /// Attach an image reference (builder).
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

impl Token for TextToken {
    fn title(&self) -> &str {
        &self.title
    }

    fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl From<&str> for TextToken {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

impl From<String> for TextToken {
    fn from(title: String) -> Self {
        Self::new(title)
    }
}

/// Supplies widths for custom token cells.
///
/// When installed on a token field, this replaces the default
/// padding-plus-title width of every token cell.
pub trait TokenCellProvider<T> {
    /// Width of the cell showing `token`.
    fn token_cell_width(&self, token: &T, font: &Font) -> f32;
}

impl<T, F> TokenCellProvider<T> for F
where
    F: Fn(&T, &Font) -> f32,
{
    fn token_cell_width(&self, token: &T, font: &Font) -> f32 {
        self(token, font)
    }
}
