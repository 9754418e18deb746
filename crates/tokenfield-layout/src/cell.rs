#![forbid(unsafe_code)]

//! Cell identities and index paths.

use std::fmt;

/// Flat position of a cell in the single-section cell sequence.
///
/// The host surface speaks in index paths; the token field only ever uses
/// section 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    /// Index path for `item` in section 0.
    #[inline]
    pub const fn item(item: usize) -> Self {
        Self { section: 0, item }
    }
}

impl From<usize> for IndexPath {
    fn from(item: usize) -> Self {
        Self::item(item)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// The kind of cell occupying an item position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Optional leading label ("To:").
    Label,
    /// The editable text field. Always the last cell.
    TextField,
    /// A removable token chip.
    Token,
}

impl CellKind {
    /// Stable identifier hosts can use to pick a cell implementation.
    pub const fn reuse_identifier(self) -> &'static str {
        match self {
            Self::Label => "tokenfield.label",
            Self::TextField => "tokenfield.text_field",
            Self::Token => "tokenfield.token",
        }
    }
}

/// What the sizing model needs to know about one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellDescriptor<'a> {
    /// The label cell and its text.
    Label { text: &'a str },
    /// The text field cell.
    TextField,
    /// A token cell. `custom_width` is set when a custom token cell
    /// provider supplies its own width.
    Token {
        title: &'a str,
        custom_width: Option<f32>,
    },
}

impl CellDescriptor<'_> {
    /// Kind of this descriptor.
    pub const fn kind(&self) -> CellKind {
        match self {
            Self::Label { .. } => CellKind::Label,
            Self::TextField => CellKind::TextField,
            Self::Token { .. } => CellKind::Token,
        }
    }
}
