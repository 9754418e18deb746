#![forbid(unsafe_code)]

//! Resizing token field public facade.
//!
//! A token field shows removable tokens followed by a free-text field,
//! wrapping onto new rows as the content grows and stretching the text field
//! across whatever is left of its row. The crate is renderer-agnostic: a host
//! implements [`HostSurface`] and drives a [`TokenField`].
//!
//! # Example
//!
//! ```
//! use tokenfield::prelude::*;
//!
//! # struct Host;
//! # impl HostSurface for Host {
//! #     fn reload_data(&mut self, _: usize) {}
//! #     fn insert_items(&mut self, _: &[IndexPath], update: BatchUpdate) { update.complete(true) }
//! #     fn delete_items(&mut self, _: &[IndexPath], update: BatchUpdate) { update.complete(true) }
//! #     fn invalidate_layout(&mut self) {}
//! #     fn height_changed(&mut self, _: f32) {}
//! #     fn responder_at(&mut self, _: IndexPath) -> Option<&mut dyn Responder> { None }
//! #     fn text_entry(&mut self, _: IndexPath) -> Option<&mut dyn TextEntry> { None }
//! # }
//! let config = TokenFieldConfig::default().with_label("To:");
//! let mut field: TokenField<TextToken, _> = TokenField::with_config(Host, config)?;
//! field.append([TextToken::new("alice"), TextToken::new("bob")], BatchUpdate::immediate());
//!
//! assert_eq!(field.number_of_items(), 4);
//! let frames = field.layout(320.0).expect("laid out");
//! assert_eq!(frames.rows().len(), 1);
//! # Ok::<(), ConfigError>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use tokenfield_core::{Font, Insets, Rect, Size};

// --- Layout re-exports -----------------------------------------------------

pub use tokenfield_layout::{
    CellDescriptor, CellKind, CellSizer, FlowFrames, FlowLayout, FlowRow, FlowSource, FlowSpacing,
    FlowState, HeightChanged, IndexPath, compute_flow, layout_cells,
};

// --- Widget re-exports -----------------------------------------------------

pub use tokenfield_widgets::{
    Animation, BatchUpdate, Cell, CellConfiguration, Completion, ConfigError, ConfigField,
    HostSurface, PendingText, Responder, ReturnKey, TextEntry, TextFieldConfiguration, TextToken,
    Token, TokenCellProvider, TokenField, TokenFieldConfig, TokenFieldViewModel, TokenStore,
};

#[cfg(feature = "testing")]
pub use tokenfield_widgets::testing;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BatchUpdate, CellConfiguration, CellKind, ConfigError, Font, HostSurface, IndexPath,
        Insets, Responder, ReturnKey, Size, TextEntry, TextToken, Token, TokenField,
        TokenFieldConfig,
    };

    pub use crate::{core, layout, widgets};
}

pub use tokenfield_core as core;
pub use tokenfield_layout as layout;
pub use tokenfield_widgets as widgets;
