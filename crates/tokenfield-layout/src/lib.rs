#![forbid(unsafe_code)]

//! Layout model for the resizing token field.
//!
//! - [`cell`] - cell kinds, descriptors and index paths
//! - [`sizing`] - per-cell sizes from font metrics and configured minimums
//! - [`flow`] - the wrapping flow engine and its height-change reporting
//!
//! # Example
//!
//! ```
//! use tokenfield_core::Font;
//! use tokenfield_layout::{CellDescriptor, CellSizer, FlowSpacing, layout_cells};
//!
//! let font = Font::system(10.0);
//! let sizer = CellSizer::new(&font, Some(30.0), 80.0);
//! let cells = [
//!     CellDescriptor::Token { title: "a", custom_width: Some(100.0) },
//!     CellDescriptor::Token { title: "b", custom_width: Some(100.0) },
//!     CellDescriptor::TextField,
//! ];
//!
//! let frames = layout_cells(&cells, sizer, 300.0, FlowSpacing::default());
//! assert_eq!(frames.rows().len(), 1);
//! // The text field absorbs the rest of its row.
//! assert_eq!(frames.frame(2).map(|f| f.width), Some(100.0));
//! ```

pub mod cell;
pub mod flow;
pub mod sizing;

pub use cell::{CellDescriptor, CellKind, IndexPath};
pub use flow::{
    CellList, FlowFrames, FlowLayout, FlowRow, FlowSource, FlowSpacing, FlowState, HeightChanged,
    compute_flow, layout_cells,
};
pub use sizing::{
    CellSizer, DEFAULT_TEXT_FIELD_MIN_WIDTH, ITEM_VERTICAL_PADDING, TOKEN_HORIZONTAL_PADDING,
    effective_item_height,
};
pub use tokenfield_core::geometry::{Insets, Rect, Size};
