#![forbid(unsafe_code)]

//! Core: geometry, font metrics, and logging for the token field crates.

pub mod font;
pub mod geometry;
pub mod logging;

pub use font::Font;
pub use geometry::{Insets, Rect, Size};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
