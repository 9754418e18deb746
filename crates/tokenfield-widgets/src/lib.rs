#![forbid(unsafe_code)]

//! Token storage, the view-model, and the host-driven token field control.

pub mod config;
pub mod field;
pub mod store;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod token;
pub mod view_model;

pub use config::{ConfigError, ConfigField, DEFAULT_CONTENT_INSETS, ReturnKey, TokenFieldConfig};
pub use field::{CellConfiguration, PendingText, TextFieldConfiguration, TokenField};
pub use store::TokenStore;
pub use surface::{Animation, BatchUpdate, Completion, HostSurface, Responder, TextEntry};
pub use token::{TextToken, Token, TokenCellProvider};
pub use view_model::{Cell, TokenFieldViewModel};
