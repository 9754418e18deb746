#![forbid(unsafe_code)]

//! The host surface protocol.
//!
//! The token field never renders anything itself. A host (a GUI toolkit's
//! collection view, a terminal renderer, a test recorder) implements
//! [`HostSurface`] and receives batched insert/delete requests, layout
//! invalidations, and height changes. In the other direction the host pulls
//! item counts, cell kinds, sizes and cell configurations from the
//! [`TokenField`](crate::TokenField).
//!
//! # Batched updates
//!
//! Every structural change reaches the host as one [`BatchUpdate`]. The host
//! must eventually call [`BatchUpdate::complete`] (or drop the update, which
//! never reports). Only one batch is expected in flight at a time; callers
//! wait for the completion before issuing the next structural mutation.

use std::fmt;
use std::time::Duration;

use tokenfield_layout::IndexPath;

use crate::config::ReturnKey;

/// Completion callback for a batched update. Receives `true` when the update
/// ran to completion.
pub type Completion = Box<dyn FnOnce(bool)>;

/// How a batched update should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Animation {
    /// Apply immediately without animation.
    #[default]
    None,
    /// Animate over `duration`.
    Animated { duration: Duration },
}

impl Animation {
    /// Default animation duration.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

    /// Animate with the default duration.
    pub const fn animated() -> Self {
        Self::Animated {
            duration: Self::DEFAULT_DURATION,
        }
    }

    pub const fn is_animated(&self) -> bool {
        matches!(self, Self::Animated { .. })
    }
}

/// A batched visual update request with optional completion.
#[derive(Default)]
pub struct BatchUpdate {
    animation: Animation,
    completion: Option<Completion>,
}

impl BatchUpdate {
    /// Update without animation or completion.
    pub fn immediate() -> Self {
        Self::default()
    }

    /// Update with the default animation.
    pub fn animated() -> Self {
        Self {
            animation: Animation::animated(),
            completion: None,
        }
    }

    /// Update with an explicit animation.
    pub fn with_animation(animation: Animation) -> Self {
        Self {
            animation,
            completion: None,
        }
    }

    /// Attach a completion (builder).
    #[must_use]
    pub fn on_complete(mut self, completion: impl FnOnce(bool) + 'static) -> Self {
        self.completion = Some(Box::new(completion));
        self
    }

    pub fn animation(&self) -> Animation {
        self.animation
    }

    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    /// Finish the update, invoking the completion if present.
    pub fn complete(self, finished: bool) {
        if let Some(completion) = self.completion {
            completion(finished);
        }
    }
}

impl fmt::Debug for BatchUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchUpdate")
            .field("animation", &self.animation)
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}

impl From<Animation> for BatchUpdate {
    fn from(animation: Animation) -> Self {
        Self::with_animation(animation)
    }
}

/// A cell that can take keyboard focus.
pub trait Responder {
    /// Make this cell the active responder. Returns `true` on success.
    fn become_first_responder(&mut self) -> bool;
}

/// The loaded text field cell.
pub trait TextEntry: Responder {
    /// Current text.
    fn text(&self) -> Option<String>;

    /// Replace the text.
    fn set_text(&mut self, text: Option<&str>);

    /// Update the placeholder.
    fn set_placeholder(&mut self, _placeholder: Option<&str>) {}

    /// Update the submit key.
    fn set_return_key(&mut self, _return_key: ReturnKey) {}
}

/// The rendering surface driven by a token field.
pub trait HostSurface {
    /// First full load. `item_count` cells exist from now on.
    fn reload_data(&mut self, item_count: usize);

    /// Insert cells at `items` (positions after insertion, ascending).
    fn insert_items(&mut self, items: &[IndexPath], update: BatchUpdate);

    /// Delete cells at `items` (positions before deletion, descending).
    fn delete_items(&mut self, items: &[IndexPath], update: BatchUpdate);

    /// Cell sizes changed without a structural change; lay out again.
    fn invalidate_layout(&mut self);

    /// The total content height changed.
    fn height_changed(&mut self, height: f32);

    /// The loaded cell at `item`, for focus transfer.
    fn responder_at(&mut self, item: IndexPath) -> Option<&mut dyn Responder>;

    /// The loaded text field cell at `item`.
    fn text_entry(&mut self, item: IndexPath) -> Option<&mut dyn TextEntry>;
}
