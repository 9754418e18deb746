#![forbid(unsafe_code)]

//! A recording host surface for tests.
//!
//! [`RecordingSurface`] keeps every request a token field makes, tracks the
//! item count the host would display, and stands in for loaded cells with a
//! single [`CellRecorder`] that records focus transfers and text edits.

use tokenfield_layout::IndexPath;

use crate::config::ReturnKey;
use crate::field::TextFieldConfiguration;
use crate::surface::{Animation, BatchUpdate, HostSurface, Responder, TextEntry};

/// One request received by the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Reload {
        item_count: usize,
    },
    Insert {
        items: Vec<IndexPath>,
        animation: Animation,
    },
    Delete {
        items: Vec<IndexPath>,
        animation: Animation,
    },
    InvalidateLayout,
    HeightChanged(f32),
}

/// Stand-in for whichever cell the field is currently addressing.
#[derive(Debug, Clone, Default)]
pub struct CellRecorder {
    pub text: Option<String>,
    pub placeholder: Option<String>,
    pub return_key: ReturnKey,
    target: IndexPath,
    focus_log: Vec<IndexPath>,
}

impl Responder for CellRecorder {
    fn become_first_responder(&mut self) -> bool {
        self.focus_log.push(self.target);
        true
    }
}

impl TextEntry for CellRecorder {
    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn set_text(&mut self, text: Option<&str>) {
        self.text = text.map(str::to_owned);
    }

    fn set_placeholder(&mut self, placeholder: Option<&str>) {
        self.placeholder = placeholder.map(str::to_owned);
    }

    fn set_return_key(&mut self, return_key: ReturnKey) {
        self.return_key = return_key;
    }
}

/// Host surface that records requests instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Vec<SurfaceEvent>,
    item_count: usize,
    text_field_loaded: bool,
    hold_completions: bool,
    pending: Vec<BatchUpdate>,
    text_cell: CellRecorder,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep completions pending until [`finish_pending`](Self::finish_pending).
    #[must_use]
    pub fn holding_completions(mut self) -> Self {
        self.hold_completions = true;
        self
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Items the host would currently display.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Items that received focus, in order.
    pub fn focus_log(&self) -> &[IndexPath] {
        &self.text_cell.focus_log
    }

    /// The loaded text field, if any.
    pub fn text_field(&self) -> Option<&CellRecorder> {
        self.text_field_loaded.then_some(&self.text_cell)
    }

    /// Apply a text field configuration as a host would.
    pub fn load_text_field(&mut self, config: TextFieldConfiguration) {
        self.text_field_loaded = true;
        if let Some(text) = config.text {
            self.text_cell.text = Some(text);
        }
        self.text_cell.placeholder = config.placeholder;
        self.text_cell.return_key = config.return_key;
        if config.become_first_responder {
            self.text_cell.target = IndexPath::item(self.item_count.saturating_sub(1));
            self.text_cell.become_first_responder();
        }
    }

    /// Simulate the user typing into the loaded text field.
    pub fn type_text(&mut self, text: &str) {
        self.text_cell.text = Some(text.to_owned());
    }

    pub fn pending_completions(&self) -> usize {
        self.pending.len()
    }

    /// Complete every held update.
    pub fn finish_pending(&mut self, finished: bool) {
        for update in self.pending.drain(..) {
            update.complete(finished);
        }
    }

    fn settle(&mut self, update: BatchUpdate) {
        if self.hold_completions {
            self.pending.push(update);
        } else {
            update.complete(true);
        }
    }

    fn is_text_field(&self, item: IndexPath) -> bool {
        item.section == 0 && self.item_count > 0 && item.item == self.item_count - 1
    }
}

impl HostSurface for RecordingSurface {
    fn reload_data(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.events.push(SurfaceEvent::Reload { item_count });
    }

    fn insert_items(&mut self, items: &[IndexPath], update: BatchUpdate) {
        self.item_count += items.len();
        self.events.push(SurfaceEvent::Insert {
            items: items.to_vec(),
            animation: update.animation(),
        });
        self.settle(update);
    }

    fn delete_items(&mut self, items: &[IndexPath], update: BatchUpdate) {
        self.item_count = self.item_count.saturating_sub(items.len());
        self.events.push(SurfaceEvent::Delete {
            items: items.to_vec(),
            animation: update.animation(),
        });
        self.settle(update);
    }

    fn invalidate_layout(&mut self) {
        self.events.push(SurfaceEvent::InvalidateLayout);
    }

    fn height_changed(&mut self, height: f32) {
        self.events.push(SurfaceEvent::HeightChanged(height));
    }

    fn responder_at(&mut self, item: IndexPath) -> Option<&mut dyn Responder> {
        if item.section != 0 || item.item >= self.item_count {
            return None;
        }
        self.text_cell.target = item;
        Some(&mut self.text_cell)
    }

    fn text_entry(&mut self, item: IndexPath) -> Option<&mut dyn TextEntry> {
        if !self.text_field_loaded || !self.is_text_field(item) {
            return None;
        }
        self.text_cell.target = item;
        Some(&mut self.text_cell)
    }
}
