#![forbid(unsafe_code)]

//! The resizing token field control.
//!
//! [`TokenField`] ties the [`TokenFieldViewModel`] to a [`FlowLayout`] and a
//! host [`HostSurface`]. The host drives it in two directions:
//!
//! - **Pull**: [`number_of_items`](TokenField::number_of_items),
//!   [`cell_kind`](TokenField::cell_kind),
//!   [`size_for_item`](TokenField::size_for_item),
//!   [`configure_cell`](TokenField::configure_cell) and
//!   [`layout`](TokenField::layout).
//! - **Events**: selection, text edits, backspace in an empty text field, and
//!   removal requests from token cells.
//!
//! Structural mutations update state synchronously and then ask the host for
//! one batched insert or delete. Until the first [`layout`](TokenField::layout)
//! the host has no cells, so mutations only change state and complete
//! immediately.
//!
//! # Text buffering
//!
//! Text set before the text field cell exists is buffered and handed to the
//! host exactly once, in the first [`CellConfiguration::TextField`] produced
//! afterwards.

use std::fmt;

use tokenfield_core::{Font, Insets, Size};
use tokenfield_layout::{CellKind, FlowFrames, FlowLayout, FlowSource, IndexPath};

use crate::config::{
    ConfigError, ConfigField, ReturnKey, TokenFieldConfig, sanitize_font, sanitize_insets,
    sanitize_length,
};
use crate::surface::{BatchUpdate, HostSurface, TextEntry};
use crate::token::{Token, TokenCellProvider};
use crate::view_model::{Cell, TokenFieldViewModel};

/// Text waiting for the text field cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PendingText {
    /// Nothing buffered.
    #[default]
    Empty,
    /// Set before the text field cell was configured.
    Buffered(String),
    /// The buffer was handed to the text field cell.
    Flushed,
}

/// Traits the host applies to the text field cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFieldConfiguration {
    /// Buffered text to apply. `None` leaves the current text alone.
    pub text: Option<String>,
    pub placeholder: Option<String>,
    pub font: Font,
    pub return_key: ReturnKey,
    /// Make the text field the active responder once configured.
    pub become_first_responder: bool,
}

/// How the host should populate one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellConfiguration<'a, T> {
    Label { text: Option<&'a str>, font: &'a Font },
    Token { token: &'a T, font: &'a Font },
    TextField(TextFieldConfiguration),
}

impl<T> CellConfiguration<'_, T> {
    pub const fn kind(&self) -> CellKind {
        match self {
            Self::Label { .. } => CellKind::Label,
            Self::Token { .. } => CellKind::Token,
            Self::TextField(_) => CellKind::TextField,
        }
    }
}

type TextChangedHandler = Box<dyn FnMut(Option<&str>)>;

/// A wrapping field of removable tokens followed by a free-text field.
pub struct TokenField<T, S> {
    view_model: TokenFieldViewModel<T>,
    flow: FlowLayout,
    surface: S,
    width: Option<f32>,
    is_loaded: bool,
    pending_text: PendingText,
    placeholder: Option<String>,
    return_key: ReturnKey,
    focus_text_field_on_load: bool,
    cell_provider: Option<Box<dyn TokenCellProvider<T>>>,
    on_text_changed: Option<TextChangedHandler>,
}

impl<T: Token, S: HostSurface> TokenField<T, S> {
    /// Create a field with the default configuration.
    pub fn new(surface: S) -> Self {
        Self::from_valid_config(surface, TokenFieldConfig::default())
    }

    /// Create a field from `config`, rejecting invalid lengths.
    pub fn with_config(surface: S, config: TokenFieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(surface, config))
    }

    fn from_valid_config(surface: S, config: TokenFieldConfig) -> Self {
        let mut view_model = TokenFieldViewModel::new();
        view_model.set_font(config.font);
        view_model.set_custom_item_height(config.item_height);
        view_model.set_text_field_min_width(config.text_field_min_width);
        view_model.set_showing_label(config.show_label);
        view_model.set_label_text(config.label_text);

        let flow = FlowLayout::new()
            .with_insets(config.content_insets)
            .with_interitem_spacing(config.interitem_spacing)
            .with_line_spacing(config.line_spacing);

        Self {
            view_model,
            flow,
            surface,
            width: None,
            is_loaded: false,
            pending_text: PendingText::Empty,
            placeholder: config.placeholder,
            return_key: config.return_key,
            focus_text_field_on_load: config.focus_text_field_on_load,
            cell_provider: None,
            on_text_changed: None,
        }
    }

    /// Replace default token cells with custom-width ones (builder).
    #[must_use]
    pub fn with_cell_provider(mut self, provider: impl TokenCellProvider<T> + 'static) -> Self {
        self.cell_provider = Some(Box::new(provider));
        self.invalidate_layout();
        self
    }

    /// Install the text-changed handler (builder).
    #[must_use]
    pub fn on_text_changed(mut self, handler: impl FnMut(Option<&str>) + 'static) -> Self {
        self.on_text_changed = Some(Box::new(handler));
        self
    }

    // --- Surface ---

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Whether the host has performed its first load.
    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    // --- Configuration ---

    pub fn tokens(&self) -> &[T] {
        self.view_model.tokens()
    }

    pub fn view_model(&self) -> &TokenFieldViewModel<T> {
        &self.view_model
    }

    pub fn font(&self) -> &Font {
        self.view_model.font()
    }

    pub fn set_font(&mut self, font: Font) {
        self.view_model.set_font(sanitize_font(font));
        self.invalidate_layout();
    }

    pub fn content_insets(&self) -> Insets {
        self.flow.insets()
    }

    pub fn set_content_insets(&mut self, insets: Insets) {
        self.flow.set_insets(sanitize_insets(insets));
        if self.is_loaded {
            self.surface.invalidate_layout();
        }
    }

    /// Change inter-item and line spacing.
    pub fn set_spacing(&mut self, interitem: f32, line: f32) {
        self.flow.set_spacing(
            sanitize_length(ConfigField::InteritemSpacing, interitem),
            sanitize_length(ConfigField::LineSpacing, line),
        );
        if self.is_loaded {
            self.surface.invalidate_layout();
        }
    }

    /// Effective height of every cell.
    pub fn item_height(&self) -> f32 {
        self.view_model.item_height()
    }

    /// Fix the height of every cell, or derive it from the font with `None`.
    pub fn set_item_height(&mut self, height: Option<f32>) {
        let height = height.map(|h| sanitize_length(ConfigField::ItemHeight, h));
        self.view_model.set_custom_item_height(height);
        self.invalidate_layout();
    }

    pub fn text_field_min_width(&self) -> f32 {
        self.view_model.text_field_min_width()
    }

    pub fn set_text_field_min_width(&mut self, width: f32) {
        let width = sanitize_length(ConfigField::TextFieldMinWidth, width);
        self.view_model.set_text_field_min_width(width);
        self.invalidate_layout();
    }

    pub fn is_showing_label(&self) -> bool {
        self.view_model.is_showing_label()
    }

    pub fn label_text(&self) -> Option<&str> {
        self.view_model.label_text()
    }

    pub fn set_label_text(&mut self, text: Option<String>) {
        self.view_model.set_label_text(text);
        if self.view_model.is_showing_label() {
            self.invalidate_layout();
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        let item = self.view_model.text_field_item();
        if let Some(entry) = self.loaded_text_entry(item) {
            entry.set_placeholder(placeholder.as_deref());
        }
        self.placeholder = placeholder;
    }

    pub fn return_key(&self) -> ReturnKey {
        self.return_key
    }

    pub fn set_return_key(&mut self, return_key: ReturnKey) {
        self.return_key = return_key;
        let item = self.view_model.text_field_item();
        if let Some(entry) = self.loaded_text_entry(item) {
            entry.set_return_key(return_key);
        }
    }

    /// Focus the text field the next time it is configured.
    pub fn set_focus_text_field_on_load(&mut self, focus: bool) {
        self.focus_text_field_on_load = focus;
    }

    pub fn focus_text_field_on_load(&self) -> bool {
        self.focus_text_field_on_load
    }

    pub fn pending_text(&self) -> &PendingText {
        &self.pending_text
    }

    // --- Text ---

    /// Buffered text, or the loaded text field's text.
    pub fn text(&mut self) -> Option<String> {
        if let PendingText::Buffered(text) = &self.pending_text {
            return Some(text.clone());
        }
        let item = self.view_model.text_field_item();
        self.loaded_text_entry(item).and_then(|entry| entry.text())
    }

    /// Set the free text.
    ///
    /// Applied to the loaded text field (firing the text-changed handler), or
    /// buffered until the text field cell is configured.
    pub fn set_text(&mut self, text: Option<&str>) {
        let item = self.view_model.text_field_item();
        let applied = match self.loaded_text_entry(item) {
            Some(entry) => {
                entry.set_text(text);
                true
            }
            None => false,
        };

        if applied {
            self.notify_text_changed(text);
        } else {
            self.pending_text = match text {
                Some(text) => PendingText::Buffered(text.to_owned()),
                None => PendingText::Empty,
            };
        }
    }

    // --- Structural mutations ---

    /// Show the label cell.
    pub fn show_label(&mut self, update: BatchUpdate) {
        self.toggle_label(true, update);
    }

    /// Hide the label cell.
    pub fn hide_label(&mut self, update: BatchUpdate) {
        self.toggle_label(false, update);
    }

    fn toggle_label(&mut self, visible: bool, update: BatchUpdate) {
        if !self.view_model.set_showing_label(visible) {
            update.complete(true);
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "token_field_update",
            op = if visible { "show_label" } else { "hide_label" },
            items = 1usize,
            loaded = self.is_loaded
        )
        .entered();

        let item = self.view_model.label_item();
        self.flow.invalidate();
        if visible {
            self.request_insert(&[item], update);
        } else {
            self.request_delete(&[item], update);
        }
    }

    /// Append tokens after the existing ones.
    pub fn append(&mut self, tokens: impl IntoIterator<Item = T>, update: BatchUpdate) {
        let items = self.view_model.append(tokens);

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "token_field_update",
            op = "append",
            items = items.len(),
            loaded = self.is_loaded
        )
        .entered();

        self.flow.invalidate();
        self.request_insert(&items, update);
    }

    /// Remove tokens equal to the given ones. Missing tokens are skipped.
    pub fn remove(&mut self, tokens: &[T], update: BatchUpdate) {
        let items = self.view_model.remove(tokens);
        self.finish_removal(&items, update, "remove");
    }

    /// Remove tokens at token indexes. Out-of-range indexes are skipped.
    pub fn remove_at_indexes(
        &mut self,
        indexes: impl IntoIterator<Item = usize>,
        update: BatchUpdate,
    ) {
        let items = self.view_model.remove_at_indexes(indexes);
        self.finish_removal(&items, update, "remove_at_indexes");
    }

    fn finish_removal(&mut self, items: &[IndexPath], update: BatchUpdate, op: &'static str) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "token_field_update",
            op,
            items = items.len(),
            loaded = self.is_loaded
        )
        .entered();
        #[cfg(not(feature = "tracing"))]
        let _ = op;

        self.flow.invalidate();
        self.request_delete(items, update);
    }

    fn request_insert(&mut self, items: &[IndexPath], update: BatchUpdate) {
        if !self.is_loaded || items.is_empty() {
            update.complete(true);
            return;
        }
        self.surface.insert_items(items, update);
    }

    fn request_delete(&mut self, items: &[IndexPath], update: BatchUpdate) {
        if !self.is_loaded || items.is_empty() {
            update.complete(true);
            return;
        }
        self.surface.delete_items(items, update);
    }

    fn invalidate_layout(&mut self) {
        self.flow.invalidate();
        if self.is_loaded {
            self.surface.invalidate_layout();
        }
    }

    /// Recompute sizes after the available width changed.
    pub fn handle_orientation_change(&mut self) {
        self.invalidate_layout();
    }

    // --- Data source ---

    pub fn number_of_items(&self) -> usize {
        self.view_model.number_of_items()
    }

    pub fn cell_kind(&self, item: IndexPath) -> Option<CellKind> {
        self.view_model.cell_kind(item)
    }

    pub fn token(&self, item: IndexPath) -> Option<&T> {
        self.view_model.token(item)
    }

    pub fn label_item(&self) -> Option<IndexPath> {
        self.view_model
            .is_showing_label()
            .then(|| self.view_model.label_item())
    }

    pub fn text_field_item(&self) -> IndexPath {
        self.view_model.text_field_item()
    }

    pub fn last_token_item(&self) -> Option<IndexPath> {
        self.view_model.last_token_item()
    }

    /// Whether `item` receives the leftover width of its row.
    pub fn is_terminal_item(&self, item: IndexPath) -> bool {
        item == self.view_model.text_field_item()
    }

    /// Intrinsic size of `item` at the last laid-out width.
    ///
    /// The text field reports its minimum size; [`layout`](Self::layout)
    /// stretches it.
    pub fn size_for_item(&self, item: IndexPath) -> Size {
        self.view_model
            .size_for_item(item, self.content_width(), self.cell_provider.as_deref())
    }

    /// Width available to cells, unbounded before the first layout.
    pub fn content_width(&self) -> f32 {
        match self.width {
            Some(width) => (width - self.flow.insets().horizontal_sum()).max(0.0),
            None => f32::INFINITY,
        }
    }

    /// Describe how to populate the cell at `item`.
    ///
    /// Configuring the text field hands over any buffered text and consumes
    /// the focus-on-load flag.
    pub fn configure_cell(&mut self, item: IndexPath) -> Option<CellConfiguration<'_, T>> {
        let Some(cell) = self.view_model.cell(item) else {
            tokenfield_core::warn!(%item, items = self.number_of_items(), "configure requested for unknown item");
            return None;
        };

        let font = self.view_model.font();
        let configuration = match cell {
            Cell::Label => CellConfiguration::Label {
                text: self.view_model.label_text(),
                font,
            },
            Cell::Token(token) => CellConfiguration::Token { token, font },
            Cell::TextField => {
                let text = match std::mem::take(&mut self.pending_text) {
                    PendingText::Buffered(text) => {
                        self.pending_text = PendingText::Flushed;
                        Some(text)
                    }
                    other => {
                        self.pending_text = other;
                        None
                    }
                };
                let become_first_responder = std::mem::take(&mut self.focus_text_field_on_load);
                CellConfiguration::TextField(TextFieldConfiguration {
                    text,
                    placeholder: self.placeholder.clone(),
                    font: font.clone(),
                    return_key: self.return_key,
                    become_first_responder,
                })
            }
        };
        Some(configuration)
    }

    // --- Layout ---

    /// Lay out every cell for `width`.
    ///
    /// The first call marks the field loaded and asks the host for a full
    /// reload. Height changes are forwarded to
    /// [`HostSurface::height_changed`].
    pub fn layout(&mut self, width: f32) -> Option<&FlowFrames> {
        let width = sanitize_length(ConfigField::AvailableWidth, width);

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "token_field_layout",
            width,
            items = self.view_model.number_of_items(),
            loaded = self.is_loaded
        )
        .entered();

        if !self.is_loaded {
            self.is_loaded = true;
            tokenfield_core::debug!(items = self.number_of_items(), "initial load");
            self.surface.reload_data(self.view_model.number_of_items());
        }
        self.width = Some(width);

        let source = FieldCells {
            view_model: &self.view_model,
            provider: self.cell_provider.as_deref(),
        };
        if let Some(change) = self.flow.prepare(&source, width) {
            self.surface.height_changed(change.height);
        }
        self.flow.frames()
    }

    /// Frames from the last valid pass.
    pub fn frames(&self) -> Option<&FlowFrames> {
        self.flow.frames()
    }

    /// Total content height from the last pass.
    pub fn content_height(&self) -> Option<f32> {
        self.flow.recorded_height()
    }

    // --- Host events ---

    /// The host selected `item`. Token cells take focus.
    pub fn did_select_item(&mut self, item: IndexPath) -> bool {
        if self.view_model.cell_kind(item) != Some(CellKind::Token) {
            return false;
        }
        self.focus(item)
    }

    /// The user edited the text field.
    pub fn text_did_change(&mut self) {
        let item = self.view_model.text_field_item();
        let text = self.loaded_text_entry(item).and_then(|entry| entry.text());
        self.notify_text_changed(text.as_deref());
    }

    /// Backspace in an empty text field focuses the last token.
    pub fn text_field_did_delete_backward_when_empty(&mut self) -> bool {
        match self.view_model.last_token_item() {
            Some(item) => self.focus(item),
            None => false,
        }
    }

    /// A token cell asked to be removed, carrying any text typed into it.
    ///
    /// Removes the token with animation, forwards `typed_fragment` to the
    /// text field and focuses it.
    pub fn token_did_request_removal(&mut self, item: IndexPath, typed_fragment: Option<String>) {
        let items = self.view_model.remove_at_items(&[item]);
        if items.is_empty() {
            tokenfield_core::warn!(%item, "removal requested for non-token item");
        }
        self.finish_removal(&items, BatchUpdate::animated(), "token_removal");
        self.set_text(typed_fragment.as_deref());
        let text_field = self.view_model.text_field_item();
        self.focus(text_field);
    }

    fn focus(&mut self, item: IndexPath) -> bool {
        if !self.is_loaded {
            return false;
        }
        self.surface
            .responder_at(item)
            .is_some_and(|responder| responder.become_first_responder())
    }

    fn loaded_text_entry(&mut self, item: IndexPath) -> Option<&mut dyn TextEntry> {
        if !self.is_loaded {
            return None;
        }
        self.surface.text_entry(item)
    }

    fn notify_text_changed(&mut self, text: Option<&str>) {
        if let Some(handler) = self.on_text_changed.as_mut() {
            handler(text);
        }
    }
}

impl<T: fmt::Debug, S: fmt::Debug> fmt::Debug for TokenField<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenField")
            .field("view_model", &self.view_model)
            .field("flow", &self.flow)
            .field("surface", &self.surface)
            .field("width", &self.width)
            .field("is_loaded", &self.is_loaded)
            .field("pending_text", &self.pending_text)
            .field("has_cell_provider", &self.cell_provider.is_some())
            .finish_non_exhaustive()
    }
}

/// Flow source over the field's cells.
struct FieldCells<'a, T> {
    view_model: &'a TokenFieldViewModel<T>,
    provider: Option<&'a dyn TokenCellProvider<T>>,
}

impl<T: Token> FlowSource for FieldCells<'_, T> {
    fn item_count(&self) -> usize {
        self.view_model.number_of_items()
    }

    fn item_size(&self, item: usize, available_width: f32) -> Size {
        self.view_model
            .size_for_item(IndexPath::item(item), available_width, self.provider)
    }

    fn terminal_item(&self) -> Option<usize> {
        Some(self.view_model.text_field_item().item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Animation;
    use crate::testing::{RecordingSurface, SurfaceEvent};
    use crate::token::TextToken;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn tokens(titles: &[&str]) -> Vec<TextToken> {
        titles.iter().map(|t| TextToken::new(*t)).collect()
    }

    fn field() -> TokenField<TextToken, RecordingSurface> {
        let config = TokenFieldConfig::default()
            .with_font(Font::system(10.0))
            .with_content_insets(Insets::ZERO)
            .with_item_height(30.0)
            .with_text_field_min_width(80.0);
        TokenField::with_config(RecordingSurface::new(), config).expect("valid config")
    }

    fn completion_flag() -> (Rc<RefCell<Option<bool>>>, BatchUpdate) {
        let flag = Rc::new(RefCell::new(None));
        let seen = Rc::clone(&flag);
        let update = BatchUpdate::immediate().on_complete(move |finished| {
            *seen.borrow_mut() = Some(finished);
        });
        (flag, update)
    }

    #[test]
    fn with_config_rejects_invalid_lengths() {
        let config = TokenFieldConfig::default().with_spacing(-1.0, 0.0);
        let err = TokenField::<TextToken, _>::with_config(RecordingSurface::new(), config)
            .err()
            .expect("negative spacing");
        assert_eq!(err.field(), ConfigField::InteritemSpacing);
    }

    #[test]
    fn mutations_before_load_only_change_state() {
        let mut field = field();
        let (flag, update) = completion_flag();
        field.append(tokens(&["a", "b"]), update);
        assert_eq!(*flag.borrow(), Some(true));
        assert_eq!(field.number_of_items(), 3);
        assert!(field.surface().events().is_empty());

        let (flag, update) = completion_flag();
        field.show_label(update);
        assert_eq!(*flag.borrow(), Some(true));
        assert!(field.surface().events().is_empty());
        assert_eq!(field.number_of_items(), 4);
    }

    #[test]
    fn first_layout_reloads_and_reports_height() {
        let mut field = field();
        field.append(tokens(&["a"]), BatchUpdate::immediate());
        assert!(!field.is_loaded());

        field.layout(300.0);
        assert!(field.is_loaded());
        assert_eq!(
            field.surface().events(),
            &[SurfaceEvent::Reload { item_count: 2 }, SurfaceEvent::HeightChanged(30.0)]
        );

        // Same width and count: no new pass, no new height.
        field.layout(300.0);
        assert_eq!(field.surface().events().len(), 2);
    }

    #[test]
    fn append_after_load_inserts_at_new_positions() {
        let mut field = field();
        field.show_label(BatchUpdate::immediate());
        field.layout(300.0);
        field.surface_mut().clear_events();

        field.append(tokens(&["a", "b"]), BatchUpdate::animated());
        assert_eq!(
            field.surface().events(),
            &[SurfaceEvent::Insert {
                items: vec![IndexPath::item(1), IndexPath::item(2)],
                animation: Animation::animated(),
            }]
        );
        assert_eq!(field.surface().item_count(), field.number_of_items());
    }

    #[test]
    fn remove_deletes_descending_pre_removal_positions() {
        let mut field = field();
        field.append(tokens(&["t1", "t2"]), BatchUpdate::immediate());
        field.layout(300.0);
        field.surface_mut().clear_events();

        let (flag, update) = completion_flag();
        field.remove(&tokens(&["t2", "t1"]), update);
        assert_eq!(
            field.surface().events(),
            &[SurfaceEvent::Delete {
                items: vec![IndexPath::item(1), IndexPath::item(0)],
                animation: Animation::None,
            }]
        );
        assert_eq!(*flag.borrow(), Some(true));
        assert_eq!(field.number_of_items(), 1);
    }

    #[test]
    fn removing_nothing_completes_without_host_request() {
        let mut field = field();
        field.append(tokens(&["a"]), BatchUpdate::immediate());
        field.layout(300.0);
        field.surface_mut().clear_events();

        let (flag, update) = completion_flag();
        field.remove_at_indexes([5], update);
        assert_eq!(*flag.borrow(), Some(true));
        assert!(field.surface().events().is_empty());
    }

    #[test]
    fn toggling_label_to_same_state_is_noop() {
        let mut field = field();
        field.layout(300.0);
        field.surface_mut().clear_events();

        let (flag, update) = completion_flag();
        field.hide_label(update);
        assert_eq!(*flag.borrow(), Some(true));
        assert!(field.surface().events().is_empty());
    }

    #[test]
    fn toggling_label_after_load_inserts_and_deletes_item_zero() {
        let mut field = field();
        field.append(tokens(&["a"]), BatchUpdate::immediate());
        field.layout(300.0);
        field.surface_mut().clear_events();

        field.show_label(BatchUpdate::immediate());
        field.hide_label(BatchUpdate::animated());
        assert_eq!(
            field.surface().events(),
            &[
                SurfaceEvent::Insert {
                    items: vec![IndexPath::item(0)],
                    animation: Animation::None,
                },
                SurfaceEvent::Delete {
                    items: vec![IndexPath::item(0)],
                    animation: Animation::animated(),
                },
            ]
        );
    }

    #[test]
    fn layout_stretches_text_field_and_wraps() {
        let mut field = field().with_cell_provider(|_: &TextToken, _: &Font| 100.0_f32);
        field.append(tokens(&["a", "b"]), BatchUpdate::immediate());

        let frames = field.layout(300.0).expect("frames");
        assert_eq!(frames.rows().len(), 1);
        assert_eq!(frames.frame(2).map(|f| f.width), Some(100.0));

        field.append(tokens(&["c"]), BatchUpdate::immediate());
        let frames = field.layout(300.0).expect("frames");
        assert_eq!(frames.rows().len(), 2);
        assert_eq!(frames.row_of(3), Some(1));
        assert_eq!(frames.frame(3).map(|f| f.width), Some(300.0));
        assert_eq!(
            field.surface().events().last(),
            Some(&SurfaceEvent::HeightChanged(60.0))
        );
    }

    #[test]
    fn size_for_item_uses_provider_and_min_width() {
        let mut field = field().with_cell_provider(|_: &TextToken, _: &Font| 42.0_f32);
        field.append(tokens(&["a"]), BatchUpdate::immediate());
        assert_eq!(field.size_for_item(IndexPath::item(0)), Size::new(42.0, 30.0));
        assert_eq!(field.size_for_item(IndexPath::item(1)), Size::new(80.0, 30.0));
        assert_eq!(field.size_for_item(IndexPath::item(2)), Size::ZERO);
        assert!(field.is_terminal_item(IndexPath::item(1)));
        assert!(!field.is_terminal_item(IndexPath::item(0)));
    }

    #[test]
    fn default_token_size_is_clamped_to_content_width() {
        let mut field = field();
        field.append(tokens(&["a very long token title indeed"]), BatchUpdate::immediate());
        field.layout(100.0);
        assert_eq!(field.size_for_item(IndexPath::item(0)).width, 100.0);
    }

    #[test]
    fn text_is_buffered_until_text_field_configured() {
        let mut field = field();
        field.set_text(Some("draft"));
        assert_eq!(field.text(), Some("draft".to_string()));
        assert_eq!(field.pending_text(), &PendingText::Buffered("draft".into()));

        field.layout(300.0);
        let item = field.text_field_item();
        let Some(CellConfiguration::TextField(config)) = field.configure_cell(item) else {
            panic!("expected text field configuration");
        };
        assert_eq!(config.text.as_deref(), Some("draft"));
        assert_eq!(field.pending_text(), &PendingText::Flushed);

        // Flushed once.
        let Some(CellConfiguration::TextField(again)) = field.configure_cell(item) else {
            panic!("expected text field configuration");
        };
        assert_eq!(again.text, None);
    }

    #[test]
    fn set_text_on_loaded_field_fires_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut field = field().on_text_changed(move |text| {
            log.borrow_mut().push(text.map(str::to_owned));
        });
        field.layout(300.0);
        let item = field.text_field_item();
        if let Some(CellConfiguration::TextField(config)) = field.configure_cell(item) {
            field.surface_mut().load_text_field(config);
        }

        field.set_text(Some("bob"));
        assert_eq!(field.text(), Some("bob".to_string()));
        assert_eq!(*seen.borrow(), vec![Some("bob".to_string())]);

        field.surface_mut().type_text("bobby");
        field.text_did_change();
        assert_eq!(seen.borrow().last(), Some(&Some("bobby".to_string())));
    }

    #[test]
    fn focus_flag_is_consumed_by_first_configuration() {
        let mut field = field();
        field.set_focus_text_field_on_load(true);
        field.layout(300.0);
        let item = field.text_field_item();
        let first = field.configure_cell(item);
        assert!(matches!(
            first,
            Some(CellConfiguration::TextField(TextFieldConfiguration {
                become_first_responder: true,
                ..
            }))
        ));
        assert!(!field.focus_text_field_on_load());
    }

    #[test]
    fn configure_cell_describes_label_and_tokens() {
        let mut field = field();
        field.set_label_text(Some("To:".into()));
        field.show_label(BatchUpdate::immediate());
        field.append(tokens(&["alice"]), BatchUpdate::immediate());

        let label = field.configure_cell(IndexPath::item(0)).map(|c| c.kind());
        assert_eq!(label, Some(CellKind::Label));
        match field.configure_cell(IndexPath::item(1)) {
            Some(CellConfiguration::Token { token, .. }) => assert_eq!(token.title(), "alice"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(field.configure_cell(IndexPath::item(9)).is_none());
    }

    #[test]
    fn backspace_in_empty_text_field_focuses_last_token() {
        let mut field = field();
        assert!(!field.text_field_did_delete_backward_when_empty());

        field.append(tokens(&["a", "b"]), BatchUpdate::immediate());
        field.layout(300.0);
        assert!(field.text_field_did_delete_backward_when_empty());
        assert_eq!(field.surface().focus_log(), &[IndexPath::item(1)]);
    }

    #[test]
    fn selecting_only_focuses_tokens() {
        let mut field = field();
        field.append(tokens(&["a"]), BatchUpdate::immediate());
        field.layout(300.0);
        assert!(field.did_select_item(IndexPath::item(0)));
        assert!(!field.did_select_item(IndexPath::item(1)));
        assert_eq!(field.surface().focus_log(), &[IndexPath::item(0)]);
    }

    #[test]
    fn token_removal_request_forwards_fragment_and_focuses_text_field() {
        let mut field = field();
        field.append(tokens(&["a", "a", "b"]), BatchUpdate::immediate());
        field.layout(300.0);
        let item = field.text_field_item();
        if let Some(CellConfiguration::TextField(config)) = field.configure_cell(item) {
            field.surface_mut().load_text_field(config);
        }
        field.surface_mut().clear_events();

        field.token_did_request_removal(IndexPath::item(1), Some("x".into()));
        let titles: Vec<&str> = field.tokens().iter().map(Token::title).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(
            field.surface().events(),
            &[SurfaceEvent::Delete {
                items: vec![IndexPath::item(1)],
                animation: Animation::animated(),
            }]
        );
        assert_eq!(field.text(), Some("x".to_string()));
        assert_eq!(field.surface().focus_log(), &[IndexPath::item(2)]);
    }

    #[test]
    fn setters_invalidate_loaded_layout() {
        let mut field = field();
        field.layout(300.0);
        field.surface_mut().clear_events();

        field.set_item_height(Some(44.0));
        assert!(field.frames().is_none());
        field.set_text_field_min_width(-5.0);
        assert_eq!(field.text_field_min_width(), 0.0);
        assert_eq!(
            field.surface().events(),
            &[SurfaceEvent::InvalidateLayout, SurfaceEvent::InvalidateLayout]
        );

        field.layout(300.0);
        assert_eq!(field.content_height(), Some(44.0));
    }

    #[test]
    fn set_font_clamps_invalid_metrics() {
        let mut field = field();
        field.set_item_height(None);
        field.append(tokens(&["alice"]), BatchUpdate::immediate());
        field.set_font(Font::system(10.0).with_advance(-5.0).with_line_height(f32::NAN));
        assert_eq!(field.font().advance, 0.0);
        assert_eq!(field.font().line_height, 0.0);
        assert!(field.item_height().is_finite());

        let frames = field.layout(300.0).expect("laid out");
        let token = frames.frame(0).expect("token frame");
        assert_eq!(token.width, tokenfield_layout::TOKEN_HORIZONTAL_PADDING);
        assert_eq!(token.height, tokenfield_layout::ITEM_VERTICAL_PADDING);
        assert!(token.y.is_finite());
    }

    #[test]
    fn installing_cell_provider_relayouts_tokens() {
        let mut field = field();
        field.append(tokens(&["ann"]), BatchUpdate::immediate());
        field.layout(300.0);
        let before = field.frames().and_then(|f| f.frame(0)).map(|r| r.width);
        field.surface_mut().clear_events();

        let mut field = field.with_cell_provider(|_: &TextToken, _: &Font| 200.0_f32);
        assert!(field.frames().is_none());
        assert_eq!(field.surface().events(), &[SurfaceEvent::InvalidateLayout]);

        let after = field.layout(300.0).and_then(|f| f.frame(0)).map(|r| r.width);
        assert_ne!(before, after);
        assert_eq!(after, Some(200.0));
        assert_eq!(field.size_for_item(IndexPath::item(0)).width, 200.0);
    }

    #[test]
    fn placeholder_and_return_key_reach_loaded_text_field() {
        let mut field = field();
        field.layout(300.0);
        let item = field.text_field_item();
        if let Some(CellConfiguration::TextField(config)) = field.configure_cell(item) {
            field.surface_mut().load_text_field(config);
        }
        field.set_placeholder(Some("Add".into()));
        field.set_return_key(ReturnKey::Done);
        let cell = field.surface().text_field().expect("loaded text field");
        assert_eq!(cell.placeholder.as_deref(), Some("Add"));
        assert_eq!(cell.return_key, ReturnKey::Done);
    }
}
