#![forbid(unsafe_code)]

//! View-model for the token field.
//!
//! Owns the [`TokenStore`] and the presentation flags, and derives the cell
//! sequence the host renders:
//!
//! ```text
//! [Label]? Token* TextField
//! ```
//!
//! Token index `i` lives at item `label_offset() + i`. The text field is
//! always the last item.

use std::collections::BTreeSet;

use tokenfield_core::{Font, Size};
use tokenfield_layout::{CellDescriptor, CellKind, CellSizer, DEFAULT_TEXT_FIELD_MIN_WIDTH, IndexPath};

use crate::store::TokenStore;
use crate::token::{Token, TokenCellProvider};

/// One cell in the rendered sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a, T> {
    Label,
    Token(&'a T),
    TextField,
}

impl<T> Cell<'_, T> {
    /// Kind of this cell.
    pub const fn kind(&self) -> CellKind {
        match self {
            Self::Label => CellKind::Label,
            Self::Token(_) => CellKind::Token,
            Self::TextField => CellKind::TextField,
        }
    }
}

/// Tokens plus presentation state.
#[derive(Debug, Clone)]
pub struct TokenFieldViewModel<T> {
    store: TokenStore<T>,
    is_showing_label: bool,
    label_text: Option<String>,
    font: Font,
    custom_item_height: Option<f32>,
    text_field_min_width: f32,
}

impl<T> Default for TokenFieldViewModel<T> {
    fn default() -> Self {
        Self {
            store: TokenStore::new(),
            is_showing_label: false,
            label_text: None,
            font: Font::default(),
            custom_item_height: None,
            text_field_min_width: DEFAULT_TEXT_FIELD_MIN_WIDTH,
        }
    }
}

impl<T> TokenFieldViewModel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Presentation state ---

    pub fn tokens(&self) -> &[T] {
        self.store.as_slice()
    }

    pub fn store(&self) -> &TokenStore<T> {
        &self.store
    }

    pub fn is_showing_label(&self) -> bool {
        self.is_showing_label
    }

    /// Set label visibility. Returns `true` if it changed.
    pub fn set_showing_label(&mut self, visible: bool) -> bool {
        let changed = self.is_showing_label != visible;
        self.is_showing_label = visible;
        changed
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label_text.as_deref()
    }

    pub fn set_label_text(&mut self, text: Option<String>) {
        self.label_text = text;
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    pub fn custom_item_height(&self) -> Option<f32> {
        self.custom_item_height
    }

    pub fn set_custom_item_height(&mut self, height: Option<f32>) {
        self.custom_item_height = height;
    }

    /// Effective item height shared by every cell.
    pub fn item_height(&self) -> f32 {
        self.sizer().item_height()
    }

    pub fn text_field_min_width(&self) -> f32 {
        self.text_field_min_width
    }

    pub fn set_text_field_min_width(&mut self, width: f32) {
        self.text_field_min_width = width;
    }

    /// Sizer for the current presentation state.
    pub fn sizer(&self) -> CellSizer<'_> {
        CellSizer::new(&self.font, self.custom_item_height, self.text_field_min_width)
    }

    // --- Index mapping ---

    /// Number of items before the first token.
    pub fn label_offset(&self) -> usize {
        usize::from(self.is_showing_label)
    }

    /// Label (0 or 1) + tokens + text field.
    pub fn number_of_items(&self) -> usize {
        self.label_offset() + self.store.len() + 1
    }

    /// Where the label is (or would be inserted).
    pub fn label_item(&self) -> IndexPath {
        IndexPath::item(0)
    }

    pub fn text_field_item(&self) -> IndexPath {
        IndexPath::item(self.label_offset() + self.store.len())
    }

    /// Item of the last token, `None` with no tokens.
    pub fn last_token_item(&self) -> Option<IndexPath> {
        self.store
            .len()
            .checked_sub(1)
            .map(|index| self.item_for_token(index))
    }

    /// Item position of token `index`.
    pub fn item_for_token(&self, index: usize) -> IndexPath {
        IndexPath::item(self.label_offset() + index)
    }

    /// Token index at `item`, if `item` is a token cell.
    pub fn token_index(&self, item: IndexPath) -> Option<usize> {
        if item.section != 0 {
            return None;
        }
        item.item
            .checked_sub(self.label_offset())
            .filter(|&index| index < self.store.len())
    }

    /// Kind of cell at `item`, `None` when out of range.
    pub fn cell_kind(&self, item: IndexPath) -> Option<CellKind> {
        self.cell(item).map(|cell| cell.kind())
    }

    /// Cell at `item`, `None` when out of range.
    pub fn cell(&self, item: IndexPath) -> Option<Cell<'_, T>> {
        if item.section != 0 || item.item >= self.number_of_items() {
            return None;
        }
        if self.is_showing_label && item.item == 0 {
            return Some(Cell::Label);
        }
        if item == self.text_field_item() {
            return Some(Cell::TextField);
        }
        self.token(item).map(Cell::Token)
    }

    /// The token shown at `item`.
    pub fn token(&self, item: IndexPath) -> Option<&T> {
        self.token_index(item).and_then(|index| self.store.get(index))
    }

    /// Every cell in order.
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_, T>> + '_ {
        let label = self.is_showing_label.then_some(Cell::Label);
        label
            .into_iter()
            .chain(self.store.iter().map(Cell::Token))
            .chain(std::iter::once(Cell::TextField))
    }

    // --- Mutations ---

    /// Append tokens and return their item positions.
    pub fn append(&mut self, tokens: impl IntoIterator<Item = T>) -> Vec<IndexPath> {
        let offset = self.label_offset();
        self.store
            .append(tokens)
            .map(|index| IndexPath::item(offset + index))
            .collect()
    }

    /// Remove tokens by index; returns removed item positions, descending.
    pub fn remove_at_indexes(&mut self, indexes: impl IntoIterator<Item = usize>) -> Vec<IndexPath> {
        let offset = self.label_offset();
        self.store
            .remove_at_indexes(indexes)
            .into_iter()
            .map(|index| IndexPath::item(offset + index))
            .collect()
    }

    /// Remove tokens by item position; non-token items are skipped.
    pub fn remove_at_items(&mut self, items: &[IndexPath]) -> Vec<IndexPath> {
        let indexes: BTreeSet<usize> = items
            .iter()
            .filter_map(|&item| self.token_index(item))
            .collect();
        self.remove_at_indexes(indexes)
    }
}

impl<T: Token> TokenFieldViewModel<T> {
    /// Remove tokens by value; returns removed item positions, descending.
    pub fn remove(&mut self, tokens: &[T]) -> Vec<IndexPath> {
        let offset = self.label_offset();
        self.store
            .remove_matching(tokens)
            .into_iter()
            .map(|index| IndexPath::item(offset + index))
            .collect()
    }

    // --- Sizing ---

    /// Intrinsic label size.
    pub fn label_size(&self) -> Size {
        self.sizer().label_size(self.label_text().unwrap_or_default())
    }

    /// Text field minimum size.
    pub fn text_field_min_size(&self) -> Size {
        self.sizer().text_field_min_size()
    }

    /// Default (non-custom) token size.
    pub fn default_token_size(&self, token: &T, available_width: f32) -> Size {
        self.sizer().default_token_size(token.title(), available_width)
    }

    /// Sizing descriptor for `item`.
    pub fn descriptor(
        &self,
        item: IndexPath,
        provider: Option<&dyn TokenCellProvider<T>>,
    ) -> Option<CellDescriptor<'_>> {
        let descriptor = match self.cell(item)? {
            Cell::Label => CellDescriptor::Label {
                text: self.label_text().unwrap_or_default(),
            },
            Cell::TextField => CellDescriptor::TextField,
            Cell::Token(token) => CellDescriptor::Token {
                title: token.title(),
                custom_width: provider.map(|p| p.token_cell_width(token, &self.font)),
            },
        };
        Some(descriptor)
    }

    /// Size of `item`, or [`Size::ZERO`] when `item` is out of range.
    pub fn size_for_item(
        &self,
        item: IndexPath,
        available_width: f32,
        provider: Option<&dyn TokenCellProvider<T>>,
    ) -> Size {
        match self.descriptor(item, provider) {
            Some(descriptor) => self.sizer().size(&descriptor, available_width),
            None => {
                // Hosts only ask for items they were told about.
                tokenfield_core::warn!(%item, items = self.number_of_items(), "size requested for unknown item");
                Size::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TextToken;

    fn vm(tokens: &[&str]) -> TokenFieldViewModel<TextToken> {
        let mut vm = TokenFieldViewModel::new();
        vm.set_font(Font::system(10.0));
        vm.append(tokens.iter().map(|t| TextToken::new(*t)));
        vm
    }

    #[test]
    fn counts_without_label() {
        let vm = vm(&["a", "b"]);
        assert_eq!(vm.number_of_items(), 3);
        assert_eq!(vm.text_field_item(), IndexPath::item(2));
        assert_eq!(vm.last_token_item(), Some(IndexPath::item(1)));
        assert_eq!(vm.cell_kind(IndexPath::item(0)), Some(CellKind::Token));
        assert_eq!(vm.cell_kind(IndexPath::item(2)), Some(CellKind::TextField));
        assert_eq!(vm.cell_kind(IndexPath::item(3)), None);
    }

    #[test]
    fn label_shifts_tokens_by_one() {
        let mut vm = vm(&["a", "b"]);
        assert!(vm.set_showing_label(true));
        assert!(!vm.set_showing_label(true));
        assert_eq!(vm.number_of_items(), 4);
        assert_eq!(vm.cell_kind(IndexPath::item(0)), Some(CellKind::Label));
        assert_eq!(vm.token(IndexPath::item(1)).map(Token::title), Some("a"));
        assert_eq!(vm.token(IndexPath::item(0)), None);
        assert_eq!(vm.token(IndexPath::item(3)), None);
        assert_eq!(vm.text_field_item(), IndexPath::item(3));
        assert_eq!(vm.label_item(), IndexPath::item(0));
    }

    #[test]
    fn no_tokens_means_no_last_token() {
        let vm = vm(&[]);
        assert_eq!(vm.last_token_item(), None);
        assert_eq!(vm.number_of_items(), 1);
        assert_eq!(vm.cell_kind(IndexPath::item(0)), Some(CellKind::TextField));
    }

    #[test]
    fn other_sections_are_out_of_range() {
        let vm = vm(&["a"]);
        let path = IndexPath { section: 1, item: 0 };
        assert_eq!(vm.cell_kind(path), None);
        assert_eq!(vm.token(path), None);
    }

    #[test]
    fn append_positions_account_for_label() {
        let mut vm = vm(&["a"]);
        vm.set_showing_label(true);
        let paths = vm.append([TextToken::new("b"), TextToken::new("c")]);
        assert_eq!(paths, vec![IndexPath::item(2), IndexPath::item(3)]);
    }

    #[test]
    fn remove_by_value_returns_descending_items() {
        let mut vm = vm(&["t1", "t2"]);
        vm.set_showing_label(true);
        let removed = vm.remove(&[TextToken::new("t2"), TextToken::new("t1")]);
        assert_eq!(removed, vec![IndexPath::item(2), IndexPath::item(1)]);
        assert_eq!(vm.number_of_items(), 2);
    }

    #[test]
    fn remove_at_items_skips_label_and_text_field() {
        let mut vm = vm(&["a", "b", "c"]);
        vm.set_showing_label(true);
        let removed = vm.remove_at_items(&[
            IndexPath::item(0),
            IndexPath::item(2),
            IndexPath::item(4),
            IndexPath::item(9),
        ]);
        assert_eq!(removed, vec![IndexPath::item(2)]);
        let titles: Vec<&str> = vm.tokens().iter().map(Token::title).collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[test]
    fn remove_at_indexes_translates_to_items() {
        let mut vm = vm(&["a", "b", "c"]);
        vm.set_showing_label(true);
        assert_eq!(
            vm.remove_at_indexes([0, 2, 5]),
            vec![IndexPath::item(3), IndexPath::item(1)]
        );
    }

    #[test]
    fn cells_follow_positional_order() {
        let mut vm = vm(&["a", "b"]);
        vm.set_showing_label(true);
        let kinds: Vec<CellKind> = vm.cells().map(|cell| cell.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                CellKind::Label,
                CellKind::Token,
                CellKind::Token,
                CellKind::TextField
            ]
        );
    }

    #[test]
    fn sizes_per_cell_kind() {
        let mut vm = vm(&["alice"]);
        vm.set_showing_label(true);
        vm.set_label_text(Some("To:".into()));
        vm.set_text_field_min_width(80.0);

        assert_eq!(vm.item_height(), 24.0);
        assert_eq!(vm.size_for_item(IndexPath::item(0), 300.0, None), Size::new(15.0, 24.0));
        assert_eq!(vm.size_for_item(IndexPath::item(1), 300.0, None), Size::new(41.0, 24.0));
        assert_eq!(vm.size_for_item(IndexPath::item(2), 300.0, None), Size::new(80.0, 24.0));
        assert_eq!(vm.size_for_item(IndexPath::item(3), 300.0, None), Size::ZERO);
    }

    #[test]
    fn custom_provider_overrides_token_width() {
        let vm = vm(&["alice"]);
        let provider = |_: &TextToken, _: &Font| 99.0_f32;
        let size = vm.size_for_item(IndexPath::item(0), 300.0, Some(&provider));
        assert_eq!(size, Size::new(99.0, 24.0));
    }

    #[test]
    fn custom_item_height_applies_to_every_cell() {
        let mut vm = vm(&["a"]);
        vm.set_custom_item_height(Some(44.0));
        assert_eq!(vm.label_size().height, 44.0);
        assert_eq!(vm.text_field_min_size().height, 44.0);
        assert_eq!(vm.default_token_size(&TextToken::new("a"), 300.0).height, 44.0);
    }
}
