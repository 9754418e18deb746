#![forbid(unsafe_code)]

//! A text-mode host for the token field.
//!
//! One layout unit is one terminal column or row. Tokens render as
//! `[title x]`, the label as plain text and the text field as its text (or
//! placeholder) followed by underscores to the end of its frame.

use tokenfield::{
    BatchUpdate, CellConfiguration, Font, HostSurface, IndexPath, Insets, Rect, Responder,
    ReturnKey, TextEntry, TextToken, Token, TokenField, TokenFieldConfig,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Columns a token cell adds around its title: `[`, ` x`, `]`.
pub const TOKEN_DECORATION_COLUMNS: f32 = 4.0;

/// Token field type driven by the terminal host.
pub type TerminalField = TokenField<TextToken, TerminalSurface>;

/// Configuration with one column per character and one row per cell.
pub fn terminal_config() -> TokenFieldConfig {
    TokenFieldConfig::default()
        .with_font(Font::named("monospace", 2.0).with_advance(1.0).with_line_height(1.0))
        .with_item_height(1.0)
        .with_content_insets(Insets::ZERO)
        .with_text_field_min_width(8.0)
        .with_spacing(1.0, 0.0)
}

/// Width of a token cell: the decorated title.
pub fn token_cell_width(token: &TextToken, font: &Font) -> f32 {
    font.text_width(token.title()) + TOKEN_DECORATION_COLUMNS
}

/// Build a terminal field from `config` with decorated token cells.
pub fn terminal_field(config: TokenFieldConfig) -> Result<TerminalField, tokenfield::ConfigError> {
    Ok(TokenField::with_config(TerminalSurface::default(), config)?.with_cell_provider(token_cell_width))
}

/// The loaded text field cell.
#[derive(Debug, Clone, Default)]
pub struct TerminalTextField {
    pub text: Option<String>,
    pub placeholder: Option<String>,
    pub return_key: ReturnKey,
    pub focused: bool,
}

impl Responder for TerminalTextField {
    fn become_first_responder(&mut self) -> bool {
        self.focused = true;
        true
    }
}

impl TextEntry for TerminalTextField {
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

/// Focus target for label and token cells.
#[derive(Debug, Clone, Copy, Default)]
struct FocusCursor {
    target: Option<IndexPath>,
    pending: IndexPath,
}

impl Responder for FocusCursor {
    fn become_first_responder(&mut self) -> bool {
        self.target = Some(self.pending);
        true
    }
}

/// Host surface that tracks cells and renders them as text.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    item_count: usize,
    height: f32,
    text_field: Option<TerminalTextField>,
    cursor: FocusCursor,
}

impl TerminalSurface {
    /// Rows needed for the whole field.
    pub fn rows(&self) -> usize {
        self.height.max(0.0).ceil() as usize
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// The focused item, if a non-text cell has focus.
    pub fn focused_item(&self) -> Option<IndexPath> {
        self.cursor.target
    }

    pub fn text_field(&self) -> Option<&TerminalTextField> {
        self.text_field.as_ref()
    }

    fn apply_text_field(&mut self, config: tokenfield::TextFieldConfiguration) {
        let field = self.text_field.get_or_insert_with(TerminalTextField::default);
        if let Some(text) = config.text {
            field.text = Some(text);
        }
        field.placeholder = config.placeholder;
        field.return_key = config.return_key;
        if config.become_first_responder {
            field.focused = true;
            self.cursor.target = None;
        }
    }

    fn is_text_field(&self, item: IndexPath) -> bool {
        self.item_count > 0 && item.item == self.item_count - 1
    }
}

impl HostSurface for TerminalSurface {
    fn reload_data(&mut self, item_count: usize) {
        tracing::info!(item_count, "reload");
        self.item_count = item_count;
    }

    fn insert_items(&mut self, items: &[IndexPath], update: BatchUpdate) {
        tracing::info!(count = items.len(), animation = ?update.animation(), "insert");
        self.item_count += items.len();
        update.complete(true);
    }

    fn delete_items(&mut self, items: &[IndexPath], update: BatchUpdate) {
        tracing::info!(count = items.len(), animation = ?update.animation(), "delete");
        self.item_count = self.item_count.saturating_sub(items.len());
        if self
            .cursor
            .target
            .is_some_and(|focused| items.contains(&focused))
        {
            self.cursor.target = None;
        }
        update.complete(true);
    }

    fn invalidate_layout(&mut self) {
        tracing::debug!("layout invalidated");
    }

    fn height_changed(&mut self, height: f32) {
        tracing::info!(height, "height changed");
        self.height = height;
    }

    fn responder_at(&mut self, item: IndexPath) -> Option<&mut dyn Responder> {
        if item.item >= self.item_count {
            return None;
        }
        if self.is_text_field(item) {
            self.cursor.target = None;
            return self
                .text_field
                .as_mut()
                .map(|field| field as &mut dyn Responder);
        }
        if let Some(field) = self.text_field.as_mut() {
            field.focused = false;
        }
        self.cursor.pending = item;
        Some(&mut self.cursor)
    }

    fn text_entry(&mut self, item: IndexPath) -> Option<&mut dyn TextEntry> {
        if !self.is_text_field(item) {
            return None;
        }
        self.text_field
            .as_mut()
            .map(|field| field as &mut dyn TextEntry)
    }
}

/// A grid of terminal cells, one grapheme per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: vec![vec![" ".to_string(); width]; height],
        }
    }

    /// Write `text` into `area`, clipped to the area and the grid.
    pub fn put(&mut self, area: Rect, text: &str) {
        let row = area.y.max(0.0) as usize;
        let Some(cells) = self.rows.get_mut(row) else {
            return;
        };
        let start = area.x.max(0.0) as usize;
        let end = (start + area.width.max(0.0) as usize).min(self.width);
        let mut col = start;
        for grapheme in text.graphemes(true) {
            let width = grapheme.width();
            if width == 0 {
                continue;
            }
            if col + width > end {
                break;
            }
            cells[col] = grapheme.to_string();
            for filler in &mut cells[col + 1..col + width] {
                filler.clear();
            }
            col += width;
        }
    }

    /// Rendered lines with trailing spaces removed.
    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|cells| cells.concat().trim_end().to_string())
            .collect()
    }
}

/// Lay out `field` at `width` columns and render it.
pub fn render(field: &mut TerminalField, width: u16) -> Vec<String> {
    let frames: Vec<Rect> = match field.layout(f32::from(width)) {
        Some(frames) => frames.frames().to_vec(),
        None => return Vec::new(),
    };

    let mut grid = Grid::new(usize::from(width), field.surface().rows());
    for (item, frame) in frames.iter().enumerate() {
        let path = IndexPath::item(item);
        let focused = field.surface().focused_item() == Some(path);
        let text = match field.configure_cell(path) {
            Some(CellConfiguration::Label { text, .. }) => text.unwrap_or_default().to_string(),
            Some(CellConfiguration::Token { token, .. }) => {
                let marker = if focused { '*' } else { 'x' };
                format!("[{} {marker}]", token.title())
            }
            Some(CellConfiguration::TextField(config)) => {
                field.surface_mut().apply_text_field(config);
                text_field_contents(field.surface().text_field(), frame.width)
            }
            None => continue,
        };
        grid.put(*frame, &text);
    }
    grid.lines()
}

fn text_field_contents(field: Option<&TerminalTextField>, width: f32) -> String {
    let Some(field) = field else {
        return String::new();
    };
    let shown = field
        .text
        .as_deref()
        .filter(|text| !text.is_empty())
        .or(field.placeholder.as_deref())
        .unwrap_or_default();
    let cursor = if field.focused { "|" } else { "" };
    let used = Font::columns(shown) + cursor.len();
    let fill = (width.max(0.0) as usize).saturating_sub(used);
    format!("{shown}{cursor}{}", "_".repeat(fill))
}
