#![forbid(unsafe_code)]

//! Flow/wrap layout engine.
//!
//! Cells are placed left to right and wrap onto a new row when the next cell
//! (plus inter-item spacing) would overflow the content width. The owner
//! designates one *terminal* item, normally the text field, which receives
//! whatever width is left on its row after every other cell is placed.
//!
//! [`FlowLayout`] is the stateful wrapper used by a host: it runs full
//! passes on demand, keeps the last computed [`FlowFrames`], and reports a
//! [`HeightChanged`] event whenever the total content height moves.
//!
//! # Invalidation
//!
//! A pass is reused only while the available width and item count stay the
//! same. Anything else that affects sizes (fonts, item height, token
//! content) must be followed by [`FlowLayout::invalidate`].

use std::ops::Range;

use tokenfield_core::{Insets, Rect, Size};

use crate::cell::CellDescriptor;
use crate::sizing::CellSizer;

/// Slack allowed when deciding whether a cell still fits on a row.
const FIT_EPSILON: f32 = 1e-3;

/// Height differences below this are not reported.
const HEIGHT_EPSILON: f32 = 1e-3;

/// Supplies item counts and sizes to the flow engine.
pub trait FlowSource {
    /// Number of cells to lay out.
    fn item_count(&self) -> usize;

    /// Preferred size of `item` given the content width of the row area.
    fn item_size(&self, item: usize, available_width: f32) -> Size;

    /// The item that absorbs leftover row width, if any.
    fn terminal_item(&self) -> Option<usize>;
}

/// A list of cell descriptors sized by a [`CellSizer`].
///
/// The terminal item is the text field cell.
#[derive(Debug, Clone, Copy)]
pub struct CellList<'a> {
    cells: &'a [CellDescriptor<'a>],
    sizer: CellSizer<'a>,
}

impl<'a> CellList<'a> {
    pub fn new(cells: &'a [CellDescriptor<'a>], sizer: CellSizer<'a>) -> Self {
        Self { cells, sizer }
    }
}

impl FlowSource for CellList<'_> {
    fn item_count(&self) -> usize {
        self.cells.len()
    }

    fn item_size(&self, item: usize, available_width: f32) -> Size {
        self.cells
            .get(item)
            .map_or(Size::ZERO, |cell| self.sizer.size(cell, available_width))
    }

    fn terminal_item(&self) -> Option<usize> {
        self.cells
            .iter()
            .rposition(|cell| matches!(cell, CellDescriptor::TextField))
    }
}

/// Spacing configuration for a flow pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowSpacing {
    /// Insets around the rows.
    pub insets: Insets,
    /// Horizontal gap between neighbouring cells on a row.
    pub interitem: f32,
    /// Vertical gap between rows.
    pub line: f32,
}

/// One wrapped row.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRow {
    /// Items placed on this row.
    pub items: Range<usize>,
    /// Top edge of the row.
    pub y: f32,
    /// Row height (tallest item).
    pub height: f32,
}

/// Result of one full layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowFrames {
    available_width: f32,
    content_width: f32,
    frames: Vec<Rect>,
    rows: Vec<FlowRow>,
    content_height: f32,
}

impl FlowFrames {
    /// Width the pass was computed for.
    pub fn available_width(&self) -> f32 {
        self.available_width
    }

    /// Width available to cells (available width minus horizontal insets).
    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    /// Total height including insets.
    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// Overall content size.
    pub fn content_size(&self) -> Size {
        Size::new(self.available_width, self.content_height)
    }

    /// Number of laid-out items.
    pub fn item_count(&self) -> usize {
        self.frames.len()
    }

    /// All frames, indexed by item.
    pub fn frames(&self) -> &[Rect] {
        &self.frames
    }

    /// Frame of `item`.
    pub fn frame(&self, item: usize) -> Option<Rect> {
        self.frames.get(item).copied()
    }

    /// Rows, top to bottom.
    pub fn rows(&self) -> &[FlowRow] {
        &self.rows
    }

    /// Index of the row containing `item`.
    pub fn row_of(&self, item: usize) -> Option<usize> {
        self.rows.iter().position(|row| row.items.contains(&item))
    }

    /// Items whose frames intersect `rect`, in order.
    pub fn items_in(&self, rect: Rect) -> impl Iterator<Item = usize> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter(move |(_, frame)| frame.intersects(&rect))
            .map(|(item, _)| item)
    }
}

/// Run one full pass over `source`.
///
/// This is the pure core of [`FlowLayout`]; it keeps no state between calls.
pub fn compute_flow<S: FlowSource + ?Sized>(
    source: &S,
    available_width: f32,
    spacing: FlowSpacing,
) -> FlowFrames {
    let insets = spacing.insets;
    let content_width = (available_width - insets.horizontal_sum()).max(0.0);
    let count = source.item_count();
    let terminal = source.terminal_item().filter(|&item| item < count);

    let mut frames: Vec<Rect> = Vec::with_capacity(count);
    let mut rows: Vec<FlowRow> = Vec::new();
    let mut row = RowCursor::new(0, insets.top);

    for item in 0..count {
        let size = source
            .item_size(item, content_width)
            .clamp_width(content_width);

        let mut x = if item == row.start {
            0.0
        } else {
            row.end_x + spacing.interitem
        };

        // A cell alone on its row never wraps further.
        if item > row.start && x + size.width > content_width + FIT_EPSILON {
            let next_y = row.y + row.height + spacing.line;
            rows.push(row.finish(item, &mut frames, terminal, content_width));
            row = RowCursor::new(item, next_y);
            x = 0.0;
        }

        frames.push(Rect::new(
            insets.left + x,
            row.y,
            size.width,
            size.height,
        ));
        row.end_x = x + size.width;
        row.height = row.height.max(size.height);
    }

    if count > 0 {
        rows.push(row.finish(count, &mut frames, terminal, content_width));
    }

    let content_height = rows
        .last()
        .map_or(insets.vertical_sum(), |last| {
            last.y + last.height + insets.bottom
        });

    FlowFrames {
        available_width,
        content_width,
        frames,
        rows,
        content_height,
    }
}

/// Lay out a list of cell descriptors in one call.
pub fn layout_cells(
    cells: &[CellDescriptor<'_>],
    sizer: CellSizer<'_>,
    available_width: f32,
    spacing: FlowSpacing,
) -> FlowFrames {
    compute_flow(&CellList::new(cells, sizer), available_width, spacing)
}

/// Row under construction.
struct RowCursor {
    start: usize,
    y: f32,
    end_x: f32,
    height: f32,
}

impl RowCursor {
    fn new(start: usize, y: f32) -> Self {
        Self {
            start,
            y,
            end_x: 0.0,
            height: 0.0,
        }
    }

    /// Stretch the terminal item if it sits on this row, then center every
    /// item vertically within the row height.
    fn finish(
        &self,
        end: usize,
        frames: &mut [Rect],
        terminal: Option<usize>,
        content_width: f32,
    ) -> FlowRow {
        let items = self.start..end;

        if let Some(terminal) = terminal.filter(|t| items.contains(t)) {
            let leftover = (content_width - self.end_x).max(0.0);
            if leftover > 0.0 {
                frames[terminal].width += leftover;
                for frame in &mut frames[terminal + 1..end] {
                    frame.x += leftover;
                }
            }
        }

        for frame in &mut frames[items.clone()] {
            frame.y = self.y + (self.height - frame.height) / 2.0;
        }

        FlowRow {
            items,
            y: self.y,
            height: self.height,
        }
    }
}

/// Emitted when a pass changes the total content height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightChanged {
    /// Height recorded by the previous pass, `None` on the first pass.
    pub previous: Option<f32>,
    /// New total height.
    pub height: f32,
}

/// Lifecycle of the engine's layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FlowState {
    /// No layout computed, or the last one was invalidated.
    #[default]
    Idle,
    /// A pass is running.
    Computing,
    /// Rows and frames are final for the recorded width and item count.
    Computed(FlowFrames),
}

/// Stateful flow layout that reports height changes.
#[derive(Debug, Clone, Default)]
pub struct FlowLayout {
    spacing: FlowSpacing,
    state: FlowState,
    recorded_height: Option<f32>,
}

impl FlowLayout {
    /// Create an idle layout with zero insets and spacing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set content insets (builder).
    #[must_use]
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.spacing.insets = insets;
        self
    }

    /// Set inter-item spacing (builder).
    #[must_use]
    pub fn with_interitem_spacing(mut self, spacing: f32) -> Self {
        self.spacing.interitem = spacing;
        self
    }

    /// Set line spacing (builder).
    #[must_use]
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.spacing.line = spacing;
        self
    }

    /// Current spacing.
    pub fn spacing(&self) -> FlowSpacing {
        self.spacing
    }

    /// Content insets.
    pub fn insets(&self) -> Insets {
        self.spacing.insets
    }

    /// Change content insets and invalidate.
    pub fn set_insets(&mut self, insets: Insets) {
        if self.spacing.insets != insets {
            self.spacing.insets = insets;
            self.invalidate();
        }
    }

    /// Change inter-item and line spacing and invalidate.
    pub fn set_spacing(&mut self, interitem: f32, line: f32) {
        if self.spacing.interitem != interitem || self.spacing.line != line {
            self.spacing.interitem = interitem;
            self.spacing.line = line;
            self.invalidate();
        }
    }

    /// Drop the computed layout so the next [`prepare`](Self::prepare) runs
    /// a full pass. The recorded height is kept.
    pub fn invalidate(&mut self) {
        self.state = FlowState::Idle;
    }

    /// Current state.
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Computed frames, if a valid pass exists.
    pub fn frames(&self) -> Option<&FlowFrames> {
        match &self.state {
            FlowState::Computed(frames) => Some(frames),
            FlowState::Idle | FlowState::Computing => None,
        }
    }

    /// Height recorded by the last pass.
    pub fn recorded_height(&self) -> Option<f32> {
        self.recorded_height
    }

    /// Whether a pass is required for this width and item count.
    pub fn needs_layout(&self, available_width: f32, item_count: usize) -> bool {
        match &self.state {
            FlowState::Computed(frames) => {
                frames.available_width != available_width || frames.item_count() != item_count
            }
            FlowState::Idle | FlowState::Computing => true,
        }
    }

    /// Ensure a valid layout for `available_width`, running a full pass if
    /// needed. Returns a [`HeightChanged`] event when the total height
    /// differs from the recorded one.
    pub fn prepare<S: FlowSource + ?Sized>(
        &mut self,
        source: &S,
        available_width: f32,
    ) -> Option<HeightChanged> {
        let count = source.item_count();
        if !self.needs_layout(available_width, count) {
            return None;
        }

        let span = tokenfield_core::debug_span!(
            "flow_layout.prepare",
            items = count,
            width = available_width
        );
        let _guard = span.enter();

        self.state = FlowState::Computing;
        let frames = compute_flow(source, available_width, self.spacing);
        let height = frames.content_height();
        let rows = frames.rows().len();
        self.state = FlowState::Computed(frames);

        let previous = self.recorded_height;
        let changed = previous.is_none_or(|prev| (prev - height).abs() > HEIGHT_EPSILON);
        if !changed {
            return None;
        }

        tokenfield_core::debug!(?previous, height, rows, "content height changed");
        #[cfg(not(feature = "tracing"))]
        let _ = rows;
        self.recorded_height = Some(height);
        Some(HeightChanged { previous, height })
    }
}
