//! Property-based invariant tests for the flow engine.
//!
//! 1. Rows cover every item exactly once, in order.
//! 2. No frame leaves the content area horizontally.
//! 3. A row never holds more than fits, except a lone oversized cell.
//! 4. The terminal item ends flush with the content width, never below its minimum.
//! 5. Total height is the sum of row heights plus insets.
//! 6. Re-preparing unchanged content reports no height change.

use proptest::prelude::*;
use tokenfield_layout::{FlowLayout, FlowSource, FlowSpacing, Insets, Size, compute_flow};

const EPS: f32 = 1e-2;

#[derive(Debug, Clone)]
struct Items {
    widths: Vec<f32>,
    height: f32,
}

impl FlowSource for Items {
    fn item_count(&self) -> usize {
        self.widths.len()
    }

    fn item_size(&self, item: usize, _available_width: f32) -> Size {
        Size::new(self.widths[item], self.height)
    }

    fn terminal_item(&self) -> Option<usize> {
        self.widths.len().checked_sub(1)
    }
}

fn items_strategy() -> impl Strategy<Value = Items> {
    (prop::collection::vec(1.0f32..400.0, 1..40), 10.0f32..60.0)
        .prop_map(|(widths, height)| Items { widths, height })
}

fn spacing_strategy() -> impl Strategy<Value = FlowSpacing> {
    (0.0f32..20.0, 0.0f32..20.0, 0.0f32..12.0, 0.0f32..12.0).prop_map(|(v, h, gap, line)| {
        FlowSpacing {
            insets: Insets::symmetric(v, h),
            interitem: gap,
            line,
        }
    })
}

proptest! {
    #[test]
    fn rows_partition_items(items in items_strategy(), spacing in spacing_strategy(), width in 60.0f32..800.0) {
        let frames = compute_flow(&items, width, spacing);
        let mut next = 0;
        for row in frames.rows() {
            prop_assert_eq!(row.items.start, next);
            prop_assert!(row.items.end > row.items.start);
            next = row.items.end;
        }
        prop_assert_eq!(next, items.widths.len());
    }

    #[test]
    fn frames_stay_inside_content(items in items_strategy(), spacing in spacing_strategy(), width in 60.0f32..800.0) {
        let frames = compute_flow(&items, width, spacing);
        let left = spacing.insets.left;
        let right = left + frames.content_width();
        for frame in frames.frames() {
            prop_assert!(frame.x + EPS >= left);
            prop_assert!(frame.right() <= right + EPS, "{frame:?} exceeds {right}");
        }
    }

    #[test]
    fn wrapped_rows_could_not_take_the_next_item(items in items_strategy(), spacing in spacing_strategy(), width in 60.0f32..800.0) {
        let frames = compute_flow(&items, width, spacing);
        let content = frames.content_width();
        let rows = frames.rows();
        for pair in rows.windows(2) {
            let (row, next) = (&pair[0], &pair[1]);
            let used: f32 = row
                .items
                .clone()
                .map(|i| items.widths[i].min(content))
                .sum::<f32>()
                + spacing.interitem * (row.items.len() - 1) as f32;
            let first_next = items.widths[next.items.start].min(content);
            prop_assert!(used + spacing.interitem + first_next > content - EPS);
        }
    }

    #[test]
    fn terminal_item_fills_its_row(items in items_strategy(), spacing in spacing_strategy(), width in 60.0f32..800.0) {
        let frames = compute_flow(&items, width, spacing);
        let last = items.widths.len() - 1;
        let frame = frames.frame(last).unwrap();
        let right = spacing.insets.left + frames.content_width();
        prop_assert!((frame.right() - right).abs() < EPS);
        prop_assert!(frame.width + EPS >= items.widths[last].min(frames.content_width()));
    }

    #[test]
    fn height_is_rows_plus_insets(items in items_strategy(), spacing in spacing_strategy(), width in 60.0f32..800.0) {
        let frames = compute_flow(&items, width, spacing);
        let rows = frames.rows().len() as f32;
        let expected = spacing.insets.vertical_sum()
            + rows * items.height
            + (rows - 1.0) * spacing.line;
        prop_assert!((frames.content_height() - expected).abs() < 0.1);
    }

    #[test]
    fn unchanged_content_reports_once(items in items_strategy(), width in 60.0f32..800.0) {
        let mut layout = FlowLayout::new();
        prop_assert!(layout.prepare(&items, width).is_some());
        layout.invalidate();
        prop_assert!(layout.prepare(&items, width).is_none());
        prop_assert!(layout.prepare(&items, width).is_none());
    }
}

#[test]
fn two_tokens_then_three_tokens() {
    let mut layout = FlowLayout::new();

    let two = Items {
        widths: vec![100.0, 100.0, 80.0],
        height: 40.0,
    };
    let event = layout.prepare(&two, 300.0).unwrap();
    assert_eq!(event.height, 40.0);
    let frames = layout.frames().unwrap();
    assert_eq!(frames.rows().len(), 1);
    assert_eq!(frames.frame(2).unwrap().width, 100.0);

    let three = Items {
        widths: vec![100.0, 100.0, 100.0, 80.0],
        height: 40.0,
    };
    let event = layout.prepare(&three, 300.0).unwrap();
    assert_eq!(event.previous, Some(40.0));
    assert_eq!(event.height, 80.0);
    let frames = layout.frames().unwrap();
    assert_eq!(frames.rows().len(), 2);
    let text_field = frames.frame(3).unwrap();
    assert_eq!((text_field.x, text_field.y, text_field.width), (0.0, 40.0, 300.0));
}
