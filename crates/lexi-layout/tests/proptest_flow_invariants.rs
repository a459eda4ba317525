#![forbid(unsafe_code)]

//! Property-based invariant tests for the flow solver.
//!
//! 1. Rows partition the input run in order, with no gaps
//! 2. A row only exceeds its width when it holds a single glyph
//! 3. Glyphs in a row are contiguous and start inside the row
//! 4. Rows on a page are stacked with the configured spacing
//! 5. Re-flowing with the produced heights is a fixed point
//! 6. Only a page's first row may pass the column bottom, whatever the
//!    prior heights

use lexi_layout::{Alignment, Compositor, Sides, Size};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn alignment_strategy() -> impl Strategy<Value = Alignment> {
    prop_oneof![
        Just(Alignment::Left),
        Just(Alignment::Center),
        Just(Alignment::Right),
        Just(Alignment::Justified),
    ]
}

fn compositor_strategy() -> impl Strategy<Value = Compositor> {
    (
        alignment_strategy(),
        0i32..50,
        (0i32..40, 0i32..40, 0i32..40, 0i32..40),
    )
        .prop_map(|(alignment, spacing, (t, r, b, l))| {
            Compositor::default()
                .page_size(300, 400)
                .margins(Sides::new(t, r, b, l))
                .line_spacing(spacing)
                .alignment(alignment)
        })
}

fn run_strategy() -> impl Strategy<Value = Vec<Size>> {
    proptest::collection::vec(
        (1i32..120, 1i32..80).prop_map(|(w, h)| Size::new(w, h)),
        0..80,
    )
}

fn prior_strategy() -> impl Strategy<Value = Vec<Vec<i32>>> {
    proptest::collection::vec(proptest::collection::vec(0i32..600, 0..12), 0..4)
}

// ═══════════════════════════════════════════════════════════════════════
// Structural invariants
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rows_partition_the_run(compositor in compositor_strategy(), run in run_strategy()) {
        let flow = compositor.flow(&run, &[]);
        prop_assert!(!flow.pages.is_empty());
        let mut next = 0;
        for row in flow.pages.iter().flat_map(|p| p.rows.iter()) {
            prop_assert_eq!(row.items.start, next);
            next = row.items.end;
        }
        prop_assert_eq!(next, run.len());
        prop_assert_eq!(flow.positions.len(), run.len());
    }

    #[test]
    fn overflow_only_for_single_glyph_rows(
        compositor in compositor_strategy(),
        run in run_strategy(),
    ) {
        let flow = compositor.flow(&run, &[]);
        for row in flow.pages.iter().flat_map(|p| p.rows.iter()) {
            let used: i32 = run[row.items.clone()].iter().map(|s| s.width).sum();
            if used > row.bounds.width {
                prop_assert_eq!(row.items.len(), 1);
            }
        }
    }

    #[test]
    fn rows_are_contiguous_and_anchored(
        compositor in compositor_strategy(),
        run in run_strategy(),
    ) {
        let flow = compositor.flow(&run, &[]);
        for row in flow.pages.iter().flat_map(|p| p.rows.iter()) {
            let mut expected_x = None;
            for i in row.items.clone() {
                let pos = flow.positions[i];
                prop_assert_eq!(pos.y, row.bounds.y);
                prop_assert!(pos.x >= row.bounds.x);
                if let Some(x) = expected_x {
                    prop_assert_eq!(pos.x, x);
                }
                expected_x = Some(pos.x + run[i].width);
                prop_assert!(row.bounds.height >= run[i].height);
            }
        }
    }

    #[test]
    fn rows_stack_with_spacing(compositor in compositor_strategy(), run in run_strategy()) {
        let flow = compositor.flow(&run, &[]);
        let spacing = compositor.config().line_spacing;
        for page in &flow.pages {
            prop_assert_eq!(page.rows[0].bounds.y, page.column.y);
            for pair in page.rows.windows(2) {
                prop_assert_eq!(pair[1].bounds.y, pair[0].bounds.bottom() + spacing);
            }
        }
    }

    #[test]
    fn reflow_with_own_heights_is_stable(
        compositor in compositor_strategy(),
        run in run_strategy(),
    ) {
        let first = compositor.flow(&run, &[]);
        let second = compositor.flow(&run, &first.row_heights());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn later_rows_stay_inside_the_column(
        compositor in compositor_strategy(),
        run in run_strategy(),
        prior in prior_strategy(),
    ) {
        let flow = compositor.flow(&run, &prior);
        for page in &flow.pages {
            for row in page.rows.iter().skip(1) {
                prop_assert!(row.bounds.bottom() <= page.column.bottom());
            }
        }
        let again = compositor.flow(&run, &flow.row_heights());
        prop_assert_eq!(flow, again);
    }
}
