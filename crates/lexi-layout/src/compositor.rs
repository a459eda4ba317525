#![forbid(unsafe_code)]

//! Row/column/page flow.
//!
//! [`Compositor::flow`] performs a full re-layout of an ordered glyph run:
//!
//! 1. The column sits inside the page margins: origin `(left, top)`, size
//!    `(page_width - left - right, page_height - top - bottom)`.
//! 2. A glyph joins the current row while `used + width <= row width`. An
//!    empty row accepts any glyph, so oversized glyphs overflow in place.
//! 3. Otherwise a new row opens at `previous bottom + line_spacing`. If its
//!    tallest glyph would pass the column bottom, a new page opens instead
//!    and the row starts at the top margin.
//! 4. Row height is `max(tallest glyph, prior height)`, with the prior
//!    height capped at the space left in the column. Prior heights are
//!    supplied by the caller so rows keep their height between re-layouts.
//!    The height decided here is both the one checked against the column
//!    bottom and the one the row gets, so re-flowing with the produced
//!    heights changes nothing.
//! 5. Each row's packed run is offset by [`Alignment::leading_gap`].
//!
//! ```text
//!   page ┌──────────────────────────────┐
//!        │  top margin                  │
//!        │   ┌──────────────────────┐   │
//!        │   │ row 0: a b c d e     │   │
//!        │   │   line spacing       │   │
//!        │   │ row 1: f g           │   │
//!        │   └──────────────────────┘   │
//!        │  bottom margin               │
//!        └──────────────────────────────┘
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::alignment::Alignment;
use lexi_core::geometry::{Point, Rect, Sides};

// =========================================================================
// Configuration
// =========================================================================

/// Layout settings for a document.
///
/// `margins` uses [`Sides`] ordering (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositorConfig {
    pub page_width: i32,
    pub page_height: i32,
    pub margins: Sides,
    pub alignment: Alignment,
    /// Vertical gap between consecutive rows.
    pub line_spacing: i32,
    /// Height of a freshly created row and of characters typed at the cursor.
    pub row_height: i32,
    /// Width of characters typed at the cursor.
    pub char_width: i32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            page_width: 500,
            page_height: 1000,
            margins: Sides::new(10, 40, 20, 30),
            alignment: Alignment::Left,
            line_spacing: 0,
            row_height: 1,
            char_width: 1,
        }
    }
}

impl CompositorConfig {
    /// Clamp every measure to be non-negative.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            page_width: self.page_width.max(0),
            page_height: self.page_height.max(0),
            margins: Sides::new(
                self.margins.top.max(0),
                self.margins.right.max(0),
                self.margins.bottom.max(0),
                self.margins.left.max(0),
            ),
            alignment: self.alignment,
            line_spacing: self.line_spacing.max(0),
            row_height: self.row_height.max(0),
            char_width: self.char_width.max(0),
        }
    }
}

/// Width and height of one glyph in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

// =========================================================================
// Flow output
// =========================================================================

/// One row of a flow result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFlow {
    pub bounds: Rect,
    /// Indices into the input run placed on this row.
    pub items: Range<usize>,
}

impl RowFlow {
    fn open(column: Rect, y: i32, height: i32, start: usize) -> Self {
        Self {
            bounds: Rect::new(column.x, y, column.width, height),
            items: start..start,
        }
    }
}

/// One page of a flow result. Pages hold a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFlow {
    pub bounds: Rect,
    pub column: Rect,
    pub rows: Vec<RowFlow>,
}

/// Result of [`Compositor::flow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    /// Always at least one page, even for an empty run.
    pub pages: Vec<PageFlow>,
    /// Final origin of every input glyph, by input index.
    pub positions: Vec<Point>,
}

impl Flow {
    /// Total row count across pages.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|p| p.rows.len()).sum()
    }

    /// Row heights grouped by page, suitable as `prior` for the next flow.
    #[must_use]
    pub fn row_heights(&self) -> Vec<Vec<i32>> {
        self.pages
            .iter()
            .map(|p| p.rows.iter().map(|r| r.bounds.height).collect())
            .collect()
    }
}

// =========================================================================
// Compositor
// =========================================================================

/// Stateless layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Compositor {
    config: CompositorConfig,
}

impl Compositor {
    /// Create a compositor from a configuration. Negative measures are clamped.
    #[must_use]
    pub fn new(config: CompositorConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    #[must_use]
    pub fn page_size(mut self, width: i32, height: i32) -> Self {
        self.config.page_width = width.max(0);
        self.config.page_height = height.max(0);
        self
    }

    #[must_use]
    pub fn margins(mut self, margins: Sides) -> Self {
        self.config = CompositorConfig {
            margins,
            ..self.config
        }
        .sanitized();
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.config.alignment = alignment;
        self
    }

    #[must_use]
    pub fn line_spacing(mut self, spacing: i32) -> Self {
        self.config.line_spacing = spacing.max(0);
        self
    }

    #[must_use]
    pub fn row_height(mut self, height: i32) -> Self {
        self.config.row_height = height.max(0);
        self
    }

    #[must_use]
    pub fn char_width(mut self, width: i32) -> Self {
        self.config.char_width = width.max(0);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Bounds of a page, at the origin.
    #[must_use]
    pub const fn page_rect(&self) -> Rect {
        Rect::new(0, 0, self.config.page_width, self.config.page_height)
    }

    /// Bounds of the column inside the page margins.
    #[must_use]
    pub fn column_rect(&self) -> Rect {
        self.page_rect().inner(self.config.margins)
    }

    /// Bounds of a freshly created first row.
    #[must_use]
    pub fn first_row_rect(&self) -> Rect {
        let column = self.column_rect();
        Rect::new(column.x, column.y, column.width, self.config.row_height)
    }

    fn prior_height(&self, prior: &[Vec<i32>], page: usize, row: usize) -> i32 {
        prior
            .get(page)
            .and_then(|rows| rows.get(row))
            .copied()
            .unwrap_or(self.config.row_height)
    }

    /// Height a row opening at `y` gets: its tallest glyph, or the prior
    /// height when that is larger and still fits the column.
    fn opening_height(&self, column: Rect, y: i32, seed: i32, run: i32) -> i32 {
        let available = column.bottom().saturating_sub(y).max(0);
        run.max(seed.min(available))
    }

    /// Lay out `items` in order.
    ///
    /// `prior[page][row]` is the height each row had before this pass; rows
    /// without a prior entry start at the configured row height.
    #[must_use]
    pub fn flow(&self, items: &[Size], prior: &[Vec<i32>]) -> Flow {
        let page = self.page_rect();
        let column = self.column_rect();

        let mut pages: Vec<PageFlow> = Vec::new();
        let mut rows: Vec<RowFlow> = Vec::new();
        let mut start = 0;
        let mut y = column.y;
        let mut seed = self.prior_height(prior, 0, 0);

        loop {
            let end = row_end(items, start, column.width);
            let run = items[start..end]
                .iter()
                .map(|s| s.height)
                .max()
                .unwrap_or(0);
            let mut opening = self.opening_height(column, y, seed, run);
            if !rows.is_empty() && y.saturating_add(opening) > column.bottom() {
                pages.push(PageFlow {
                    bounds: page,
                    column,
                    rows: std::mem::take(&mut rows),
                });
                y = column.y;
                seed = self.prior_height(prior, pages.len(), 0);
                opening = self.opening_height(column, y, seed, run);
            }
            let mut row = RowFlow::open(column, y, opening, start);
            row.items.end = end;
            y = row
                .bounds
                .bottom()
                .saturating_add(self.config.line_spacing);
            rows.push(row);
            if end >= items.len() {
                break;
            }
            start = end;
            seed = self.prior_height(prior, pages.len(), rows.len());
        }
        pages.push(PageFlow {
            bounds: page,
            column,
            rows,
        });

        let mut positions = vec![Point::default(); items.len()];
        for row in pages.iter().flat_map(|p| p.rows.iter()) {
            self.place_row(row, items, &mut positions);
        }

        tracing::debug!(
            target: "lexi.compose",
            glyphs = items.len(),
            pages = pages.len(),
            alignment = %self.config.alignment,
            "flow complete"
        );

        Flow { pages, positions }
    }

    fn place_row(&self, row: &RowFlow, items: &[Size], positions: &mut [Point]) {
        let total = items[row.items.clone()]
            .iter()
            .fold(0i32, |sum, s| sum.saturating_add(s.width));
        let gap = self
            .config
            .alignment
            .leading_gap(row.bounds.width.saturating_sub(total));
        let mut x = row.bounds.x.saturating_add(gap);
        for index in row.items.clone() {
            positions[index] = Point::new(x, row.bounds.y);
            x = x.saturating_add(items[index].width);
        }
    }
}

/// End of the greedy row starting at `start`. A row takes glyphs while they
/// fit `width`, and always takes at least one.
fn row_end(items: &[Size], start: usize, width: i32) -> usize {
    let mut used = 0i32;
    let mut end = start;
    for item in &items[start..] {
        let next = used.saturating_add(item.width);
        if end > start && next > width {
            break;
        }
        used = next;
        end += 1;
    }
    end
}
