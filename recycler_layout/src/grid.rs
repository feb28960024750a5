// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid layout with per-item column spans.
//!
//! Items are packed into rows of `span_count` columns. Each item occupies
//! [`SpanSizeLookup::span_size`] consecutive columns; an item that does not
//! fit in the remainder of a row starts the next one. Row extents along the
//! main axis track the tallest measured item in the row.

use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;

use crate::model::first_index_ending_after;
use crate::{ExtentModel, ItemFrame, LayoutStrategy, MeasuredExtentModel};

/// Number of columns each position spans.
pub trait SpanSizeLookup {
    /// Columns taken by `position`, given `span_count` columns per row.
    ///
    /// Values are clamped into `1..=span_count`.
    fn span_size(&self, position: usize, span_count: usize) -> usize;
}

/// Every item takes a single column.
#[derive(Copy, Clone, Debug, Default)]
pub struct UniformSpan;

impl SpanSizeLookup for UniformSpan {
    fn span_size(&self, _position: usize, _span_count: usize) -> usize {
        1
    }
}

impl<F: Fn(usize) -> usize> SpanSizeLookup for F {
    fn span_size(&self, position: usize, _span_count: usize) -> usize {
        self(position)
    }
}

/// Row/column packing of items with optional multi-column spans.
pub struct GridLayout<L = UniformSpan> {
    span_count: NonZeroUsize,
    lookup: L,
    rows: MeasuredExtentModel,
    row_estimate: f64,
    viewport_cross: f64,
    // Per item.
    item_row: Vec<usize>,
    item_column: Vec<usize>,
    item_span: Vec<usize>,
    measured: Vec<Option<f64>>,
    // Per row: first position in the row.
    row_first: Vec<usize>,
}

impl<L> fmt::Debug for GridLayout<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridLayout")
            .field("span_count", &self.span_count)
            .field("rows", &self.row_first.len())
            .field("items", &self.item_row.len())
            .finish_non_exhaustive()
    }
}

impl GridLayout<UniformSpan> {
    /// Creates a grid with `span_count` single-column items per row.
    ///
    /// `row_estimate` is the main-axis extent assumed for rows that have not
    /// been measured yet.
    #[must_use]
    pub fn new(span_count: NonZeroUsize, row_estimate: f64) -> Self {
        Self::with_span_lookup(span_count, row_estimate, UniformSpan)
    }
}

impl<L: SpanSizeLookup> GridLayout<L> {
    /// Creates a grid whose item spans come from `lookup`.
    #[must_use]
    pub fn with_span_lookup(span_count: NonZeroUsize, row_estimate: f64, lookup: L) -> Self {
        Self {
            span_count,
            lookup,
            rows: MeasuredExtentModel::new(row_estimate),
            row_estimate,
            viewport_cross: 0.0,
            item_row: Vec::new(),
            item_column: Vec::new(),
            item_span: Vec::new(),
            measured: Vec::new(),
            row_first: Vec::new(),
        }
    }

    /// Number of columns per row.
    #[must_use]
    pub const fn span_count(&self) -> usize {
        self.span_count.get()
    }

    /// Changes the number of columns per row and repacks every item.
    pub fn set_span_count(&mut self, span_count: NonZeroUsize) {
        if span_count != self.span_count {
            self.span_count = span_count;
            self.assign();
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_first.len()
    }

    /// Row that `position` was packed into.
    #[must_use]
    pub fn row_of(&self, position: usize) -> Option<usize> {
        self.item_row.get(position).copied()
    }

    /// Column that `position` starts in.
    #[must_use]
    pub fn column_of(&self, position: usize) -> Option<usize> {
        self.item_column.get(position).copied()
    }

    /// Re-runs span lookups for every item, for use after the lookup's answers changed.
    pub fn invalidate_spans(&mut self) {
        self.assign();
    }

    fn cell_extent(&self) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Column counts are small"
        )]
        let columns = self.span_count.get() as f64;
        self.viewport_cross / columns
    }

    fn row_range(&self, row: usize) -> core::ops::Range<usize> {
        let start = self.row_first.get(row).copied().unwrap_or(self.item_row.len());
        let end = self
            .row_first
            .get(row + 1)
            .copied()
            .unwrap_or(self.item_row.len());
        start..end
    }

    /// Packs items into rows and rebuilds row extents from known measurements.
    fn assign(&mut self) {
        let count = self.measured.len();
        let columns = self.span_count.get();
        self.item_row.clear();
        self.item_column.clear();
        self.item_span.clear();
        self.row_first.clear();

        let mut column = 0;
        for position in 0..count {
            let span = self.lookup.span_size(position, columns).clamp(1, columns);
            if column + span > columns || self.row_first.is_empty() {
                column = 0;
                self.row_first.push(position);
            }
            self.item_row.push(self.row_first.len() - 1);
            self.item_column.push(column);
            self.item_span.push(span);
            column += span;
        }

        self.rows = MeasuredExtentModel::new(self.row_estimate);
        self.rows.set_len(self.row_first.len());
        for row in 0..self.row_first.len() {
            self.refresh_row(row);
        }
        tracing::trace!(
            target: crate::TARGET,
            items = count,
            rows = self.row_first.len(),
            "packed grid rows"
        );
    }

    fn refresh_row(&mut self, row: usize) -> bool {
        let tallest = self.row_range(row).filter_map(|p| self.measured[p]).reduce(f64::max);
        match tallest {
            Some(extent) => self.rows.set_extent(row, extent),
            None => false,
        }
    }
}

impl<L: SpanSizeLookup> LayoutStrategy for GridLayout<L> {
    fn prepare(&mut self, item_count: usize, viewport_cross: f64) {
        self.viewport_cross = viewport_cross;
        if self.measured.len() != item_count {
            self.measured.resize(item_count, None);
            self.assign();
        }
    }

    fn item_count(&self) -> usize {
        self.item_row.len()
    }

    fn content_extent(&mut self) -> f64 {
        self.rows.total_extent()
    }

    fn first_position_at(&mut self, offset: f64) -> usize {
        if self.row_first.is_empty() {
            return 0;
        }
        let row = first_index_ending_after(&mut self.rows, offset);
        self.row_first[row]
    }

    fn frame_of(&mut self, position: usize) -> ItemFrame {
        let Some(&row) = self.item_row.get(position) else {
            return ItemFrame {
                main_start: self.rows.total_extent(),
                ..ItemFrame::default()
            };
        };
        let cell = self.cell_extent();
        #[allow(
            clippy::cast_precision_loss,
            reason = "Column counts are small"
        )]
        let (column, span) = (
            self.item_column[position] as f64,
            self.item_span[position] as f64,
        );
        ItemFrame {
            main_start: self.rows.offset_of(row),
            main_extent: self.rows.extent_of(row),
            cross_start: column * cell,
            cross_extent: span * cell,
        }
    }

    fn cross_constraint(&mut self, position: usize) -> f64 {
        self.frame_of(position).cross_extent
    }

    fn set_measured_extent(&mut self, position: usize, extent: f64) -> bool {
        let Some(&row) = self.item_row.get(position) else {
            return false;
        };
        self.measured[position] = Some(extent);
        self.refresh_row(row)
    }

    fn anchor_for(&mut self, position: usize) -> usize {
        self.item_row
            .get(position)
            .map_or(position, |&row| self.row_first[row])
    }

    fn move_item(&mut self, from: usize, to: usize) {
        let len = self.measured.len();
        if from >= len || to >= len || from == to {
            return;
        }
        if from < to {
            self.measured[from..=to].rotate_left(1);
        } else {
            self.measured[to..=from].rotate_right(1);
        }
        self.assign();
    }
}

#[cfg(test)]
mod tests {
    use core::num::NonZeroUsize;

    use super::GridLayout;
    use crate::LayoutStrategy;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn uniform_items_fill_rows() {
        let mut grid = GridLayout::new(nz(3), 10.0);
        grid.prepare(7, 300.0);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.content_extent(), 30.0);

        let frame = grid.frame_of(4);
        assert_eq!(frame.main_start, 10.0);
        assert_eq!(frame.cross_start, 100.0);
        assert_eq!(frame.cross_extent, 100.0);
        assert_eq!(grid.first_position_at(15.0), 3);
        assert_eq!(grid.anchor_for(5), 3);
    }

    #[test]
    fn wide_items_wrap_to_the_next_row() {
        // Every third item spans two columns.
        let lookup = |p: usize| if p % 3 == 2 { 2 } else { 1 };
        let mut grid = GridLayout::with_span_lookup(nz(2), 10.0, lookup);
        grid.prepare(6, 200.0);
        // Rows: [0, 1] [2] [3, 4] [5]
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.row_of(2), Some(1));
        assert_eq!(grid.frame_of(2).cross_extent, 200.0);
        assert_eq!(grid.column_of(4), Some(1));
    }

    #[test]
    fn row_extent_is_the_tallest_measured_item() {
        let mut grid = GridLayout::new(nz(2), 10.0);
        grid.prepare(4, 100.0);
        assert!(grid.set_measured_extent(0, 12.0));
        assert!(grid.set_measured_extent(1, 30.0));
        assert!(!grid.set_measured_extent(0, 25.0));
        assert_eq!(grid.frame_of(0).main_extent, 30.0);
        assert_eq!(grid.frame_of(2).main_start, 30.0);
    }

    #[test]
    fn span_count_change_repacks() {
        let mut grid = GridLayout::new(nz(2), 10.0);
        grid.prepare(6, 100.0);
        assert_eq!(grid.row_count(), 3);
        grid.set_span_count(nz(3));
        assert_eq!(grid.row_count(), 2);
    }
}
