// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Staggered grid: items flow into the shortest lane.

use alloc::vec;
use alloc::vec::Vec;
use core::num::NonZeroUsize;

use crate::model::sanitize_extent;
use crate::{ItemFrame, LayoutStrategy};

#[derive(Copy, Clone, Debug, Default)]
struct Placement {
    lane: usize,
    start: f64,
}

/// A masonry-style layout with `span_count` independent lanes.
///
/// Each item is placed at the end of the lane that currently ends first (ties
/// go to the lowest lane), so lanes have independent offsets. Placements are
/// cached and recomputed from the first item whose extent changed.
///
/// Because the shortest lane end never decreases as items are placed, item
/// starts are non-decreasing in position order.
#[derive(Clone, Debug)]
pub struct StaggeredGridLayout {
    lanes: NonZeroUsize,
    estimate: f64,
    viewport_cross: f64,
    extents: Vec<f64>,
    placements: Vec<Placement>,
    // Lane ends after placing `placements.len()` items.
    lane_ends: Vec<f64>,
}

impl StaggeredGridLayout {
    /// Creates a staggered grid with `lanes` lanes.
    ///
    /// `estimate` is the main-axis extent assumed for unmeasured items.
    #[must_use]
    pub fn new(lanes: NonZeroUsize, estimate: f64) -> Self {
        Self {
            lanes,
            estimate: sanitize_extent(estimate),
            viewport_cross: 0.0,
            extents: Vec::new(),
            placements: Vec::new(),
            lane_ends: vec![0.0; lanes.get()],
        }
    }

    /// Number of lanes.
    #[must_use]
    pub const fn lane_count(&self) -> usize {
        self.lanes.get()
    }

    /// Changes the number of lanes and re-places every item.
    pub fn set_lane_count(&mut self, lanes: NonZeroUsize) {
        if lanes != self.lanes {
            self.lanes = lanes;
            self.invalidate_from(0);
        }
    }

    /// Lane that `position` was placed in.
    pub fn lane_of(&mut self, position: usize) -> Option<usize> {
        if position >= self.extents.len() {
            return None;
        }
        self.ensure_placed(position);
        Some(self.placements[position].lane)
    }

    fn invalidate_from(&mut self, from: usize) {
        if from >= self.placements.len() && self.lane_ends.len() == self.lanes.get() {
            return;
        }
        self.placements.truncate(from);
        self.lane_ends.clear();
        self.lane_ends.resize(self.lanes.get(), 0.0);
        for (placement, extent) in self.placements.iter().zip(&self.extents) {
            let end = placement.start + extent;
            if end > self.lane_ends[placement.lane] {
                self.lane_ends[placement.lane] = end;
            }
        }
    }

    fn ensure_placed(&mut self, through: usize) {
        let target = (through + 1).min(self.extents.len());
        while self.placements.len() < target {
            let position = self.placements.len();
            let mut lane = 0;
            for (i, end) in self.lane_ends.iter().enumerate() {
                if *end < self.lane_ends[lane] {
                    lane = i;
                }
            }
            let start = self.lane_ends[lane];
            self.lane_ends[lane] = start + self.extents[position];
            self.placements.push(Placement { lane, start });
        }
    }

    fn lane_extent(&self) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Lane counts are small"
        )]
        let lanes = self.lanes.get() as f64;
        self.viewport_cross / lanes
    }
}

impl LayoutStrategy for StaggeredGridLayout {
    fn prepare(&mut self, item_count: usize, viewport_cross: f64) {
        self.viewport_cross = viewport_cross;
        let old = self.extents.len();
        if old != item_count {
            self.extents.resize(item_count, self.estimate);
            self.invalidate_from(old.min(item_count));
        }
    }

    fn item_count(&self) -> usize {
        self.extents.len()
    }

    fn content_extent(&mut self) -> f64 {
        if self.extents.is_empty() {
            return 0.0;
        }
        self.ensure_placed(self.extents.len() - 1);
        self.lane_ends.iter().copied().fold(0.0, f64::max)
    }

    fn first_position_at(&mut self, offset: f64) -> usize {
        let len = self.extents.len();
        if len == 0 {
            return 0;
        }
        self.ensure_placed(len - 1);
        // Items before `first_after` start before the offset; only those can
        // straddle it.
        let first_after = self.placements.partition_point(|p| p.start < offset);
        let mut best = first_after.min(len - 1);
        let mut closed = vec![false; self.lanes.get()];
        let mut open = self.lanes.get();
        for position in (0..first_after).rev() {
            let placement = self.placements[position];
            if closed[placement.lane] {
                continue;
            }
            if placement.start + self.extents[position] > offset {
                best = position;
            } else {
                // Earlier items in this lane end even earlier.
                closed[placement.lane] = true;
                open -= 1;
                if open == 0 {
                    break;
                }
            }
        }
        best
    }

    fn frame_of(&mut self, position: usize) -> ItemFrame {
        if position >= self.extents.len() {
            return ItemFrame {
                main_start: self.content_extent(),
                ..ItemFrame::default()
            };
        }
        self.ensure_placed(position);
        let placement = self.placements[position];
        let lane = self.lane_extent();
        #[allow(
            clippy::cast_precision_loss,
            reason = "Lane counts are small"
        )]
        let cross_start = placement.lane as f64 * lane;
        ItemFrame {
            main_start: placement.start,
            main_extent: self.extents[position],
            cross_start,
            cross_extent: lane,
        }
    }

    fn cross_constraint(&mut self, _position: usize) -> f64 {
        self.lane_extent()
    }

    fn set_measured_extent(&mut self, position: usize, extent: f64) -> bool {
        let extent = sanitize_extent(extent);
        match self.extents.get_mut(position) {
            Some(slot) if *slot != extent => {
                *slot = extent;
                // The item itself keeps its lane and start; everything after
                // it may move.
                self.invalidate_from(position + 1);
                true
            }
            _ => false,
        }
    }

    fn move_item(&mut self, from: usize, to: usize) {
        let len = self.extents.len();
        if from >= len || to >= len || from == to {
            return;
        }
        if from < to {
            self.extents[from..=to].rotate_left(1);
        } else {
            self.extents[to..=from].rotate_right(1);
        }
        self.invalidate_from(from.min(to));
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::num::NonZeroUsize;

    use super::StaggeredGridLayout;
    use crate::LayoutStrategy;

    fn layout(extents: &[f64]) -> StaggeredGridLayout {
        let mut grid = StaggeredGridLayout::new(NonZeroUsize::new(2).unwrap(), 10.0);
        grid.prepare(extents.len(), 200.0);
        for (p, e) in extents.iter().enumerate() {
            grid.set_measured_extent(p, *e);
        }
        grid
    }

    #[test]
    fn items_go_to_the_shortest_lane() {
        let mut grid = layout(&[100.0, 30.0, 30.0, 30.0, 30.0, 50.0]);
        let lanes: Vec<_> = (0..6).map(|p| grid.lane_of(p).unwrap()).collect();
        assert_eq!(lanes, [0, 1, 1, 1, 1, 0]);
        assert_eq!(grid.frame_of(4).main_start, 90.0);
        assert_eq!(grid.frame_of(5).main_start, 100.0);
        assert_eq!(grid.frame_of(1).cross_start, 100.0);
        assert_eq!(grid.content_extent(), 150.0);
    }

    #[test]
    fn starts_are_non_decreasing() {
        let mut grid = layout(&[40.0, 5.0, 70.0, 12.0, 3.0, 90.0, 1.0, 33.0]);
        let mut last = 0.0;
        for p in 0..8 {
            let start = grid.frame_of(p).main_start;
            assert!(start >= last, "position {p} starts before its predecessor");
            last = start;
        }
    }

    #[test]
    fn first_position_finds_items_straddling_the_offset() {
        let mut grid = layout(&[100.0, 30.0, 30.0, 30.0, 30.0, 50.0]);
        // Item 0 spans 0..100 and is the lowest position covering 50.
        assert_eq!(grid.first_position_at(50.0), 0);
        // At 100 item 0 has ended; lane 1 has item 4 (90..120).
        assert_eq!(grid.first_position_at(100.0), 4);
        assert_eq!(grid.first_position_at(0.0), 0);
    }

    #[test]
    fn remeasure_replaces_later_items() {
        let mut grid = layout(&[10.0, 10.0, 10.0]);
        assert_eq!(grid.lane_of(2), Some(0));
        grid.set_measured_extent(0, 50.0);
        assert_eq!(grid.lane_of(2), Some(1));
        assert_eq!(grid.frame_of(2).main_start, 10.0);
    }
}
