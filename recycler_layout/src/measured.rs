// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item extents with an estimate for unmeasured items.

use alloc::vec::Vec;

use crate::ExtentModel;
use crate::model::sanitize_extent;

/// An [`ExtentModel`] backed by per-item extents and a lazily maintained prefix-sum cache.
///
/// Items start at `estimate` and are refined as the layout pass measures them,
/// so the scrollable extent converges while the user scrolls.
#[derive(Clone, Debug)]
pub struct MeasuredExtentModel {
    estimate: f64,
    extents: Vec<f64>,
    starts: Vec<f64>,
    // First index whose cached start may be stale.
    dirty_from: Option<usize>,
}

impl MeasuredExtentModel {
    /// Creates an empty model whose unmeasured items are `estimate` long.
    #[must_use]
    pub fn new(estimate: f64) -> Self {
        Self {
            estimate: sanitize_extent(estimate),
            extents: Vec::new(),
            starts: Vec::new(),
            dirty_from: Some(0),
        }
    }

    /// Extent assumed for items that have not been measured.
    #[must_use]
    pub const fn estimate(&self) -> f64 {
        self.estimate
    }

    fn mark_dirty(&mut self, from: usize) {
        self.dirty_from = Some(self.dirty_from.map_or(from, |d| d.min(from)));
    }

    fn ensure_starts_through(&mut self, through: usize) {
        let len = self.extents.len();
        let Some(dirty) = self.dirty_from else {
            return;
        };
        if len == 0 || dirty > through {
            return;
        }
        let mut pos = if dirty == 0 {
            0.0
        } else {
            self.starts[dirty - 1] + self.extents[dirty - 1]
        };
        for i in dirty..len {
            self.starts[i] = pos;
            pos += self.extents[i];
        }
        self.dirty_from = None;
    }
}

impl ExtentModel for MeasuredExtentModel {
    fn len(&self) -> usize {
        self.extents.len()
    }

    fn set_len(&mut self, len: usize) {
        let old = self.extents.len();
        if old == len {
            return;
        }
        self.extents.resize(len, self.estimate);
        self.starts.resize(len, 0.0);
        self.mark_dirty(old.min(len));
    }

    fn total_extent(&mut self) -> f64 {
        match self.extents.len() {
            0 => 0.0,
            len => self.offset_of(len - 1) + self.extents[len - 1],
        }
    }

    fn extent_of(&mut self, index: usize) -> f64 {
        self.extents.get(index).copied().unwrap_or(0.0)
    }

    fn offset_of(&mut self, index: usize) -> f64 {
        let len = self.extents.len();
        if index == 0 || len == 0 {
            return 0.0;
        }
        if index >= len {
            return self.total_extent();
        }
        self.ensure_starts_through(index);
        self.starts[index]
    }

    fn index_at_offset(&mut self, offset: f64) -> usize {
        let len = self.extents.len();
        if len == 0 {
            return 0;
        }
        self.ensure_starts_through(len - 1);
        let target = offset.max(0.0);
        // Last item whose start is at or before `target`.
        self.starts
            .partition_point(|start| *start <= target)
            .saturating_sub(1)
    }

    fn set_extent(&mut self, index: usize, extent: f64) -> bool {
        let extent = sanitize_extent(extent);
        match self.extents.get_mut(index) {
            Some(slot) if *slot != extent => {
                *slot = extent;
                self.mark_dirty(index + 1);
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
        self.mark_dirty(from.min(to));
    }
}
