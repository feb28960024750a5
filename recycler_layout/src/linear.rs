// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-column (or single-row) layout.

use crate::model::first_index_ending_after;
use crate::{ExtentModel, ItemFrame, LayoutStrategy};

/// Lays items out one after another along the main axis.
///
/// Item extents come from an [`ExtentModel`]: use
/// [`FixedExtentModel`](crate::FixedExtentModel) for uniform rows and
/// [`MeasuredExtentModel`](crate::MeasuredExtentModel) when the adapter
/// measures slots.
#[derive(Clone, Debug)]
pub struct LinearLayout<M> {
    model: M,
    viewport_cross: f64,
    cross_extent: Option<f64>,
}

impl<M: ExtentModel> LinearLayout<M> {
    /// Creates a linear layout over `model`.
    #[must_use]
    pub fn new(model: M) -> Self {
        Self {
            model,
            viewport_cross: 0.0,
            cross_extent: None,
        }
    }

    /// Gives every row a fixed cross extent.
    ///
    /// Rows wider than the viewport let the list scroll on both axes.
    #[must_use]
    pub fn with_cross_extent(mut self, extent: f64) -> Self {
        self.cross_extent = Some(extent.max(0.0));
        self
    }

    /// The underlying extent model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the underlying extent model.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    fn row_cross(&self) -> f64 {
        self.cross_extent.unwrap_or(self.viewport_cross)
    }
}

impl<M: ExtentModel> LayoutStrategy for LinearLayout<M> {
    fn prepare(&mut self, item_count: usize, viewport_cross: f64) {
        self.viewport_cross = viewport_cross;
        if self.model.len() != item_count {
            self.model.set_len(item_count);
        }
    }

    fn item_count(&self) -> usize {
        self.model.len()
    }

    fn content_extent(&mut self) -> f64 {
        self.model.total_extent()
    }

    fn cross_content_extent(&self, viewport_cross: f64) -> f64 {
        self.cross_extent.unwrap_or(viewport_cross).max(viewport_cross)
    }

    fn first_position_at(&mut self, offset: f64) -> usize {
        first_index_ending_after(&mut self.model, offset)
    }

    fn frame_of(&mut self, position: usize) -> ItemFrame {
        ItemFrame {
            main_start: self.model.offset_of(position),
            main_extent: self.model.extent_of(position),
            cross_start: 0.0,
            cross_extent: self.row_cross(),
        }
    }

    fn cross_constraint(&mut self, _position: usize) -> f64 {
        self.row_cross()
    }

    fn set_measured_extent(&mut self, position: usize, extent: f64) -> bool {
        self.model.set_extent(position, extent)
    }

    fn move_item(&mut self, from: usize, to: usize) {
        self.model.move_item(from, to);
    }
}
