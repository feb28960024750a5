// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Main-axis extent models.

/// A 1D model over a dense strip of items, indexed `0..len`.
///
/// Extents and offsets are main-axis logical pixels. Methods that consult
/// prefix sums take `&mut self` so implementations can keep lazy caches.
pub trait ExtentModel {
    /// Number of items in the strip.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items in the strip.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resizes the strip. New items take the model's default extent.
    fn set_len(&mut self, len: usize);

    /// Total extent of the strip.
    fn total_extent(&mut self) -> f64;

    /// Extent of a single item. Never negative.
    fn extent_of(&mut self, index: usize) -> f64;

    /// Offset of the start of `index` from the start of the strip.
    ///
    /// Implementations guarantee `offset_of(0) == 0` and that offsets are
    /// non-decreasing in `index`.
    fn offset_of(&mut self, index: usize) -> f64;

    /// Index of the item at or before `offset`, clamped into `0..len`.
    fn index_at_offset(&mut self, offset: f64) -> usize;

    /// Feeds back a measured extent.
    ///
    /// Returns `true` if the stored extent changed. Models with a fixed
    /// extent ignore measurements.
    fn set_extent(&mut self, index: usize, extent: f64) -> bool {
        let _ = (index, extent);
        false
    }

    /// Moves the extent stored for `from` to `to`, shifting the items between.
    fn move_item(&mut self, from: usize, to: usize) {
        let _ = (from, to);
    }
}

/// Lowest index whose item ends after `offset`.
///
/// Starts from [`ExtentModel::index_at_offset`] and corrects for models
/// whose lookup lands one item late (for example on zero-sized items).
pub(crate) fn first_index_ending_after<M: ExtentModel + ?Sized>(model: &mut M, offset: f64) -> usize {
    let len = model.len();
    if len == 0 {
        return 0;
    }
    let mut idx = model.index_at_offset(offset).min(len - 1);
    while idx > 0 && model.offset_of(idx) > offset {
        idx -= 1;
    }
    while idx + 1 < len && model.offset_of(idx) + model.extent_of(idx) <= offset {
        idx += 1;
    }
    idx
}

/// Clamps a measured extent to a usable value.
pub(crate) fn sanitize_extent(extent: f64) -> f64 {
    debug_assert!(extent.is_finite(), "extents must be finite; got {extent:?}");
    if extent.is_sign_negative() || extent.is_nan() {
        0.0
    } else {
        extent
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtentModel, first_index_ending_after};
    use crate::{FixedExtentModel, MeasuredExtentModel};

    #[test]
    fn first_index_skips_items_ending_at_offset() {
        let mut model = FixedExtentModel::new(5, 10.0);
        assert_eq!(first_index_ending_after(&mut model, 0.0), 0);
        assert_eq!(first_index_ending_after(&mut model, 9.9), 0);
        assert_eq!(first_index_ending_after(&mut model, 10.0), 1);
        assert_eq!(first_index_ending_after(&mut model, 500.0), 4);
    }

    #[test]
    fn zero_sized_items_are_skipped() {
        let mut model = MeasuredExtentModel::new(10.0);
        model.set_len(3);
        model.set_extent(0, 0.0);
        assert_eq!(first_index_ending_after(&mut model, 0.0), 1);
        assert_eq!(model.offset_of(1), 0.0);
    }
}
