// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform-extent model.

use crate::ExtentModel;
use crate::model::sanitize_extent;

/// An [`ExtentModel`] where every item has the same extent.
///
/// Measurements fed back through [`ExtentModel::set_extent`] are ignored, so
/// the uniform extent should already include any decoration insets.
#[derive(Debug, Clone, Copy)]
pub struct FixedExtentModel {
    len: usize,
    extent: f64,
}

impl FixedExtentModel {
    /// Creates a model with `len` items of `extent` each.
    #[must_use]
    pub fn new(len: usize, extent: f64) -> Self {
        Self {
            len,
            extent: sanitize_extent(extent),
        }
    }

    /// Changes the uniform extent.
    pub fn set_uniform_extent(&mut self, extent: f64) {
        self.extent = sanitize_extent(extent);
    }

    /// The uniform extent.
    #[must_use]
    pub const fn extent(&self) -> f64 {
        self.extent
    }
}

impl ExtentModel for FixedExtentModel {
    fn len(&self) -> usize {
        self.len
    }

    fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    fn total_extent(&mut self) -> f64 {
        self.extent * self.len as f64
    }

    fn extent_of(&mut self, _index: usize) -> f64 {
        self.extent
    }

    fn offset_of(&mut self, index: usize) -> f64 {
        index as f64 * self.extent
    }

    fn index_at_offset(&mut self, offset: f64) -> usize {
        if self.len == 0 || self.extent <= 0.0 || offset <= 0.0 {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Offset is positive and the index is clamped right after"
        )]
        let idx = (offset / self.extent) as usize;
        idx.min(self.len - 1)
    }
}
