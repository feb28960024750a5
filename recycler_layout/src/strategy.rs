// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout strategy seam shared by the linear, grid, and staggered variants.

use kurbo::{Point, Size, Vec2};

/// Scroll direction of a list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Items flow top to bottom; the main axis is `y`.
    #[default]
    Vertical,
    /// Items flow left to right; the main axis is `x`.
    Horizontal,
}

impl Orientation {
    /// Main-axis component of `size`.
    #[must_use]
    pub const fn main(self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.height,
            Self::Horizontal => size.width,
        }
    }

    /// Cross-axis component of `size`.
    #[must_use]
    pub const fn cross(self, size: Size) -> f64 {
        match self {
            Self::Vertical => size.width,
            Self::Horizontal => size.height,
        }
    }

    /// Main-axis component of a displacement.
    #[must_use]
    pub const fn main_of(self, v: Vec2) -> f64 {
        match self {
            Self::Vertical => v.y,
            Self::Horizontal => v.x,
        }
    }

    /// Cross-axis component of a displacement.
    #[must_use]
    pub const fn cross_of(self, v: Vec2) -> f64 {
        match self {
            Self::Vertical => v.x,
            Self::Horizontal => v.y,
        }
    }

    /// Main-axis coordinate of a point.
    #[must_use]
    pub const fn main_of_point(self, p: Point) -> f64 {
        self.main_of(p.to_vec2())
    }

    /// Builds a displacement from main/cross components.
    #[must_use]
    pub const fn vec2(self, main: f64, cross: f64) -> Vec2 {
        match self {
            Self::Vertical => Vec2::new(cross, main),
            Self::Horizontal => Vec2::new(main, cross),
        }
    }
}

/// Placement of one item in content coordinates, split by axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ItemFrame {
    /// Start of the item along the main axis.
    pub main_start: f64,
    /// Length of the item along the main axis.
    pub main_extent: f64,
    /// Start of the item along the cross axis.
    pub cross_start: f64,
    /// Length of the item along the cross axis.
    pub cross_extent: f64,
}

impl ItemFrame {
    /// End of the item along the main axis.
    #[must_use]
    pub fn main_end(&self) -> f64 {
        self.main_start + self.main_extent
    }

    /// Returns `true` if the item overlaps the main-axis range `[start, end)`.
    #[must_use]
    pub fn intersects(&self, start: f64, end: f64) -> bool {
        self.main_end() > start && self.main_start < end
    }
}

/// A polymorphic layout algorithm.
///
/// Variants only decide where a position goes. The fill/recycle pass in
/// [`LayoutEngine`](crate::LayoutEngine) is shared and relies on one property
/// every implementation must uphold: `frame_of(p).main_start` is
/// non-decreasing in `p`, so the walk can stop at the first position that
/// starts past the window.
pub trait LayoutStrategy {
    /// Syncs with the adapter's item count and the viewport's cross extent.
    ///
    /// Called at the start of every pass.
    fn prepare(&mut self, item_count: usize, viewport_cross: f64);

    /// Item count seen by the last [`prepare`](Self::prepare).
    fn item_count(&self) -> usize;

    /// Main-axis extent of all content.
    fn content_extent(&mut self) -> f64;

    /// Cross-axis extent of all content.
    ///
    /// Content wider than the viewport makes the list scroll on both axes.
    fn cross_content_extent(&self, viewport_cross: f64) -> f64 {
        viewport_cross
    }

    /// Lowest position whose frame ends after main-axis `offset`.
    fn first_position_at(&mut self, offset: f64) -> usize;

    /// Frame of `position` with the current extents.
    fn frame_of(&mut self, position: usize) -> ItemFrame;

    /// Cross-axis space offered to `position` when it is measured.
    fn cross_constraint(&mut self, position: usize) -> f64;

    /// Feeds back a measured main-axis extent. Returns `true` if it changed.
    fn set_measured_extent(&mut self, position: usize, extent: f64) -> bool;

    /// Position whose frame starts the row/lane group containing `position`.
    ///
    /// Anchors snap to this so grid rows stay intact.
    fn anchor_for(&mut self, position: usize) -> usize {
        position
    }

    /// An item moved from `from` to `to`; carry per-item state along.
    fn move_item(&mut self, from: usize, to: usize) {
        let _ = (from, to);
    }
}
