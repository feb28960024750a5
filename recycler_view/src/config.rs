// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use recycler_drag_swipe::DragSwipeConfig;
use recycler_layout::Orientation;
use recycler_scroll::{Axis, ScrollConfig};

/// Options a [`RecyclerView`](crate::RecyclerView) is built with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RecyclerConfig {
    /// Slots kept bound after scrolling out of view, reusable at the same position.
    pub cache_size: usize,
    /// Free slots kept per item type.
    pub max_pooled_per_type: usize,
    /// Extra main-axis extent laid out beyond the viewport, in pixels.
    pub look_ahead_extent: f64,
    /// Pointer travel before the list claims a gesture, in pixels.
    pub slop_threshold: f64,
    /// Slowest release that flings, in px/s.
    pub fling_min_velocity: f64,
    /// Fastest fling, in px/s.
    pub fling_max_velocity: f64,
    /// Lay position 0 out at the far edge.
    pub reverse_layout: bool,
    /// Columns (or rows) of the grid variants.
    pub span_count: usize,
    /// Main scroll direction.
    pub orientation: Orientation,
    /// Hold time before a press starts a drag, in milliseconds.
    pub long_press_timeout_ms: u64,
}

impl Default for RecyclerConfig {
    fn default() -> Self {
        Self {
            cache_size: 2,
            max_pooled_per_type: 5,
            look_ahead_extent: 0.0,
            slop_threshold: 8.0,
            fling_min_velocity: 50.0,
            fling_max_velocity: 8000.0,
            reverse_layout: false,
            span_count: 1,
            orientation: Orientation::Vertical,
            long_press_timeout_ms: 500,
        }
    }
}

impl RecyclerConfig {
    /// Scroll tuning derived from these options.
    #[must_use]
    pub fn scroll_config(&self) -> ScrollConfig {
        ScrollConfig {
            slop: self.slop_threshold,
            fling_min_velocity: self.fling_min_velocity,
            fling_max_velocity: self.fling_max_velocity,
            ..ScrollConfig::default()
        }
    }

    /// Drag-swipe tuning derived from these options.
    #[must_use]
    pub fn drag_swipe_config(&self) -> DragSwipeConfig {
        DragSwipeConfig {
            long_press_timeout_ms: self.long_press_timeout_ms,
            swipe_slop: self.slop_threshold,
            ..DragSwipeConfig::default()
        }
    }

    /// Axis the list scrolls along.
    #[must_use]
    pub const fn main_axis(&self) -> Axis {
        main_axis(self.orientation)
    }
}

pub(crate) const fn main_axis(orientation: Orientation) -> Axis {
    match orientation {
        Orientation::Vertical => Axis::Vertical,
        Orientation::Horizontal => Axis::Horizontal,
    }
}

pub(crate) const fn cross_axis(orientation: Orientation) -> Axis {
    match orientation {
        Orientation::Vertical => Axis::Horizontal,
        Orientation::Horizontal => Axis::Vertical,
    }
}

#[cfg(test)]
mod tests {
    use recycler_layout::Orientation;
    use recycler_scroll::Axis;

    use super::RecyclerConfig;

    #[test]
    fn derived_configs_carry_the_shared_options() {
        let config = RecyclerConfig {
            slop_threshold: 12.0,
            fling_max_velocity: 4000.0,
            long_press_timeout_ms: 300,
            orientation: Orientation::Horizontal,
            ..RecyclerConfig::default()
        };
        let scroll = config.scroll_config();
        assert_eq!(scroll.slop, 12.0);
        assert_eq!(scroll.fling_max_velocity, 4000.0);
        let drag = config.drag_swipe_config();
        assert_eq!(drag.long_press_timeout_ms, 300);
        assert_eq!(drag.swipe_slop, 12.0);
        assert_eq!(config.main_axis(), Axis::Horizontal);
    }
}
