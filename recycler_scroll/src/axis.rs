// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axes and scroll kinds.

use kurbo::Vec2;

/// A single scroll axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Left/right.
    Horizontal,
    /// Up/down.
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const ALL: [Self; 2] = [Self::Horizontal, Self::Vertical];

    /// Component of `v` along this axis.
    #[must_use]
    pub const fn of(self, v: Vec2) -> f64 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    /// A vector with `value` along this axis and zero on the other.
    #[must_use]
    pub const fn vec2(self, value: f64) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(value, 0.0),
            Self::Vertical => Vec2::new(0.0, value),
        }
    }

    /// The matching [`ScrollAxes`] flag.
    #[must_use]
    pub const fn flag(self) -> ScrollAxes {
        match self {
            Self::Horizontal => ScrollAxes::HORIZONTAL,
            Self::Vertical => ScrollAxes::VERTICAL,
        }
    }
}

bitflags::bitflags! {
    /// Set of axes a list can scroll along.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ScrollAxes: u8 {
        /// Scrolls left/right.
        const HORIZONTAL = 0b0000_0001;
        /// Scrolls up/down.
        const VERTICAL   = 0b0000_0010;
    }
}

impl ScrollAxes {
    /// Returns `true` if `axis` is in the set.
    #[must_use]
    pub const fn allows(self, axis: Axis) -> bool {
        self.contains(axis.flag())
    }

    /// Axes in the set, horizontal first.
    pub fn iter_axes(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |axis| self.allows(*axis))
    }
}

/// What is driving a scroll.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollType {
    /// A finger or pointer is down and dragging.
    #[default]
    Touch,
    /// Fling or programmatic motion with no pointer down.
    NonTouch,
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Vec2;

    use super::{Axis, ScrollAxes};

    #[test]
    fn axes_select_components() {
        let v = Vec2::new(3.0, -4.0);
        assert_eq!(Axis::Horizontal.of(v), 3.0);
        assert_eq!(Axis::Vertical.of(v), -4.0);
        assert_eq!(Axis::Vertical.vec2(2.0), Vec2::new(0.0, 2.0));
    }

    #[test]
    fn iter_axes_follows_the_set() {
        let both: Vec<_> = ScrollAxes::all().iter_axes().collect();
        assert_eq!(both, [Axis::Horizontal, Axis::Vertical]);
        let vertical: Vec<_> = ScrollAxes::VERTICAL.iter_axes().collect();
        assert_eq!(vertical, [Axis::Vertical]);
        assert!(!ScrollAxes::empty().allows(Axis::Vertical));
    }
}
