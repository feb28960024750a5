// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Movement directions.

use kurbo::Vec2;
use recycler_scroll::Axis;

bitflags::bitflags! {
    /// Set of screen directions.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MovementFlags: u8 {
        /// Towards the top.
        const UP    = 0b0000_0001;
        /// Towards the bottom.
        const DOWN  = 0b0000_0010;
        /// Towards the left.
        const LEFT  = 0b0000_0100;
        /// Towards the right.
        const RIGHT = 0b0000_1000;
        /// Up or down.
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
        /// Left or right.
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

impl MovementFlags {
    /// Zeroes the components of `offset` pointing in directions outside the set.
    #[must_use]
    pub fn constrain(self, offset: Vec2) -> Vec2 {
        let x = if (offset.x < 0.0 && !self.contains(Self::LEFT))
            || (offset.x > 0.0 && !self.contains(Self::RIGHT))
        {
            0.0
        } else {
            offset.x
        };
        let y = if (offset.y < 0.0 && !self.contains(Self::UP))
            || (offset.y > 0.0 && !self.contains(Self::DOWN))
        {
            0.0
        } else {
            offset.y
        };
        Vec2::new(x, y)
    }
}

/// What an item allows, queried when a pointer goes down on it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Movement {
    /// Directions the item can be dragged in for reordering.
    pub drag: MovementFlags,
    /// Directions the item can be swiped away in.
    pub swipe: MovementFlags,
}

impl Movement {
    /// Neither draggable nor swipeable.
    pub const NONE: Self = Self {
        drag: MovementFlags::empty(),
        swipe: MovementFlags::empty(),
    };

    /// Creates a movement description.
    #[must_use]
    pub const fn new(drag: MovementFlags, swipe: MovementFlags) -> Self {
        Self { drag, swipe }
    }

    /// Returns `true` if the item allows nothing.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.drag.is_empty() && self.swipe.is_empty()
    }
}

/// Direction an item was swiped away in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    /// Towards the top.
    Up,
    /// Towards the bottom.
    Down,
    /// Towards the left.
    Left,
    /// Towards the right.
    Right,
}

impl SwipeDirection {
    /// The direction of travel `value` along `axis`, if non-zero.
    #[must_use]
    pub fn along(axis: Axis, value: f64) -> Option<Self> {
        match axis {
            Axis::Horizontal if value < 0.0 => Some(Self::Left),
            Axis::Horizontal if value > 0.0 => Some(Self::Right),
            Axis::Vertical if value < 0.0 => Some(Self::Up),
            Axis::Vertical if value > 0.0 => Some(Self::Down),
            _ => None,
        }
    }

    /// Axis of travel.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Up | Self::Down => Axis::Vertical,
        }
    }

    /// `-1.0` towards the top/left, `1.0` towards the bottom/right.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Up | Self::Left => -1.0,
            Self::Down | Self::Right => 1.0,
        }
    }

    /// The matching flag.
    #[must_use]
    pub const fn flag(self) -> MovementFlags {
        match self {
            Self::Up => MovementFlags::UP,
            Self::Down => MovementFlags::DOWN,
            Self::Left => MovementFlags::LEFT,
            Self::Right => MovementFlags::RIGHT,
        }
    }
}
