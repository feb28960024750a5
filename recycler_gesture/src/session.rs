// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-gesture tracking.

use kurbo::{Point, Vec2};
use recycler_scroll::VelocityTracker;

use crate::{PointerEvent, PointerId};

/// Identifies a listener registered with a [`GestureDispatcher`](crate::GestureDispatcher).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u32);

/// Who owns the current gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Claim {
    /// A registered external listener.
    Listener(ListenerId),
    /// The attached drag-swipe controller.
    DragSwipe,
    /// The list itself, for scrolling.
    SelfScroll,
}

/// State of one gesture, from `Down` to `Up` or `Cancel`.
#[derive(Clone, Debug)]
pub struct TouchSession {
    pointer: PointerId,
    origin: Point,
    last_position: Point,
    down_time: u64,
    last_time: u64,
    slop_crossed: bool,
    claim: Option<Claim>,
    velocity: VelocityTracker,
}

impl TouchSession {
    pub(crate) fn new(down: &PointerEvent) -> Self {
        let mut velocity = VelocityTracker::new();
        velocity.add(down.time, down.position);
        Self {
            pointer: down.pointer,
            origin: down.position,
            last_position: down.position,
            down_time: down.time,
            last_time: down.time,
            slop_crossed: false,
            claim: None,
            velocity,
        }
    }

    /// Records a move or release. Returns the previous position.
    pub(crate) fn record(&mut self, event: &PointerEvent, slop: f64) -> Point {
        let previous = self.last_position;
        self.last_position = event.position;
        self.last_time = event.time;
        self.velocity.add(event.time, event.position);
        let d = self.displacement();
        if d.x.abs() > slop || d.y.abs() > slop {
            self.slop_crossed = true;
        }
        previous
    }

    pub(crate) fn set_claim(&mut self, claim: Option<Claim>) {
        self.claim = claim;
    }

    /// The primary pointer.
    #[must_use]
    pub const fn pointer(&self) -> PointerId {
        self.pointer
    }

    /// Where the pointer went down.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Last known pointer position.
    #[must_use]
    pub const fn last_position(&self) -> Point {
        self.last_position
    }

    /// Time of the `Down`.
    #[must_use]
    pub const fn down_time(&self) -> u64 {
        self.down_time
    }

    /// Time of the last recorded event.
    #[must_use]
    pub const fn last_time(&self) -> u64 {
        self.last_time
    }

    /// Total pointer travel since the `Down`.
    #[must_use]
    pub fn displacement(&self) -> Vec2 {
        self.last_position - self.origin
    }

    /// Whether the pointer ever left the slop square around the origin.
    #[must_use]
    pub const fn slop_crossed(&self) -> bool {
        self.slop_crossed
    }

    /// The gesture's owner, once claimed.
    #[must_use]
    pub const fn claim(&self) -> Option<Claim> {
        self.claim
    }

    /// Pointer velocity in px/s.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity.velocity()
    }
}
