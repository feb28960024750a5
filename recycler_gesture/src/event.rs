// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw pointer events.

use core::num::NonZeroU64;

use kurbo::Point;

/// Pointer identifier.
pub type PointerId = NonZeroU64;

/// What happened to the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Pressed.
    Down,
    /// Moved while pressed.
    Move,
    /// Released.
    Up,
    /// The platform took the pointer away.
    Cancel,
}

/// One raw pointer event in list coordinates.
///
/// Timestamps are milliseconds and must strictly increase across the events
/// given to a [`GestureDispatcher`](crate::GestureDispatcher).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Which pointer.
    pub pointer: PointerId,
    /// What happened.
    pub kind: PointerEventKind,
    /// Where, relative to the list's viewport.
    pub position: Point,
    /// When, in milliseconds.
    pub time: u64,
}

impl PointerEvent {
    /// Creates an event.
    #[must_use]
    pub const fn new(pointer: PointerId, kind: PointerEventKind, position: Point, time: u64) -> Self {
        Self {
            pointer,
            kind,
            position,
            time,
        }
    }

    /// A [`Down`](PointerEventKind::Down) event.
    #[must_use]
    pub const fn down(pointer: PointerId, position: Point, time: u64) -> Self {
        Self::new(pointer, PointerEventKind::Down, position, time)
    }

    /// A [`Move`](PointerEventKind::Move) event.
    #[must_use]
    pub const fn moved(pointer: PointerId, position: Point, time: u64) -> Self {
        Self::new(pointer, PointerEventKind::Move, position, time)
    }

    /// An [`Up`](PointerEventKind::Up) event.
    #[must_use]
    pub const fn up(pointer: PointerId, position: Point, time: u64) -> Self {
        Self::new(pointer, PointerEventKind::Up, position, time)
    }

    /// A [`Cancel`](PointerEventKind::Cancel) event.
    #[must_use]
    pub const fn cancel(pointer: PointerId, position: Point, time: u64) -> Self {
        Self::new(pointer, PointerEventKind::Cancel, position, time)
    }

    /// Returns `true` for `Up` and `Cancel`.
    #[must_use]
    pub const fn ends_gesture(&self) -> bool {
        matches!(self.kind, PointerEventKind::Up | PointerEventKind::Cancel)
    }
}
