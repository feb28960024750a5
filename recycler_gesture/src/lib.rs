// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycler Gesture: deterministic gesture claiming for scrolling lists.
//!
//! A list competes with its own content for pointer input: a press may start
//! a scroll, a reorder drag, a swipe to dismiss, or something an external
//! listener recognizes. [`GestureDispatcher`] resolves this with a fixed
//! claim order so identical input always picks the same owner:
//!
//! 1. registered [`GestureListener`]s, in registration order,
//! 2. the drag-swipe controller, when attached,
//! 3. the list itself, once the pointer passes the slop along a scrollable axis.
//!
//! Exactly one of them owns a gesture from the moment it is claimed until
//! `Up` or `Cancel`. Self-scrolling is delegated to a [`ScrollHost`], which
//! also receives the release velocity measured over the [`TouchSession`].
//!
//! ## Minimal example
//!
//! ```rust
//! use core::num::NonZeroU64;
//! use kurbo::{Point, Vec2};
//! use recycler_gesture::{GestureDispatcher, PointerEvent, ScrollHost};
//! use recycler_scroll::ScrollAxes;
//!
//! #[derive(Default)]
//! struct List {
//!     scrolled: Vec2,
//! }
//!
//! impl ScrollHost for List {
//!     fn scroll_axes(&self) -> ScrollAxes {
//!         ScrollAxes::VERTICAL
//!     }
//!     fn begin_scroll(&mut self) {}
//!     fn scroll_by(&mut self, delta: Vec2) {
//!         self.scrolled += delta;
//!     }
//!     fn end_scroll(&mut self, _velocity: Vec2, _now: u64) {}
//!     fn cancel_scroll(&mut self) {}
//! }
//!
//! let mut list = List::default();
//! let mut gestures = GestureDispatcher::<List>::default();
//! let finger = NonZeroU64::MIN;
//!
//! gestures.dispatch(&PointerEvent::down(finger, Point::new(10.0, 100.0), 0), &mut list, None);
//! // Dragging the finger up by 40px scrolls the content by the travel past the slop.
//! let claimed =
//!     gestures.dispatch(&PointerEvent::moved(finger, Point::new(10.0, 60.0), 16), &mut list, None);
//! assert!(claimed);
//! assert_eq!(list.scrolled, Vec2::new(0.0, 32.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod dispatcher;
mod event;
mod session;

pub(crate) const TARGET: &str = "recycler::gesture";

pub use dispatcher::{DEFAULT_SLOP, GestureDispatcher, GestureListener, ScrollHost};
pub use event::{PointerEvent, PointerEventKind, PointerId};
pub use session::{Claim, ListenerId, TouchSession};
