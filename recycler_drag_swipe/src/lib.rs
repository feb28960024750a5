// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycler Drag-Swipe: reorder list items by dragging, dismiss them by swiping.
//!
//! [`DragSwipeController`] sits in the drag-swipe slot of a
//! [`GestureDispatcher`](recycler_gesture::GestureDispatcher): after external
//! listeners and before the list's own scrolling. On `Down` it asks the
//! [`DragSwipeCallback`] what the item under the pointer allows
//! ([`Movement`]), then claims the gesture if
//!
//! - the press is held for the long-press timeout over a draggable item, or
//! - the pointer travels past the swipe slop in an allowed swipe direction.
//!
//! Only one item is selected at a time. A second drag requested while one is
//! active is rejected.
//!
//! While dragging, every time the item crosses a neighbour's center the
//! callback is asked to move the data and the list is reordered immediately.
//! A released swipe dismisses the item when it travelled far enough or fast
//! enough; otherwise it slides back. `Cancel` always slides back and never
//! notifies the callback.
//!
//! The list is reached through [`DragSwipeHost`], so the controller works
//! with any layout that can hit-test, report rects, translate, and reorder.
//!
//! ## Minimal example
//!
//! ```rust
//! use recycler_drag_swipe::{
//!     DragSwipeCallback, DragSwipeConfig, DragSwipeController, DragSwipeState, Movement,
//!     MovementFlags, SwipeDirection,
//! };
//! use recycler_pool::ItemType;
//!
//! struct Todo(Vec<&'static str>);
//!
//! impl DragSwipeCallback for Todo {
//!     fn movement(&mut self, _position: usize, _item_type: ItemType) -> Movement {
//!         Movement::new(MovementFlags::VERTICAL, MovementFlags::HORIZONTAL)
//!     }
//!     fn on_move(&mut self, from: usize, to: usize) -> bool {
//!         let item = self.0.remove(from);
//!         self.0.insert(to, item);
//!         true
//!     }
//!     fn on_swiped(&mut self, position: usize, _direction: SwipeDirection) {
//!         self.0.remove(position);
//!     }
//! }
//!
//! let controller = DragSwipeController::new(
//!     Todo(vec!["milk", "eggs", "bread"]),
//!     DragSwipeConfig::default(),
//! );
//! assert_eq!(controller.state(), DragSwipeState::Idle);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod controller;
mod movement;
mod recover;

pub(crate) const TARGET: &str = "recycler::drag_swipe";

pub use controller::{
    DragSwipeCallback, DragSwipeConfig, DragSwipeController, DragSwipeHost, DragSwipeState,
    Recovered,
};
pub use movement::{Movement, MovementFlags, SwipeDirection};
pub use recover::{RecoverAnimation, RecoverKind};
