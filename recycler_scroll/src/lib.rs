// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycler Scroll: scroll state, nested scrolling, and flings.
//!
//! A [`ScrollCoordinator`] moves a list between [`ScrollState::Idle`],
//! [`ScrollState::Dragging`] and [`ScrollState::Settling`]. It does not own
//! the content: every delta is handed to a [`ScrollTarget`] (usually the
//! layout), and before that to a [`NestedScrollParent`], the ancestor scroll
//! container if there is one.
//!
//! For every delta the order is fixed:
//!
//! 1. the ancestor's [`pre_scroll`](NestedScrollParent::pre_scroll),
//! 2. the list's own consumption, only if something remains,
//! 3. the ancestor's [`post_scroll`](NestedScrollParent::post_scroll) with what is left.
//!
//! Fling motion uses the same order, one step per frame. Release velocity is
//! estimated by a [`VelocityTracker`] and motion decays as a [`Fling`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Vec2;
//! use recycler_scroll::{
//!     Axis, NoNestedParent, ScrollAxes, ScrollConfig, ScrollCoordinator, ScrollState,
//!     ScrollTarget,
//! };
//!
//! struct Content {
//!     offset: f64,
//!     max: f64,
//! }
//!
//! impl ScrollTarget for Content {
//!     fn scroll_local(&mut self, _axis: Axis, delta: f64) -> f64 {
//!         let next = (self.offset + delta).clamp(0.0, self.max);
//!         let consumed = next - self.offset;
//!         self.offset = next;
//!         consumed
//!     }
//! }
//!
//! let mut content = Content { offset: 0.0, max: 1000.0 };
//! let mut scroll = ScrollCoordinator::new(ScrollAxes::VERTICAL, ScrollConfig::default());
//!
//! scroll.begin_drag(&mut NoNestedParent);
//! let step = scroll.scroll_by(Axis::Vertical, 30.0, &mut NoNestedParent, &mut content);
//! assert_eq!(step.local, 30.0);
//!
//! let state = scroll.end_drag(Vec2::new(0.0, 2000.0), 0, &mut NoNestedParent);
//! assert_eq!(state, ScrollState::Settling);
//! let mut now = 0;
//! while scroll.state() == ScrollState::Settling {
//!     now += 16;
//!     scroll.advance(now, &mut NoNestedParent, &mut content);
//! }
//! assert!(content.offset > 30.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod axis;
mod coordinator;
mod fling;
mod nested;
mod velocity;

pub(crate) const TARGET: &str = "recycler::scroll";

pub use axis::{Axis, ScrollAxes, ScrollType};
pub use coordinator::{ScrollConfig, ScrollCoordinator, ScrollState, ScrollStep, ScrollTarget};
pub use fling::Fling;
pub use nested::{NestedScrollNegotiation, NestedScrollParent, NoNestedParent};
pub use velocity::{VELOCITY_HORIZON_MS, VELOCITY_SAMPLES, VelocityTracker};
