// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycler View: one recycling list or grid, wired end to end.
//!
//! A [`RecyclerView`] owns every piece a virtualized list needs and keeps
//! them on the instance:
//!
//! - the [`LayoutEngine`](recycler_layout::LayoutEngine) with its
//!   [`SlotPool`](recycler_pool::SlotPool) and the chosen
//!   [`LayoutStrategy`](recycler_layout::LayoutStrategy),
//! - the [`Adapter`](recycler_layout::Adapter) that binds data into slots,
//! - a [`ScrollCoordinator`](recycler_scroll::ScrollCoordinator) and the
//!   nested-scroll ancestor,
//! - a [`GestureDispatcher`](recycler_gesture::GestureDispatcher) with its
//!   listeners, and
//! - an optional drag-swipe controller.
//!
//! The host feeds it pointer events with [`RecyclerView::dispatch`], steps
//! time with [`RecyclerView::tick`] and [`RecyclerView::advance`], and reads
//! the attached slots back from [`RecyclerView::engine`] to draw them.
//!
//! Gesture listeners run in the middle of a dispatch. They see the list
//! through [`ViewHost`], where layout-affecting calls are queued and serviced
//! at the start of the next call into the view instead of running mid-dispatch.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use recycler_gesture::PointerEvent;
//! use recycler_layout::{Adapter, FixedExtentModel};
//! use recycler_pool::{ItemType, Slot};
//! use recycler_scroll::ScrollState;
//! use recycler_view::{RecyclerConfig, RecyclerView};
//! use core::num::NonZeroU64;
//!
//! struct Rows(usize);
//!
//! impl Adapter<String> for Rows {
//!     fn item_count(&self) -> usize {
//!         self.0
//!     }
//!     fn create_view(&mut self, _: ItemType) -> String {
//!         String::new()
//!     }
//!     fn bind(&mut self, slot: &mut Slot<String>, position: usize) {
//!         slot.view = format!("row {position}");
//!     }
//! }
//!
//! let mut view = RecyclerView::linear(
//!     FixedExtentModel::new(0, 20.0),
//!     Rows(1000),
//!     RecyclerConfig::default(),
//! );
//! view.set_viewport(Some(Size::new(320.0, 200.0)));
//! view.layout().unwrap();
//! assert_eq!(view.engine().attached().len(), 10);
//!
//! // Drag upwards by 48px: the first 8px are slop, the rest scrolls.
//! let finger = NonZeroU64::MIN;
//! view.dispatch(&PointerEvent::down(finger, Point::new(100.0, 150.0), 0));
//! assert!(view.dispatch(&PointerEvent::moved(finger, Point::new(100.0, 102.0), 16)));
//! assert_eq!(view.scroll_state(), ScrollState::Dragging);
//! assert_eq!(view.engine().scroll_offset(), 40.0);
//! assert_eq!(view.engine().first_visible_position(), Some(2));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod host;
mod view;

pub(crate) const TARGET: &str = "recycler::view";

pub use config::RecyclerConfig;
pub use error::ViewError;
pub use host::ViewHost;
pub use view::{BoxedDragSwipe, Frame, RecyclerView};
