// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycler Layout: layout strategies and the shared fill/recycle pass.
//!
//! A list only keeps slots for the items it can show. Deciding *which* items
//! those are is split in two:
//!
//! - A [`LayoutStrategy`] maps positions to [`ItemFrame`]s. Three variants are
//!   provided: [`LinearLayout`] over an [`ExtentModel`], [`GridLayout`] with
//!   per-item column spans, and [`StaggeredGridLayout`] with independent lanes.
//! - A [`LayoutEngine`] owns the viewport, the [`SlotPool`](recycler_pool::SlotPool)
//!   and the attached slots, and runs the same pass for every strategy: scrap
//!   everything, walk positions from the anchor acquiring and measuring slots
//!   until the viewport plus look-ahead is covered, then release what was not
//!   reclaimed.
//!
//! The engine talks to the host through three boundaries: an [`Adapter`] for
//! data binding and measurement, [`ItemDecoration`]s for spacing, and
//! [`ItemChange`]s for the animation layer.
//!
//! Scroll position is kept as an anchor position plus a pixel offset
//! ([`ViewportState`]), so measurements that change extents above the
//! viewport do not move visible content.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use recycler_layout::{Adapter, FixedExtentModel, LayoutEngine, LinearLayout};
//! use recycler_pool::{ItemType, Slot, SlotPool};
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
//! let mut rows = Rows(1000);
//! let mut engine = LayoutEngine::new(
//!     LinearLayout::new(FixedExtentModel::new(0, 20.0)),
//!     SlotPool::default(),
//! );
//! engine.set_viewport(Some(Size::new(320.0, 200.0)));
//! engine.layout(&mut rows).unwrap();
//! assert_eq!(engine.attached().len(), 10);
//!
//! // Scrolling one row recycles the row that left the viewport.
//! let consumed = engine.scroll_main_by(20.0, &mut rows).unwrap();
//! assert_eq!(consumed, 20.0);
//! assert_eq!(engine.first_visible_position(), Some(1));
//! assert_eq!(engine.attached()[9].slot().view, "row 10");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod adapter;
mod engine;
mod error;
mod fixed;
mod grid;
mod linear;
mod measured;
mod model;
mod staggered;
mod strategy;

pub(crate) const TARGET: &str = "recycler::layout";

pub use adapter::{Adapter, ItemAnimator, ItemChange, ItemDecoration};
pub use engine::{AttachedSlot, LayoutEngine, PassReport, ScrollAlign, ViewportState};
pub use error::LayoutError;
pub use fixed::FixedExtentModel;
pub use grid::{GridLayout, SpanSizeLookup, UniformSpan};
pub use linear::LinearLayout;
pub use measured::MeasuredExtentModel;
pub use model::ExtentModel;
pub use staggered::StaggeredGridLayout;
pub use strategy::{ItemFrame, LayoutStrategy, Orientation};
