// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycler Pool: reusable slot storage for virtualized lists.
//!
//! A *slot* is the reusable visual unit a list binds items into. Creating and
//! binding slots is the expensive part of showing a large data set, so a list
//! keeps only enough of them to cover the viewport and recycles the rest.
//! This crate owns the bookkeeping for that:
//!
//! - [`Slot`]: a host payload plus its type tag, optional [`Binding`] and
//!   lifecycle [`SlotState`].
//! - [`ScrapSet`]: slots detached for the duration of a single layout pass.
//!   They keep their binding and are reused first.
//! - [`SlotPool`]: a bounded FIFO cache of still-bound slots, plus a free pool
//!   of unbound slots partitioned by [`ItemType`].
//!
//! Lookups follow a fixed priority: scrap, then cache (both reuse the existing
//! binding), then the free pool of the matching type (the caller must rebind),
//! and finally `None`, which tells the caller to create a new slot.
//!
//! The pool never talks to a data adapter. When a slot has to lose its
//! binding, the pool hands it back (see [`Release`]) and the caller unbinds it
//! before returning it with [`SlotPool::recycle`].
//!
//! ## Minimal example
//!
//! ```rust
//! use recycler_pool::{AcquireSource, Binding, ItemType, Release, ScrapSet, SlotKey, SlotPool};
//!
//! let mut pool: SlotPool<&'static str> = SlotPool::new(1, 4);
//! let mut scrap = ScrapSet::new();
//! let text = ItemType(0);
//!
//! // Nothing to reuse yet: the caller creates and binds a slot.
//! assert!(pool.acquire(&mut scrap, SlotKey::at(0, text)).is_none());
//! let mut slot = pool.create(text, "row");
//! slot.bind(Binding::at(0));
//! slot.attach();
//!
//! // Releasing keeps the binding around in the cache.
//! assert!(matches!(pool.release(slot, true), Release::Cached));
//!
//! // The same position comes back without a rebind.
//! let hit = pool.acquire(&mut scrap, SlotKey::at(0, text)).unwrap();
//! assert_eq!(hit.source, AcquireSource::Cache);
//! assert!(!hit.source.needs_bind());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod pool;
mod scrap;
mod slot;

pub use pool::{
    AcquireSource, Acquired, DEFAULT_CACHE_SIZE, DEFAULT_MAX_POOLED_PER_TYPE, PoolStats, Release,
    SlotPool,
};
pub use scrap::ScrapSet;
pub use slot::{Binding, ItemType, Slot, SlotId, SlotKey, SlotState};
