// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundaries to the host: data adapter, decorations, and animations.

use kurbo::{Insets, Rect, Vec2};
use recycler_pool::{ItemType, Release, Slot, SlotPool};

use crate::PassReport;

/// The data-binding layer.
///
/// The layout calls [`bind`](Self::bind) exactly once each time a slot comes
/// out of the free pool or is created, and [`unbind`](Self::unbind) exactly
/// once before a slot goes back into the free pool.
pub trait Adapter<V> {
    /// Number of items in the data set.
    fn item_count(&self) -> usize;

    /// Type tag of `position`; slots are only reused across equal types.
    fn item_type(&self, position: usize) -> ItemType {
        let _ = position;
        ItemType::default()
    }

    /// Stable identity of the item at `position`, if the data set has one.
    fn stable_id(&self, position: usize) -> Option<u64> {
        let _ = position;
        None
    }

    /// Builds a new host view for a slot of `item_type`.
    fn create_view(&mut self, item_type: ItemType) -> V;

    /// Binds the item at `position` into `slot`.
    fn bind(&mut self, slot: &mut Slot<V>, position: usize);

    /// Clears item data from `slot` before it enters the free pool.
    fn unbind(&mut self, slot: &mut Slot<V>) {
        let _ = slot;
    }

    /// Main-axis extent of `slot` bound to `position`, given the cross-axis space.
    ///
    /// Returning `None` keeps the layout's current extent for the position.
    fn measure(&mut self, slot: &Slot<V>, position: usize, cross_constraint: f64) -> Option<f64> {
        let _ = (slot, position, cross_constraint);
        None
    }

    /// Takes back a slot the pool had no room for.
    fn dispose(&mut self, slot: Slot<V>) {
        let _ = slot;
    }
}

/// Contributes spacing around items.
///
/// Insets are added to the measured item before it is placed. Decorations
/// only read; they never touch pool state.
pub trait ItemDecoration {
    /// Space reserved around the item at `position`.
    fn item_insets(&self, position: usize) -> Insets;
}

/// A structural or visual change reported to the animation layer.
///
/// Rects are in viewport coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ItemChange {
    /// A position became attached.
    Appeared {
        /// Adapter position.
        position: usize,
        /// Where it was placed.
        rect: Rect,
    },
    /// A position stopped being attached.
    Disappeared {
        /// Adapter position.
        position: usize,
        /// Where it was last placed.
        rect: Rect,
    },
    /// An item was reordered.
    Moved {
        /// Position before the move.
        from: usize,
        /// Position after the move.
        to: usize,
        /// Placement before the move.
        from_rect: Rect,
        /// Placement after the move.
        to_rect: Rect,
    },
    /// An item was swiped away.
    Dismissed {
        /// Adapter position.
        position: usize,
        /// Final visual offset of the item.
        offset: Vec2,
    },
}

/// Receives [`ItemChange`]s. The layout never waits on it.
pub trait ItemAnimator {
    /// Called once per change, in the order the changes happened.
    fn on_change(&mut self, change: &ItemChange);
}

/// Releases `slot` into `pool`, unbinding through the adapter when needed.
///
/// Slots the free pool cannot take are handed to [`Adapter::dispose`].
pub(crate) fn release_slot<V, A: Adapter<V> + ?Sized>(
    pool: &mut SlotPool<V>,
    adapter: &mut A,
    slot: Slot<V>,
    valid_for_cache: bool,
    report: &mut PassReport,
) {
    let to_unbind = match pool.release(slot, valid_for_cache) {
        Release::Cached => None,
        Release::CachedEvicting(old) => Some(old),
        Release::Unbind(slot) => Some(slot),
    };
    report.released += 1;
    if let Some(slot) = to_unbind {
        recycle_slot(pool, adapter, slot, report);
    }
}

/// Unbinds a slot the pool gave back and returns it to the free pool.
pub(crate) fn recycle_slot<V, A: Adapter<V> + ?Sized>(
    pool: &mut SlotPool<V>,
    adapter: &mut A,
    mut slot: Slot<V>,
    report: &mut PassReport,
) {
    adapter.unbind(&mut slot);
    slot.unbind();
    if let Some(surplus) = pool.recycle(slot) {
        report.discarded += 1;
        adapter.dispose(surplus);
    }
}
