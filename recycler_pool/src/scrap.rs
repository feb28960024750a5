// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pass-scoped scrap storage.

use smallvec::SmallVec;

use crate::{Slot, SlotKey, SlotState};

/// Slots detached at the start of a layout pass.
///
/// A layout pass moves every attached slot in here, reclaims the ones that
/// are still needed, and releases the remainder when it finishes. Outside of
/// a pass the set is always empty.
#[derive(Debug)]
pub struct ScrapSet<V> {
    slots: SmallVec<[Slot<V>; 16]>,
}

impl<V> Default for ScrapSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ScrapSet<V> {
    /// Creates an empty scrap set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: SmallVec::new(),
        }
    }

    /// Detaches `slot` into the scrap set.
    pub fn push(&mut self, mut slot: Slot<V>) {
        debug_assert!(slot.is_bound(), "scrapping unbound slot {:?}", slot.id());
        slot.set_state(SlotState::Scrap);
        self.slots.push(slot);
    }

    /// Removes the slot that can satisfy `key` without rebinding.
    ///
    /// Slots whose binding matches but whose type differs stay in the set;
    /// they are stale and get released at the end of the pass.
    pub(crate) fn take(&mut self, key: &SlotKey) -> Option<Slot<V>> {
        let idx = self.slots.iter().position(|s| {
            s.item_type() == key.item_type && s.binding().is_some_and(|b| b.satisfies(key))
        })?;
        Some(self.slots.swap_remove(idx))
    }

    /// Returns `true` if a scrapped slot is bound to `position`.
    #[must_use]
    pub fn contains_position(&self, position: usize) -> bool {
        self.slots.iter().any(|s| s.position() == Some(position))
    }

    /// Number of scrapped slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is scrapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Removes every remaining slot, in position order.
    pub fn drain(&mut self) -> impl Iterator<Item = Slot<V>> + '_ {
        self.slots
            .sort_unstable_by_key(|s| s.position().unwrap_or(usize::MAX));
        self.slots.drain(..)
    }
}
