// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slots, their bindings, and lifecycle states.

/// Identifier for a slot, unique within the [`SlotPool`](crate::SlotPool) that created it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) u32);

impl SlotId {
    /// Returns the raw index of this slot.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Item type tag used to partition the free pool.
///
/// Only slots of the same type are interchangeable. The meaning of each value
/// is up to the adapter (typically one tag per row layout).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemType(pub u32);

/// The item a slot currently displays.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    /// Adapter position of the bound item.
    pub position: usize,
    /// Stable identity of the bound item, if the adapter provides one.
    pub stable_id: Option<u64>,
}

impl Binding {
    /// Binding for `position` without a stable id.
    #[must_use]
    pub const fn at(position: usize) -> Self {
        Self {
            position,
            stable_id: None,
        }
    }

    /// Binding for `position` carrying a stable id.
    #[must_use]
    pub const fn with_id(position: usize, stable_id: u64) -> Self {
        Self {
            position,
            stable_id: Some(stable_id),
        }
    }

    /// Returns `true` if this binding can satisfy `key` without rebinding.
    ///
    /// Stable ids take precedence: when the key carries one, positions are
    /// ignored so that an item that moved keeps its slot.
    #[must_use]
    pub fn satisfies(&self, key: &SlotKey) -> bool {
        match key.stable_id {
            Some(id) => self.stable_id == Some(id),
            None => self.position == key.position,
        }
    }
}

/// Lookup key for [`SlotPool::acquire`](crate::SlotPool::acquire).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlotKey {
    /// Adapter position being laid out.
    pub position: usize,
    /// Adapter-reported type of that position.
    pub item_type: ItemType,
    /// Adapter-reported stable id of that position, if any.
    pub stable_id: Option<u64>,
}

impl SlotKey {
    /// Key for `position` of `item_type` without a stable id.
    #[must_use]
    pub const fn at(position: usize, item_type: ItemType) -> Self {
        Self {
            position,
            item_type,
            stable_id: None,
        }
    }

    /// Adds a stable id to this key.
    #[must_use]
    pub const fn with_stable_id(mut self, stable_id: Option<u64>) -> Self {
        self.stable_id = stable_id;
        self
    }

    /// The binding a freshly bound slot for this key should carry.
    #[must_use]
    pub const fn binding(&self) -> Binding {
        Binding {
            position: self.position,
            stable_id: self.stable_id,
        }
    }
}

/// Lifecycle of a [`Slot`].
///
/// ```text
/// Free ──bind/attach──▶ Attached ──pass start──▶ Scrap ──reclaimed──▶ Attached
///   ▲                      │                       │
///   │                      └──release──▶ Cached ◀──┘ (not reclaimed)
///   └──────── evicted / invalidated ─────────┘
/// Free ──pool full──▶ Detached
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Unbound and owned by the free pool.
    Free,
    /// Laid out in the viewport (or its look-ahead).
    Attached,
    /// Detached during an in-progress layout pass; still bound.
    Scrap,
    /// Detached after layout; still bound, held in the FIFO cache.
    Cached,
    /// Handed back to the host for disposal.
    Detached,
}

/// A reusable visual unit bound to at most one item.
#[derive(Clone, Debug)]
pub struct Slot<V> {
    id: SlotId,
    item_type: ItemType,
    binding: Option<Binding>,
    state: SlotState,
    /// Host payload (widget, node handle, render object, ...).
    pub view: V,
}

impl<V> Slot<V> {
    pub(crate) fn new(id: SlotId, item_type: ItemType, view: V) -> Self {
        Self {
            id,
            item_type,
            binding: None,
            state: SlotState::Free,
            view,
        }
    }

    /// Identifier of this slot.
    #[must_use]
    pub const fn id(&self) -> SlotId {
        self.id
    }

    /// Type tag this slot was created for.
    #[must_use]
    pub const fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Current binding, if any.
    #[must_use]
    pub const fn binding(&self) -> Option<Binding> {
        self.binding
    }

    /// Adapter position of the bound item, if any.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        self.binding.map(|b| b.position)
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SlotState {
        self.state
    }

    /// Returns `true` if the slot carries a binding.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Records that the adapter bound this slot.
    pub fn bind(&mut self, binding: Binding) {
        self.binding = Some(binding);
    }

    /// Records that the adapter unbound this slot.
    pub fn unbind(&mut self) {
        self.binding = None;
    }

    /// Rewrites the bound position in place.
    ///
    /// Used for optimistic reorders where the data owner has already moved
    /// the item and the slot keeps its contents. Does nothing on an unbound slot.
    pub fn set_position(&mut self, position: usize) {
        if let Some(binding) = &mut self.binding {
            binding.position = position;
        }
    }

    /// Marks the slot as laid out.
    pub fn attach(&mut self) {
        debug_assert!(self.is_bound(), "attaching unbound slot {:?}", self.id);
        self.state = SlotState::Attached;
    }

    pub(crate) fn set_state(&mut self, state: SlotState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::{Binding, ItemType, Slot, SlotId, SlotKey, SlotState};

    #[test]
    fn stable_id_overrides_position_matching() {
        let bound = Binding::with_id(3, 77);
        let moved = SlotKey::at(9, ItemType(0)).with_stable_id(Some(77));
        let same_pos_other_id = SlotKey::at(3, ItemType(0)).with_stable_id(Some(12));
        assert!(bound.satisfies(&moved));
        assert!(!bound.satisfies(&same_pos_other_id));
        assert!(Binding::at(3).satisfies(&SlotKey::at(3, ItemType(1))));
    }

    #[test]
    fn new_slots_are_free_and_unbound() {
        let mut slot = Slot::new(SlotId(0), ItemType(2), ());
        assert_eq!(slot.state(), SlotState::Free);
        assert_eq!(slot.position(), None);

        slot.bind(Binding::at(4));
        slot.attach();
        assert_eq!(slot.state(), SlotState::Attached);
        slot.set_position(5);
        assert_eq!(slot.position(), Some(5));
    }
}
