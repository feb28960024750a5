// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The slot pool: a bounded FIFO cache plus a type-keyed free pool.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::{ItemType, ScrapSet, Slot, SlotId, SlotKey, SlotState};

const TARGET: &str = "recycler::pool";

/// Default capacity of the bound-slot cache.
pub const DEFAULT_CACHE_SIZE: usize = 2;

/// Default number of free slots kept per item type.
pub const DEFAULT_MAX_POOLED_PER_TYPE: usize = 5;

/// Where an acquired slot came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AcquireSource {
    /// Reclaimed from the current pass's scrap; binding is still valid.
    Scrap,
    /// Taken from the bound-slot cache; binding is still valid.
    Cache,
    /// Taken from the free pool; the caller must bind it.
    Pool,
}

impl AcquireSource {
    /// Returns `true` if the caller has to bind the slot before use.
    #[must_use]
    pub const fn needs_bind(self) -> bool {
        matches!(self, Self::Pool)
    }
}

/// A slot handed out by [`SlotPool::acquire`].
#[derive(Debug)]
pub struct Acquired<V> {
    /// The slot itself.
    pub slot: Slot<V>,
    /// Where it came from.
    pub source: AcquireSource,
}

/// Outcome of [`SlotPool::release`].
///
/// Whenever a slot is returned here it is still bound: the caller unbinds it
/// through its adapter and then passes it to [`SlotPool::recycle`].
#[derive(Debug)]
#[must_use = "slots returned by release must be unbound and recycled"]
pub enum Release<V> {
    /// The slot was cached with its binding intact.
    Cached,
    /// The slot was cached and pushed out the oldest cached slot.
    CachedEvicting(Slot<V>),
    /// The slot could not be cached.
    Unbind(Slot<V>),
}

/// Counters describing how the pool has been used.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Slots created through [`SlotPool::create`].
    pub created: u64,
    /// Acquisitions satisfied from scrap.
    pub scrap_hits: u64,
    /// Acquisitions satisfied from the cache.
    pub cache_hits: u64,
    /// Acquisitions satisfied from the free pool.
    pub pool_hits: u64,
    /// Acquisitions that found nothing.
    pub misses: u64,
    /// Cached slots pushed out by newer ones.
    pub evictions: u64,
    /// Slots accepted back into the free pool.
    pub recycled: u64,
    /// Slots refused by a full free pool.
    pub discarded: u64,
}

/// Bounded storage of reusable slots.
///
/// The pool exclusively owns cached and free slots. Attached slots belong to
/// the layout that placed them and scrap belongs to the pass in progress.
#[derive(Debug)]
pub struct SlotPool<V> {
    cache: VecDeque<Slot<V>>,
    free: HashMap<ItemType, Vec<Slot<V>>>,
    cache_capacity: usize,
    max_pooled_per_type: usize,
    next_id: u32,
    stats: PoolStats,
}

impl<V> Default for SlotPool<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE, DEFAULT_MAX_POOLED_PER_TYPE)
    }
}

impl<V> SlotPool<V> {
    /// Creates a pool with the given cache capacity and per-type free pool capacity.
    #[must_use]
    pub fn new(cache_capacity: usize, max_pooled_per_type: usize) -> Self {
        Self {
            cache: VecDeque::with_capacity(cache_capacity),
            free: HashMap::new(),
            cache_capacity,
            max_pooled_per_type,
            next_id: 0,
            stats: PoolStats::default(),
        }
    }

    /// Capacity of the bound-slot cache.
    #[must_use]
    pub const fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    /// Changes the cache capacity.
    ///
    /// Shrinking evicts the oldest entries; they are returned still bound for
    /// the caller to unbind and [`recycle`](Self::recycle).
    pub fn set_cache_capacity(&mut self, capacity: usize) -> Vec<Slot<V>> {
        self.cache_capacity = capacity;
        let mut evicted = Vec::new();
        while self.cache.len() > capacity {
            if let Some(slot) = self.cache.pop_front() {
                self.stats.evictions += 1;
                evicted.push(slot);
            }
        }
        evicted
    }

    /// Maximum number of free slots kept per item type.
    #[must_use]
    pub const fn max_pooled_per_type(&self) -> usize {
        self.max_pooled_per_type
    }

    /// Changes the per-type free pool capacity.
    ///
    /// Surplus free slots are returned for disposal.
    pub fn set_max_pooled_per_type(&mut self, max: usize) -> Vec<Slot<V>> {
        self.max_pooled_per_type = max;
        let mut surplus = Vec::new();
        for slots in self.free.values_mut() {
            while slots.len() > max {
                if let Some(mut slot) = slots.pop() {
                    slot.set_state(SlotState::Detached);
                    self.stats.discarded += 1;
                    surplus.push(slot);
                }
            }
        }
        surplus
    }

    /// Usage counters.
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Number of cached (still bound) slots.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Positions of cached slots, oldest first.
    pub fn cached_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.cache.iter().filter_map(Slot::position)
    }

    /// Number of free slots of `item_type`.
    #[must_use]
    pub fn pooled_len(&self, item_type: ItemType) -> usize {
        self.free.get(&item_type).map_or(0, Vec::len)
    }

    /// Total number of free slots across all types.
    #[must_use]
    pub fn total_pooled(&self) -> usize {
        self.free.values().map(Vec::len).sum()
    }

    /// Creates a brand new, unbound slot around `view`.
    ///
    /// Call this after [`acquire`](Self::acquire) returned `None`.
    pub fn create(&mut self, item_type: ItemType, view: V) -> Slot<V> {
        let id = SlotId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.stats.created += 1;
        tracing::trace!(target: TARGET, slot = id.0, ty = item_type.0, "created slot");
        Slot::new(id, item_type, view)
    }

    /// Finds a reusable slot for `key`.
    ///
    /// Priority order:
    /// 1. a scrapped slot bound to the key (no rebind),
    /// 2. a cached slot bound to the key (no rebind),
    /// 3. a free slot of the key's type (caller must bind),
    /// 4. `None`: the caller creates a new slot.
    ///
    /// Absence of a slot is the normal "create new" signal, never an error.
    pub fn acquire(&mut self, scrap: &mut ScrapSet<V>, key: SlotKey) -> Option<Acquired<V>> {
        if let Some(slot) = scrap.take(&key) {
            self.stats.scrap_hits += 1;
            tracing::trace!(target: TARGET, position = key.position, slot = slot.id().0, "scrap hit");
            return Some(Acquired {
                slot,
                source: AcquireSource::Scrap,
            });
        }

        let cached = self.cache.iter().position(|s| {
            s.item_type() == key.item_type && s.binding().is_some_and(|b| b.satisfies(&key))
        });
        if let Some(slot) = cached.and_then(|idx| self.cache.remove(idx)) {
            self.stats.cache_hits += 1;
            tracing::trace!(target: TARGET, position = key.position, slot = slot.id().0, "cache hit");
            return Some(Acquired {
                slot,
                source: AcquireSource::Cache,
            });
        }

        if let Some(slot) = self.free.get_mut(&key.item_type).and_then(Vec::pop) {
            self.stats.pool_hits += 1;
            tracing::trace!(target: TARGET, position = key.position, slot = slot.id().0, "pool hit");
            return Some(Acquired {
                slot,
                source: AcquireSource::Pool,
            });
        }

        self.stats.misses += 1;
        tracing::trace!(target: TARGET, position = key.position, ty = key.item_type.0, "miss");
        None
    }

    /// Moves a slot out of the attached set (or scrap).
    ///
    /// With `valid_for_cache` and a non-zero cache capacity the slot keeps its
    /// binding in the cache; a full cache pushes out its oldest entry first.
    /// Otherwise the slot comes straight back for unbinding.
    pub fn release(&mut self, mut slot: Slot<V>, valid_for_cache: bool) -> Release<V> {
        if !valid_for_cache || !slot.is_bound() || self.cache_capacity == 0 {
            return Release::Unbind(slot);
        }

        let evicted = if self.cache.len() >= self.cache_capacity {
            self.stats.evictions += 1;
            self.cache.pop_front()
        } else {
            None
        };

        slot.set_state(SlotState::Cached);
        tracing::trace!(target: TARGET, slot = slot.id().0, position = ?slot.position(), "cached");
        self.cache.push_back(slot);

        match evicted {
            Some(old) => {
                tracing::trace!(target: TARGET, slot = old.id().0, "evicted oldest cached slot");
                Release::CachedEvicting(old)
            }
            None => Release::Cached,
        }
    }

    /// Returns an unbound slot to the free pool of its type.
    ///
    /// The slot's binding is cleared regardless of what the caller did, so no
    /// item data survives into the pool. If the type's pool is full the slot
    /// is marked [`SlotState::Detached`] and handed back for disposal.
    pub fn recycle(&mut self, mut slot: Slot<V>) -> Option<Slot<V>> {
        slot.unbind();
        let bucket = self.free.entry(slot.item_type()).or_default();
        if bucket.len() >= self.max_pooled_per_type {
            slot.set_state(SlotState::Detached);
            self.stats.discarded += 1;
            tracing::trace!(target: TARGET, slot = slot.id().0, "free pool full, discarding");
            return Some(slot);
        }
        slot.set_state(SlotState::Free);
        self.stats.recycled += 1;
        bucket.push(slot);
        None
    }

    /// Drops every retained binding, optionally only for one item type.
    ///
    /// Cached slots matching the filter are removed and returned still bound;
    /// the caller unbinds them and passes them to [`recycle`](Self::recycle).
    /// Used when structural data changes invalidate positional assumptions.
    pub fn invalidate_all(&mut self, item_type: Option<ItemType>) -> Vec<Slot<V>> {
        let mut out = Vec::new();
        let mut kept = VecDeque::with_capacity(self.cache.len());
        for slot in self.cache.drain(..) {
            if item_type.is_none_or(|t| t == slot.item_type()) {
                out.push(slot);
            } else {
                kept.push_back(slot);
            }
        }
        self.cache = kept;
        tracing::debug!(target: TARGET, invalidated = out.len(), "invalidated cached slots");
        out
    }

    /// Removes every slot the pool owns, cached ones first.
    ///
    /// Used when the host tears the list down.
    pub fn clear(&mut self) -> Vec<Slot<V>> {
        let mut out: Vec<Slot<V>> = self.cache.drain(..).collect();
        for (_, slots) in self.free.drain() {
            out.extend(slots);
        }
        for slot in &mut out {
            slot.set_state(SlotState::Detached);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{AcquireSource, Release, SlotPool};
    use crate::{Binding, ItemType, ScrapSet, Slot, SlotKey, SlotState};

    const T0: ItemType = ItemType(0);
    const T1: ItemType = ItemType(1);

    fn bound(pool: &mut SlotPool<u32>, ty: ItemType, position: usize) -> Slot<u32> {
        let mut slot = pool.create(ty, position as u32);
        slot.bind(Binding::at(position));
        slot.attach();
        slot
    }

    fn unbind_and_recycle(pool: &mut SlotPool<u32>, mut slot: Slot<u32>) {
        slot.unbind();
        assert!(pool.recycle(slot).is_none());
    }

    #[test]
    fn acquire_priority_is_scrap_cache_pool() {
        let mut pool = SlotPool::new(4, 4);
        let mut scrap = ScrapSet::new();

        let s = bound(&mut pool, T0, 1);
        scrap.push(s);
        let c = bound(&mut pool, T0, 1);
        let _ = pool.release(c, true);
        let f = pool.create(T0, 99);
        assert!(pool.recycle(f).is_none());

        let key = SlotKey::at(1, T0);
        assert_eq!(pool.acquire(&mut scrap, key).unwrap().source, AcquireSource::Scrap);
        assert_eq!(pool.acquire(&mut scrap, key).unwrap().source, AcquireSource::Cache);
        let from_pool = pool.acquire(&mut scrap, key).unwrap();
        assert_eq!(from_pool.source, AcquireSource::Pool);
        assert!(from_pool.source.needs_bind());
        assert!(!from_pool.slot.is_bound());
        assert!(pool.acquire(&mut scrap, key).is_none());

        let stats = pool.stats();
        assert_eq!(
            (stats.scrap_hits, stats.cache_hits, stats.pool_hits, stats.misses),
            (1, 1, 1, 1)
        );
    }

    #[test]
    fn free_pool_is_partitioned_by_type() {
        let mut pool = SlotPool::new(0, 4);
        let mut scrap = ScrapSet::new();
        let f = pool.create(T1, 0);
        assert!(pool.recycle(f).is_none());

        assert!(pool.acquire(&mut scrap, SlotKey::at(0, T0)).is_none());
        assert!(pool.acquire(&mut scrap, SlotKey::at(0, T1)).is_some());
    }

    #[test]
    fn full_cache_evicts_exactly_the_oldest_entry() {
        let mut pool = SlotPool::new(2, 4);
        for p in 0..2 {
            let s = bound(&mut pool, T0, p);
            assert!(matches!(pool.release(s, true), Release::Cached));
        }

        for p in 2..6 {
            let s = bound(&mut pool, T0, p);
            let Release::CachedEvicting(old) = pool.release(s, true) else {
                panic!("full cache must evict");
            };
            assert_eq!(old.position(), Some(p - 2));
            unbind_and_recycle(&mut pool, old);
            assert_eq!(pool.cached_len(), 2);
        }

        assert_eq!(pool.cached_positions().collect::<Vec<_>>(), [4, 5]);
        assert_eq!(pool.stats().evictions, 4);
    }

    #[test]
    fn invalid_release_skips_the_cache() {
        let mut pool = SlotPool::new(2, 4);
        let s = bound(&mut pool, T0, 3);
        let Release::Unbind(slot) = pool.release(s, false) else {
            panic!("slot must come back for unbinding");
        };
        assert_eq!(pool.cached_len(), 0);
        unbind_and_recycle(&mut pool, slot);
        assert_eq!(pool.pooled_len(T0), 1);
    }

    #[test]
    fn zero_capacity_cache_never_holds_slots() {
        let mut pool = SlotPool::new(0, 4);
        let s = bound(&mut pool, T0, 0);
        assert!(matches!(pool.release(s, true), Release::Unbind(_)));
    }

    #[test]
    fn recycle_clears_bindings_and_discards_surplus() {
        let mut pool = SlotPool::new(0, 1);
        let first = bound(&mut pool, T0, 0);
        let second = bound(&mut pool, T0, 1);

        // Even a caller that forgot to unbind gets a clean free slot.
        assert!(pool.recycle(first).is_none());
        let surplus = pool.recycle(second).unwrap();
        assert_eq!(surplus.state(), SlotState::Detached);
        assert!(!surplus.is_bound());
        assert_eq!(pool.stats().discarded, 1);

        let mut scrap = ScrapSet::new();
        let reused = pool.acquire(&mut scrap, SlotKey::at(5, T0)).unwrap();
        assert_eq!(reused.slot.state(), SlotState::Free);
        assert_eq!(reused.slot.binding(), None);
    }

    #[test]
    fn cache_type_mismatch_is_not_reused() {
        let mut pool = SlotPool::new(2, 4);
        let mut scrap = ScrapSet::new();
        let s = bound(&mut pool, T0, 2);
        let _ = pool.release(s, true);
        assert!(pool.acquire(&mut scrap, SlotKey::at(2, T1)).is_none());
        assert_eq!(pool.cached_len(), 1);
    }

    #[test]
    fn stable_ids_follow_moved_items() {
        let mut pool = SlotPool::new(2, 4);
        let mut scrap = ScrapSet::new();
        let mut s = pool.create(T0, 0);
        s.bind(Binding::with_id(2, 500));
        s.attach();
        let _ = pool.release(s, true);

        let key = SlotKey::at(8, T0).with_stable_id(Some(500));
        let hit = pool.acquire(&mut scrap, key).unwrap();
        assert_eq!(hit.source, AcquireSource::Cache);
    }

    #[test]
    fn invalidate_all_respects_type_filter() {
        let mut pool = SlotPool::new(4, 4);
        for (ty, p) in [(T0, 0), (T1, 1), (T0, 2)] {
            let s = bound(&mut pool, ty, p);
            let _ = pool.release(s, true);
        }

        let dropped = pool.invalidate_all(Some(T0));
        assert_eq!(dropped.len(), 2);
        assert_eq!(pool.cached_positions().collect::<Vec<_>>(), [1]);
        for slot in dropped {
            unbind_and_recycle(&mut pool, slot);
        }
        assert_eq!(pool.pooled_len(T0), 2);

        assert_eq!(pool.invalidate_all(None).len(), 1);
        assert_eq!(pool.cached_len(), 0);
    }

    #[test]
    fn shrinking_the_cache_returns_oldest_entries() {
        let mut pool = SlotPool::new(3, 4);
        for p in 0..3 {
            let s = bound(&mut pool, T0, p);
            let _ = pool.release(s, true);
        }
        let evicted = pool.set_cache_capacity(1);
        let positions: Vec<_> = evicted.iter().filter_map(Slot::position).collect();
        assert_eq!(positions, [0, 1]);
        assert_eq!(pool.cached_positions().collect::<Vec<_>>(), [2]);
    }
}
