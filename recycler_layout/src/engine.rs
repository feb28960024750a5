// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared fill/recycle pass and the viewport it lays out.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Insets, Point, Rect, Size, Vec2};
use recycler_pool::{AcquireSource, Acquired, ScrapSet, Slot, SlotId, SlotKey, SlotPool};
use smallvec::SmallVec;

use crate::adapter::{recycle_slot, release_slot};
use crate::{
    Adapter, ItemChange, ItemDecoration, ItemFrame, LayoutError, LayoutStrategy, Orientation,
    TARGET,
};

// Extra fills allowed when measurements move the anchor mid-pass.
const MAX_FILL_ROUNDS: usize = 3;

/// An attached slot as it was before the current pass.
#[derive(Copy, Clone, Debug)]
struct PreviousSlot {
    id: SlotId,
    position: usize,
    rect: Rect,
    translation: Vec2,
}

/// Alignment mode when scrolling a specific position into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the start (top/leading edge) of the item with the viewport.
    Start,
    /// Center the item within the viewport.
    Center,
    /// Align the end (bottom/trailing edge) of the item with the viewport.
    End,
    /// Move just enough to make the item fully visible, preferring the
    /// smallest change from the current scroll offset.
    Nearest,
}

/// Where the viewport sits over the content.
///
/// The scroll offset is stored relative to an anchor position rather than as
/// an absolute pixel value, so re-measuring items above the anchor does not
/// move what the user is looking at.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ViewportState {
    /// Main scroll axis.
    pub orientation: Orientation,
    /// Lays position 0 out at the far edge of the viewport.
    pub reverse: bool,
    /// Position the viewport is anchored to.
    pub anchor_position: usize,
    /// Pixels between the anchor's start and the viewport start.
    pub anchor_offset: f64,
    /// Main-axis extent of all content, as of the last pass.
    pub total_extent: f64,
    /// Scroll offset along the cross axis, for content wider than the viewport.
    pub cross_offset: f64,
}

/// A slot laid out by the last pass.
#[derive(Debug)]
pub struct AttachedSlot<V> {
    position: usize,
    frame: ItemFrame,
    insets: Insets,
    rect: Rect,
    translation: Vec2,
    slot: Slot<V>,
}

impl<V> AttachedSlot<V> {
    /// Adapter position of the item shown.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The slot.
    #[must_use]
    pub const fn slot(&self) -> &Slot<V> {
        &self.slot
    }

    /// The slot, mutably (for example to update the host view).
    pub fn slot_mut(&mut self) -> &mut Slot<V> {
        &mut self.slot
    }

    /// Placement in content coordinates, decoration insets included.
    #[must_use]
    pub const fn frame(&self) -> ItemFrame {
        self.frame
    }

    /// Decorated bounds in viewport coordinates.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Bounds of the slot itself, inside its decoration insets.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        let (r, i) = (self.rect, self.insets);
        Rect::new(r.x0 + i.x0, r.y0 + i.y0, r.x1 - i.x1, r.y1 - i.y1)
    }

    /// Decoration insets contributed for this item.
    #[must_use]
    pub const fn insets(&self) -> Insets {
        self.insets
    }

    /// Visual offset applied on top of the layout (drag and swipe).
    #[must_use]
    pub const fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Bounds as drawn: [`rect`](Self::rect) moved by the translation.
    #[must_use]
    pub fn visual_rect(&self) -> Rect {
        self.rect + self.translation
    }
}

/// Counters for one layout pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Slots attached when the pass finished.
    pub attached: usize,
    /// Slots reclaimed from scrap without a rebind.
    pub scrap_reused: usize,
    /// Slots taken from the cache without a rebind.
    pub cache_reused: usize,
    /// Free slots rebound to a new position.
    pub rebound: usize,
    /// Slots created because nothing could be reused.
    pub created: usize,
    /// Slots released back to the pool.
    pub released: usize,
    /// Slots the free pool had no room for.
    pub discarded: usize,
}

impl PassReport {
    /// Slots that needed an adapter bind during the pass.
    #[must_use]
    pub const fn bound(&self) -> usize {
        self.rebound + self.created
    }
}

/// Drives a [`LayoutStrategy`] against a [`SlotPool`] for one viewport.
///
/// Every pass follows the same steps:
///
/// 1. every attached slot moves into the pass-scoped [`ScrapSet`],
/// 2. positions are walked in layout order from the anchor; each one is
///    acquired from the pool (scrap, cache, free pool, or created), measured,
///    and attached until the viewport plus the look-ahead extent is covered,
/// 3. scrap that was not reclaimed is released to the cache/pool,
/// 4. the scrap set is left empty.
///
/// A pass is atomic from the caller's point of view.
pub struct LayoutEngine<V, S> {
    strategy: S,
    pool: SlotPool<V>,
    scrap: ScrapSet<V>,
    attached: Vec<AttachedSlot<V>>,
    state: ViewportState,
    offset: f64,
    viewport: Option<Size>,
    look_ahead: f64,
    decorations: Vec<Box<dyn ItemDecoration>>,
    needs_layout: bool,
    last_report: PassReport,
    changes: Vec<ItemChange>,
}

impl<V, S: fmt::Debug> fmt::Debug for LayoutEngine<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("strategy", &self.strategy)
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("viewport", &self.viewport)
            .field("look_ahead", &self.look_ahead)
            .field("attached", &self.attached.len())
            .field("decorations", &self.decorations.len())
            .field("needs_layout", &self.needs_layout)
            .finish_non_exhaustive()
    }
}

impl<V, S: LayoutStrategy> LayoutEngine<V, S> {
    /// Creates an engine with no viewport; layout is a no-op until one is set.
    #[must_use]
    pub fn new(strategy: S, pool: SlotPool<V>) -> Self {
        Self {
            strategy,
            pool,
            scrap: ScrapSet::new(),
            attached: Vec::new(),
            state: ViewportState::default(),
            offset: 0.0,
            viewport: None,
            look_ahead: 0.0,
            decorations: Vec::new(),
            needs_layout: true,
            last_report: PassReport::default(),
            changes: Vec::new(),
        }
    }

    /// The layout strategy.
    #[must_use]
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The layout strategy, mutably. Schedules a pass.
    pub fn strategy_mut(&mut self) -> &mut S {
        self.needs_layout = true;
        &mut self.strategy
    }

    /// The slot pool.
    #[must_use]
    pub const fn pool(&self) -> &SlotPool<V> {
        &self.pool
    }

    /// Number of slots in scrap. Always zero between passes.
    #[must_use]
    pub fn scrap_len(&self) -> usize {
        self.scrap.len()
    }

    /// Current viewport state.
    #[must_use]
    pub const fn viewport_state(&self) -> &ViewportState {
        &self.state
    }

    /// Viewport size, if the host has attached one.
    #[must_use]
    pub const fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    /// Main-axis scroll offset as of the last pass or scroll.
    #[must_use]
    pub const fn scroll_offset(&self) -> f64 {
        self.offset
    }

    /// Slots laid out by the last pass, in position order.
    #[must_use]
    pub fn attached(&self) -> &[AttachedSlot<V>] {
        &self.attached
    }

    /// Counters of the last completed pass.
    #[must_use]
    pub const fn last_report(&self) -> PassReport {
        self.last_report
    }

    /// Returns `true` if something changed since the last pass.
    #[must_use]
    pub const fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Schedules a pass.
    pub fn request_layout(&mut self) {
        self.needs_layout = true;
    }

    /// Removes and returns the item changes recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<ItemChange> {
        core::mem::take(&mut self.changes)
    }

    /// Sets or clears the viewport size.
    pub fn set_viewport(&mut self, viewport: Option<Size>) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.needs_layout = true;
        }
    }

    /// Sets the extent laid out beyond each edge of the viewport.
    pub fn set_look_ahead(&mut self, extent: f64) {
        let extent = extent.max(0.0);
        if extent != self.look_ahead {
            self.look_ahead = extent;
            self.needs_layout = true;
        }
    }

    /// Extent laid out beyond each edge of the viewport.
    #[must_use]
    pub const fn look_ahead(&self) -> f64 {
        self.look_ahead
    }

    /// Sets the main scroll axis.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation != self.state.orientation {
            self.state.orientation = orientation;
            self.state.cross_offset = 0.0;
            self.needs_layout = true;
        }
    }

    /// Lays position 0 out at the far edge of the viewport.
    pub fn set_reverse(&mut self, reverse: bool) {
        if reverse != self.state.reverse {
            self.state.reverse = reverse;
            self.needs_layout = true;
        }
    }

    /// Adds a decoration; its insets apply from the next pass.
    pub fn add_decoration(&mut self, decoration: Box<dyn ItemDecoration>) {
        self.decorations.push(decoration);
        self.needs_layout = true;
    }

    /// Changes the cache capacity, unbinding anything it pushes out.
    pub fn set_cache_size<A: Adapter<V> + ?Sized>(&mut self, size: usize, adapter: &mut A) {
        let mut report = PassReport::default();
        for slot in self.pool.set_cache_capacity(size) {
            recycle_slot(&mut self.pool, adapter, slot, &mut report);
        }
    }

    /// Changes the per-type free pool capacity, disposing of the surplus.
    pub fn set_max_pooled_per_type<A: Adapter<V> + ?Sized>(&mut self, max: usize, adapter: &mut A) {
        for slot in self.pool.set_max_pooled_per_type(max) {
            adapter.dispose(slot);
        }
    }

    fn main_extent(&self) -> f64 {
        self.viewport
            .map_or(0.0, |size| self.state.orientation.main(size))
    }

    fn cross_extent(&self) -> f64 {
        self.viewport
            .map_or(0.0, |size| self.state.orientation.cross(size))
    }

    fn max_offset(&mut self) -> f64 {
        (self.strategy.content_extent() - self.main_extent()).max(0.0)
    }

    /// Offset implied by the anchor, before clamping.
    fn anchored_offset(&mut self) -> f64 {
        let count = self.strategy.item_count();
        if count == 0 {
            return 0.0;
        }
        let anchor = self.state.anchor_position.min(count - 1);
        self.strategy.frame_of(anchor).main_start + self.state.anchor_offset
    }

    fn resolve_offset(&mut self) -> f64 {
        let max = self.max_offset();
        self.anchored_offset().clamp(0.0, max)
    }

    /// Moves the viewport to `offset` and re-anchors to the position there.
    fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        if self.strategy.item_count() == 0 {
            self.state.anchor_position = 0;
            self.state.anchor_offset = 0.0;
            return;
        }
        let first = self.strategy.first_position_at(offset);
        let anchor = self.strategy.anchor_for(first);
        let start = self.strategy.frame_of(anchor).main_start;
        self.state.anchor_position = anchor;
        self.state.anchor_offset = offset - start;
    }

    fn window(&self) -> (f64, f64) {
        (
            self.offset - self.look_ahead,
            self.offset + self.main_extent() + self.look_ahead,
        )
    }

    fn sync_strategy(&mut self, item_count: usize) {
        let cross = self.cross_extent();
        self.strategy.prepare(item_count, cross);
    }

    /// Maps a content-space frame into viewport coordinates.
    fn place(&self, frame: &ItemFrame) -> Rect {
        let mut main = frame.main_start - self.offset;
        if self.state.reverse {
            main = self.main_extent() - main - frame.main_extent;
        }
        let cross = frame.cross_start - self.state.cross_offset;
        match self.state.orientation {
            Orientation::Vertical => Rect::new(
                cross,
                main,
                cross + frame.cross_extent,
                main + frame.main_extent,
            ),
            Orientation::Horizontal => Rect::new(
                main,
                cross,
                main + frame.main_extent,
                cross + frame.cross_extent,
            ),
        }
    }

    fn place_all(&mut self) {
        for i in 0..self.attached.len() {
            let rect = self.place(&self.attached[i].frame);
            self.attached[i].rect = rect;
        }
    }

    fn insets_for(&self, position: usize) -> Insets {
        self.decorations
            .iter()
            .fold(Insets::uniform(0.0), |acc, decoration| {
                let i = decoration.item_insets(position);
                Insets::new(acc.x0 + i.x0, acc.y0 + i.y0, acc.x1 + i.x1, acc.y1 + i.y1)
            })
    }

    /// Runs one fill/recycle pass.
    ///
    /// Without a viewport this does nothing and succeeds. If the adapter's
    /// item count changes mid-pass the pass is abandoned: all scrap is
    /// released, another pass is scheduled, and
    /// [`LayoutError::InconsistentItemCount`] is returned.
    pub fn layout<A: Adapter<V> + ?Sized>(&mut self, adapter: &mut A) -> Result<PassReport, LayoutError> {
        let mut report = PassReport::default();
        if self.viewport.is_none() {
            tracing::trace!(target: TARGET, "no viewport, layout skipped");
            return Ok(report);
        }

        let count = adapter.item_count();
        self.sync_strategy(count);

        let mut previous: SmallVec<[PreviousSlot; 16]> = SmallVec::new();
        for attached in self.attached.drain(..) {
            previous.push(PreviousSlot {
                id: attached.slot.id(),
                position: attached.position,
                rect: attached.rect,
                translation: attached.translation,
            });
            self.scrap.push(attached.slot);
        }

        if count == 0 {
            self.offset = 0.0;
            self.state.anchor_position = 0;
            self.state.anchor_offset = 0.0;
        } else {
            self.offset = self.resolve_offset();
            for round in 0..MAX_FILL_ROUNDS {
                if let Err(err) = self.fill(adapter, count, &previous, &mut report) {
                    self.release_scrap(adapter, &mut report);
                    self.needs_layout = true;
                    tracing::warn!(target: TARGET, %err, "layout pass aborted");
                    return Err(err);
                }
                let settled = self.resolve_offset();
                self.set_offset(settled);
                if self.covers_window() {
                    break;
                }
                tracing::trace!(target: TARGET, round, "anchor moved during fill, refilling");
                for attached in self.attached.drain(..) {
                    self.scrap.push(attached.slot);
                }
            }
            self.trim_to_window();
        }

        self.release_scrap(adapter, &mut report);
        debug_assert!(self.scrap.is_empty(), "scrap must be empty after a pass");
        debug_assert!(
            self.attached.windows(2).all(|w| w[0].position < w[1].position),
            "attached positions must be unique and ordered"
        );

        self.state.total_extent = self.strategy.content_extent();
        let cross = self.cross_extent();
        let max_cross = (self.strategy.cross_content_extent(cross) - cross).max(0.0);
        self.state.cross_offset = self.state.cross_offset.clamp(0.0, max_cross);
        self.place_all();
        self.record_changes(&previous);

        report.attached = self.attached.len();
        self.last_report = report;
        self.needs_layout = false;
        tracing::debug!(
            target: TARGET,
            attached = report.attached,
            scrap = report.scrap_reused,
            cache = report.cache_reused,
            rebound = report.rebound,
            created = report.created,
            released = report.released,
            offset = self.offset,
            "layout pass"
        );
        Ok(report)
    }

    fn fill<A: Adapter<V> + ?Sized>(
        &mut self,
        adapter: &mut A,
        count: usize,
        previous: &[PreviousSlot],
        report: &mut PassReport,
    ) -> Result<(), LayoutError> {
        let orientation = self.state.orientation;
        let (window_start, _) = self.window();
        let first = self.strategy.first_position_at(window_start.max(0.0));
        let mut position = self.strategy.anchor_for(first);

        while position < count {
            let (window_start, window_end) = self.window();
            let frame = self.strategy.frame_of(position);
            if frame.main_start >= window_end {
                break;
            }
            if !frame.intersects(window_start, window_end) {
                position += 1;
                continue;
            }

            let actual = adapter.item_count();
            if actual != count {
                return Err(LayoutError::InconsistentItemCount {
                    expected: count,
                    actual,
                });
            }

            let key = SlotKey::at(position, adapter.item_type(position))
                .with_stable_id(adapter.stable_id(position));
            let mut slot = self.obtain(adapter, key, report);

            let insets = self.insets_for(position);
            let (main_insets, cross_insets) = match orientation {
                Orientation::Vertical => (insets.y_value(), insets.x_value()),
                Orientation::Horizontal => (insets.x_value(), insets.y_value()),
            };
            let constraint = (self.strategy.cross_constraint(position) - cross_insets).max(0.0);
            if let Some(extent) = adapter.measure(&slot, position, constraint) {
                if self.strategy.set_measured_extent(position, extent + main_insets) {
                    // Keep the anchor where it was; the window follows it.
                    self.offset = self.anchored_offset();
                }
            }

            slot.attach();
            // Translations belong to the slot, not to whatever now sits at its position.
            let translation = previous
                .iter()
                .find(|p| p.id == slot.id())
                .map_or(Vec2::ZERO, |p| p.translation);
            self.attached.push(AttachedSlot {
                position,
                frame: self.strategy.frame_of(position),
                insets,
                rect: Rect::ZERO,
                translation,
                slot,
            });
            position += 1;
        }
        Ok(())
    }

    /// Acquires a slot for `key`, binding through the adapter when needed.
    fn obtain<A: Adapter<V> + ?Sized>(
        &mut self,
        adapter: &mut A,
        key: SlotKey,
        report: &mut PassReport,
    ) -> Slot<V> {
        match self.pool.acquire(&mut self.scrap, key) {
            Some(Acquired { mut slot, source }) => {
                if source.needs_bind() {
                    slot.bind(key.binding());
                    adapter.bind(&mut slot, key.position);
                    report.rebound += 1;
                } else {
                    if source == AcquireSource::Scrap {
                        report.scrap_reused += 1;
                    } else {
                        report.cache_reused += 1;
                    }
                    // A stable-id match may come from another position.
                    slot.set_position(key.position);
                }
                slot
            }
            None => {
                let view = adapter.create_view(key.item_type);
                let mut slot = self.pool.create(key.item_type, view);
                slot.bind(key.binding());
                adapter.bind(&mut slot, key.position);
                report.created += 1;
                slot
            }
        }
    }

    /// Returns `true` if every position the window needs is attached.
    fn covers_window(&mut self) -> bool {
        let count = self.strategy.item_count();
        let (window_start, window_end) = self.window();
        let first = self.strategy.first_position_at(window_start.max(0.0));
        let mut position = self.strategy.anchor_for(first);
        while position < count {
            let frame = self.strategy.frame_of(position);
            if frame.main_start >= window_end {
                break;
            }
            if frame.intersects(window_start, window_end)
                && self
                    .attached
                    .binary_search_by_key(&position, |a| a.position)
                    .is_err()
            {
                return false;
            }
            position += 1;
        }
        true
    }

    /// Moves attached slots that ended up outside the window back to scrap.
    fn trim_to_window(&mut self) {
        let (window_start, window_end) = self.window();
        let mut i = 0;
        while i < self.attached.len() {
            if self.attached[i].frame.intersects(window_start, window_end) {
                i += 1;
            } else {
                let attached = self.attached.remove(i);
                self.scrap.push(attached.slot);
            }
        }
    }

    fn release_scrap<A: Adapter<V> + ?Sized>(&mut self, adapter: &mut A, report: &mut PassReport) {
        for slot in self.scrap.drain() {
            release_slot(&mut self.pool, adapter, slot, true, report);
        }
    }

    fn record_changes(&mut self, previous: &[PreviousSlot]) {
        for &PreviousSlot { position, rect, .. } in previous {
            if self
                .attached
                .binary_search_by_key(&position, |a| a.position)
                .is_err()
            {
                self.changes.push(ItemChange::Disappeared { position, rect });
            }
        }
        for attached in &self.attached {
            if !previous.iter().any(|p| p.position == attached.position) {
                self.changes.push(ItemChange::Appeared {
                    position: attached.position,
                    rect: attached.rect,
                });
            }
        }
    }

    /// Scrolls along the main axis by a physical `delta` and lays out.
    ///
    /// The delta is clamped so the viewport stays within the content. Returns
    /// the delta actually consumed; when that is zero no pass runs. In a
    /// reversed layout positive deltas move towards position 0.
    pub fn scroll_main_by<A: Adapter<V> + ?Sized>(
        &mut self,
        delta: f64,
        adapter: &mut A,
    ) -> Result<f64, LayoutError> {
        if self.viewport.is_none() || delta == 0.0 {
            return Ok(0.0);
        }
        self.sync_strategy(adapter.item_count());
        let logical = if self.state.reverse { -delta } else { delta };
        let current = self.resolve_offset();
        let max = self.max_offset();
        let target = (current + logical).clamp(0.0, max);
        let consumed = target - current;
        if consumed == 0.0 {
            return Ok(0.0);
        }
        self.set_offset(target);
        self.layout(adapter)?;
        Ok(if self.state.reverse { -consumed } else { consumed })
    }

    /// Scrolls along the cross axis; returns the consumed delta.
    ///
    /// Only content wider than the viewport scrolls. Attached slots keep
    /// their frames so no pass runs.
    pub fn scroll_cross_by(&mut self, delta: f64) -> f64 {
        let cross = self.cross_extent();
        let max = (self.strategy.cross_content_extent(cross) - cross).max(0.0);
        let current = self.state.cross_offset;
        let target = (current + delta).clamp(0.0, max);
        let consumed = target - current;
        if consumed != 0.0 {
            self.state.cross_offset = target;
            self.place_all();
        }
        consumed
    }

    /// Scrolls so that `position` is in view with the given alignment, then lays out.
    ///
    /// Without a viewport only the anchor moves.
    pub fn scroll_to_position<A: Adapter<V> + ?Sized>(
        &mut self,
        position: usize,
        align: ScrollAlign,
        adapter: &mut A,
    ) -> Result<PassReport, LayoutError> {
        let count = adapter.item_count();
        self.sync_strategy(count);
        if count == 0 {
            return self.layout(adapter);
        }
        let position = position.min(count - 1);
        if self.viewport.is_none() {
            self.state.anchor_position = self.strategy.anchor_for(position);
            self.state.anchor_offset = 0.0;
            self.needs_layout = true;
            return Ok(PassReport::default());
        }

        let frame = self.strategy.frame_of(position);
        let (item_start, item_end) = (frame.main_start, frame.main_end());
        let viewport = self.main_extent();
        let current = self.resolve_offset();
        let target = match align {
            ScrollAlign::Start => item_start,
            ScrollAlign::End => item_end - viewport,
            ScrollAlign::Center => (item_start + item_end) / 2.0 - viewport / 2.0,
            ScrollAlign::Nearest => {
                if item_start >= current && item_end <= current + viewport {
                    current
                } else if item_start < current {
                    item_start
                } else {
                    item_end - viewport
                }
            }
        };
        let max = self.max_offset();
        self.set_offset(target.clamp(0.0, max));
        tracing::debug!(target: TARGET, position, ?align, offset = self.offset, "scroll to position");
        self.layout(adapter)
    }

    /// Places the start of `position` `offset` pixels from the viewport start, then lays out.
    pub fn scroll_to_position_with_offset<A: Adapter<V> + ?Sized>(
        &mut self,
        position: usize,
        offset: f64,
        adapter: &mut A,
    ) -> Result<PassReport, LayoutError> {
        let count = adapter.item_count();
        self.sync_strategy(count);
        if count > 0 {
            let position = position.min(count - 1);
            let anchor = self.strategy.anchor_for(position);
            let item_start = self.strategy.frame_of(position).main_start;
            let anchor_start = self.strategy.frame_of(anchor).main_start;
            self.state.anchor_position = anchor;
            self.state.anchor_offset = item_start - anchor_start - offset;
        }
        self.needs_layout = true;
        self.layout(adapter)
    }

    fn main_window(&self) -> (f64, f64) {
        (self.offset, self.offset + self.main_extent())
    }

    /// Lowest attached position overlapping the viewport.
    #[must_use]
    pub fn first_visible_position(&self) -> Option<usize> {
        let (start, end) = self.main_window();
        self.attached
            .iter()
            .find(|a| a.frame.intersects(start, end))
            .map(|a| a.position)
    }

    /// Highest attached position overlapping the viewport.
    #[must_use]
    pub fn last_visible_position(&self) -> Option<usize> {
        let (start, end) = self.main_window();
        self.attached
            .iter()
            .rev()
            .find(|a| a.frame.intersects(start, end))
            .map(|a| a.position)
    }

    /// Returns `true` if `position` is attached and entirely inside the viewport.
    #[must_use]
    pub fn is_position_fully_visible(&self, position: usize) -> bool {
        let (start, end) = self.main_window();
        self.attached_at(position)
            .is_some_and(|a| a.frame.main_start >= start && a.frame.main_end() <= end)
    }

    /// The attached slot showing `position`.
    #[must_use]
    pub fn attached_at(&self, position: usize) -> Option<&AttachedSlot<V>> {
        self.attached
            .binary_search_by_key(&position, |a| a.position)
            .ok()
            .map(|i| &self.attached[i])
    }

    /// The topmost attached slot whose drawn bounds contain `point` (viewport coordinates).
    #[must_use]
    pub fn find_slot_at(&self, point: Point) -> Option<&AttachedSlot<V>> {
        self.attached
            .iter()
            .rev()
            .find(|a| a.visual_rect().contains(point))
    }

    /// Sets the visual offset of an attached slot. Returns `false` if `position` is not attached.
    pub fn set_translation(&mut self, position: usize, translation: Vec2) -> bool {
        match self
            .attached
            .binary_search_by_key(&position, |a| a.position)
        {
            Ok(i) => {
                self.attached[i].translation = translation;
                true
            }
            Err(_) => false,
        }
    }

    /// Records that the data owner moved an item, reordering attached slots in place.
    ///
    /// Attached slots keep their bindings and follow their items; cached
    /// slots lose theirs since their positions are stale. Returns the
    /// [`ItemChange::Moved`] that was recorded, or `None` for an invalid move.
    pub fn move_attached<A: Adapter<V> + ?Sized>(
        &mut self,
        from: usize,
        to: usize,
        adapter: &mut A,
    ) -> Option<ItemChange> {
        let count = self.strategy.item_count();
        if from >= count || to >= count || from == to {
            return None;
        }
        let from_rect = {
            let frame = self.strategy.frame_of(from);
            self.place(&frame)
        };

        for attached in &mut self.attached {
            let moved = shifted(attached.position, from, to);
            attached.position = moved;
            attached.slot.set_position(moved);
        }
        self.attached.sort_by_key(|a| a.position);
        self.strategy.move_item(from, to);

        let mut report = PassReport::default();
        for slot in self.pool.invalidate_all(None) {
            recycle_slot(&mut self.pool, adapter, slot, &mut report);
        }

        for attached in &mut self.attached {
            attached.frame = self.strategy.frame_of(attached.position);
        }
        let offset = self.offset;
        self.set_offset(offset);
        self.place_all();

        let to_rect = {
            let frame = self.strategy.frame_of(to);
            self.place(&frame)
        };
        let change = ItemChange::Moved {
            from,
            to,
            from_rect,
            to_rect,
        };
        tracing::debug!(target: TARGET, from, to, "moved attached item");
        self.changes.push(change);
        self.needs_layout = true;
        Some(change)
    }

    /// Records that an item was swiped away with a final visual offset.
    pub fn record_dismissal(&mut self, position: usize, offset: Vec2) {
        self.changes.push(ItemChange::Dismissed { position, offset });
    }

    /// Drops every positional assumption after the data set changed.
    ///
    /// Attached slots bound with a stable id stay attached and are matched by
    /// id on the next pass. All others, and every cached slot, are unbound.
    pub fn data_set_changed<A: Adapter<V> + ?Sized>(&mut self, adapter: &mut A) {
        let mut report = PassReport::default();
        let mut kept = Vec::with_capacity(self.attached.len());
        for attached in self.attached.drain(..) {
            if attached
                .slot
                .binding()
                .is_some_and(|b| b.stable_id.is_some())
            {
                kept.push(attached);
            } else {
                release_slot(&mut self.pool, adapter, attached.slot, false, &mut report);
            }
        }
        self.attached = kept;
        for slot in self.pool.invalidate_all(None) {
            recycle_slot(&mut self.pool, adapter, slot, &mut report);
        }
        tracing::debug!(
            target: TARGET,
            kept = self.attached.len(),
            unbound = report.released,
            "data set changed"
        );
        self.needs_layout = true;
    }

    /// Releases every slot back to the adapter for disposal.
    pub fn clear<A: Adapter<V> + ?Sized>(&mut self, adapter: &mut A) {
        let mut report = PassReport::default();
        for attached in self.attached.drain(..) {
            release_slot(&mut self.pool, adapter, attached.slot, false, &mut report);
        }
        for slot in self.pool.invalidate_all(None) {
            recycle_slot(&mut self.pool, adapter, slot, &mut report);
        }
        for slot in self.pool.clear() {
            adapter.dispose(slot);
        }
        self.state.anchor_position = 0;
        self.state.anchor_offset = 0.0;
        self.offset = 0.0;
        self.needs_layout = true;
    }
}

/// Where `position` ends up after the item at `from` moves to `to`.
fn shifted(position: usize, from: usize, to: usize) -> usize {
    if position == from {
        to
    } else if from < to && position > from && position <= to {
        position - 1
    } else if from > to && position >= to && position < from {
        position + 1
    } else {
        position
    }
}
