// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The state listeners see while a gesture is dispatched.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::mem;

use kurbo::{Point, Rect, Size, Vec2};
use recycler_drag_swipe::DragSwipeHost;
use recycler_gesture::ScrollHost;
use recycler_layout::{Adapter, LayoutEngine, LayoutError, LayoutStrategy, ScrollAlign};
use recycler_pool::ItemType;
use recycler_scroll::{
    Axis, NestedScrollParent, NoNestedParent, ScrollAxes, ScrollCoordinator, ScrollState,
    ScrollStep, ScrollTarget,
};

use crate::TARGET;
use crate::config::{cross_axis, main_axis};

/// A layout-affecting request made while the view was busy.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Deferred {
    Layout,
    ScrollToPosition(usize, ScrollAlign),
    DataSetChanged,
}

/// The list as seen from inside a gesture listener.
///
/// Listeners run in the middle of a dispatch, so anything that would start a
/// layout pass is queued and serviced when the next entry point of the
/// [`RecyclerView`](crate::RecyclerView) runs. Reads reflect the last
/// completed pass.
pub struct ViewHost<V, S, A> {
    pub(crate) engine: LayoutEngine<V, S>,
    pub(crate) adapter: A,
    pub(crate) scroll: ScrollCoordinator,
    pub(crate) parent: Box<dyn NestedScrollParent>,
    pub(crate) deferred: Vec<Deferred>,
    pub(crate) error: Option<LayoutError>,
}

impl<V, S, A> fmt::Debug for ViewHost<V, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHost")
            .field("scroll", &self.scroll)
            .field("deferred", &self.deferred.len())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<V, S: LayoutStrategy, A: Adapter<V>> ViewHost<V, S, A> {
    pub(crate) fn new(engine: LayoutEngine<V, S>, adapter: A, scroll: ScrollCoordinator) -> Self {
        Self {
            engine,
            adapter,
            scroll,
            parent: Box::new(NoNestedParent),
            deferred: Vec::new(),
            error: None,
        }
    }

    /// The layout engine, as of the last completed pass.
    #[must_use]
    pub fn engine(&self) -> &LayoutEngine<V, S> {
        &self.engine
    }

    /// The adapter.
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The adapter, mutably. Call [`notify_data_set_changed`](Self::notify_data_set_changed)
    /// after changing what it reports.
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Current scroll state.
    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    /// Queues a layout pass.
    pub fn request_layout(&mut self) {
        self.defer(Deferred::Layout);
    }

    /// Queues a jump to `position`.
    pub fn request_scroll_to_position(&mut self, position: usize, align: ScrollAlign) {
        self.defer(Deferred::ScrollToPosition(position, align));
    }

    /// Queues a full rebind after the adapter's data changed.
    pub fn notify_data_set_changed(&mut self) {
        self.defer(Deferred::DataSetChanged);
    }

    fn defer(&mut self, request: Deferred) {
        tracing::debug!(target: TARGET, ?request, "deferred until the current call returns");
        self.deferred.push(request);
    }

    /// Runs queued requests in order. On failure the rest stay queued.
    pub(crate) fn service_deferred(&mut self) -> Result<(), LayoutError> {
        let pending = mem::take(&mut self.deferred);
        for (i, request) in pending.iter().enumerate() {
            if let Err(err) = self.run(*request) {
                self.deferred.extend_from_slice(&pending[i + 1..]);
                return Err(err);
            }
        }
        Ok(())
    }

    fn run(&mut self, request: Deferred) -> Result<(), LayoutError> {
        match request {
            Deferred::Layout => {
                self.engine.layout(&mut self.adapter)?;
            }
            Deferred::ScrollToPosition(position, align) => {
                self.engine
                    .scroll_to_position(position, align, &mut self.adapter)?;
                self.scroll.stop(self.parent.as_mut());
            }
            Deferred::DataSetChanged => self.engine.data_set_changed(&mut self.adapter),
        }
        Ok(())
    }

    /// Axes the content can currently move along.
    pub(crate) fn scrollable_axes(&self) -> ScrollAxes {
        let orientation = self.engine.viewport_state().orientation;
        let mut axes = main_axis(orientation).flag();
        if let Some(size) = self.engine.viewport() {
            let cross = orientation.cross(size);
            if self.engine.strategy().cross_content_extent(cross) > cross {
                axes |= cross_axis(orientation).flag();
            }
        }
        axes
    }

    pub(crate) fn sync_axes(&mut self) {
        let axes = self.scrollable_axes();
        self.scroll.set_axes(axes);
    }

    /// One nested-scroll step along `axis`. Layout failures are kept in `error`.
    pub(crate) fn scroll_along(&mut self, axis: Axis, delta: f64) -> ScrollStep {
        let mut target = EngineTarget {
            engine: &mut self.engine,
            adapter: &mut self.adapter,
            error: None,
        };
        let step = self
            .scroll
            .scroll_by(axis, delta, self.parent.as_mut(), &mut target);
        if let Some(err) = target.error {
            self.error = Some(err);
        }
        step
    }

    /// One fling step at `now`.
    pub(crate) fn advance_fling(&mut self, now: u64) -> Vec2 {
        let mut target = EngineTarget {
            engine: &mut self.engine,
            adapter: &mut self.adapter,
            error: None,
        };
        let moved = self.scroll.advance(now, self.parent.as_mut(), &mut target);
        if let Some(err) = target.error {
            self.error = Some(err);
        }
        moved
    }
}

/// Applies scroll deltas to the layout engine.
struct EngineTarget<'a, V, S, A> {
    engine: &'a mut LayoutEngine<V, S>,
    adapter: &'a mut A,
    error: Option<LayoutError>,
}

impl<V, S: LayoutStrategy, A: Adapter<V>> ScrollTarget for EngineTarget<'_, V, S, A> {
    fn scroll_local(&mut self, axis: Axis, delta: f64) -> f64 {
        let orientation = self.engine.viewport_state().orientation;
        if axis != main_axis(orientation) {
            return self.engine.scroll_cross_by(delta);
        }
        match self.engine.scroll_main_by(delta, self.adapter) {
            Ok(consumed) => consumed,
            Err(err) => {
                tracing::warn!(target: TARGET, %err, "scroll pass abandoned");
                self.error = Some(err);
                0.0
            }
        }
    }
}

impl<V, S: LayoutStrategy, A: Adapter<V>> ScrollHost for ViewHost<V, S, A> {
    fn scroll_axes(&self) -> ScrollAxes {
        self.scrollable_axes()
    }

    fn is_settling(&self) -> bool {
        self.scroll.state() == ScrollState::Settling
    }

    fn begin_scroll(&mut self) {
        self.sync_axes();
        self.scroll.begin_drag(self.parent.as_mut());
    }

    fn scroll_by(&mut self, delta: Vec2) {
        for axis in Axis::ALL {
            let d = axis.of(delta);
            if d != 0.0 {
                self.scroll_along(axis, d);
            }
        }
    }

    fn end_scroll(&mut self, velocity: Vec2, now: u64) {
        self.scroll.end_drag(velocity, now, self.parent.as_mut());
    }

    fn cancel_scroll(&mut self) {
        self.scroll.stop(self.parent.as_mut());
    }
}

impl<V, S: LayoutStrategy, A: Adapter<V>> DragSwipeHost for ViewHost<V, S, A> {
    fn position_at(&self, point: Point) -> Option<usize> {
        self.engine.find_slot_at(point).map(|a| a.position())
    }

    fn item_type(&self, position: usize) -> ItemType {
        self.adapter.item_type(position)
    }

    fn item_rect(&self, position: usize) -> Option<Rect> {
        self.engine.attached_at(position).map(|a| a.rect())
    }

    fn for_each_item(&self, f: &mut dyn FnMut(usize, Rect)) {
        for attached in self.engine.attached() {
            f(attached.position(), attached.rect());
        }
    }

    fn viewport_size(&self) -> Size {
        self.engine.viewport().unwrap_or(Size::ZERO)
    }

    fn set_translation(&mut self, position: usize, translation: Vec2) {
        self.engine.set_translation(position, translation);
    }

    fn move_item(&mut self, from: usize, to: usize) -> bool {
        self.engine
            .move_attached(from, to, &mut self.adapter)
            .is_some()
    }

    fn item_dismissed(&mut self, position: usize, offset: Vec2) {
        self.engine.record_dismissal(position, offset);
    }
}
