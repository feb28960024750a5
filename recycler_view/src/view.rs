// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use core::fmt;
use core::num::NonZeroUsize;

use kurbo::{Size, Vec2};
use recycler_drag_swipe::{DragSwipeCallback, DragSwipeConfig, DragSwipeController, Recovered};
use recycler_gesture::{
    Claim, GestureDispatcher, GestureListener, ListenerId, PointerEvent, TouchSession,
};
use recycler_layout::{
    Adapter, ExtentModel, GridLayout, ItemAnimator, ItemDecoration, LayoutEngine, LayoutStrategy,
    LinearLayout, PassReport, ScrollAlign, StaggeredGridLayout,
};
use recycler_pool::SlotPool;
use recycler_scroll::{Axis, NestedScrollParent, ScrollCoordinator, ScrollState, ScrollStep};

use crate::{RecyclerConfig, TARGET, ViewError, ViewHost};

/// The drag-swipe controller as held by a [`RecyclerView`].
pub type BoxedDragSwipe = DragSwipeController<Box<dyn DragSwipeCallback>>;

/// What one [`RecyclerView::advance`] call did.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// Scroll applied by the running fling.
    pub scrolled: Vec2,
    /// Recover animations that finished.
    pub recovered: Recovered,
    /// The layout pass that ran, if one was needed.
    pub report: Option<PassReport>,
}

/// One recycling list or grid.
///
/// Owns the layout engine and its slot pool, the adapter, the scroll
/// coordinator, the gesture dispatcher and the optional drag-swipe
/// controller. Every piece of state lives on the instance, so several views
/// can run side by side.
///
/// Gesture listeners receive the [`ViewHost`]. Layout requests they make are
/// queued and serviced at the start of the next call into the view, so a
/// pass never starts while another operation is running.
pub struct RecyclerView<V, S, A> {
    config: RecyclerConfig,
    host: ViewHost<V, S, A>,
    gestures: GestureDispatcher<ViewHost<V, S, A>>,
    drag_swipe: Option<BoxedDragSwipe>,
    animator: Option<Box<dyn ItemAnimator>>,
}

impl<V, S, A> fmt::Debug for RecyclerView<V, S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecyclerView")
            .field("config", &self.config)
            .field("host", &self.host)
            .field("gestures", &self.gestures)
            .field("drag_swipe", &self.drag_swipe.as_ref().map(|c| c.state()))
            .field("animator", &self.animator.is_some())
            .finish()
    }
}

impl<V, M: ExtentModel, A: Adapter<V>> RecyclerView<V, LinearLayout<M>, A> {
    /// A single-column (or single-row) list over `model`.
    #[must_use]
    pub fn linear(model: M, adapter: A, config: RecyclerConfig) -> Self {
        Self::new(LinearLayout::new(model), adapter, config)
    }
}

impl<V, A: Adapter<V>> RecyclerView<V, GridLayout, A> {
    /// A grid with [`span_count`](RecyclerConfig::span_count) columns.
    #[must_use]
    pub fn grid(row_estimate: f64, adapter: A, config: RecyclerConfig) -> Self {
        let spans = NonZeroUsize::new(config.span_count).unwrap_or(NonZeroUsize::MIN);
        Self::new(GridLayout::new(spans, row_estimate), adapter, config)
    }
}

impl<V, A: Adapter<V>> RecyclerView<V, StaggeredGridLayout, A> {
    /// A staggered grid with [`span_count`](RecyclerConfig::span_count) lanes.
    #[must_use]
    pub fn staggered(estimate: f64, adapter: A, config: RecyclerConfig) -> Self {
        let lanes = NonZeroUsize::new(config.span_count).unwrap_or(NonZeroUsize::MIN);
        Self::new(StaggeredGridLayout::new(lanes, estimate), adapter, config)
    }
}

impl<V, S: LayoutStrategy, A: Adapter<V>> RecyclerView<V, S, A> {
    /// Creates a view laying out `adapter`'s items with `strategy`.
    ///
    /// Nothing is laid out until a viewport is set.
    #[must_use]
    pub fn new(strategy: S, adapter: A, config: RecyclerConfig) -> Self {
        let pool = SlotPool::new(config.cache_size, config.max_pooled_per_type);
        let mut engine = LayoutEngine::new(strategy, pool);
        engine.set_look_ahead(config.look_ahead_extent);
        engine.set_orientation(config.orientation);
        engine.set_reverse(config.reverse_layout);
        let scroll = ScrollCoordinator::new(config.main_axis().flag(), config.scroll_config());
        Self {
            host: ViewHost::new(engine, adapter, scroll),
            gestures: GestureDispatcher::new(config.slop_threshold),
            drag_swipe: None,
            animator: None,
            config,
        }
    }

    /// Options the view was built with.
    #[must_use]
    pub fn config(&self) -> &RecyclerConfig {
        &self.config
    }

    /// The layout engine.
    #[must_use]
    pub fn engine(&self) -> &LayoutEngine<V, S> {
        &self.host.engine
    }

    /// The layout strategy, mutably. Changes take effect on the next pass.
    pub fn strategy_mut(&mut self) -> &mut S {
        self.host.engine.request_layout();
        self.host.engine.strategy_mut()
    }

    /// The adapter.
    #[must_use]
    pub fn adapter(&self) -> &A {
        &self.host.adapter
    }

    /// The adapter, mutably. Call [`data_set_changed`](Self::data_set_changed)
    /// after changing what it reports.
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.host.adapter
    }

    /// The state shared with gesture listeners.
    #[must_use]
    pub fn host(&self) -> &ViewHost<V, S, A> {
        &self.host
    }

    /// The scroll coordinator.
    #[must_use]
    pub fn scroll(&self) -> &ScrollCoordinator {
        &self.host.scroll
    }

    /// Current scroll state.
    #[must_use]
    pub fn scroll_state(&self) -> ScrollState {
        self.host.scroll.state()
    }

    /// The gesture in progress, if any.
    #[must_use]
    pub fn session(&self) -> Option<&TouchSession> {
        self.gestures.session()
    }

    /// Sets the viewport size; `None` detaches the view.
    pub fn set_viewport(&mut self, viewport: Option<Size>) {
        self.host.engine.set_viewport(viewport);
        self.host.sync_axes();
    }

    /// Installs the scrolling ancestor. A scroll in progress is stopped first.
    pub fn set_nested_parent(&mut self, parent: Box<dyn NestedScrollParent>) {
        self.host.scroll.stop(self.host.parent.as_mut());
        self.host.parent = parent;
    }

    /// Installs or removes the receiver of [`ItemChange`](recycler_layout::ItemChange)s.
    pub fn set_item_animator(&mut self, animator: Option<Box<dyn ItemAnimator>>) {
        self.animator = animator;
    }

    /// Adds spacing around items.
    pub fn add_decoration(&mut self, decoration: Box<dyn ItemDecoration>) {
        self.host.engine.add_decoration(decoration);
    }

    /// Registers a gesture listener. Listeners are asked in registration order.
    pub fn add_gesture_listener(
        &mut self,
        listener: Box<dyn GestureListener<ViewHost<V, S, A>>>,
    ) -> ListenerId {
        self.gestures.add_listener(listener)
    }

    /// Unregisters a gesture listener.
    pub fn remove_gesture_listener(
        &mut self,
        id: ListenerId,
    ) -> Option<Box<dyn GestureListener<ViewHost<V, S, A>>>> {
        self.gestures.remove_listener(id)
    }

    /// Attaches drag-to-reorder and swipe-to-dismiss with options from the view's config.
    pub fn attach_drag_swipe(&mut self, callback: Box<dyn DragSwipeCallback>) {
        let config = self.config.drag_swipe_config();
        self.attach_drag_swipe_with(callback, config);
    }

    /// Attaches drag-to-reorder and swipe-to-dismiss, replacing any previous controller.
    pub fn attach_drag_swipe_with(
        &mut self,
        callback: Box<dyn DragSwipeCallback>,
        config: DragSwipeConfig,
    ) {
        self.detach_drag_swipe();
        self.drag_swipe = Some(DragSwipeController::new(callback, config));
    }

    /// Removes the drag-swipe controller. A drag or swipe in progress is cancelled.
    pub fn detach_drag_swipe(&mut self) -> Option<BoxedDragSwipe> {
        if self
            .gestures
            .session()
            .is_some_and(|s| s.claim() == Some(Claim::DragSwipe))
        {
            self.cancel_gesture();
        }
        self.drag_swipe.take()
    }

    /// The drag-swipe controller, if attached.
    #[must_use]
    pub fn drag_swipe(&self) -> Option<&BoxedDragSwipe> {
        self.drag_swipe.as_ref()
    }

    /// The drag-swipe controller, mutably.
    pub fn drag_swipe_mut(&mut self) -> Option<&mut BoxedDragSwipe> {
        self.drag_swipe.as_mut()
    }

    /// Changes how many scrolled-out slots stay bound.
    pub fn set_cache_size(&mut self, size: usize) {
        self.config.cache_size = size;
        self.host.engine.set_cache_size(size, &mut self.host.adapter);
    }

    /// Changes how many free slots are kept per item type.
    pub fn set_max_pooled_per_type(&mut self, max: usize) {
        self.config.max_pooled_per_type = max;
        self.host
            .engine
            .set_max_pooled_per_type(max, &mut self.host.adapter);
    }

    /// Runs a layout pass.
    pub fn layout(&mut self) -> Result<PassReport, ViewError> {
        self.host.service_deferred()?;
        let report = self.host.engine.layout(&mut self.host.adapter);
        self.deliver_changes();
        report.map_err(ViewError::from)
    }

    /// Scrolls by `delta` along `axis` through the nested-scroll chain.
    ///
    /// The ancestor is offered the delta first, then the list, then the
    /// ancestor again with what is left.
    pub fn scroll_by(&mut self, axis: Axis, delta: f64) -> Result<ScrollStep, ViewError> {
        self.host.service_deferred()?;
        self.host.sync_axes();
        let step = self.host.scroll_along(axis, delta);
        self.deliver_changes();
        match self.host.error.take() {
            Some(err) => Err(err.into()),
            None => Ok(step),
        }
    }

    /// Jumps so `position` is in view and stops any scroll.
    pub fn scroll_to_position(
        &mut self,
        position: usize,
        align: ScrollAlign,
    ) -> Result<PassReport, ViewError> {
        self.host.service_deferred()?;
        let report = self
            .host
            .engine
            .scroll_to_position(position, align, &mut self.host.adapter);
        self.host.scroll.stop(self.host.parent.as_mut());
        self.deliver_changes();
        report.map_err(ViewError::from)
    }

    /// Places the start of `position` `offset` pixels from the viewport start and stops any scroll.
    pub fn scroll_to_position_with_offset(
        &mut self,
        position: usize,
        offset: f64,
    ) -> Result<PassReport, ViewError> {
        self.host.service_deferred()?;
        let report = self.host.engine.scroll_to_position_with_offset(
            position,
            offset,
            &mut self.host.adapter,
        );
        self.host.scroll.stop(self.host.parent.as_mut());
        self.deliver_changes();
        report.map_err(ViewError::from)
    }

    /// Starts a fling with `velocity` in px/s of scroll offset. Returns `true` if settling.
    pub fn fling(&mut self, velocity: Vec2, now: u64) -> bool {
        self.host.sync_axes();
        self.host
            .scroll
            .fling(velocity, now, self.host.parent.as_mut())
    }

    /// Stops any drag or fling.
    pub fn stop_scroll(&mut self) {
        self.host.scroll.stop(self.host.parent.as_mut());
    }

    /// Handles one raw pointer event. Returns `true` if the gesture is claimed.
    pub fn dispatch(&mut self, event: &PointerEvent) -> bool {
        self.service_deferred_quietly();
        let drag = self
            .drag_swipe
            .as_mut()
            .map(|c| c as &mut dyn GestureListener<ViewHost<V, S, A>>);
        let claimed = self.gestures.dispatch(event, &mut self.host, drag);
        self.deliver_changes();
        claimed
    }

    /// Lets time-based recognizers see a held pointer. Returns `true` if the gesture is claimed.
    pub fn tick(&mut self, now: u64) -> bool {
        self.service_deferred_quietly();
        let drag = self
            .drag_swipe
            .as_mut()
            .map(|c| c as &mut dyn GestureListener<ViewHost<V, S, A>>);
        let claimed = self.gestures.tick(now, &mut self.host, drag);
        self.deliver_changes();
        claimed
    }

    /// Cancels the gesture in progress as if the pointer sent `Cancel`.
    pub fn cancel_gesture(&mut self) {
        let drag = self
            .drag_swipe
            .as_mut()
            .map(|c| c as &mut dyn GestureListener<ViewHost<V, S, A>>);
        self.gestures.cancel(&mut self.host, drag);
        self.deliver_changes();
    }

    /// Starts dragging `position` under the pointer that is currently down.
    ///
    /// Used for drag handles. Returns `Ok(false)` when no pointer is down,
    /// a listener owns the gesture, or the controller refuses the item.
    pub fn start_drag(&mut self, position: usize) -> Result<bool, ViewError> {
        let Some(controller) = self.drag_swipe.as_mut() else {
            return Err(ViewError::DragSwipeDetached);
        };
        let Some(session) = self.gestures.session() else {
            tracing::debug!(target: TARGET, position, "start_drag with no pointer down");
            return Ok(false);
        };
        if matches!(session.claim(), Some(Claim::Listener(_))) {
            return Ok(false);
        }
        let pointer = session.last_position();
        if !controller.start_drag(position, pointer, &mut self.host) {
            return Ok(false);
        }
        Ok(self.gestures.hand_to_drag_swipe(&mut self.host))
    }

    /// Steps the fling and recover animations to `now`, then lays out if anything changed.
    pub fn advance(&mut self, now: u64) -> Result<Frame, ViewError> {
        self.host.service_deferred()?;
        let mut frame = Frame::default();
        if self.host.scroll.state() == ScrollState::Settling {
            frame.scrolled = self.host.advance_fling(now);
        }
        if let Some(controller) = &mut self.drag_swipe {
            frame.recovered = controller.advance(now, &mut self.host);
        }
        if let Some(err) = self.host.error.take() {
            self.deliver_changes();
            return Err(err.into());
        }
        if self.host.engine.needs_layout() {
            let report = self.host.engine.layout(&mut self.host.adapter);
            self.deliver_changes();
            frame.report = Some(report?);
        } else {
            self.deliver_changes();
        }
        Ok(frame)
    }

    /// Drops positional assumptions after the adapter's data changed.
    pub fn data_set_changed(&mut self) {
        self.host.engine.data_set_changed(&mut self.host.adapter);
    }

    /// Releases every slot back to the adapter.
    pub fn clear(&mut self) {
        self.host.scroll.stop(self.host.parent.as_mut());
        self.host.engine.clear(&mut self.host.adapter);
        self.deliver_changes();
    }

    /// Takes the last layout failure that happened inside a gesture or fling.
    pub fn take_error(&mut self) -> Option<ViewError> {
        self.host.error.take().map(ViewError::from)
    }

    fn service_deferred_quietly(&mut self) {
        if let Err(err) = self.host.service_deferred() {
            tracing::warn!(target: TARGET, %err, "deferred request failed");
            self.host.error = Some(err);
        }
    }

    fn deliver_changes(&mut self) {
        let changes = self.host.engine.take_changes();
        if let Some(animator) = &mut self.animator {
            for change in &changes {
                animator.on_change(change);
            }
        }
    }
}
