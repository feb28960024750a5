// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag-swipe state machine.

use kurbo::{Point, Rect, Size, Vec2};
use recycler_gesture::{GestureListener, PointerEvent, PointerEventKind, TouchSession};
use recycler_pool::ItemType;
use recycler_scroll::Axis;
use smallvec::SmallVec;

use crate::{Movement, RecoverAnimation, RecoverKind, SwipeDirection, TARGET};

/// The data owner's side of drag and swipe.
///
/// Notifications are only sent for completed actions: a reorder when the
/// dragged item crosses a neighbour, a dismissal when a swipe is released
/// past the threshold. A cancelled gesture sends neither.
pub trait DragSwipeCallback {
    /// What the item at `position` allows. Queried on `Down`.
    fn movement(&mut self, position: usize, item_type: ItemType) -> Movement;

    /// Whether the item at `from` may be dropped over `to`.
    fn can_drop_over(&mut self, from: usize, to: usize) -> bool {
        let _ = (from, to);
        true
    }

    /// Move the item at `from` to `to` in the data. Return `true` if it moved.
    fn on_move(&mut self, from: usize, to: usize) -> bool;

    /// The item at `position` was swiped away.
    fn on_swiped(&mut self, position: usize, direction: SwipeDirection);

    /// An item was picked up, or dropped when `position` is `None`.
    fn on_state_changed(&mut self, position: Option<usize>, state: DragSwipeState) {
        let _ = (position, state);
    }
}

impl<C: DragSwipeCallback + ?Sized> DragSwipeCallback for alloc::boxed::Box<C> {
    fn movement(&mut self, position: usize, item_type: ItemType) -> Movement {
        (**self).movement(position, item_type)
    }
    fn can_drop_over(&mut self, from: usize, to: usize) -> bool {
        (**self).can_drop_over(from, to)
    }
    fn on_move(&mut self, from: usize, to: usize) -> bool {
        (**self).on_move(from, to)
    }
    fn on_swiped(&mut self, position: usize, direction: SwipeDirection) {
        (**self).on_swiped(position, direction);
    }
    fn on_state_changed(&mut self, position: Option<usize>, state: DragSwipeState) {
        (**self).on_state_changed(position, state);
    }
}

/// The list as seen by the controller.
///
/// Rects are layout rects in viewport coordinates, without translation.
pub trait DragSwipeHost {
    /// Position of the item under `point`.
    fn position_at(&self, point: Point) -> Option<usize>;

    /// Type of the item at `position`.
    fn item_type(&self, position: usize) -> ItemType;

    /// Layout rect of the item at `position`, if attached.
    fn item_rect(&self, position: usize) -> Option<Rect>;

    /// Calls `f` with every attached position and its layout rect.
    fn for_each_item(&self, f: &mut dyn FnMut(usize, Rect));

    /// Size of the viewport.
    fn viewport_size(&self) -> Size;

    /// Draws the item at `position` offset by `translation`.
    fn set_translation(&mut self, position: usize, translation: Vec2);

    /// Reorders attached items after the data moved. Returns `false` if it could not.
    fn move_item(&mut self, from: usize, to: usize) -> bool;

    /// The item at `position` was dismissed at visual `offset`.
    fn item_dismissed(&mut self, position: usize, offset: Vec2) {
        let _ = (position, offset);
    }
}

/// What the controller is doing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragSwipeState {
    /// Nothing selected.
    #[default]
    Idle,
    /// Reordering an item.
    Dragging,
    /// Swiping an item.
    Swiping,
}

/// Tuning for drag and swipe.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragSwipeConfig {
    /// Hold time before a press starts a drag, in milliseconds.
    pub long_press_timeout_ms: u64,
    /// Travel before a press can become a swipe, in pixels.
    pub swipe_slop: f64,
    /// Fraction of the item's extent a swipe must travel to dismiss.
    pub swipe_threshold: f64,
    /// Release speed that dismisses regardless of distance, in px/s.
    pub swipe_escape_velocity: f64,
    /// Length of recover animations, in milliseconds.
    pub recover_duration_ms: u64,
    /// Whether a long press starts a drag.
    pub long_press_enabled: bool,
    /// Whether swiping is recognized.
    pub swipe_enabled: bool,
}

impl Default for DragSwipeConfig {
    fn default() -> Self {
        Self {
            long_press_timeout_ms: 500,
            swipe_slop: 8.0,
            swipe_threshold: 0.5,
            swipe_escape_velocity: 800.0,
            recover_duration_ms: 250,
            long_press_enabled: true,
            swipe_enabled: true,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Candidate {
    position: usize,
    movement: Movement,
    down_time: u64,
}

#[derive(Copy, Clone, Debug)]
struct Selected {
    position: usize,
    movement: Movement,
    start_pointer: Point,
    start_origin: Point,
    swipe_axis: Option<Axis>,
    translation: Vec2,
}

/// Finished recover animations returned by [`DragSwipeController::advance`].
pub type Recovered = SmallVec<[RecoverAnimation; 2]>;

/// Reorders items by long-press drag and dismisses them by swiping.
///
/// The controller is a [`GestureListener`] meant to be passed to
/// [`GestureDispatcher::dispatch`](recycler_gesture::GestureDispatcher::dispatch)
/// as the drag-swipe claimant. It claims a gesture when a press over a
/// draggable item is held for the long-press timeout, or when the pointer
/// travels past the swipe slop along an allowed swipe direction.
///
/// Dragging follows the pointer; each time the dragged item crosses the
/// center of a neighbour the callback's [`on_move`](DragSwipeCallback::on_move)
/// is asked to reorder the data and the list is reordered right away.
/// Releasing a swipe past the distance threshold, or faster than the escape
/// velocity, dismisses the item. Released and cancelled items settle through
/// [`RecoverAnimation`]s stepped by [`advance`](Self::advance).
#[derive(Debug)]
pub struct DragSwipeController<C> {
    config: DragSwipeConfig,
    callback: C,
    state: DragSwipeState,
    candidate: Option<Candidate>,
    selected: Option<Selected>,
    recovers: SmallVec<[RecoverAnimation; 2]>,
}

impl<C: DragSwipeCallback> DragSwipeController<C> {
    /// Creates an idle controller.
    pub fn new(callback: C, config: DragSwipeConfig) -> Self {
        Self {
            config,
            callback,
            state: DragSwipeState::Idle,
            candidate: None,
            selected: None,
            recovers: SmallVec::new(),
        }
    }

    /// Tuning.
    pub const fn config(&self) -> &DragSwipeConfig {
        &self.config
    }

    /// Replaces the tuning; applies from the next gesture.
    pub fn set_config(&mut self, config: DragSwipeConfig) {
        self.config = config;
    }

    /// The data owner.
    pub const fn callback(&self) -> &C {
        &self.callback
    }

    /// The data owner, mutably.
    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    /// Current state.
    pub const fn state(&self) -> DragSwipeState {
        self.state
    }

    /// Position of the item being dragged or swiped.
    pub fn selected_position(&self) -> Option<usize> {
        self.selected.map(|s| s.position)
    }

    /// Recover animations in flight.
    pub fn recovering(&self) -> &[RecoverAnimation] {
        &self.recovers
    }

    /// Returns `true` while any recover animation runs.
    pub fn is_animating(&self) -> bool {
        !self.recovers.is_empty()
    }

    /// Starts dragging `position` without a long press, for drag handles.
    ///
    /// `pointer` is where the pointer currently is. Rejected if an item is
    /// already selected or the item cannot be dragged.
    pub fn start_drag<H: DragSwipeHost + ?Sized>(
        &mut self,
        position: usize,
        pointer: Point,
        host: &mut H,
    ) -> bool {
        if let Some(selected) = &self.selected {
            tracing::warn!(
                target: TARGET,
                active = selected.position,
                requested = position,
                "drag-swipe session already active"
            );
            return false;
        }
        let movement = self.callback.movement(position, host.item_type(position));
        if movement.drag.is_empty() {
            tracing::debug!(target: TARGET, position, "item is not draggable");
            return false;
        }
        self.select(position, movement, DragSwipeState::Dragging, pointer, None, host)
    }

    /// Steps recover animations to `now`, returning the ones that finished.
    pub fn advance<H: DragSwipeHost + ?Sized>(&mut self, now: u64, host: &mut H) -> Recovered {
        let mut finished = Recovered::new();
        self.recovers.retain(|anim| {
            if anim.is_finished(now) {
                // A dismissed item is gone from the data; its slot returns to rest for reuse.
                host.set_translation(anim.position, Vec2::ZERO);
                finished.push(*anim);
                false
            } else {
                host.set_translation(anim.position, anim.offset_at(now));
                true
            }
        });
        for anim in &finished {
            tracing::trace!(target: TARGET, position = anim.position, kind = ?anim.kind, "recovered");
        }
        finished
    }

    fn set_state(&mut self, state: DragSwipeState, position: Option<usize>) {
        if state != self.state {
            tracing::debug!(target: TARGET, from = ?self.state, to = ?state, ?position, "drag-swipe state");
            self.state = state;
            self.callback.on_state_changed(position, state);
        }
    }

    fn select<H: DragSwipeHost + ?Sized>(
        &mut self,
        position: usize,
        movement: Movement,
        state: DragSwipeState,
        start_pointer: Point,
        swipe_axis: Option<Axis>,
        host: &mut H,
    ) -> bool {
        let Some(rect) = host.item_rect(position) else {
            return false;
        };
        self.candidate = None;
        self.selected = Some(Selected {
            position,
            movement,
            start_pointer,
            start_origin: rect.origin(),
            swipe_axis,
            translation: Vec2::ZERO,
        });
        self.set_state(state, Some(position));
        true
    }

    fn on_down<H: DragSwipeHost + ?Sized>(&mut self, event: &PointerEvent, host: &mut H) {
        self.candidate = None;
        if let Some(selected) = &self.selected {
            tracing::warn!(target: TARGET, active = selected.position, "drag-swipe session already active");
            return;
        }
        let Some(position) = host.position_at(event.position) else {
            return;
        };
        if self.recovers.iter().any(|r| r.position == position) {
            return;
        }
        let movement = self.callback.movement(position, host.item_type(position));
        if movement.is_none() {
            return;
        }
        self.candidate = Some(Candidate {
            position,
            movement,
            down_time: event.time,
        });
    }

    fn try_claim<H: DragSwipeHost + ?Sized>(
        &mut self,
        event: &PointerEvent,
        session: &TouchSession,
        host: &mut H,
    ) -> bool {
        if self.state == DragSwipeState::Dragging {
            // Started from `start_drag`.
            self.drag_to(event.position, host);
            return true;
        }
        let Some(candidate) = self.candidate else {
            return false;
        };

        let held = event.time.saturating_sub(candidate.down_time);
        if self.config.long_press_enabled
            && !candidate.movement.drag.is_empty()
            && !session.slop_crossed()
            && held >= self.config.long_press_timeout_ms
        {
            let claimed = self.select(
                candidate.position,
                candidate.movement,
                DragSwipeState::Dragging,
                event.position,
                None,
                host,
            );
            if claimed {
                self.drag_to(event.position, host);
            }
            return claimed;
        }

        if !self.config.swipe_enabled || candidate.movement.swipe.is_empty() {
            return false;
        }
        let d = session.displacement();
        let (axis, value) = if d.x.abs() > d.y.abs() {
            (Axis::Horizontal, d.x)
        } else {
            (Axis::Vertical, d.y)
        };
        if value.abs() <= self.config.swipe_slop {
            return false;
        }
        let allowed = SwipeDirection::along(axis, value)
            .is_some_and(|dir| candidate.movement.swipe.contains(dir.flag()));
        if !allowed {
            return false;
        }
        let claimed = self.select(
            candidate.position,
            candidate.movement,
            DragSwipeState::Swiping,
            session.origin(),
            Some(axis),
            host,
        );
        if claimed {
            self.swipe_to(d, host);
        }
        claimed
    }

    fn drag_to<H: DragSwipeHost + ?Sized>(&mut self, pointer: Point, host: &mut H) {
        let Some(selected) = &mut self.selected else {
            return;
        };
        let offset = selected.movement.drag.constrain(pointer - selected.start_pointer);
        let visual_origin = selected.start_origin + offset;
        let Some(rect) = host.item_rect(selected.position) else {
            return;
        };
        selected.translation = visual_origin - rect.origin();
        host.set_translation(selected.position, selected.translation);

        let visual = rect.with_origin(visual_origin);
        let Some(target) = find_target(host, selected.position, rect, visual) else {
            return;
        };
        let from = selected.position;
        if !self.callback.can_drop_over(from, target) {
            tracing::trace!(target: TARGET, from, to = target, "drop vetoed");
            return;
        }
        if !self.callback.on_move(from, target) || !host.move_item(from, target) {
            return;
        }
        tracing::debug!(target: TARGET, from, to = target, "reordered");
        selected.position = target;
        if let Some(moved) = host.item_rect(target) {
            selected.translation = visual_origin - moved.origin();
            host.set_translation(target, selected.translation);
        }
    }

    fn swipe_to<H: DragSwipeHost + ?Sized>(&mut self, displacement: Vec2, host: &mut H) {
        let Some(selected) = &mut self.selected else {
            return;
        };
        let Some(axis) = selected.swipe_axis else {
            return;
        };
        let along = axis.vec2(axis.of(displacement));
        selected.translation = selected.movement.swipe.constrain(along);
        host.set_translation(selected.position, selected.translation);
    }

    /// Direction to dismiss in, if the release qualifies.
    fn swipe_decision<H: DragSwipeHost + ?Sized>(
        &self,
        selected: &Selected,
        velocity: Vec2,
        host: &H,
    ) -> Option<SwipeDirection> {
        let axis = selected.swipe_axis?;
        let flags = selected.movement.swipe;
        let offset = axis.of(selected.translation);
        let speed = axis.of(velocity);

        if let Some(dir) = SwipeDirection::along(axis, speed) {
            if speed.abs() >= self.config.swipe_escape_velocity
                && flags.contains(dir.flag())
                && offset * speed >= 0.0
            {
                return Some(dir);
            }
        }
        let rect = host.item_rect(selected.position)?;
        let extent = axis.of(rect.size().to_vec2());
        if offset.abs() >= extent * self.config.swipe_threshold {
            return SwipeDirection::along(axis, offset).filter(|dir| flags.contains(dir.flag()));
        }
        None
    }

    fn release<H: DragSwipeHost + ?Sized>(&mut self, now: u64, velocity: Vec2, host: &mut H) {
        let Some(selected) = self.selected else {
            return;
        };
        let dismissal = if self.state == DragSwipeState::Swiping {
            self.swipe_decision(&selected, velocity, host)
        } else {
            None
        };
        self.selected = None;

        let (kind, to) = match dismissal {
            Some(dir) => {
                tracing::debug!(target: TARGET, position = selected.position, ?dir, "swiped");
                self.callback.on_swiped(selected.position, dir);
                host.item_dismissed(selected.position, selected.translation);
                let rect_extent = host
                    .item_rect(selected.position)
                    .map_or(0.0, |r| dir.axis().of(r.size().to_vec2()));
                let viewport_extent = dir.axis().of(host.viewport_size().to_vec2());
                let distance = viewport_extent.max(rect_extent);
                (RecoverKind::Dismiss(dir), dir.axis().vec2(dir.sign() * distance))
            }
            None => (RecoverKind::Rest, Vec2::ZERO),
        };
        self.start_recover(&selected, kind, to, now);
        self.set_state(DragSwipeState::Idle, None);
    }

    fn cancel_selection(&mut self, now: u64) {
        self.candidate = None;
        let Some(selected) = self.selected.take() else {
            return;
        };
        tracing::debug!(target: TARGET, position = selected.position, "drag-swipe cancelled");
        self.start_recover(&selected, RecoverKind::Rest, Vec2::ZERO, now);
        self.set_state(DragSwipeState::Idle, None);
    }

    fn start_recover(&mut self, selected: &Selected, kind: RecoverKind, to: Vec2, now: u64) {
        self.recovers.retain(|r| r.position != selected.position);
        self.recovers.push(RecoverAnimation {
            position: selected.position,
            kind,
            from: selected.translation,
            to,
            start_time: now,
            duration: self.config.recover_duration_ms,
        });
    }
}

/// The closest neighbour whose center the dragged rect has crossed.
fn find_target<H: DragSwipeHost + ?Sized>(
    host: &H,
    position: usize,
    rect: Rect,
    visual: Rect,
) -> Option<usize> {
    let current = rect.center();
    let dragged = visual.center();
    let delta = dragged - current;
    let mut best: Option<(usize, f64)> = None;
    host.for_each_item(&mut |p, r| {
        if p == position || visual.intersect(r).area() <= 0.0 {
            return;
        }
        let c = r.center();
        let crossed_y = (delta.y > 0.0 && c.y > current.y && visual.y1 > c.y)
            || (delta.y < 0.0 && c.y < current.y && visual.y0 < c.y);
        let crossed_x = (delta.x > 0.0 && c.x > current.x && visual.x1 > c.x)
            || (delta.x < 0.0 && c.x < current.x && visual.x0 < c.x);
        if !(crossed_x || crossed_y) {
            return;
        }
        let distance = (c - current).hypot2();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((p, distance));
        }
    });
    best.map(|(p, _)| p)
}

impl<C, H> GestureListener<H> for DragSwipeController<C>
where
    C: DragSwipeCallback,
    H: DragSwipeHost + ?Sized,
{
    fn intercept(&mut self, event: &PointerEvent, session: &TouchSession, host: &mut H) -> bool {
        match event.kind {
            PointerEventKind::Down => {
                self.on_down(event, host);
                false
            }
            PointerEventKind::Move => self.try_claim(event, session, host),
            PointerEventKind::Up | PointerEventKind::Cancel => false,
        }
    }

    fn on_event(&mut self, event: &PointerEvent, session: &TouchSession, host: &mut H) {
        match event.kind {
            PointerEventKind::Down => {}
            PointerEventKind::Move | PointerEventKind::Up => {
                match self.state {
                    DragSwipeState::Dragging => self.drag_to(event.position, host),
                    DragSwipeState::Swiping => self.swipe_to(session.displacement(), host),
                    DragSwipeState::Idle => {}
                }
                if event.kind == PointerEventKind::Up {
                    self.release(event.time, session.velocity(), host);
                }
            }
            PointerEventKind::Cancel => self.cancel_selection(event.time),
        }
    }

    fn on_session_end(&mut self, session: &TouchSession, cancelled: bool, _host: &mut H) {
        let _ = cancelled;
        // A selection that outlived its gesture, e.g. `start_drag` on an unclaimed one.
        self.cancel_selection(session.last_time());
    }
}
