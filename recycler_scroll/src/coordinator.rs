// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scroll state machine.

use kurbo::Vec2;

use crate::nested::clamp_consumed;
use crate::{
    Axis, Fling, NestedScrollNegotiation, NestedScrollParent, ScrollAxes, ScrollType, TARGET,
};

/// Scroll state of a list.
///
/// ```text
/// Idle ──slop crossed──▶ Dragging ──release, fast──▶ Settling
///  ▲                        │                          │
///  └──── release, slow ─────┘                          │
///  └──── step below epsilon / edge reached / stop ─────┘
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollState {
    /// Not moving.
    #[default]
    Idle,
    /// Following a pointer.
    Dragging,
    /// Decelerating after a fling.
    Settling,
}

/// Tuning for scrolling and flinging.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Pointer travel before a gesture counts as a scroll, in pixels.
    pub slop: f64,
    /// Release velocities below this do not fling, in px/s.
    pub fling_min_velocity: f64,
    /// Fling velocities are clamped to this, in px/s.
    pub fling_max_velocity: f64,
    /// Fling deceleration, in px/s².
    pub deceleration: f64,
    /// A fling step smaller than this ends settling, in pixels.
    pub settle_epsilon: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            slop: 8.0,
            fling_min_velocity: 50.0,
            fling_max_velocity: 8000.0,
            deceleration: 3000.0,
            settle_epsilon: 0.5,
        }
    }
}

/// A usable fling maximum: its magnitude, or the default when it is NaN.
fn fling_ceiling(max: f64) -> f64 {
    if max.is_nan() {
        ScrollConfig::default().fling_max_velocity
    } else {
        max.abs()
    }
}

/// Whatever actually moves content: usually the layout.
pub trait ScrollTarget {
    /// Scrolls by `delta` along `axis`; returns the amount consumed.
    fn scroll_local(&mut self, axis: Axis, delta: f64) -> f64;
}

/// Breakdown of one delta through the nested scroll protocol.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollStep {
    /// Offered delta.
    pub requested: f64,
    /// Taken by the ancestor first.
    pub pre: f64,
    /// Taken by the list.
    pub local: f64,
    /// Taken by the ancestor afterwards.
    pub post: f64,
    /// Left over.
    pub unconsumed: f64,
}

impl ScrollStep {
    /// Returns `true` if anyone consumed part of the delta.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.pre != 0.0 || self.local != 0.0 || self.post != 0.0
    }
}

/// Owns [`ScrollState`] and the nested scroll negotiation of a list.
///
/// The coordinator does not own the content or the ancestor; both are passed
/// into each call so the host decides their lifetimes. Every delta, including
/// fling steps, is offered to the ancestor before the list consumes it.
#[derive(Clone, Debug, Default)]
pub struct ScrollCoordinator {
    config: ScrollConfig,
    axes: ScrollAxes,
    state: ScrollState,
    negotiation: Option<NestedScrollNegotiation>,
    last_negotiation: Option<NestedScrollNegotiation>,
    fling: Option<Fling>,
}

impl ScrollCoordinator {
    /// Creates an idle coordinator that scrolls along `axes`.
    #[must_use]
    pub fn new(axes: ScrollAxes, config: ScrollConfig) -> Self {
        Self {
            config,
            axes,
            ..Self::default()
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ScrollState {
        self.state
    }

    /// Tuning.
    #[must_use]
    pub const fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Replaces the tuning; applies from the next gesture.
    pub fn set_config(&mut self, config: ScrollConfig) {
        self.config = config;
    }

    /// Axes the list scrolls along.
    #[must_use]
    pub const fn axes(&self) -> ScrollAxes {
        self.axes
    }

    /// Changes the scrollable axes.
    pub fn set_axes(&mut self, axes: ScrollAxes) {
        self.axes = axes;
    }

    /// The nested scroll in progress, if any.
    #[must_use]
    pub const fn negotiation(&self) -> Option<&NestedScrollNegotiation> {
        self.negotiation.as_ref()
    }

    /// The most recently finished nested scroll.
    #[must_use]
    pub const fn last_negotiation(&self) -> Option<&NestedScrollNegotiation> {
        self.last_negotiation.as_ref()
    }

    /// The fling in progress, if settling.
    #[must_use]
    pub const fn active_fling(&self) -> Option<&Fling> {
        self.fling.as_ref()
    }

    fn set_state(&mut self, state: ScrollState) {
        if state != self.state {
            tracing::debug!(target: TARGET, from = ?self.state, to = ?state, "scroll state");
            self.state = state;
        }
    }

    fn start_nested<P: NestedScrollParent + ?Sized>(&mut self, kind: ScrollType, parent: &mut P) {
        self.stop_nested(parent);
        let parent_accepted = parent.start_nested_scroll(self.axes, kind);
        self.negotiation = Some(NestedScrollNegotiation {
            axes: self.axes,
            kind,
            parent_accepted,
            ..NestedScrollNegotiation::default()
        });
    }

    fn stop_nested<P: NestedScrollParent + ?Sized>(&mut self, parent: &mut P) {
        if let Some(negotiation) = self.negotiation.take() {
            if negotiation.parent_accepted {
                parent.stop_nested_scroll(negotiation.kind);
            }
            self.last_negotiation = Some(negotiation);
        }
    }

    /// A gesture crossed the slop: start following the pointer.
    ///
    /// Stops any fling in progress.
    pub fn begin_drag<P: NestedScrollParent + ?Sized>(&mut self, parent: &mut P) {
        self.fling = None;
        self.start_nested(ScrollType::Touch, parent);
        self.set_state(ScrollState::Dragging);
    }

    /// Offers `delta` along `axis` to the ancestor, the list, then the ancestor again.
    ///
    /// Outside a gesture or fling this runs as its own non-touch nested
    /// scroll. Axes the list does not scroll along skip local consumption.
    pub fn scroll_by<P, T>(
        &mut self,
        axis: Axis,
        delta: f64,
        parent: &mut P,
        target: &mut T,
    ) -> ScrollStep
    where
        P: NestedScrollParent + ?Sized,
        T: ScrollTarget + ?Sized,
    {
        let standalone = self.negotiation.is_none();
        if standalone {
            self.start_nested(ScrollType::NonTouch, parent);
        }
        let step = self.offer(axis, delta, parent, target);
        if standalone {
            self.stop_nested(parent);
        }
        step
    }

    fn offer<P, T>(&mut self, axis: Axis, delta: f64, parent: &mut P, target: &mut T) -> ScrollStep
    where
        P: NestedScrollParent + ?Sized,
        T: ScrollTarget + ?Sized,
    {
        let (accepted, kind) = self
            .negotiation
            .as_ref()
            .map_or((false, ScrollType::NonTouch), |n| (n.parent_accepted, n.kind));

        let mut step = ScrollStep {
            requested: delta,
            ..ScrollStep::default()
        };
        if delta == 0.0 {
            return step;
        }

        if accepted {
            step.pre = clamp_consumed(delta, parent.pre_scroll(axis, delta, kind));
        }
        let remainder = delta - step.pre;
        if remainder != 0.0 && self.axes.allows(axis) {
            step.local = clamp_consumed(remainder, target.scroll_local(axis, remainder));
        }
        let left = remainder - step.local;
        if accepted && left != 0.0 {
            step.post = clamp_consumed(left, parent.post_scroll(axis, step.local, left, kind));
        }
        step.unconsumed = left - step.post;

        tracing::trace!(
            target: TARGET,
            ?axis,
            requested = delta,
            pre = step.pre,
            local = step.local,
            post = step.post,
            "scroll step"
        );

        if let Some(n) = &mut self.negotiation {
            let v = |value: f64| axis.vec2(value);
            n.requested += v(step.requested);
            n.pre_consumed += v(step.pre);
            n.local_consumed += v(step.local);
            n.post_consumed += v(step.post);
            n.unconsumed += v(step.unconsumed);
        }
        step
    }

    /// The pointer was released with `velocity` (px/s of content motion).
    ///
    /// Starts settling if the velocity along a scrollable axis reaches the
    /// fling minimum, otherwise goes idle. Returns the new state.
    pub fn end_drag<P: NestedScrollParent + ?Sized>(
        &mut self,
        velocity: Vec2,
        now: u64,
        parent: &mut P,
    ) -> ScrollState {
        if self.state != ScrollState::Dragging {
            return self.state;
        }
        self.stop_nested(parent);
        if !self.fling(velocity, now, parent) {
            self.set_state(ScrollState::Idle);
        }
        self.state
    }

    /// Starts a fling at `velocity` (px/s of content motion).
    ///
    /// Components along axes the list cannot scroll are dropped and the rest
    /// are clamped to the configured maximum. Returns `false` if nothing
    /// reached the fling minimum.
    pub fn fling<P: NestedScrollParent + ?Sized>(
        &mut self,
        velocity: Vec2,
        now: u64,
        parent: &mut P,
    ) -> bool {
        let max = fling_ceiling(self.config.fling_max_velocity);
        let component = |axis: Axis| {
            if self.axes.allows(axis) {
                axis.of(velocity).clamp(-max, max)
            } else {
                0.0
            }
        };
        let velocity = Vec2::new(component(Axis::Horizontal), component(Axis::Vertical));
        let min = self.config.fling_min_velocity;
        if velocity.x.abs() < min && velocity.y.abs() < min {
            tracing::trace!(target: TARGET, ?velocity, "below fling minimum");
            return false;
        }
        self.start_nested(ScrollType::NonTouch, parent);
        self.fling = Some(Fling::new(now, velocity, self.config.deceleration));
        self.set_state(ScrollState::Settling);
        tracing::debug!(target: TARGET, ?velocity, "fling");
        true
    }

    /// Advances a fling to `now`, scrolling by the step through the nested protocol.
    ///
    /// Settling ends when the step is below the settle epsilon, when nobody
    /// consumed any of it (an edge was reached), or when the fling has run
    /// its course. Returns the list's local consumption for this step.
    pub fn advance<P, T>(&mut self, now: u64, parent: &mut P, target: &mut T) -> Vec2
    where
        P: NestedScrollParent + ?Sized,
        T: ScrollTarget + ?Sized,
    {
        let Some(fling) = &mut self.fling else {
            return Vec2::ZERO;
        };
        if now <= fling.last_time() {
            return Vec2::ZERO;
        }
        let delta = fling.step(now);
        let finished = fling.is_finished(now);

        let mut local = Vec2::ZERO;
        let mut moved = false;
        for axis in Axis::ALL {
            let d = axis.of(delta);
            if d != 0.0 {
                let step = self.offer(axis, d, parent, target);
                local += axis.vec2(step.local);
                moved |= step.moved();
            }
        }

        let small = delta.x.abs() + delta.y.abs() < self.config.settle_epsilon;
        if finished || small || !moved {
            tracing::trace!(target: TARGET, finished, small, moved, "settled");
            self.stop(parent);
        }
        local
    }

    /// Stops whatever is in progress and goes idle.
    ///
    /// Also used after a programmatic jump, which never drags or settles.
    pub fn stop<P: NestedScrollParent + ?Sized>(&mut self, parent: &mut P) {
        self.fling = None;
        self.stop_nested(parent);
        self.set_state(ScrollState::Idle);
    }
}
