// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Claiming gestures and routing their events.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Vec2;
use recycler_scroll::ScrollAxes;

use crate::session::{Claim, ListenerId, TouchSession};
use crate::{PointerEvent, PointerEventKind, TARGET};

/// Default slop, in pixels.
pub const DEFAULT_SLOP: f64 = 8.0;

/// A component that may take over a gesture.
///
/// Until a gesture is claimed, every event is offered to
/// [`intercept`](Self::intercept). The first listener to return `true` owns
/// the rest of the gesture and receives each later event through
/// [`on_event`](Self::on_event); the claiming event itself is not delivered
/// again. Every listener hears [`on_session_end`](Self::on_session_end),
/// claimed or not.
pub trait GestureListener<H: ?Sized> {
    /// Offered an event of an unclaimed gesture. Return `true` to claim it.
    fn intercept(&mut self, event: &PointerEvent, session: &TouchSession, host: &mut H) -> bool;

    /// An event of a gesture this listener claimed.
    fn on_event(&mut self, event: &PointerEvent, session: &TouchSession, host: &mut H) {
        let _ = (event, session, host);
    }

    /// The gesture ended with `Up`, or with `Cancel` if `cancelled`.
    fn on_session_end(&mut self, session: &TouchSession, cancelled: bool, host: &mut H) {
        let _ = (session, cancelled, host);
    }
}

/// The list's own scrolling, used when nobody else claims a gesture.
pub trait ScrollHost {
    /// Axes the list can scroll along.
    fn scroll_axes(&self) -> ScrollAxes;

    /// Whether a fling is running; a `Down` then catches it.
    fn is_settling(&self) -> bool {
        false
    }

    /// The list claimed the gesture for scrolling.
    fn begin_scroll(&mut self);

    /// Scroll content by `delta`, in the direction the content moves under the pointer.
    fn scroll_by(&mut self, delta: Vec2);

    /// The pointer was released; `velocity` is in px/s of scroll offset.
    fn end_scroll(&mut self, velocity: Vec2, now: u64);

    /// The gesture was cancelled.
    fn cancel_scroll(&mut self);
}

/// Routes raw pointer events to exactly one owner per gesture.
///
/// Claims are checked in a fixed order:
///
/// 1. registered listeners, in registration order,
/// 2. the drag-swipe controller, if one is passed to [`dispatch`](Self::dispatch),
/// 3. the list itself, once the pointer moves past the slop along a scrollable axis.
///
/// Only the primary pointer (the one that went down first) drives a
/// gesture. Timestamps must strictly increase; stale events are dropped.
pub struct GestureDispatcher<H: ?Sized> {
    slop: f64,
    listeners: Vec<(ListenerId, Box<dyn GestureListener<H>>)>,
    next_id: u32,
    session: Option<TouchSession>,
    last_time: Option<u64>,
}

impl<H: ?Sized> fmt::Debug for GestureDispatcher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureDispatcher")
            .field("slop", &self.slop)
            .field("listeners", &self.listeners.len())
            .field("session", &self.session)
            .field("last_time", &self.last_time)
            .finish_non_exhaustive()
    }
}

impl<H: ?Sized> Default for GestureDispatcher<H> {
    fn default() -> Self {
        Self::new(DEFAULT_SLOP)
    }
}

impl<H: ?Sized> GestureDispatcher<H> {
    /// Creates a dispatcher with the given slop in pixels.
    #[must_use]
    pub fn new(slop: f64) -> Self {
        Self {
            slop,
            listeners: Vec::new(),
            next_id: 0,
            session: None,
            last_time: None,
        }
    }

    /// Pointer travel before the list claims a gesture for scrolling.
    #[must_use]
    pub const fn slop(&self) -> f64 {
        self.slop
    }

    /// Sets the slop.
    pub fn set_slop(&mut self, slop: f64) {
        self.slop = slop;
    }

    /// Registers a listener after the existing ones.
    pub fn add_listener(&mut self, listener: Box<dyn GestureListener<H>>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Unregisters a listener.
    ///
    /// If it owned the current gesture, the gesture becomes unclaimed.
    pub fn remove_listener(&mut self, id: ListenerId) -> Option<Box<dyn GestureListener<H>>> {
        let index = self.listeners.iter().position(|(lid, _)| *lid == id)?;
        if let Some(session) = &mut self.session {
            if session.claim() == Some(Claim::Listener(id)) {
                session.set_claim(None);
            }
        }
        Some(self.listeners.remove(index).1)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The gesture in progress.
    #[must_use]
    pub const fn session(&self) -> Option<&TouchSession> {
        self.session.as_ref()
    }

    fn set_claim(&mut self, claim: Option<Claim>) {
        if let Some(session) = &mut self.session {
            session.set_claim(claim);
        }
    }

    fn offer(
        &mut self,
        event: &PointerEvent,
        host: &mut H,
        drag_swipe: Option<&mut (dyn GestureListener<H> + '_)>,
    ) -> Option<Claim> {
        let session = self.session.as_ref()?;
        for (id, listener) in &mut self.listeners {
            if listener.intercept(event, session, host) {
                tracing::debug!(target: TARGET, listener = id.0, kind = ?event.kind, "gesture claimed by listener");
                return Some(Claim::Listener(*id));
            }
        }
        if let Some(controller) = drag_swipe {
            if controller.intercept(event, session, host) {
                tracing::debug!(target: TARGET, kind = ?event.kind, "gesture claimed by drag-swipe");
                return Some(Claim::DragSwipe);
            }
        }
        None
    }

    fn forward(
        &mut self,
        claim: Claim,
        event: &PointerEvent,
        host: &mut H,
        drag_swipe: Option<&mut (dyn GestureListener<H> + '_)>,
    ) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        match claim {
            Claim::Listener(id) => {
                if let Some((_, listener)) = self.listeners.iter_mut().find(|(lid, _)| *lid == id) {
                    listener.on_event(event, session, host);
                }
            }
            Claim::DragSwipe => {
                if let Some(controller) = drag_swipe {
                    controller.on_event(event, session, host);
                }
            }
            Claim::SelfScroll => {}
        }
    }
}

impl<H: ScrollHost + ?Sized> GestureDispatcher<H> {
    /// Handles one raw pointer event. Returns `true` if the gesture is claimed.
    ///
    /// `drag_swipe` is the drag-swipe controller, if one is attached; it is
    /// offered each unclaimed event after the registered listeners.
    pub fn dispatch(
        &mut self,
        event: &PointerEvent,
        host: &mut H,
        mut drag_swipe: Option<&mut (dyn GestureListener<H> + '_)>,
    ) -> bool {
        if let Some(last) = self.last_time {
            if event.time <= last {
                tracing::warn!(
                    target: TARGET,
                    time = event.time,
                    last,
                    "dropping event with non-increasing timestamp"
                );
                return false;
            }
        }
        self.last_time = Some(event.time);

        // A cancel ends the session whichever pointer reports it.
        if let Some(session) = &self.session {
            if session.pointer() != event.pointer && event.kind != PointerEventKind::Cancel {
                tracing::trace!(target: TARGET, pointer = event.pointer, "secondary pointer ignored");
                return session.claim().is_some();
            }
        }

        match event.kind {
            PointerEventKind::Down => {
                if let Some(stale) = &self.session {
                    tracing::warn!(target: TARGET, "down without release; cancelling previous gesture");
                    let cancel =
                        PointerEvent::cancel(stale.pointer(), stale.last_position(), event.time);
                    self.end(&cancel, host, drag_swipe.as_deref_mut());
                }
                self.down(event, host, drag_swipe)
            }
            PointerEventKind::Move => self.moved(event, host, drag_swipe),
            PointerEventKind::Up | PointerEventKind::Cancel => self.end(event, host, drag_swipe),
        }
    }

    /// Lets time-based recognizers (long press) claim a held pointer.
    ///
    /// Offers a `Move` at the last known position and `now` to the claim
    /// chain, or forwards it to the owner of a claimed gesture. Returns
    /// `true` if the gesture is claimed.
    pub fn tick(
        &mut self,
        now: u64,
        host: &mut H,
        drag_swipe: Option<&mut (dyn GestureListener<H> + '_)>,
    ) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        if self.last_time.is_some_and(|last| now <= last) {
            return session.claim().is_some();
        }
        self.last_time = Some(now);
        let held = PointerEvent::moved(session.pointer(), session.last_position(), now);
        match session.claim() {
            Some(claim @ (Claim::Listener(_) | Claim::DragSwipe)) => {
                self.forward(claim, &held, host, drag_swipe);
                true
            }
            Some(Claim::SelfScroll) => true,
            None => {
                let claim = self.offer(&held, host, drag_swipe);
                self.set_claim(claim);
                claim.is_some()
            }
        }
    }

    /// Cancels the gesture in progress, as if the pointer sent `Cancel`.
    pub fn cancel(&mut self, host: &mut H, drag_swipe: Option<&mut (dyn GestureListener<H> + '_)>) {
        if let Some(session) = &self.session {
            let cancel = PointerEvent::cancel(
                session.pointer(),
                session.last_position(),
                session.last_time(),
            );
            self.end(&cancel, host, drag_swipe);
        }
    }

    /// Gives the gesture in progress to the drag-swipe claimant.
    ///
    /// Used when a drag is started programmatically. A gesture owned by a
    /// listener is not taken away; a self-scroll is cancelled first. Returns
    /// `true` if drag-swipe owns the gesture afterwards.
    pub fn hand_to_drag_swipe(&mut self, host: &mut H) -> bool {
        let Some(session) = &mut self.session else {
            return false;
        };
        match session.claim() {
            Some(Claim::Listener(_)) => false,
            Some(Claim::DragSwipe) => true,
            claim => {
                if claim == Some(Claim::SelfScroll) {
                    host.cancel_scroll();
                }
                session.set_claim(Some(Claim::DragSwipe));
                tracing::debug!(target: TARGET, "gesture handed to drag-swipe");
                true
            }
        }
    }

    fn down(
        &mut self,
        event: &PointerEvent,
        host: &mut H,
        drag_swipe: Option<&mut (dyn GestureListener<H> + '_)>,
    ) -> bool {
        self.session = Some(TouchSession::new(event));
        let mut claim = self.offer(event, host, drag_swipe);
        if claim.is_none() && host.is_settling() {
            tracing::debug!(target: TARGET, "down caught a fling");
            host.begin_scroll();
            claim = Some(Claim::SelfScroll);
        }
        self.set_claim(claim);
        claim.is_some()
    }

    fn moved(
        &mut self,
        event: &PointerEvent,
        host: &mut H,
        drag_swipe: Option<&mut (dyn GestureListener<H> + '_)>,
    ) -> bool {
        let slop = self.slop;
        let Some(session) = &mut self.session else {
            return false;
        };
        let previous = session.record(event, slop);
        match session.claim() {
            Some(claim @ (Claim::Listener(_) | Claim::DragSwipe)) => {
                self.forward(claim, event, host, drag_swipe);
                return true;
            }
            Some(Claim::SelfScroll) => {
                host.scroll_by(previous - event.position);
                return true;
            }
            None => {}
        }

        if let Some(claim) = self.offer(event, host, drag_swipe) {
            self.set_claim(Some(claim));
            return true;
        }

        let Some(session) = &self.session else {
            return false;
        };
        let displacement = session.displacement();
        let mut delta = Vec2::ZERO;
        let mut crossed = false;
        for axis in host.scroll_axes().iter_axes() {
            let d = axis.of(displacement);
            if d.abs() > slop {
                crossed = true;
                let past = if d > 0.0 { d - slop } else { d + slop };
                delta += axis.vec2(-past);
            }
        }
        if !crossed {
            return false;
        }
        tracing::debug!(target: TARGET, ?displacement, "gesture claimed for scrolling");
        self.set_claim(Some(Claim::SelfScroll));
        host.begin_scroll();
        if delta != Vec2::ZERO {
            host.scroll_by(delta);
        }
        true
    }

    fn end(
        &mut self,
        event: &PointerEvent,
        host: &mut H,
        mut drag_swipe: Option<&mut (dyn GestureListener<H> + '_)>,
    ) -> bool {
        let slop = self.slop;
        let Some(session) = &mut self.session else {
            return false;
        };
        let cancelled = event.kind == PointerEventKind::Cancel;
        if !cancelled {
            session.record(event, slop);
        }
        let claim = session.claim();
        let velocity = session.velocity();

        match claim {
            Some(claim @ (Claim::Listener(_) | Claim::DragSwipe)) => {
                self.forward(claim, event, host, drag_swipe.as_deref_mut());
            }
            Some(Claim::SelfScroll) => {
                if cancelled {
                    host.cancel_scroll();
                } else {
                    host.end_scroll(-velocity, event.time);
                }
            }
            None => {}
        }

        let Some(session) = self.session.take() else {
            return false;
        };
        for (_, listener) in &mut self.listeners {
            listener.on_session_end(&session, cancelled, host);
        }
        if let Some(controller) = drag_swipe {
            controller.on_session_end(&session, cancelled, host);
        }
        tracing::debug!(target: TARGET, ?claim, cancelled, "gesture ended");
        claim.is_some()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;
    use core::num::NonZeroU64;

    use kurbo::{Point, Vec2};
    use recycler_scroll::ScrollAxes;

    use super::{GestureDispatcher, GestureListener, ScrollHost};
    use crate::{Claim, PointerEvent, PointerEventKind, TouchSession};

    #[derive(Debug, PartialEq)]
    enum Call {
        Intercept(&'static str, PointerEventKind),
        Event(&'static str, PointerEventKind),
        End(&'static str, bool),
        Begin,
        Scroll(Vec2),
        EndScroll(Vec2),
        CancelScroll,
    }

    struct Host {
        axes: ScrollAxes,
        settling: bool,
        log: Vec<Call>,
    }

    impl Host {
        fn vertical() -> Self {
            Self {
                axes: ScrollAxes::VERTICAL,
                settling: false,
                log: Vec::new(),
            }
        }

        fn scroll_calls(&self) -> Vec<&Call> {
            self.log
                .iter()
                .filter(|c| {
                    matches!(
                        c,
                        Call::Begin | Call::Scroll(_) | Call::EndScroll(_) | Call::CancelScroll
                    )
                })
                .collect()
        }
    }

    impl ScrollHost for Host {
        fn scroll_axes(&self) -> ScrollAxes {
            self.axes
        }
        fn is_settling(&self) -> bool {
            self.settling
        }
        fn begin_scroll(&mut self) {
            self.settling = false;
            self.log.push(Call::Begin);
        }
        fn scroll_by(&mut self, delta: Vec2) {
            self.log.push(Call::Scroll(delta));
        }
        fn end_scroll(&mut self, velocity: Vec2, _now: u64) {
            self.log.push(Call::EndScroll(velocity));
        }
        fn cancel_scroll(&mut self) {
            self.log.push(Call::CancelScroll);
        }
    }

    type ClaimFn = fn(&PointerEvent, &TouchSession) -> bool;

    struct Probe {
        name: &'static str,
        claim: ClaimFn,
    }

    impl Probe {
        fn boxed(name: &'static str, claim: ClaimFn) -> Box<Self> {
            Box::new(Self { name, claim })
        }
    }

    impl GestureListener<Host> for Probe {
        fn intercept(&mut self, event: &PointerEvent, session: &TouchSession, host: &mut Host) -> bool {
            host.log.push(Call::Intercept(self.name, event.kind));
            (self.claim)(event, session)
        }
        fn on_event(&mut self, event: &PointerEvent, _: &TouchSession, host: &mut Host) {
            host.log.push(Call::Event(self.name, event.kind));
        }
        fn on_session_end(&mut self, _: &TouchSession, cancelled: bool, host: &mut Host) {
            host.log.push(Call::End(self.name, cancelled));
        }
    }

    const P1: NonZeroU64 = NonZeroU64::MIN;

    fn p2() -> NonZeroU64 {
        NonZeroU64::new(2).unwrap()
    }

    fn at(y: f64) -> Point {
        Point::new(50.0, y)
    }

    #[test]
    fn crossing_slop_claims_for_scrolling() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        assert!(!dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, None));
        assert!(!dispatcher.dispatch(&PointerEvent::moved(P1, at(96.0), 10), &mut host, None));
        assert!(host.log.is_empty());

        assert!(dispatcher.dispatch(&PointerEvent::moved(P1, at(80.0), 20), &mut host, None));
        assert!(dispatcher.dispatch(&PointerEvent::moved(P1, at(70.0), 30), &mut host, None));
        assert_eq!(
            host.log,
            [
                Call::Begin,
                Call::Scroll(Vec2::new(0.0, 12.0)),
                Call::Scroll(Vec2::new(0.0, 10.0)),
            ]
        );
        assert_eq!(dispatcher.session().unwrap().claim(), Some(Claim::SelfScroll));
    }

    #[test]
    fn motion_along_a_fixed_axis_is_not_a_scroll() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        dispatcher.dispatch(&PointerEvent::down(P1, Point::new(0.0, 0.0), 0), &mut host, None);
        let claimed =
            dispatcher.dispatch(&PointerEvent::moved(P1, Point::new(90.0, 2.0), 10), &mut host, None);
        assert!(!claimed);
        assert!(dispatcher.session().unwrap().slop_crossed());
    }

    #[test]
    fn listeners_claim_in_registration_order() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        dispatcher.add_listener(Probe::boxed("a", |e, _| e.kind == PointerEventKind::Down));
        dispatcher.add_listener(Probe::boxed("b", |_, _| true));

        assert!(dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, None));
        dispatcher.dispatch(&PointerEvent::moved(P1, at(10.0), 10), &mut host, None);
        dispatcher.dispatch(&PointerEvent::up(P1, at(10.0), 20), &mut host, None);
        assert_eq!(
            host.log,
            [
                Call::Intercept("a", PointerEventKind::Down),
                Call::Event("a", PointerEventKind::Move),
                Call::Event("a", PointerEventKind::Up),
                Call::End("a", false),
                Call::End("b", false),
            ]
        );
        assert!(dispatcher.session().is_none());
    }

    #[test]
    fn drag_swipe_follows_listeners_and_precedes_scrolling() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        dispatcher.add_listener(Probe::boxed("a", |_, _| false));
        let mut drag = Probe {
            name: "drag",
            claim: |e, _| e.kind == PointerEventKind::Move,
        };

        dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, Some(&mut drag));
        assert!(dispatcher.dispatch(&PointerEvent::moved(P1, at(60.0), 10), &mut host, Some(&mut drag)));
        dispatcher.dispatch(&PointerEvent::moved(P1, at(20.0), 20), &mut host, Some(&mut drag));
        assert_eq!(
            host.log,
            [
                Call::Intercept("a", PointerEventKind::Down),
                Call::Intercept("drag", PointerEventKind::Down),
                Call::Intercept("a", PointerEventKind::Move),
                Call::Intercept("drag", PointerEventKind::Move),
                Call::Event("drag", PointerEventKind::Move),
            ]
        );
        assert_eq!(dispatcher.session().unwrap().claim(), Some(Claim::DragSwipe));
    }

    #[test]
    fn stale_timestamps_are_dropped() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 10), &mut host, None);
        assert!(!dispatcher.dispatch(&PointerEvent::moved(P1, at(0.0), 10), &mut host, None));
        assert!(!dispatcher.dispatch(&PointerEvent::moved(P1, at(0.0), 5), &mut host, None));
        assert_eq!(dispatcher.session().unwrap().last_position(), at(100.0));
        assert!(host.log.is_empty());
    }

    #[test]
    fn secondary_pointers_are_ignored() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, None);
        assert!(!dispatcher.dispatch(&PointerEvent::down(p2(), at(0.0), 5), &mut host, None));
        assert_eq!(dispatcher.session().unwrap().pointer(), P1);

        dispatcher.dispatch(&PointerEvent::moved(P1, at(50.0), 10), &mut host, None);
        let before = host.log.len();
        assert!(dispatcher.dispatch(&PointerEvent::moved(p2(), at(300.0), 20), &mut host, None));
        assert!(dispatcher.dispatch(&PointerEvent::up(p2(), at(300.0), 30), &mut host, None));
        assert_eq!(host.log.len(), before);
        assert!(dispatcher.session().is_some());
    }

    #[test]
    fn cancel_from_another_pointer_still_ends_the_gesture() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, None);
        dispatcher.dispatch(&PointerEvent::moved(P1, at(50.0), 10), &mut host, None);
        assert_eq!(
            dispatcher.session().unwrap().claim(),
            Some(Claim::SelfScroll)
        );
        assert!(dispatcher.dispatch(&PointerEvent::cancel(p2(), at(300.0), 20), &mut host, None));
        assert!(dispatcher.session().is_none());
        assert_eq!(host.scroll_calls().last(), Some(&&Call::CancelScroll));
    }

    #[test]
    fn release_hands_velocity_to_the_host() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        dispatcher.dispatch(&PointerEvent::down(P1, at(200.0), 0), &mut host, None);
        for (i, y) in [180.0, 160.0, 140.0].into_iter().enumerate() {
            let t = 10 * (i as u64 + 1);
            dispatcher.dispatch(&PointerEvent::moved(P1, at(y), t), &mut host, None);
        }
        assert!(dispatcher.dispatch(&PointerEvent::up(P1, at(120.0), 40), &mut host, None));
        let Some(Call::EndScroll(velocity)) = host.log.last() else {
            panic!("expected a fling hand-off, got {:?}", host.log);
        };
        // The pointer moved up at 2000 px/s, so the offset grows at 2000 px/s.
        assert!((velocity.y - 2000.0).abs() < 1e-6, "velocity {velocity:?}");
        assert_eq!(velocity.x, 0.0);
    }

    #[test]
    fn cancel_clears_the_session() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        dispatcher.add_listener(Probe::boxed("a", |_, _| false));
        dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, None);
        dispatcher.dispatch(&PointerEvent::moved(P1, at(50.0), 10), &mut host, None);
        assert!(dispatcher.dispatch(&PointerEvent::cancel(P1, at(50.0), 20), &mut host, None));
        assert!(dispatcher.session().is_none());
        assert_eq!(host.scroll_calls().last(), Some(&&Call::CancelScroll));
        assert_eq!(host.log.last(), Some(&Call::End("a", true)));
    }

    #[test]
    fn tick_lets_listeners_claim_while_held() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        dispatcher.add_listener(Probe::boxed("press", |e, s| {
            e.time - s.down_time() >= 500
        }));
        dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, None);
        assert!(!dispatcher.tick(100, &mut host, None));
        assert!(dispatcher.tick(600, &mut host, None));
        assert_eq!(
            dispatcher.session().unwrap().claim(),
            Some(Claim::Listener(crate::ListenerId(0)))
        );
        // Later ticks go to the owner.
        dispatcher.tick(700, &mut host, None);
        assert_eq!(host.log.last(), Some(&Call::Event("press", PointerEventKind::Move)));
    }

    #[test]
    fn down_catches_a_running_fling() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        host.settling = true;
        assert!(dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, None));
        assert_eq!(host.log, [Call::Begin]);
        dispatcher.dispatch(&PointerEvent::moved(P1, at(98.0), 10), &mut host, None);
        assert_eq!(host.log.last(), Some(&Call::Scroll(Vec2::new(0.0, 2.0))));
    }

    #[test]
    fn scrolling_gesture_can_be_handed_to_drag_swipe() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        assert!(!dispatcher.hand_to_drag_swipe(&mut host));
        dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, None);
        dispatcher.dispatch(&PointerEvent::moved(P1, at(50.0), 10), &mut host, None);
        assert!(dispatcher.hand_to_drag_swipe(&mut host));
        assert_eq!(host.log.last(), Some(&Call::CancelScroll));
        assert_eq!(dispatcher.session().unwrap().claim(), Some(Claim::DragSwipe));
    }

    #[test]
    fn removing_the_owner_unclaims_the_gesture() {
        let mut dispatcher = GestureDispatcher::<Host>::default();
        let mut host = Host::vertical();
        let id = dispatcher.add_listener(Probe::boxed("a", |_, _| true));
        dispatcher.dispatch(&PointerEvent::down(P1, at(100.0), 0), &mut host, None);
        assert!(dispatcher.remove_listener(id).is_some());
        assert_eq!(dispatcher.listener_count(), 0);
        assert_eq!(dispatcher.session().unwrap().claim(), None);
    }
}
