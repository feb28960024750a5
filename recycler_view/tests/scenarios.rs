// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of a [`RecyclerView`]: recycling, nested scrolling,
//! gesture claiming and drag-swipe.

use std::cell::RefCell;
use std::num::NonZeroU64;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use recycler_drag_swipe::{
    DragSwipeCallback, DragSwipeState, Movement, MovementFlags, RecoverKind, SwipeDirection,
};
use recycler_gesture::{GestureListener, PointerEvent, PointerEventKind, TouchSession};
use recycler_layout::{
    Adapter, FixedExtentModel, ItemAnimator, ItemChange, LayoutError, LinearLayout, ScrollAlign,
};
use recycler_pool::{ItemType, Slot};
use recycler_scroll::{Axis, NestedScrollParent, ScrollAxes, ScrollState, ScrollType};
use recycler_view::{RecyclerConfig, RecyclerView, ViewError, ViewHost};

type Log = Rc<RefCell<Vec<&'static str>>>;

struct Rows {
    count: usize,
    measures: usize,
    grow_on_bind: bool,
    log: Log,
}

impl Adapter<String> for Rows {
    fn item_count(&self) -> usize {
        self.count
    }

    fn create_view(&mut self, _item_type: ItemType) -> String {
        String::new()
    }

    fn bind(&mut self, slot: &mut Slot<String>, position: usize) {
        slot.view = format!("row {position}");
        if self.grow_on_bind {
            self.count += 1;
        }
    }

    fn measure(&mut self, _slot: &Slot<String>, _position: usize, _cross: f64) -> Option<f64> {
        self.measures += 1;
        self.log.borrow_mut().push("measure");
        None
    }
}

type List = RecyclerView<String, LinearLayout<FixedExtentModel>, Rows>;
type Host = ViewHost<String, LinearLayout<FixedExtentModel>, Rows>;

/// `count` rows of 10px in a 100x100 viewport, laid out.
fn list(count: usize) -> List {
    list_logging(count, Log::default())
}

fn list_logging(count: usize, log: Log) -> List {
    let rows = Rows {
        count,
        measures: 0,
        grow_on_bind: false,
        log,
    };
    let mut view = RecyclerView::linear(
        FixedExtentModel::new(0, 10.0),
        rows,
        RecyclerConfig::default(),
    );
    view.set_viewport(Some(Size::new(100.0, 100.0)));
    view.layout().unwrap();
    view
}

fn positions(view: &List) -> Vec<usize> {
    view.engine()
        .attached()
        .iter()
        .map(|a| a.position())
        .collect()
}

const FINGER: NonZeroU64 = NonZeroU64::MIN;

fn at(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[derive(Default)]
struct Notes {
    moves: Vec<(usize, usize)>,
    swipes: Vec<(usize, SwipeDirection)>,
}

/// Rows drag vertically and swipe horizontally.
struct Owner(Rc<RefCell<Notes>>);

impl DragSwipeCallback for Owner {
    fn movement(&mut self, _position: usize, _item_type: ItemType) -> Movement {
        Movement::new(MovementFlags::VERTICAL, MovementFlags::HORIZONTAL)
    }

    fn on_move(&mut self, from: usize, to: usize) -> bool {
        self.0.borrow_mut().moves.push((from, to));
        true
    }

    fn on_swiped(&mut self, position: usize, direction: SwipeDirection) {
        self.0.borrow_mut().swipes.push((position, direction));
    }
}

struct Changes(Rc<RefCell<Vec<ItemChange>>>);

impl ItemAnimator for Changes {
    fn on_change(&mut self, change: &ItemChange) {
        self.0.borrow_mut().push(*change);
    }
}

fn with_drag_swipe(view: &mut List) -> (Rc<RefCell<Notes>>, Rc<RefCell<Vec<ItemChange>>>) {
    let notes = Rc::new(RefCell::new(Notes::default()));
    let changes = Rc::new(RefCell::new(Vec::new()));
    view.attach_drag_swipe(Box::new(Owner(notes.clone())));
    view.set_item_animator(Some(Box::new(Changes(changes.clone()))));
    (notes, changes)
}

fn dismissals(changes: &[ItemChange]) -> usize {
    changes
        .iter()
        .filter(|c| matches!(c, ItemChange::Dismissed { .. }))
        .count()
}

/// Takes part in every nested scroll, logging each call.
struct Parent {
    log: Log,
    pre_fraction: f64,
    take_overscroll: bool,
}

impl NestedScrollParent for Parent {
    fn start_nested_scroll(&mut self, _axes: ScrollAxes, _kind: ScrollType) -> bool {
        self.log.borrow_mut().push("start");
        true
    }

    fn pre_scroll(&mut self, _axis: Axis, delta: f64, _kind: ScrollType) -> f64 {
        self.log.borrow_mut().push("pre");
        delta * self.pre_fraction
    }

    fn post_scroll(&mut self, _axis: Axis, _consumed: f64, unconsumed: f64, _kind: ScrollType) -> f64 {
        self.log.borrow_mut().push("post");
        if self.take_overscroll { unconsumed } else { 0.0 }
    }

    fn stop_nested_scroll(&mut self, _kind: ScrollType) {
        self.log.borrow_mut().push("stop");
    }
}

#[test]
fn scrolling_one_row_recycles_exactly_one_slot() {
    let mut view = list(1000);
    assert_eq!(positions(&view), (0..10).collect::<Vec<_>>());

    // The cache fills and starts feeding the free pool.
    for _ in 0..4 {
        view.scroll_by(Axis::Vertical, 10.0).unwrap();
    }
    for _ in 0..20 {
        let step = view.scroll_by(Axis::Vertical, 10.0).unwrap();
        assert_eq!(step.local, 10.0);
        let report = view.engine().last_report();
        assert_eq!(report.released, 1, "one row left the viewport");
        assert_eq!(report.rebound, 1, "one row entered it from the free pool");
        assert_eq!(report.created, 0, "no slots are created in steady state");
        assert_eq!(view.engine().pool().cached_len(), 2);
        assert_eq!(view.engine().attached().len(), 10);
    }
}

#[test]
fn layout_is_idempotent() {
    let mut view = list(1000);
    view.scroll_by(Axis::Vertical, 135.0).unwrap();
    let before = positions(&view);
    let report = view.layout().unwrap();
    assert_eq!(positions(&view), before);
    assert_eq!(report.bound(), 0);
    assert_eq!(report.scrap_reused, before.len());
}

#[test]
fn passes_leave_no_scrap_and_unique_positions() {
    let mut view = list(300);
    for delta in [37.0, 250.0, -80.0, 1000.0, -3.5, 12.0, -2000.0, 45.0] {
        view.scroll_by(Axis::Vertical, delta).unwrap();
        assert_eq!(view.engine().scrap_len(), 0);
        let attached = positions(&view);
        assert!(
            attached.windows(2).all(|w| w[0] < w[1]),
            "positions are unique: {attached:?}"
        );
        let slots: Vec<_> = view.engine().attached().iter().map(|a| a.slot().id()).collect();
        for (i, id) in slots.iter().enumerate() {
            assert!(!slots[i + 1..].contains(id), "a slot is attached twice");
        }
    }
}

#[test]
fn nested_scroll_offers_the_parent_first_and_accounts_for_every_pixel() {
    let log = Log::default();
    let mut view = list_logging(20, log.clone());
    view.set_nested_parent(Box::new(Parent {
        log: log.clone(),
        pre_fraction: 0.5,
        take_overscroll: true,
    }));
    log.borrow_mut().clear();

    // 20 rows leave 100px of range; the parent takes half up front and the overscroll.
    let step = view.scroll_by(Axis::Vertical, 300.0).unwrap();
    assert_eq!(step.pre, 150.0);
    assert_eq!(step.local, 100.0);
    assert_eq!(step.post, 50.0);
    assert_eq!(step.unconsumed, 0.0);

    let negotiation = view.scroll().last_negotiation().copied().unwrap();
    assert_eq!(
        negotiation.pre_consumed + negotiation.local_consumed + negotiation.post_consumed,
        negotiation.requested
    );

    let log = log.borrow();
    let pre = log.iter().position(|e| *e == "pre").unwrap();
    let first_measure = log.iter().position(|e| *e == "measure").unwrap();
    let post = log.iter().position(|e| *e == "post").unwrap();
    assert_eq!(log[0], "start");
    assert!(pre < first_measure, "parent is offered the delta before the list lays out");
    assert!(log[first_measure..post].iter().all(|e| *e == "measure"));
    assert_eq!(log.last(), Some(&"stop"));
}

#[test]
fn parent_consuming_everything_leaves_no_pass() {
    let log = Log::default();
    let mut view = list_logging(1000, log.clone());
    view.set_nested_parent(Box::new(Parent {
        log,
        pre_fraction: 1.0,
        take_overscroll: false,
    }));
    let measures = view.adapter().measures;

    let step = view.scroll_by(Axis::Vertical, 50.0).unwrap();
    assert_eq!(step.pre, 50.0);
    assert_eq!(step.local, 0.0);
    assert_eq!(view.adapter().measures, measures, "no layout pass ran");
    assert_eq!(view.engine().scroll_offset(), 0.0);
}

#[test]
fn empty_adapter_has_nothing_to_scroll() {
    let mut view = list(0);
    assert!(view.engine().attached().is_empty());
    assert_eq!(view.engine().viewport_state().total_extent, 0.0);
    let step = view.scroll_by(Axis::Vertical, 50.0).unwrap();
    assert_eq!(step.local, 0.0);
    assert!(view.engine().attached().is_empty());
}

#[test]
fn short_content_fills_from_the_start() {
    let mut view = list(5);
    assert_eq!(positions(&view), [0, 1, 2, 3, 4]);
    assert_eq!(view.scroll_by(Axis::Vertical, 30.0).unwrap().local, 0.0);
    view.scroll_to_position(4, ScrollAlign::End).unwrap();
    assert_eq!(view.engine().first_visible_position(), Some(0));
    assert_eq!(positions(&view), [0, 1, 2, 3, 4]);
}

#[test]
fn drag_across_a_midpoint_reorders_once() {
    let mut view = list(1000);
    let (notes, changes) = with_drag_swipe(&mut view);

    assert!(!view.dispatch(&PointerEvent::down(FINGER, at(50.0, 55.0), 0)));
    // Held past the long-press timeout over row 5.
    assert!(view.tick(600));
    assert_eq!(
        view.drag_swipe().map(|c| c.state()),
        Some(DragSwipeState::Dragging)
    );
    // Row 5 (50..60) dragged down 6px crosses row 6's center at 65.
    assert!(view.dispatch(&PointerEvent::moved(FINGER, at(50.0, 61.0), 616)));
    assert_eq!(view.engine().attached_at(6).unwrap().slot().view, "row 5");
    assert!(view.dispatch(&PointerEvent::up(FINGER, at(50.0, 61.0), 632)));

    assert_eq!(notes.borrow().moves, [(5, 6)]);
    assert!(notes.borrow().swipes.is_empty());
    assert_eq!(dismissals(&changes.borrow()), 0);
    assert_eq!(view.scroll_state(), ScrollState::Idle);

    let frame = view.advance(632 + 250).unwrap();
    assert_eq!(frame.recovered.len(), 1);
    assert_eq!(frame.recovered[0].kind, RecoverKind::Rest);
}

#[test]
fn cancelled_swipe_returns_to_rest_without_dismissing() {
    let mut view = list(1000);
    let (notes, changes) = with_drag_swipe(&mut view);

    view.dispatch(&PointerEvent::down(FINGER, at(50.0, 55.0), 0));
    assert!(view.dispatch(&PointerEvent::moved(FINGER, at(80.0, 55.0), 16)));
    assert_eq!(
        view.drag_swipe().map(|c| c.state()),
        Some(DragSwipeState::Swiping)
    );
    assert!(view.engine().attached_at(5).unwrap().translation().x > 0.0);

    view.dispatch(&PointerEvent::cancel(FINGER, at(80.0, 55.0), 32));
    assert!(notes.borrow().swipes.is_empty());

    let frame = view.advance(32 + 250).unwrap();
    assert_eq!(frame.recovered.len(), 1);
    assert_eq!(frame.recovered[0].position, 5);
    assert_eq!(frame.recovered[0].kind, RecoverKind::Rest);
    assert_eq!(view.engine().attached_at(5).unwrap().translation(), Vec2::ZERO);
    assert_eq!(dismissals(&changes.borrow()), 0);
}

#[test]
fn released_swipe_dismisses() {
    let mut view = list(1000);
    let (notes, changes) = with_drag_swipe(&mut view);

    view.dispatch(&PointerEvent::down(FINGER, at(20.0, 55.0), 0));
    view.dispatch(&PointerEvent::moved(FINGER, at(50.0, 55.0), 200));
    view.dispatch(&PointerEvent::moved(FINGER, at(80.0, 55.0), 400));
    view.dispatch(&PointerEvent::up(FINGER, at(80.0, 55.0), 600));

    assert_eq!(notes.borrow().swipes, [(5, SwipeDirection::Right)]);
    assert_eq!(dismissals(&changes.borrow()), 1);
}

/// Items with stable ids, removed by the owner when swiped away.
struct Tasks(Rc<RefCell<Vec<u64>>>);

impl Adapter<String> for Tasks {
    fn item_count(&self) -> usize {
        self.0.borrow().len()
    }

    fn stable_id(&self, position: usize) -> Option<u64> {
        self.0.borrow().get(position).copied()
    }

    fn create_view(&mut self, _item_type: ItemType) -> String {
        String::new()
    }

    fn bind(&mut self, slot: &mut Slot<String>, position: usize) {
        slot.view = format!("id {}", self.0.borrow()[position]);
    }
}

struct Remover(Rc<RefCell<Vec<u64>>>);

impl DragSwipeCallback for Remover {
    fn movement(&mut self, _position: usize, _item_type: ItemType) -> Movement {
        Movement::new(MovementFlags::VERTICAL, MovementFlags::HORIZONTAL)
    }

    fn on_move(&mut self, _from: usize, _to: usize) -> bool {
        false
    }

    fn on_swiped(&mut self, position: usize, _direction: SwipeDirection) {
        self.0.borrow_mut().remove(position);
    }
}

#[test]
fn dismissed_offset_does_not_follow_the_position() {
    let ids = Rc::new(RefCell::new((100..200).collect::<Vec<u64>>()));
    let mut view = RecyclerView::linear(
        FixedExtentModel::new(0, 10.0),
        Tasks(ids.clone()),
        RecyclerConfig::default(),
    );
    view.attach_drag_swipe(Box::new(Remover(ids.clone())));
    view.set_viewport(Some(Size::new(100.0, 100.0)));
    view.layout().unwrap();

    view.dispatch(&PointerEvent::down(FINGER, at(20.0, 55.0), 0));
    view.dispatch(&PointerEvent::moved(FINGER, at(50.0, 55.0), 200));
    view.dispatch(&PointerEvent::moved(FINGER, at(80.0, 55.0), 400));
    view.dispatch(&PointerEvent::up(FINGER, at(80.0, 55.0), 600));
    assert_eq!(ids.borrow().len(), 99);

    // Relayout while the dismissed row is still sliding out.
    view.advance(700).unwrap();
    assert!(view.engine().attached_at(5).unwrap().translation().x > 60.0);
    view.data_set_changed();
    view.layout().unwrap();
    let row = view.engine().attached_at(5).unwrap();
    assert_eq!(row.slot().view, "id 106");
    assert_eq!(row.translation(), Vec2::ZERO);

    let frame = view.advance(900).unwrap();
    assert_eq!(frame.recovered[0].kind, RecoverKind::Dismiss(SwipeDirection::Right));
    assert!(
        view.engine()
            .attached()
            .iter()
            .all(|a| a.translation() == Vec2::ZERO)
    );
}

#[test]
fn dismissed_slot_rests_once_its_animation_ends() {
    let mut view = list(1000);
    with_drag_swipe(&mut view);

    view.dispatch(&PointerEvent::down(FINGER, at(20.0, 55.0), 0));
    view.dispatch(&PointerEvent::moved(FINGER, at(50.0, 55.0), 200));
    view.dispatch(&PointerEvent::moved(FINGER, at(80.0, 55.0), 400));
    view.dispatch(&PointerEvent::up(FINGER, at(80.0, 55.0), 600));

    let frame = view.advance(900).unwrap();
    assert_eq!(frame.recovered[0].to, Vec2::new(100.0, 0.0));
    assert_eq!(view.engine().attached_at(5).unwrap().translation(), Vec2::ZERO);
}

#[test]
fn drag_handle_starts_a_drag_under_the_pointer() {
    let mut view = list(1000);
    let (notes, _) = with_drag_swipe(&mut view);

    view.dispatch(&PointerEvent::down(FINGER, at(50.0, 25.0), 0));
    assert_eq!(view.start_drag(2), Ok(true));
    // Row 2 (20..30) dragged down 6px crosses row 3's center at 35.
    view.dispatch(&PointerEvent::moved(FINGER, at(50.0, 31.0), 16));
    view.dispatch(&PointerEvent::up(FINGER, at(50.0, 31.0), 32));
    assert_eq!(notes.borrow().moves, [(2, 3)]);
}

#[test]
fn drag_without_a_controller_is_rejected() {
    let mut view = list(10);
    assert_eq!(view.start_drag(0), Err(ViewError::DragSwipeDetached));
}

/// Claims every gesture on `Down`.
struct Greedy;

impl GestureListener<Host> for Greedy {
    fn intercept(&mut self, event: &PointerEvent, _session: &TouchSession, _host: &mut Host) -> bool {
        event.kind == PointerEventKind::Down
    }
}

#[test]
fn listeners_outrank_drag_swipe_and_scrolling() {
    let mut view = list(1000);
    let (notes, _) = with_drag_swipe(&mut view);
    view.add_gesture_listener(Box::new(Greedy));

    assert!(view.dispatch(&PointerEvent::down(FINGER, at(50.0, 55.0), 0)));
    view.tick(600);
    view.dispatch(&PointerEvent::moved(FINGER, at(50.0, 10.0), 616));
    view.dispatch(&PointerEvent::up(FINGER, at(50.0, 10.0), 632));

    assert_eq!(
        view.drag_swipe().map(|c| c.state()),
        Some(DragSwipeState::Idle)
    );
    assert!(notes.borrow().moves.is_empty());
    assert_eq!(view.engine().scroll_offset(), 0.0);
    assert_eq!(view.start_drag(5), Ok(false));
}

/// Asks for a jump in the middle of dispatch.
struct Jumper;

impl GestureListener<Host> for Jumper {
    fn intercept(&mut self, event: &PointerEvent, _session: &TouchSession, host: &mut Host) -> bool {
        if event.kind == PointerEventKind::Down {
            host.request_scroll_to_position(50, ScrollAlign::Start);
        }
        false
    }
}

#[test]
fn listener_requests_are_deferred_until_the_next_call() {
    let mut view = list(1000);
    view.add_gesture_listener(Box::new(Jumper));

    view.dispatch(&PointerEvent::down(FINGER, at(50.0, 55.0), 0));
    assert_eq!(view.engine().first_visible_position(), Some(0));

    view.layout().unwrap();
    assert_eq!(view.engine().first_visible_position(), Some(50));
}

#[test]
fn pointer_drag_scrolls_past_the_slop_then_flings_to_idle() {
    let mut view = list(1000);
    view.dispatch(&PointerEvent::down(FINGER, at(50.0, 90.0), 0));
    assert!(view.dispatch(&PointerEvent::moved(FINGER, at(50.0, 70.0), 16)));
    assert_eq!(view.scroll_state(), ScrollState::Dragging);
    assert_eq!(view.engine().scroll_offset(), 12.0);
    view.dispatch(&PointerEvent::moved(FINGER, at(50.0, 40.0), 32));
    view.dispatch(&PointerEvent::up(FINGER, at(50.0, 10.0), 48));
    assert_eq!(view.scroll_state(), ScrollState::Settling);

    let released_at = view.engine().scroll_offset();
    let mut now = 48;
    while view.scroll_state() == ScrollState::Settling && now < 10_000 {
        now += 16;
        view.advance(now).unwrap();
    }
    assert_eq!(view.scroll_state(), ScrollState::Idle);
    assert!(view.engine().scroll_offset() > released_at);
}

#[test]
fn cancel_from_a_second_pointer_stops_dragging() {
    let mut view = list(1000);
    view.dispatch(&PointerEvent::down(FINGER, at(50.0, 90.0), 0));
    view.dispatch(&PointerEvent::moved(FINGER, at(50.0, 70.0), 16));
    assert_eq!(view.scroll_state(), ScrollState::Dragging);

    let other = NonZeroU64::new(2).unwrap();
    assert!(view.dispatch(&PointerEvent::cancel(other, at(0.0, 0.0), 32)));
    assert!(view.session().is_none());
    assert_eq!(view.scroll_state(), ScrollState::Idle);
}

#[test]
fn fling_stops_at_the_content_edge() {
    let mut view = list(20);
    assert!(view.fling(Vec2::new(0.0, 5000.0), 0));
    let mut now = 0;
    while view.scroll_state() == ScrollState::Settling && now < 10_000 {
        now += 16;
        view.advance(now).unwrap();
    }
    assert_eq!(view.scroll_state(), ScrollState::Idle);
    assert_eq!(view.engine().scroll_offset(), 100.0);
}

#[test]
fn jumping_to_a_position_stops_a_fling() {
    let mut view = list(1000);
    assert!(view.fling(Vec2::new(0.0, 3000.0), 0));
    view.advance(16).unwrap();
    assert_eq!(view.scroll_state(), ScrollState::Settling);

    view.scroll_to_position(500, ScrollAlign::Start).unwrap();
    assert_eq!(view.scroll_state(), ScrollState::Idle);
    assert_eq!(view.engine().first_visible_position(), Some(500));
}

#[test]
fn inconsistent_item_count_aborts_then_recovers() {
    let mut view = list(50);
    view.adapter_mut().grow_on_bind = true;
    view.data_set_changed();
    let err = view.layout().unwrap_err();
    assert_eq!(
        err,
        ViewError::Layout(LayoutError::InconsistentItemCount {
            expected: 50,
            actual: 51
        })
    );
    assert_eq!(view.engine().scrap_len(), 0);
    assert!(view.engine().needs_layout());

    view.adapter_mut().grow_on_bind = false;
    view.layout().unwrap();
    assert_eq!(positions(&view), (0..10).collect::<Vec<_>>());
}
