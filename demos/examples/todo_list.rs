// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A to-do list driven by a scripted pointer: scroll, fling, reorder and dismiss.
//!
//! This example wires:
//! - `recycler_layout` for a linear list of fixed-height rows,
//! - `recycler_view` for gestures, scrolling and slot recycling,
//! - `recycler_drag_swipe` for long-press reordering and swipe-to-dismiss.
//!
//! Run:
//! - `RUST_LOG=recycler=debug cargo run -p recycler_demos --example todo_list`

use std::cell::RefCell;
use std::num::NonZeroU64;
use std::rc::Rc;

use kurbo::{Point, Size};
use recycler_drag_swipe::{
    DragSwipeCallback, DragSwipeState, Movement, MovementFlags, SwipeDirection,
};
use recycler_gesture::PointerEvent;
use recycler_layout::{Adapter, FixedExtentModel, ItemAnimator, ItemChange, LinearLayout};
use recycler_pool::{ItemType, Slot};
use recycler_scroll::ScrollState;
use recycler_view::{RecyclerConfig, RecyclerView};
use tracing_subscriber::EnvFilter;

const ROW: f64 = 48.0;

type Todos = Rc<RefCell<Vec<String>>>;

/// Binds to-do titles into string "views".
struct TodoAdapter {
    todos: Todos,
    binds: usize,
}

impl Adapter<String> for TodoAdapter {
    fn item_count(&self) -> usize {
        self.todos.borrow().len()
    }

    fn create_view(&mut self, _item_type: ItemType) -> String {
        String::new()
    }

    fn bind(&mut self, slot: &mut Slot<String>, position: usize) {
        self.binds += 1;
        slot.view.clone_from(&self.todos.borrow()[position]);
    }

    fn unbind(&mut self, slot: &mut Slot<String>) {
        slot.view.clear();
    }
}

/// Owns the data behind drag and swipe.
struct TodoOwner(Todos);

impl DragSwipeCallback for TodoOwner {
    fn movement(&mut self, _position: usize, _item_type: ItemType) -> Movement {
        Movement::new(MovementFlags::VERTICAL, MovementFlags::HORIZONTAL)
    }

    fn on_move(&mut self, from: usize, to: usize) -> bool {
        let mut todos = self.0.borrow_mut();
        let todo = todos.remove(from);
        todos.insert(to, todo);
        true
    }

    fn on_swiped(&mut self, position: usize, direction: SwipeDirection) {
        let done = self.0.borrow_mut().remove(position);
        tracing::info!(%done, ?direction, "dismissed");
    }

    fn on_state_changed(&mut self, position: Option<usize>, state: DragSwipeState) {
        tracing::info!(?position, ?state, "drag-swipe");
    }
}

/// Prints structural changes instead of animating them.
struct Printer;

impl ItemAnimator for Printer {
    fn on_change(&mut self, change: &ItemChange) {
        match change {
            ItemChange::Moved { from, to, .. } => println!("  moved {from} -> {to}"),
            ItemChange::Dismissed { position, offset } => {
                println!("  dismissed {position} at {offset:?}");
            }
            ItemChange::Appeared { .. } | ItemChange::Disappeared { .. } => {}
        }
    }
}

type TodoView = RecyclerView<String, LinearLayout<FixedExtentModel>, TodoAdapter>;

fn print_visible(view: &TodoView) {
    let rows: Vec<_> = view
        .engine()
        .attached()
        .iter()
        .map(|a| format!("{}:{}", a.position(), a.slot().view))
        .collect();
    println!("  visible [{}]", rows.join(", "));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let todos: Todos = Rc::new(RefCell::new(
        (1..=200).map(|i| format!("task {i}")).collect(),
    ));
    let adapter = TodoAdapter {
        todos: todos.clone(),
        binds: 0,
    };
    let config = RecyclerConfig {
        look_ahead_extent: ROW,
        ..RecyclerConfig::default()
    };
    let mut view = RecyclerView::linear(FixedExtentModel::new(0, ROW), adapter, config);
    view.attach_drag_swipe(Box::new(TodoOwner(todos.clone())));
    view.set_item_animator(Some(Box::new(Printer)));
    view.set_viewport(Some(Size::new(320.0, 480.0)));
    if let Err(err) = view.layout() {
        tracing::error!(%err, "initial layout failed");
        return;
    }
    println!("initial layout");
    print_visible(&view);

    let finger = NonZeroU64::MIN;
    let mut now = 0;
    let mut step = |ms: u64| {
        now += ms;
        now
    };

    println!("drag up by 300px, then release quickly");
    view.dispatch(&PointerEvent::down(finger, Point::new(160.0, 400.0), step(0)));
    for y in [340.0, 260.0, 180.0, 100.0] {
        view.dispatch(&PointerEvent::moved(finger, Point::new(160.0, y), step(16)));
    }
    view.dispatch(&PointerEvent::up(finger, Point::new(160.0, 100.0), step(16)));
    while view.scroll_state() == ScrollState::Settling {
        if let Err(err) = view.advance(step(16)) {
            tracing::warn!(%err, "frame failed");
        }
    }
    println!("  settled at offset {:.1}", view.engine().scroll_offset());
    print_visible(&view);

    println!("long-press the second visible row and drag it down one row");
    let first = view.engine().first_visible_position().unwrap_or(0);
    let grab = view
        .engine()
        .attached_at(first + 1)
        .map(|a| a.rect().center())
        .unwrap_or_default();
    view.dispatch(&PointerEvent::down(finger, grab, step(200)));
    view.tick(step(550));
    let target = Point::new(grab.x, grab.y + ROW * 0.6);
    view.dispatch(&PointerEvent::moved(finger, target, step(16)));
    view.dispatch(&PointerEvent::up(finger, target, step(16)));
    let _ = view.advance(step(300));
    print_visible(&view);

    println!("swipe the first visible row away");
    let first = view.engine().first_visible_position().unwrap_or(0);
    let row = view
        .engine()
        .attached_at(first)
        .map(|a| a.rect().center())
        .unwrap_or_default();
    view.dispatch(&PointerEvent::down(finger, row, step(200)));
    view.dispatch(&PointerEvent::moved(finger, Point::new(row.x + 80.0, row.y), step(16)));
    view.dispatch(&PointerEvent::moved(finger, Point::new(row.x + 200.0, row.y), step(16)));
    view.dispatch(&PointerEvent::up(finger, Point::new(row.x + 200.0, row.y), step(16)));
    let _ = view.advance(step(300));
    view.data_set_changed();
    if let Err(err) = view.layout() {
        tracing::warn!(%err, "relayout failed");
    }
    print_visible(&view);

    let stats = view.engine().pool().stats();
    println!(
        "{} items, {} binds, {} slots created",
        todos.borrow().len(),
        view.adapter().binds,
        stats.created
    );
}
