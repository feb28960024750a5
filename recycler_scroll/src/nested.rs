// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested scroll protocol between a list and an ancestor scroll container.

use kurbo::Vec2;

use crate::{Axis, ScrollAxes, ScrollType};

/// An ancestor that may take part of every scroll delta.
///
/// For each delta the list calls [`pre_scroll`](Self::pre_scroll) first and
/// only consumes the remainder itself; whatever it cannot consume is offered
/// through [`post_scroll`](Self::post_scroll). Both are only called between an
/// accepted [`start_nested_scroll`](Self::start_nested_scroll) and the matching
/// [`stop_nested_scroll`](Self::stop_nested_scroll).
///
/// Consumed amounts carry the sign of the delta they were offered and are
/// clamped to it.
pub trait NestedScrollParent {
    /// A scroll along `axes` is starting. Return `true` to take part.
    fn start_nested_scroll(&mut self, axes: ScrollAxes, kind: ScrollType) -> bool {
        let _ = (axes, kind);
        false
    }

    /// Offered `delta` before the list scrolls. Returns the amount consumed.
    fn pre_scroll(&mut self, axis: Axis, delta: f64, kind: ScrollType) -> f64 {
        let _ = (axis, delta, kind);
        0.0
    }

    /// Offered what the list left over. Returns the amount consumed.
    fn post_scroll(&mut self, axis: Axis, consumed: f64, unconsumed: f64, kind: ScrollType) -> f64 {
        let _ = (axis, consumed, unconsumed, kind);
        0.0
    }

    /// The scroll that started with `kind` ended.
    fn stop_nested_scroll(&mut self, kind: ScrollType) {
        let _ = kind;
    }
}

/// A list with no scrolling ancestor.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoNestedParent;

impl NestedScrollParent for NoNestedParent {}

/// Bookkeeping for one nested scroll, from start to stop.
///
/// Per-axis totals are stored as vectors (`x` horizontal, `y` vertical). For
/// every delta, `pre + local + post + unconsumed == requested`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NestedScrollNegotiation {
    /// Axes the scroll was started for.
    pub axes: ScrollAxes,
    /// Touch or non-touch.
    pub kind: ScrollType,
    /// Whether the ancestor accepted the scroll.
    pub parent_accepted: bool,
    /// Total delta requested.
    pub requested: Vec2,
    /// Total taken by the ancestor before the list.
    pub pre_consumed: Vec2,
    /// Total taken by the list.
    pub local_consumed: Vec2,
    /// Total taken by the ancestor after the list.
    pub post_consumed: Vec2,
    /// Total nobody took.
    pub unconsumed: Vec2,
}

impl NestedScrollNegotiation {
    /// Total consumed by anyone.
    #[must_use]
    pub fn consumed(&self) -> Vec2 {
        self.pre_consumed + self.local_consumed + self.post_consumed
    }
}

/// Clamps an ancestor's answer to the delta it was offered.
pub(crate) fn clamp_consumed(offered: f64, consumed: f64) -> f64 {
    if offered > 0.0 {
        consumed.clamp(0.0, offered)
    } else if offered < 0.0 {
        consumed.clamp(offered, 0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::clamp_consumed;

    #[test]
    fn consumed_is_clamped_to_the_offer() {
        assert_eq!(clamp_consumed(10.0, 4.0), 4.0);
        assert_eq!(clamp_consumed(10.0, 40.0), 10.0);
        assert_eq!(clamp_consumed(10.0, -3.0), 0.0);
        assert_eq!(clamp_consumed(-10.0, -40.0), -10.0);
        assert_eq!(clamp_consumed(0.0, 5.0), 0.0);
    }
}
