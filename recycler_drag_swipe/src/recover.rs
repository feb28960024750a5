// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animations that settle a released item.

use kurbo::Vec2;

use crate::SwipeDirection;

/// Where a recover animation takes its item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecoverKind {
    /// Back to its resting place.
    Rest,
    /// Off screen after a dismissal.
    Dismiss(SwipeDirection),
}

/// A released item sliding from its drag offset to a target offset.
///
/// Motion eases out quadratically over `duration` milliseconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RecoverAnimation {
    /// Adapter position of the item.
    pub position: usize,
    /// What the animation ends in.
    pub kind: RecoverKind,
    /// Translation at release.
    pub from: Vec2,
    /// Translation at the end.
    pub to: Vec2,
    /// Release time, in milliseconds.
    pub start_time: u64,
    /// Length, in milliseconds.
    pub duration: u64,
}

impl RecoverAnimation {
    /// Fraction of the animation done at `now`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: u64) -> f64 {
        if self.duration == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_time).min(self.duration);
        #[allow(
            clippy::cast_precision_loss,
            reason = "Animation durations are far below 2^52 milliseconds"
        )]
        let fraction = elapsed as f64 / self.duration as f64;
        fraction
    }

    /// Translation at `now`.
    #[must_use]
    pub fn offset_at(&self, now: u64) -> Vec2 {
        let t = self.progress(now);
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.from + (self.to - self.from) * eased
    }

    /// Returns `true` once the animation has reached its target.
    #[must_use]
    pub fn is_finished(&self, now: u64) -> bool {
        now.saturating_sub(self.start_time) >= self.duration
    }
}
