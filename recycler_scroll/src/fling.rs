// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear-deceleration fling.

use kurbo::Vec2;

/// A decelerating motion started from a release velocity.
///
/// Each axis slows down independently at `deceleration` px/s² until it
/// stops, so the total travel along an axis is `v² / (2 * deceleration)`.
/// Motion is sampled by calling [`step`](Self::step) with the frame time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fling {
    start_time: u64,
    velocity: Vec2,
    deceleration: f64,
    last_time: u64,
    travelled: Vec2,
}

impl Fling {
    /// Starts a fling at `now` (milliseconds) with `velocity` in px/s.
    #[must_use]
    pub fn new(now: u64, velocity: Vec2, deceleration: f64) -> Self {
        Self {
            start_time: now,
            velocity,
            deceleration: deceleration.max(f64::EPSILON),
            last_time: now,
            travelled: Vec2::ZERO,
        }
    }

    /// Initial velocity in px/s.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn duration_secs(&self, v: f64) -> f64 {
        v.abs() / self.deceleration
    }

    fn displacement_at(&self, v: f64, secs: f64) -> f64 {
        let t = secs.min(self.duration_secs(v));
        let magnitude = v.abs() * t - self.deceleration * t * t / 2.0;
        if v < 0.0 { -magnitude } else { magnitude }
    }

    /// Velocity at `now`, in px/s.
    #[must_use]
    pub fn velocity_at(&self, now: u64) -> Vec2 {
        let secs = self.elapsed_secs(now);
        let axis = |v: f64| {
            let speed = (v.abs() - self.deceleration * secs).max(0.0);
            if v < 0.0 { -speed } else { speed }
        };
        Vec2::new(axis(self.velocity.x), axis(self.velocity.y))
    }

    fn elapsed_secs(&self, now: u64) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Fling durations are seconds long"
        )]
        let ms = now.saturating_sub(self.start_time) as f64;
        ms / 1000.0
    }

    /// Total time until both axes have stopped, in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        let secs = self
            .duration_secs(self.velocity.x)
            .max(self.duration_secs(self.velocity.y));
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Duration is non-negative and small"
        )]
        let ms = (secs * 1000.0) as u64;
        ms
    }

    /// Returns `true` once the motion has come to rest at `now`.
    #[must_use]
    pub fn is_finished(&self, now: u64) -> bool {
        now.saturating_sub(self.start_time) >= self.duration_ms()
    }

    /// Displacement since the previous step, advancing the fling to `now`.
    ///
    /// Returns zero for times at or before the previous step.
    pub fn step(&mut self, now: u64) -> Vec2 {
        if now <= self.last_time {
            return Vec2::ZERO;
        }
        self.last_time = now;
        let secs = self.elapsed_secs(now);
        let total = Vec2::new(
            self.displacement_at(self.velocity.x, secs),
            self.displacement_at(self.velocity.y, secs),
        );
        let delta = total - self.travelled;
        self.travelled = total;
        delta
    }

    /// Time of the last step.
    #[must_use]
    pub const fn last_time(&self) -> u64 {
        self.last_time
    }
}
