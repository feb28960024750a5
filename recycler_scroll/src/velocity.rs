// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer velocity estimation.

use kurbo::{Point, Vec2};

use crate::TARGET;

/// Number of samples kept.
pub const VELOCITY_SAMPLES: usize = 20;

/// Samples older than this (relative to the newest) are ignored, in milliseconds.
pub const VELOCITY_HORIZON_MS: u64 = 100;

#[derive(Copy, Clone, Debug, Default)]
struct Sample {
    time: u64,
    position: Point,
}

/// Estimates pointer velocity from a bounded ring of recent samples.
///
/// The estimate is the least-squares slope of position over time, per axis,
/// using the samples within [`VELOCITY_HORIZON_MS`] of the newest one.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: [Sample; VELOCITY_SAMPLES],
    head: usize,
    len: usize,
}

impl VelocityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every sample.
    pub fn clear(&mut self) {
        self.len = 0;
        self.head = 0;
    }

    /// Number of stored samples.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no samples are stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Records the pointer at `position` at `time` (milliseconds).
    ///
    /// Samples older than the newest stored one are dropped.
    pub fn add(&mut self, time: u64, position: Point) {
        if self.recent().next().is_some_and(|newest| time < newest.time) {
            tracing::trace!(target: TARGET, time, "out-of-order velocity sample dropped");
            return;
        }
        self.samples[self.head] = Sample { time, position };
        self.head = (self.head + 1) % VELOCITY_SAMPLES;
        self.len = (self.len + 1).min(VELOCITY_SAMPLES);
    }

    /// Newest-first iterator over stored samples.
    fn recent(&self) -> impl Iterator<Item = Sample> + '_ {
        (1..=self.len).map(move |back| {
            self.samples[(self.head + VELOCITY_SAMPLES - back) % VELOCITY_SAMPLES]
        })
    }

    /// Estimated velocity in pixels per second.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        let Some(newest) = self.recent().next() else {
            return Vec2::ZERO;
        };
        let window = || {
            self.recent()
                .take_while(move |s| newest.time - s.time <= VELOCITY_HORIZON_MS)
        };

        let mut n = 0.0;
        let (mut sum_t, mut sum_x, mut sum_y) = (0.0, 0.0, 0.0);
        for s in window() {
            // Seconds before the newest sample.
            #[allow(
                clippy::cast_precision_loss,
                reason = "Time differences are bounded by the horizon"
            )]
            let t = -((newest.time - s.time) as f64) / 1000.0;
            n += 1.0;
            sum_t += t;
            sum_x += s.position.x;
            sum_y += s.position.y;
        }
        if n < 2.0 {
            return Vec2::ZERO;
        }
        let (mean_t, mean_x, mean_y) = (sum_t / n, sum_x / n, sum_y / n);

        let (mut var_t, mut cov_x, mut cov_y) = (0.0, 0.0, 0.0);
        for s in window() {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Time differences are bounded by the horizon"
            )]
            let dt = -((newest.time - s.time) as f64) / 1000.0 - mean_t;
            var_t += dt * dt;
            cov_x += dt * (s.position.x - mean_x);
            cov_y += dt * (s.position.y - mean_y);
        }
        if var_t == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(cov_x / var_t, cov_y / var_t)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::{VELOCITY_SAMPLES, VelocityTracker};

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn steady_motion_gives_its_speed() {
        let mut tracker = VelocityTracker::new();
        for i in 0..5_u32 {
            let t = u64::from(i) * 10;
            tracker.add(t, Point::new(0.0, f64::from(i) * 5.0));
        }
        // 5px every 10ms.
        assert!(close(tracker.velocity(), Vec2::new(0.0, 500.0)));
    }

    #[test]
    fn old_samples_fall_outside_the_horizon() {
        let mut tracker = VelocityTracker::new();
        tracker.add(0, Point::new(0.0, 0.0));
        tracker.add(10, Point::new(0.0, 1000.0));
        // A pause, then slow motion.
        tracker.add(500, Point::new(0.0, 1000.0));
        tracker.add(510, Point::new(0.0, 1001.0));
        assert!(close(tracker.velocity(), Vec2::new(0.0, 100.0)));
    }

    #[test]
    fn ring_is_bounded() {
        let mut tracker = VelocityTracker::new();
        for i in 0..(VELOCITY_SAMPLES as u64 * 2) {
            tracker.add(i, Point::ORIGIN);
        }
        assert_eq!(tracker.len(), VELOCITY_SAMPLES);
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn out_of_order_samples_are_dropped() {
        let mut tracker = VelocityTracker::new();
        tracker.add(20, Point::new(0.0, 10.0));
        tracker.add(30, Point::new(0.0, 20.0));
        tracker.add(5, Point::new(0.0, 500.0));
        assert_eq!(tracker.len(), 2);
        assert!(close(tracker.velocity(), Vec2::new(0.0, 1000.0)));
    }

    #[test]
    fn single_sample_has_no_velocity() {
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(), Vec2::ZERO);
        tracker.add(5, Point::new(1.0, 1.0));
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }
}
