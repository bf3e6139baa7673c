//! Time-driven interpolation of a single value.
//!
//! A [`Tween`] does not read the clock itself; the owner feeds elapsed time
//! through [`Tween::advance`]. That keeps scroll and focus-scale animations
//! deterministic and lets the host decide how frames are produced.

use std::time::Duration;

use super::easing::{Easing, lerp_eased};

/// Result of advancing a tween by one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep {
    /// The interpolated value after this step.
    pub value: f32,
    /// True when this step reached the end value.
    pub finished: bool,
}

/// An eased transition of one `f32` between two values.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    value: f32,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
    running: bool,
}

impl Tween {
    /// Create a tween that starts running immediately.
    pub fn new(from: f32, to: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            value: from,
            elapsed: Duration::ZERO,
            duration,
            easing,
            running: true,
        }
    }

    /// The start value of the current segment.
    #[inline]
    pub fn from(&self) -> f32 {
        self.from
    }

    /// The end value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    /// The most recently computed value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Sign of travel for the current segment: -1, 0 or 1.
    #[inline]
    pub fn direction(&self) -> f32 {
        let delta = self.to - self.from;
        if delta.abs() <= f32::EPSILON {
            0.0
        } else {
            delta.signum()
        }
    }

    /// Extend the tween toward a new end value.
    ///
    /// The new segment starts from the current value and gets a full duration.
    pub fn retarget(&mut self, to: f32) {
        self.from = self.value;
        self.to = to;
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    /// Stop the tween where it is.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Jump straight to the end value.
    pub fn finish(&mut self) -> TweenStep {
        self.value = self.to;
        self.elapsed = self.duration;
        self.running = false;
        TweenStep {
            value: self.value,
            finished: true,
        }
    }

    /// Advance the tween by `dt` and return the new value.
    pub fn advance(&mut self, dt: Duration) -> TweenStep {
        if !self.running {
            return TweenStep {
                value: self.value,
                finished: true,
            };
        }

        self.elapsed += dt;
        if self.duration.is_zero() || self.elapsed >= self.duration {
            return self.finish();
        }

        let raw = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.value = lerp_eased(self.easing, self.from, self.to, raw);
        TweenStep {
            value: self.value,
            finished: false,
        }
    }
}
