//! Viewport offset coordination.
//!
//! A focus move that needs scrolling either sets the offset at once or is
//! queued as a [`Waypoint`] on a single running scroll animation. Waypoints
//! are released strictly in the order they were queued, as the animated
//! offset passes them.
//!
//! ```text
//!  offset   0 ─────────── -110 ─────────── -220 ───> target
//!  queue        [wp item 3 @ -110]  [wp item 5 @ -220]
//!                     │ reached           │ reached
//!                     ▼                   ▼
//!              FocusChange(→3)     FocusChange(3→5)
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use horizon_grid_core::Span;
use horizon_grid_core::logging::targets;

use crate::animation::{Easing, Tween};
use crate::layout::ItemRef;

/// Offsets closer than this count as reached.
const OFFSET_EPSILON: f32 = 0.01;

/// One queued focus destination and the offset that shows it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub target: ItemRef,
    pub offset: f32,
}

/// The part of the viewport a focused item must lie in, in screen
/// coordinates along the main axis.
///
/// `margins` are the leading and trailing insets. Where a neighbouring column
/// exists, the zone shrinks by half of that column's thickness so the
/// neighbour stays partly visible.
pub fn focus_safe_zone(
    viewport_extent: f32,
    margins: (f32, f32),
    prev_space: Option<f32>,
    next_space: Option<f32>,
) -> Span {
    Span::new(
        margins.0 + prev_space.map_or(0.0, |s| s / 2.0),
        viewport_extent - margins.1 - next_space.map_or(0.0, |s| s / 2.0),
    )
}

/// Smallest offset change that moves `item` (screen coordinates) into
/// `zone`. Items larger than the zone are aligned to its start.
pub fn required_delta(item: Span, zone: Span) -> f32 {
    if item.start < zone.start || item.len() > zone.len() {
        zone.start - item.start
    } else if item.end > zone.end {
        zone.end - item.end
    } else {
        0.0
    }
}

/// What one animation step produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollStep {
    /// The offset moved during this step.
    pub moved: bool,
    /// Waypoints reached during this step, oldest first.
    pub reached: Vec<Waypoint>,
    /// The animation ended during this step.
    pub finished: bool,
}

/// Owns the content offset, the scroll animation and the waypoint queue.
#[derive(Debug, Clone)]
pub struct ScrollCoordinator {
    offset: f32,
    animation: Option<Tween>,
    waypoints: VecDeque<Waypoint>,
    duration: Duration,
    easing: Easing,
}

impl ScrollCoordinator {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            offset: 0.0,
            animation: None,
            waypoints: VecDeque::new(),
            duration,
            easing,
        }
    }

    /// Current content offset along the main axis.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// The offset the viewport is heading to.
    pub fn target_offset(&self) -> f32 {
        self.animation
            .as_ref()
            .filter(|a| a.is_running())
            .map_or(self.offset, Tween::target)
    }

    /// True when moves should be queued rather than applied at once.
    #[inline]
    pub fn is_animated(&self) -> bool {
        !self.duration.is_zero()
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.as_ref().is_some_and(Tween::is_running)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        self.waypoints.iter()
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.waypoints.is_empty()
    }

    /// Set the offset at once. Any running animation stops; pending
    /// waypoints are left to the caller.
    pub fn set_offset(&mut self, offset: f32) {
        self.animation = None;
        self.offset = offset;
    }

    /// Queue a waypoint and start or extend the scroll animation toward it.
    pub fn enqueue(&mut self, waypoint: Waypoint) {
        tracing::trace!(
            target: targets::SCROLL,
            target_item = ?waypoint.target,
            offset = waypoint.offset,
            queued = self.waypoints.len(),
            "waypoint queued"
        );
        self.waypoints.push_back(waypoint);

        match &mut self.animation {
            Some(animation) if animation.is_running() => {
                if (animation.target() - waypoint.offset).abs() > OFFSET_EPSILON {
                    animation.retarget(waypoint.offset);
                }
            }
            _ => {
                self.animation = Some(Tween::new(
                    self.offset,
                    waypoint.offset,
                    self.duration,
                    self.easing,
                ));
            }
        }
    }

    /// Advance the animation by `dt` and release the waypoints it passed.
    pub fn advance(&mut self, dt: Duration) -> ScrollStep {
        let Some(animation) = &mut self.animation else {
            return ScrollStep::default();
        };
        let previous = self.offset;
        let step = animation.advance(dt);
        let direction = animation.direction();
        self.offset = step.value;

        let mut reached = Vec::new();
        while let Some(front) = self.waypoints.front() {
            let passed = step.finished
                || direction == 0.0
                || (front.offset - self.offset) * direction <= OFFSET_EPSILON;
            if !passed {
                break;
            }
            if let Some(waypoint) = self.waypoints.pop_front() {
                reached.push(waypoint);
            }
        }
        if step.finished {
            self.animation = None;
        }
        for waypoint in &reached {
            tracing::trace!(target: targets::SCROLL, target_item = ?waypoint.target, "waypoint reached");
        }

        ScrollStep {
            moved: (self.offset - previous).abs() > f32::EPSILON,
            reached,
            finished: step.finished,
        }
    }

    /// Jump to the animation's end and release every waypoint in order.
    pub fn finish(&mut self) -> Vec<Waypoint> {
        if let Some(mut animation) = self.animation.take() {
            self.offset = animation.finish().value;
        }
        self.waypoints.drain(..).collect()
    }

    /// Stop where the animation is and drop the queued waypoints.
    pub fn stop(&mut self) -> Vec<Waypoint> {
        self.animation = None;
        let dropped: Vec<Waypoint> = self.waypoints.drain(..).collect();
        if !dropped.is_empty() {
            tracing::debug!(target: targets::SCROLL, dropped = dropped.len(), "waypoints flushed");
        }
        dropped
    }
}
