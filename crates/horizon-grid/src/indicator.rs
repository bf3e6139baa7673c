//! Scroll position indicator.

use std::time::Duration;

use horizon_grid_core::Orientation;

/// What the host should draw for the scroll indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollIndicatorState {
    pub orientation: Orientation,
    /// Thumb start as a fraction of the track, `0.0..=1.0`.
    pub position: f32,
    /// Thumb length as a fraction of the track, `0.0..=1.0`.
    pub length: f32,
    /// `1.0` while scrolling, falling to `0.0` as it fades out.
    pub opacity: f32,
}

/// Tracks thumb geometry and the fade-out after scrolling settles.
#[derive(Debug, Clone)]
pub struct ScrollIndicator {
    state: ScrollIndicatorState,
    fade_out: Duration,
    fading: Option<Duration>,
}

impl ScrollIndicator {
    pub fn new(orientation: Orientation, fade_out: Duration) -> Self {
        Self {
            state: ScrollIndicatorState {
                orientation,
                position: 0.0,
                length: 1.0,
                opacity: 0.0,
            },
            fade_out,
            fading: None,
        }
    }

    #[inline]
    pub fn state(&self) -> &ScrollIndicatorState {
        &self.state
    }

    /// Recompute the thumb for a new offset and show the indicator.
    pub fn update(&mut self, offset: f32, content_extent: f32, viewport_extent: f32) -> ScrollIndicatorState {
        self.relayout(offset, content_extent, viewport_extent);
        self.state.opacity = 1.0;
        self.fading = None;
        self.state
    }

    /// Recompute the thumb without changing its visibility.
    pub fn relayout(&mut self, offset: f32, content_extent: f32, viewport_extent: f32) -> ScrollIndicatorState {
        let scrollable = content_extent - viewport_extent;
        if content_extent <= 0.0 || scrollable <= 0.0 {
            self.state.position = 0.0;
            self.state.length = 1.0;
        } else {
            self.state.length = (viewport_extent / content_extent).clamp(0.0, 1.0);
            let progress = (-offset / scrollable).clamp(0.0, 1.0);
            self.state.position = progress * (1.0 - self.state.length);
        }
        self.state
    }

    /// Start fading once scrolling has settled.
    pub fn settle(&mut self) {
        if self.state.opacity > 0.0 && self.fading.is_none() {
            self.fading = Some(Duration::ZERO);
        }
    }

    /// Advance the fade. Returns the new state when the opacity changed.
    pub fn advance(&mut self, dt: Duration) -> Option<ScrollIndicatorState> {
        let elapsed = self.fading.as_mut()?;
        *elapsed += dt;
        let opacity = if self.fade_out.is_zero() || *elapsed >= self.fade_out {
            0.0
        } else {
            1.0 - elapsed.as_secs_f32() / self.fade_out.as_secs_f32()
        };
        if opacity <= 0.0 {
            self.fading = None;
        }
        self.state.opacity = opacity.max(0.0);
        Some(self.state)
    }
}
