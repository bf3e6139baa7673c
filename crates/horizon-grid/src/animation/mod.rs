//! Animation support for the grid.
//!
//! This module provides easing curves and the [`Tween`] primitive used for
//! the viewport scroll animation and for focus scale-up/scale-down.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_grid::animation::{Easing, Tween};
//!
//! let mut scroll = Tween::new(0.0, -300.0, Duration::from_millis(200), Easing::EaseOutCubic);
//! let step = scroll.advance(Duration::from_millis(16));
//! assert!(step.value < 0.0 && !step.finished);
//! ```

mod easing;
mod tween;

pub use easing::{Easing, ease, lerp_eased};
pub use tween::{Tween, TweenStep};
