//! Core systems for Horizon Grid.
//!
//! This crate provides the foundational pieces shared by the grid widget:
//!
//! - **Geometry**: points, sizes, rectangles, scroll-axis spans, margins and
//!   orientation mapping
//! - **Signals**: per-widget observer lists with connection ids
//! - **Errors**: [`GridError`] and the crate [`Result`] alias
//! - **Logging**: `tracing` target names and performance spans
//!
//! # Signal Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! let changed = Signal::<i32>::new();
//! let conn_id = changed.connect(|value| println!("Value changed to: {value}"));
//! changed.emit(42);
//! changed.disconnect(conn_id);
//! ```

mod error;
pub mod geometry;
pub mod logging;
pub mod signal;

pub use error::{GridError, Result};
pub use geometry::{Margins, Orientation, Point, Rect, Size, Span};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
