//! Horizon Grid - a virtualized grid widget navigated with directional input.
//!
//! Items are laid out in groups of columns along one scroll axis. Only the
//! items near the viewport hold views; the rest are recycled through a
//! per-type pool. Focus moves with arrow-key style input, skips disabled
//! items, optionally wraps at the grid's ends, and scrolls the viewport so
//! the focused item stays inside a focus-safe zone.
//!
//! The widget talks to two collaborators:
//!
//! - a [`GridBridge`] that owns the data and creates item views
//! - a [`ViewHost`] that places views on screen
//!
//! ```ignore
//! use horizon_grid::prelude::*;
//!
//! let mut grid = GridView::new(GridConfig::new(), bridge, host)?;
//! grid.set_viewport_size(Size::new(1280.0, 720.0));
//! grid.focus_gained();
//! grid.move_focus(Direction::Right);
//! grid.advance(Duration::from_millis(16));
//! ```

pub use horizon_grid_core::*;

pub mod animation;
pub mod bridge;
pub mod config;
pub mod events;
pub mod indicator;
pub mod layout;
pub mod navigation;
pub mod prelude;
pub mod recycler;
pub mod scroll;
pub mod virtualization;
mod view;

pub use bridge::{BridgeSignals, DataChange, GridBridge, ViewHandle, ViewHost};
pub use config::{AnimationAttributes, GridConfig};
pub use events::{Direction, GridEvent};
pub use indicator::ScrollIndicatorState;
pub use layout::{ColumnRef, ItemRef};
pub use view::GridView;
pub use virtualization::VisibleRange;
