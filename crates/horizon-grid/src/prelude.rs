//! Prelude module for Horizon Grid.
//!
//! ```ignore
//! use horizon_grid::prelude::*;
//! ```
//!
//! This provides access to:
//! - The widget and its configuration (`GridView`, `GridConfig`)
//! - The data and presentation seams (`GridBridge`, `ViewHost`, `ViewHandle`)
//! - Input and output events (`Direction`, `GridEvent`, `DataChange`)
//! - Geometry types (`Point`, `Size`, `Rect`, `Margins`, `Orientation`)

// ============================================================================
// Widget
// ============================================================================

pub use crate::GridView;
pub use crate::config::{AnimationAttributes, GridConfig};

// ============================================================================
// Bridge and Host
// ============================================================================

pub use crate::bridge::{BridgeSignals, DataChange, GridBridge, ViewHandle, ViewHost};
pub use crate::indicator::ScrollIndicatorState;

// ============================================================================
// Events and Navigation
// ============================================================================

pub use crate::events::{Direction, GridEvent};
pub use crate::layout::{ColumnRef, ItemRef};

// ============================================================================
// Core
// ============================================================================

pub use crate::animation::Easing;
pub use horizon_grid_core::{
    ConnectionId, GridError, Margins, Orientation, Point, Rect, Result, Signal, Size,
};
