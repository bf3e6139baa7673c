//! Structural bookkeeping for the grid.
//!
//! The layout is a flat arena: a `Vec` of [`Group`]s, each owning its
//! [`Column`]s, each owning its [`Cell`]s. Everything is addressed by integer
//! coordinates; each group also keeps an item-index → [`CellRef`] table.
//!
//! All positions live in canonical layout space: the scroll ("main") axis is
//! X and the lane ("cross") axis is Y. The widget maps rectangles to physical
//! space through [`Orientation`](horizon_grid_core::Orientation).
//!
//! ```text
//!   main axis (scroll) ──────────────────────────────────────────>
//!  ┌───────── group 0 ─────────┐ gap ┌──────── group 1 ────────┐
//!  │ title band                │     │ title band              │
//!  │ ┌──────┐ ┌──────┐ ┌──────┐│     │┌──────┐ ┌──────┐        │
//!  │ │  0   │ │  2   │ │  4   ││     ││  0   │ │  2   │        │
//!  │ └──────┘ └──────┘ └──────┘│     │└──────┘ └──────┘        │
//!  │ ┌──────┐ ┌──────┐         │     │┌──────┐                 │
//!  │ │  1   │ │  3   │         │     ││  1   │                 │
//!  │ └──────┘ └──────┘         │     │└──────┘                 │
//!  └───────────────────────────┘     └─────────────────────────┘
//! ```

mod debug;
mod group;
mod model;

pub use debug::{LayoutTreeDebug, TreeStyle};
pub use group::{Cell, Column, GridItem, Group, GroupTitle};
pub use model::{LayoutModel, LayoutSpacing};

/// Address of a logical item: group index plus item index within the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemRef {
    pub group: usize,
    pub item: usize,
}

impl ItemRef {
    #[inline]
    pub const fn new(group: usize, item: usize) -> Self {
        Self { group, item }
    }
}

/// Address of a column: group index plus column index within the group.
///
/// Ordering follows the main axis: groups first, then columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnRef {
    pub group: usize,
    pub column: usize,
}

impl ColumnRef {
    #[inline]
    pub const fn new(group: usize, column: usize) -> Self {
        Self { group, column }
    }
}

/// Address of a cell inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
}

impl CellRef {
    #[inline]
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}
