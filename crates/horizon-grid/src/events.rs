//! Widget events and directional input.

use horizon_grid_core::Orientation;

use crate::layout::ItemRef;

/// A directional key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a physical direction into the canonical orientation, where
    /// Left/Right cross columns and Up/Down move within a column.
    pub fn to_canonical(self, orientation: Orientation) -> Direction {
        match orientation {
            Orientation::Horizontal => self,
            Orientation::Vertical => match self {
                Direction::Left => Direction::Up,
                Direction::Up => Direction::Left,
                Direction::Right => Direction::Down,
                Direction::Down => Direction::Right,
            },
        }
    }
}

/// Events emitted by a [`GridView`](crate::GridView).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// Focus moved from `from` (absent for the initial focus) to `to`.
    FocusChange { from: Option<ItemRef>, to: ItemRef },
}
