//! Directional focus search.
//!
//! Directions arrive already mapped to the canonical orientation: Up/Down
//! move within a column, Left/Right cross columns (and groups).

use horizon_grid_core::logging::targets;

use crate::events::Direction;
use crate::layout::{Cell, Column, ColumnRef, ItemRef, LayoutModel};

/// Remembered reference coordinate for straight-path navigation.
///
/// Only the cross axis needs one: a move within a column has a single
/// candidate per step. Cleared by in-column moves and data changes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReferenceLines {
    /// Cross-axis line kept while moving across columns.
    pub cross: Option<f32>,
}

impl ReferenceLines {
    pub fn reset(&mut self) {
        self.cross = None;
    }
}

/// Edge and path behavior of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationOptions {
    pub left_circular: bool,
    pub right_circular: bool,
    pub straight_path: bool,
}

/// Computes focus destinations over a layout.
///
/// `enabled` reports whether an item can take focus.
pub struct FocusNavigator<'a, F> {
    layout: &'a LayoutModel,
    enabled: F,
    options: NavigationOptions,
}

impl<'a, F> FocusNavigator<'a, F>
where
    F: Fn(ItemRef) -> bool,
{
    pub fn new(layout: &'a LayoutModel, enabled: F, options: NavigationOptions) -> Self {
        Self {
            layout,
            enabled,
            options,
        }
    }

    /// Destination of a move from `from`, or `None` when the move has no
    /// effect.
    pub fn find(
        &self,
        from: ItemRef,
        direction: Direction,
        lines: &mut ReferenceLines,
    ) -> Option<ItemRef> {
        if self.layout.cell_for_item(from).is_none() {
            tracing::warn!(target: targets::NAVIGATION, ?from, "move from an item without a cell");
            return None;
        }
        let destination = match direction {
            Direction::Up | Direction::Down => self.find_in_column(from, direction, lines),
            Direction::Left | Direction::Right => self.find_across_columns(from, direction, lines),
        };
        tracing::trace!(target: targets::NAVIGATION, ?from, ?direction, ?destination, "focus search");
        destination
    }

    /// The enabled item of a column nearest to `line` on the cross axis.
    pub fn nearest_in_column(&self, at: ColumnRef, line: f32) -> Option<ItemRef> {
        let column = self.layout.column(at)?;
        self.nearest(column, at.group, line, true)
    }

    fn in_range(&self, group: usize, cell: &Cell) -> bool {
        self.layout.contains_item(ItemRef::new(group, cell.item))
    }

    fn is_enabled(&self, at: ItemRef) -> bool {
        (self.enabled)(at)
    }

    fn find_in_column(
        &self,
        from: ItemRef,
        direction: Direction,
        lines: &mut ReferenceLines,
    ) -> Option<ItemRef> {
        let group = self.layout.group(from.group)?;
        let mut origin = from;
        // Every cell of the group is visited at most once.
        for _ in 0..group.real_cell_count.max(1) {
            let at = group.cell_ref(origin.item)?;
            let column = group.columns.get(at.column)?;

            let next = match direction {
                Direction::Down => column
                    .cell(at.row + 1)
                    .filter(|cell| self.in_range(from.group, cell))
                    .or_else(|| {
                        // A ragged last column continues in the previous column.
                        let is_last = origin.item + 1 == group.items.len();
                        let prev = at.column.checked_sub(1)?;
                        group.columns[prev]
                            .cell(at.row + 1)
                            .filter(|cell| is_last && self.in_range(from.group, cell))
                    }),
                _ => at.row.checked_sub(1).and_then(|row| column.cell(row)),
            }?;

            let candidate = ItemRef::new(from.group, next.item);
            if self.is_enabled(candidate) {
                if self.options.straight_path {
                    lines.cross = None;
                }
                return Some(candidate);
            }
            origin = candidate;
        }
        None
    }

    fn find_across_columns(
        &self,
        from: ItemRef,
        direction: Direction,
        lines: &mut ReferenceLines,
    ) -> Option<ItemRef> {
        let focused = self.layout.cell_for_item(from)?;
        let line = if self.options.straight_path {
            *lines.cross.get_or_insert(focused.cross_center())
        } else {
            focused.cross_center()
        };

        let mut origin = self.layout.column_ref_for_item(from)?;
        let mut origin_line = line;
        // Bounded so columns of disabled items cannot loop under wrap-around.
        for _ in 0..self.layout.column_count() {
            let target = match direction {
                Direction::Right => self.layout.next_column(origin),
                _ => self.layout.prev_column(origin),
            };
            let Some(target) = target else {
                return self.wrap(direction);
            };
            let column = self.layout.column(target)?;

            if let Some(found) = self.nearest(column, target.group, origin_line, true) {
                return Some(found);
            }
            // Skip through a column without an enabled item.
            if !self.options.straight_path
                && let Some(disabled) = self.nearest(column, target.group, origin_line, false)
                && let Some(cell) = self.layout.cell_for_item(disabled)
            {
                origin_line = cell.cross_center();
            }
            origin = target;
        }
        tracing::debug!(target: targets::NAVIGATION, ?from, ?direction, "no enabled item found");
        None
    }

    /// Wrap to the far end of the grid when the edge is circular.
    fn wrap(&self, direction: Direction) -> Option<ItemRef> {
        let circular = match direction {
            Direction::Right => self.options.right_circular,
            _ => self.options.left_circular,
        };
        if !circular {
            return None;
        }
        let mut items = self.layout.groups().iter().flat_map(|g| {
            (0..g.items.len().min(g.real_cell_count)).map(move |item| ItemRef::new(g.index, item))
        });
        let found = match direction {
            Direction::Right => items.find(|&at| self.is_enabled(at)),
            _ => items.rev().find(|&at| self.is_enabled(at)),
        };
        tracing::trace!(target: targets::NAVIGATION, ?direction, ?found, "wrapped");
        found
    }

    /// Nearest in-range cell by cross-axis distance; the first exact match wins.
    fn nearest(&self, column: &Column, group: usize, line: f32, enabled: bool) -> Option<ItemRef> {
        let mut best: Option<(f32, usize)> = None;
        for cell in &column.cells {
            if !self.in_range(group, cell) {
                continue;
            }
            if self.is_enabled(ItemRef::new(group, cell.item)) != enabled {
                continue;
            }
            let distance = (cell.cross_center() - line).abs();
            if distance == 0.0 {
                return Some(ItemRef::new(group, cell.item));
            }
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, cell.item));
            }
        }
        best.map(|(_, item)| ItemRef::new(group, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutSpacing;

    fn grid(groups: &[(usize, usize)]) -> LayoutModel {
        let mut layout = LayoutModel::new(LayoutSpacing {
            column: 10.0,
            row: 10.0,
            group: 50.0,
            ..LayoutSpacing::default()
        });
        layout.add_group(groups.len());
        for (g, &(count, rows)) in groups.iter().enumerate() {
            let full = count / rows;
            layout.add_regular_grid(full, rows, 100.0, 50.0, g);
            if count % rows > 0 {
                let column = layout.add_column(100.0, g).unwrap();
                for _ in 0..count % rows {
                    layout.add_row_to_column(column, 50.0, g);
                }
            }
            layout.populate_items(g, count);
        }
        layout
    }

    fn all_enabled(_: ItemRef) -> bool {
        true
    }

    fn it(group: usize, item: usize) -> ItemRef {
        ItemRef::new(group, item)
    }

    #[test]
    fn test_up_down_within_column() {
        let layout = grid(&[(6, 3)]);
        let nav = FocusNavigator::new(&layout, all_enabled, NavigationOptions::default());
        let mut lines = ReferenceLines::default();

        assert_eq!(nav.find(it(0, 0), Direction::Down, &mut lines), Some(it(0, 1)));
        assert_eq!(nav.find(it(0, 4), Direction::Up, &mut lines), Some(it(0, 3)));
        assert_eq!(nav.find(it(0, 2), Direction::Down, &mut lines), None);
    }

    #[test]
    fn test_up_at_first_row_is_idempotent_edge() {
        let layout = grid(&[(6, 2)]);
        let nav = FocusNavigator::new(&layout, all_enabled, NavigationOptions::default());
        let mut lines = ReferenceLines::default();
        for _ in 0..3 {
            assert_eq!(nav.find(it(0, 0), Direction::Up, &mut lines), None);
        }
    }

    #[test]
    fn test_down_from_ragged_last_item_steps_back_a_column() {
        // Columns {0,1,2} {3,4,5} {6}.
        let layout = grid(&[(7, 3)]);
        let nav = FocusNavigator::new(&layout, all_enabled, NavigationOptions::default());
        let mut lines = ReferenceLines::default();
        assert_eq!(nav.find(it(0, 6), Direction::Down, &mut lines), Some(it(0, 4)));
        // Not the last item: plain column edge.
        assert_eq!(nav.find(it(0, 5), Direction::Down, &mut lines), None);
    }

    #[test]
    fn test_right_picks_nearest_row() {
        let layout = grid(&[(6, 2)]);
        let nav = FocusNavigator::new(&layout, all_enabled, NavigationOptions::default());
        let mut lines = ReferenceLines::default();
        assert_eq!(nav.find(it(0, 1), Direction::Right, &mut lines), Some(it(0, 3)));
        assert_eq!(nav.find(it(0, 3), Direction::Left, &mut lines), Some(it(0, 1)));
    }

    #[test]
    fn test_right_into_ragged_column_takes_nearest() {
        let layout = grid(&[(7, 3)]);
        let nav = FocusNavigator::new(&layout, all_enabled, NavigationOptions::default());
        let mut lines = ReferenceLines::default();
        assert_eq!(nav.find(it(0, 5), Direction::Right, &mut lines), Some(it(0, 6)));
    }

    #[test]
    fn test_crossing_groups() {
        let layout = grid(&[(4, 2), (4, 2)]);
        let nav = FocusNavigator::new(&layout, all_enabled, NavigationOptions::default());
        let mut lines = ReferenceLines::default();
        assert_eq!(nav.find(it(0, 3), Direction::Right, &mut lines), Some(it(1, 1)));
        assert_eq!(nav.find(it(1, 0), Direction::Left, &mut lines), Some(it(0, 2)));
        assert_eq!(nav.find(it(1, 3), Direction::Right, &mut lines), None);
    }

    #[test]
    fn test_disabled_item_is_skipped() {
        let layout = grid(&[(3, 1)]);
        let nav = FocusNavigator::new(&layout, |at: ItemRef| at.item != 1, NavigationOptions::default());
        let mut lines = ReferenceLines::default();
        assert_eq!(nav.find(it(0, 0), Direction::Right, &mut lines), Some(it(0, 2)));
        assert_eq!(nav.find(it(0, 2), Direction::Left, &mut lines), Some(it(0, 0)));
    }

    #[test]
    fn test_disabled_skip_within_column() {
        let layout = grid(&[(3, 3)]);
        let nav = FocusNavigator::new(&layout, |at: ItemRef| at.item != 1, NavigationOptions::default());
        let mut lines = ReferenceLines::default();
        assert_eq!(nav.find(it(0, 0), Direction::Down, &mut lines), Some(it(0, 2)));
    }

    #[test]
    fn test_right_circular_wraps_to_first_enabled() {
        let layout = grid(&[(4, 2), (3, 2)]);
        let options = NavigationOptions {
            right_circular: true,
            ..NavigationOptions::default()
        };
        let nav = FocusNavigator::new(&layout, |at: ItemRef| at != it(0, 0), options);
        let mut lines = ReferenceLines::default();
        assert_eq!(nav.find(it(1, 2), Direction::Right, &mut lines), Some(it(0, 1)));
        // Left edge is not circular.
        assert_eq!(nav.find(it(0, 1), Direction::Left, &mut lines), None);
    }

    #[test]
    fn test_all_disabled_wrap_terminates() {
        let layout = grid(&[(4, 1)]);
        let options = NavigationOptions {
            left_circular: true,
            right_circular: true,
            straight_path: false,
        };
        let nav = FocusNavigator::new(&layout, |at: ItemRef| at.item == 0, options);
        let mut lines = ReferenceLines::default();
        // The only enabled item is the origin itself.
        assert_eq!(nav.find(it(0, 0), Direction::Right, &mut lines), Some(it(0, 0)));

        let nav = FocusNavigator::new(&layout, |_: ItemRef| false, options);
        assert_eq!(nav.find(it(0, 0), Direction::Right, &mut lines), None);
    }

    #[test]
    fn test_straight_path_keeps_reference_line() {
        // Column 1 has a single tall cell, so centers drift without a fixed line.
        let mut layout = LayoutModel::new(LayoutSpacing::default());
        layout.add_group(1);
        layout.add_column(100.0, 0);
        layout.add_row_to_column(0, 50.0, 0);
        layout.add_row_to_column(0, 50.0, 0);
        layout.add_column(100.0, 0);
        layout.add_row_to_column(1, 100.0, 0);
        layout.add_column(100.0, 0);
        layout.add_row_to_column(2, 50.0, 0);
        layout.add_row_to_column(2, 50.0, 0);
        layout.populate_items(0, 5);

        let direct = FocusNavigator::new(&layout, all_enabled, NavigationOptions::default());
        let mut lines = ReferenceLines::default();
        let mid = direct.find(it(0, 1), Direction::Right, &mut lines).unwrap();
        assert_eq!(mid, it(0, 2));
        // Re-centered on the tall cell (y = 50): tie between rows, first wins.
        assert_eq!(direct.find(mid, Direction::Right, &mut lines), Some(it(0, 3)));

        let options = NavigationOptions {
            straight_path: true,
            ..NavigationOptions::default()
        };
        let straight = FocusNavigator::new(&layout, all_enabled, options);
        let mut lines = ReferenceLines::default();
        let mid = straight.find(it(0, 1), Direction::Right, &mut lines).unwrap();
        assert_eq!(lines.cross, Some(75.0));
        assert_eq!(straight.find(mid, Direction::Right, &mut lines), Some(it(0, 4)));
        assert_eq!(lines.cross, Some(75.0));

        // Moving within a column drops the line.
        assert_eq!(straight.find(it(0, 4), Direction::Up, &mut lines), Some(it(0, 3)));
        assert_eq!(lines.cross, None);

        lines.cross = Some(75.0);
        lines.reset();
        assert_eq!(lines, ReferenceLines::default());
    }
}
