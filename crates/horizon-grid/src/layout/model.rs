//! The layout model: structural mutation and queries.

use horizon_grid_core::Rect;
use horizon_grid_core::logging::targets;

use super::{Cell, CellRef, Column, ColumnRef, GridItem, Group, GroupTitle, ItemRef};
use crate::bridge::ViewHandle;
use crate::config::GridConfig;

/// Gaps and title band thickness used by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutSpacing {
    /// Gap between consecutive columns of a group.
    pub column: f32,
    /// Gap between consecutive cells of a column.
    pub row: f32,
    /// Gap between consecutive groups.
    pub group: f32,
    /// Thickness of the group title band.
    pub title_size: f32,
    /// Gap between the title band and the first row.
    pub title_spacing: f32,
}

impl LayoutSpacing {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            column: config.column_spacing,
            row: config.row_spacing,
            group: config.group_spacing,
            title_size: config.title_size,
            title_spacing: config.title_spacing,
        }
    }

    /// Cross-axis position of the first row.
    #[inline]
    pub fn title_extent(&self) -> f32 {
        if self.title_size > 0.0 {
            self.title_size + self.title_spacing
        } else {
            0.0
        }
    }
}

/// In-memory structure of the grid.
///
/// Operations addressed by an out-of-range group, column or cell index are
/// logged and ignored.
///
/// # Example
///
/// ```
/// use horizon_grid::layout::{LayoutModel, LayoutSpacing};
///
/// let mut layout = LayoutModel::new(LayoutSpacing::default());
/// layout.add_group(1);
/// layout.add_regular_grid(3, 2, 100.0, 50.0, 0);
///
/// let group = layout.group(0).unwrap();
/// assert_eq!(group.real_cell_count, 6);
/// assert_eq!(group.columns[1].items().collect::<Vec<_>>(), vec![2, 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutModel {
    spacing: LayoutSpacing,
    groups: Vec<Group>,
}

impl LayoutModel {
    pub fn new(spacing: LayoutSpacing) -> Self {
        Self {
            spacing,
            groups: Vec::new(),
        }
    }

    #[inline]
    pub fn spacing(&self) -> LayoutSpacing {
        self.spacing
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    /// Append `count` empty groups. Returns the index of the first new group.
    pub fn add_group(&mut self, count: usize) -> usize {
        let first = self.groups.len();
        for _ in 0..count {
            let start = self
                .groups
                .last()
                .map_or(0.0, |g| g.end_pos + self.spacing.group);
            let index = self.groups.len();
            self.groups.push(Group::new(index, start));
        }
        tracing::debug!(target: targets::LAYOUT, count, total = self.groups.len(), "added groups");
        first
    }

    /// Append a column of thickness `width` to a group.
    ///
    /// Every later group moves by the added span. Returns the new column index.
    pub fn add_column(&mut self, width: f32, group: usize) -> Option<usize> {
        let column_gap = self.spacing.column;
        let Some(g) = self.groups.get_mut(group) else {
            tracing::warn!(target: targets::LAYOUT, group, "add_column: invalid group index");
            return None;
        };

        let (start, added) = match g.columns.last() {
            Some(last) => (last.end_pos + column_gap, column_gap + width),
            None => (g.start_pos, width),
        };
        let index = g.columns.len();
        g.columns.push(Column {
            index,
            group,
            space: width,
            start_pos: start,
            end_pos: start + width,
            first_item: None,
            last_item: None,
            cells: Vec::new(),
        });
        g.end_pos += added;
        if let Some(title) = &mut g.title {
            title.rect.size.width = g.end_pos - g.start_pos;
        }

        self.shift_groups_from(group + 1, added);
        Some(index)
    }

    /// Append a cell of `height` to a column.
    ///
    /// The cell's item index continues from the previous cell of the column,
    /// or from the last item of an earlier column. Returns the item index.
    pub fn add_row_to_column(&mut self, column: usize, height: f32, group: usize) -> Option<usize> {
        let spacing = self.spacing;
        let Some(g) = self.groups.get_mut(group) else {
            tracing::warn!(target: targets::LAYOUT, group, "add_row_to_column: invalid group index");
            return None;
        };
        if column >= g.columns.len() {
            tracing::warn!(
                target: targets::LAYOUT,
                group,
                column,
                "add_row_to_column: invalid column index"
            );
            return None;
        }

        let item = match g.columns[column].cells.last() {
            Some(prev) => prev.item + 1,
            None => g.columns[..column]
                .iter()
                .rev()
                .find_map(|c| c.last_item)
                .map_or(0, |last| last + 1),
        };
        if item != g.item_cells.len() {
            tracing::warn!(
                target: targets::LAYOUT,
                group,
                column,
                item,
                "add_row_to_column: rows must be appended in column-major order"
            );
            return None;
        }

        let slot = g.real_cell_count;
        let col = &mut g.columns[column];
        let y = col
            .cells
            .last()
            .map_or(spacing.title_extent(), |prev| prev.rect.bottom() + spacing.row);
        let row = col.cells.len();
        col.cells.push(Cell {
            column,
            row,
            slot,
            item,
            rect: Rect::new(col.start_pos, y, col.space, height),
        });
        col.first_item.get_or_insert(item);
        col.last_item = Some(item);

        g.item_cells.push(CellRef::new(column, row));
        g.real_cell_count += 1;
        g.last_filled_column = Some(g.last_filled_column.map_or(column, |c| c.max(column)));
        Some(item)
    }

    /// Append `columns` columns of `rows` equally sized cells to a group.
    ///
    /// Returns the number of cells added.
    pub fn add_regular_grid(
        &mut self,
        columns: usize,
        rows: usize,
        column_width: f32,
        row_height: f32,
        group: usize,
    ) -> usize {
        let mut added = 0;
        for _ in 0..columns {
            let Some(column) = self.add_column(column_width, group) else {
                return added;
            };
            for _ in 0..rows {
                if self.add_row_to_column(column, row_height, group).is_some() {
                    added += 1;
                }
            }
        }
        added
    }

    /// Grow or shrink the group list to `count` groups.
    ///
    /// Returns the removed groups so the caller can release their views.
    pub fn reset_groups(&mut self, count: usize) -> Vec<Group> {
        let len = self.groups.len();
        if count >= len {
            self.add_group(count - len);
            Vec::new()
        } else {
            self.remove_groups(count, len - count)
        }
    }

    /// Remove `count` groups starting at `from`.
    ///
    /// Following groups are re-indexed and move back by the freed span.
    pub fn remove_groups(&mut self, from: usize, count: usize) -> Vec<Group> {
        if from >= self.groups.len() {
            if count > 0 {
                tracing::warn!(target: targets::LAYOUT, from, count, "remove_groups: invalid group index");
            }
            return Vec::new();
        }
        let end = from.saturating_add(count).min(self.groups.len());
        let removed: Vec<Group> = self.groups.drain(from..end).collect();

        for (index, group) in self.groups.iter_mut().enumerate().skip(from) {
            group.set_index(index);
        }
        if let Some(first) = self.groups.get(from) {
            let start = self.following_start(from);
            let delta = start - first.start_pos;
            self.shift_groups_from(from, delta);
        }

        tracing::debug!(target: targets::LAYOUT, from, removed = removed.len(), "removed groups");
        removed
    }

    /// Remove every group.
    pub fn clear(&mut self) -> Vec<Group> {
        std::mem::take(&mut self.groups)
    }

    /// Drop a group's columns and cells, keeping its items and title.
    pub fn clear_group_columns(&mut self, group: usize) -> bool {
        let Some(g) = self.groups.get_mut(group) else {
            tracing::warn!(target: targets::LAYOUT, group, "clear_group_columns: invalid group index");
            return false;
        };
        let freed = g.end_pos - g.start_pos;
        g.columns.clear();
        g.item_cells.clear();
        g.real_cell_count = 0;
        g.last_filled_column = None;
        g.end_pos = g.start_pos;
        if let Some(title) = &mut g.title {
            title.rect.size.width = 0.0;
        }
        self.shift_groups_from(group + 1, -freed);
        true
    }

    /// Set or clear a group's title band. Returns the previous title view.
    pub fn set_group_title(&mut self, group: usize, view: Option<ViewHandle>) -> Option<ViewHandle> {
        let title_size = self.spacing.title_size;
        let Some(g) = self.groups.get_mut(group) else {
            tracing::warn!(target: targets::LAYOUT, group, "set_group_title: invalid group index");
            return None;
        };
        let previous = g.title.take().and_then(|t| t.view);
        if title_size > 0.0 {
            g.title = Some(GroupTitle {
                view,
                rect: Rect::new(g.start_pos, 0.0, g.end_pos - g.start_pos, title_size),
            });
        }
        previous
    }

    /// Resize a group's item list to `count` (capped at its cell count) and
    /// sync every item rectangle from its cell.
    ///
    /// Returns the items dropped from the end of the list.
    pub fn populate_items(&mut self, group: usize, count: usize) -> Vec<GridItem> {
        let Some(g) = self.groups.get_mut(group) else {
            tracing::warn!(target: targets::LAYOUT, group, "populate_items: invalid group index");
            return Vec::new();
        };
        let target = count.min(g.real_cell_count);
        let removed = if g.items.len() > target {
            g.items.split_off(target)
        } else {
            Vec::new()
        };
        while g.items.len() < target {
            let item = g.items.len();
            g.items.push(GridItem::new(group, item, Rect::ZERO));
        }
        for index in 0..g.items.len() {
            let rect = g.cell_for_item(index).map_or(Rect::ZERO, |cell| cell.rect);
            g.items[index].rect = rect;
        }
        removed
    }

    /// Remove `count` items starting at `from` and renumber the rest.
    ///
    /// The caller relayouts the group afterwards.
    pub fn remove_items(&mut self, group: usize, from: usize, count: usize) -> Vec<GridItem> {
        let Some(g) = self.groups.get_mut(group) else {
            tracing::warn!(target: targets::LAYOUT, group, "remove_items: invalid group index");
            return Vec::new();
        };
        if from >= g.items.len() {
            return Vec::new();
        }
        let end = from.saturating_add(count).min(g.items.len());
        let removed: Vec<GridItem> = g.items.drain(from..end).collect();
        for (index, item) in g.items.iter_mut().enumerate().skip(from) {
            item.item = index;
        }
        removed
    }

    /// Insert an item record at `at` and renumber the rest.
    pub fn insert_item(&mut self, group: usize, at: usize) -> bool {
        let Some(g) = self.groups.get_mut(group) else {
            tracing::warn!(target: targets::LAYOUT, group, "insert_item: invalid group index");
            return false;
        };
        let at = at.min(g.items.len());
        g.items.insert(at, GridItem::new(group, at, Rect::ZERO));
        for (index, item) in g.items.iter_mut().enumerate().skip(at + 1) {
            item.item = index;
        }
        true
    }

    fn following_start(&self, group: usize) -> f32 {
        match group.checked_sub(1).and_then(|prev| self.groups.get(prev)) {
            Some(prev) => prev.end_pos + self.spacing.group,
            None => 0.0,
        }
    }

    fn shift_groups_from(&mut self, from: usize, delta: f32) {
        if delta == 0.0 {
            return;
        }
        for group in self.groups.iter_mut().skip(from) {
            group.shift(delta);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn group(&self, group: usize) -> Option<&Group> {
        self.groups.get(group)
    }

    #[inline]
    pub fn group_mut(&mut self, group: usize) -> Option<&mut Group> {
        self.groups.get_mut(group)
    }

    pub fn column(&self, at: ColumnRef) -> Option<&Column> {
        self.groups.get(at.group)?.columns.get(at.column)
    }

    pub fn item(&self, at: ItemRef) -> Option<&GridItem> {
        self.groups.get(at.group)?.items.get(at.item)
    }

    pub fn item_mut(&mut self, at: ItemRef) -> Option<&mut GridItem> {
        self.groups.get_mut(at.group)?.items.get_mut(at.item)
    }

    /// The cell bound to an item.
    pub fn cell_for_item(&self, at: ItemRef) -> Option<&Cell> {
        self.groups.get(at.group)?.cell_for_item(at.item)
    }

    /// The column holding an item.
    pub fn column_ref_for_item(&self, at: ItemRef) -> Option<ColumnRef> {
        let cell = self.groups.get(at.group)?.cell_ref(at.item)?;
        Some(ColumnRef::new(at.group, cell.column))
    }

    /// True when the item has both a record and a cell.
    pub fn contains_item(&self, at: ItemRef) -> bool {
        self.groups
            .get(at.group)
            .is_some_and(|g| at.item < g.items.len() && at.item < g.real_cell_count)
    }

    /// The column after `at`, continuing into the next non-empty group.
    pub fn next_column(&self, at: ColumnRef) -> Option<ColumnRef> {
        let group = self.groups.get(at.group)?;
        if at.column + 1 < group.columns.len() {
            return Some(ColumnRef::new(at.group, at.column + 1));
        }
        self.groups
            .iter()
            .skip(at.group + 1)
            .find(|g| !g.columns.is_empty())
            .map(|g| ColumnRef::new(g.index, 0))
    }

    /// The column before `at`, continuing into the previous non-empty group.
    pub fn prev_column(&self, at: ColumnRef) -> Option<ColumnRef> {
        if at.column > 0 && at.column <= self.groups.get(at.group)?.columns.len() {
            return Some(ColumnRef::new(at.group, at.column - 1));
        }
        self.groups[..at.group.min(self.groups.len())]
            .iter()
            .rev()
            .find(|g| !g.columns.is_empty())
            .map(|g| ColumnRef::new(g.index, g.columns.len() - 1))
    }

    /// First column of the grid.
    pub fn first_column(&self) -> Option<ColumnRef> {
        self.groups
            .iter()
            .find(|g| !g.columns.is_empty())
            .map(|g| ColumnRef::new(g.index, 0))
    }

    /// Last column of the grid.
    pub fn last_column(&self) -> Option<ColumnRef> {
        self.groups
            .iter()
            .rev()
            .find(|g| !g.columns.is_empty())
            .map(|g| ColumnRef::new(g.index, g.columns.len() - 1))
    }

    /// Total number of columns across all groups.
    pub fn column_count(&self) -> usize {
        self.groups.iter().map(|g| g.columns.len()).sum()
    }

    /// Length of the content along the main axis.
    pub fn content_extent(&self) -> f32 {
        self.groups.last().map_or(0.0, |g| g.end_pos)
    }

    /// Items with a record in the columns `start..=end`, in column-major order.
    pub fn items_in_columns(&self, start: ColumnRef, end: ColumnRef) -> Vec<ItemRef> {
        let mut out = Vec::new();
        let mut cursor = Some(start);
        while let Some(at) = cursor {
            if at > end {
                break;
            }
            if let Some(group) = self.groups.get(at.group)
                && let Some(column) = group.columns.get(at.column)
            {
                out.extend(
                    column
                        .items()
                        .filter(|&item| item < group.items.len())
                        .map(|item| ItemRef::new(at.group, item)),
                );
            }
            cursor = self.next_column(at);
        }
        out
    }
}
