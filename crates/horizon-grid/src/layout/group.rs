//! Group, column, cell and item records.

use horizon_grid_core::{Rect, Span};

use super::CellRef;
use crate::animation::Tween;
use crate::bridge::ViewHandle;

/// One addressable slot inside a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Column index within the group.
    pub column: usize,
    /// Row index within the column.
    pub row: usize,
    /// Running slot index within the group.
    pub slot: usize,
    /// Logical item index bound to this cell.
    pub item: usize,
    /// Cell rectangle in layout space.
    pub rect: Rect,
}

impl Cell {
    /// Center of the cell on the cross axis.
    #[inline]
    pub fn cross_center(&self) -> f32 {
        self.rect.center().y
    }
}

/// A lane perpendicular to the scroll axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub index: usize,
    /// Owning group index.
    pub group: usize,
    /// Lane thickness along the main axis.
    pub space: f32,
    pub start_pos: f32,
    pub end_pos: f32,
    pub first_item: Option<usize>,
    pub last_item: Option<usize>,
    pub cells: Vec<Cell>,
}

impl Column {
    /// The column's extent along the main axis.
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start_pos, self.end_pos)
    }

    #[inline]
    pub fn cell(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }

    /// True when no cell is bound to an item yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Item indices covered by this column.
    pub fn items(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().map(|cell| cell.item)
    }

    pub(crate) fn shift(&mut self, delta: f32) {
        self.start_pos += delta;
        self.end_pos += delta;
        for cell in &mut self.cells {
            cell.rect = cell.rect.translated(delta, 0.0);
        }
    }
}

/// A group title band.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTitle {
    /// View supplied by the bridge, if any.
    pub view: Option<ViewHandle>,
    /// Title rectangle in layout space.
    pub rect: Rect,
}

/// The live or virtual representation of one logical item.
///
/// Items persist across load/unload; only `view` comes and goes.
#[derive(Debug, Clone)]
pub struct GridItem {
    pub group: usize,
    pub item: usize,
    /// Rectangle derived from the bound cell.
    pub rect: Rect,
    /// Attached view while the item is inside the loaded range.
    pub view: Option<ViewHandle>,
    /// Current focus scale.
    pub scale: f32,
    /// In-progress focus scale animation.
    pub scale_animation: Option<Tween>,
}

impl GridItem {
    pub fn new(group: usize, item: usize, rect: Rect) -> Self {
        Self {
            group,
            item,
            rect,
            view: None,
            scale: 1.0,
            scale_animation: None,
        }
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.view.is_some()
    }
}

/// An ordered partition of the grid along the scroll axis.
#[derive(Debug, Clone)]
pub struct Group {
    pub index: usize,
    pub start_pos: f32,
    pub end_pos: f32,
    pub columns: Vec<Column>,
    /// Resolved items, indexed by item index.
    pub items: Vec<GridItem>,
    /// Item index → cell coordinate.
    pub(crate) item_cells: Vec<CellRef>,
    /// Number of cells bound to an item.
    pub real_cell_count: usize,
    /// Last column holding at least one cell.
    pub last_filled_column: Option<usize>,
    pub title: Option<GroupTitle>,
}

impl Group {
    pub(crate) fn new(index: usize, start_pos: f32) -> Self {
        Self {
            index,
            start_pos,
            end_pos: start_pos,
            columns: Vec::new(),
            items: Vec::new(),
            item_cells: Vec::new(),
            real_cell_count: 0,
            last_filled_column: None,
            title: None,
        }
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start_pos, self.end_pos)
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Cell coordinate of an item.
    #[inline]
    pub fn cell_ref(&self, item: usize) -> Option<CellRef> {
        self.item_cells.get(item).copied()
    }

    /// The cell bound to an item.
    pub fn cell_for_item(&self, item: usize) -> Option<&Cell> {
        let at = self.cell_ref(item)?;
        self.columns.get(at.column)?.cells.get(at.row)
    }

    /// Items that currently hold a view.
    pub fn loaded_items(&self) -> impl Iterator<Item = &GridItem> + '_ {
        self.items.iter().filter(|item| item.is_loaded())
    }

    pub(crate) fn shift(&mut self, delta: f32) {
        self.start_pos += delta;
        self.end_pos += delta;
        for column in &mut self.columns {
            column.shift(delta);
        }
        for item in &mut self.items {
            item.rect = item.rect.translated(delta, 0.0);
        }
        if let Some(title) = &mut self.title {
            title.rect = title.rect.translated(delta, 0.0);
        }
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
        for column in &mut self.columns {
            column.group = index;
        }
        for item in &mut self.items {
            item.group = index;
        }
    }
}
