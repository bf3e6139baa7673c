//! Text dumps of the layout tree.
//!
//! ```
//! use horizon_grid::layout::{LayoutModel, LayoutSpacing, LayoutTreeDebug, TreeStyle};
//!
//! let mut layout = LayoutModel::new(LayoutSpacing::default());
//! layout.add_group(1);
//! layout.add_regular_grid(2, 1, 100.0, 50.0, 0);
//!
//! let text = LayoutTreeDebug::new().style(TreeStyle::Ascii).format(&layout);
//! assert!(text.starts_with("Layout (1 groups, 2 columns, 2 cells):"));
//! ```

use std::fmt::Write;

use super::{Group, LayoutModel};

/// Style of tree branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indentation only.
    Compact,
}

/// Renders a [`LayoutModel`] as an indented tree of groups, columns and cells.
#[derive(Debug, Clone)]
pub struct LayoutTreeDebug {
    style: TreeStyle,
    show_rects: bool,
    show_views: bool,
    max_depth: Option<usize>,
}

impl Default for LayoutTreeDebug {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTreeDebug {
    pub fn new() -> Self {
        Self {
            style: TreeStyle::default(),
            show_rects: false,
            show_views: true,
            max_depth: None,
        }
    }

    pub fn style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// Include layout rectangles on column and cell lines.
    pub fn show_rects(mut self, show: bool) -> Self {
        self.show_rects = show;
        self
    }

    /// Mark cells whose item holds a view.
    pub fn show_views(mut self, show: bool) -> Self {
        self.show_views = show;
        self
    }

    /// Stop after groups (0), columns (1) or cells (2).
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn format(&self, layout: &LayoutModel) -> String {
        let cells: usize = layout.groups().iter().map(|g| g.real_cell_count).sum();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Layout ({} groups, {} columns, {} cells):",
            layout.group_count(),
            layout.column_count(),
            cells
        );
        if layout.group_count() == 0 {
            out.push_str("  (empty)\n");
        }
        let count = layout.group_count();
        for (index, group) in layout.groups().iter().enumerate() {
            self.format_group(group, index + 1 == count, &mut out);
        }
        out
    }

    fn format_group(&self, group: &Group, is_last: bool, out: &mut String) {
        out.push_str(&self.prefix(&[], is_last));
        let _ = write!(
            out,
            "group {} [{:.1}..{:.1}] items={}",
            group.index,
            group.start_pos,
            group.end_pos,
            group.items.len()
        );
        if group.title.is_some() {
            out.push_str(" titled");
        }
        out.push('\n');
        if self.max_depth == Some(0) {
            return;
        }

        let columns = group.columns.len();
        for (c, column) in group.columns.iter().enumerate() {
            let column_last = c + 1 == columns;
            out.push_str(&self.prefix(&[is_last], column_last));
            let _ = write!(out, "column {}", column.index);
            if let (Some(first), Some(last)) = (column.first_item, column.last_item) {
                let _ = write!(out, " items {first}..={last}");
            }
            if self.show_rects {
                let _ = write!(out, " [{:.1}..{:.1}]", column.start_pos, column.end_pos);
            }
            out.push('\n');
            if self.max_depth == Some(1) {
                continue;
            }

            let rows = column.cells.len();
            for (r, cell) in column.cells.iter().enumerate() {
                out.push_str(&self.prefix(&[is_last, column_last], r + 1 == rows));
                let _ = write!(out, "cell {} -> item {}", cell.row, cell.item);
                if self.show_rects {
                    let r = cell.rect;
                    let _ = write!(
                        out,
                        " ({:.1}, {:.1}, {:.1}x{:.1})",
                        r.left(),
                        r.top(),
                        r.width(),
                        r.height()
                    );
                }
                if self.show_views
                    && let Some(view) = group.items.get(cell.item).and_then(|i| i.view)
                {
                    let _ = write!(out, " view#{}", view.id());
                }
                out.push('\n');
            }
        }
    }

    /// `ancestors` holds the "is last child" flag of each enclosing level.
    fn prefix(&self, ancestors: &[bool], is_last: bool) -> String {
        let (branch, tee, corner) = match self.style {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "- ", "- "),
        };

        let mut prefix = String::new();
        for &ancestor_last in ancestors {
            if ancestor_last || branch.is_empty() {
                prefix.push_str("    ");
            } else {
                prefix.push_str(branch);
                prefix.push_str("   ");
            }
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix
    }
}
