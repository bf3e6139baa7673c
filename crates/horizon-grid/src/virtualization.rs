//! On-screen range computation and view load/unload.
//!
//! The range search starts at an anchor column (normally the focused one)
//! and walks outward, so each recomputation touches the columns near the
//! viewport instead of rescanning the grid from its origin.

use std::collections::BTreeSet;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{GridError, Orientation, PerfSpan, Result, Span};

use crate::bridge::{GridBridge, ViewHost};
use crate::layout::{Column, ColumnRef, ItemRef, LayoutModel};
use crate::recycler::ViewRecycler;

/// The columns considered on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    /// First loaded column, including the preload buffer.
    pub start: ColumnRef,
    /// Last loaded column, including the preload buffer.
    pub end: ColumnRef,
    /// First item touching the viewport.
    pub first_visible: Option<ItemRef>,
    /// Last item touching the viewport.
    pub last_visible: Option<ItemRef>,
}

/// The main-axis span of layout space shown by the viewport.
///
/// `offset` is the translation applied to layout coordinates, so a grid
/// scrolled forward has a negative offset.
#[inline]
pub fn visible_span(offset: f32, viewport_extent: f32) -> Span {
    Span::new(-offset, viewport_extent - offset)
}

fn in_area(column: &Column, span: Span, all_in_area: bool) -> bool {
    if all_in_area {
        span.contains_span(&column.span())
    } else {
        span.overlaps(&column.span())
    }
}

fn column_center(column: &Column) -> f32 {
    (column.start_pos + column.end_pos) / 2.0
}

/// Find the first and last columns inside `span`.
///
/// With `all_in_area` a column must lie entirely inside the span; otherwise
/// any overlap counts. The search starts at `anchor` (or the first column)
/// and, if the anchor itself is outside, walks toward the span.
pub fn compute_range(
    layout: &LayoutModel,
    anchor: Option<ColumnRef>,
    span: Span,
    all_in_area: bool,
) -> Option<(ColumnRef, ColumnRef)> {
    if span.is_empty() {
        return None;
    }
    let anchor = anchor
        .filter(|&at| layout.column(at).is_some())
        .or_else(|| layout.first_column())?;

    // The walk keeps one direction; a column that reaches the span's
    // centre without qualifying means nothing further on does either.
    let span_center = (span.start + span.end) / 2.0;
    let forward = column_center(layout.column(anchor)?) < span_center;
    let mut found = anchor;
    loop {
        let column = layout.column(found)?;
        if in_area(column, span, all_in_area) {
            break;
        }
        let center = column_center(column);
        let beyond = if forward {
            center >= span_center
        } else {
            center <= span_center
        };
        if beyond {
            return None;
        }
        found = if forward {
            layout.next_column(found)
        } else {
            layout.prev_column(found)
        }?;
    }

    let mut start = found;
    while let Some(prev) = layout.prev_column(start) {
        match layout.column(prev) {
            Some(column) if in_area(column, span, all_in_area) => start = prev,
            _ => break,
        }
    }
    let mut end = found;
    while let Some(next) = layout.next_column(end) {
        match layout.column(next) {
            Some(column) if in_area(column, span, all_in_area) => end = next,
            _ => break,
        }
    }
    Some((start, end))
}

/// Widen a column range by `front` columns before and `back` after,
/// crossing group boundaries and clamping at the ends of the grid.
pub fn expand(
    layout: &LayoutModel,
    (start, end): (ColumnRef, ColumnRef),
    front: usize,
    back: usize,
) -> (ColumnRef, ColumnRef) {
    let mut start = start;
    for _ in 0..front {
        match layout.prev_column(start) {
            Some(prev) => start = prev,
            None => break,
        }
    }
    let mut end = end;
    for _ in 0..back {
        match layout.next_column(end) {
            Some(next) => end = next,
            None => break,
        }
    }
    (start, end)
}

/// Items to attach and detach after a range change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeDiff {
    pub load: Vec<ItemRef>,
    pub unload: Vec<ItemRef>,
}

impl RangeDiff {
    pub fn is_empty(&self) -> bool {
        self.load.is_empty() && self.unload.is_empty()
    }
}

/// Tracks the loaded range and the set of items holding views.
#[derive(Debug, Clone, Default)]
pub struct Virtualizer {
    range: Option<VisibleRange>,
    loaded: BTreeSet<ItemRef>,
}

impl Virtualizer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn range(&self) -> Option<&VisibleRange> {
        self.range.as_ref()
    }

    /// Items that should hold a view.
    #[inline]
    pub fn loaded(&self) -> &BTreeSet<ItemRef> {
        &self.loaded
    }

    /// Recompute the range for `span` and diff it against the loaded set.
    pub fn update(
        &mut self,
        layout: &LayoutModel,
        anchor: Option<ColumnRef>,
        span: Span,
        preload: (usize, usize),
    ) -> RangeDiff {
        let _perf = PerfSpan::new("virtualization::update");

        let visible = compute_range(layout, anchor, span, false);
        self.range = visible.map(|bounds| {
            let (start, end) = expand(layout, bounds, preload.0, preload.1);
            VisibleRange {
                start,
                end,
                first_visible: first_item_of(layout, bounds.0),
                last_visible: last_item_of(layout, bounds.1),
            }
        });

        let next: BTreeSet<ItemRef> = match &self.range {
            Some(range) => layout.items_in_columns(range.start, range.end).into_iter().collect(),
            None => BTreeSet::new(),
        };
        let diff = RangeDiff {
            load: next.difference(&self.loaded).copied().collect(),
            unload: self.loaded.difference(&next).copied().collect(),
        };
        self.loaded = next;

        tracing::trace!(
            target: targets::VIRTUALIZATION,
            range = ?self.range,
            load = diff.load.len(),
            unload = diff.unload.len(),
            "range updated"
        );
        diff
    }

    /// Rebuild the loaded set from the items that hold a view.
    ///
    /// Used after structural mutations renumber items.
    pub fn resync(&mut self, layout: &LayoutModel) {
        self.loaded = layout
            .groups()
            .iter()
            .flat_map(|g| g.loaded_items().map(|item| ItemRef::new(item.group, item.item)))
            .collect();
    }

    /// Forget the range and return the previously loaded set.
    pub fn reset(&mut self) -> BTreeSet<ItemRef> {
        self.range = None;
        std::mem::take(&mut self.loaded)
    }
}

fn first_item_of(layout: &LayoutModel, at: ColumnRef) -> Option<ItemRef> {
    let item = layout.column(at)?.first_item?;
    Some(ItemRef::new(at.group, item))
}

fn last_item_of(layout: &LayoutModel, at: ColumnRef) -> Option<ItemRef> {
    let item = layout.column(at)?.last_item?;
    Some(ItemRef::new(at.group, item))
}

/// Attaches and detaches item views.
pub(crate) struct ViewBinder<'a, H: ViewHost> {
    pub bridge: &'a dyn GridBridge,
    pub host: &'a mut H,
    pub recycler: &'a mut ViewRecycler,
    pub orientation: Orientation,
}

impl<H: ViewHost> ViewBinder<'_, H> {
    /// Bind a pooled or fresh view to an item and attach it.
    pub fn load(&mut self, layout: &mut LayoutModel, at: ItemRef) {
        let Some(item) = layout.item_mut(at) else {
            tracing::warn!(target: targets::VIRTUALIZATION, ?at, "load: invalid item");
            return;
        };
        if item.view.is_some() {
            return;
        }

        let pooled = match self.checked_type(at) {
            Ok(view_type) => self.recycler.take(view_type),
            Err(error) => {
                tracing::warn!(target: targets::BRIDGE, ?at, %error, "bypassing the pool");
                None
            }
        };
        let view = match pooled {
            Some(view) => {
                self.bridge.update_item(at.group, at.item, view);
                view
            }
            None => self.bridge.item_view(at.group, at.item),
        };

        self.host.attach(view, self.orientation.to_physical(item.rect));
        if item.scale != 1.0 {
            self.host.set_scale(view, item.scale);
        }
        item.view = Some(view);
        tracing::trace!(target: targets::VIRTUALIZATION, ?at, view = view.id(), "loaded");
    }

    /// Detach an item's view and pool it.
    ///
    /// With `discard`, or when the pool refuses it, the bridge disposes of
    /// the view instead.
    pub fn unload(&mut self, layout: &mut LayoutModel, at: ItemRef, discard: bool) {
        let Some(item) = layout.item_mut(at) else {
            return;
        };
        let Some(view) = item.view.take() else {
            return;
        };
        if let Some(mut animation) = item.scale_animation.take() {
            item.scale = animation.finish().value;
        }
        self.host.detach(view);
        tracing::trace!(target: targets::VIRTUALIZATION, ?at, view = view.id(), discard, "unloaded");

        if discard {
            self.bridge.unload_item(at.group, at.item, view);
            return;
        }
        let view_type = match self.checked_type(at) {
            Ok(view_type) => view_type,
            Err(error) => {
                tracing::warn!(target: targets::BRIDGE, ?at, %error, "discarding instead of pooling");
                self.bridge.unload_item(at.group, at.item, view);
                return;
            }
        };
        if let Err(view) = self.recycler.put(view_type, view) {
            self.bridge.unload_item_by_view_type(view_type, view);
        }
    }

    /// The bridge's type for an item, if the pool has a slot for it.
    fn checked_type(&self, at: ItemRef) -> Result<usize> {
        let item_type = self.bridge.item_type(at.group, at.item);
        let type_count = self.recycler.type_count();
        if item_type < type_count {
            Ok(item_type)
        } else {
            Err(GridError::ItemTypeOutOfRange {
                item_type,
                type_count,
            })
        }
    }

    /// Apply a range diff: unload first so the pool can feed the loads.
    pub fn apply(&mut self, layout: &mut LayoutModel, diff: &RangeDiff) {
        for &at in &diff.unload {
            self.unload(layout, at, false);
        }
        for &at in &diff.load {
            self.load(layout, at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ViewHandle;
    use crate::layout::LayoutSpacing;

    /// Ten columns of 100 with 10 between them, two rows each.
    fn layout() -> LayoutModel {
        let mut layout = LayoutModel::new(LayoutSpacing {
            column: 10.0,
            ..LayoutSpacing::default()
        });
        layout.add_group(1);
        layout.add_regular_grid(10, 2, 100.0, 50.0, 0);
        layout.populate_items(0, 20);
        layout
    }

    fn col(column: usize) -> ColumnRef {
        ColumnRef::new(0, column)
    }

    #[test]
    fn test_visible_span_follows_negative_offset() {
        assert_eq!(visible_span(-220.0, 300.0), Span::new(220.0, 520.0));
        assert_eq!(visible_span(5.0, 300.0), Span::new(-5.0, 295.0));
    }

    #[test]
    fn test_partial_range_from_anchor() {
        let layout = layout();
        // Columns start at 0, 110, 220, ...; the span 150..450 touches 1..=4.
        let span = Span::new(150.0, 450.0);
        assert_eq!(compute_range(&layout, Some(col(2)), span, false), Some((col(1), col(4))));
        // Anchors outside the span walk toward it.
        assert_eq!(compute_range(&layout, Some(col(9)), span, false), Some((col(1), col(4))));
        assert_eq!(compute_range(&layout, Some(col(0)), span, false), Some((col(1), col(4))));
    }

    #[test]
    fn test_all_in_area_excludes_straddling_columns() {
        let layout = layout();
        let span = Span::new(150.0, 450.0);
        assert_eq!(compute_range(&layout, Some(col(2)), span, true), Some((col(2), col(3))));
    }

    #[test]
    fn test_all_in_area_with_no_fitting_column_is_empty() {
        let layout = layout();
        // Columns 1 (110..210) and 2 (220..320) both straddle an edge.
        let span = Span::new(150.0, 300.0);
        assert_eq!(compute_range(&layout, Some(col(0)), span, true), None);
        assert_eq!(compute_range(&layout, Some(col(9)), span, true), None);
        assert_eq!(compute_range(&layout, Some(col(1)), span, true), None);
        assert_eq!(compute_range(&layout, Some(col(0)), span, false), Some((col(1), col(2))));
    }

    #[test]
    fn test_range_outside_content_is_empty() {
        let layout = layout();
        assert_eq!(compute_range(&layout, Some(col(0)), Span::new(2000.0, 2300.0), false), None);
        assert_eq!(compute_range(&layout, None, Span::new(0.0, 0.0), false), None);
    }

    #[test]
    fn test_expand_clamps_at_grid_ends() {
        let layout = layout();
        assert_eq!(expand(&layout, (col(0), col(2)), 2, 3), (col(0), col(5)));
        assert_eq!(expand(&layout, (col(7), col(9)), 1, 4), (col(6), col(9)));
    }

    #[test]
    fn test_update_diffs_loaded_set() {
        let layout = layout();
        let mut virtualizer = Virtualizer::new();

        let diff = virtualizer.update(&layout, Some(col(0)), Span::new(0.0, 300.0), (0, 1));
        // Columns 0..=2 visible, plus column 3 as buffer.
        assert_eq!(diff.load.len(), 8);
        assert!(diff.unload.is_empty());
        let range = *virtualizer.range().unwrap();
        assert_eq!((range.start, range.end), (col(0), col(3)));
        assert_eq!(range.first_visible, Some(ItemRef::new(0, 0)));
        assert_eq!(range.last_visible, Some(ItemRef::new(0, 5)));

        let diff = virtualizer.update(&layout, Some(col(2)), Span::new(220.0, 520.0), (0, 1));
        assert_eq!(diff.unload, vec![ItemRef::new(0, 0), ItemRef::new(0, 1), ItemRef::new(0, 2), ItemRef::new(0, 3)]);
        assert_eq!(diff.load, vec![ItemRef::new(0, 8), ItemRef::new(0, 9), ItemRef::new(0, 10), ItemRef::new(0, 11)]);
    }

    /// Reports type 3 for odd items against a single declared type.
    struct TypedBridge {
        calls: parking_lot::Mutex<Vec<&'static str>>,
        signals: crate::bridge::BridgeSignals,
    }

    impl GridBridge for TypedBridge {
        fn group_count(&self) -> usize {
            1
        }
        fn item_count(&self, _group: usize) -> usize {
            20
        }
        fn item_view(&self, _group: usize, item: usize) -> ViewHandle {
            self.calls.lock().push("item_view");
            ViewHandle::new(item as u64)
        }
        fn update_item(&self, _group: usize, _item: usize, _view: ViewHandle) {
            self.calls.lock().push("update_item");
        }
        fn unload_item(&self, _group: usize, _item: usize, _view: ViewHandle) {
            self.calls.lock().push("unload_item");
        }
        fn unload_item_by_view_type(&self, _view_type: usize, _view: ViewHandle) {
            self.calls.lock().push("unload_item_by_view_type");
        }
        fn item_type(&self, _group: usize, item: usize) -> usize {
            if item % 2 == 1 { 3 } else { 0 }
        }
        fn focus_change(&self, _group: usize, _item: usize, _view: Option<ViewHandle>, _gained: bool) {}
        fn signals(&self) -> &crate::bridge::BridgeSignals {
            &self.signals
        }
    }

    #[derive(Default)]
    struct NullHost {
        attached: Vec<ViewHandle>,
    }

    impl ViewHost for NullHost {
        fn attach(&mut self, view: ViewHandle, _rect: horizon_grid_core::Rect) {
            self.attached.push(view);
        }
        fn detach(&mut self, view: ViewHandle) {
            self.attached.retain(|&v| v != view);
        }
        fn set_geometry(&mut self, _view: ViewHandle, _rect: horizon_grid_core::Rect) {}
        fn set_content_offset(&mut self, _offset: horizon_grid_core::Point) {}
    }

    #[test]
    fn test_out_of_range_item_type_skips_the_pool() {
        let bridge = TypedBridge {
            calls: parking_lot::Mutex::new(Vec::new()),
            signals: crate::bridge::BridgeSignals::new(),
        };
        let mut host = NullHost::default();
        let mut recycler = ViewRecycler::new(1, 4);
        let mut layout = layout();
        let mut binder = ViewBinder {
            bridge: &bridge,
            host: &mut host,
            recycler: &mut recycler,
            orientation: Orientation::Horizontal,
        };

        let odd = ItemRef::new(0, 1);
        assert_eq!(
            binder.checked_type(odd),
            Err(GridError::ItemTypeOutOfRange {
                item_type: 3,
                type_count: 1,
            })
        );
        assert_eq!(binder.checked_type(ItemRef::new(0, 2)), Ok(0));

        binder.load(&mut layout, odd);
        binder.unload(&mut layout, odd, false);
        assert!(binder.recycler.is_empty());

        let even = ItemRef::new(0, 2);
        binder.load(&mut layout, even);
        binder.unload(&mut layout, even, false);
        assert_eq!(binder.recycler.pooled(0), 1);
        binder.load(&mut layout, ItemRef::new(0, 1));

        assert!(layout.item(odd).is_some_and(|item| item.view.is_some()));
        assert_eq!(binder.recycler.pooled(0), 1);
        assert_eq!(
            *bridge.calls.lock(),
            vec!["item_view", "unload_item", "item_view", "item_view"]
        );
        assert_eq!(host.attached, vec![ViewHandle::new(1)]);
    }
}
