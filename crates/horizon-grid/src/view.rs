//! The grid widget.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{ConnectionId, GridError, Orientation, Point, Rect, Result, Signal, Size, Span};
use parking_lot::Mutex;

use crate::animation::Tween;
use crate::bridge::{DataChange, GridBridge, ViewHost};
use crate::config::{AnimationAttributes, GridConfig};
use crate::events::{Direction, GridEvent};
use crate::indicator::ScrollIndicator;
use crate::layout::{ColumnRef, ItemRef, LayoutModel, LayoutSpacing, LayoutTreeDebug, TreeStyle};
use crate::navigation::{FocusNavigator, NavigationOptions, ReferenceLines};
use crate::recycler::ViewRecycler;
use crate::scroll::{ScrollCoordinator, Waypoint, focus_safe_zone, required_delta};
use crate::virtualization::{RangeDiff, ViewBinder, VisibleRange, Virtualizer, compute_range, visible_span};

/// Offset changes smaller than this are ignored.
const OFFSET_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, Default)]
struct FocusState {
    /// Last focus announced to observers.
    current: Option<ItemRef>,
    /// Destination of the latest move, ahead of `current` while a scroll
    /// animation catches up.
    target: Option<ItemRef>,
    /// Requested while the widget had no input focus.
    requested: Option<ItemRef>,
    has_input_focus: bool,
}

/// A virtualized grid navigated with directional input.
///
/// The widget lays out the bridge's items into groups of columns, keeps views
/// attached only for items near the viewport, moves focus with
/// [`move_focus`](Self::move_focus) and scrolls to keep the focused item
/// inside the focus-safe zone. Time is fed in through
/// [`advance`](Self::advance).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use horizon_grid::{
///     BridgeSignals, Direction, GridBridge, GridConfig, GridView, Point, Rect, Size,
///     ViewHandle, ViewHost,
/// };
///
/// struct Row { signals: BridgeSignals }
///
/// impl GridBridge for Row {
///     fn group_count(&self) -> usize { 1 }
///     fn item_count(&self, _group: usize) -> usize { 20 }
///     fn item_view(&self, _group: usize, item: usize) -> ViewHandle { ViewHandle::new(item as u64) }
///     fn update_item(&self, _group: usize, _item: usize, _view: ViewHandle) {}
///     fn unload_item(&self, _group: usize, _item: usize, _view: ViewHandle) {}
///     fn unload_item_by_view_type(&self, _view_type: usize, _view: ViewHandle) {}
///     fn focus_change(&self, _group: usize, _item: usize, _view: Option<ViewHandle>, _gained: bool) {}
///     fn signals(&self) -> &BridgeSignals { &self.signals }
/// }
///
/// #[derive(Default)]
/// struct Scene;
///
/// impl ViewHost for Scene {
///     fn attach(&mut self, _view: ViewHandle, _rect: Rect) {}
///     fn detach(&mut self, _view: ViewHandle) {}
///     fn set_geometry(&mut self, _view: ViewHandle, _rect: Rect) {}
///     fn set_content_offset(&mut self, _offset: Point) {}
/// }
///
/// let bridge = Arc::new(Row { signals: BridgeSignals::new() });
/// let mut grid = GridView::new(GridConfig::new(), bridge, Scene).unwrap();
/// grid.set_viewport_size(Size::new(450.0, 100.0));
/// grid.focus_gained();
///
/// assert!(grid.move_focus(Direction::Right));
/// assert_eq!(grid.focused_item().map(|at| at.item), Some(1));
/// assert!(!grid.move_focus(Direction::Up));
/// ```
pub struct GridView<H: ViewHost> {
    config: GridConfig,
    bridge: Arc<dyn GridBridge>,
    host: H,
    layout: LayoutModel,
    recycler: ViewRecycler,
    virtualizer: Virtualizer,
    scroll: ScrollCoordinator,
    indicator: ScrollIndicator,
    viewport: Size,
    focus: FocusState,
    lines: ReferenceLines,
    /// Items with a running scale animation.
    scaling: Vec<ItemRef>,
    pending_changes: Arc<Mutex<VecDeque<DataChange>>>,
    data_connection: Option<ConnectionId>,
    events: Signal<GridEvent>,
    closed: bool,
}

impl<H: ViewHost> GridView<H> {
    /// Create a grid over `bridge`, presenting through `host`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] when `config` fails validation.
    pub fn new(config: GridConfig, bridge: Arc<dyn GridBridge>, host: H) -> Result<Self> {
        config.validate()?;

        let pending_changes = Arc::new(Mutex::new(VecDeque::new()));
        let queue = Arc::clone(&pending_changes);
        let data_connection = bridge
            .signals()
            .data_changed
            .connect(move |change| queue.lock().push_back(*change));

        let mut view = Self {
            layout: LayoutModel::new(LayoutSpacing::from_config(&config)),
            recycler: ViewRecycler::new(bridge.item_type_count(), config.recycle_limit),
            virtualizer: Virtualizer::new(),
            scroll: ScrollCoordinator::new(config.focus_move_duration, config.focus_move_easing),
            indicator: ScrollIndicator::new(config.orientation, config.scrollbar_fade_out),
            viewport: Size::ZERO,
            focus: FocusState::default(),
            lines: ReferenceLines::default(),
            scaling: Vec::new(),
            pending_changes,
            data_connection: Some(data_connection),
            events: Signal::new(),
            closed: false,
            config,
            bridge,
            host,
        };
        view.rebuild();
        Ok(view)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> &LayoutModel {
        &self.layout
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[inline]
    pub fn recycler(&self) -> &ViewRecycler {
        &self.recycler
    }

    #[inline]
    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// The focus last announced through [`GridEvent::FocusChange`].
    #[inline]
    pub fn focused_item(&self) -> Option<ItemRef> {
        self.focus.current
    }

    /// Destination of the latest move, possibly ahead of
    /// [`focused_item`](Self::focused_item) while scrolling.
    #[inline]
    pub fn focus_target(&self) -> Option<ItemRef> {
        self.focus.target.or(self.focus.current)
    }

    #[inline]
    pub fn has_input_focus(&self) -> bool {
        self.focus.has_input_focus
    }

    /// Physical translation applied to the scrolling content.
    pub fn content_offset(&self) -> Point {
        self.config.orientation.offset_point(self.scroll.offset())
    }

    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.virtualizer.range().copied()
    }

    /// Items currently holding a view, in group/item order.
    pub fn loaded_items(&self) -> Vec<ItemRef> {
        self.virtualizer.loaded().iter().copied().collect()
    }

    /// Number of queued focus waypoints.
    pub fn pending_waypoints(&self) -> usize {
        self.scroll.pending().count()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The widget's event stream.
    #[inline]
    pub fn events(&self) -> &Signal<GridEvent> {
        &self.events
    }

    /// Register an event observer.
    pub fn connect_events<F>(&self, observer: F) -> ConnectionId
    where
        F: Fn(&GridEvent) + Send + Sync + 'static,
    {
        self.events.connect(observer)
    }

    /// Unregister an event observer.
    pub fn disconnect_events(&self, id: ConnectionId) -> bool {
        self.events.disconnect(id)
    }

    /// Text dump of the layout tree.
    pub fn debug_tree(&self, style: TreeStyle) -> String {
        LayoutTreeDebug::new()
            .style(style)
            .show_rects(true)
            .format(&self.layout)
    }

    /// Screen rectangle of an item, in physical coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidGroup`] or [`GridError::InvalidItem`] for
    /// indices outside the current data, and [`GridError::Closed`] after
    /// [`shutdown`](Self::shutdown).
    pub fn item_screen_rect(&self, group: usize, item: usize) -> Result<Rect> {
        if self.closed {
            return Err(GridError::Closed);
        }
        let g = self.layout.group(group).ok_or(GridError::InvalidGroup {
            group,
            count: self.layout.group_count(),
        })?;
        let grid_item = g.items.get(item).ok_or(GridError::InvalidItem {
            group,
            item,
            count: g.items.len(),
        })?;
        let rect = grid_item.rect.translated(self.scroll.offset(), 0.0);
        Ok(self.config.orientation.to_physical(rect))
    }

    // =========================================================================
    // Viewport and data
    // =========================================================================

    /// Resize the viewport and recompute the loaded range.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.drain_data_changes();
        if self.closed {
            return;
        }
        self.viewport = size;
        self.refresh_range(self.focus_target());
        self.push_indicator();
    }

    /// Scroll to an explicit offset along the main axis.
    ///
    /// Queued focus moves are settled first.
    pub fn set_content_offset(&mut self, offset: f32) {
        self.drain_data_changes();
        if self.closed {
            return;
        }
        self.release_pending();
        self.apply_offset(offset);
        self.refresh_range(self.focus_target());
    }

    /// Rebuild everything from the bridge.
    pub fn reload(&mut self) {
        if self.closed {
            return;
        }
        self.pending_changes.lock().clear();
        self.notify_data_change(DataChange::Reset);
    }

    /// Apply a data mutation now, together with any already queued.
    pub fn notify_data_change(&mut self, change: DataChange) {
        self.pending_changes.lock().push_back(change);
        self.drain_data_changes();
    }

    fn drain_data_changes(&mut self) {
        if self.closed {
            self.pending_changes.lock().clear();
            return;
        }
        loop {
            let next = self.pending_changes.lock().pop_front();
            let Some(change) = next else {
                break;
            };
            self.apply_data_change(change);
        }
    }

    fn apply_data_change(&mut self, change: DataChange) {
        tracing::debug!(target: targets::BRIDGE, ?change, "data change");
        self.lines.reset();

        match change {
            DataChange::Load { group, from, count } => self.refresh_items(group, from, count),
            DataChange::Clear | DataChange::Reset => {
                let logical = self.focus_target();
                self.settle_before_mutation();
                self.rebuild();
                let to = logical.and_then(|at| {
                    let len = self.layout.group(at.group)?.item_count();
                    (len > 0).then(|| ItemRef::new(at.group, at.item.min(len - 1)))
                });
                self.finish_mutation(None, to);
            }
            DataChange::Add { group } => {
                let logical = self.focus_target();
                self.settle_before_mutation();
                let existing = self.layout.group_count();
                let first = if group >= existing {
                    self.layout.add_group(group + 1 - existing)
                } else {
                    group
                };
                for g in first..=group {
                    let count = self.bridge.item_count(g);
                    self.relayout_group(g, count);
                }
                for g in existing..=group {
                    self.attach_title(g);
                }
                self.finish_mutation(self.focus.current, logical);
            }
            DataChange::Remove { group, from, count } => {
                if self.layout.group(group).is_none() {
                    tracing::warn!(target: targets::BRIDGE, group, "remove: invalid group index");
                    return;
                }
                let logical = self.focus_target();
                self.settle_before_mutation();

                let removed = self.layout.remove_items(group, from, count);
                for item in &removed {
                    if let Some(view) = item.view {
                        self.host.detach(view);
                        self.bridge.unload_item(group, item.item, view);
                    }
                }
                let removed = removed.len();
                let new_count = self.bridge.item_count(group);
                self.relayout_group(group, new_count);
                self.rebind_from(group, from);

                let len = self.layout.group(group).map_or(0, |g| g.item_count());
                let shift = |at: ItemRef| -> Option<ItemRef> {
                    if at.group != group || at.item < from {
                        Some(at)
                    } else if at.item < from + removed {
                        None
                    } else {
                        Some(ItemRef::new(group, at.item - removed))
                    }
                };
                let styled = self.focus.current.and_then(shift);
                let to = logical.and_then(|at| {
                    shift(at).or_else(|| {
                        if from > 0 {
                            Some(ItemRef::new(group, from - 1))
                        } else {
                            (len > 0).then_some(ItemRef::new(group, 0))
                        }
                    })
                });
                self.finish_mutation(styled, to);
            }
            DataChange::Insert { group, at } => {
                let Some(len) = self.layout.group(group).map(|g| g.items.len()) else {
                    tracing::warn!(target: targets::BRIDGE, group, "insert: invalid group index");
                    return;
                };
                let at = at.min(len);
                let logical = self.focus_target();
                self.settle_before_mutation();
                self.layout.insert_item(group, at);
                let count = self.bridge.item_count(group);
                self.relayout_group(group, count);
                self.rebind_from(group, at + 1);

                let shift = |focus: ItemRef| {
                    if focus.group == group && focus.item >= at {
                        ItemRef::new(group, focus.item + 1)
                    } else {
                        focus
                    }
                };
                self.finish_mutation(self.focus.current.map(shift), logical.map(shift));
            }
        }
    }

    /// Rebind the content of loaded items after an in-place change.
    fn refresh_items(&mut self, group: usize, from: usize, count: usize) {
        let Some(g) = self.layout.group(group) else {
            tracing::warn!(target: targets::BRIDGE, group, "load: invalid group index");
            return;
        };
        let end = from.saturating_add(count).min(g.items.len());
        for item in g.items.get(from..end).into_iter().flatten() {
            if let Some(view) = item.view {
                self.bridge.update_item(group, item.item, view);
            }
        }
    }

    /// Loaded items from `from` on were renumbered; rebind their content.
    fn rebind_from(&mut self, group: usize, from: usize) {
        let Some(g) = self.layout.group(group) else {
            return;
        };
        for item in g.items.iter().skip(from) {
            if let Some(view) = item.view {
                self.bridge.update_item(group, item.item, view);
            }
        }
    }

    /// Drop queued waypoints and settle animations before the structure
    /// changes underneath them.
    fn settle_before_mutation(&mut self) {
        self.scroll.stop();
        self.indicator.settle();
        self.finish_scales();
    }

    /// Re-sync views, keep the focus visible and announce a retargeted focus.
    ///
    /// `styled` is where the item last styled as focused lives now, if it
    /// survived the mutation.
    fn finish_mutation(&mut self, styled: Option<ItemRef>, to: Option<ItemRef>) {
        self.virtualizer.resync(&self.layout);
        self.sync_geometry();

        let to = to
            .filter(|&at| self.layout.contains_item(at))
            .or_else(|| self.focus.has_input_focus.then(|| self.first_focusable()).flatten());
        self.focus.target = to;

        if let Some(to) = to {
            let delta = self.focus_delta(to, self.scroll.offset());
            if delta.abs() > OFFSET_EPSILON {
                self.apply_offset(self.scroll.offset() + delta);
            }
        }
        self.refresh_range(to);
        self.push_indicator();

        let notified = self.focus.current;
        self.focus.current = to;
        if self.focus.has_input_focus && styled != to {
            if let Some(styled) = styled.filter(|&at| self.layout.contains_item(at)) {
                self.style_focus(styled, false);
            }
            if let Some(to) = to {
                self.style_focus(to, true);
            }
        }
        if let Some(to) = to
            && notified != Some(to)
        {
            tracing::debug!(target: targets::NAVIGATION, from = ?notified, ?to, "focus retargeted");
            self.events.emit(GridEvent::FocusChange { from: notified, to });
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Release every view and rebuild the layout from the bridge counts.
    fn rebuild(&mut self) {
        self.release_all_views();
        for (view_type, view) in self.recycler.set_type_count(self.bridge.item_type_count()) {
            self.bridge.unload_item_by_view_type(view_type, view);
        }
        self.layout.clear();
        self.scaling.clear();

        let groups = self.bridge.group_count();
        self.layout.add_group(groups);
        for group in 0..groups {
            let count = self.bridge.item_count(group);
            self.relayout_group(group, count);
        }
        for group in 0..groups {
            self.attach_title(group);
        }
        tracing::debug!(
            target: targets::LAYOUT,
            groups,
            columns = self.layout.column_count(),
            "layout rebuilt"
        );
    }

    /// Canonical (main, cross) size of an automatic cell.
    fn cell_extents(&self) -> (f32, f32) {
        let size = self.config.cell_size;
        match self.config.orientation {
            Orientation::Horizontal => (size.width, size.height),
            Orientation::Vertical => (size.height, size.width),
        }
    }

    /// Lay a group out as full columns of `rows_per_column` cells plus a
    /// ragged last column.
    fn relayout_group(&mut self, group: usize, count: usize) {
        if !self.layout.clear_group_columns(group) {
            return;
        }
        let (main, cross) = self.cell_extents();
        let rows = self.config.rows_per_column.max(1);
        self.layout.add_regular_grid(count / rows, rows, main, cross, group);
        let rest = count % rows;
        if rest > 0
            && let Some(column) = self.layout.add_column(main, group)
        {
            for _ in 0..rest {
                self.layout.add_row_to_column(column, cross, group);
            }
        }

        for item in self.layout.populate_items(group, count) {
            if let Some(view) = item.view {
                self.host.detach(view);
                self.bridge.unload_item(group, item.item, view);
            }
        }
    }

    fn attach_title(&mut self, group: usize) {
        if self.config.title_size <= 0.0 {
            return;
        }
        let view = self.bridge.group_title_view(group);
        self.layout.set_group_title(group, view);
        if let Some(view) = view
            && let Some(title) = self.layout.group(group).and_then(|g| g.title.as_ref())
        {
            self.host.attach(view, self.config.orientation.to_physical(title.rect));
        }
    }

    /// Push the current rectangles of titles and loaded items to the host.
    fn sync_geometry(&mut self) {
        let orientation = self.config.orientation;
        for group in self.layout.groups() {
            if let Some(title) = &group.title
                && let Some(view) = title.view
            {
                self.host.set_geometry(view, orientation.to_physical(title.rect));
            }
        }
        for &at in self.virtualizer.loaded() {
            if let Some(item) = self.layout.item(at)
                && let Some(view) = item.view
            {
                self.host.set_geometry(view, orientation.to_physical(item.rect));
            }
        }
    }

    fn release_all_views(&mut self) {
        let loaded = self.virtualizer.reset();
        let mut binder = ViewBinder {
            bridge: &*self.bridge,
            host: &mut self.host,
            recycler: &mut self.recycler,
            orientation: self.config.orientation,
        };
        for at in loaded {
            binder.unload(&mut self.layout, at, false);
        }
        for group in 0..self.layout.group_count() {
            if let Some(view) = self.layout.set_group_title(group, None) {
                self.host.detach(view);
                self.bridge.remove_group_title_view(group, view);
            }
        }
    }

    // =========================================================================
    // Virtualization
    // =========================================================================

    fn main_extent(&self) -> f32 {
        self.config.orientation.main_extent(self.viewport)
    }

    fn refresh_range(&mut self, anchor: Option<ItemRef>) {
        let anchor = anchor.and_then(|at| self.layout.column_ref_for_item(at));
        let span = visible_span(self.scroll.offset(), self.main_extent());
        let preload = (self.config.preload_front_columns, self.config.preload_back_columns);
        let diff = self.virtualizer.update(&self.layout, anchor, span, preload);
        if !diff.is_empty() {
            self.apply_diff(&diff);
        }
    }

    fn apply_diff(&mut self, diff: &RangeDiff) {
        let mut binder = ViewBinder {
            bridge: &*self.bridge,
            host: &mut self.host,
            recycler: &mut self.recycler,
            orientation: self.config.orientation,
        };
        binder.apply(&mut self.layout, diff);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// The widget gained input focus.
    ///
    /// A focus request made while unfocused is applied now; otherwise the
    /// previous focus is restyled, or the first enabled item is focused.
    pub fn focus_gained(&mut self) {
        self.drain_data_changes();
        if self.closed || self.focus.has_input_focus {
            return;
        }
        self.focus.has_input_focus = true;

        let requested = self
            .focus
            .requested
            .take()
            .filter(|&at| self.layout.contains_item(at));
        match (requested, self.focus.current) {
            (Some(at), _) => {
                self.focus.target = Some(at);
                self.scroll_to_focus(at, false);
            }
            (None, Some(current)) => self.style_focus(current, true),
            (None, None) => {
                if let Some(first) = self.first_focusable() {
                    self.focus.target = Some(first);
                    self.scroll_to_focus(first, false);
                }
            }
        }
    }

    /// The widget lost input focus. Queued moves are settled first.
    pub fn focus_lost(&mut self) {
        self.drain_data_changes();
        if self.closed || !self.focus.has_input_focus {
            return;
        }
        self.release_pending();
        self.focus.has_input_focus = false;
        if let Some(current) = self.focus.current {
            self.style_focus(current, false);
        }
    }

    /// Focus an item by index.
    ///
    /// Without input focus the request is recorded and applied by
    /// [`focus_gained`](Self::focus_gained). Returns `false` for an unknown
    /// item.
    pub fn set_focused_item(&mut self, group: usize, item: usize) -> bool {
        self.drain_data_changes();
        if self.closed {
            return false;
        }
        let at = ItemRef::new(group, item);
        if !self.layout.contains_item(at) {
            tracing::warn!(target: targets::NAVIGATION, ?at, "set_focused_item: invalid item");
            return false;
        }
        if !self.focus.has_input_focus {
            tracing::debug!(target: targets::NAVIGATION, ?at, "focus request deferred");
            self.focus.requested = Some(at);
            return true;
        }
        self.focus.target = Some(at);
        self.scroll_to_focus(at, false);
        true
    }

    /// Move focus one step. Returns `false` when the move has no effect.
    pub fn move_focus(&mut self, direction: Direction) -> bool {
        self.drain_data_changes();
        if self.closed || !self.focus.has_input_focus {
            return false;
        }
        let Some(origin) = self.focus_target() else {
            return false;
        };

        let canonical = direction.to_canonical(self.config.orientation);
        let bridge = &self.bridge;
        let navigator = FocusNavigator::new(
            &self.layout,
            |at: ItemRef| bridge.is_item_enabled(at.group, at.item),
            self.navigation_options(),
        );
        let Some(destination) = navigator.find(origin, canonical, &mut self.lines) else {
            return false;
        };
        if destination == origin {
            return false;
        }

        self.focus.target = Some(destination);
        self.scroll_to_focus(destination, true);
        true
    }

    /// Move focus by one viewport. Returns `false` when the move has no
    /// effect.
    ///
    /// The destination is the first (backward) or last (forward) column
    /// entirely inside the viewport after scrolling one page.
    pub fn page(&mut self, forward: bool) -> bool {
        self.drain_data_changes();
        if self.closed || !self.focus.has_input_focus {
            return false;
        }
        let Some(origin) = self.focus_target() else {
            return false;
        };
        let (Some(origin_column), Some(cell)) = (
            self.layout.column_ref_for_item(origin),
            self.layout.cell_for_item(origin),
        ) else {
            return false;
        };
        let line = cell.cross_center();

        let extent = self.main_extent();
        let base = self.scroll.target_offset();
        let span = visible_span(if forward { base - extent } else { base + extent }, extent);
        let range = compute_range(&self.layout, Some(origin_column), span, true)
            .or_else(|| compute_range(&self.layout, Some(origin_column), span, false));
        let column = match (range, forward) {
            (Some((_, end)), true) => Some(end),
            (Some((start, _)), false) => Some(start),
            (None, true) => self.layout.last_column(),
            (None, false) => self.layout.first_column(),
        };
        let Some(column) = column else {
            return false;
        };

        let bridge = &self.bridge;
        let navigator = FocusNavigator::new(
            &self.layout,
            |at: ItemRef| bridge.is_item_enabled(at.group, at.item),
            self.navigation_options(),
        );
        let Some(destination) = navigator.nearest_in_column(column, line) else {
            return false;
        };
        if destination == origin {
            return false;
        }
        self.lines.reset();
        self.focus.target = Some(destination);
        self.scroll_to_focus(destination, true);
        true
    }

    fn navigation_options(&self) -> NavigationOptions {
        NavigationOptions {
            left_circular: self.config.left_circular,
            right_circular: self.config.right_circular,
            straight_path: self.config.straight_path,
        }
    }

    fn first_focusable(&self) -> Option<ItemRef> {
        self.layout
            .groups()
            .iter()
            .flat_map(|g| (0..g.item_count()).map(move |item| ItemRef::new(g.index, item)))
            .filter(|&at| self.layout.contains_item(at))
            .find(|&at| self.bridge.is_item_enabled(at.group, at.item))
    }

    /// Offset change that brings `at` into the focus-safe zone when the
    /// content sits at `offset`.
    fn focus_delta(&self, at: ItemRef, offset: f32) -> f32 {
        let (Some(cell), Some(column)) =
            (self.layout.cell_for_item(at), self.layout.column_ref_for_item(at))
        else {
            return 0.0;
        };
        let space_of = |c: ColumnRef| self.layout.column(c).map(|c| c.space);
        let zone = focus_safe_zone(
            self.main_extent(),
            self.config.orientation.main_margins(&self.config.margins),
            self.layout.prev_column(column).and_then(space_of),
            self.layout.next_column(column).and_then(space_of),
        );
        let item = Span::new(cell.rect.left() + offset, cell.rect.right() + offset);
        required_delta(item, zone)
    }

    /// Scroll so `destination` is inside the focus-safe zone, then announce
    /// it. Animated moves are queued as waypoints.
    fn scroll_to_focus(&mut self, destination: ItemRef, animate: bool) {
        let base = self.scroll.target_offset();
        let delta = self.focus_delta(destination, base);
        let offset = base + delta;

        if animate
            && self.scroll.is_animated()
            && (delta.abs() > OFFSET_EPSILON || self.scroll.is_animating() || self.scroll.has_pending())
        {
            self.scroll.enqueue(Waypoint {
                target: destination,
                offset,
            });
            self.push_indicator();
            return;
        }

        self.release_pending();
        if (offset - self.scroll.offset()).abs() > OFFSET_EPSILON {
            self.apply_offset(offset);
        }
        self.refresh_range(Some(destination));
        self.commit_focus(destination);
    }

    /// Finish the scroll animation and announce every queued waypoint in
    /// order.
    fn release_pending(&mut self) {
        let animating = self.scroll.is_animating();
        let waypoints = self.scroll.finish();
        if animating || !waypoints.is_empty() {
            self.push_offset();
            self.indicator.settle();
        }
        for waypoint in waypoints {
            self.refresh_range(Some(waypoint.target));
            self.commit_focus(waypoint.target);
        }
    }

    fn commit_focus(&mut self, to: ItemRef) {
        let from = self.focus.current;
        if from == Some(to) {
            return;
        }
        if let Some(from) = from
            && self.layout.contains_item(from)
        {
            self.style_focus(from, false);
        }
        self.style_focus(to, true);
        self.focus.current = Some(to);
        tracing::debug!(target: targets::NAVIGATION, ?from, ?to, "focus changed");
        self.events.emit(GridEvent::FocusChange { from, to });
    }

    /// Forward focus styling to the bridge and scale the item.
    fn style_focus(&mut self, at: ItemRef, gained: bool) {
        let view = self.layout.item(at).and_then(|item| item.view);
        self.bridge.focus_change(at.group, at.item, view, gained);
        let (scale, attributes) = if gained {
            (self.config.focus_scale, self.config.focus_in)
        } else {
            (1.0, self.config.focus_out)
        };
        self.animate_scale(at, scale, attributes);
    }

    fn animate_scale(&mut self, at: ItemRef, scale: f32, attributes: AnimationAttributes) {
        let Some(item) = self.layout.item_mut(at) else {
            return;
        };
        if item.scale_animation.is_none() && (item.scale - scale).abs() <= f32::EPSILON {
            return;
        }
        if attributes.duration.is_zero() {
            item.scale = scale;
            item.scale_animation = None;
            if let Some(view) = item.view {
                self.host.set_scale(view, scale);
            }
            return;
        }
        item.scale_animation = Some(Tween::new(item.scale, scale, attributes.duration, attributes.easing));
        if !self.scaling.contains(&at) {
            self.scaling.push(at);
        }
    }

    fn advance_scales(&mut self, dt: Duration) {
        self.scaling.retain(|&at| {
            let Some(item) = self.layout.item_mut(at) else {
                return false;
            };
            let Some(animation) = item.scale_animation.as_mut() else {
                return false;
            };
            let step = animation.advance(dt);
            item.scale = step.value;
            if let Some(view) = item.view {
                self.host.set_scale(view, step.value);
            }
            if step.finished {
                item.scale_animation = None;
            }
            !step.finished
        });
    }

    fn finish_scales(&mut self) {
        for at in std::mem::take(&mut self.scaling) {
            let Some(item) = self.layout.item_mut(at) else {
                continue;
            };
            if let Some(mut animation) = item.scale_animation.take() {
                item.scale = animation.finish().value;
                if let Some(view) = item.view {
                    self.host.set_scale(view, item.scale);
                }
            }
        }
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    fn apply_offset(&mut self, offset: f32) {
        self.scroll.set_offset(offset);
        self.push_offset();
        self.indicator.settle();
    }

    fn push_offset(&mut self) {
        let offset = self.scroll.offset();
        tracing::trace!(target: targets::SCROLL, offset, "content offset");
        self.host.set_content_offset(self.config.orientation.offset_point(offset));
        let state = self
            .indicator
            .update(offset, self.layout.content_extent(), self.main_extent());
        self.host.update_scroll_indicator(&state);
    }

    fn push_indicator(&mut self) {
        let state = self.indicator.relayout(
            self.scroll.offset(),
            self.layout.content_extent(),
            self.main_extent(),
        );
        self.host.update_scroll_indicator(&state);
    }

    /// Advance animations by `dt`.
    ///
    /// Moves the scroll animation, announces the waypoints it passes (each
    /// after the loaded range is recomputed at the new offset), steps focus
    /// scaling and fades the scroll indicator.
    pub fn advance(&mut self, dt: Duration) {
        self.drain_data_changes();
        if self.closed {
            return;
        }
        if let Some(state) = self.indicator.advance(dt) {
            self.host.update_scroll_indicator(&state);
        }

        let step = self.scroll.advance(dt);
        if step.moved || step.finished {
            self.push_offset();
        }
        if step.reached.is_empty() {
            if step.moved {
                self.refresh_range(self.focus_target());
            }
        } else {
            for waypoint in step.reached {
                self.refresh_range(Some(waypoint.target));
                self.commit_focus(waypoint.target);
            }
        }
        if step.finished {
            self.indicator.settle();
        }

        self.advance_scales(dt);
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Stop animations, release every view and block further events.
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        tracing::debug!(target: targets::BRIDGE, "grid shutting down");

        self.scroll.stop();
        self.finish_scales();
        self.release_all_views();
        for (view_type, view) in self.recycler.drain() {
            self.bridge.unload_item_by_view_type(view_type, view);
        }
        self.layout.clear();
        self.focus = FocusState::default();
        self.lines.reset();

        if let Some(id) = self.data_connection.take() {
            self.bridge.signals().data_changed.disconnect(id);
        }
        self.pending_changes.lock().clear();
        self.events.set_blocked(true);
        self.events.disconnect_all();
        self.closed = true;
    }
}

impl<H: ViewHost> Drop for GridView<H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<H: ViewHost> std::fmt::Debug for GridView<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridView")
            .field("groups", &self.layout.group_count())
            .field("viewport", &self.viewport)
            .field("offset", &self.scroll.offset())
            .field("focus", &self.focus.current)
            .field("loaded", &self.virtualizer.loaded().len())
            .field("closed", &self.closed)
            .finish()
    }
}
