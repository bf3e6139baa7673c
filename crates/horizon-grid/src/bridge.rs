//! Contracts between the grid and the code that embeds it.
//!
//! The grid never owns item content. A [`GridBridge`] supplies counts, item
//! views, enablement and recycling types, and announces data mutations
//! through [`BridgeSignals`]. A [`ViewHost`] is the scene-graph boundary: it
//! attaches, positions and scales the opaque [`ViewHandle`]s the bridge
//! hands out.
//!
//! ```text
//! ┌──────────────┐  item views / counts   ┌──────────────┐  attach / geometry  ┌──────────────┐
//! │  GridBridge  │───────────────────────>│   GridView   │────────────────────>│   ViewHost   │
//! │ (app data)   │<───────────────────────│ (this crate) │                     │ (scene graph)│
//! └──────────────┘  focus styling, unload └──────────────┘                     └──────────────┘
//!        │                                       ^
//!        └──── signals().data_changed ───────────┘
//! ```

use horizon_grid_core::{Point, Rect, Signal};

use crate::indicator::ScrollIndicatorState;

/// Opaque identifier of a view object owned by the bridge.
///
/// The grid only stores and passes these around; it never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewHandle(pub u64);

impl ViewHandle {
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// A data mutation announced by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataChange {
    /// Items were appended at the end of `group`.
    Add { group: usize },
    /// `count` items starting at `from` were removed from `group`.
    Remove {
        group: usize,
        from: usize,
        count: usize,
    },
    /// One item was inserted into `group` at index `at`.
    Insert { group: usize, at: usize },
    /// All data is gone.
    Clear,
    /// Group and item counts changed arbitrarily; rebuild from scratch.
    Reset,
    /// Content of `count` items starting at `from` changed in place.
    Load {
        group: usize,
        from: usize,
        count: usize,
    },
}

/// Signals emitted by a bridge.
pub struct BridgeSignals {
    /// Emitted after the bridge's data changed.
    pub data_changed: Signal<DataChange>,
}

impl Default for BridgeSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeSignals {
    pub fn new() -> Self {
        Self {
            data_changed: Signal::new(),
        }
    }
}

impl std::fmt::Debug for BridgeSignals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeSignals")
            .field("data_changed", &self.data_changed)
            .finish()
    }
}

/// Supplier of item data and item views.
///
/// All methods take `&self`; implementations that mutate internal state use
/// interior mutability, as item models do.
///
/// # Example
///
/// ```
/// use horizon_grid::{BridgeSignals, GridBridge, ViewHandle};
///
/// struct Posters {
///     counts: Vec<usize>,
///     signals: BridgeSignals,
/// }
///
/// impl GridBridge for Posters {
///     fn group_count(&self) -> usize { self.counts.len() }
///     fn item_count(&self, group: usize) -> usize { self.counts[group] }
///     fn item_view(&self, group: usize, item: usize) -> ViewHandle {
///         ViewHandle::new(((group as u64) << 32) | item as u64)
///     }
///     fn update_item(&self, _group: usize, _item: usize, _view: ViewHandle) {}
///     fn unload_item(&self, _group: usize, _item: usize, _view: ViewHandle) {}
///     fn unload_item_by_view_type(&self, _view_type: usize, _view: ViewHandle) {}
///     fn focus_change(&self, _group: usize, _item: usize, _view: Option<ViewHandle>, _gained: bool) {}
///     fn signals(&self) -> &BridgeSignals { &self.signals }
/// }
/// ```
pub trait GridBridge: Send + Sync {
    /// Number of groups.
    fn group_count(&self) -> usize;

    /// Number of items in `group`.
    fn item_count(&self, group: usize) -> usize;

    /// Create a fresh, bindable view for an item.
    fn item_view(&self, group: usize, item: usize) -> ViewHandle;

    /// Rebind a recycled or attached view to the item's current content.
    fn update_item(&self, group: usize, item: usize, view: ViewHandle);

    /// Discard a view that was bound to an item.
    fn unload_item(&self, group: usize, item: usize, view: ViewHandle);

    /// Discard a view that is no longer bound to any item.
    fn unload_item_by_view_type(&self, view_type: usize, view: ViewHandle);

    /// Recycling type of an item; must be below [`item_type_count`](Self::item_type_count).
    fn item_type(&self, _group: usize, _item: usize) -> usize {
        0
    }

    /// Number of distinct item types.
    fn item_type_count(&self) -> usize {
        1
    }

    /// Whether an item can take focus.
    fn is_item_enabled(&self, _group: usize, _item: usize) -> bool {
        true
    }

    /// Focus styling hook, called for the item losing focus and the item
    /// gaining it. `view` is `None` when the item is not loaded.
    fn focus_change(&self, group: usize, item: usize, view: Option<ViewHandle>, gained: bool);

    /// Optional title view for a group.
    fn group_title_view(&self, _group: usize) -> Option<ViewHandle> {
        None
    }

    /// Discard a group title view.
    fn remove_group_title_view(&self, _group: usize, _view: ViewHandle) {}

    /// Data-change notifications.
    fn signals(&self) -> &BridgeSignals;
}

/// The scene-graph boundary.
///
/// Rectangles are physical (orientation already applied) and relative to the
/// scrolling content; the host applies the content offset itself.
pub trait ViewHost {
    /// Insert a view into the scene at `rect`.
    fn attach(&mut self, view: ViewHandle, rect: Rect);

    /// Remove a view from the scene.
    fn detach(&mut self, view: ViewHandle);

    /// Move or resize an attached view.
    fn set_geometry(&mut self, view: ViewHandle, rect: Rect);

    /// Scale an attached view around its center.
    fn set_scale(&mut self, _view: ViewHandle, _scale: f32) {}

    /// Translate the scrolling content.
    fn set_content_offset(&mut self, offset: Point);

    /// Show, move or fade the scroll indicator.
    fn update_scroll_indicator(&mut self, _state: &ScrollIndicatorState) {}
}
