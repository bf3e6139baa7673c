//! Grid configuration.
//!
//! [`GridConfig`] collects every option the grid recognizes. It can be built
//! in code with the `with_*` methods or loaded from TOML:
//!
//! ```
//! use horizon_grid::GridConfig;
//!
//! let config = GridConfig::from_toml_str(r#"
//! orientation = "horizontal"
//! column_spacing = 12.0
//! right_circular = true
//! focus_move_duration = 250
//!
//! [margins]
//! left = 40.0
//! right = 40.0
//! "#).unwrap();
//!
//! assert!(config.right_circular);
//! assert_eq!(config.margins.left, 40.0);
//! ```
//!
//! Durations are expressed in milliseconds in TOML.

use std::time::Duration;

use horizon_grid_core::{GridError, Margins, Orientation, Result, Size};
use serde::{Deserialize, Serialize};

use crate::animation::Easing;

/// Serialize a [`Duration`] as whole milliseconds.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Duration and curve of one animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationAttributes {
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    pub easing: Easing,
}

impl AnimationAttributes {
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }
}

impl Default for AnimationAttributes {
    fn default() -> Self {
        Self::new(Duration::from_millis(200), Easing::EaseOut)
    }
}

/// Configuration for a [`GridView`](crate::GridView).
///
/// Spacing values and sizes are in layout units along the canonical axes:
/// "column" spacing separates lanes along the scroll axis, "row" spacing
/// separates cells inside a lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Scroll direction.
    pub orientation: Orientation,

    /// Gap between consecutive columns of a group.
    pub column_spacing: f32,
    /// Gap between consecutive cells of a column.
    pub row_spacing: f32,
    /// Gap between the last column of a group and the first of the next.
    pub group_spacing: f32,
    /// Gap between a group title band and the group's first row.
    pub title_spacing: f32,
    /// Thickness of a group title band (cross axis). Zero disables titles.
    pub title_size: f32,

    /// Columns kept loaded before the visible range.
    pub preload_front_columns: usize,
    /// Columns kept loaded after the visible range.
    pub preload_back_columns: usize,

    /// Scale applied to the focused item.
    pub focus_scale: f32,

    /// Moving left from the first column wraps to the last column of the grid.
    pub left_circular: bool,
    /// Moving right from the last column wraps to the first column of the grid.
    pub right_circular: bool,
    /// Keep a fixed reference line for cross-column moves instead of
    /// re-centering on the focused cell after every move.
    pub straight_path: bool,

    /// Duration of the viewport animation for one focus move. Zero scrolls
    /// synchronously.
    #[serde(with = "duration_ms")]
    pub focus_move_duration: Duration,
    /// Curve of the viewport animation.
    pub focus_move_easing: Easing,
    /// Idle time after which the scroll indicator fades out.
    #[serde(with = "duration_ms")]
    pub scrollbar_fade_out: Duration,

    /// Maximum number of pooled views per item type.
    pub recycle_limit: usize,

    /// Cells per column in the automatic regular layout.
    pub rows_per_column: usize,

    // Table-valued options stay last so the TOML form keeps plain keys first.
    /// Focus-safe zone insets.
    pub margins: Margins,
    /// Scale-up animation of the item gaining focus.
    pub focus_in: AnimationAttributes,
    /// Scale-down animation of the item losing focus.
    pub focus_out: AnimationAttributes,
    /// Cell size used by the automatic regular layout.
    pub cell_size: Size,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            column_spacing: 0.0,
            row_spacing: 0.0,
            group_spacing: 0.0,
            title_spacing: 0.0,
            title_size: 0.0,
            preload_front_columns: 1,
            preload_back_columns: 1,
            focus_scale: 1.0,
            left_circular: false,
            right_circular: false,
            straight_path: false,
            focus_move_duration: Duration::ZERO,
            focus_move_easing: Easing::EaseOutCubic,
            scrollbar_fade_out: Duration::from_millis(1000),
            recycle_limit: 32,
            rows_per_column: 1,
            margins: Margins::default(),
            focus_in: AnimationAttributes::default(),
            focus_out: AnimationAttributes::default(),
            cell_size: Size::new(100.0, 100.0),
        }
    }
}

impl GridConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] when the text is not valid TOML, does not
    /// match the schema, or fails [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GridConfig =
            toml::from_str(text).map_err(|e| GridError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this configuration to TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| GridError::config(e.to_string()))
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] naming the first offending option.
    pub fn validate(&self) -> Result<()> {
        let spacings = [
            ("column_spacing", self.column_spacing),
            ("row_spacing", self.row_spacing),
            ("group_spacing", self.group_spacing),
            ("title_spacing", self.title_spacing),
            ("title_size", self.title_size),
        ];
        for (name, value) in spacings {
            if !value.is_finite() || value < 0.0 {
                return Err(GridError::config(format!("{name} must be a non-negative number")));
            }
        }
        if !self.focus_scale.is_finite() || self.focus_scale <= 0.0 {
            return Err(GridError::config("focus_scale must be positive"));
        }
        if self.rows_per_column == 0 {
            return Err(GridError::config("rows_per_column must be at least 1"));
        }
        if self.cell_size.is_empty() {
            return Err(GridError::config("cell_size must have a positive area"));
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Builder methods
    // -------------------------------------------------------------------------

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set column, row and group spacing.
    pub fn with_spacing(mut self, column: f32, row: f32, group: f32) -> Self {
        self.column_spacing = column;
        self.row_spacing = row;
        self.group_spacing = group;
        self
    }

    /// Set the group title band thickness and its gap to the first row.
    pub fn with_titles(mut self, size: f32, spacing: f32) -> Self {
        self.title_size = size;
        self.title_spacing = spacing;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the preload buffer before and after the visible columns.
    pub fn with_preload(mut self, front: usize, back: usize) -> Self {
        self.preload_front_columns = front;
        self.preload_back_columns = back;
        self
    }

    pub fn with_focus_scale(
        mut self,
        scale: f32,
        focus_in: AnimationAttributes,
        focus_out: AnimationAttributes,
    ) -> Self {
        self.focus_scale = scale;
        self.focus_in = focus_in;
        self.focus_out = focus_out;
        self
    }

    /// Enable wrap-around at the left and right edges of the grid.
    pub fn with_circular(mut self, left: bool, right: bool) -> Self {
        self.left_circular = left;
        self.right_circular = right;
        self
    }

    pub fn with_straight_path(mut self, enabled: bool) -> Self {
        self.straight_path = enabled;
        self
    }

    pub fn with_focus_move(mut self, duration: Duration, easing: Easing) -> Self {
        self.focus_move_duration = duration;
        self.focus_move_easing = easing;
        self
    }

    pub fn with_scrollbar_fade_out(mut self, duration: Duration) -> Self {
        self.scrollbar_fade_out = duration;
        self
    }

    pub fn with_recycle_limit(mut self, limit: usize) -> Self {
        self.recycle_limit = limit;
        self
    }

    /// Set the automatic layout: cells of `cell_size`, `rows` per column.
    pub fn with_regular_layout(mut self, cell_size: Size, rows: usize) -> Self {
        self.cell_size = cell_size;
        self.rows_per_column = rows;
        self
    }
}

static_assertions::assert_impl_all!(GridConfig: Send, Sync);
