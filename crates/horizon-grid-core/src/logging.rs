//! Logging facilities for Horizon Grid.
//!
//! Horizon Grid uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_grid::navigation=trace")
//!     .init();
//! ```
//!
//! Invalid internal indices are reported at `warn` and otherwise ignored, so
//! enabling the `horizon_grid` targets is the first step when a grid behaves
//! unexpectedly.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal emission.
    pub const SIGNAL: &str = "horizon_grid_core::signal";
    /// Group/column/cell bookkeeping.
    pub const LAYOUT: &str = "horizon_grid::layout";
    /// On-screen range computation and view load/unload.
    pub const VIRTUALIZATION: &str = "horizon_grid::virtualization";
    /// Directional focus search.
    pub const NAVIGATION: &str = "horizon_grid::navigation";
    /// Viewport offset and waypoint processing.
    pub const SCROLL: &str = "horizon_grid::scroll";
    /// View pooling.
    pub const RECYCLER: &str = "horizon_grid::recycler";
    /// Bridge callbacks and data-change handling.
    pub const BRIDGE: &str = "horizon_grid::bridge";
    /// Performance spans.
    pub const PERF: &str = "horizon_grid::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_grid::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let _span = PerfSpan::new("test_operation");
        tracing::debug!(target: targets::LAYOUT, "inside perf span");
    }
}
