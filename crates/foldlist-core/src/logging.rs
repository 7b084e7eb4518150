//! Logging facilities for foldlist.
//!
//! foldlist uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("foldlist=debug")
//!         .init();
//! }
//! ```
//!
//! Structural mutations of the flattened list are logged at `debug`, every
//! per-index event at `trace`.

/// Span names used throughout foldlist for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Expand/collapse transition span.
    pub const EXPANSION: &str = "foldlist::expansion";
    /// Snapshot capture/restore span.
    pub const SNAPSHOT: &str = "foldlist::snapshot";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "foldlist_core::signal";
    /// Flattened list model target.
    pub const MODEL: &str = "foldlist::model";
    /// Expand/collapse engine target.
    pub const EXPANSION: &str = "foldlist::model::expansion";
    /// Expansion snapshot target.
    pub const SNAPSHOT: &str = "foldlist::model::snapshot";
    /// Timing spans for bulk operations.
    pub const PERF: &str = "foldlist::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing bulk operations such as `expand_all` or a restore.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
