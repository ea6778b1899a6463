//! Logging facilities for Lattice Binding.
//!
//! Lattice Binding uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every event carries one of the [`targets`], so a filter such as
//! `RUST_LOG=lattice_binding::filter=debug` isolates a single subsystem.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "lattice_binding_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lattice_binding_core::signal";
    /// Sortable binding list target.
    pub const LIST: &str = "lattice_binding::list";
    /// Sort application and comparer target.
    pub const SORT: &str = "lattice_binding::sort";
    /// Filtered list target.
    pub const FILTER: &str = "lattice_binding::filter";
}

/// Span names used for tracing long-running list operations.
pub mod span_names {
    /// Full stable sort of a binding list.
    pub const SORT: &str = "lattice_binding::sort";
    /// Full rebuild of a filtered list.
    pub const REFILTER: &str = "lattice_binding::refilter";
    /// Bulk append to a binding list.
    pub const ADD_RANGE: &str = "lattice_binding::add_range";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of bulk operations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "lattice_binding::perf", "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }

    /// Create a span that also records how many items the operation touches.
    pub fn with_len(name: &'static str, len: usize) -> Self {
        let span = tracing::debug_span!(
            target: "lattice_binding::perf",
            "perf",
            operation = name,
            len
        );
        Self {
            _span: span.entered(),
        }
    }
}
