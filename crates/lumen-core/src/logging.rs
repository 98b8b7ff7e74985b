//! Logging facilities for Lumen.
//!
//! Lumen uses the `tracing` crate for instrumentation. To see logs, install
//! a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Filter by subsystem with the constants in [`targets`], e.g.
//! `RUST_LOG=lumen::binding=debug`.

/// Span names used throughout Lumen for tracing.
pub mod span_names {
    /// Full re-derivation of a binding's ordered items.
    pub const BINDING_REBUILD: &str = "lumen::binding::rebuild";
    /// Histogram and statistics computation for a display.
    pub const DISPLAY_PROCESS: &str = "lumen::display::process";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lumen_core::signal";
    /// Property system target.
    pub const PROPERTY: &str = "lumen_core::property";
    /// Data item binding target.
    pub const BINDING: &str = "lumen::binding";
    /// Data item and display model target.
    pub const MODEL: &str = "lumen::model";
    /// Histogram canvas and panel target.
    pub const HISTOGRAM: &str = "lumen::histogram";
    /// Settings loading target.
    pub const SETTINGS: &str = "lumen::settings";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "lumen::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
