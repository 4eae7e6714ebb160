//! Logging facilities for Nibble.
//!
//! Nibble uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in the application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("nibble_a11y=debug,nibble_core=info")
//!     .init();
//! ```
//!
//! Diagnostics follow a fixed severity policy:
//!
//! - `warn`: developer misuse the integrator should fix (touch targets below
//!   the minimum size).
//! - `debug`: degraded input that was replaced by a safe default (malformed
//!   colors, unsupported feedback).
//! - `trace`: scheduling and state transitions.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "nibble_core";
    /// Scheduler target.
    pub const SCHEDULER: &str = "nibble_core::scheduler";
    /// Accessibility engine target.
    pub const A11Y: &str = "nibble_a11y";
    /// Announcer target.
    pub const ANNOUNCER: &str = "nibble_a11y::announcer";
    /// Focus manager target.
    pub const FOCUS: &str = "nibble_a11y::focus";
    /// Arrow navigation target.
    pub const NAVIGATION: &str = "nibble_a11y::navigation";
    /// Contrast validation target.
    pub const CONTRAST: &str = "nibble_a11y::contrast";
    /// Touch-target validation target.
    pub const GEOMETRY: &str = "nibble_a11y::geometry";
    /// Interaction orchestration target.
    pub const INTERACTION: &str = "nibble_a11y::interaction";
    /// Performance spans target.
    pub const PERF: &str = "nibble::perf";
}

/// A guard for a performance tracing span.
///
/// The span is entered on creation and exited when the guard is dropped.
///
/// ```ignore
/// let _span = PerfSpan::new("touch_target_audit");
/// // ... work ...
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
