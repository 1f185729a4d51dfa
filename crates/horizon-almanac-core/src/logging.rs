//! Logging facilities for Horizon Almanac.
//!
//! Horizon Almanac uses the `tracing` crate for instrumentation. To see
//! logs, install a tracing subscriber in your application:
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

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_almanac_core";
    /// Signal system target.
    pub const SIGNAL: &str = "horizon_almanac_core::signal";
    /// Calendar adapter target.
    pub const ADAPTER: &str = "horizon_almanac::adapter";
    /// Selection engine target.
    pub const SELECTION: &str = "horizon_almanac::selection";
    /// Navigation controller target.
    pub const NAVIGATION: &str = "horizon_almanac::navigation";
    /// Visible-window computation target.
    pub const WINDOW: &str = "horizon_almanac::window";
}

/// Macros for common tracing patterns.
///
/// These are re-exported for convenience but are just wrappers around
/// the `tracing` crate macros with consistent target naming.
#[macro_export]
macro_rules! almanac_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_almanac", $($arg)*)
    };
}

#[macro_export]
macro_rules! almanac_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_almanac", $($arg)*)
    };
}

#[macro_export]
macro_rules! almanac_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_almanac", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_namespaced() {
        assert!(targets::SIGNAL.starts_with(targets::CORE));
        assert!(targets::SELECTION.starts_with("horizon_almanac"));
        assert!(targets::NAVIGATION.starts_with("horizon_almanac"));
    }

    #[test]
    fn test_macros_expand_without_subscriber() {
        // No subscriber installed: these must be silent no-ops.
        crate::almanac_trace!("trace message");
        crate::almanac_debug!(value = 42, "debug message");
        crate::almanac_warn!("warn message");
    }
}
