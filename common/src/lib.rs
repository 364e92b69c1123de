//! # Macshift Common
//!
//! Types shared by every crate in the workspace:
//!
//! * **[`models`]**: hardware addresses and backup records.
//! * **[`vendors`]**: the vendor prefix table and the [`vendors::VendorRepository`] port.
//! * **[`config`]**: runtime configuration resolved once at start-up.
//! * **[`error`]**: the error taxonomy crossing component boundaries.
//!
//! The logging macros below route through `tracing` with reserved targets, so the
//! CLI formatter can render them differently from plain log levels.

pub mod config;
pub mod error;
pub mod models;
pub mod vendors;

#[doc(hidden)]
pub use tracing as __tracing;

/// Target for raw lines printed without a status symbol.
pub const PRINT_TARGET: &str = "macshift::print";

/// Target for success lines.
pub const SUCCESS_TARGET: &str = "macshift::success";

/// Prints a raw line through the logging pipeline.
#[macro_export]
macro_rules! mprint {
    () => {
        $crate::__tracing::info!(target: "macshift::print", "")
    };
    ($($arg:tt)+) => {
        $crate::__tracing::info!(target: "macshift::print", $($arg)+)
    };
}

/// Reports a completed operation.
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        $crate::__tracing::info!(target: "macshift::success", $($arg)+)
    };
}
