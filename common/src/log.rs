//! Logging shorthands.
//!
//! Thin wrappers over `tracing` so every crate tags terminal output the same
//! way. `success!` uses its own target so the CLI formatter can render it with
//! a distinct symbol.

pub const SUCCESS_TARGET: &str = "linkcheck::success";
pub const PRINT_TARGET: &str = "linkcheck::print";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "linkcheck::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
