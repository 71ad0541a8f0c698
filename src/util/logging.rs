//! Standardized logging utility for Strata
//!
//! This module provides the `slog!` macro which ensures hot-path logs
//! follow the `YYYY-MM-DD HH:MM:SS [MODULE] Message` format and are routed
//! through `tracing` at debug level.

#[macro_export]
macro_rules! slog {
    ($module:expr, $($arg:tt)*) => {{
        let now = chrono::Local::now();
        tracing::debug!(
            "{} [{}] {}",
            now.format("%Y-%m-%d %H:%M:%S"),
            $module,
            format!($($arg)*)
        );
    }};
}

/// Standardized module identifiers
pub const MAIN: &str = "MAIN";
pub const CONFIG: &str = "CONFIG";
pub const WINDOW: &str = "WINDOW";
pub const PLACEMENT: &str = "PLACEMENT";
pub const OUTPUT: &str = "OUTPUT";
pub const INPUT: &str = "INPUT";
pub const SEAT: &str = "SEAT";
pub const GRAB: &str = "GRAB";
pub const RENDER: &str = "RENDER";
pub const ANIMATION: &str = "ANIMATION";
