#![deny(missing_docs)]
//! Shared logging utilities for the keeper workspace.
//!
//! This crate provides the `keeper_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Log targets follow the
//! crate path, so poller output can be filtered with `keeper_engine::poller`.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! keeper_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! keeper_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! keeper_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! keeper_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! keeper_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Parses a level name (`trace`, `debug`, `info`, `warn`, `error`, `off`).
///
/// Unknown names yield `None` so callers can fall back to their own default.
pub fn parse_level(name: &str) -> Option<log::LevelFilter> {
    name.trim().parse().ok()
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]);
}
