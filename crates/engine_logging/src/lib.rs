#![deny(missing_docs)]
//! Shared logging utilities for the metafetch workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a thread-local search-session tag that log lines can carry, and a minimal
//! test initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Search session currently being dispatched on this thread (0 = none).
    static SEARCH_SESSION: Cell<u64> = const { Cell::new(0) };
}

/// Records the search session being processed on the current thread.
/// The app calls this before dispatching each message to the core.
pub fn set_search_session(session: u64) {
    SEARCH_SESSION.with(|v| v.set(session));
}

/// Retrieves the search session recorded for the current thread.
/// Returns 0 if no search has started yet.
pub fn search_session() -> u64 {
    SEARCH_SESSION.with(|v| v.get())
}

/// Short tag for log lines, e.g. `search#3`, or `search#-` before the first search.
pub fn session_tag() -> String {
    match search_session() {
        0 => "search#-".to_string(),
        id => format!("search#{id}"),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
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
