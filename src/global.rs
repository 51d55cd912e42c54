//! Process-wide default logger
//!
//! The default root is created on first use with level DEBUG, the default
//! pattern and a [`ConsoleAppender`]. Loggers obtained through [`new`] are its
//! children, so settings applied through this module cascade to them.
//!
//! ```
//! use rust_tree_logger::{global, LogLevel};
//!
//! global::set_exit_on_fatal(false);
//! let db = global::new("db");
//! global::set_level(LogLevel::Warn);
//! assert_eq!(db.level(), LogLevel::Warn);
//! ```

use crate::appenders::ConsoleAppender;
use crate::core::{Appender, LogLevel, Logger, RateLimiter, Result};
use std::fmt;
use std::sync::{Arc, OnceLock};

static ROOT: OnceLock<Logger> = OnceLock::new();

/// The process-wide root logger
pub fn root() -> &'static Logger {
    ROOT.get_or_init(|| {
        Logger::builder()
            .appender(Arc::new(ConsoleAppender::new()))
            .build()
    })
}

/// Derive a child of the process-wide root
pub fn new(name: impl Into<String>) -> Logger {
    root().new_child(name)
}

pub fn set_level(level: LogLevel) {
    root().set_level(level);
}

pub fn set_appender(appender: Arc<dyn Appender>, levels: &[LogLevel]) {
    root().set_appender(appender, levels);
}

pub fn set_format(pattern: &str, levels: &[LogLevel]) {
    root().set_format(pattern, levels);
}

pub fn set_call_depth(depth: usize) {
    root().set_call_depth(depth);
}

pub fn set_rate_limit(limiter: Arc<RateLimiter>, levels: &[LogLevel]) {
    root().set_rate_limit(limiter, levels);
}

pub fn is_debug_enabled() -> bool {
    root().is_debug_enabled()
}

/// Toggle process termination after FATAL records on the default tree
pub fn set_exit_on_fatal(enabled: bool) {
    root().set_exit_on_fatal(enabled);
}

pub fn flush() -> Result<()> {
    root().flush()
}

#[track_caller]
pub fn log(level: LogLevel, args: fmt::Arguments<'_>) {
    root().log(level, args);
}

#[track_caller]
pub fn fatal(message: impl fmt::Display) {
    root().fatal(message);
}

#[track_caller]
pub fn error(message: impl fmt::Display) {
    root().error(message);
}

#[track_caller]
pub fn warn(message: impl fmt::Display) {
    root().warn(message);
}

#[track_caller]
pub fn info(message: impl fmt::Display) {
    root().info(message);
}

#[track_caller]
pub fn debug(message: impl fmt::Display) {
    root().debug(message);
}

#[track_caller]
pub fn trace(message: impl fmt::Display) {
    root().trace(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_LEVEL;

    // The root is shared by every test in this binary; only read-only
    // properties and fresh children are checked here.
    #[test]
    fn test_root_is_singleton() {
        assert!(std::ptr::eq(root(), root()));
        assert!(root().parent().is_none());
    }

    #[test]
    fn test_children_inherit_from_root() {
        let child = new("global-child");
        assert_eq!(child.parent().unwrap().name(), root().name());
        assert!(child.snapshot().route(DEFAULT_LEVEL).is_some());
    }
}
