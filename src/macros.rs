//! Logging macros for ergonomic log message formatting.
//!
//! These macros build their arguments with `format_args!`, so nothing is
//! formatted when the level is disabled on the target logger.
//!
//! # Examples
//!
//! ```
//! use rust_tree_logger::prelude::*;
//! use rust_tree_logger::info;
//!
//! let logger = Logger::builder().exit_on_fatal(false).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_tree_logger::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_tree_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format_args!($($arg)+))
    };
}

/// Log a trace-level message.
///
/// ```
/// # use rust_tree_logger::prelude::*;
/// # let logger = Logger::builder().level(LogLevel::Trace).build();
/// use rust_tree_logger::trace;
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use rust_tree_logger::prelude::*;
/// # let logger = Logger::builder().build();
/// use rust_tree_logger::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Terminates the process afterwards unless exit-on-fatal is disabled for
/// the logger's tree.
///
/// ```
/// # use rust_tree_logger::prelude::*;
/// # let logger = Logger::builder().exit_on_fatal(false).build();
/// use rust_tree_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
