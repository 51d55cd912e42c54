//! # Rust Tree Logger
//!
//! Hierarchical logging with lock-free configuration reads and an
//! asynchronous double-buffered writer.
//!
//! ## Features
//!
//! - **Logger trees**: children inherit their parent's level, routes, formats,
//!   rate limits and call depth, and keep following later changes until they
//!   override a setting themselves
//! - **Lock-free emission**: every record reads one immutable snapshot
//! - **Per-level routing**: each level has its own appender, pattern and
//!   optional token-bucket rate limit
//! - **Async output**: [`AsyncWriter`] moves blocking writes onto a worker
//!   thread, with a sticky fault that callers can observe and clear
//!
//! ## Example
//!
//! ```
//! use rust_tree_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryAppender::new());
//! let root = Logger::builder()
//!     .format("[%l] %N: %m")
//!     .appender(memory.clone())
//!     .build();
//!
//! let http = root.new_child("http");
//! http.info("listening");
//! root.set_level(LogLevel::Warn);
//! http.info("suppressed");
//!
//! assert_eq!(memory.lines(), vec!["[INFO] http: listening\n".to_string()]);
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{
        AsyncAppender, ConsoleAppender, FileAppender, MemoryAppender, RotatingFile,
        RotatingFileAppender, RotationPolicy, RotationStrategy,
    };
    pub use crate::core::{
        Appender, AsyncWriter, CascadePolicy, ErrorCallback, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, RateLimiter, Result,
    };
}

pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender};
pub use crate::core::{
    Appender, AsyncWriter, Axis, CallSite, CascadePolicy, ErrorCallback, LogLevel, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, RateLimitConfig, RateLimiter, Record, Result,
    Snapshot, DEFAULT_FORMAT, DEFAULT_LEVEL, DEFAULT_SHUTDOWN_TIMEOUT, FATAL_EXIT_CODE,
};
