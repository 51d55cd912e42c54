//! Core logger types and traits

pub mod appender;
pub mod async_writer;
pub mod caller;
pub mod config;
pub mod error;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod pattern;
pub mod rate_limit;
pub mod record;
pub mod snapshot;

pub use appender::Appender;
pub use async_writer::{
    AsyncWriter, DEFAULT_SHUTDOWN_TIMEOUT, FREE_LIST_CAPACITY, REQUEST_QUEUE_CAPACITY,
};
pub use caller::CallSite;
pub use config::{LoggerConfig, RateLimitConfig};
pub use error::{LoggerError, Result};
pub use log_level::{LogLevel, LEVEL_COUNT};
pub use logger::{
    CascadePolicy, ErrorCallback, Logger, LoggerBuilder, DEFAULT_LEVEL, FATAL_EXIT_CODE,
};
pub use metrics::LoggerMetrics;
pub use pattern::DEFAULT_FORMAT;
pub use rate_limit::RateLimiter;
pub use record::Record;
pub use snapshot::{Axis, DetachSet, Snapshot};
