//! Appender trait for log output destinations

use super::{error::Result, log_level::LogLevel};
use chrono::{DateTime, Local};

/// Destination for rendered log lines.
///
/// Appenders are shared between logger nodes, so `output` takes `&self` and
/// implementations serialise internally. `data` is already newline-terminated
/// and must not be retained past the call.
pub trait Appender: Send + Sync {
    fn output(&self, level: LogLevel, timestamp: DateTime<Local>, data: &[u8]) -> Result<()>;

    /// Push buffered output to its final destination.
    ///
    /// Appenders without buffering keep the default no-op.
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
