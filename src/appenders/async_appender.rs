//! Appender over an [`AsyncWriter`]
//!
//! Rendered lines are copied into the writer's buffer on the emitting
//! thread; the blocking write happens on the writer's worker.

use crate::core::{Appender, AsyncWriter, LogLevel, Result};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::io::Write;
use std::time::Duration;

/// Default buffer size of an [`AsyncAppender`]
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// # Example
///
/// ```
/// use rust_tree_logger::appenders::AsyncAppender;
/// use rust_tree_logger::prelude::*;
/// use std::sync::Arc;
///
/// let appender = Arc::new(AsyncAppender::new(std::io::sink()).unwrap());
/// let logger = Logger::builder().appender(appender.clone()).build();
/// logger.info("buffered");
/// logger.flush().unwrap();
/// ```
pub struct AsyncAppender {
    writer: Mutex<AsyncWriter>,
}

impl AsyncAppender {
    pub fn new<W: Write + Send + 'static>(sink: W) -> Result<Self> {
        Self::with_buffer_size(sink, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size<W: Write + Send + 'static>(sink: W, size: usize) -> Result<Self> {
        Ok(Self::from_writer(AsyncWriter::new(sink, size)?))
    }

    pub fn from_writer(writer: AsyncWriter) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Flush, waiting at most `timeout` for the worker
    pub fn flush_timeout(&self, timeout: Duration) -> Result<()> {
        self.writer.lock().flush_timeout(timeout)
    }

    /// Clear a latched fault and continue on `sink`; buffered data is dropped
    pub fn reset<W: Write + Send + 'static>(&self, sink: W) {
        self.writer.lock().reset(sink);
    }

    pub fn close(&self) -> Result<()> {
        self.writer.lock().close()
    }

    /// Run `f` with exclusive access to the underlying writer
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut AsyncWriter) -> R) -> R {
        f(&mut self.writer.lock())
    }
}

impl Appender for AsyncAppender {
    fn output(&self, _level: LogLevel, _timestamp: DateTime<Local>, data: &[u8]) -> Result<()> {
        self.writer.lock().write(data).map(|_| ())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()
    }

    fn name(&self) -> &str {
        "async"
    }
}
