//! Error types for the logger system

use std::io;
use std::sync::Arc;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Sticky fault latched by an asynchronous writer
    ///
    /// Every call on the faulted writer returns a clone of the same `Arc`
    /// until the writer is reset.
    #[error("Asynchronous writer fault: {0}")]
    WriterFault(#[source] Arc<io::Error>),

    /// The asynchronous writer's worker is gone
    #[error("Asynchronous writer closed")]
    WriterClosed,

    /// Flush was not confirmed by the worker in time
    #[error("Flush not confirmed within {0:?}")]
    FlushTimeout(Duration),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// The latched writer fault, if this error is one
    pub fn as_writer_fault(&self) -> Option<&Arc<io::Error>> {
        match self {
            LoggerError::WriterFault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<LoggerError> for io::Error {
    fn from(err: LoggerError) -> Self {
        match err {
            LoggerError::IoError(e) => e,
            LoggerError::IoOperation { source, .. } => source,
            LoggerError::WriterFault(fault) => io::Error::new(fault.kind(), fault.to_string()),
            LoggerError::WriterClosed => io::Error::new(io::ErrorKind::BrokenPipe, err),
            LoggerError::FlushTimeout(_) => io::Error::new(io::ErrorKind::TimedOut, err),
            other => io::Error::other(other),
        }
    }
}
