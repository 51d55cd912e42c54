//! In-memory appender

use crate::core::{Appender, LogLevel, Result};
use chrono::{DateTime, Local};
use parking_lot::Mutex;

/// Keeps every record it receives
///
/// # Example
///
/// ```
/// use rust_tree_logger::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemoryAppender::new());
/// let logger = Logger::builder().format("%l %m").appender(memory.clone()).build();
/// logger.warn("disk almost full");
/// assert_eq!(memory.lines(), vec!["WARN disk almost full\n".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryAppender {
    records: Mutex<Vec<(LogLevel, Vec<u8>)>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far, in arrival order
    pub fn records(&self) -> Vec<(LogLevel, Vec<u8>)> {
        self.records.lock().clone()
    }

    /// Received data as (lossy) UTF-8 strings
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|(_, data)| String::from_utf8_lossy(data).into_owned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn output(&self, level: LogLevel, _timestamp: DateTime<Local>, data: &[u8]) -> Result<()> {
        self.records.lock().push((level, data.to_vec()));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
