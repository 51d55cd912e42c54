//! Console appender implementation

use crate::core::{Appender, LogLevel, Result};
use chrono::{DateTime, Local};
use colored::Colorize;
use std::io::{self, Write};

/// Writes rendered lines to standard output.
///
/// The stdout lock is held for the whole line, so lines from concurrent
/// loggers never interleave.
pub struct ConsoleAppender {
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    /// Colour each line by its level
    ///
    /// # Example
    ///
    /// ```
    /// use rust_tree_logger::appenders::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::with_colors(true);
    /// ```
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn output(&self, level: LogLevel, _timestamp: DateTime<Local>, data: &[u8]) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if self.use_colors {
            let text = String::from_utf8_lossy(data);
            let line = text.trim_end_matches('\n');
            writeln!(stdout, "{}", line.color(level.color_code()))?;
        } else {
            stdout.write_all(data)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
