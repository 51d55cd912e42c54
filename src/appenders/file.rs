//! File appender implementation

use crate::core::{Appender, LogLevel, LoggerError, Result};
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends rendered lines to a single file
pub struct FileAppender {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileAppender {
    /// Open `path` in append mode, creating it and its parent directories.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_tree_logger::appenders::FileAppender;
    ///
    /// let appender = FileAppender::new("/var/log/app.log").unwrap();
    /// ```
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to create log directory: {}", e),
                )
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn output(&self, _level: LogLevel, _timestamp: DateTime<Local>, data: &[u8]) -> Result<()> {
        self.writer.lock().write_all(data)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        if let Err(e) = self.writer.get_mut().flush() {
            eprintln!("[LOGGER ERROR] Failed to flush {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_appender_writes_and_flushes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs/app.log");
        let appender = FileAppender::new(&path).unwrap();

        appender.output(LogLevel::Info, Local::now(), b"one\n").unwrap();
        appender.output(LogLevel::Warn, Local::now(), b"two\n").unwrap();
        appender.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_file_appender_appends_to_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "existing\n").unwrap();

        {
            let appender = FileAppender::new(&path).unwrap();
            appender.output(LogLevel::Info, Local::now(), b"added\n").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "existing\nadded\n");
    }
}
