//! Rotating file sink
//!
//! [`RotatingFile`] is a plain [`io::Write`] that switches to a fresh file at
//! hour or day boundaries, or once it reaches a size limit. Time-rotated files
//! are renamed with the period they cover (`app.log.20240309-07` hourly,
//! `app.log.20240309` daily); size-rotated files are numbered `app.log.1`
//! (newest) up to the configured backup count.
//!
//! [`RotatingFileAppender`] shares one `RotatingFile` between loggers and
//! rotates on record timestamps rather than the wall clock.

use crate::core::appender::Appender;
use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone, Timelike};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix format of hourly rotated files
pub const HOURLY_SUFFIX: &str = ".%Y%m%d-%H";

/// Suffix format of daily rotated files
pub const DAILY_SUFFIX: &str = ".%Y%m%d";

/// When a [`RotatingFile`] moves on to a fresh file
///
/// # Example
///
/// ```
/// use rust_tree_logger::appenders::RotationStrategy;
///
/// let by_size = RotationStrategy::size(10 * 1024 * 1024);
/// let hourly = RotationStrategy::Hourly;
/// assert_ne!(by_size, hourly);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationStrategy {
    /// At every full hour of local time
    Hourly,
    /// At local midnight
    #[default]
    Daily,
    /// Once the file holds `max_bytes`
    Size { max_bytes: u64 },
    Never,
}

impl RotationStrategy {
    pub fn size(max_bytes: u64) -> Self {
        RotationStrategy::Size { max_bytes }
    }

    /// First boundary strictly after `t`, for time-based strategies.
    fn next_boundary(self, t: DateTime<Local>) -> Option<DateTime<Local>> {
        let date = t.date_naive();
        let naive = match self {
            RotationStrategy::Hourly => date.and_hms_opt(t.hour(), 0, 0)? + ChronoDuration::hours(1),
            RotationStrategy::Daily => date.succ_opt()?.and_hms_opt(0, 0, 0)?,
            RotationStrategy::Size { .. } | RotationStrategy::Never => return None,
        };
        // Boundaries inside a DST gap fall back to one period after `t`.
        Local
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| Some(t + self.period()?))
    }

    fn period(self) -> Option<ChronoDuration> {
        match self {
            RotationStrategy::Hourly => Some(ChronoDuration::hours(1)),
            RotationStrategy::Daily => Some(ChronoDuration::days(1)),
            _ => None,
        }
    }

    fn suffix_format(self) -> Option<&'static str> {
        match self {
            RotationStrategy::Hourly => Some(HOURLY_SUFFIX),
            RotationStrategy::Daily => Some(DAILY_SUFFIX),
            _ => None,
        }
    }
}

/// Rotation settings
///
/// # Example
///
/// ```
/// use rust_tree_logger::appenders::{RotationPolicy, RotationStrategy};
///
/// let policy = RotationPolicy::new()
///     .with_strategy(RotationStrategy::size(1024 * 1024))
///     .with_max_backups(5)
///     .with_compression(true);
/// assert_eq!(policy.max_backups, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    pub strategy: RotationStrategy,
    /// Numbered backups kept by size rotation
    pub max_backups: usize,
    /// Gzip rotated files
    pub compress: bool,
    /// Write buffer in front of the file; 0 writes straight through
    pub buffer_size: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            strategy: RotationStrategy::default(),
            max_backups: 5,
            compress: false,
            buffer_size: 0,
        }
    }
}

impl RotationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hourly() -> Self {
        Self::new().with_strategy(RotationStrategy::Hourly)
    }

    pub fn daily() -> Self {
        Self::new().with_strategy(RotationStrategy::Daily)
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_strategy(mut self, strategy: RotationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(self, max_bytes: u64) -> Self {
        self.with_strategy(RotationStrategy::Size { max_bytes })
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count.max(1);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }
}

enum Output {
    Direct(File),
    Buffered(BufWriter<File>),
}

impl Output {
    fn open(path: &Path, buffer_size: usize) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(if buffer_size > 0 {
            Output::Buffered(BufWriter::with_capacity(buffer_size, file))
        } else {
            Output::Direct(file)
        })
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Output::Direct(file) => file,
            Output::Buffered(writer) => writer,
        }
    }

    /// Flush, sync and close.
    fn close(self) -> io::Result<()> {
        let file = match self {
            Output::Direct(file) => file,
            Output::Buffered(writer) => writer.into_inner().map_err(|e| e.into_error())?,
        };
        // sync failures are not fatal for rotation
        let _ = file.sync_all();
        Ok(())
    }
}

/// File writer that rotates by time or size
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    output: Option<Output>,
    size: u64,
    next_rotation: Option<DateTime<Local>>,
}

impl RotatingFile {
    /// Open `path` for appending, creating parent directories as needed.
    pub fn new(path: impl AsRef<Path>, policy: RotationPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Failed to create log directory: {}", e),
                )
            })?;
        }

        let output = Output::open(&path, policy.buffer_size).map_err(|e| {
            LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
        })?;
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let next_rotation = policy.strategy.next_boundary(Local::now());

        Ok(Self {
            path,
            policy,
            output: Some(output),
            size,
            next_rotation,
        })
    }

    pub fn hourly(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(path, RotationPolicy::hourly())
    }

    pub fn daily(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(path, RotationPolicy::daily())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Bytes in the active file
    pub fn current_size(&self) -> u64 {
        self.size
    }

    /// Next time boundary, for time-based strategies
    pub fn next_rotation(&self) -> Option<DateTime<Local>> {
        self.next_rotation
    }

    /// Write `data` as if it were produced at `timestamp`.
    ///
    /// Rotation failures are reported on stderr and writing continues in
    /// whatever file is open.
    pub fn write_at(&mut self, timestamp: DateTime<Local>, data: &[u8]) -> Result<()> {
        if self.should_rotate(timestamp) {
            if let Err(e) = self.rotate(timestamp) {
                eprintln!("[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.", e);
            }
        }

        if self.output.is_none() {
            // a failed rotation left no file open; try once more
            let output = Output::open(&self.path, self.policy.buffer_size).map_err(|e| {
                LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("Failed to reopen after rotation failure: {}", e),
                )
            })?;
            self.size = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
            self.output = Some(output);
        }

        if let Some(output) = self.output.as_mut() {
            output.writer().write_all(data)?;
            self.size += data.len() as u64;
        }
        Ok(())
    }

    fn should_rotate(&self, timestamp: DateTime<Local>) -> bool {
        match self.policy.strategy {
            RotationStrategy::Size { max_bytes } => self.size >= max_bytes,
            RotationStrategy::Never => false,
            RotationStrategy::Hourly | RotationStrategy::Daily => {
                self.next_rotation.is_some_and(|boundary| timestamp >= boundary)
            }
        }
    }

    /// Close the active file, move it aside and open a fresh one.
    pub fn rotate(&mut self, timestamp: DateTime<Local>) -> Result<()> {
        if let Some(output) = self.output.take() {
            output.close().map_err(|e| {
                LoggerError::file_rotation(
                    self.path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let rotated = match self.policy.strategy {
            RotationStrategy::Size { .. } | RotationStrategy::Never => {
                self.shift_backups()?;
                Some(self.backup_path(1))
            }
            strategy => {
                let closed_period = self.next_rotation.and_then(|boundary| {
                    Some(boundary - strategy.period()?)
                });
                self.next_rotation = strategy.next_boundary(timestamp);
                closed_period
                    .zip(strategy.suffix_format())
                    .map(|(start, format)| self.timed_path(&start.format(format).to_string()))
            }
        };

        if let Some(target) = rotated {
            if self.path.exists() {
                fs::rename(&self.path, &target).map_err(|e| {
                    LoggerError::file_rotation(
                        self.path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;
                if self.policy.compress {
                    compress_file(&target)?;
                }
            }
        }

        let output = Output::open(&self.path, self.policy.buffer_size).map_err(|e| {
            LoggerError::file_rotation(
                self.path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.output = Some(output);
        self.size = 0;
        Ok(())
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        append_to_file_name(&self.path, &format!(".{}", index))
    }

    /// Target for a time-rotated file, never overwriting an existing one.
    fn timed_path(&self, suffix: &str) -> PathBuf {
        let base = append_to_file_name(&self.path, suffix);
        let taken = |p: &Path| p.exists() || gz_path(p).exists();
        if !taken(base.as_path()) {
            return base;
        }
        (1..)
            .map(|n| append_to_file_name(&base, &format!(".{}", n)))
            .find(|p| !taken(p.as_path()))
            .unwrap_or(base)
    }

    /// Make room for a new `.1`, dropping the oldest backup.
    fn shift_backups(&self) -> Result<()> {
        let max = self.policy.max_backups;
        for oldest in [self.backup_path(max), gz_path(&self.backup_path(max))] {
            if oldest.exists() {
                if let Err(e) = fs::remove_file(&oldest) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove oldest backup {}: {}",
                        oldest.display(),
                        e
                    );
                }
            }
        }

        for i in (1..max).rev() {
            let (from, to) = (self.backup_path(i), self.backup_path(i + 1));
            for (from, to) in [(gz_path(&from), gz_path(&to)), (from, to)] {
                if from.exists() {
                    fs::rename(&from, &to).map_err(|e| {
                        LoggerError::file_rotation(
                            from.display().to_string(),
                            format!("Failed to rotate backup files: {}", e),
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    fn flush_output(&mut self) -> io::Result<()> {
        match self.output.as_mut() {
            Some(output) => output.writer().flush(),
            None => Ok(()),
        }
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_at(Local::now(), buf).map_err(io::Error::from)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_output()
    }
}

impl Drop for RotatingFile {
    fn drop(&mut self) {
        if let Some(output) = self.output.take() {
            if let Err(e) = output.close() {
                eprintln!("[LOGGER ERROR] Failed to close {}: {}", self.path.display(), e);
            }
        }
    }
}

fn append_to_file_name(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "app.log".into());
    name.push(suffix);
    path.with_file_name(name)
}

fn gz_path(path: &Path) -> PathBuf {
    append_to_file_name(path, ".gz")
}

/// Gzip `path` into `path.gz`, removing the original only on success.
fn compress_file(path: &Path) -> Result<()> {
    let gz = gz_path(path);
    let temp = append_to_file_name(&gz, ".tmp");

    let compress = || -> io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&temp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());

        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&temp, &gz)
    };

    if let Err(e) = compress() {
        let _ = fs::remove_file(&temp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

/// Appender over a shared [`RotatingFile`]
///
/// # Example
///
/// ```no_run
/// use rust_tree_logger::appenders::{RotatingFileAppender, RotationPolicy};
/// use rust_tree_logger::prelude::*;
/// use std::sync::Arc;
///
/// let appender = RotatingFileAppender::new("logs/app.log", RotationPolicy::hourly()).unwrap();
/// let logger = Logger::builder().appender(Arc::new(appender)).build();
/// logger.info("rotates every hour");
/// ```
pub struct RotatingFileAppender {
    file: Mutex<RotatingFile>,
}

impl RotatingFileAppender {
    pub fn new(path: impl AsRef<Path>, policy: RotationPolicy) -> Result<Self> {
        Ok(Self::from_file(RotatingFile::new(path, policy)?))
    }

    pub fn hourly(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(path, RotationPolicy::hourly())
    }

    pub fn daily(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(path, RotationPolicy::daily())
    }

    pub fn from_file(file: RotatingFile) -> Self {
        Self {
            file: Mutex::new(file),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.lock().path().to_path_buf()
    }

    pub fn current_size(&self) -> u64 {
        self.file.lock().current_size()
    }
}

impl Appender for RotatingFileAppender {
    fn output(&self, _level: LogLevel, timestamp: DateTime<Local>, data: &[u8]) -> Result<()> {
        self.file.lock().write_at(timestamp, data)
    }

    fn flush(&self) -> Result<()> {
        Ok(self.file.lock().flush_output()?)
    }

    fn name(&self) -> &str {
        "rotating_file"
    }
}
