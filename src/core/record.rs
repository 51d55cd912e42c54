//! A single emission as seen by the pattern renderer

use super::caller::CallSite;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::fmt;
use std::panic::Location;

/// Everything a pattern may reference for one emission.
///
/// Records borrow the caller's format arguments, so they only live for the
/// duration of the emission.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub logger: &'a str,
    pub args: fmt::Arguments<'a>,
    /// Where the record is attributed, after the logger's call depth
    pub caller: CallSite,
}

impl<'a> Record<'a> {
    #[track_caller]
    pub fn new(level: LogLevel, logger: &'a str, args: fmt::Arguments<'a>) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            logger,
            args,
            caller: Location::caller().into(),
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: CallSite) -> Self {
        self.caller = caller;
        self
    }

    /// Path of the calling source file
    pub fn file(&self) -> &str {
        self.caller.file()
    }

    pub fn line(&self) -> u32 {
        self.caller.line()
    }
}
