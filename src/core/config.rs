//! Serializable logger configuration
//!
//! A [`LoggerConfig`] describes everything about a root logger except its
//! appenders, which are live objects. Load one from JSON and hand it to
//! [`LoggerBuilder::from_config`](crate::LoggerBuilder::from_config).
//!
//! ```
//! use rust_tree_logger::prelude::*;
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "level": "WARN",
//!     "formats": { "ERROR": "%F %T [%l] %c:%L %m" },
//!     "rate_limits": { "ERROR": { "per_second": 5.0, "burst": 10 } },
//!     "exit_on_fatal": false
//! }"#).unwrap();
//!
//! let logger = LoggerBuilder::from_config(&config).unwrap().build();
//! assert_eq!(logger.level(), LogLevel::Warn);
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::logger::{CascadePolicy, DEFAULT_LEVEL};
use super::pattern::DEFAULT_FORMAT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Token bucket parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub per_second: f64,
    pub burst: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub name: String,
    pub level: LogLevel,
    /// Pattern for every level without an entry in `formats`
    pub format: String,
    pub formats: BTreeMap<LogLevel, String>,
    pub call_depth: usize,
    pub rate_limits: BTreeMap<LogLevel, RateLimitConfig>,
    pub exit_on_fatal: bool,
    pub cascade: CascadePolicy,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            level: DEFAULT_LEVEL,
            format: DEFAULT_FORMAT.to_string(),
            formats: BTreeMap::new(),
            call_depth: 0,
            rate_limits: BTreeMap::new(),
            exit_on_fatal: true,
            cascade: CascadePolicy::default(),
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
