//! Immutable per-node configuration
//!
//! A [`Snapshot`] is never modified after it has been published on a logger
//! node. Mutators clone the current snapshot, edit the clone and publish it
//! with a single pointer swap.

use super::appender::Appender;
use super::log_level::{LogLevel, LEVEL_COUNT};
use super::rate_limit::RateLimiter;
use std::fmt;
use std::sync::Arc;

/// One independently inheritable piece of configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Level,
    CallDepth,
    Route,
    Format,
    RateLimit,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Level,
        Axis::CallDepth,
        Axis::Route,
        Axis::Format,
        Axis::RateLimit,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Axes whose value was set directly on a node and is therefore no longer
/// overwritten by cascades from its ancestors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetachSet(u8);

impl DetachSet {
    pub const fn empty() -> Self {
        DetachSet(0)
    }

    pub fn contains(self, axis: Axis) -> bool {
        self.0 & axis.bit() != 0
    }

    pub fn insert(&mut self, axis: Axis) {
        self.0 |= axis.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Effective configuration of one logger node at one point in time.
#[derive(Clone)]
pub struct Snapshot {
    pub(crate) level: LogLevel,
    pub(crate) call_depth: usize,
    pub(crate) routes: [Option<Arc<dyn Appender>>; LEVEL_COUNT],
    pub(crate) formats: [Option<Arc<str>>; LEVEL_COUNT],
    pub(crate) rate_limits: [Option<Arc<RateLimiter>>; LEVEL_COUNT],
    pub(crate) detached: DetachSet,
}

impl Snapshot {
    pub(crate) fn new(level: LogLevel) -> Self {
        Self {
            level,
            call_depth: 0,
            routes: Default::default(),
            formats: Default::default(),
            rate_limits: Default::default(),
            detached: DetachSet::empty(),
        }
    }

    /// Copy handed to a freshly derived child: everything inherited, nothing
    /// sticky, call depth back to the caller's own frame.
    pub(crate) fn derive(&self) -> Self {
        Self {
            call_depth: 0,
            detached: DetachSet::empty(),
            ..self.clone()
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub fn route(&self, level: LogLevel) -> Option<&Arc<dyn Appender>> {
        self.routes[level.index()].as_ref()
    }

    pub fn format(&self, level: LogLevel) -> Option<&str> {
        self.formats[level.index()].as_deref()
    }

    pub fn rate_limit(&self, level: LogLevel) -> Option<&Arc<RateLimiter>> {
        self.rate_limits[level.index()].as_ref()
    }

    pub fn is_detached(&self, axis: Axis) -> bool {
        self.detached.contains(axis)
    }

    pub fn detached(&self) -> DetachSet {
        self.detached
    }

    /// Routed appenders with duplicates (by identity) removed.
    pub fn distinct_appenders(&self) -> Vec<Arc<dyn Appender>> {
        let mut out: Vec<Arc<dyn Appender>> = Vec::with_capacity(LEVEL_COUNT);
        for appender in self.routes.iter().flatten() {
            if !out.iter().any(|seen| Arc::ptr_eq(seen, appender)) {
                out.push(Arc::clone(appender));
            }
        }
        out
    }

    pub(crate) fn set_routes(&mut self, appender: Option<Arc<dyn Appender>>, levels: &[LogLevel]) {
        for level in selected(levels) {
            self.routes[level.index()] = appender.clone();
        }
    }

    pub(crate) fn set_formats(&mut self, pattern: &Arc<str>, levels: &[LogLevel]) {
        for level in selected(levels) {
            self.formats[level.index()] = Some(Arc::clone(pattern));
        }
    }

    pub(crate) fn set_rate_limits(
        &mut self,
        limiter: Option<Arc<RateLimiter>>,
        levels: &[LogLevel],
    ) {
        for level in selected(levels) {
            self.rate_limits[level.index()] = limiter.clone();
        }
    }
}

/// An empty level list addresses every level.
fn selected(levels: &[LogLevel]) -> &[LogLevel] {
    if levels.is_empty() {
        &LogLevel::ALL
    } else {
        levels
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<Option<&str>> = self
            .routes
            .iter()
            .map(|r| r.as_ref().map(|a| a.name()))
            .collect();
        f.debug_struct("Snapshot")
            .field("level", &self.level)
            .field("call_depth", &self.call_depth)
            .field("routes", &routes)
            .field("formats", &self.formats)
            .field("rate_limits", &self.rate_limits)
            .field("detached", &self.detached)
            .finish()
    }
}
