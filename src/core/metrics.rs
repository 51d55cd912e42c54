//! Logger metrics for observability
//!
//! Counts what happened to records that passed the level check on a logger
//! node: delivered, dropped by the rate limiter, dropped for lack of a route,
//! or rejected by the appender.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-node emission counters
///
/// # Example
///
/// ```
/// use rust_tree_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_logged();
/// metrics.record_rate_limited();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.rate_limited(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted by their appender
    total_logged: AtomicU64,

    /// Records dropped because the level's token bucket was empty
    rate_limited: AtomicU64,

    /// Records dropped because no appender was routed for the level
    unrouted: AtomicU64,

    /// Records the appender failed to accept
    sink_errors: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            rate_limited: AtomicU64::new(0),
            unrouted: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rate_limited(&self) -> u64 {
        self.rate_limited.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn unrouted(&self) -> u64 {
        self.unrouted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    /// Every record that passed the level check but never reached an appender
    pub fn dropped_count(&self) -> u64 {
        self.rate_limited() + self.unrouted() + self.sink_errors()
    }

    /// Record a delivered entry, returning the previous count
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rate_limited(&self) -> u64 {
        self.rate_limited.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_unrouted(&self) -> u64 {
        self.unrouted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no logs have been processed.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.total_logged() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.rate_limited.store(0, Ordering::Relaxed);
        self.unrouted.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            rate_limited: AtomicU64::new(self.rate_limited()),
            unrouted: AtomicU64::new(self.unrouted()),
            sink_errors: AtomicU64::new(self.sink_errors()),
        }
    }
}
