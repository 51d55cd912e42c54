//! Per-level rate limiting
//!
//! [`RateLimiter`] is a token bucket expressed in its GCRA form: instead of a
//! token count refilled on a timer, it tracks the theoretical arrival time of
//! the next conforming record in one atomic word. Acquiring a token is a CAS
//! loop, so emission paths never block on it.

use super::error::{LoggerError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Token bucket shared by every logger node that routes a level through it.
///
/// # Example
///
/// ```
/// use rust_tree_logger::RateLimiter;
///
/// let limiter = RateLimiter::per_second(1);
/// assert!(limiter.try_acquire());
/// assert!(!limiter.try_acquire());
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    per_second: f64,
    burst: u32,
    /// Nanoseconds between two tokens.
    interval: u64,
    /// Nanoseconds of credit a full bucket represents.
    capacity: u64,
    origin: Instant,
    /// Theoretical arrival time, nanoseconds since `origin`.
    tat: AtomicU64,
}

impl RateLimiter {
    /// Create a bucket refilled at `per_second` tokens per second holding at
    /// most `burst` tokens. The bucket starts full.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the rate is not a positive finite
    /// number or `burst` is zero.
    pub fn new(per_second: f64, burst: u32) -> Result<Self> {
        if !per_second.is_finite() || per_second <= 0.0 {
            return Err(LoggerError::config(
                "RateLimiter",
                format!("rate must be a positive number, got {}", per_second),
            ));
        }
        if burst == 0 {
            return Err(LoggerError::config("RateLimiter", "burst must be at least 1"));
        }

        let interval = ((NANOS_PER_SEC / per_second).round() as u64).max(1);
        Ok(Self {
            per_second,
            burst,
            interval,
            capacity: interval.saturating_mul(u64::from(burst)),
            origin: Instant::now(),
            tat: AtomicU64::new(0),
        })
    }

    /// `n` tokens per second with a burst of `n`; `n` of zero is treated as one.
    pub fn per_second(n: u32) -> Self {
        let n = n.max(1);
        let interval = ((NANOS_PER_SEC / f64::from(n)).round() as u64).max(1);
        Self {
            per_second: f64::from(n),
            burst: n,
            interval,
            capacity: interval.saturating_mul(u64::from(n)),
            origin: Instant::now(),
            tat: AtomicU64::new(0),
        }
    }

    pub fn rate(&self) -> f64 {
        self.per_second
    }

    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Take one token if available. Never blocks.
    pub fn try_acquire(&self) -> bool {
        let now = u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.try_acquire_at(now)
    }

    pub(crate) fn try_acquire_at(&self, now: u64) -> bool {
        let mut tat = self.tat.load(Ordering::Acquire);
        loop {
            let next = tat.max(now).saturating_add(self.interval);
            if next - now > self.capacity {
                return false;
            }
            match self
                .tat
                .compare_exchange_weak(tat, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return true,
                Err(actual) => tat = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    const SEC: u64 = 1_000_000_000;

    #[test]
    fn test_one_per_second_drops_back_to_back() {
        let limiter = RateLimiter::per_second(1);
        assert!(limiter.try_acquire_at(0));
        assert!(!limiter.try_acquire_at(1));
        assert!(!limiter.try_acquire_at(SEC / 2));
        assert!(limiter.try_acquire_at(SEC));
    }

    #[test]
    fn test_burst_then_refill() {
        let limiter = RateLimiter::new(2.0, 3).unwrap();
        assert!(limiter.try_acquire_at(0));
        assert!(limiter.try_acquire_at(0));
        assert!(limiter.try_acquire_at(0));
        assert!(!limiter.try_acquire_at(0));

        // one token every 500ms
        assert!(limiter.try_acquire_at(SEC / 2));
        assert!(!limiter.try_acquire_at(SEC / 2));
    }

    #[test]
    fn test_idle_time_does_not_exceed_burst() {
        let limiter = RateLimiter::new(10.0, 2).unwrap();
        let later = 60 * SEC;
        assert!(limiter.try_acquire_at(later));
        assert!(limiter.try_acquire_at(later));
        assert!(!limiter.try_acquire_at(later));
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(RateLimiter::new(0.0, 1).is_err());
        assert!(RateLimiter::new(-1.0, 1).is_err());
        assert!(RateLimiter::new(f64::NAN, 1).is_err());
        assert!(RateLimiter::new(1.0, 0).is_err());
    }

    #[test]
    fn test_concurrent_acquire_respects_burst() {
        let limiter = Arc::new(RateLimiter::new(0.001, 5).unwrap());
        let granted = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let granted = Arc::clone(&granted);
                thread::spawn(move || {
                    for _ in 0..100 {
                        if limiter.try_acquire() {
                            granted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(granted.load(Ordering::Relaxed), 5);
    }
}
