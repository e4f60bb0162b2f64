//! Logger metrics for observability
//!
//! Delivery is best effort, so these counters are the only way to see how
//! many records were persisted, how many were lost to I/O failures, and how
//! hard the rotation path is working.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_rotating_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_logged();
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.total_logged(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records whose persistence failed
    dropped_count: AtomicU64,

    /// Records fully processed without error
    total_logged: AtomicU64,

    /// Completed file rotations
    rotations: AtomicU64,

    /// Cycles handed to the background spawner
    background_dispatched: AtomicU64,

    /// Background cycles run inline because the spawner failed or discarded them
    inline_fallbacks: AtomicU64,

    /// Console echo or extra appender writes that failed
    appender_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dropped_count: AtomicU64::new(0),
            total_logged: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            background_dispatched: AtomicU64::new(0),
            inline_fallbacks: AtomicU64::new(0),
            appender_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn background_dispatched(&self) -> u64 {
        self.background_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn inline_fallbacks(&self) -> u64 {
        self.inline_fallbacks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn appender_failures(&self) -> u64 {
        self.appender_failures.load(Ordering::Relaxed)
    }

    /// Record a dropped log, returning the previous count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rotation(&self) -> u64 {
        self.rotations.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_background_dispatch(&self) -> u64 {
        self.background_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_inline_fallback(&self) -> u64 {
        self.inline_fallbacks.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_appender_failure(&self) -> u64 {
        self.appender_failures.fetch_add(1, Ordering::Relaxed)
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
        self.dropped_count.store(0, Ordering::Relaxed);
        self.total_logged.store(0, Ordering::Relaxed);
        self.rotations.store(0, Ordering::Relaxed);
        self.background_dispatched.store(0, Ordering::Relaxed);
        self.inline_fallbacks.store(0, Ordering::Relaxed);
        self.appender_failures.store(0, Ordering::Relaxed);
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
            dropped_count: AtomicU64::new(self.dropped_count()),
            total_logged: AtomicU64::new(self.total_logged()),
            rotations: AtomicU64::new(self.rotations()),
            background_dispatched: AtomicU64::new(self.background_dispatched()),
            inline_fallbacks: AtomicU64::new(self.inline_fallbacks()),
            appender_failures: AtomicU64::new(self.appender_failures()),
        }
    }
}
