//! Run statistics
//! Atomic counters shared across all user tasks

use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Thread-safe counters for the whole run
#[derive(Debug)]
pub struct RunStats {
    events_published: AtomicU64,
    bytes_published: AtomicU64,
    publish_errors: AtomicU64,
    start_time: Instant,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            events_published: AtomicU64::new(0),
            bytes_published: AtomicU64::new(0),
            publish_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one published event of the given payload size
    pub fn count_event(&self, bytes: usize) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        self.bytes_published.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record one failed publish
    pub fn count_error(&self) {
        self.publish_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn events(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes_published.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.publish_errors.load(Ordering::Relaxed)
    }

    /// Events per second since the run started
    pub fn events_per_second(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.events() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log the end-of-run summary
    pub fn log_final(&self) {
        let summary = self.summary();
        info!(
            "Run finished: {} events ({:.1}/s), {} bytes, {} publish errors in {:.2}s",
            summary.events,
            summary.events_per_second,
            summary.bytes,
            summary.publish_errors,
            summary.duration.as_secs_f64()
        );
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            events: self.events(),
            bytes: self.bytes(),
            publish_errors: self.errors(),
            duration: self.start_time.elapsed(),
            events_per_second: self.events_per_second(),
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of run counters, returned by the coordinator
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub events: u64,
    pub bytes: u64,
    pub publish_errors: u64,
    pub duration: Duration,
    pub events_per_second: f64,
}
