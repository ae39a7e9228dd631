//! Per-worker job counters.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total number of jobs processed
    pub jobs_processed: AtomicU64,
    /// Total number of jobs that failed
    pub jobs_failed: AtomicU64,
    /// Total number of jobs that panicked
    pub jobs_panicked: AtomicU64,
    /// Total time spent processing jobs (microseconds)
    pub total_processing_time_us: AtomicU64,
}

/// Plain copy of [`WorkerStats`] at one point in time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatSnapshot {
    /// Jobs that returned `Ok`
    pub jobs_processed: u64,
    /// Jobs that returned `Err`
    pub jobs_failed: u64,
    /// Jobs that panicked
    pub jobs_panicked: u64,
    /// Time spent in `execute`, in microseconds
    pub total_processing_time_us: u64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment jobs processed counter
    pub fn increment_processed(&self) {
        self.jobs_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment jobs failed counter
    pub fn increment_failed(&self) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment jobs panicked counter
    pub fn increment_panicked(&self) {
        self.jobs_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Add processing time
    pub fn add_processing_time(&self, microseconds: u64) {
        self.total_processing_time_us
            .fetch_add(microseconds, Ordering::Relaxed);
    }

    /// Get total jobs processed
    pub fn get_jobs_processed(&self) -> u64 {
        self.jobs_processed.load(Ordering::Relaxed)
    }

    /// Get total jobs failed
    pub fn get_jobs_failed(&self) -> u64 {
        self.jobs_failed.load(Ordering::Relaxed)
    }

    /// Get total jobs panicked
    pub fn get_jobs_panicked(&self) -> u64 {
        self.jobs_panicked.load(Ordering::Relaxed)
    }

    /// Get average processing time per job in microseconds
    pub fn get_average_processing_time_us(&self) -> f64 {
        let total = self.total_processing_time_us.load(Ordering::Relaxed);
        let count = self.jobs_processed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Copy the counters out
    pub fn snapshot(&self) -> WorkerStatSnapshot {
        WorkerStatSnapshot {
            jobs_processed: self.get_jobs_processed(),
            jobs_failed: self.get_jobs_failed(),
            jobs_panicked: self.get_jobs_panicked(),
            total_processing_time_us: self.total_processing_time_us.load(Ordering::Relaxed),
        }
    }

    /// Fold another worker's counters into these
    pub fn absorb(&self, other: &WorkerStatSnapshot) {
        self.jobs_processed
            .fetch_add(other.jobs_processed, Ordering::Relaxed);
        self.jobs_failed.fetch_add(other.jobs_failed, Ordering::Relaxed);
        self.jobs_panicked
            .fetch_add(other.jobs_panicked, Ordering::Relaxed);
        self.add_processing_time(other.total_processing_time_us);
    }
}
