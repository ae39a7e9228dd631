//! Tracing integration for observability.
//!
//! With the `tracing` feature enabled, workers run inside a `worker` span,
//! every job inside a `job_execution` span, and the [`metrics`] functions
//! emit counter and gauge events. Without the feature only [`TracedJob`]
//! remains, as a transparent wrapper.
//!
//! # Example
//!
//! ```rust,ignore
//! use rust_worker_pool::prelude::*;
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env()
//!         .add_directive("rust_worker_pool=debug".parse().unwrap()))
//!     .init();
//!
//! let pool = ThreadPool::with_threads(4)?;
//! pool.start_all()?;
//!
//! // The job runs inside the span that is current here
//! pool.add_traced_job(MyJob::new());
//! ```

use crate::core::{Job, Result};

/// A job wrapper that carries the submitter's tracing span to the worker.
///
/// The span current at construction is entered around `execute`, so events
/// emitted by the job nest under the code that queued it.
pub struct TracedJob<J: Job> {
    inner: J,
    #[cfg(feature = "tracing")]
    span: tracing::Span,
}

impl<J: Job> TracedJob<J> {
    /// Wraps `job`, capturing the current span.
    pub fn new(job: J) -> Self {
        Self {
            inner: job,
            #[cfg(feature = "tracing")]
            span: tracing::Span::current(),
        }
    }

    /// Wraps `job` with an explicit span.
    #[cfg(feature = "tracing")]
    pub fn with_span(job: J, span: tracing::Span) -> Self {
        Self { inner: job, span }
    }
}

impl<J: Job> Job for TracedJob<J> {
    fn execute(&mut self) -> Result<()> {
        #[cfg(feature = "tracing")]
        let _guard = self.span.enter();
        self.inner.execute()
    }

    fn job_type(&self) -> &str {
        self.inner.job_type()
    }
}

/// Metrics recording functions for observability.
///
/// These emit tracing events that a subscriber can turn into counters,
/// gauges and histograms.
#[cfg(feature = "tracing")]
pub mod metrics {
    use std::time::Duration;

    /// Records a job submission event.
    #[inline]
    pub fn record_submission(queue_depth: usize) {
        tracing::trace!(
            counter.jobs_submitted = 1,
            gauge.queue_depth = queue_depth as i64,
            "job submitted"
        );
    }

    /// Records job completion with timing.
    #[inline]
    pub fn record_completion(duration: Duration, success: bool) {
        let duration_ms = duration.as_millis() as u64;
        if success {
            tracing::trace!(
                counter.jobs_completed = 1,
                histogram.job_duration_ms = duration_ms,
                "job completed successfully"
            );
        } else {
            tracing::trace!(
                counter.jobs_failed = 1,
                histogram.job_duration_ms = duration_ms,
                "job failed"
            );
        }
    }

    /// Records a job panic event.
    #[inline]
    pub fn record_panic(duration: Duration) {
        tracing::trace!(
            counter.jobs_panicked = 1,
            histogram.job_duration_ms = duration.as_millis() as u64,
            "job panicked"
        );
    }

    /// Records a worker announcing `Working`.
    #[inline]
    pub fn record_worker_busy(worker_id: usize) {
        tracing::trace!(
            gauge.workers_busy = 1,
            worker_id = worker_id,
            "worker busy"
        );
    }

    /// Records a worker finishing its job.
    #[inline]
    pub fn record_worker_idle(worker_id: usize) {
        tracing::trace!(
            gauge.workers_busy = -1i64,
            worker_id = worker_id,
            "worker idle"
        );
    }

    /// Records workers being started.
    #[inline]
    pub fn record_pool_start(num_workers: usize) {
        tracing::info!(workers = num_workers, "thread pool started");
    }

    /// Records every worker being killed.
    #[inline]
    pub fn record_pool_kill(jobs_processed: u64, jobs_failed: u64) {
        tracing::info!(
            jobs_processed = jobs_processed,
            jobs_failed = jobs_failed,
            "thread pool workers killed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClosureJob, ThreadError};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_traced_job_executes() {
        let executed = Arc::new(AtomicBool::new(false));
        let executed_clone = executed.clone();

        let job = ClosureJob::new(move || {
            executed_clone.store(true, Ordering::SeqCst);
            Ok(())
        });

        let mut traced = TracedJob::new(job);
        traced.execute().expect("Job should execute");

        assert!(executed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_traced_job_preserves_job_type() {
        let job = ClosureJob::with_name(|| Ok(()), "Thumbnail");
        let traced = TracedJob::new(job);

        assert_eq!(traced.job_type(), "Thumbnail");
    }

    #[test]
    fn test_traced_job_passes_invalid_job_through() {
        let mut traced = TracedJob::new(ClosureJob::new(|| Ok(())));
        traced.execute().unwrap();
        assert!(matches!(
            traced.execute(),
            Err(ThreadError::InvalidJob { .. })
        ));
    }
}
