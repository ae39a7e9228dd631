//! Worker thread implementation

use crate::core::{BoxedJob, Result, ThreadError};
use crate::pool::shared::PoolShared;
use crate::pool::state::WorkerState;
use crate::pool::stats::WorkerStats;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// A worker thread that processes jobs from the pool's queue
#[derive(Debug)]
pub struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a worker whose state slot `id` is already registered as
    /// `Starting` in `shared`.
    ///
    /// # Shutdown Behavior
    ///
    /// The worker leaves its loop after the first iteration that ends with
    /// its slot set to `Sigterm`. A job it has already dequeued is always run
    /// to completion first.
    pub(crate) fn spawn(id: usize, shared: Arc<PoolShared>, thread_name: String) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);

        let thread = thread::Builder::new()
            .name(thread_name)
            .spawn(move || {
                Self::run(id, &shared, &stats_clone);
            })
            .map_err(|e| ThreadError::spawn_with_source(id, "thread builder failed", e))?;

        Ok(Self {
            id,
            thread: Some(thread),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Join the worker thread
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| ThreadError::join(self.id, "Worker panicked"))?;
        }
        Ok(())
    }

    /// Main worker loop
    fn run(id: usize, shared: &PoolShared, stats: &WorkerStats) {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "worker", id = id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        log::debug!("worker {} started", id);

        loop {
            match shared.next_job(id) {
                Some(mut job) => {
                    #[cfg(feature = "tracing")]
                    crate::tracing::metrics::record_worker_busy(id);

                    let outcome = Self::execute_job(id, &mut job, stats, shared);
                    drop(job);

                    #[cfg(feature = "tracing")]
                    crate::tracing::metrics::record_worker_idle(id);

                    if let Err(fatal) = outcome {
                        log::error!("worker {} aborting: {}", id, fatal);
                        shared.record_error(ThreadError::worker_aborted(id, fatal));
                        break;
                    }
                }
                None => thread::sleep(shared.idle_sleep),
            }

            match shared.state_of(id) {
                Some(WorkerState::Sigterm) | None => break,
                Some(_) => {}
            }
        }

        shared.mark_terminating(id);
        log::debug!(
            "worker {} terminating after {} jobs ({} failed, {} panicked)",
            id,
            stats.get_jobs_processed(),
            stats.get_jobs_failed(),
            stats.get_jobs_panicked()
        );
    }

    /// Execute a single job with panic protection.
    ///
    /// Ordinary failures and panics are counted and recorded on the pool;
    /// only an error that is fatal to the worker is handed back.
    fn execute_job(
        id: usize,
        job: &mut BoxedJob,
        stats: &WorkerStats,
        shared: &PoolShared,
    ) -> Result<()> {
        let job_type = job.job_type().to_string();

        #[cfg(feature = "tracing")]
        let job_span = span!(Level::DEBUG, "job_execution", job_type = job_type.as_str());
        #[cfg(feature = "tracing")]
        let _job_guard = job_span.enter();

        let start = Instant::now();
        let panic_result = catch_unwind(AssertUnwindSafe(|| job.execute()));
        let elapsed = start.elapsed();
        stats.add_processing_time(elapsed.as_micros() as u64);

        match panic_result {
            Ok(Ok(())) => {
                stats.increment_processed();
                log::trace!("worker {}: job '{}' completed in {:?}", id, job_type, elapsed);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_completion(elapsed, true);
                Ok(())
            }
            Ok(Err(e)) if e.is_fatal_to_worker() => {
                stats.increment_failed();
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_completion(elapsed, false);
                Err(e)
            }
            Ok(Err(e)) => {
                stats.increment_failed();
                log::warn!("worker {}: job '{}' failed: {}", id, job_type, e);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_completion(elapsed, false);
                shared.record_error(ThreadError::execution(id, job_type, e.to_string()));
                Ok(())
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                stats.increment_panicked();
                log::error!("worker {}: job '{}' panicked: {}", id, job_type, panic_msg);
                #[cfg(feature = "tracing")]
                crate::tracing::metrics::record_panic(elapsed);
                shared.record_error(ThreadError::worker_panic(id, panic_msg));
                Ok(())
            }
        }
    }
}
