//! Thread pool implementation

use crate::core::{BoxedJob, ClosureJob, Job, Result, ThreadError};
use crate::pool::progress::SyncProgress;
use crate::pool::shared::PoolShared;
use crate::pool::state::WorkerState;
use crate::pool::stats::WorkerStats;
use crate::pool::worker::Worker;
use crate::tracing::TracedJob;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Configuration for thread pool
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// Target number of worker threads started by `start_all`.
    /// May be zero; the pool can still be grown with `start_n`.
    pub num_threads: usize,
    /// How long a worker sleeps after finding the queue empty.
    /// Default: 1ms
    ///
    /// Also bounds how long `kill_all` waits for an idle worker to notice
    /// its termination signal.
    pub idle_sleep: Duration,
    /// Poll period of the `synchronize` barrier.
    /// Default: 1ms
    pub sync_interval: Duration,
    /// Minimum time between two progress lines during `synchronize(true)`.
    /// Default: 250ms
    pub progress_interval: Duration,
    /// Thread name prefix
    pub thread_name_prefix: String,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            idle_sleep: Duration::from_millis(1),
            sync_interval: Duration::from_millis(1),
            progress_interval: Duration::from_millis(250),
            thread_name_prefix: "worker".to_string(),
        }
    }
}

impl ThreadPoolConfig {
    /// Create a new configuration with specified number of threads
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads,
            ..Default::default()
        }
    }

    /// Set the idle sleep of workers.
    ///
    /// # Trade-offs
    ///
    /// - **Shorter sleeps**: jobs are picked up and kills observed sooner, at
    ///   the cost of more CPU while idle
    /// - **Longer sleeps**: quieter idle workers, slower pickup
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_idle_sleep(mut self, idle_sleep: Duration) -> Self {
        self.idle_sleep = idle_sleep;
        self
    }

    /// Set the poll period of the synchronize barrier
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Set how often progress is reported while synchronizing
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.idle_sleep.is_zero() {
            return Err(ThreadError::invalid_config(
                "idle_sleep",
                "Idle sleep must be non-zero",
            ));
        }
        if self.sync_interval.is_zero() {
            return Err(ThreadError::invalid_config(
                "sync_interval",
                "Synchronize interval must be non-zero",
            ));
        }
        Ok(())
    }
}

/// A grow-only pool of worker threads sharing one FIFO job queue.
///
/// Workers are not started on construction; call [`start_all`] or
/// [`start_n`]. Each worker publishes a [`WorkerState`] that can be read with
/// [`thread_states`].
///
/// # Locks
///
/// The queue and the state vector have independent locks. When both are
/// needed they are taken queue first. Lifecycle calls (`start_n`, `kill_all`)
/// are serialized by a third lock on the worker handles, which is never
/// requested while either of the other two is held.
///
/// # Teardown
///
/// Dropping the pool signals every worker, discards queued jobs and joins
/// all threads. Jobs already executing finish first.
///
/// [`start_all`]: ThreadPool::start_all
/// [`start_n`]: ThreadPool::start_n
/// [`thread_states`]: ThreadPool::thread_states
pub struct ThreadPool {
    config: ThreadPoolConfig,
    capacity: AtomicUsize,
    running: AtomicUsize,
    workers: Mutex<Vec<Worker>>,
    shared: Arc<PoolShared>,
    retired_stats: WorkerStats,
    total_jobs_submitted: AtomicU64,
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("config", &self.config)
            .field("capacity", &self.capacity.load(Ordering::Relaxed))
            .field("running", &self.running.load(Ordering::Relaxed))
            .field(
                "total_jobs_submitted",
                &self.total_jobs_submitted.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl ThreadPool {
    /// Create a pool of `num_threads` workers that sleep `idle_sleep` when
    /// the queue is empty
    pub fn new(num_threads: usize, idle_sleep: Duration) -> Result<Self> {
        Self::with_config(ThreadPoolConfig::new(num_threads).with_idle_sleep(idle_sleep))
    }

    /// Create a thread pool with specified number of threads
    pub fn with_threads(num_threads: usize) -> Result<Self> {
        Self::with_config(ThreadPoolConfig::new(num_threads))
    }

    /// Create a thread pool with custom configuration
    pub fn with_config(config: ThreadPoolConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            capacity: AtomicUsize::new(config.num_threads),
            running: AtomicUsize::new(0),
            workers: Mutex::new(Vec::with_capacity(config.num_threads)),
            shared: Arc::new(PoolShared::new(config.idle_sleep)),
            retired_stats: WorkerStats::new(),
            total_jobs_submitted: AtomicU64::new(0),
            config,
        })
    }

    /// Start workers until the configured capacity is running
    pub fn start_all(&self) -> Result<()> {
        self.start_n(self.capacity())
    }

    /// Start workers until `n` are running.
    ///
    /// Raises the capacity to `n` if needed. Calling it again with the same
    /// `n` is a no-op.
    ///
    /// # Errors
    ///
    /// - `ThreadError::StartFailure` - `n` is lower than the running count;
    ///   nothing is changed
    /// - `ThreadError::SpawnError` - the OS refused a thread; workers started
    ///   before the failure keep running
    pub fn start_n(&self, n: usize) -> Result<()> {
        let mut workers = self.workers.lock();
        let running = workers.len();

        if n < running {
            log::warn!(
                "refusing to start {} workers: {} already running",
                n,
                running
            );
            return Err(ThreadError::start_failure(n, running));
        }
        self.capacity.fetch_max(n, Ordering::AcqRel);

        if n == running {
            return Ok(());
        }

        for _ in running..n {
            let worker = self.spawn_worker()?;
            workers.push(worker);
            self.running.store(workers.len(), Ordering::Release);
        }

        log::info!(
            "{}: {} workers running (capacity {})",
            self.config.thread_name_prefix,
            workers.len(),
            self.capacity()
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_pool_start(workers.len());

        Ok(())
    }

    /// Register a state slot and spawn its worker, rolling the slot back if
    /// the thread cannot be created
    fn spawn_worker(&self) -> Result<Worker> {
        let id = self.shared.states.lock().push_starting();
        let name = format!("{}-{}", self.config.thread_name_prefix, id);

        Worker::spawn(id, Arc::clone(&self.shared), name).map_err(|e| {
            self.shared.states.lock().pop();
            log::error!("failed to spawn worker {}: {}", id, e);
            e
        })
    }

    /// Add a job to the tail of the queue
    pub fn add_job<J: Job + 'static>(&self, job: J) {
        self.add_boxed_job(Box::new(job));
    }

    /// Add an already boxed job to the tail of the queue
    pub fn add_boxed_job(&self, job: BoxedJob) {
        #[cfg(feature = "tracing")]
        let depth = {
            let mut queue = self.shared.queue.lock();
            queue.add(job);
            queue.size()
        };
        #[cfg(not(feature = "tracing"))]
        self.shared.queue.lock().add(job);

        self.total_jobs_submitted.fetch_add(1, Ordering::Relaxed);

        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_submission(depth);
    }

    /// Add a job that runs inside the caller's current tracing span
    pub fn add_traced_job<J: Job + 'static>(&self, job: J) {
        self.add_job(TracedJob::new(job));
    }

    /// Submit a closure as a job
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.add_job(ClosureJob::new(f))
    }

    /// Block until the queue is empty and no worker is `Working`.
    ///
    /// With `show_progress` set, a progress line (jobs remaining against the
    /// total seen so far, and elapsed time) is logged at `info` level while
    /// waiting. This is a barrier, not a cancellation point: running jobs
    /// always finish. There is no timeout; jobs added concurrently keep the
    /// caller waiting.
    ///
    /// # Errors
    ///
    /// - `ThreadError::SynchronizeOnEmptyPool` - no worker is running
    /// - `ThreadError::NoLiveWorkers` - jobs are queued but every worker has
    ///   terminated
    pub fn synchronize(&self, show_progress: bool) -> Result<()> {
        if self.threads_running() == 0 {
            log::error!(
                "{}: synchronize invoked with 0 running workers; call start_all first",
                self.config.thread_name_prefix
            );
            return Err(ThreadError::SynchronizeOnEmptyPool);
        }

        let mut progress = show_progress
            .then(|| SyncProgress::new(self.jobs_remaining(), self.config.progress_interval));

        loop {
            let view = self.shared.barrier_view();
            if view.is_settled() {
                break;
            }
            if view.live_workers == 0 {
                log::error!(
                    "{}: {} jobs queued but no live workers remain",
                    self.config.thread_name_prefix,
                    view.remaining
                );
                return Err(ThreadError::no_live_workers(view.remaining));
            }
            if let Some(progress) = progress.as_mut() {
                progress.update(view.remaining);
            }
            thread::sleep(self.config.sync_interval);
        }

        if let Some(progress) = progress {
            progress.finish();
        }
        Ok(())
    }

    /// Stop every worker and join its thread.
    ///
    /// With `wait_to_finish` set the pool synchronizes first. Queued jobs are
    /// left in place; they run once workers are started again unless
    /// [`empty_job_queue`](ThreadPool::empty_job_queue) is called.
    ///
    /// # Errors
    ///
    /// `ThreadError::JoinError` if a worker thread could not be joined. All
    /// other workers are still joined and the pool is left with zero running.
    pub fn kill_all(&self, wait_to_finish: bool) -> Result<()> {
        if wait_to_finish {
            if let Err(e) = self.synchronize(false) {
                log::debug!("kill_all: skipping synchronize: {}", e);
            }
        }

        let result = {
            let mut workers = self.workers.lock();
            self.terminate_workers(&mut workers, false)
        };

        log::info!(
            "{}: all workers stopped, {} jobs left queued",
            self.config.thread_name_prefix,
            self.jobs_remaining()
        );
        #[cfg(feature = "tracing")]
        crate::tracing::metrics::record_pool_kill(
            self.total_jobs_processed(),
            self.total_jobs_failed(),
        );

        result
    }

    /// Signal, optionally drain, and join; leaves no handle and no state slot.
    fn terminate_workers(&self, workers: &mut Vec<Worker>, discard_queue: bool) -> Result<()> {
        self.shared.states.lock().signal_all();

        if discard_queue {
            let discarded = self.shared.queue.lock().clear();
            if discarded > 0 {
                log::info!("discarding {} queued jobs", discarded);
            }
        }

        let mut first_error = None;
        for worker in workers.drain(..) {
            let stats = worker.stats();
            if let Err(e) = worker.join() {
                log::error!("{}", e);
                first_error.get_or_insert(e);
            }
            self.retired_stats.absorb(&stats.snapshot());
        }

        self.shared.states.lock().clear();
        self.running.store(0, Ordering::Release);

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Discard every queued job without running it
    pub fn empty_job_queue(&self) {
        let discarded = self.shared.queue.lock().clear();
        log::debug!("emptied job queue ({} jobs discarded)", discarded);
    }

    /// Number of worker threads currently held by the pool
    pub fn threads_running(&self) -> usize {
        self.running.load(Ordering::Acquire)
    }

    /// Number of workers that have not left their loop
    pub fn live_workers(&self) -> usize {
        self.shared.states.lock().live_count()
    }

    /// Target worker count used by `start_all`
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }

    /// Number of jobs waiting in the queue
    pub fn jobs_remaining(&self) -> usize {
        self.shared.queue.lock().size()
    }

    /// Point-in-time copy of every worker's state, indexed by worker id
    pub fn thread_states(&self) -> Vec<WorkerState> {
        self.shared.states.lock().snapshot()
    }

    /// Returns true if a worker recorded a failure that was not read yet
    pub fn has_errors(&self) -> bool {
        self.shared.has_errors()
    }

    /// Pop the oldest recorded failure
    pub fn last_error(&self) -> Option<ThreadError> {
        self.shared.pop_error()
    }

    /// Take every recorded failure, oldest first
    pub fn drain_errors(&self) -> Vec<ThreadError> {
        self.shared.drain_errors()
    }

    /// Get the configuration
    pub fn config(&self) -> &ThreadPoolConfig {
        &self.config
    }

    /// Get statistics for all running workers
    pub fn get_stats(&self) -> Vec<Arc<WorkerStats>> {
        self.workers.lock().iter().map(|w| w.stats()).collect()
    }

    /// Get total number of jobs submitted
    pub fn total_jobs_submitted(&self) -> u64 {
        self.total_jobs_submitted.load(Ordering::Relaxed)
    }

    /// Get total jobs processed, including workers already killed
    pub fn total_jobs_processed(&self) -> u64 {
        let live: u64 = self
            .get_stats()
            .iter()
            .map(|s| s.get_jobs_processed())
            .sum();
        live + self.retired_stats.get_jobs_processed()
    }

    /// Get total jobs failed, including workers already killed
    pub fn total_jobs_failed(&self) -> u64 {
        let live: u64 = self.get_stats().iter().map(|s| s.get_jobs_failed()).sum();
        live + self.retired_stats.get_jobs_failed()
    }

    /// Get total jobs panicked, including workers already killed
    pub fn total_jobs_panicked(&self) -> u64 {
        let live: u64 = self
            .get_stats()
            .iter()
            .map(|s| s.get_jobs_panicked())
            .sum();
        live + self.retired_stats.get_jobs_panicked()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        let mut workers = std::mem::take(self.workers.get_mut());
        if let Err(e) = self.terminate_workers(&mut workers, true) {
            log::error!(
                "Failed to shut down thread pool '{}' during drop: {}",
                self.config.thread_name_prefix,
                e
            );
        }
    }
}
