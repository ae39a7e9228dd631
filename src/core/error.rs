//! Error types for the worker pool

/// Result type for worker pool operations
pub type Result<T> = std::result::Result<T, ThreadError>;

/// Errors that can occur in the worker pool
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ThreadError {
    /// A job was executed without a bound callable
    #[error("Job '{job_type}' was executed without a bound callable")]
    InvalidJob {
        /// Type name of the offending job
        job_type: String,
    },

    /// Requested fewer workers than are currently running
    #[error("Cannot start {requested} workers: {running} are already running and the pool cannot shrink")]
    StartFailure {
        /// Number of workers requested
        requested: usize,
        /// Number of workers already running
        running: usize,
    },

    /// Synchronize was called while no worker is running
    #[error("Synchronize invoked with 0 running workers; start the pool first")]
    SynchronizeOnEmptyPool,

    /// Jobs are queued but every worker has terminated
    #[error("No live workers left to drain {pending_jobs} queued jobs")]
    NoLiveWorkers {
        /// Number of jobs still queued
        pending_jobs: usize,
    },

    /// Failed to spawn a worker thread with details
    #[error("Failed to spawn worker thread #{thread_id}: {message}")]
    SpawnError {
        /// ID of the thread that failed to spawn
        thread_id: usize,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Failed to join a worker thread
    #[error("Failed to join worker thread #{thread_id}: {message}")]
    JoinError {
        /// ID of the thread that failed to join
        thread_id: usize,
        /// Error message
        message: String,
    },

    /// Job execution failed
    #[error("Job '{job_type}' failed on worker #{thread_id}: {message}")]
    ExecutionError {
        /// Worker that ran the job
        thread_id: usize,
        /// Type name of the failed job
        job_type: String,
        /// Error message
        message: String,
    },

    /// A job panicked inside a worker
    #[error("Worker thread #{thread_id} caught a panic: {message}")]
    WorkerPanic {
        /// ID of the worker that caught the panic
        thread_id: usize,
        /// Panic message
        message: String,
    },

    /// A worker left its loop because of an unrecoverable job error
    #[error("Worker thread #{thread_id} aborted: {source}")]
    WorkerAborted {
        /// ID of the aborted worker
        thread_id: usize,
        /// Error that terminated the worker
        #[source]
        source: Box<ThreadError>,
    },

    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// General error
    #[error("{0}")]
    Other(String),
}

impl ThreadError {
    /// Create an invalid job error
    pub fn invalid_job(job_type: impl Into<String>) -> Self {
        ThreadError::InvalidJob {
            job_type: job_type.into(),
        }
    }

    /// Create a start failure error
    pub fn start_failure(requested: usize, running: usize) -> Self {
        ThreadError::StartFailure { requested, running }
    }

    /// Create a no live workers error
    pub fn no_live_workers(pending_jobs: usize) -> Self {
        ThreadError::NoLiveWorkers { pending_jobs }
    }

    /// Create a spawn error
    pub fn spawn(thread_id: usize, message: impl Into<String>) -> Self {
        ThreadError::SpawnError {
            thread_id,
            message: message.into(),
            source: None,
        }
    }

    /// Create a spawn error with source
    pub fn spawn_with_source(
        thread_id: usize,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        ThreadError::SpawnError {
            thread_id,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a join error
    pub fn join(thread_id: usize, message: impl Into<String>) -> Self {
        ThreadError::JoinError {
            thread_id,
            message: message.into(),
        }
    }

    /// Create an execution error
    pub fn execution(
        thread_id: usize,
        job_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ThreadError::ExecutionError {
            thread_id,
            job_type: job_type.into(),
            message: message.into(),
        }
    }

    /// Create a worker panic error
    pub fn worker_panic(thread_id: usize, message: impl Into<String>) -> Self {
        ThreadError::WorkerPanic {
            thread_id,
            message: message.into(),
        }
    }

    /// Create a worker aborted error
    pub fn worker_aborted(thread_id: usize, source: ThreadError) -> Self {
        ThreadError::WorkerAborted {
            thread_id,
            source: Box::new(source),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        ThreadError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ThreadError::Other(msg.into())
    }

    /// Whether this error must stop the worker that observed it
    pub fn is_fatal_to_worker(&self) -> bool {
        matches!(self, ThreadError::InvalidJob { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_creation() {
        let err = ThreadError::start_failure(2, 3);
        assert!(matches!(
            err,
            ThreadError::StartFailure {
                requested: 2,
                running: 3
            }
        ));

        let err = ThreadError::invalid_job("ClosureJob");
        assert!(matches!(err, ThreadError::InvalidJob { .. }));
        assert!(err.is_fatal_to_worker());

        let err = ThreadError::execution(1, "ClosureJob", "boom");
        assert!(!err.is_fatal_to_worker());
    }

    #[test]
    fn test_error_display() {
        let err = ThreadError::start_failure(2, 3);
        assert_eq!(
            err.to_string(),
            "Cannot start 2 workers: 3 are already running and the pool cannot shrink"
        );

        let err = ThreadError::SynchronizeOnEmptyPool;
        assert_eq!(
            err.to_string(),
            "Synchronize invoked with 0 running workers; start the pool first"
        );

        let err = ThreadError::invalid_job("Resize");
        assert_eq!(
            err.to_string(),
            "Job 'Resize' was executed without a bound callable"
        );
    }

    #[test]
    fn test_worker_aborted_keeps_source() {
        let err = ThreadError::worker_aborted(4, ThreadError::invalid_job("Resize"));
        assert!(err.to_string().contains("Worker thread #4 aborted"));

        let source = err.source().expect("aborted error should carry a source");
        assert!(source.to_string().contains("Resize"));
    }

    #[test]
    fn test_spawn_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = ThreadError::spawn_with_source(5, "Cannot create thread", io_err);

        assert!(matches!(err, ThreadError::SpawnError { .. }));
        assert!(err.to_string().contains("worker thread #5"));
    }
}
