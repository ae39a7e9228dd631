//! Job trait and related types

use crate::core::error::{Result, ThreadError};
use std::fmt;

/// A unit of work executed once by a pool worker.
///
/// The worker drops the job as soon as `execute` returns, whatever the
/// outcome, so an implementation never runs twice under the pool.
pub trait Job: Send {
    /// Execute the job
    ///
    /// # Errors
    ///
    /// Returns [`ThreadError::InvalidJob`] when nothing is bound to run, or
    /// any error produced by the job itself.
    fn execute(&mut self) -> Result<()>;

    /// Get the job's type name for debugging and statistics
    fn job_type(&self) -> &str {
        "Job"
    }
}

impl fmt::Debug for dyn Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job({})", self.job_type())
    }
}

/// A boxed job that can be sent across threads
pub type BoxedJob = Box<dyn Job>;

/// Helper to create a job from a closure
///
/// A `ClosureJob` is normally bound on construction. [`ClosureJob::unbound`]
/// creates an empty one that must be [`bind`](ClosureJob::bind)-ed before it
/// can run; executing it empty, or a second time, fails with
/// [`ThreadError::InvalidJob`].
pub struct ClosureJob<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    closure: Option<F>,
    name: String,
}

impl<F> ClosureJob<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    /// Create a new closure job
    pub fn new(closure: F) -> Self {
        Self {
            closure: Some(closure),
            name: "ClosureJob".to_string(),
        }
    }

    /// Create a new closure job with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> Self {
        Self {
            closure: Some(closure),
            name: name.into(),
        }
    }

    /// Create a job with nothing bound to it yet
    pub fn unbound() -> Self {
        Self {
            closure: None,
            name: "ClosureJob".to_string(),
        }
    }

    /// Bind (or rebind) the callable this job runs
    pub fn bind(&mut self, closure: F) {
        self.closure = Some(closure);
    }

    /// Whether a callable is currently bound
    pub fn is_bound(&self) -> bool {
        self.closure.is_some()
    }
}

impl<F> Job for ClosureJob<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    fn execute(&mut self) -> Result<()> {
        match self.closure.take() {
            Some(closure) => closure(),
            None => Err(ThreadError::invalid_job(self.name.as_str())),
        }
    }

    fn job_type(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for ClosureJob<F>
where
    F: FnOnce() -> Result<()> + Send,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureJob")
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_closure_job() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);
        let mut job = ClosureJob::new(move || {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(job.job_type(), "ClosureJob");
        assert!(job.execute().is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closure_job_with_name() {
        let job = ClosureJob::with_name(|| Ok(()), "TestJob");
        assert_eq!(job.job_type(), "TestJob");
    }

    #[test]
    fn test_second_execute_is_invalid() {
        let mut job = ClosureJob::new(|| Ok(()));
        job.execute().expect("first run should succeed");

        let err = job.execute().expect_err("second run must fail");
        assert!(matches!(err, ThreadError::InvalidJob { .. }));
    }

    #[test]
    fn test_unbound_job_fails_until_bound() {
        let mut job: ClosureJob<fn() -> Result<()>> = ClosureJob::unbound();
        assert!(!job.is_bound());
        assert!(matches!(
            job.execute(),
            Err(ThreadError::InvalidJob { .. })
        ));

        fn noop() -> Result<()> {
            Ok(())
        }
        job.bind(noop);
        assert!(job.is_bound());
        assert!(job.execute().is_ok());
        assert!(!job.is_bound());
    }

    #[test]
    fn test_job_error_is_returned() {
        let mut job = ClosureJob::new(|| Err(ThreadError::other("bad input")));
        let err = job.execute().expect_err("job error should propagate");
        assert_eq!(err.to_string(), "bad input");
    }
}
