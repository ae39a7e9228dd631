//! Unbounded FIFO of boxed jobs.

use crate::core::BoxedJob;
use std::collections::VecDeque;
use std::fmt;

/// An unsynchronized, unbounded FIFO queue of jobs.
///
/// Insertion order is dequeue order. The queue performs no locking of its
/// own: the owner wraps it in a single lock and holds that lock for each
/// call, which is what makes every job reach exactly one dequeuer.
///
/// # Example
///
/// ```rust
/// use rust_worker_pool::queue::JobQueue;
/// use rust_worker_pool::core::{ClosureJob, Job};
///
/// let mut queue = JobQueue::new();
/// queue.add(Box::new(ClosureJob::new(|| Ok(()))));
/// assert_eq!(queue.size(), 1);
///
/// let mut job = queue.take().expect("one job queued");
/// job.execute().unwrap();
/// assert!(queue.is_empty());
/// ```
#[derive(Default)]
pub struct JobQueue {
    jobs: VecDeque<BoxedJob>,
}

impl JobQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a job to the tail.
    pub fn add(&mut self, job: BoxedJob) {
        self.jobs.push_back(job);
    }

    /// Removes and returns the head, or `None` when the queue is empty.
    pub fn take(&mut self) -> Option<BoxedJob> {
        self.jobs.pop_front()
    }

    /// Number of jobs waiting.
    pub fn size(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if no job is waiting.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drops every pending job without executing it.
    ///
    /// Returns how many jobs were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.jobs.len();
        self.jobs.clear();
        discarded
    }
}

impl fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobQueue")
            .field("size", &self.jobs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClosureJob, Job, Result};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    fn recording_job(id: usize, log: &Arc<Mutex<Vec<usize>>>) -> BoxedJob {
        let log = Arc::clone(log);
        Box::new(ClosureJob::new(move || -> Result<()> {
            log.lock().unwrap().push(id);
            Ok(())
        }))
    }

    #[test]
    fn test_take_on_empty_queue() {
        let mut queue = JobQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.size(), 0);
        assert!(queue.take().is_none());
    }

    #[test]
    fn test_fifo_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut queue = JobQueue::new();
        for id in 0..5 {
            queue.add(recording_job(id, &log));
        }
        assert_eq!(queue.size(), 5);

        while let Some(mut job) = queue.take() {
            job.execute().unwrap();
        }

        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_discards_without_executing() {
        let executed = Arc::new(AtomicBool::new(false));
        let mut queue = JobQueue::new();
        for _ in 0..3 {
            let executed = Arc::clone(&executed);
            queue.add(Box::new(ClosureJob::new(move || {
                executed.store(true, Ordering::SeqCst);
                Ok(())
            })));
        }

        assert_eq!(queue.clear(), 3);
        assert!(queue.is_empty());
        assert!(!executed.load(Ordering::SeqCst));
        assert_eq!(queue.clear(), 0);
    }

    #[test]
    fn test_no_duplicate_filtering() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut queue = JobQueue::new();
        queue.add(recording_job(7, &log));
        queue.add(recording_job(7, &log));
        assert_eq!(queue.size(), 2);

        let first = queue.take().unwrap();
        assert_eq!(first.job_type(), "ClosureJob");
        assert_eq!(queue.size(), 1);
    }
}
