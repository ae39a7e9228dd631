//! State shared between the pool handle and its worker threads.

use crate::core::{BoxedJob, ThreadError};
use crate::pool::state::{StateTable, WorkerState};
use crate::queue::JobQueue;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// Everything a worker needs to reach, behind independent locks.
///
/// Lock order when more than one is held: `queue` before `states`. The
/// `errors` lock is always taken alone.
#[derive(Debug)]
pub(crate) struct PoolShared {
    pub(crate) queue: Mutex<JobQueue>,
    pub(crate) states: Mutex<StateTable>,
    errors: Mutex<VecDeque<ThreadError>>,
    pub(crate) idle_sleep: Duration,
}

/// Queue and state observed together, for the synchronize barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BarrierView {
    pub(crate) remaining: usize,
    pub(crate) any_working: bool,
    pub(crate) live_workers: usize,
}

impl BarrierView {
    pub(crate) fn is_settled(&self) -> bool {
        self.remaining == 0 && !self.any_working
    }
}

impl PoolShared {
    pub(crate) fn new(idle_sleep: Duration) -> Self {
        Self {
            queue: Mutex::new(JobQueue::new()),
            states: Mutex::new(StateTable::default()),
            errors: Mutex::new(VecDeque::new()),
            idle_sleep,
        }
    }

    /// Dequeues the head job for worker `id` and announces the matching state.
    ///
    /// `Working` is published before the queue lock is released so that the
    /// barrier never sees an empty queue while a dequeued job is unaccounted.
    pub(crate) fn next_job(&self, id: usize) -> Option<BoxedJob> {
        let mut queue = self.queue.lock();
        let job = queue.take();
        let next = if job.is_some() {
            WorkerState::Working
        } else {
            WorkerState::Idle
        };
        self.states.lock().announce(id, next);
        job
    }

    pub(crate) fn state_of(&self, id: usize) -> Option<WorkerState> {
        self.states.lock().get(id)
    }

    pub(crate) fn mark_terminating(&self, id: usize) {
        self.states.lock().set(id, WorkerState::Terminating);
    }

    pub(crate) fn barrier_view(&self) -> BarrierView {
        let queue = self.queue.lock();
        let states = self.states.lock();
        BarrierView {
            remaining: queue.size(),
            any_working: states.any_working(),
            live_workers: states.live_count(),
        }
    }

    pub(crate) fn record_error(&self, error: ThreadError) {
        self.errors.lock().push_back(error);
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.errors.lock().is_empty()
    }

    pub(crate) fn pop_error(&self) -> Option<ThreadError> {
        self.errors.lock().pop_front()
    }

    pub(crate) fn drain_errors(&self) -> Vec<ThreadError> {
        self.errors.lock().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClosureJob;

    #[test]
    fn test_next_job_announces_state() {
        let shared = PoolShared::new(Duration::from_millis(1));
        let id = shared.states.lock().push_starting();

        assert!(shared.next_job(id).is_none());
        assert_eq!(shared.state_of(id), Some(WorkerState::Idle));

        shared.queue.lock().add(Box::new(ClosureJob::new(|| Ok(()))));
        let job = shared.next_job(id);
        assert!(job.is_some());
        assert_eq!(shared.state_of(id), Some(WorkerState::Working));

        let view = shared.barrier_view();
        assert_eq!(view.remaining, 0);
        assert!(view.any_working);
        assert!(!view.is_settled());
    }

    #[test]
    fn test_sigterm_survives_dequeue() {
        let shared = PoolShared::new(Duration::from_millis(1));
        let id = shared.states.lock().push_starting();
        shared.queue.lock().add(Box::new(ClosureJob::new(|| Ok(()))));
        shared.states.lock().signal_all();

        assert!(shared.next_job(id).is_some());
        assert_eq!(shared.state_of(id), Some(WorkerState::Sigterm));
    }

    #[test]
    fn test_error_queue_is_fifo() {
        let shared = PoolShared::new(Duration::from_millis(1));
        assert!(!shared.has_errors());

        shared.record_error(ThreadError::other("first"));
        shared.record_error(ThreadError::other("second"));
        assert!(shared.has_errors());

        assert_eq!(shared.pop_error().unwrap().to_string(), "first");
        let rest = shared.drain_errors();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].to_string(), "second");
        assert!(shared.pop_error().is_none());
    }
}
