//! Job queue used by the pool.
//!
//! [`JobQueue`] is a plain FIFO with no internal synchronization. The
//! [`ThreadPool`] owns exactly one of them behind a `parking_lot::Mutex` and
//! takes that lock for every `add`, `take`, `clear`, `size` or `is_empty`
//! call, never across job execution or a sleep.
//!
//! [`ThreadPool`]: crate::pool::ThreadPool

mod fifo;

pub use fifo::JobQueue;
