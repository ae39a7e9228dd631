//! Convenient re-exports for common types and traits

pub use crate::core::{BoxedJob, ClosureJob, Job, Result, ThreadError};
pub use crate::pool::{ThreadPool, ThreadPoolConfig, WorkerState, WorkerStats};
pub use crate::tracing::TracedJob;
