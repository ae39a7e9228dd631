//! # Rust Worker Pool
//!
//! A grow-only pool of OS worker threads draining one shared FIFO job queue,
//! with an observable per-worker state machine and a blocking barrier.
//!
//! ## Features
//!
//! - **Grow-only pool**: start workers in steps with `start_n`; the pool
//!   never shrinks while running
//! - **FIFO job queue**: exactly-once dequeue under a single queue lock
//! - **Worker states**: `STARTING`, `WORKING`, `IDLE`, `SIGTERM`,
//!   `TERMINATING`, readable at any time with `thread_states`
//! - **Synchronize barrier**: block until the queue is drained and no worker
//!   is busy, optionally logging progress
//! - **Failure capture**: job errors and panics are logged and queued for the
//!   caller instead of crashing the process
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_worker_pool::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::new(4, Duration::from_millis(1))?;
//! pool.start_all()?;
//!
//! for i in 0..10 {
//!     pool.execute(move || {
//!         println!("Job {} executing", i);
//!         Ok(())
//!     });
//! }
//!
//! pool.synchronize(false)?;
//! assert_eq!(pool.jobs_remaining(), 0);
//!
//! pool.kill_all(false)?;
//! assert_eq!(pool.threads_running(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Growing the Pool
//!
//! ```rust
//! use rust_worker_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = ThreadPool::with_threads(2)?;
//! pool.start_n(1)?;
//! pool.start_all()?;
//! pool.start_n(3)?; // capacity grows to 3
//!
//! // Shrinking is refused and changes nothing
//! assert!(matches!(pool.start_n(2), Err(ThreadError::StartFailure { .. })));
//! assert_eq!(pool.threads_running(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Jobs
//!
//! ```rust
//! use rust_worker_pool::prelude::*;
//!
//! struct MyJob {
//!     data: String,
//! }
//!
//! impl Job for MyJob {
//!     fn execute(&mut self) -> Result<()> {
//!         println!("Processing: {}", self.data);
//!         Ok(())
//!     }
//!
//!     fn job_type(&self) -> &str {
//!         "MyJob"
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! # let pool = ThreadPool::with_threads(2)?;
//! # pool.start_all()?;
//! pool.add_job(MyJob {
//!     data: "test".to_string(),
//! });
//! pool.synchronize(false)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Worker States and Failures
//!
//! ```rust
//! use rust_worker_pool::prelude::*;
//!
//! # fn main() -> Result<()> {
//! # let pool = ThreadPool::with_threads(2)?;
//! # pool.start_all()?;
//! pool.execute(|| Err(ThreadError::other("disk full")));
//! pool.synchronize(false)?;
//!
//! assert!(!pool.thread_states().contains(&WorkerState::Working));
//! while let Some(err) = pool.last_error() {
//!     println!("job failed: {}", err);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
pub mod tracing;

pub use crate::core::{BoxedJob, ClosureJob, Job, Result, ThreadError};
pub use crate::pool::{ThreadPool, ThreadPoolConfig, WorkerState, WorkerStats};
