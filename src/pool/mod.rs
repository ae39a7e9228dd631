//! Thread pool and worker implementations

mod progress;
mod shared;
pub mod state;
pub mod stats;
pub mod thread_pool;
pub mod worker;

pub use state::WorkerState;
pub use stats::{WorkerStatSnapshot, WorkerStats};
pub use thread_pool::{ThreadPool, ThreadPoolConfig};
pub use worker::Worker;
