//! Basic worker pool usage example
//!
//! Demonstrates starting and growing a pool, submitting jobs, waiting on the
//! synchronize barrier, reading worker states and failures, and killing the
//! pool.
//!
//! Run with: RUST_LOG=info cargo run --example basic_usage

use rust_worker_pool::prelude::*;
use std::thread;
use std::time::Duration;

/// A custom job that sums a slice of numbers
struct SumJob {
    id: usize,
    data: Vec<u32>,
}

impl Job for SumJob {
    fn execute(&mut self) -> Result<()> {
        let sum: u32 = self.data.iter().sum();
        println!(
            "  SumJob {} on {:?}: sum = {}",
            self.id,
            thread::current().name().unwrap_or("?"),
            sum
        );
        thread::sleep(Duration::from_millis(20));
        Ok(())
    }

    fn job_type(&self) -> &str {
        "SumJob"
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Rust Worker Pool - Basic Usage Example ===\n");

    let pool = ThreadPool::new(2, Duration::from_millis(1))?;

    println!("1. Queueing jobs before any worker runs");
    for i in 0..5 {
        pool.add_job(SumJob {
            id: i,
            data: (0..=i as u32 * 10).collect(),
        });
    }
    println!("   Jobs remaining: {}", pool.jobs_remaining());

    println!("\n2. Starting {} workers", pool.capacity());
    pool.start_all()?;
    println!("   States: {:?}", pool.thread_states());

    println!("\n3. Growing the pool to 4 workers and adding closures");
    pool.start_n(4)?;
    for i in 5..20 {
        pool.execute(move || {
            thread::sleep(Duration::from_millis(10));
            if i % 7 == 0 {
                return Err(ThreadError::other(format!("job {} rejected its input", i)));
            }
            Ok(())
        });
    }

    println!("\n4. Synchronizing (progress is logged at info level)");
    pool.synchronize(true)?;
    println!("   States after barrier: {:?}", pool.thread_states());

    println!("\n5. Statistics:");
    println!("   Total jobs submitted: {}", pool.total_jobs_submitted());
    println!("   Total jobs processed: {}", pool.total_jobs_processed());
    println!("   Total jobs failed: {}", pool.total_jobs_failed());
    for (i, stat) in pool.get_stats().iter().enumerate() {
        println!(
            "   Worker {}: {} processed, {} failed, avg time: {:.2}μs",
            i,
            stat.get_jobs_processed(),
            stat.get_jobs_failed(),
            stat.get_average_processing_time_us()
        );
    }

    println!("\n6. Recorded failures:");
    for err in pool.drain_errors() {
        println!("   {}", err);
    }

    println!("\n7. Killing all workers...");
    pool.kill_all(true)?;
    println!("   Threads running: {}", pool.threads_running());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
