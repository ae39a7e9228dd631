use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rust_worker_pool::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn started_pool(threads: usize) -> ThreadPool {
    let pool = ThreadPool::new(threads, Duration::from_micros(100)).expect("Failed to create pool");
    pool.start_all().expect("Failed to start pool");
    pool
}

fn benchmark_thread_pool_startup(c: &mut Criterion) {
    c.bench_function("start_and_kill_4_workers", |b| {
        b.iter(|| {
            let pool = started_pool(4);
            pool.kill_all(false).expect("Failed to kill pool");
        });
    });
}

fn benchmark_job_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("job_submission");

    // Lightweight jobs
    group.bench_function("lightweight_jobs_100", |b| {
        b.iter_batched(
            || started_pool(4),
            |pool| {
                for _ in 0..100 {
                    pool.execute(|| {
                        black_box(1 + 1);
                        Ok(())
                    });
                }
                pool.synchronize(false).expect("Failed to synchronize");
            },
            BatchSize::SmallInput,
        );
    });

    // Medium workload
    group.bench_function("medium_jobs_100", |b| {
        b.iter_batched(
            || started_pool(4),
            |pool| {
                for _ in 0..100 {
                    pool.execute(|| {
                        let mut sum = 0u64;
                        for i in 0..1000 {
                            sum = sum.wrapping_add(i);
                        }
                        black_box(sum);
                        Ok(())
                    });
                }
                pool.synchronize(false).expect("Failed to synchronize");
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_concurrent_submission(c: &mut Criterion) {
    c.bench_function("concurrent_submission_4_threads", |b| {
        b.iter_batched(
            || Arc::new(started_pool(4)),
            |pool| {
                let handles: Vec<_> = (0..4)
                    .map(|_| {
                        let pool = Arc::clone(&pool);
                        std::thread::spawn(move || {
                            for _ in 0..25 {
                                pool.execute(|| Ok(()));
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.join().expect("Thread panicked");
                }

                pool.synchronize(false).expect("Failed to synchronize");
            },
            BatchSize::SmallInput,
        );
    });
}

fn benchmark_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("tasks_per_second", |b| {
        b.iter_batched(
            || (started_pool(8), Arc::new(AtomicU64::new(0))),
            |(pool, counter)| {
                for _ in 0..1000 {
                    let counter = Arc::clone(&counter);
                    pool.execute(move || {
                        counter.fetch_add(1, Ordering::Relaxed);
                        Ok(())
                    });
                }

                pool.synchronize(false).expect("Failed to synchronize");
                assert_eq!(counter.load(Ordering::Relaxed), 1000, "Not all tasks completed");
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn benchmark_state_snapshot(c: &mut Criterion) {
    let pool = started_pool(8);
    c.bench_function("thread_states_8_workers", |b| {
        b.iter(|| black_box(pool.thread_states()));
    });
}

criterion_group!(
    benches,
    benchmark_thread_pool_startup,
    benchmark_job_submission,
    benchmark_concurrent_submission,
    benchmark_throughput,
    benchmark_state_snapshot
);
criterion_main!(benches);
