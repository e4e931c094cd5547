//! Bounded-concurrency worker pool.
//!
//! Every item gets its own Tokio task, but a task is only spawned once an
//! owned semaphore permit is available. The permit moves into the task and is
//! dropped when the task ends, whether it returns or panics, so a failing unit
//! of work can never leak a slot.

use std::future::Future;
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::warn;
use tokio::sync::Semaphore;

use crate::initialization::init_semaphore;

/// Outcome counts of one [`WorkerPool::run`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolReport {
    /// Items handed to a task
    pub dispatched: usize,
    /// Tasks that ran to completion
    pub completed: usize,
    /// Tasks that panicked or were cancelled
    pub panicked: usize,
}

/// Runs async work over a list of items with at most `max_concurrency` in flight.
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    max_concurrency: usize,
}

impl WorkerPool {
    /// Creates a pool. A `max_concurrency` of 0 is treated as 1.
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            semaphore: init_semaphore(max_concurrency),
            max_concurrency,
        }
    }

    /// Maximum tasks in flight.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Permits not currently held by a running task.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Applies `work` to every item and waits for all of it to finish.
    ///
    /// The dispatch loop only waits for a free permit, never for a specific
    /// task. The call returns after every spawned task has completed.
    pub async fn run<I, T, F, Fut>(&self, items: I, work: F) -> PoolReport
    where
        I: IntoIterator<Item = T>,
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let work = Arc::new(work);
        let mut tasks = FuturesUnordered::new();
        let mut report = PoolReport::default();

        for item in items {
            let permit = match Arc::clone(&self.semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Semaphore closed, no further items will be dispatched");
                    break;
                }
            };

            report.dispatched += 1;
            let work = Arc::clone(&work);
            tasks.push(tokio::spawn(async move {
                let _permit = permit; // Hold permit until task completes
                work(item).await;
            }));
        }

        while let Some(task_result) = tasks.next().await {
            match task_result {
                Ok(()) => report.completed += 1,
                Err(join_error) => {
                    report.panicked += 1;
                    warn!("Task panicked: {:?}", join_error);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    /// Tracks how many units are running and the highest value seen.
    #[derive(Default)]
    struct Gauge {
        current: AtomicUsize,
        peak: AtomicUsize,
        finished: AtomicUsize,
    }

    impl Gauge {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn leave(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn run_gauged(cap: usize, items: usize) -> (PoolReport, Arc<Gauge>) {
        let pool = WorkerPool::new(cap);
        let gauge = Arc::new(Gauge::default());
        let g = Arc::clone(&gauge);
        let report = pool
            .run(0..items, move |i| {
                let g = Arc::clone(&g);
                async move {
                    g.enter();
                    tokio::time::sleep(Duration::from_millis(2 + (i % 5) as u64)).await;
                    g.leave();
                }
            })
            .await;
        assert_eq!(pool.available_permits(), pool.max_concurrency());
        (report, gauge)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_exceeds_max_concurrency() {
        for (cap, items) in [(1, 10), (3, 0), (3, 2), (3, 3), (3, 50), (8, 100)] {
            let (report, gauge) = run_gauged(cap, items).await;
            let peak = gauge.peak.load(Ordering::SeqCst);
            assert!(peak <= cap, "peak {peak} exceeded cap {cap}");
            assert_eq!(report.dispatched, items);
            assert_eq!(report.completed, items);
            assert_eq!(gauge.finished.load(Ordering::SeqCst), items);
            assert_eq!(gauge.current.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_uses_available_concurrency() {
        let (_, gauge) = run_gauged(4, 40).await;
        assert!(gauge.peak.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let pool = WorkerPool::new(5);
        let report = pool.run(Vec::<String>::new(), |_| async {}).await;
        assert_eq!(report, PoolReport::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_waits_for_slowest_unit() {
        let pool = WorkerPool::new(3);
        let done = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&done);
        let delays: Vec<u64> = vec![120, 10, 60, 5, 30, 90, 15];
        let slowest = Duration::from_millis(*delays.iter().max().unwrap());
        let count = delays.len();

        let started = Instant::now();
        let report = pool
            .run(delays, move |ms| {
                let d = Arc::clone(&d);
                async move {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    d.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await;

        assert_eq!(done.load(Ordering::SeqCst), count);
        assert_eq!(report.completed, count);
        assert!(started.elapsed() >= slowest);
    }

    #[tokio::test]
    async fn test_panicking_work_releases_its_slot() {
        let pool = WorkerPool::new(1);
        let done = Arc::new(AtomicUsize::new(0));
        let d = Arc::clone(&done);

        let report = tokio::time::timeout(
            Duration::from_secs(10),
            pool.run(0..5usize, move |i| {
                let d = Arc::clone(&d);
                async move {
                    if i == 2 {
                        panic!("bug in work for item {i}");
                    }
                    d.fetch_add(1, Ordering::SeqCst);
                }
            }),
        )
        .await
        .expect("pool must not deadlock after a panic");

        assert_eq!(report.dispatched, 5);
        assert_eq!(report.completed, 4);
        assert_eq!(report.panicked, 1);
        assert_eq!(done.load(Ordering::SeqCst), 4);
        assert_eq!(pool.available_permits(), 1);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.max_concurrency(), 1);
        assert_eq!(pool.available_permits(), 1);
    }
}
