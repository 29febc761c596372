use std::future::Future;
use std::num::NonZeroUsize;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::debug;

/// Runs `tasks` with at most `concurrency` in flight at once.
///
/// Results come back in input order regardless of completion order:
/// every task has its slot reserved up front and fills it when it
/// settles. Admission is driven by a "wait for any in-flight task"
/// race, not by polling.
///
/// On the first task error the queue returns that error immediately:
/// in-flight futures are dropped (cancelled at their next suspension
/// point) and no further tasks are started. An empty task list
/// resolves to an empty result without suspending.
///
/// `concurrency == 0` is unrepresentable; reject it where the
/// configuration is parsed.
pub async fn run_limited<T, E, F>(tasks: Vec<F>, concurrency: NonZeroUsize) -> Result<Vec<T>, E>
where
    F: Future<Output = Result<T, E>>,
{
    let total = tasks.len();
    let mut slots: Vec<Option<T>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    let mut pending = tasks.into_iter().enumerate();
    let mut in_flight = FuturesUnordered::new();

    loop {
        // Fill free slots up to the bound.
        while in_flight.len() < concurrency.get() {
            match pending.next() {
                Some((index, task)) => in_flight.push(async move { (index, task.await) }),
                None => break,
            }
        }

        match in_flight.next().await {
            Some((index, Ok(value))) => {
                slots[index] = Some(value);
            }
            Some((_, Err(err))) => {
                debug!(completed = slots.iter().filter(|s| s.is_some()).count(), total, "aborting queue on first failure");
                return Err(err);
            }
            // No task in flight and none pending: all done.
            None => break,
        }
    }

    Ok(slots
        .into_iter()
        .map(|slot| slot.expect("every dispatched task settled successfully"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn limit(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[tokio::test]
    async fn empty_input_returns_empty() {
        let tasks: Vec<std::future::Ready<Result<u32, ()>>> = Vec::new();
        let results = run_limited(tasks, limit(4)).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn results_preserve_input_order() {
        // Later tasks finish first; slots must still line up with input.
        let tasks: Vec<_> = (0u64..8)
            .map(|i| async move {
                tokio::time::sleep(Duration::from_millis(80 - i * 10)).await;
                Ok::<u64, ()>(i)
            })
            .collect();

        let results = run_limited(tasks, limit(8)).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrency_bound_is_respected() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let current = current.clone();
                let peak = peak.clone();
                async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    Ok::<(), ()>(())
                }
            })
            .collect();

        run_limited(tasks, limit(3)).await.unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(current.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn width_one_runs_strictly_sequentially() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let tasks: Vec<_> = (0..5)
            .map(|i| {
                let order = order.clone();
                async move {
                    order.lock().unwrap().push(("start", i));
                    tokio::task::yield_now().await;
                    order.lock().unwrap().push(("end", i));
                    Ok::<(), ()>(())
                }
            })
            .collect();

        run_limited(tasks, limit(1)).await.unwrap();

        let order = order.lock().unwrap();
        // Every start must be immediately followed by its own end.
        for (pair, i) in order.chunks(2).zip(0..) {
            assert_eq!(pair, [("start", i), ("end", i)]);
        }
    }

    #[tokio::test]
    async fn first_error_propagates() {
        let tasks: Vec<_> = (0..4)
            .map(|i| async move {
                if i == 2 {
                    Err(format!("task {i} failed"))
                } else {
                    Ok(i)
                }
            })
            .collect();

        let err = run_limited(tasks, limit(2)).await.unwrap_err();
        assert_eq!(err, "task 2 failed");
    }

    #[tokio::test]
    async fn no_tasks_start_after_failure() {
        let started = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let started = started.clone();
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    if i == 0 { Err(()) } else { Ok(()) }
                }
            })
            .collect();

        run_limited(tasks, limit(1)).await.unwrap_err();
        // Sequential width: the failing first task is the only one started.
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn large_ratio_of_tasks_to_width() {
        let tasks: Vec<_> = (0u64..100)
            .map(|i| async move {
                tokio::time::sleep(Duration::from_millis(i % 7)).await;
                Ok::<u64, ()>(i * 2)
            })
            .collect();

        let results = run_limited(tasks, limit(4)).await.unwrap();
        assert_eq!(results.len(), 100);
        assert!(results.iter().enumerate().all(|(i, &v)| v == i as u64 * 2));
    }
}
