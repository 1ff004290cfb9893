//! Ordered fan-out with a cap on in-flight work
//!
//! Every future is polled from the caller's task by `try_join_all`; a
//! semaphore permit is held for the whole of each call. Results come back
//! in input order and the first error drops every future still pending, so
//! nothing new starts after a failure.

use futures::future::try_join_all;
use std::future::Future;
use tokio::sync::Semaphore;

/// Map `items` through `f` with at most `limit` calls running at once.
///
/// A `limit` of zero is treated as one.
pub async fn bounded_try_map<T, U, E, F, Fut>(items: Vec<T>, limit: usize, f: F) -> Result<Vec<U>, E>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<U, E>>,
{
    let semaphore = Semaphore::new(limit.max(1));
    let semaphore = &semaphore;
    let f = &f;

    let tasks = items.into_iter().map(|item| async move {
        // The semaphore is never closed
        let _permit = semaphore.acquire().await.ok();
        f(item).await
    });

    try_join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn preserves_input_order() {
        let result: Result<Vec<u64>, ()> = bounded_try_map(vec![30_u64, 10, 20], 3, |ms| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(ms)
        })
        .await;
        assert_eq!(result.unwrap(), vec![30, 10, 20]);
    }

    #[tokio::test]
    async fn never_exceeds_limit() {
        let in_flight = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        let result: Result<Vec<usize>, ()> = bounded_try_map((0..20).collect(), 4, |i| {
            let in_flight = &in_flight;
            let peak = &peak;
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(i)
            }
        })
        .await;

        assert_eq!(result.unwrap().len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 4);
        assert!(peak.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn first_error_stops_later_work() {
        let started = AtomicUsize::new(0);

        let result: Result<Vec<usize>, String> = bounded_try_map((0..10).collect(), 1, |i| {
            let started = &started;
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                if i == 2 { Err(format!("item {i} failed")) } else { Ok(i) }
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "item 2 failed");
        assert_eq!(started.load(Ordering::SeqCst), 3);
    }
}
