use futures::future::try_join_all;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::error::{Result, WsdlSamplerError};

/// Runs a fetch with a timeout; an elapsed timeout is a fetch failure for `location`.
pub async fn with_timeout<F, T>(future: F, duration: Duration, location: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    timeout(duration, future).await.map_err(|_| {
        WsdlSamplerError::import_fetch(location, format!("timed out after {duration:?}"))
    })?
}

/// Run `processor` over every item with at most `limit` in flight, failing
/// fast on the first error. Results keep the input order.
pub async fn bounded_try_join_all<T, R, F, Fut>(
    items: Vec<T>,
    limit: usize,
    processor: F,
) -> Result<Vec<R>>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let semaphore = Semaphore::new(limit.max(1));
    let semaphore = &semaphore;
    let processor = &processor;

    let tasks = items.into_iter().map(|item| async move {
        let _permit = semaphore
            .acquire()
            .await
            .map_err(|e| WsdlSamplerError::Configuration {
                message: format!("Failed to acquire fetch permit: {e}"),
            })?;
        processor(item).await
    });

    try_join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_timeout_is_fetch_error() {
        let result: Result<()> = with_timeout(
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            },
            Duration::from_millis(10),
            "slow.xsd",
        )
        .await;

        assert!(matches!(
            result,
            Err(WsdlSamplerError::ImportFetch { ref location, .. }) if location == "slow.xsd"
        ));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = bounded_try_join_all((0..8).collect(), 2, |i: usize| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(i * 2)
            }
        })
        .await
        .unwrap();

        assert_eq!(results, vec![0, 2, 4, 6, 8, 10, 12, 14]);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_first_error_fails_all() {
        let result = bounded_try_join_all(vec![1, 2, 3], 4, |i: usize| async move {
            if i == 2 {
                Err(WsdlSamplerError::import_fetch("two.xsd", "boom"))
            } else {
                Ok(i)
            }
        })
        .await;
        assert!(result.is_err());
    }
}
