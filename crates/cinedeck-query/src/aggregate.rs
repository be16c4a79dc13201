//! Fan-out of per-entity secondary requests over a primary list.
//!
//! Every entity gets one concurrent call tagged with its input index and
//! id. Calls complete in any order; results are put back in input order
//! by the stored index, never by completion position.

use std::collections::HashMap;
use std::future::Future;

use cinedeck_api::tmdb::{FetchError, MediaKey};
use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::AggregateError;

/// Per-entity result of a settled aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome<S> {
    /// Id of the primary entity.
    pub id: u64,
    /// Secondary resource or the failure that replaced it.
    pub result: Result<S, FetchError>,
}

impl<S> ItemOutcome<S> {
    /// Returns `true` when the secondary request succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Borrowed secondary resource, if the request succeeded.
    #[must_use]
    pub fn value(&self) -> Option<&S> {
        self.result.as_ref().ok()
    }
}

/// Runs one `fetch` per entity and collects `(index, id, result)` in
/// completion order. Returns only after every call has settled.
async fn settle_all<P, S, F, Fut>(primary: &[P], fetch: F) -> Vec<(usize, u64, Result<S, FetchError>)>
where
    P: MediaKey,
    F: Fn(&P) -> Fut,
    Fut: Future<Output = Result<S, FetchError>>,
{
    let mut pending: FuturesUnordered<_> = primary
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let id = item.media_id();
            fetch(item).map(move |result| (index, id, result))
        })
        .collect();

    let mut settled = Vec::with_capacity(primary.len());
    while let Some((index, id, result)) = pending.next().await {
        if let Err(err) = &result {
            tracing::warn!(id, error = %err, "secondary request failed");
        }
        settled.push((index, id, result));
    }
    settled
}

/// Fetches one secondary resource per entity in `primary`, all at once.
///
/// Waits for every call to settle. If any failed the whole batch fails
/// with the first failure observed; otherwise the results come back in
/// `primary` order. An empty `primary` never calls `fetch`.
///
/// # Errors
///
/// Returns `AggregateError::Item` naming the id of the first failed call.
pub async fn aggregate<P, S, F, Fut>(primary: &[P], fetch: F) -> Result<Vec<S>, AggregateError>
where
    P: MediaKey,
    F: Fn(&P) -> Fut,
    Fut: Future<Output = Result<S, FetchError>>,
{
    if primary.is_empty() {
        return Ok(Vec::new());
    }

    let mut slots: Vec<Option<S>> = std::iter::repeat_with(|| None)
        .take(primary.len())
        .collect();
    let mut first_failure = None;

    for (index, id, result) in settle_all(primary, fetch).await {
        match result {
            Ok(value) => {
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(value);
                }
            }
            Err(source) => {
                if first_failure.is_none() {
                    first_failure = Some(AggregateError::Item { id, source });
                }
            }
        }
    }

    if let Some(err) = first_failure {
        return Err(err);
    }
    Ok(slots.into_iter().flatten().collect())
}

/// Like [`aggregate`] but keeps going past failures.
///
/// Returns exactly one outcome per input entity, in input order.
pub async fn aggregate_settled<P, S, F, Fut>(primary: &[P], fetch: F) -> Vec<ItemOutcome<S>>
where
    P: MediaKey,
    F: Fn(&P) -> Fut,
    Fut: Future<Output = Result<S, FetchError>>,
{
    let mut settled = settle_all(primary, fetch).await;
    settled.sort_by_key(|(index, _, _)| *index);
    settled
        .into_iter()
        .map(|(_, id, result)| ItemOutcome { id, result })
        .collect()
}

/// [`aggregate`] that gives up as soon as `token` is cancelled.
///
/// On cancellation every outstanding call is dropped and late results
/// are discarded.
///
/// # Errors
///
/// - `AggregateError::Cancelled` if `token` fires first.
/// - `AggregateError::Item` as for [`aggregate`].
pub async fn aggregate_until_cancelled<P, S, F, Fut>(
    primary: &[P],
    fetch: F,
    token: &CancellationToken,
) -> Result<Vec<S>, AggregateError>
where
    P: MediaKey,
    F: Fn(&P) -> Fut,
    Fut: Future<Output = Result<S, FetchError>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => {
            tracing::debug!(entities = primary.len(), "aggregation cancelled");
            Err(AggregateError::Cancelled)
        }
        result = aggregate(primary, fetch) => result,
    }
}

/// Indexes secondary resources by the id of the entity they belong to.
#[must_use]
pub fn index_by_id<T: MediaKey>(items: impl IntoIterator<Item = T>) -> HashMap<u64, T> {
    items
        .into_iter()
        .map(|item| (item.media_id(), item))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::arithmetic_side_effects)]

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entity(u64);

    impl MediaKey for Entity {
        fn media_id(&self) -> u64 {
            self.0
        }
    }

    fn entities(ids: &[u64]) -> Vec<Entity> {
        ids.iter().copied().map(Entity).collect()
    }

    fn failure(id: u64) -> FetchError {
        FetchError::Transport {
            url: format!("https://h/3/movie/{id}"),
            status: Some(500),
            message: String::from("server error"),
        }
    }

    /// Resolves `id * 10` after `delay_ms(id)`, recording completion order.
    fn delayed(
        completed: &Arc<Mutex<Vec<u64>>>,
        delay_ms: fn(u64) -> u64,
    ) -> impl Fn(&Entity) -> futures::future::BoxFuture<'static, Result<u64, FetchError>> {
        let completed = Arc::clone(completed);
        move |entity: &Entity| {
            let id = entity.0;
            let completed = Arc::clone(&completed);
            async move {
                tokio::time::sleep(Duration::from_millis(delay_ms(id))).await;
                completed.lock().unwrap().push(id);
                Ok(id * 10)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_empty_input_does_not_call_fetch() {
        // Arrange
        let calls = AtomicUsize::new(0);

        // Act
        let result = aggregate(&entities(&[]), |_: &Entity| {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Ok::<u64, FetchError>(0))
        })
        .await;

        // Assert
        assert_eq!(result.unwrap(), Vec::<u64>::new());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_output_follows_input_order_not_completion_order() {
        // Arrange
        let completed = Arc::new(Mutex::new(Vec::new()));
        let fetch = delayed(&completed, |id| match id {
            1 => 30,
            2 => 5,
            _ => 60,
        });

        // Act
        let result = aggregate(&entities(&[1, 2, 3]), fetch).await;

        // Assert
        assert_eq!(result.unwrap(), vec![10, 20, 30]);
        assert_eq!(*completed.lock().unwrap(), vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_one_failure_fails_batch_after_all_settle() {
        // Arrange
        let completed = Arc::new(Mutex::new(Vec::new()));
        let ok = delayed(&completed, |_| 20);
        let fetch = |entity: &Entity| {
            if entity.0 == 2 {
                futures::future::ready(Err(failure(2))).boxed()
            } else {
                ok(entity)
            }
        };

        // Act
        let result = aggregate(&entities(&[1, 2, 3]), fetch).await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.id(), Some(2));
        assert!(matches!(err, AggregateError::Item { ref source, .. } if source.status() == Some(500)));
        assert_eq!(completed.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_output_length_matches_input() {
        // Arrange
        let ids: Vec<u64> = (1..=20).collect();

        // Act
        let result = aggregate(&entities(&ids), |entity: &Entity| {
            futures::future::ready(Ok::<u64, FetchError>(entity.0))
        })
        .await;

        // Assert
        assert_eq!(result.unwrap(), ids);
    }

    #[tokio::test]
    async fn test_settled_keeps_failures_in_place() {
        // Arrange
        let completed = Arc::new(Mutex::new(Vec::new()));
        let ok = delayed(&completed, |id| 40 - id * 10);
        let fetch = |entity: &Entity| {
            if entity.0 == 2 {
                futures::future::ready(Err(failure(2))).boxed()
            } else {
                ok(entity)
            }
        };

        // Act
        let outcomes = aggregate_settled(&entities(&[1, 2, 3]), fetch).await;

        // Assert
        let ids: Vec<u64> = outcomes.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(outcomes[0].value(), Some(&10));
        assert!(!outcomes[1].is_ok());
        assert_eq!(outcomes[2].value(), Some(&30));
    }

    #[tokio::test]
    async fn test_cancellation_drops_outstanding_calls() {
        // Arrange
        let completed = Arc::new(Mutex::new(Vec::new()));
        let fetch = delayed(&completed, |_| 5_000);
        let token = CancellationToken::new();
        let canceller = {
            let token = token.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                token.cancel();
            }
        };

        let items = entities(&[1, 2]);

        // Act
        let start = Instant::now();
        let (result, ()) = tokio::join!(
            aggregate_until_cancelled(&items, fetch, &token),
            canceller
        );

        // Assert
        assert_eq!(result, Err(AggregateError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(completed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_fetch() {
        // Arrange
        let calls = AtomicUsize::new(0);
        let token = CancellationToken::new();
        token.cancel();

        // Act
        let result = aggregate_until_cancelled(
            &entities(&[1]),
            |_: &Entity| {
                calls.fetch_add(1, Ordering::SeqCst);
                futures::future::ready(Ok::<u64, FetchError>(1))
            },
            &token,
        )
        .await;

        // Assert
        assert_eq!(result, Err(AggregateError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_uncancelled_token_returns_results() {
        // Arrange
        let token = CancellationToken::new();

        // Act
        let result = aggregate_until_cancelled(
            &entities(&[4, 5]),
            |entity: &Entity| futures::future::ready(Ok::<u64, FetchError>(entity.0)),
            &token,
        )
        .await;

        // Assert
        assert_eq!(result.unwrap(), vec![4, 5]);
    }

    #[test]
    fn test_index_by_id() {
        // Arrange & Act
        let index = index_by_id(entities(&[7, 3]));

        // Assert
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&3), Some(&Entity(3)));
        assert!(!index.contains_key(&1));
    }
}
