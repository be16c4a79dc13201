//! In-memory query cache with in-flight deduplication.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::Mutex;

/// One producer invocation shared by every caller waiting on its key.
type Flight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

/// Cache slot for one key.
enum Slot<V, E> {
    /// Settled value and the instant it was stored.
    Ready { value: V, stored_at: Instant },
    /// Producer running; `generation` identifies this flight.
    InFlight {
        generation: u64,
        flight: Flight<V, E>,
    },
}

/// Result of looking a key up under the lock.
enum Lookup<V, E> {
    Hit(V),
    Join(u64, Flight<V, E>),
    Miss,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct CacheStats {
    /// Calls answered from a settled value.
    pub hits: u64,
    /// Calls that started a new flight.
    pub misses: u64,
    /// Calls that attached to a flight already running.
    pub joins: u64,
}

struct Inner<K, V, E> {
    slots: HashMap<K, Slot<V, E>>,
    next_generation: u64,
    stats: CacheStats,
}

/// Memoizes async producers by key.
///
/// - A fresh settled value is returned without invoking the producer.
/// - While a producer runs for a key, further callers await the same
///   shared future; there is never more than one flight per key.
/// - A failed flight is not cached. Every caller attached to it sees the
///   same error and the next call starts a new flight.
///
/// The map lock is only held for lookups and writes, never while a
/// producer is awaited.
#[allow(clippy::module_name_repetitions)]
pub struct QueryCache<K, V, E> {
    inner: Mutex<Inner<K, V, E>>,
    ttl: Option<Duration>,
}

impl<K, V, E> Debug for QueryCache<K, V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<K, V, E> Default for QueryCache<K, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> QueryCache<K, V, E> {
    /// Creates a cache whose entries live for the whole process.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                slots: HashMap::new(),
                next_generation: 0,
                stats: CacheStats::default(),
            }),
            ttl: None,
        }
    }

    /// Creates a cache whose settled entries go stale after `ttl`.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::new()
        }
    }

    /// Configured time-to-live, if any.
    #[must_use]
    pub const fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_fresh(&self, stored_at: Instant) -> bool {
        self.ttl.is_none_or(|ttl| stored_at.elapsed() < ttl)
    }

    /// Counters since creation.
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats
    }

    /// Number of slots, settled or in flight.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.slots.len()
    }

    /// Returns `true` when no slot exists.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.slots.is_empty()
    }

    /// Drops every slot. Running flights still resolve for their callers
    /// but their results are not stored.
    pub async fn clear(&self) {
        self.inner.lock().await.slots.clear();
    }
}

impl<K, V, E> QueryCache<K, V, E>
where
    K: Eq + Hash + Clone + Debug + Send,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Drops the slot for `key`. A running flight still resolves for its
    /// callers but its result is not stored.
    pub async fn invalidate(&self, key: &K) -> bool {
        self.inner.lock().await.slots.remove(key).is_some()
    }

    /// Returns the settled value for `key` without starting a flight.
    pub async fn peek(&self, key: &K) -> Option<V> {
        let inner = self.inner.lock().await;
        match inner.slots.get(key) {
            Some(Slot::Ready { value, stored_at }) if self.is_fresh(*stored_at) => {
                Some(value.clone())
            }
            _ => None,
        }
    }

    /// Returns the cached value for `key`, or runs `producer` once and
    /// shares its outcome with every concurrent caller for that key.
    ///
    /// # Errors
    ///
    /// Returns the producer's error. The error is not cached.
    pub async fn get_or_compute<F, Fut>(&self, key: K, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let (generation, flight) = {
            let mut inner = self.inner.lock().await;
            let lookup = match inner.slots.get(&key) {
                Some(Slot::Ready { value, stored_at }) if self.is_fresh(*stored_at) => {
                    Lookup::Hit(value.clone())
                }
                Some(Slot::InFlight { generation, flight }) => {
                    Lookup::Join(*generation, flight.clone())
                }
                _ => Lookup::Miss,
            };

            match lookup {
                Lookup::Hit(value) => {
                    inner.stats.hits = inner.stats.hits.saturating_add(1);
                    tracing::debug!(?key, "query cache hit");
                    return Ok(value);
                }
                Lookup::Join(generation, flight) => {
                    inner.stats.joins = inner.stats.joins.saturating_add(1);
                    tracing::debug!(?key, "query cache join");
                    (generation, flight)
                }
                Lookup::Miss => {
                    inner.stats.misses = inner.stats.misses.saturating_add(1);
                    let generation = inner.next_generation;
                    inner.next_generation = generation.wrapping_add(1);
                    let flight = producer().boxed().shared();
                    inner.slots.insert(
                        key.clone(),
                        Slot::InFlight {
                            generation,
                            flight: flight.clone(),
                        },
                    );
                    tracing::debug!(?key, "query cache miss");
                    (generation, flight)
                }
            }
        };

        let result = flight.await;
        self.settle(key, generation, &result).await;
        result
    }

    /// Replaces the flight `generation` of `key` with its outcome.
    ///
    /// Whichever waiter gets here first does the write; a slot that was
    /// invalidated or already replaced is left alone.
    async fn settle(&self, key: K, generation: u64, result: &Result<V, E>) {
        let mut inner = self.inner.lock().await;
        let current = matches!(
            inner.slots.get(&key),
            Some(Slot::InFlight { generation: g, .. }) if *g == generation
        );
        if !current {
            return;
        }
        match result {
            Ok(value) => {
                inner.slots.insert(
                    key,
                    Slot::Ready {
                        value: value.clone(),
                        stored_at: Instant::now(),
                    },
                );
            }
            Err(_) => {
                tracing::debug!(?key, "query failed, not cached");
                inner.slots.remove(&key);
            }
        }
    }
}
