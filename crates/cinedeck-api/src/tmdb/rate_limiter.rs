//! Request spacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default minimum gap between request starts (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Keeps consecutive requests at least `min_interval` apart.
///
/// TMDB allows roughly 40 requests per second. A fan-out over a full
/// listing page fires 20 requests at once; they leave in sequence.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct RateLimiter {
    /// Minimum gap between request starts.
    min_interval: Duration,
    /// Earliest instant the next request may start.
    next_slot: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Creates a limiter with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits for the next free slot and reserves the one after it.
    pub async fn acquire(&mut self) {
        if let Some(slot) = self.next_slot {
            let now = Instant::now();
            if slot > now {
                tokio::time::sleep(slot.saturating_duration_since(now)).await;
            }
        }
        self.next_slot = Instant::now().checked_add(self.min_interval);
    }
}
