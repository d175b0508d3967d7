//! Single-slot, time-boxed result cache.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default lifetime of a cached payload.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    payload: T,
    captured_at: Instant,
}

/// Holds at most one payload and forgets it once it is older than the TTL.
///
/// Overlapping writers race; the last `set` wins.
#[derive(Debug)]
pub struct ResultCache<T> {
    slot: Mutex<Option<CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> ResultCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// The cached payload, if one was set less than `ttl` ago.
    pub async fn get(&self) -> Option<T> {
        let slot = self.slot.lock().await;
        slot.as_ref()
            .filter(|entry| entry.captured_at.elapsed() < self.ttl)
            .map(|entry| entry.payload.clone())
    }

    /// Replace the cached payload and restart its lifetime.
    pub async fn set(&self, payload: T) {
        let mut slot = self.slot.lock().await;
        *slot = Some(CacheEntry {
            payload,
            captured_at: Instant::now(),
        });
    }
}

impl<T: Clone> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
