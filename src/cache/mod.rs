//! In-memory expiring caches.
//!
//! Entries are never evicted; an entry older than the cache TTL is simply
//! reported as stale on the next read. Callers decide whether to refresh.
//! All state is lost on restart.

mod single_flight;

pub use single_flight::SingleFlight;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock as StdRwLock;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;
use tracing::debug;

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: StdRwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: StdRwLock::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += to_time_delta(by);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

fn to_time_delta(d: Duration) -> TimeDelta {
    TimeDelta::from_std(d).unwrap_or(TimeDelta::MAX)
}

/// A cached value and the time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub written_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Stale iff strictly older than `ttl`; an entry exactly `ttl` old is fresh.
    pub fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.written_at) > to_time_delta(ttl)
    }
}

/// Keyed TTL cache. Readers always receive clones, never references.
///
/// The whole-roster slot is a `TtlCache<(), _>`.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + std::fmt::Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Get the entry for `key`, fresh or not.
    pub async fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        self.entries.read().await.get(key).cloned()
    }

    /// Get the value for `key` only if it is still fresh at `now`.
    pub async fn get_fresh(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if !entry.is_stale(self.ttl, now) => {
                debug!("Cache hit for {:?}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Cache entry for {:?} is stale", key);
                None
            }
            None => None,
        }
    }

    /// Replace the entry for `key` wholesale.
    pub async fn put(&self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.write().await.insert(
            key,
            CacheEntry {
                value,
                written_at: now,
            },
        );
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_entry_staleness_boundary_is_inclusive() {
        let entry = CacheEntry {
            value: 1,
            written_at: t0(),
        };
        let ttl = Duration::from_secs(600);

        assert!(!entry.is_stale(ttl, t0()));
        assert!(!entry.is_stale(ttl, t0() + TimeDelta::seconds(600)));
        assert!(entry.is_stale(ttl, t0() + TimeDelta::milliseconds(600_001)));
        assert!(entry.is_stale(ttl, t0() + TimeDelta::seconds(601)));
    }

    #[test]
    fn test_entry_staleness_across_ttls() {
        let entry = CacheEntry {
            value: (),
            written_at: t0(),
        };

        for ttl in [0u64, 1, 59, 600, 1800] {
            for elapsed in [0u64, 1, 60, 600, 1800, 3600] {
                let now = t0() + TimeDelta::seconds(elapsed as i64);
                assert_eq!(
                    entry.is_stale(Duration::from_secs(ttl), now),
                    elapsed > ttl,
                    "ttl={} elapsed={}",
                    ttl,
                    elapsed
                );
            }
        }
    }

    #[tokio::test]
    async fn test_missing_entry_is_never_fresh() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(600));
        let key = "nobody#0000".to_string();

        assert_eq!(cache.get_fresh(&key, t0()).await, None);
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_fresh_until_ttl() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(600));
        let key = "Ace#WIN".to_string();
        cache.put(key.clone(), 42, t0()).await;

        assert_eq!(cache.get_fresh(&key, t0()).await, Some(42));
        assert_eq!(
            cache.get_fresh(&key, t0() + TimeDelta::seconds(600)).await,
            Some(42)
        );
        assert_eq!(
            cache.get_fresh(&key, t0() + TimeDelta::seconds(601)).await,
            None
        );

        // Stale entries are still readable
        let entry = cache.get(&key).await.unwrap();
        assert_eq!(entry.value, 42);
        assert_eq!(entry.written_at, t0());
    }

    #[tokio::test]
    async fn test_put_replaces_entry() {
        let cache: TtlCache<(), &str> = TtlCache::new(Duration::from_secs(1800));
        cache.put((), "old", t0()).await;
        cache.put((), "new", t0() + TimeDelta::seconds(5)).await;

        let entry = cache.get(&()).await.unwrap();
        assert_eq!(entry.value, "new");
        assert_eq!(entry.written_at, t0() + TimeDelta::seconds(5));
        // Freshness counts from the latest write
        assert_eq!(
            cache.get_fresh(&(), t0() + TimeDelta::seconds(1805)).await,
            Some("new")
        );
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(t0());
        assert_eq!(clock.now(), t0());

        clock.advance(Duration::from_secs(90));
        assert_eq!(clock.now(), t0() + TimeDelta::seconds(90));

        clock.set(t0());
        assert_eq!(clock.now(), t0());
    }
}
