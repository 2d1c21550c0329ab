//! Read cache for hot, rarely-changing responses (catalog, settings, profit).
//!
//! The cache is an explicit object held by the services rather than shared
//! module state. Entries expire after the configured TTL and writers drop
//! them through [`ResponseCache::invalidate`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, trace};

struct CachedValue {
    value: Value,
    stored_at: Instant,
}

#[derive(Clone)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, CachedValue>>>,
}

impl ResponseCache {
    /// A zero TTL disables caching
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    fn enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Fresh cached value for `key`, if any
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled() {
            return None;
        }
        let entries = self.entries.read().await;
        let cached = entries.get(key)?;
        if cached.stored_at.elapsed() >= self.ttl {
            trace!("Cache entry {} expired", key);
            return None;
        }
        serde_json::from_value(cached.value.clone()).ok()
    }

    pub async fn insert<T: Serialize>(&self, key: &str, value: &T) {
        if !self.enabled() {
            return;
        }
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CachedValue {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop entries whose key starts with `prefix`, or everything when no
    /// prefix is given. Returns the number of dropped entries.
    pub async fn invalidate(&self, prefix: Option<&str>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        match prefix {
            Some(prefix) => entries.retain(|key, _| !key.starts_with(prefix)),
            None => entries.clear(),
        }
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!("Invalidated {} cache entries (prefix {:?})", dropped, prefix);
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn entries_expire() {
        let cache = ResponseCache::new(Duration::from_millis(20));
        cache.insert("settings", &42u32).await;
        assert_eq!(cache.get::<u32>("settings").await, Some(42));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get::<u32>("settings").await, None);
    }

    #[tokio::test]
    async fn invalidate_by_prefix() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("equipment:list", &vec![1u32, 2]).await;
        cache.insert("profit:total", &10u64).await;

        assert_eq!(cache.invalidate(Some("equipment")).await, 1);
        assert_eq!(cache.get::<Vec<u32>>("equipment:list").await, None);
        assert_eq!(cache.get::<u64>("profit:total").await, Some(10));

        assert_eq!(cache.invalidate(None).await, 1);
        assert_eq!(cache.get::<u64>("profit:total").await, None);
    }

    #[tokio::test]
    async fn zero_ttl_disables_cache() {
        let cache = ResponseCache::disabled();
        cache.insert("settings", &1u32).await;
        assert_eq!(cache.get::<u32>("settings").await, None);
    }
}
