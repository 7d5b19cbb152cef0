//! Cache port: a small TTL key-value store fronting the read views, plus
//! prefix invalidation for the four fixed prefixes the reporting/portal
//! surfaces use.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

#[async_trait]
pub trait CachePort: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
    async fn invalidate_prefix(&self, prefix: &str);
}

/// The four cache namespaces a tournament mutation must invalidate.
pub fn tournament_cache_prefixes(tournament_id: uuid::Uuid) -> [String; 4] {
    [
        format!("reports:{tournament_id}:"),
        format!("portal:college:{tournament_id}"),
        format!("portal:pro:{tournament_id}"),
        format!("api:standings-poll:{tournament_id}"),
    ]
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Default in-process adapter: one mutex around a `HashMap`. Fine for a
/// single-node deployment; swapped for a Redis-backed `CachePort` impl in
/// a multi-node one.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CachePort for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().expect("cache mutex poisoned");
        entries.retain(|key, _| !key.starts_with(prefix));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expired_entries_are_not_returned() {
        let cache = InMemoryCache::new();
        cache
            .set("reports:t1:standings", "stale".into(), Duration::from_millis(1))
            .await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(cache.get("reports:t1:standings").await, None);
    }

    #[tokio::test]
    async fn invalidate_prefix_only_clears_matching_keys() {
        let cache = InMemoryCache::new();
        cache
            .set("reports:t1:standings", "a".into(), Duration::from_secs(60))
            .await;
        cache
            .set("reports:t2:standings", "b".into(), Duration::from_secs(60))
            .await;
        cache.invalidate_prefix("reports:t1:").await;
        assert_eq!(cache.get("reports:t1:standings").await, None);
        assert_eq!(cache.get("reports:t2:standings").await, Some("b".into()));
    }
}
