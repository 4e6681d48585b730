//! In-process TTL cache.
//!
//! Backs the in-memory conversation state store and the catalog access-token
//! cache. Clones share one DashMap; expired entries are swept by a background
//! task that lives as long as any clone does.

use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl_seconds: Option<u64>) -> Self {
        Self {
            value,
            expires_at: ttl_seconds.map(|ttl| Utc::now() + Duration::seconds(ttl as i64)),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| exp < Utc::now())
    }

    fn remaining_ttl(&self) -> Option<i64> {
        self.expires_at
            .map(|exp| (exp - Utc::now()).num_seconds().max(0))
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Background cleanup interval in seconds (default: 60)
    pub cleanup_interval_seconds: u64,
    /// TTL applied by `set` (None means no expiration)
    pub default_ttl_seconds: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_seconds: 60,
            default_ttl_seconds: None,
        }
    }
}

#[derive(Debug)]
struct Shared<V> {
    storage: Arc<DashMap<String, CacheEntry<V>>>,
    cleanup_task: JoinHandle<()>,
    default_ttl_seconds: Option<u64>,
}

impl<V> Drop for Shared<V> {
    fn drop(&mut self) {
        // Last clone gone
        self.cleanup_task.abort();
    }
}

/// Shared TTL cache.
///
/// # Example
/// ```rust,no_run
/// use storefront::cache::{Cache, CacheConfig};
///
/// # #[tokio::main] async fn main() {
/// let cache: Cache<String> = Cache::new_local(CacheConfig::default());
/// cache.set_ex("token", "abc".to_string(), 3600).await.unwrap();
/// # }
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a new local cache. Must be called inside a tokio runtime
    /// because the cleanup task is spawned immediately.
    pub fn new_local(config: CacheConfig) -> Self {
        let storage = Arc::new(DashMap::new());
        let cleanup_task = spawn_cleanup_task(Arc::clone(&storage), config.cleanup_interval_seconds);

        Self {
            shared: Arc::new(Shared {
                storage,
                cleanup_task,
                default_ttl_seconds: config.default_ttl_seconds,
            }),
        }
    }

    /// Returns `None` for a missing or expired key.
    pub async fn get(&self, key: &str) -> Result<Option<V>> {
        let value = self
            .shared
            .storage
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone());
        Ok(value)
    }

    /// Set a value with the default TTL, if one is configured.
    pub async fn set(&self, key: &str, value: V) -> Result<()> {
        let entry = CacheEntry::new(value, self.shared.default_ttl_seconds);
        self.shared.storage.insert(key.to_string(), entry);
        Ok(())
    }

    pub async fn set_ex(&self, key: &str, value: V, ttl_seconds: u64) -> Result<()> {
        let entry = CacheEntry::new(value, Some(ttl_seconds));
        self.shared.storage.insert(key.to_string(), entry);
        Ok(())
    }

    /// Remaining TTL in seconds; `None` if the key is missing or never expires.
    /// An expired key not yet swept reports `Some(0)`.
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>> {
        Ok(self
            .shared
            .storage
            .get(key)
            .and_then(|entry| entry.remaining_ttl()))
    }
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

fn spawn_cleanup_task<V>(
    storage: Arc<DashMap<String, CacheEntry<V>>>,
    interval_seconds: u64,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(interval_seconds));
        loop {
            interval.tick().await;
            let now = Utc::now();
            storage.retain(|_, entry| entry.expires_at.is_none_or(|exp| exp > now));
        }
    })
}
