//! Cache behaviour relied on by the memory session store and the access
//! token cache: expiry, TTL reporting, default TTLs and background cleanup.

use std::sync::Arc;
use std::time::Duration;
use storefront::cache::{Cache, CacheConfig};

fn create_test_cache() -> Cache<String> {
    Cache::new_local(CacheConfig {
        cleanup_interval_seconds: 1,
        default_ttl_seconds: None,
    })
}

#[tokio::test]
async fn test_set_overwrites_existing() {
    let cache = create_test_cache();

    cache.set("state", "MENU".to_string()).await.unwrap();
    cache.set("state", "CART".to_string()).await.unwrap();

    assert_eq!(cache.get("state").await.unwrap(), Some("CART".to_string()));
}

#[tokio::test]
async fn test_set_with_expiration() {
    let cache = create_test_cache();

    cache.set_ex("token", "abc".to_string(), 1).await.unwrap();
    assert_eq!(cache.get("token").await.unwrap(), Some("abc".to_string()));

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(cache.get("token").await.unwrap(), None);
}

#[tokio::test]
async fn test_ttl_retrieval() {
    let cache = create_test_cache();

    cache.set("forever", "x".to_string()).await.unwrap();
    cache.set_ex("soon", "y".to_string(), 100).await.unwrap();

    assert_eq!(cache.ttl("forever").await.unwrap(), None);
    assert_eq!(cache.ttl("missing").await.unwrap(), None);
    let ttl = cache.ttl("soon").await.unwrap().unwrap();
    assert!(ttl > 95 && ttl <= 100);
}

#[tokio::test]
async fn test_default_ttl() {
    let cache: Cache<String> = Cache::new_local(CacheConfig {
        cleanup_interval_seconds: 60,
        default_ttl_seconds: Some(300),
    });

    cache.set("state", "MENU".to_string()).await.unwrap();

    let ttl = cache.ttl("state").await.unwrap().unwrap();
    assert!(ttl > 295 && ttl <= 300);
}

#[tokio::test]
async fn test_background_cleanup_removes_expired_entries() {
    let cache = create_test_cache();

    cache.set_ex("short", "x".to_string(), 1).await.unwrap();
    cache.set("long", "y".to_string()).await.unwrap();

    // Wait for expiry plus at least one cleanup tick
    tokio::time::sleep(Duration::from_millis(2500)).await;

    // An expired entry still in the map would report Some(0)
    assert_eq!(cache.ttl("short").await.unwrap(), None);
    assert_eq!(cache.get("long").await.unwrap(), Some("y".to_string()));
}

#[tokio::test]
async fn test_concurrent_writes() {
    let cache = Arc::new(create_test_cache());

    let mut handles = Vec::new();
    for i in 0..20 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            cache
                .set(&format!("conversation:{i}"), format!("state-{i}"))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    for i in 0..20 {
        assert_eq!(
            cache.get(&format!("conversation:{i}")).await.unwrap(),
            Some(format!("state-{i}"))
        );
    }
}
