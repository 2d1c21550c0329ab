//! Redis store tests (need a running server)

use mountaingear_server::store::{BoundedWrite, CounterOutcome, KvStore, RedisStore};

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

fn unique_key(name: &str) -> String {
    format!("mountaingear-test:{}:{}", name, uuid::Uuid::new_v4())
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_counter_scripts() {
    let store = RedisStore::connect(&redis_url()).await.unwrap();
    let key = unique_key("equipment");
    store
        .hset(
            &key,
            vec![
                ("stock".to_string(), "2".to_string()),
                ("available".to_string(), "1".to_string()),
            ],
        )
        .await
        .unwrap();

    assert_eq!(
        store.htake_unit(&key, "available").await.unwrap(),
        CounterOutcome::Changed { from: 1, to: 0 }
    );
    assert_eq!(
        store.htake_unit(&key, "available").await.unwrap(),
        CounterOutcome::Exhausted
    );
    store.hrestore_unit(&key, "available", "stock").await.unwrap();
    store.hrestore_unit(&key, "available", "stock").await.unwrap();
    assert_eq!(
        store.hrestore_unit(&key, "available", "stock").await.unwrap(),
        CounterOutcome::Changed { from: 2, to: 2 }
    );
    assert_eq!(
        store.htake_unit(&unique_key("missing"), "available").await.unwrap(),
        CounterOutcome::Missing
    );

    assert!(store.del(&key).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_compare_and_set() {
    let store = RedisStore::connect(&redis_url()).await.unwrap();
    let key = unique_key("renter");
    store
        .hset(&key, vec![("status".to_string(), "\"Active\"".to_string())])
        .await
        .unwrap();

    assert!(store
        .hcompare_and_set(&key, "status", "\"Active\"", "\"Completed\"")
        .await
        .unwrap());
    assert!(!store
        .hcompare_and_set(&key, "status", "\"Active\"", "\"Completed\"")
        .await
        .unwrap());

    let fields = store.hgetall(&key).await.unwrap();
    assert_eq!(fields["status"], "\"Completed\"");
    store.del(&key).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_bounded_write() {
    let store = RedisStore::connect(&redis_url()).await.unwrap();
    let key = unique_key("equipment");
    store
        .hset(
            &key,
            vec![
                ("stock".to_string(), "5".to_string()),
                ("available".to_string(), "5".to_string()),
            ],
        )
        .await
        .unwrap();

    assert_eq!(
        store
            .hset_bounded(&key, vec![("stock".to_string(), "4".to_string())], "available", "stock")
            .await
            .unwrap(),
        BoundedWrite::Rejected
    );
    assert_eq!(
        store
            .hset_bounded(
                &key,
                vec![
                    ("stock".to_string(), "4".to_string()),
                    ("available".to_string(), "3".to_string()),
                ],
                "available",
                "stock"
            )
            .await
            .unwrap(),
        BoundedWrite::Written
    );
    let fields = store.hgetall(&key).await.unwrap();
    assert_eq!((fields["stock"].as_str(), fields["available"].as_str()), ("4", "3"));
    store.del(&key).await.unwrap();
}
