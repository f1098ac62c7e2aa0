use serde_json::json;

use docstore::{DocumentStore, MemoryStore, StoreConfig};

#[tokio::test]
async fn test_upsert_is_keyed_by_filter() {
    let store = MemoryStore::new();

    // Two different keys create two documents; repeating a key does not.
    store
        .upsert("scores", json!({"id": "r1"}), json!({"$set": {"v": 1}}))
        .await
        .unwrap();
    store
        .upsert("scores", json!({"id": "r2"}), json!({"$set": {"v": 2}}))
        .await
        .unwrap();
    store
        .upsert("scores", json!({"id": "r1"}), json!({"$set": {"v": 3}}))
        .await
        .unwrap();

    let docs = store.find("scores").await.unwrap();
    assert_eq!(docs.len(), 2);

    let r1 = docs.iter().find(|d| d["id"] == json!("r1")).unwrap();
    assert_eq!(r1["v"], json!(3));
}

#[tokio::test]
async fn test_insert_preserves_order() {
    let store = MemoryStore::new();
    for i in 0..5 {
        store
            .insert("time_series", json!({"word": "cat", "count": i}))
            .await
            .unwrap();
    }

    let docs = store.find("time_series").await.unwrap();
    let counts: Vec<i64> = docs.iter().map(|d| d["count"].as_i64().unwrap()).collect();
    assert_eq!(counts, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_inc_creates_missing_counter() {
    let store = MemoryStore::new();
    store
        .upsert(
            "word_frequency",
            json!({"word": "dog"}),
            json!({"$inc": {"count": 4}}),
        )
        .await
        .unwrap();

    let docs = store.find("word_frequency").await.unwrap();
    assert_eq!(docs[0]["word"], json!("dog"));
    assert_eq!(docs[0]["count"], json!(4));
}

#[test]
fn test_config_defaults_validate() {
    let config = StoreConfig::default();
    assert!(config.validate().is_ok());
    assert!(!config.analysis_log_collection.is_empty());
}
