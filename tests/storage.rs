use areatrack::config::DatabaseConfig;
use areatrack::storage::LocalStorage;

#[tokio::test]
async fn test_local_storage_creation() {
    let result = LocalStorage::in_memory().await;
    assert!(result.is_ok(), "LocalStorage should be created successfully");
    assert!(!result.unwrap().has_data().await.unwrap());
}

#[tokio::test]
async fn test_local_storage_from_config() {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    };
    let storage = LocalStorage::new(&config).await.unwrap();
    assert!(!storage.has_data().await.unwrap());
}
