use linkboard_server::domain::auth::SessionId;
use linkboard_server::domain::session::SessionData;
use linkboard_server::storage::session_store::SessionStore;
use redis::AsyncCommands;

mod common;

fn sample_data(user_id: i64) -> SessionData {
    SessionData {
        user_id,
        remember_me: true,
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
    }
}

async fn connect() -> SessionStore {
    common::setup_tracing();
    let config = common::test_config();
    SessionStore::connect(&config.redis_url).await.expect("Failed to connect to Redis. Is it running?")
}

#[tokio::test]
async fn test_session_lifecycle() {
    let store = connect().await;
    let id = SessionId::generate();
    let data = sample_data(1);

    assert!(!store.exists(&id).await.unwrap());
    assert!(store.get(&id).await.unwrap().is_none(), "absent key is a normal no-data result");

    store.set(&id, &data, Some(3600)).await.unwrap();
    assert!(store.exists(&id).await.unwrap());
    assert_eq!(store.get(&id).await.unwrap(), Some(data));

    store.touch(&id, 7200).await.unwrap();
    assert!(store.exists(&id).await.unwrap());

    store.delete(&id).await.unwrap();
    assert!(!store.exists(&id).await.unwrap());

    // Deleting again is not an error
    store.delete(&id).await.unwrap();
}

#[tokio::test]
async fn test_session_without_ttl_persists() {
    let store = connect().await;
    let config = common::test_config();
    let id = SessionId::generate();

    store.set(&id, &sample_data(2), None).await.unwrap();

    // No store TTL was applied: the key reports no expiry
    let client = redis::Client::open(config.redis_url.as_str()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let ttl: i64 = conn.ttl(format!("sess:{id}")).await.unwrap();
    assert_eq!(ttl, -1, "entry should be non-expiring");

    store.delete(&id).await.unwrap();
}

#[tokio::test]
async fn test_malformed_payload_reads_as_absent() {
    let store = connect().await;
    let config = common::test_config();
    let id = SessionId::generate();

    let client = redis::Client::open(config.redis_url.as_str()).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let _: () = conn.set(format!("sess:{id}"), "not json").await.unwrap();

    assert_eq!(store.get(&id).await.unwrap(), None);

    store.delete(&id).await.unwrap();
}
