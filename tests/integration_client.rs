use linkboard_server::client::{
    AuthClient, ClientError, TokenStore, TransientTokenStore, store_for_policy,
};
use linkboard_server::domain::auth::{Claims, TokenPair};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

mod common;

#[tokio::test]
async fn test_client_register_me_logout() {
    let app = common::TestApp::spawn().await;
    let store: Arc<dyn TokenStore> = Arc::new(TransientTokenStore::default());
    let client = AuthClient::new(app.server_url.clone(), Arc::clone(&store));

    let email = common::unique_email("client");
    let user = client.register(&email, "Secret123!", Some("Client User"), false).await.unwrap();
    assert_eq!(user.email, email);

    let me = client.me().await.unwrap();
    assert_eq!(me.id, user.id);

    client.logout().await.unwrap();
    assert!(store.access_token().await.is_none());

    // Without tokens the adapter cannot recover the session
    let err = client.me().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
}

#[tokio::test]
async fn test_client_transparently_refreshes_expired_access_token() {
    let app = common::TestApp::spawn().await;
    let store: Arc<dyn TokenStore> = Arc::new(TransientTokenStore::default());
    let client = AuthClient::new(app.server_url.clone(), Arc::clone(&store));

    let email = common::unique_email("stale");
    client.register(&email, "Secret123!", None, false).await.unwrap();

    // Swap in an expired access token, keeping the valid refresh token
    let refresh_token = store.refresh_token().await.unwrap();
    let expired = Claims { sub: 0, email: email.clone(), exp: 1_000 }
        .encode(&app.config.auth.jwt_secret)
        .unwrap();
    store
        .set_tokens(&TokenPair { access_token: expired, refresh_token }, false)
        .await
        .unwrap();

    let me = client.me().await.unwrap();
    assert_eq!(me.email, email);

    // The store now holds the rotated pair
    assert!(store.access_token().await.is_some());
}

#[tokio::test]
async fn test_concurrent_401s_trigger_exactly_one_refresh() {
    let refresh_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&refresh_calls);

    let app = common::TestApp::spawn_with(move |router| {
        router.layer(axum::middleware::from_fn(
            move |req: axum::extract::Request, next: axum::middleware::Next| {
                let counter = Arc::clone(&counter);
                async move {
                    if req.uri().path() == "/auth/refresh" {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                    next.run(req).await
                }
            },
        ))
    })
    .await;

    let store: Arc<dyn TokenStore> = Arc::new(TransientTokenStore::default());
    let client = AuthClient::new(app.server_url.clone(), Arc::clone(&store));

    let email = common::unique_email("swarm");
    client.register(&email, "Secret123!", None, false).await.unwrap();
    assert_eq!(refresh_calls.load(Ordering::SeqCst), 0);

    // Expire the access token so every in-flight request hits a 401
    let refresh_token = store.refresh_token().await.unwrap();
    let expired = Claims { sub: 0, email: email.clone(), exp: 1_000 }
        .encode(&app.config.auth.jwt_secret)
        .unwrap();
    store
        .set_tokens(&TokenPair { access_token: expired, refresh_token }, false)
        .await
        .unwrap();

    let results = futures::future::join_all((0..8).map(|_| client.me())).await;
    for result in results {
        assert_eq!(result.unwrap().email, email);
    }

    assert_eq!(
        refresh_calls.load(Ordering::SeqCst),
        1,
        "queued 401s must share a single refresh call"
    );
}

#[tokio::test]
async fn test_client_clears_tokens_when_refresh_is_rejected() {
    let app = common::TestApp::spawn().await;
    let store: Arc<dyn TokenStore> = Arc::new(TransientTokenStore::default());
    let client = AuthClient::new(app.server_url.clone(), Arc::clone(&store));

    let email = common::unique_email("dead");
    client.register(&email, "Secret123!", None, false).await.unwrap();

    // Both tokens bad: the refresh attempt is rejected server-side
    let expired = Claims { sub: 0, email: email.clone(), exp: 1_000 }
        .encode(&app.config.auth.jwt_secret)
        .unwrap();
    store
        .set_tokens(
            &TokenPair { access_token: expired.clone(), refresh_token: expired },
            false,
        )
        .await
        .unwrap();

    let err = client.me().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
    assert!(store.refresh_token().await.is_none(), "rejected refresh must clear the store");
}

#[tokio::test]
async fn test_client_remember_me_policy_survives_restart() {
    let app = common::TestApp::spawn().await;
    let state_path = std::env::temp_dir().join(format!("client_state_{}.json", uuid::Uuid::new_v4()));

    let email = common::unique_email("durable");
    {
        let store = store_for_policy(true, state_path.clone());
        let client = AuthClient::new(app.server_url.clone(), store);
        client.register(&email, "Secret123!", None, true).await.unwrap();
    }

    // A fresh client over the same state file picks the tokens back up
    let store = store_for_policy(true, state_path.clone());
    let client = AuthClient::new(app.server_url.clone(), Arc::clone(&store));
    let me = client.me().await.unwrap();
    assert_eq!(me.email, email);

    store.clear().await;
}
