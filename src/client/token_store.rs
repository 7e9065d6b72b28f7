use crate::domain::auth::TokenPair;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;

const PERSISTENT_TTL: Duration = Duration::from_secs(7 * 86_400);

/// Where the client keeps its token pair. One interface, swappable backends,
/// selected by the remember-me policy rather than parallel modules.
#[async_trait]
pub trait TokenStore: std::fmt::Debug + Send + Sync {
    async fn set_tokens(&self, tokens: &TokenPair, remember_me: bool) -> io::Result<()>;
    async fn access_token(&self) -> Option<String>;
    async fn refresh_token(&self) -> Option<String>;
    async fn remember_me(&self) -> bool;
    async fn clear(&self);
}

/// Picks the backend for a remember-me preference: durable file storage
/// (the cookie analogue) when remembered, in-memory otherwise.
#[must_use]
pub fn store_for_policy(remember_me: bool, state_path: PathBuf) -> Arc<dyn TokenStore> {
    if remember_me {
        Arc::new(PersistentTokenStore::new(state_path))
    } else {
        Arc::new(TransientTokenStore::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTokens {
    access_token: String,
    refresh_token: String,
    remember_me: bool,
    /// Unix seconds after which the entry reads as absent.
    expires_at: u64,
}

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Tokens held only in memory; dropping the client forgets them, like
/// session storage cleared with the browser tab.
#[derive(Debug, Default)]
pub struct TransientTokenStore {
    tokens: RwLock<Option<StoredTokens>>,
}

#[async_trait]
impl TokenStore for TransientTokenStore {
    async fn set_tokens(&self, tokens: &TokenPair, remember_me: bool) -> io::Result<()> {
        *self.tokens.write().await = Some(StoredTokens {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            remember_me,
            expires_at: u64::MAX,
        });
        Ok(())
    }

    async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.access_token.clone())
    }

    async fn refresh_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.refresh_token.clone())
    }

    async fn remember_me(&self) -> bool {
        self.tokens.read().await.as_ref().is_some_and(|t| t.remember_me)
    }

    async fn clear(&self) {
        *self.tokens.write().await = None;
    }
}

/// Tokens persisted to a state file with a seven-day expiry stamp, the
/// counterpart of the remember-me cookie.
#[derive(Debug)]
pub struct PersistentTokenStore {
    path: PathBuf,
    ttl: Duration,
}

impl PersistentTokenStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path, ttl: PERSISTENT_TTL }
    }

    #[must_use]
    pub const fn with_ttl(path: PathBuf, ttl: Duration) -> Self {
        Self { path, ttl }
    }

    /// Expired entries read as absent.
    async fn read(&self) -> Option<StoredTokens> {
        let raw = tokio::fs::read(&self.path).await.ok()?;
        let stored: StoredTokens = serde_json::from_slice(&raw).ok()?;
        (stored.expires_at > now_secs()).then_some(stored)
    }
}

#[async_trait]
impl TokenStore for PersistentTokenStore {
    async fn set_tokens(&self, tokens: &TokenPair, remember_me: bool) -> io::Result<()> {
        let stored = StoredTokens {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            remember_me,
            expires_at: now_secs() + self.ttl.as_secs(),
        };
        let raw = serde_json::to_vec(&stored)?;
        tokio::fs::write(&self.path, raw).await
    }

    async fn access_token(&self) -> Option<String> {
        self.read().await.map(|t| t.access_token)
    }

    async fn refresh_token(&self) -> Option<String> {
        self.read().await.map(|t| t.refresh_token)
    }

    async fn remember_me(&self) -> bool {
        self.read().await.is_some_and(|t| t.remember_me)
    }

    async fn clear(&self) {
        let _ = tokio::fs::remove_file(&self.path).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(tag: &str) -> TokenPair {
        TokenPair { access_token: format!("access_{tag}"), refresh_token: format!("refresh_{tag}") }
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("token_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_transient_store_roundtrip() {
        let store = TransientTokenStore::default();
        assert!(store.access_token().await.is_none());

        store.set_tokens(&pair("a"), false).await.unwrap();
        assert_eq!(store.access_token().await.as_deref(), Some("access_a"));
        assert_eq!(store.refresh_token().await.as_deref(), Some("refresh_a"));
        assert!(!store.remember_me().await);

        store.clear().await;
        assert!(store.refresh_token().await.is_none());
    }

    #[tokio::test]
    async fn test_persistent_store_roundtrip() {
        let path = temp_path();
        let store = PersistentTokenStore::new(path.clone());

        store.set_tokens(&pair("b"), true).await.unwrap();
        assert_eq!(store.access_token().await.as_deref(), Some("access_b"));
        assert!(store.remember_me().await);

        store.clear().await;
        assert!(store.access_token().await.is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_persistent_store_expires() {
        let path = temp_path();
        let store = PersistentTokenStore::with_ttl(path.clone(), Duration::ZERO);

        store.set_tokens(&pair("c"), true).await.unwrap();
        assert!(store.access_token().await.is_none());

        store.clear().await;
    }

    #[tokio::test]
    async fn test_policy_selects_backend() {
        let durable = store_for_policy(true, temp_path());
        let transient = store_for_policy(false, temp_path());

        durable.set_tokens(&pair("d"), true).await.unwrap();
        transient.set_tokens(&pair("e"), false).await.unwrap();

        assert!(durable.remember_me().await);
        assert!(!transient.remember_me().await);

        durable.clear().await;
        transient.clear().await;
    }
}
