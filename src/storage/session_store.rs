use crate::domain::auth::SessionId;
use crate::domain::session::SessionData;
use crate::error::Result;
use redis::AsyncCommands;

const KEY_PREFIX: &str = "sess:";

/// Redis-backed session store. Absence of a key is a normal "no data"
/// result, never an error.
#[derive(Debug, Clone)]
pub struct SessionStore {
    conn: redis::aio::ConnectionManager,
}

impl SessionStore {
    /// Connects to Redis and returns the store.
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }

    fn key(id: &SessionId) -> String {
        format!("{KEY_PREFIX}{}", id.as_str())
    }

    /// Writes a session. A finite `ttl_secs` uses SETEX; `None` leaves the
    /// entry non-expiring (browser-session cookies carry the lifetime then).
    pub async fn set(&self, id: &SessionId, data: &SessionData, ttl_secs: Option<u64>) -> Result<()> {
        let mut conn = self.conn.clone();
        let payload = serde_json::to_string(data).map_err(|_| crate::error::AppError::Internal)?;
        match ttl_secs {
            Some(ttl) => {
                let _: () = conn.set_ex(Self::key(id), payload, ttl).await?;
            }
            None => {
                let _: () = conn.set(Self::key(id), payload).await?;
            }
        }
        Ok(())
    }

    /// A missing key or an undecodable payload both read as `None`.
    pub async fn get(&self, id: &SessionId) -> Result<Option<SessionData>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(Self::key(id)).await?;
        Ok(raw.and_then(|s| serde_json::from_str(&s).ok()))
    }

    pub async fn delete(&self, id: &SessionId) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(Self::key(id)).await?;
        Ok(())
    }

    pub async fn exists(&self, id: &SessionId) -> Result<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(Self::key(id)).await?;
        Ok(exists)
    }

    /// Re-applies a TTL to an existing session (no-op on a missing key).
    pub async fn touch(&self, id: &SessionId, ttl_secs: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: bool = conn.expire(Self::key(id), ttl_secs as i64).await?;
        Ok(())
    }

    /// Connectivity probe for readiness checks.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
