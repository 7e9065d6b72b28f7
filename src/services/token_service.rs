use crate::config::AuthConfig;
use crate::domain::auth::{Claims, TokenPair};
use crate::error::Result;
use sha2::{Digest, Sha256};

const SECS_PER_DAY: u64 = 86_400;

/// Issues and verifies the signed access/refresh token pair. Both tokens
/// carry the same `{sub, email}` claim and differ only in lifetime.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    jwt_secret: String,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_days.unsigned_abs() * SECS_PER_DAY,
        }
    }

    pub fn issue_pair(&self, user_id: i64, email: &str) -> Result<TokenPair> {
        let access_token = Claims::new(user_id, email, self.access_ttl_secs).encode(&self.jwt_secret)?;
        let refresh_token = Claims::new(user_id, email, self.refresh_ttl_secs).encode(&self.jwt_secret)?;
        Ok(TokenPair { access_token, refresh_token })
    }

    /// Validates signature and expiry. Callers treat any failure as a plain
    /// authentication error; no structured detail leaks outward.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        Claims::decode(token, &self.jwt_secret)
    }

    /// SHA-256 hex digest used for refresh-token storage. bcrypt is not an
    /// option here: it truncates input at 72 bytes and a JWT is longer.
    #[must_use]
    pub fn digest(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}
