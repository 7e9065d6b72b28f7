use crate::config::{AuthConfig, SessionConfig};
use crate::domain::auth::{Password, SessionId, TokenPair};
use crate::domain::session::SessionData;
use crate::domain::user::{PublicUser, User};
use crate::error::{AppError, Result};
use crate::services::token_service::TokenIssuer;
use crate::storage::session_store::SessionStore;
use crate::storage::user_repo::UserRepository;

const SECS_PER_DAY: u64 = 86_400;

/// Result of a successful register/login: the issued pair, the sanitized
/// user, and the session anchoring the browser cookie.
#[derive(Debug)]
pub struct AuthOutcome {
    pub tokens: TokenPair,
    pub user: PublicUser,
    pub session_id: SessionId,
    pub remember_me: bool,
}

#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserRepository,
    sessions: SessionStore,
    issuer: TokenIssuer,
    bcrypt_cost: u32,
    session_ttl_secs: u64,
}

impl AuthService {
    #[must_use]
    pub fn new(
        auth_config: &AuthConfig,
        session_config: &SessionConfig,
        users: UserRepository,
        sessions: SessionStore,
    ) -> Self {
        Self {
            users,
            sessions,
            issuer: TokenIssuer::new(auth_config),
            bcrypt_cost: auth_config.bcrypt_cost,
            session_ttl_secs: session_config.session_ttl_days.unsigned_abs() * SECS_PER_DAY,
        }
    }

    #[must_use]
    pub const fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    #[tracing::instrument(
        skip(self, email, password, name),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn register(
        &self,
        email: String,
        password: String,
        name: Option<String>,
        remember_me: bool,
    ) -> Result<AuthOutcome> {
        let password_hash = self.hash_password(&password).await?;

        let user = self.users.create(&email, &password_hash, name.as_deref()).await.map_err(|e| {
            if let AppError::Database(sqlx::Error::Database(db_err)) = &e
                && db_err.code().as_deref() == Some("23505")
            {
                return AppError::Conflict("Email already exists".into());
            }
            e
        })?;

        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        tracing::info!("User registered successfully");

        self.open_session(user, remember_me).await
    }

    #[tracing::instrument(
        skip(self, email, password),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn login(&self, email: String, password: String, remember_me: bool) -> Result<AuthOutcome> {
        let user = match self.users.find_by_email(&email).await? {
            Some(u) => u,
            None => {
                tracing::warn!("Login failed: user not found");
                return Err(AppError::AuthError);
            }
        };

        tracing::Span::current().record("user_id", tracing::field::display(user.id));

        if !self.verify_password(&password, &user.password_hash).await? {
            tracing::warn!("Login failed: invalid password");
            return Err(AppError::AuthError);
        }

        self.open_session(user, remember_me).await
    }

    /// Issues a token pair, anchors the refresh digest on the user row, and
    /// creates the session record. Shared by register and login.
    async fn open_session(&self, user: User, remember_me: bool) -> Result<AuthOutcome> {
        let tokens = self.issuer.issue_pair(user.id, &user.email)?;
        self.users.set_refresh_token_hash(user.id, Some(&TokenIssuer::digest(&tokens.refresh_token))).await?;

        let session_id = SessionId::generate();
        let data = SessionData {
            user_id: user.id,
            remember_me,
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
        };
        self.sessions.set(&session_id, &data, remember_me.then_some(self.session_ttl_secs)).await?;

        Ok(AuthOutcome { tokens, user: user.into(), session_id, remember_me })
    }

    /// Rotates the token pair. The presented refresh token must verify and
    /// match the digest on the user row; once rotated, the prior token is
    /// dead. Any failure collapses to `AuthError`.
    #[tracing::instrument(
        skip(self, refresh_token, session_id),
        fields(user_id = tracing::field::Empty),
        err(level = "warn")
    )]
    pub async fn refresh(
        &self,
        refresh_token: String,
        session_id: Option<SessionId>,
    ) -> Result<(TokenPair, PublicUser)> {
        let claims = self.issuer.verify(&refresh_token)?;

        let user = self.users.find_by_id(claims.sub).await?.ok_or(AppError::AuthError)?;
        tracing::Span::current().record("user_id", tracing::field::display(user.id));

        let stored = user.refresh_token_hash.as_deref().ok_or(AppError::AuthError)?;
        if TokenIssuer::digest(&refresh_token) != stored {
            tracing::warn!("Refresh failed: token superseded or unknown");
            return Err(AppError::AuthError);
        }

        let tokens = self.issuer.issue_pair(user.id, &user.email)?;
        self.users.set_refresh_token_hash(user.id, Some(&TokenIssuer::digest(&tokens.refresh_token))).await?;

        // A cookie-anchored caller gets the rotated pair written back into
        // its session so the payload never references dead tokens.
        if let Some(id) = session_id
            && let Some(mut data) = self.sessions.get(&id).await?
        {
            data.access_token = tokens.access_token.clone();
            data.refresh_token = tokens.refresh_token.clone();
            self.sessions.set(&id, &data, data.remember_me.then_some(self.session_ttl_secs)).await?;
        }

        tracing::info!("Tokens rotated successfully");
        Ok((tokens, user.into()))
    }

    /// Idempotent: clearing an already-cleared refresh digest or deleting a
    /// missing session succeeds.
    #[tracing::instrument(skip(self, session_id), fields(user_id = %user_id), err(level = "warn"))]
    pub async fn logout(&self, user_id: i64, session_id: Option<&SessionId>) -> Result<()> {
        self.users.set_refresh_token_hash(user_id, None).await?;
        if let Some(id) = session_id {
            self.sessions.delete(id).await?;
        }
        Ok(())
    }

    pub async fn current_user(&self, user_id: i64) -> Result<PublicUser> {
        let user = self.users.find_by_id(user_id).await?.ok_or(AppError::AuthError)?;
        Ok(user.into())
    }

    #[tracing::instrument(err, skip(self, password))]
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || Password::hash(&password, cost))
            .await
            .map_err(|_| AppError::Internal)?
    }

    #[tracing::instrument(err, skip(self, password, password_hash))]
    pub async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || Password::verify(&password, &password_hash))
            .await
            .map_err(|_| AppError::Internal)?
    }
}
