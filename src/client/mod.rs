//! Programmatic counterpart of the browser auth adapter: stores the token
//! pair according to the remember-me policy, attaches the access token to
//! outbound requests, and on a 401 performs at most one refresh at a time —
//! concurrent callers queue on the in-flight refresh and share its outcome.

use crate::api::schemas::auth::{AuthResponse, UserBody};
use crate::api::schemas::links::LinkBody;
use crate::domain::auth::TokenPair;
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

pub mod token_store;

pub use token_store::{PersistentTokenStore, TokenStore, TransientTokenStore, store_for_policy};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("session expired, re-authentication required")]
    SessionExpired,
    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Serializes token refreshes. The generation counter advances once per
/// successful refresh; a caller that queued behind an in-flight refresh
/// observes the bumped generation and reuses the stored tokens instead of
/// issuing a second network call.
#[derive(Debug, Default)]
struct RefreshGate {
    generation: Mutex<u64>,
}

#[derive(Debug)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    gate: RefreshGate,
}

impl AuthClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
            gate: RefreshGate::default(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
        remember_me: bool,
    ) -> Result<UserBody, ClientError> {
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(&json!({
                "email": email,
                "password": password,
                "name": name,
                "rememberMe": remember_me,
            }))
            .send()
            .await?;

        self.accept_auth_response(resp, remember_me).await
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<UserBody, ClientError> {
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({
                "email": email,
                "password": password,
                "rememberMe": remember_me,
            }))
            .send()
            .await?;

        self.accept_auth_response(resp, remember_me).await
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let resp = self.send_authorized(self.http.post(self.url("/auth/logout"))).await?;
        Self::error_for_status(resp).await?;
        self.store.clear().await;
        Ok(())
    }

    pub async fn me(&self) -> Result<UserBody, ClientError> {
        let resp = self.send_authorized(self.http.get(self.url("/auth/me"))).await?;
        Ok(Self::error_for_status(resp).await?.json().await?)
    }

    pub async fn links(&self) -> Result<Vec<LinkBody>, ClientError> {
        let resp = self.send_authorized(self.http.get(self.url("/links"))).await?;
        Ok(Self::error_for_status(resp).await?.json().await?)
    }

    pub async fn create_link(
        &self,
        url: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<LinkBody, ClientError> {
        let req = self
            .http
            .post(self.url("/links"))
            .json(&json!({ "url": url, "title": title, "description": description }));
        let resp = self.send_authorized(req).await?;
        Ok(Self::error_for_status(resp).await?.json().await?)
    }

    /// Sends with the stored access token; on a 401 refreshes (joining any
    /// refresh already in flight) and retries exactly once. Login, register,
    /// and refresh itself never pass through here.
    async fn send_authorized(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let seen = { *self.gate.generation.lock().await };
        let retry = req.try_clone();

        let resp = self.with_bearer(req).await.send().await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }

        // Streaming bodies cannot be replayed; surface the 401 as-is.
        let Some(retry) = retry else { return Ok(resp) };

        self.refresh_since(seen).await?;
        Ok(self.with_bearer(retry).await.send().await?)
    }

    async fn with_bearer(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.store.access_token().await {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Refreshes the token pair unless another caller already rotated it
    /// after `seen`. Queued callers block on the gate and inherit the single
    /// refresh outcome. On a rejected refresh the store is cleared so every
    /// queued caller fails to `SessionExpired` without further network calls.
    async fn refresh_since(&self, seen: u64) -> Result<(), ClientError> {
        let mut generation = self.gate.generation.lock().await;
        if *generation != seen {
            return Ok(());
        }

        let refresh_token = self.store.refresh_token().await.ok_or(ClientError::SessionExpired)?;

        let resp = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        if !resp.status().is_success() {
            self.store.clear().await;
            return Err(ClientError::SessionExpired);
        }

        let auth: AuthResponse = resp.json().await?;
        let remember_me = self.store.remember_me().await;
        self.store
            .set_tokens(
                &TokenPair { access_token: auth.access_token, refresh_token: auth.refresh_token },
                remember_me,
            )
            .await?;

        *generation += 1;
        Ok(())
    }

    async fn accept_auth_response(
        &self,
        resp: reqwest::Response,
        remember_me: bool,
    ) -> Result<UserBody, ClientError> {
        let auth: AuthResponse = Self::error_for_status(resp).await?.json().await?;
        self.store
            .set_tokens(
                &TokenPair { access_token: auth.access_token, refresh_token: auth.refresh_token },
                remember_me,
            )
            .await?;
        Ok(auth.user)
    }

    async fn error_for_status(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());

        Err(ClientError::Api { status, message })
    }
}
