use crate::api::AppState;
use crate::domain::auth::SessionId;
use crate::error::AppError;
use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, Request, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_id";

/// Authenticated caller identity. Resolved from a Bearer access token when
/// one is presented, otherwise from the session cookie. A caller that came
/// in through the cookie carries its session id so logout can destroy it.
#[derive(Debug)]
pub struct CurrentUser {
    pub user_id: i64,
    pub session_id: Option<SessionId>,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) {
            let auth_str = auth_header.to_str().map_err(|_| AppError::AuthError)?;
            let token = auth_str.strip_prefix("Bearer ").ok_or(AppError::AuthError)?;

            let claims = state.auth_service.issuer().verify(token)?;
            tracing::Span::current().record("user_id", tracing::field::display(claims.sub));
            return Ok(Self { user_id: claims.sub, session_id: None });
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(SESSION_COOKIE).ok_or(AppError::AuthError)?;
        let session_id = SessionId::from(cookie.value());

        let data = state.session_store.get(&session_id).await?.ok_or(AppError::AuthError)?;
        tracing::Span::current().record("user_id", tracing::field::display(data.user_id));

        Ok(Self { user_id: data.user_id, session_id: Some(session_id) })
    }
}

/// Reuses an inbound `x-request-id` header when present, otherwise mints a
/// fresh UUID.
#[derive(Clone, Copy, Debug)]
pub struct MakeRequestUuidOrHeader;

impl MakeRequestId for MakeRequestUuidOrHeader {
    fn make_request_id<B>(&mut self, request: &Request<B>) -> Option<RequestId> {
        if let Some(id) = request.headers().get("x-request-id") {
            return Some(RequestId::new(id.clone()));
        }
        HeaderValue::from_str(&Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}
