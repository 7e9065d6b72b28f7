use crate::api::AppState;
use crate::api::middleware::{CurrentUser, SESSION_COOKIE};
use crate::api::schemas::auth::{AuthResponse, Login, Refresh, Registration, UserBody};
use crate::config::Config;
use crate::domain::auth::SessionId;
use crate::error::{AppError, Result};
use crate::services::auth_service::AuthOutcome;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<Registration>,
) -> Result<impl IntoResponse> {
    payload.validate().map_err(AppError::BadRequest)?;

    let outcome = state
        .auth_service
        .register(payload.email, payload.password, payload.name, payload.remember_me)
        .await?;

    let jar = jar.add(session_cookie(&state.config, &outcome));
    Ok((StatusCode::CREATED, jar, Json(AuthResponse::new(outcome.tokens, outcome.user))))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<Login>,
) -> Result<impl IntoResponse> {
    payload.validate().map_err(AppError::BadRequest)?;

    let outcome = state
        .auth_service
        .login(payload.email, payload.password, payload.remember_me)
        .await?;

    let jar = jar.add(session_cookie(&state.config, &outcome));
    Ok((StatusCode::OK, jar, Json(AuthResponse::new(outcome.tokens, outcome.user))))
}

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<Refresh>,
) -> Result<impl IntoResponse> {
    let session_id = jar.get(SESSION_COOKIE).map(|c| SessionId::from(c.value()));
    let (tokens, user) = state.auth_service.refresh(payload.refresh_token, session_id).await?;
    Ok(Json(AuthResponse::new(tokens, user)))
}

pub async fn logout(
    user: CurrentUser,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    state.auth_service.logout(user.user_id, user.session_id.as_ref()).await?;
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    Ok((jar, StatusCode::NO_CONTENT))
}

pub async fn me(user: CurrentUser, State(state): State<AppState>) -> Result<Json<UserBody>> {
    let current = state.auth_service.current_user(user.user_id).await?;
    Ok(Json(current.into()))
}

fn session_cookie(config: &Config, outcome: &AuthOutcome) -> Cookie<'static> {
    let mut builder = Cookie::build((SESSION_COOKIE, outcome.session_id.as_str().to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(config.session.cookie_secure);

    // Browser-session cookie unless the caller asked to be remembered
    if outcome.remember_me {
        builder = builder.max_age(time::Duration::days(config.session.session_ttl_days));
    }

    builder.build()
}
