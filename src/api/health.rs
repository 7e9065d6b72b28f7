use crate::api::AppState;
use axum::{extract::State, http::StatusCode};

pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// Ready only when both the credential store and the session store answer.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    let db_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    let redis_ok = state.session_store.ping().await.is_ok();

    if db_ok && redis_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
