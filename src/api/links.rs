use crate::api::AppState;
use crate::api::schemas::links::{CreateLink, LinkBody, UpdateLink};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateLink>,
) -> Result<impl IntoResponse> {
    payload.validate().map_err(AppError::BadRequest)?;
    let link = state.link_service.create(payload.url, payload.title, payload.description).await?;
    Ok((StatusCode::CREATED, Json(LinkBody::from(link))))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<LinkBody>>> {
    let links = state.link_service.list().await?;
    Ok(Json(links.into_iter().map(Into::into).collect()))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<LinkBody>> {
    let link = state.link_service.get(id).await?;
    Ok(Json(link.into()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateLink>,
) -> Result<Json<LinkBody>> {
    let link = state.link_service.update(id, payload.url, payload.title, payload.description).await?;
    Ok(Json(link.into()))
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<LinkBody>> {
    let link = state.link_service.delete(id).await?;
    Ok(Json(link.into()))
}
