use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::lifecycle::EndpointUpdate;
use crate::models::EndpointSummary;
use crate::state::SharedState;

const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Deserialize)]
pub struct CreateEndpoint {
    pub name: String,
    pub url: String,
    pub password: String,
}

/// `?password=...`; a missing password is treated as empty and fails verification.
#[derive(Deserialize)]
pub struct PasswordQuery {
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u32,
    pub limit: Option<u32>,
}

pub async fn create(
    State(state): State<SharedState>,
    ValidatedJson(req): ValidatedJson<CreateEndpoint>,
) -> Result<(StatusCode, Json<EndpointSummary>), AppError> {
    let endpoint = state
        .endpoints
        .create(&req.name, &req.url, &req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(endpoint)))
}

pub async fn get_image(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    ValidatedQuery(query): ValidatedQuery<PasswordQuery>,
) -> Result<impl IntoResponse, AppError> {
    let png = state.endpoints.fetch_image(&name, &query.password).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

pub async fn list(
    State(state): State<SharedState>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<Json<Vec<EndpointSummary>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(state.config.max_page_size);
    let endpoints = state.endpoints.list(query.skip, limit).await?;
    Ok(Json(endpoints))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    ValidatedJson(req): ValidatedJson<EndpointUpdate>,
) -> Result<Json<EndpointSummary>, AppError> {
    let endpoint = state.endpoints.update(&name, req).await?;
    Ok(Json(endpoint))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    ValidatedQuery(query): ValidatedQuery<PasswordQuery>,
) -> Result<Json<EndpointSummary>, AppError> {
    let endpoint = state.endpoints.delete(&name, &query.password).await?;
    Ok(Json(endpoint))
}
