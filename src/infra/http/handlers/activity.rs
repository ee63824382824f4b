//! Admin activity feed handlers.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::domain::types::Role;

use super::require;
use crate::infra::http::error::ApiError;
use crate::infra::http::repo_error_to_api;
use crate::infra::http::state::AppState;

// matches the slice the admin dashboard shows
const DEFAULT_FEED_LIMIT: u32 = 15;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub updated: u64,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Admin])?;
    let limit = query.limit.unwrap_or(DEFAULT_FEED_LIMIT);
    let records = state
        .activity
        .list_recent(limit)
        .await
        .map_err(repo_error_to_api)?;
    Ok(Json(records))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Admin])?;
    state
        .activity
        .mark_read(id)
        .await
        .map_err(repo_error_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Admin])?;
    let updated = state
        .activity
        .mark_all_read()
        .await
        .map_err(repo_error_to_api)?;
    Ok(Json(ReadAllResponse { updated }))
}
