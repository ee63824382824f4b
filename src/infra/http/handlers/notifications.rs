//! Notification inbox handlers.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::repos::NotificationScope;

use crate::infra::http::error::ApiError;
use crate::infra::http::repo_error_to_api;
use crate::infra::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub updated: u64,
}

fn scope(principal: &Principal) -> NotificationScope {
    NotificationScope {
        user_id: principal.user_id,
        role: principal.role,
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<InboxQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .notifications
        .list(scope(&principal), query.unread_only)
        .await
        .map_err(repo_error_to_api)?;

    Ok(Json(records))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .notifications
        .mark_read(id, scope(&principal))
        .await
        .map_err(repo_error_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .notifications
        .mark_all_read(scope(&principal))
        .await
        .map_err(repo_error_to_api)?;

    Ok(Json(ReadAllResponse { updated }))
}
