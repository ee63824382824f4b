//! Notice board handlers.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::notices::NoticeDraft;
use crate::domain::types::Role;

use super::{notice_to_api, require};
use crate::infra::http::error::ApiError;
use crate::infra::http::state::AppState;

/// Officers share the publish surface; edits and removal stay admin-only.
const PUBLISH_ROLES: &[Role] = &[Role::Admin, Role::MunicipalOfficer];

#[derive(Debug, Deserialize)]
pub struct NoticeRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
}

impl From<NoticeRequest> for NoticeDraft {
    fn from(payload: NoticeRequest) -> Self {
        Self {
            title: payload.title,
            description: payload.description,
            priority: payload.priority,
        }
    }
}

/// Anyone signed in can read the board.
pub async fn list(
    State(state): State<AppState>,
    Extension(_principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.notices.list().await.map_err(notice_to_api)?;
    Ok(Json(records))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NoticeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, PUBLISH_ROLES)?;
    let notice = state
        .notices
        .publish(&principal, payload.into())
        .await
        .map_err(notice_to_api)?;
    Ok((StatusCode::CREATED, Json(notice)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NoticeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Admin])?;
    let notice = state
        .notices
        .edit(id, payload.into())
        .await
        .map_err(notice_to_api)?
        .ok_or_else(|| ApiError::not_found("Notice not found"))?;
    Ok(Json(notice))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Admin])?;
    state
        .notices
        .delete(id)
        .await
        .map_err(notice_to_api)?
        .ok_or_else(|| ApiError::not_found("Notice not found"))?;
    Ok(StatusCode::NO_CONTENT)
}
