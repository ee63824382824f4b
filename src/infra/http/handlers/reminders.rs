//! Garbage reminder handlers, citizen-only.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::reminders::NewReminder;
use crate::domain::types::Role;

use super::{reminder_to_api, require};
use crate::infra::http::error::ApiError;
use crate::infra::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReminderRequest {
    pub ward: i32,
    pub collection_days: String,
    pub collection_time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ReminderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Citizen])?;
    let reminder = state
        .reminders
        .save(
            principal.user_id,
            NewReminder {
                ward: payload.ward,
                collection_days: payload.collection_days,
                collection_time: payload.collection_time,
                notes: payload.notes,
            },
        )
        .await
        .map_err(reminder_to_api)?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Citizen])?;
    let records = state
        .reminders
        .list_own(principal.user_id)
        .await
        .map_err(reminder_to_api)?;
    Ok(Json(records))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Citizen])?;
    let deleted = state
        .reminders
        .delete_own(id, principal.user_id)
        .await
        .map_err(reminder_to_api)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Reminder not found"))
    }
}
