//! User administration handlers.

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::domain::types::Role;

use super::{require, user_admin_to_api};
use crate::infra::http::error::ApiError;
use crate::infra::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Admin])?;
    let records = state.users.list().await.map_err(user_admin_to_api)?;
    Ok(Json(records))
}

pub async fn set_active(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Admin])?;
    let user = state
        .users
        .set_active(&principal, id, payload.is_active)
        .await
        .map_err(user_admin_to_api)?;
    Ok(Json(user))
}
