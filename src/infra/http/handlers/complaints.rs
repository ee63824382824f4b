//! Complaint intake, browsing, and status handlers.

use axum::Json;
use axum::extract::{Extension, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::complaints::{NewComplaint, StatusChangeOutcome};
use crate::domain::photos::PhotoUpload;
use crate::domain::types::Role;

use super::{complaint_to_api, require};
use crate::infra::http::error::ApiError;
use crate::infra::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    #[serde(default)]
    pub expected_revision: Option<i32>,
}

/// Multipart intake: text fields plus up to five `photos` file parts.
pub async fn create(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Citizen])?;

    let mut category = String::new();
    let mut title = String::new();
    let mut description = String::new();
    let mut priority = None;
    let mut ward: i32 = 0;
    let mut address = String::new();
    let mut photos = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request("invalid multipart payload", Some(err.to_string())))?
    {
        match field.name() {
            Some("category") => category = read_text(field).await?,
            Some("title") => title = read_text(field).await?,
            Some("description") => description = read_text(field).await?,
            Some("priority") => priority = Some(read_text(field).await?),
            Some("ward") => {
                let raw = read_text(field).await?;
                ward = raw.trim().parse().map_err(|_| {
                    ApiError::bad_request("invalid ward", Some(format!("`{raw}` is not a number")))
                })?;
            }
            Some("address") => address = read_text(field).await?,
            Some("photos") => {
                let original_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "photo".to_string());
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|err| {
                    ApiError::bad_request("failed to read photo", Some(err.to_string()))
                })?;
                photos.push(PhotoUpload {
                    original_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let record = state
        .complaints
        .submit(
            principal.user_id,
            NewComplaint {
                category,
                title,
                description,
                priority,
                ward,
                address,
                photos,
            },
        )
        .await
        .map_err(complaint_to_api)?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Citizens see their own complaints; staff see everything.
pub async fn list(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let records = match principal.role {
        Role::Citizen => state
            .complaints
            .list_for_citizen(principal.user_id)
            .await
            .map_err(complaint_to_api)?,
        Role::Admin | Role::MunicipalOfficer => {
            state.complaints.list_all().await.map_err(complaint_to_api)?
        }
    };

    Ok(Json(records))
}

pub async fn find(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = lookup(&state, &principal, id).await?;
    Ok(Json(record))
}

pub async fn photos(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    // Ownership check first: a foreign complaint's photos read as missing.
    lookup(&state, &principal, id).await?;
    let records = state.complaints.photos(id).await.map_err(complaint_to_api)?;
    Ok(Json(records))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Response, ApiError> {
    require(&principal, &[Role::Admin])?;

    let outcome = state
        .complaints
        .update_status(id, &payload.status, payload.expected_revision)
        .await
        .map_err(complaint_to_api)?;

    match outcome {
        StatusChangeOutcome::Updated(record) => Ok(Json(record).into_response()),
        // unknown labels are a quiet no-op, matching the form behavior
        StatusChangeOutcome::UnknownStatus => Ok(StatusCode::NO_CONTENT.into_response()),
        StatusChangeOutcome::UnknownComplaint => Err(ApiError::not_found("Complaint not found")),
        StatusChangeOutcome::TransitionRefused => {
            Err(ApiError::conflict("Status transition not allowed", None))
        }
        StatusChangeOutcome::RevisionConflict => Err(ApiError::conflict(
            "Complaint was modified by someone else",
            Some("reload and retry with the current revision".to_string()),
        )),
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Citizen])?;
    let counts = state
        .complaints
        .dashboard_counts(principal.user_id)
        .await
        .map_err(complaint_to_api)?;
    Ok(Json(counts))
}

async fn lookup(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
) -> Result<crate::domain::entities::ComplaintRecord, ApiError> {
    let record = match principal.role {
        Role::Citizen => state
            .complaints
            .find_for_citizen(id, principal.user_id)
            .await
            .map_err(complaint_to_api)?,
        Role::Admin | Role::MunicipalOfficer => {
            state.complaints.find(id).await.map_err(complaint_to_api)?
        }
    };

    record.ok_or_else(|| ApiError::not_found("Complaint not found"))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|err| ApiError::bad_request("invalid form field", Some(err.to_string())))
}
