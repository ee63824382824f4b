//! Admin analytics handlers.

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::application::auth::Principal;
use crate::domain::types::Role;

use super::{report_to_api, require};
use crate::infra::http::error::ApiError;
use crate::infra::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    pub days: i64,
}

pub async fn overview(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<WindowQuery>,
) -> Result<impl IntoResponse, ApiError> {
    require(&principal, &[Role::Admin])?;
    let overview = state
        .reports
        .overview(query.days)
        .await
        .map_err(report_to_api)?;
    Ok(Json(overview))
}

/// Downloadable rendition of the same overview.
pub async fn export(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<WindowQuery>,
) -> Result<Response, ApiError> {
    require(&principal, &[Role::Admin])?;
    let rendered = state
        .reports
        .export(query.days)
        .await
        .map_err(report_to_api)?;

    let mut response = rendered.bytes.into_response();
    if let Ok(value) = HeaderValue::from_str(rendered.content_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", rendered.file_name))
    {
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}
