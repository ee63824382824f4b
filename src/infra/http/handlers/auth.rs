//! Registration, sign-in, sign-out, and profile handlers.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::auth::{Principal, RegisterCitizen};
use crate::domain::entities::UserRecord;

use super::{auth_to_api, user_admin_to_api};
use crate::infra::http::error::ApiError;
use crate::infra::http::middleware::SessionToken;
use crate::infra::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserRecord,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub full_name: String,
    #[serde(default)]
    pub address: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .auth
        .register_citizen(RegisterCitizen {
            full_name: payload.full_name,
            email: payload.email,
            password: payload.password,
            address: payload.address,
        })
        .await
        .map_err(auth_to_api)?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let issued = state
        .auth
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(auth_to_api)?;

    Ok(Json(SessionResponse {
        token: issued.token,
        user: issued.user,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> Result<impl IntoResponse, ApiError> {
    // Best-effort revocation; an already-gone session is still signed out.
    let _ = state.auth.sign_out(&token.0).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(principal_to_profile(&principal))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .update_profile(&principal, payload.full_name, payload.address)
        .await
        .map_err(user_admin_to_api)?;

    Ok(Json(user))
}

#[derive(Debug, Serialize)]
struct ProfileResponse {
    user_id: uuid::Uuid,
    full_name: String,
    email: String,
    role: crate::domain::types::Role,
}

fn principal_to_profile(principal: &Principal) -> ProfileResponse {
    ProfileResponse {
        user_id: principal.user_id,
        full_name: principal.full_name.clone(),
        email: principal.email.clone(),
        role: principal.role,
    }
}
