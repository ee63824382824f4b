//! JSON API surface.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use state::AppState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use sqlx::Error as SqlxError;

use crate::application::error::ErrorReport;
use crate::application::repos::RepoError;
use crate::domain::photos::{MAX_PHOTO_BYTES, MAX_PHOTOS};

use error::{ApiError, codes};
use middleware::{log_responses, session_auth, set_request_context};

// Multipart complaints carry up to MAX_PHOTOS photos plus form fields.
const MAX_BODY_BYTES: usize = (MAX_PHOTOS + 1) * MAX_PHOTO_BYTES;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/healthz", get(handlers::health))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login));

    let authed = Router::new()
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/auth/me", get(handlers::auth::me))
        .route("/api/v1/profile", patch(handlers::auth::update_profile))
        .route(
            "/api/v1/complaints",
            get(handlers::complaints::list).post(handlers::complaints::create),
        )
        .route("/api/v1/complaints/{id}", get(handlers::complaints::find))
        .route(
            "/api/v1/complaints/{id}/photos",
            get(handlers::complaints::photos),
        )
        .route(
            "/api/v1/complaints/{id}/status",
            post(handlers::complaints::update_status),
        )
        .route("/api/v1/dashboard", get(handlers::complaints::dashboard))
        .route(
            "/api/v1/notifications",
            get(handlers::notifications::list),
        )
        .route(
            "/api/v1/notifications/{id}/read",
            post(handlers::notifications::mark_read),
        )
        .route(
            "/api/v1/notifications/read-all",
            post(handlers::notifications::mark_all_read),
        )
        .route(
            "/api/v1/notices",
            get(handlers::notices::list).post(handlers::notices::create),
        )
        .route(
            "/api/v1/notices/{id}",
            patch(handlers::notices::update).delete(handlers::notices::remove),
        )
        .route(
            "/api/v1/reminders",
            get(handlers::reminders::list).post(handlers::reminders::create),
        )
        .route(
            "/api/v1/reminders/{id}",
            delete(handlers::reminders::remove),
        )
        .route("/api/v1/admin/overview", get(handlers::reports::overview))
        .route("/api/v1/admin/report", get(handlers::reports::export))
        .route("/api/v1/admin/activity", get(handlers::activity::list))
        .route(
            "/api/v1/admin/activity/{id}/read",
            post(handlers::activity::mark_read),
        )
        .route(
            "/api/v1/admin/activity/read-all",
            post(handlers::activity::mark_all_read),
        )
        .route("/api/v1/admin/users", get(handlers::users::list))
        .route(
            "/api/v1/admin/users/{id}/active",
            post(handlers::users::set_active),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            session_auth,
        ));

    public
        .merge(authed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
        .with_state(state)
}

pub(crate) fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a repository error to a consistent HTTP error response.
pub fn repo_error_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("Resource not found"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(message) => {
            ApiError::internal(codes::REPO, "Persistence error", Some(message))
        }
    }
}
