//! Request handlers, grouped by resource.

pub mod activity;
pub mod auth;
pub mod complaints;
pub mod notices;
pub mod notifications;
pub mod reminders;
pub mod reports;
pub mod users;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use crate::application::auth::{AuthError, Principal};
use crate::application::complaints::ComplaintError;
use crate::application::notices::NoticeError;
use crate::application::reminders::ReminderError;
use crate::application::reports::ReportError;
use crate::application::users::UserAdminError;
use crate::domain::types::Role;

use super::error::{ApiError, codes};
use super::state::AppState;
use super::{db_health_response, repo_error_to_api};

pub async fn health(State(state): State<AppState>) -> Response {
    db_health_response(state.db.health_check().await)
}

pub(super) fn require(principal: &Principal, allowed: &[Role]) -> Result<(), ApiError> {
    principal.require_role(allowed).map_err(|_| ApiError::forbidden())
}

pub(super) fn complaint_to_api(err: ComplaintError) -> ApiError {
    match err {
        ComplaintError::Validation(fields) => ApiError::validation(fields),
        ComplaintError::Repo(err) => repo_error_to_api(err),
        ComplaintError::Storage(err) => {
            ApiError::internal(codes::STORAGE, "Photo storage failed", Some(err.to_string()))
        }
    }
}

pub(super) fn notice_to_api(err: NoticeError) -> ApiError {
    match err {
        NoticeError::Validation(fields) => ApiError::validation(fields),
        NoticeError::Repo(err) => repo_error_to_api(err),
    }
}

pub(super) fn reminder_to_api(err: ReminderError) -> ApiError {
    match err {
        ReminderError::Validation(fields) => ApiError::validation(fields),
        ReminderError::DuplicateWard => {
            ApiError::conflict("A reminder for this ward already exists", None)
        }
        ReminderError::Repo(err) => repo_error_to_api(err),
    }
}

pub(super) fn auth_to_api(err: AuthError) -> ApiError {
    match err {
        AuthError::InvalidCredentials => ApiError::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "Invalid email or password",
            None,
        ),
        AuthError::Inactive => ApiError::new(
            StatusCode::FORBIDDEN,
            codes::FORBIDDEN,
            "Account is inactive",
            None,
        ),
        AuthError::DuplicateEmail => ApiError::conflict("Email already registered", None),
        AuthError::Validation(message) => {
            ApiError::bad_request("Validation failed", Some(message))
        }
        AuthError::Repo(err) => repo_error_to_api(err),
        AuthError::Hash(err) => {
            ApiError::internal(codes::REPO, "Credential processing failed", Some(err.to_string()))
        }
    }
}

pub(super) fn user_admin_to_api(err: UserAdminError) -> ApiError {
    match err {
        UserAdminError::NotFound => ApiError::not_found("User not found"),
        UserAdminError::ReservedAdmin => ApiError::conflict(
            "The reserved administrator account cannot be deactivated",
            None,
        ),
        UserAdminError::SelfDeactivation => {
            ApiError::conflict("You cannot deactivate your own account", None)
        }
        UserAdminError::Validation(message) => {
            ApiError::bad_request("Validation failed", Some(message))
        }
        UserAdminError::Repo(err) => repo_error_to_api(err),
    }
}

pub(super) fn report_to_api(err: ReportError) -> ApiError {
    match err {
        ReportError::Repo(err) => repo_error_to_api(err),
        ReportError::Render(message) => {
            ApiError::internal(codes::REPORT, "Report rendering failed", Some(message))
        }
    }
}
