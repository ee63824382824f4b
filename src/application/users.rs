//! User directory administration and self-service profile updates.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::activity::ActivityLogService;
use crate::application::auth::Principal;
use crate::application::repos::{RepoError, UsersRepo};
use crate::domain::entities::UserRecord;
use crate::domain::types::ActivityKind;

#[derive(Debug, Error)]
pub enum UserAdminError {
    #[error("user not found")]
    NotFound,
    #[error("the reserved administrator account cannot be deactivated")]
    ReservedAdmin,
    #[error("you cannot deactivate your own account")]
    SelfDeactivation,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct UserDirectoryService {
    users: Arc<dyn UsersRepo>,
    activity: ActivityLogService,
    /// Lowercased email of the account that must always retain access.
    reserved_admin_email: String,
}

impl UserDirectoryService {
    pub fn new(
        users: Arc<dyn UsersRepo>,
        activity: ActivityLogService,
        reserved_admin_email: String,
    ) -> Self {
        Self {
            users,
            activity,
            reserved_admin_email: reserved_admin_email.to_ascii_lowercase(),
        }
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>, UserAdminError> {
        Ok(self.users.list_users().await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<UserRecord>, UserAdminError> {
        Ok(self.users.find_user(id).await?)
    }

    /// Deactivation is the soft-delete path: the row and its complaints
    /// stay, the account just stops authenticating.
    pub async fn set_active(
        &self,
        actor: &Principal,
        id: Uuid,
        is_active: bool,
    ) -> Result<UserRecord, UserAdminError> {
        if !is_active {
            if actor.user_id == id {
                return Err(UserAdminError::SelfDeactivation);
            }
            let target = self
                .users
                .find_user(id)
                .await?
                .ok_or(UserAdminError::NotFound)?;
            if target.email.to_ascii_lowercase() == self.reserved_admin_email {
                return Err(UserAdminError::ReservedAdmin);
            }
        }

        let user = self
            .users
            .set_user_active(id, is_active)
            .await?
            .ok_or(UserAdminError::NotFound)?;

        let (title, detail) = if is_active {
            (
                "User account activated",
                format!("{} ({})", user.full_name, user.email),
            )
        } else {
            (
                "User account deactivated",
                format!("{} ({})", user.full_name, user.email),
            )
        };
        self.activity
            .record(ActivityKind::User, title, detail)
            .await?;

        info!(
            target = "nagari::users",
            user_id = %user.id,
            is_active,
            actor = %actor.email,
            "user active flag changed",
        );

        Ok(user)
    }

    /// Self-service: a signed-in user may change their own name and address.
    pub async fn update_profile(
        &self,
        principal: &Principal,
        full_name: String,
        address: Option<String>,
    ) -> Result<UserRecord, UserAdminError> {
        let full_name = full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(UserAdminError::Validation("full name is required".into()));
        }
        let address = address
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        self.users
            .update_user_profile(principal.user_id, full_name, address)
            .await?
            .ok_or(UserAdminError::NotFound)
    }
}
