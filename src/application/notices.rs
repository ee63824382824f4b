//! Municipal notice board: publish, edit, retire.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::application::activity::ActivityLogService;
use crate::application::auth::Principal;
use crate::application::notifications::NotificationService;
use crate::application::repos::{
    CreateNoticeParams, NoticesRepo, RepoError, UpdateNoticeParams,
};
use crate::domain::entities::NoticeRecord;
use crate::domain::photos::FieldError;
use crate::domain::types::{ActivityKind, NoticePriority};

#[derive(Debug, Error)]
pub enum NoticeError {
    #[error("notice validation failed")]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct NoticeDraft {
    pub title: String,
    pub description: String,
    pub priority: Option<String>,
}

#[derive(Clone)]
pub struct NoticeService {
    notices: Arc<dyn NoticesRepo>,
    notifications: NotificationService,
    activity: ActivityLogService,
}

impl NoticeService {
    pub fn new(
        notices: Arc<dyn NoticesRepo>,
        notifications: NotificationService,
        activity: ActivityLogService,
    ) -> Self {
        Self {
            notices,
            notifications,
            activity,
        }
    }

    fn validate(draft: &NoticeDraft) -> Result<(String, String, NoticePriority), NoticeError> {
        let mut errors = Vec::new();

        let title = draft.title.trim().to_string();
        let description = draft.description.trim().to_string();
        if title.is_empty() {
            errors.push(FieldError::new("title", "title is required"));
        }
        if description.is_empty() {
            errors.push(FieldError::new("description", "description is required"));
        }

        let priority = match draft.priority.as_deref() {
            None => NoticePriority::Normal,
            Some(raw) => match NoticePriority::try_from(raw) {
                Ok(priority) => priority,
                Err(()) => {
                    errors.push(FieldError::new("priority", "unknown priority"));
                    NoticePriority::Normal
                }
            },
        };

        if errors.is_empty() {
            Ok((title, description, priority))
        } else {
            Err(NoticeError::Validation(errors))
        }
    }

    /// Publishing records an activity entry and broadcasts to citizens.
    pub async fn publish(
        &self,
        author: &Principal,
        draft: NoticeDraft,
    ) -> Result<NoticeRecord, NoticeError> {
        let (title, description, priority) = Self::validate(&draft)?;

        let notice = self
            .notices
            .create_notice(CreateNoticeParams {
                id: Uuid::new_v4(),
                title,
                description,
                priority,
                created_by: Some(author.user_id),
                created_by_role: Some(author.role),
                created_by_name: Some(author.full_name.clone()),
                created_at: OffsetDateTime::now_utc(),
            })
            .await?;

        self.activity
            .record(
                ActivityKind::Notice,
                "Notice published",
                format!("'{}' by {}", notice.title, author.full_name),
            )
            .await?;

        self.notifications.notice_published(&notice).await?;

        info!(
            target = "nagari::notices",
            notice_id = %notice.id,
            priority = notice.priority.as_str(),
            "notice published",
        );

        Ok(notice)
    }

    /// Editing does not re-notify citizens; only publication does.
    pub async fn edit(
        &self,
        id: Uuid,
        draft: NoticeDraft,
    ) -> Result<Option<NoticeRecord>, NoticeError> {
        let (title, description, priority) = Self::validate(&draft)?;

        let Some(notice) = self
            .notices
            .update_notice(UpdateNoticeParams {
                id,
                title,
                description,
                priority,
                updated_at: OffsetDateTime::now_utc(),
            })
            .await?
        else {
            return Ok(None);
        };

        self.activity
            .record(
                ActivityKind::Notice,
                "Notice updated",
                format!("'{}'", notice.title),
            )
            .await?;

        Ok(Some(notice))
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<NoticeRecord>, NoticeError> {
        let Some(notice) = self.notices.delete_notice(id).await? else {
            return Ok(None);
        };

        self.activity
            .record(
                ActivityKind::Notice,
                "Notice deleted",
                format!("'{}'", notice.title),
            )
            .await?;

        Ok(Some(notice))
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<NoticeRecord>, NoticeError> {
        Ok(self.notices.find_notice(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<NoticeRecord>, NoticeError> {
        Ok(self.notices.list_notices().await?)
    }
}
