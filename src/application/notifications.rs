//! Notification fan-out: translating domain events into inbox rows.
//!
//! Fan-out is synchronous and runs in the same request as the triggering
//! write. Delivery is pull-based; there are no retries and no push channel.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::repos::{
    NewNotification, NotificationScope, NotificationsRepo, RepoError,
};
use crate::domain::entities::{ComplaintRecord, NoticeRecord, NotificationRecord};
use crate::domain::types::{NotificationKind, Role};

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationsRepo>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationsRepo>) -> Self {
        Self { repo }
    }

    /// A new complaint notifies both triage roles, correlated to the
    /// complaint. Read state is per-row, so one officer marking the
    /// broadcast read hides it from the rest of the role (known quirk).
    pub async fn complaint_created(&self, complaint: &ComplaintRecord) -> Result<(), RepoError> {
        for role in [Role::MunicipalOfficer, Role::Admin] {
            self.repo
                .insert_notification(NewNotification {
                    citizen_id: None,
                    target_role: Some(role),
                    title: "New complaint submitted".to_string(),
                    message: format!(
                        "{} — {} (ward {})",
                        complaint.category, complaint.title, complaint.ward
                    ),
                    kind: NotificationKind::ComplaintUpdate,
                    complaint_id: Some(complaint.id),
                })
                .await?;
        }
        Ok(())
    }

    /// A status change notifies the owning citizen, when there is one.
    pub async fn complaint_status_changed(
        &self,
        complaint: &ComplaintRecord,
    ) -> Result<(), RepoError> {
        let Some(citizen_id) = complaint.citizen_id else {
            return Ok(());
        };
        self.repo
            .insert_notification(NewNotification {
                citizen_id: Some(citizen_id),
                target_role: None,
                title: "Complaint Status Updated".to_string(),
                message: format!(
                    "Your complaint '{}' is now '{}'.",
                    complaint.title,
                    complaint.status.as_str()
                ),
                kind: NotificationKind::ComplaintUpdate,
                complaint_id: Some(complaint.id),
            })
            .await?;
        Ok(())
    }

    /// Publishing a notice broadcasts to all citizens.
    pub async fn notice_published(&self, notice: &NoticeRecord) -> Result<(), RepoError> {
        self.repo
            .insert_notification(NewNotification {
                citizen_id: None,
                target_role: Some(Role::Citizen),
                title: "New municipal notice".to_string(),
                message: format!("{} ({})", notice.title, notice.priority.as_str()),
                kind: NotificationKind::Notice,
                complaint_id: None,
            })
            .await?;
        Ok(())
    }

    pub async fn list(
        &self,
        scope: NotificationScope,
        unread_only: bool,
    ) -> Result<Vec<NotificationRecord>, RepoError> {
        self.repo.list_notifications(scope, unread_only).await
    }

    /// Idempotent: marking an already-read row again is a no-op. Rows the
    /// scope cannot see are left untouched.
    pub async fn mark_read(&self, id: Uuid, scope: NotificationScope) -> Result<(), RepoError> {
        self.repo.mark_notification_read(id, scope).await
    }

    /// One pass over every currently-unread row visible to the caller.
    pub async fn mark_all_read(&self, scope: NotificationScope) -> Result<u64, RepoError> {
        self.repo.mark_all_notifications_read(scope).await
    }
}
