use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    NewNotification, NotificationScope, NotificationsRepo, RepoError,
};
use crate::domain::entities::NotificationRecord;
use crate::domain::types::{NotificationKind, Role};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    citizen_id: Option<Uuid>,
    target_role: Option<Role>,
    title: String,
    message: String,
    kind: NotificationKind,
    complaint_id: Option<Uuid>,
    is_read: bool,
    created_at: OffsetDateTime,
}

impl From<NotificationRow> for NotificationRecord {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            citizen_id: row.citizen_id,
            target_role: row.target_role,
            title: row.title,
            message: row.message,
            kind: row.kind,
            complaint_id: row.complaint_id,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl NotificationsRepo for PostgresRepositories {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationRecord, RepoError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            "INSERT INTO citizen_notifications \
                 (id, citizen_id, target_role, title, message, kind, complaint_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, citizen_id, target_role, title, message, kind, complaint_id, \
                       is_read, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(notification.citizen_id)
        .bind(notification.target_role)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.kind)
        .bind(notification.complaint_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_notifications(
        &self,
        scope: NotificationScope,
        unread_only: bool,
    ) -> Result<Vec<NotificationRecord>, RepoError> {
        let mut qb = QueryBuilder::new(
            "SELECT id, citizen_id, target_role, title, message, kind, complaint_id, \
                    is_read, created_at \
             FROM citizen_notifications WHERE (citizen_id = ",
        );
        qb.push_bind(scope.user_id);
        qb.push(" OR target_role = ");
        qb.push_bind(scope.role);
        qb.push(")");
        if unread_only {
            qb.push(" AND is_read = FALSE");
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows = qb
            .build_query_as::<NotificationRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_notification_read(
        &self,
        id: Uuid,
        scope: NotificationScope,
    ) -> Result<(), RepoError> {
        sqlx::query(
            "UPDATE citizen_notifications SET is_read = TRUE \
             WHERE id = $1 AND (citizen_id = $2 OR target_role = $3)",
        )
        .bind(id)
        .bind(scope.user_id)
        .bind(scope.role)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn mark_all_notifications_read(
        &self,
        scope: NotificationScope,
    ) -> Result<u64, RepoError> {
        let result = sqlx::query(
            "UPDATE citizen_notifications SET is_read = TRUE \
             WHERE (citizen_id = $1 OR target_role = $2) AND is_read = FALSE",
        )
        .bind(scope.user_id)
        .bind(scope.role)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
