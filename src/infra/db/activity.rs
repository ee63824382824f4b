use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{ActivityRepo, NewActivity, RepoError};
use crate::domain::entities::ActivityLogRecord;
use crate::domain::types::ActivityKind;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    kind: ActivityKind,
    title: String,
    detail: String,
    is_read: bool,
    created_at: OffsetDateTime,
}

impl From<ActivityRow> for ActivityLogRecord {
    fn from(row: ActivityRow) -> Self {
        Self {
            id: row.id,
            kind: row.kind,
            title: row.title,
            detail: row.detail,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ActivityRepo for PostgresRepositories {
    async fn append_activity(
        &self,
        activity: NewActivity,
    ) -> Result<ActivityLogRecord, RepoError> {
        let row = sqlx::query_as::<_, ActivityRow>(
            "INSERT INTO activity_logs (id, kind, title, detail) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, kind, title, detail, is_read, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(activity.kind)
        .bind(&activity.title)
        .bind(&activity.detail)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_recent_activity(&self, limit: u32) -> Result<Vec<ActivityLogRecord>, RepoError> {
        let limit = limit.clamp(1, 200);
        let rows = sqlx::query_as::<_, ActivityRow>(
            "SELECT id, kind, title, detail, is_read, created_at \
             FROM activity_logs ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_activity_read(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("UPDATE activity_logs SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn mark_all_activity_read(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("UPDATE activity_logs SET is_read = TRUE WHERE is_read = FALSE")
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }
}
