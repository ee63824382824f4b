use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateNoticeParams, NoticesRepo, RepoError, UpdateNoticeParams,
};
use crate::domain::entities::NoticeRecord;
use crate::domain::types::{NoticePriority, Role};

use super::{PostgresRepositories, map_sqlx_error};

const NOTICE_COLUMNS: &str = "id, title, description, priority, created_by, created_by_role, \
     created_by_name, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct NoticeRow {
    id: Uuid,
    title: String,
    description: String,
    priority: NoticePriority,
    created_by: Option<Uuid>,
    created_by_role: Option<Role>,
    created_by_name: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<NoticeRow> for NoticeRecord {
    fn from(row: NoticeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            priority: row.priority,
            created_by: row.created_by,
            created_by_role: row.created_by_role,
            created_by_name: row.created_by_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl NoticesRepo for PostgresRepositories {
    async fn create_notice(&self, params: CreateNoticeParams) -> Result<NoticeRecord, RepoError> {
        let row = sqlx::query_as::<_, NoticeRow>(&format!(
            "INSERT INTO notices \
                 (id, title, description, priority, created_by, created_by_role, \
                  created_by_name, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) \
             RETURNING {NOTICE_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.title)
        .bind(&params.description)
        .bind(params.priority)
        .bind(params.created_by)
        .bind(params.created_by_role)
        .bind(&params.created_by_name)
        .bind(params.created_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_notice(
        &self,
        params: UpdateNoticeParams,
    ) -> Result<Option<NoticeRecord>, RepoError> {
        let row = sqlx::query_as::<_, NoticeRow>(&format!(
            "UPDATE notices SET title = $2, description = $3, priority = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {NOTICE_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.title)
        .bind(&params.description)
        .bind(params.priority)
        .bind(params.updated_at)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn delete_notice(&self, id: Uuid) -> Result<Option<NoticeRecord>, RepoError> {
        let row = sqlx::query_as::<_, NoticeRow>(&format!(
            "DELETE FROM notices WHERE id = $1 RETURNING {NOTICE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_notice(&self, id: Uuid) -> Result<Option<NoticeRecord>, RepoError> {
        let row = sqlx::query_as::<_, NoticeRow>(&format!(
            "SELECT {NOTICE_COLUMNS} FROM notices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_notices(&self) -> Result<Vec<NoticeRecord>, RepoError> {
        let rows = sqlx::query_as::<_, NoticeRow>(&format!(
            "SELECT {NOTICE_COLUMNS} FROM notices ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
