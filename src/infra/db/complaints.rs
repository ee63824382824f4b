use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::application::repos::{
    CategoryCount, ComplaintsRepo, CreateComplaintParams, NewComplaintPhoto, RepoError,
    StatusCounts, StatusUpdateResult, UpdateComplaintStatusParams,
};
use crate::domain::entities::{ComplaintPhotoRecord, ComplaintRecord};
use crate::domain::types::{ComplaintPriority, ComplaintStatus};

use super::{PostgresRepositories, map_sqlx_error};

const COMPLAINT_COLUMNS: &str = "id, category, title, description, status, priority, ward, \
     address, citizen_id, created_at, updated_at, resolved_at, revision";

#[derive(sqlx::FromRow)]
struct ComplaintRow {
    id: Uuid,
    category: String,
    title: String,
    description: String,
    status: ComplaintStatus,
    priority: ComplaintPriority,
    ward: i32,
    address: String,
    citizen_id: Option<Uuid>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    resolved_at: Option<OffsetDateTime>,
    revision: i32,
}

impl From<ComplaintRow> for ComplaintRecord {
    fn from(row: ComplaintRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            title: row.title,
            description: row.description,
            status: row.status,
            priority: row.priority,
            ward: row.ward,
            address: row.address,
            citizen_id: row.citizen_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            resolved_at: row.resolved_at,
            revision: row.revision,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PhotoRow {
    id: Uuid,
    complaint_id: Uuid,
    file_path: String,
    original_name: String,
    content_type: String,
    size_bytes: i64,
    uploaded_at: OffsetDateTime,
}

impl From<PhotoRow> for ComplaintPhotoRecord {
    fn from(row: PhotoRow) -> Self {
        Self {
            id: row.id,
            complaint_id: row.complaint_id,
            file_path: row.file_path,
            original_name: row.original_name,
            content_type: row.content_type,
            size_bytes: row.size_bytes,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StatusCountsRow {
    total: i64,
    pending: i64,
    in_progress: i64,
    resolved: i64,
}

#[async_trait]
impl ComplaintsRepo for PostgresRepositories {
    async fn create_complaint(
        &self,
        params: CreateComplaintParams,
        photos: Vec<NewComplaintPhoto>,
    ) -> Result<ComplaintRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, ComplaintRow>(&format!(
            "INSERT INTO complaints \
                 (id, category, title, description, status, priority, ward, address, \
                  citizen_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) \
             RETURNING {COMPLAINT_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.category)
        .bind(&params.title)
        .bind(&params.description)
        .bind(ComplaintStatus::Pending)
        .bind(params.priority)
        .bind(params.ward)
        .bind(&params.address)
        .bind(params.citizen_id)
        .bind(params.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for photo in &photos {
            sqlx::query(
                "INSERT INTO complaint_photos \
                     (id, complaint_id, file_path, original_name, content_type, size_bytes, uploaded_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(photo.id)
            .bind(params.id)
            .bind(&photo.file_path)
            .bind(&photo.original_name)
            .bind(&photo.content_type)
            .bind(photo.size_bytes)
            .bind(params.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_complaint(&self, id: Uuid) -> Result<Option<ComplaintRecord>, RepoError> {
        let row = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_owned_complaint(
        &self,
        id: Uuid,
        citizen_id: Uuid,
    ) -> Result<Option<ComplaintRecord>, RepoError> {
        let row = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE id = $1 AND citizen_id = $2"
        ))
        .bind(id)
        .bind(citizen_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_complaints(&self) -> Result<Vec<ComplaintRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_complaints_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<Vec<ComplaintRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ComplaintRow>(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaints \
             WHERE citizen_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(citizen_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_complaint_photos(
        &self,
        complaint_id: Uuid,
    ) -> Result<Vec<ComplaintPhotoRecord>, RepoError> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            "SELECT id, complaint_id, file_path, original_name, content_type, size_bytes, uploaded_at \
             FROM complaint_photos WHERE complaint_id = $1 ORDER BY uploaded_at, id",
        )
        .bind(complaint_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_complaint_status(
        &self,
        params: UpdateComplaintStatusParams,
    ) -> Result<StatusUpdateResult, RepoError> {
        let mut qb = QueryBuilder::new("UPDATE complaints SET status = ");
        qb.push_bind(params.status);
        qb.push(", resolved_at = ");
        qb.push_bind(params.resolved_at);
        qb.push(", updated_at = ");
        qb.push_bind(params.updated_at);
        qb.push(", revision = revision + 1 WHERE id = ");
        qb.push_bind(params.id);
        if let Some(expected) = params.expected_revision {
            qb.push(" AND revision = ");
            qb.push_bind(expected);
        }
        qb.push(&format!(" RETURNING {COMPLAINT_COLUMNS}"));

        let row = qb
            .build_query_as::<ComplaintRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if let Some(row) = row {
            return Ok(StatusUpdateResult::Updated(row.into()));
        }

        // No row matched; tell a missing complaint apart from a stale
        // revision.
        if params.expected_revision.is_some() && self.find_complaint(params.id).await?.is_some() {
            Ok(StatusUpdateResult::RevisionMismatch)
        } else {
            Ok(StatusUpdateResult::NotFound)
        }
    }

    async fn count_complaints(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM complaints")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::convert_count(count)
    }

    async fn count_complaints_with_status(
        &self,
        status: ComplaintStatus,
    ) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM complaints WHERE status = $1")
            .bind(status)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Self::convert_count(count)
    }

    async fn status_counts_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<StatusCounts, RepoError> {
        let row = sqlx::query_as::<_, StatusCountsRow>(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE status = 'pending') AS pending, \
                    COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress, \
                    COUNT(*) FILTER (WHERE status = 'resolved') AS resolved \
             FROM complaints WHERE citizen_id = $1",
        )
        .bind(citizen_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(StatusCounts {
            total: Self::convert_count(row.total)?,
            pending: Self::convert_count(row.pending)?,
            in_progress: Self::convert_count(row.in_progress)?,
            resolved: Self::convert_count(row.resolved)?,
        })
    }

    async fn complaints_created_per_day(
        &self,
        from: Date,
    ) -> Result<Vec<(Date, u64)>, RepoError> {
        let from_midnight = from.midnight().assume_utc();
        let rows: Vec<(Date, i64)> = sqlx::query_as(
            "SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS count \
             FROM complaints WHERE created_at >= $1 GROUP BY day ORDER BY day",
        )
        .bind(from_midnight)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|(day, count)| Ok((day, Self::convert_count(count)?)))
            .collect()
    }

    async fn complaint_category_counts(&self) -> Result<Vec<CategoryCount>, RepoError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT COALESCE(NULLIF(TRIM(category), ''), 'Other Issues') AS category, \
                    COUNT(*) AS count \
             FROM complaints GROUP BY 1 ORDER BY count DESC, category",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|(category, count)| {
                Ok(CategoryCount {
                    category,
                    count: Self::convert_count(count)?,
                })
            })
            .collect()
    }
}
