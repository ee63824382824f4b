use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{NewGarbageReminder, RemindersRepo, RepoError};
use crate::domain::entities::GarbageReminderRecord;

use super::{PostgresRepositories, map_sqlx_error};

const REMINDER_COLUMNS: &str =
    "id, citizen_id, ward, collection_days, collection_time, notes, created_at";

#[derive(sqlx::FromRow)]
struct ReminderRow {
    id: Uuid,
    citizen_id: Uuid,
    ward: i32,
    collection_days: String,
    collection_time: String,
    notes: Option<String>,
    created_at: OffsetDateTime,
}

impl From<ReminderRow> for GarbageReminderRecord {
    fn from(row: ReminderRow) -> Self {
        Self {
            id: row.id,
            citizen_id: row.citizen_id,
            ward: row.ward,
            collection_days: row.collection_days,
            collection_time: row.collection_time,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl RemindersRepo for PostgresRepositories {
    async fn reminder_exists(&self, citizen_id: Uuid, ward: i32) -> Result<bool, RepoError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM garbage_reminders WHERE citizen_id = $1 AND ward = $2)",
        )
        .bind(citizen_id)
        .bind(ward)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(exists)
    }

    async fn insert_reminder(
        &self,
        reminder: NewGarbageReminder,
    ) -> Result<GarbageReminderRecord, RepoError> {
        let row = sqlx::query_as::<_, ReminderRow>(&format!(
            "INSERT INTO garbage_reminders \
                 (id, citizen_id, ward, collection_days, collection_time, notes, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {REMINDER_COLUMNS}"
        ))
        .bind(reminder.id)
        .bind(reminder.citizen_id)
        .bind(reminder.ward)
        .bind(&reminder.collection_days)
        .bind(&reminder.collection_time)
        .bind(&reminder.notes)
        .bind(reminder.created_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_reminders_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<Vec<GarbageReminderRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ReminderRow>(&format!(
            "SELECT {REMINDER_COLUMNS} FROM garbage_reminders \
             WHERE citizen_id = $1 ORDER BY ward"
        ))
        .bind(citizen_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_owned_reminder(&self, id: Uuid, citizen_id: Uuid) -> Result<bool, RepoError> {
        let result =
            sqlx::query("DELETE FROM garbage_reminders WHERE id = $1 AND citizen_id = $2")
                .bind(id)
                .bind(citizen_id)
                .execute(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
