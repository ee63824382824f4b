//! Garbage collection reminders, scoped strictly to the owning citizen.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{NewGarbageReminder, RemindersRepo, RepoError};
use crate::domain::entities::GarbageReminderRecord;
use crate::domain::photos::FieldError;

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("reminder validation failed")]
    Validation(Vec<FieldError>),
    #[error("a reminder for this ward already exists")]
    DuplicateWard,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct NewReminder {
    pub ward: i32,
    pub collection_days: String,
    pub collection_time: String,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct ReminderService {
    repo: Arc<dyn RemindersRepo>,
}

impl ReminderService {
    pub fn new(repo: Arc<dyn RemindersRepo>) -> Self {
        Self { repo }
    }

    /// One reminder per citizen per ward.
    pub async fn save(
        &self,
        citizen_id: Uuid,
        cmd: NewReminder,
    ) -> Result<GarbageReminderRecord, ReminderError> {
        let mut errors = Vec::new();
        let collection_days = cmd.collection_days.trim().to_string();
        let collection_time = cmd.collection_time.trim().to_string();

        if cmd.ward <= 0 {
            errors.push(FieldError::new("ward", "please select a valid ward"));
        }
        if collection_days.is_empty() {
            errors.push(FieldError::new(
                "collection_days",
                "collection days are required",
            ));
        }
        if collection_time.is_empty() {
            errors.push(FieldError::new(
                "collection_time",
                "collection time is required",
            ));
        }
        if !errors.is_empty() {
            return Err(ReminderError::Validation(errors));
        }

        if self.repo.reminder_exists(citizen_id, cmd.ward).await? {
            return Err(ReminderError::DuplicateWard);
        }

        let reminder = self
            .repo
            .insert_reminder(NewGarbageReminder {
                id: Uuid::new_v4(),
                citizen_id,
                ward: cmd.ward,
                collection_days,
                collection_time,
                notes: cmd
                    .notes
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty()),
                created_at: OffsetDateTime::now_utc(),
            })
            .await
            .map_err(|err| match err {
                // The unique index may still race ahead of the exists check.
                RepoError::Duplicate { .. } => ReminderError::DuplicateWard,
                other => ReminderError::Repo(other),
            })?;

        Ok(reminder)
    }

    pub async fn list_own(
        &self,
        citizen_id: Uuid,
    ) -> Result<Vec<GarbageReminderRecord>, ReminderError> {
        Ok(self.repo.list_reminders_for_citizen(citizen_id).await?)
    }

    /// Returns whether a row was deleted; someone else's reminder reads as
    /// missing.
    pub async fn delete_own(&self, id: Uuid, citizen_id: Uuid) -> Result<bool, ReminderError> {
        Ok(self.repo.delete_owned_reminder(id, citizen_id).await?)
    }
}
