//! Complaint lifecycle orchestration: submission, status changes, and
//! owner-scoped queries.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::application::activity::ActivityLogService;
use crate::application::notifications::NotificationService;
use crate::application::repos::{
    ComplaintsRepo, CreateComplaintParams, NewComplaintPhoto, RepoError, StatusCounts,
    StatusUpdateResult, UpdateComplaintStatusParams,
};
use crate::application::storage::{PhotoStore, PhotoStoreError};
use crate::domain::categories::Category;
use crate::domain::complaints::{resolution_timestamp, transition_allowed};
use crate::domain::entities::{ComplaintPhotoRecord, ComplaintRecord};
use crate::domain::photos::{FieldError, PhotoUpload, validate_photos};
use crate::domain::types::{ActivityKind, ComplaintPriority, ComplaintStatus};

#[derive(Debug, Error)]
pub enum ComplaintError {
    #[error("complaint validation failed")]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Storage(#[from] PhotoStoreError),
}

/// A complaint as received from the submission form.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub category: String,
    pub title: String,
    pub description: String,
    pub priority: Option<String>,
    pub ward: i32,
    pub address: String,
    pub photos: Vec<PhotoUpload>,
}

/// Outcome of a status change request. Unknown ids and unknown status
/// labels are quiet no-ops rather than errors (reference behavior).
#[derive(Debug, Clone)]
pub enum StatusChangeOutcome {
    Updated(ComplaintRecord),
    UnknownComplaint,
    UnknownStatus,
    TransitionRefused,
    RevisionConflict,
}

#[derive(Clone)]
pub struct ComplaintService {
    complaints: Arc<dyn ComplaintsRepo>,
    notifications: NotificationService,
    activity: ActivityLogService,
    storage: Arc<dyn PhotoStore>,
}

impl ComplaintService {
    pub fn new(
        complaints: Arc<dyn ComplaintsRepo>,
        notifications: NotificationService,
        activity: ActivityLogService,
        storage: Arc<dyn PhotoStore>,
    ) -> Self {
        Self {
            complaints,
            notifications,
            activity,
            storage,
        }
    }

    /// Validate, store photos, persist complaint + photo rows in one
    /// transaction, then fan out the triage notifications. Validation
    /// failures reject the whole submission before anything is persisted.
    pub async fn submit(
        &self,
        citizen_id: Uuid,
        cmd: NewComplaint,
    ) -> Result<ComplaintRecord, ComplaintError> {
        let mut errors = Vec::new();

        if cmd.category.trim().is_empty() {
            errors.push(FieldError::new("category", "please select a category"));
        }
        if cmd.title.trim().is_empty() {
            errors.push(FieldError::new("title", "title is required"));
        }
        if cmd.description.trim().is_empty() {
            errors.push(FieldError::new("description", "description is required"));
        }
        if cmd.address.trim().is_empty() {
            errors.push(FieldError::new("address", "address is required"));
        }
        if cmd.ward <= 0 {
            errors.push(FieldError::new("ward", "please select a valid ward"));
        }

        let priority = match cmd.priority.as_deref() {
            None => ComplaintPriority::Low,
            Some(raw) => match ComplaintPriority::try_from(raw) {
                Ok(priority) => priority,
                Err(()) => {
                    errors.push(FieldError::new("priority", "unknown priority"));
                    ComplaintPriority::Low
                }
            },
        };

        if let Err(photo_errors) = validate_photos(&cmd.photos) {
            errors.extend(photo_errors);
        }

        if !errors.is_empty() {
            return Err(ComplaintError::Validation(errors));
        }

        let complaint_id = Uuid::new_v4();
        let category = Category::canonicalize(&cmd.category);

        let (photo_rows, stored_paths) = self.store_photos(complaint_id, &cmd.photos).await?;

        let params = CreateComplaintParams {
            id: complaint_id,
            category: category.label().to_string(),
            title: cmd.title.trim().to_string(),
            description: cmd.description.trim().to_string(),
            priority,
            ward: cmd.ward,
            address: cmd.address.trim().to_string(),
            citizen_id: Some(citizen_id),
            created_at: OffsetDateTime::now_utc(),
        };

        let record = match self.complaints.create_complaint(params, photo_rows).await {
            Ok(record) => record,
            Err(err) => {
                // The rows never landed; reclaim the files we already wrote.
                for path in &stored_paths {
                    let _ = self.storage.remove_photo(path).await;
                }
                return Err(ComplaintError::Repo(err));
            }
        };

        // Fan-out is part of the same request; a failure here surfaces
        // loudly while the complaint itself stays durable.
        self.notifications.complaint_created(&record).await?;

        info!(
            target = "nagari::complaints",
            complaint_id = %record.id,
            category = %record.category,
            ward = record.ward,
            photos = stored_paths.len(),
            "complaint submitted",
        );

        Ok(record)
    }

    async fn store_photos(
        &self,
        complaint_id: Uuid,
        photos: &[PhotoUpload],
    ) -> Result<(Vec<NewComplaintPhoto>, Vec<String>), ComplaintError> {
        let mut rows = Vec::with_capacity(photos.len());
        let mut stored_paths: Vec<String> = Vec::with_capacity(photos.len());

        for photo in photos {
            let stored = match self
                .storage
                .save_photo(complaint_id, &photo.content_type, photo.data.clone())
                .await
            {
                Ok(stored) => stored,
                Err(err) => {
                    for path in &stored_paths {
                        let _ = self.storage.remove_photo(path).await;
                    }
                    return Err(ComplaintError::Storage(err));
                }
            };

            rows.push(NewComplaintPhoto {
                id: Uuid::new_v4(),
                file_path: stored.stored_path.clone(),
                original_name: photo.original_name.clone(),
                content_type: photo.content_type.clone(),
                size_bytes: stored.size_bytes,
            });
            stored_paths.push(stored.stored_path);
        }

        Ok((rows, stored_paths))
    }

    /// Apply a status change. Unknown ids/statuses are no-ops; a revision
    /// mismatch (when the caller supplied one) is a conflict.
    pub async fn update_status(
        &self,
        id: Uuid,
        raw_status: &str,
        expected_revision: Option<i32>,
    ) -> Result<StatusChangeOutcome, ComplaintError> {
        let Ok(status) = ComplaintStatus::try_from(raw_status) else {
            return Ok(StatusChangeOutcome::UnknownStatus);
        };

        let Some(current) = self.complaints.find_complaint(id).await? else {
            return Ok(StatusChangeOutcome::UnknownComplaint);
        };

        if !transition_allowed(current.status, status) {
            return Ok(StatusChangeOutcome::TransitionRefused);
        }

        let now = OffsetDateTime::now_utc();
        let result = self
            .complaints
            .update_complaint_status(UpdateComplaintStatusParams {
                id,
                status,
                resolved_at: resolution_timestamp(status, now),
                updated_at: now,
                expected_revision,
            })
            .await?;

        let record = match result {
            StatusUpdateResult::Updated(record) => record,
            StatusUpdateResult::NotFound => return Ok(StatusChangeOutcome::UnknownComplaint),
            StatusUpdateResult::RevisionMismatch => {
                return Ok(StatusChangeOutcome::RevisionConflict);
            }
        };

        self.activity
            .record(
                ActivityKind::Complaint,
                "Complaint status updated",
                format!("Complaint {} -> {}", record.id, record.status.as_str()),
            )
            .await?;

        self.notifications.complaint_status_changed(&record).await?;

        Ok(StatusChangeOutcome::Updated(record))
    }

    pub async fn list_all(&self) -> Result<Vec<ComplaintRecord>, ComplaintError> {
        Ok(self.complaints.list_complaints().await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<ComplaintRecord>, ComplaintError> {
        Ok(self.complaints.find_complaint(id).await?)
    }

    pub async fn list_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<Vec<ComplaintRecord>, ComplaintError> {
        Ok(self.complaints.list_complaints_for_citizen(citizen_id).await?)
    }

    /// Lookup by id that re-checks ownership; another citizen's complaint
    /// is indistinguishable from a missing one.
    pub async fn find_for_citizen(
        &self,
        id: Uuid,
        citizen_id: Uuid,
    ) -> Result<Option<ComplaintRecord>, ComplaintError> {
        Ok(self.complaints.find_owned_complaint(id, citizen_id).await?)
    }

    pub async fn photos(
        &self,
        complaint_id: Uuid,
    ) -> Result<Vec<ComplaintPhotoRecord>, ComplaintError> {
        Ok(self.complaints.list_complaint_photos(complaint_id).await?)
    }

    pub async fn dashboard_counts(
        &self,
        citizen_id: Uuid,
    ) -> Result<StatusCounts, ComplaintError> {
        Ok(self.complaints.status_counts_for_citizen(citizen_id).await?)
    }
}
