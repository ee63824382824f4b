//! Append-only admin activity feed.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::repos::{ActivityRepo, NewActivity, RepoError};
use crate::domain::entities::ActivityLogRecord;
use crate::domain::types::ActivityKind;

/// Thin wrapper around the activity repository to simplify logging
/// administrative actions from other services.
#[derive(Clone)]
pub struct ActivityLogService {
    repo: Arc<dyn ActivityRepo>,
}

impl ActivityLogService {
    pub fn new(repo: Arc<dyn ActivityRepo>) -> Self {
        Self { repo }
    }

    pub async fn record(
        &self,
        kind: ActivityKind,
        title: &str,
        detail: impl Into<String>,
    ) -> Result<ActivityLogRecord, RepoError> {
        self.repo
            .append_activity(NewActivity {
                kind,
                title: title.to_string(),
                detail: detail.into(),
            })
            .await
    }

    pub async fn list_recent(&self, limit: u32) -> Result<Vec<ActivityLogRecord>, RepoError> {
        self.repo.list_recent_activity(limit).await
    }

    /// Idempotent: re-marking a read or missing entry is a no-op.
    pub async fn mark_read(&self, id: Uuid) -> Result<(), RepoError> {
        self.repo.mark_activity_read(id).await
    }

    pub async fn mark_all_read(&self) -> Result<u64, RepoError> {
        self.repo.mark_all_activity_read().await
    }
}
