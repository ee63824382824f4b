//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::entities::{
    ActivityLogRecord, ComplaintPhotoRecord, ComplaintRecord, GarbageReminderRecord, NoticeRecord,
    NotificationRecord, SessionRecord, UserRecord,
};
use crate::domain::types::{
    ActivityKind, ComplaintPriority, ComplaintStatus, NoticePriority, NotificationKind, Role,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateComplaintParams {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub description: String,
    pub priority: ComplaintPriority,
    pub ward: i32,
    pub address: String,
    pub citizen_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewComplaintPhoto {
    pub id: Uuid,
    pub file_path: String,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
}

#[derive(Debug, Clone)]
pub struct UpdateComplaintStatusParams {
    pub id: Uuid,
    pub status: ComplaintStatus,
    pub resolved_at: Option<OffsetDateTime>,
    pub updated_at: OffsetDateTime,
    /// When set, the update only applies if the stored revision matches.
    pub expected_revision: Option<i32>,
}

/// Outcome of a single-row status update.
#[derive(Debug, Clone)]
pub enum StatusUpdateResult {
    Updated(ComplaintRecord),
    NotFound,
    RevisionMismatch,
}

/// Per-status complaint counts for one citizen's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StatusCounts {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[async_trait]
pub trait ComplaintsRepo: Send + Sync {
    /// Insert the complaint and its photo rows in one transaction.
    async fn create_complaint(
        &self,
        params: CreateComplaintParams,
        photos: Vec<NewComplaintPhoto>,
    ) -> Result<ComplaintRecord, RepoError>;

    async fn find_complaint(&self, id: Uuid) -> Result<Option<ComplaintRecord>, RepoError>;

    /// Lookup that re-checks ownership, not just existence.
    async fn find_owned_complaint(
        &self,
        id: Uuid,
        citizen_id: Uuid,
    ) -> Result<Option<ComplaintRecord>, RepoError>;

    async fn list_complaints(&self) -> Result<Vec<ComplaintRecord>, RepoError>;

    async fn list_complaints_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<Vec<ComplaintRecord>, RepoError>;

    async fn list_complaint_photos(
        &self,
        complaint_id: Uuid,
    ) -> Result<Vec<ComplaintPhotoRecord>, RepoError>;

    async fn update_complaint_status(
        &self,
        params: UpdateComplaintStatusParams,
    ) -> Result<StatusUpdateResult, RepoError>;

    async fn count_complaints(&self) -> Result<u64, RepoError>;

    async fn count_complaints_with_status(
        &self,
        status: ComplaintStatus,
    ) -> Result<u64, RepoError>;

    async fn status_counts_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<StatusCounts, RepoError>;

    /// Complaints created per UTC calendar day, from `from` onwards. Days
    /// without complaints are absent; callers zero-fill.
    async fn complaints_created_per_day(
        &self,
        from: Date,
    ) -> Result<Vec<(Date, u64)>, RepoError>;

    /// All-time category distribution, descending by count. Null/empty
    /// categories are bucketed as "Other Issues".
    async fn complaint_category_counts(&self) -> Result<Vec<CategoryCount>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub citizen_id: Option<Uuid>,
    pub target_role: Option<Role>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub complaint_id: Option<Uuid>,
}

/// Which notification rows a caller may see: rows addressed to them plus
/// broadcasts addressed to their role.
#[derive(Debug, Clone, Copy)]
pub struct NotificationScope {
    pub user_id: Uuid,
    pub role: Role,
}

#[async_trait]
pub trait NotificationsRepo: Send + Sync {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationRecord, RepoError>;

    async fn list_notifications(
        &self,
        scope: NotificationScope,
        unread_only: bool,
    ) -> Result<Vec<NotificationRecord>, RepoError>;

    /// Idempotent: marking an already-read or missing row is a no-op. Rows
    /// outside the caller's scope are treated as missing.
    async fn mark_notification_read(
        &self,
        id: Uuid,
        scope: NotificationScope,
    ) -> Result<(), RepoError>;

    /// Marks every currently-unread row visible to the scope; returns the
    /// number of rows flipped.
    async fn mark_all_notifications_read(
        &self,
        scope: NotificationScope,
    ) -> Result<u64, RepoError>;
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub kind: ActivityKind,
    pub title: String,
    pub detail: String,
}

#[async_trait]
pub trait ActivityRepo: Send + Sync {
    async fn append_activity(&self, activity: NewActivity) -> Result<ActivityLogRecord, RepoError>;

    async fn list_recent_activity(&self, limit: u32) -> Result<Vec<ActivityLogRecord>, RepoError>;

    async fn mark_activity_read(&self, id: Uuid) -> Result<(), RepoError>;

    async fn mark_all_activity_read(&self) -> Result<u64, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateNoticeParams {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: NoticePriority,
    pub created_by: Option<Uuid>,
    pub created_by_role: Option<Role>,
    pub created_by_name: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct UpdateNoticeParams {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: NoticePriority,
    pub updated_at: OffsetDateTime,
}

#[async_trait]
pub trait NoticesRepo: Send + Sync {
    async fn create_notice(&self, params: CreateNoticeParams) -> Result<NoticeRecord, RepoError>;

    async fn update_notice(
        &self,
        params: UpdateNoticeParams,
    ) -> Result<Option<NoticeRecord>, RepoError>;

    async fn delete_notice(&self, id: Uuid) -> Result<Option<NoticeRecord>, RepoError>;

    async fn find_notice(&self, id: Uuid) -> Result<Option<NoticeRecord>, RepoError>;

    async fn list_notices(&self) -> Result<Vec<NoticeRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub address: Option<String>,
    pub is_active: bool,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// A user row together with its stored credential hash, for sign-in only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: UserRecord,
    pub password_hash: String,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;

    async fn credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, RepoError>;

    async fn list_users(&self) -> Result<Vec<UserRecord>, RepoError>;

    async fn set_user_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<UserRecord>, RepoError>;

    async fn update_user_profile(
        &self,
        id: Uuid,
        full_name: String,
        address: Option<String>,
    ) -> Result<Option<UserRecord>, RepoError>;

    async fn count_users(&self) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait SessionsRepo: Send + Sync {
    async fn insert_session(&self, session: SessionRecord) -> Result<(), RepoError>;

    async fn find_session_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Option<SessionRecord>, RepoError>;

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct NewGarbageReminder {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub ward: i32,
    pub collection_days: String,
    pub collection_time: String,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait RemindersRepo: Send + Sync {
    async fn reminder_exists(&self, citizen_id: Uuid, ward: i32) -> Result<bool, RepoError>;

    async fn insert_reminder(
        &self,
        reminder: NewGarbageReminder,
    ) -> Result<GarbageReminderRecord, RepoError>;

    async fn list_reminders_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<Vec<GarbageReminderRecord>, RepoError>;

    /// Delete the reminder only when it belongs to the citizen; returns
    /// whether a row was removed.
    async fn delete_owned_reminder(&self, id: Uuid, citizen_id: Uuid) -> Result<bool, RepoError>;
}
