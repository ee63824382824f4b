//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{
    ActivityKind, ComplaintPriority, ComplaintStatus, NoticePriority, NotificationKind, Role,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplaintRecord {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub priority: ComplaintPriority,
    pub ward: i32,
    pub address: String,
    pub citizen_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub resolved_at: Option<OffsetDateTime>,
    pub revision: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplaintPhotoRecord {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub file_path: String,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub citizen_id: Option<Uuid>,
    pub target_role: Option<Role>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub complaint_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityLogRecord {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub title: String,
    pub detail: String,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoticeRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: NoticePriority,
    pub created_by: Option<Uuid>,
    pub created_by_role: Option<Role>,
    pub created_by_name: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GarbageReminderRecord {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub ward: i32,
    pub collection_days: String,
    pub collection_time: String,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Session rows live alongside users but carry no business rules; the secret
/// column stores a SHA-256 digest, never the raw token.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prefix: String,
    pub hashed_secret: Vec<u8>,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}
