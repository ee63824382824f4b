//! In-memory repository fakes for exercising the application services
//! without a database.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use uuid::Uuid;

use nagari::application::auth::{PasswordHashError, PasswordHasher, Principal};
use nagari::application::repos::{
    ActivityRepo, CategoryCount, ComplaintsRepo, CreateComplaintParams, CreateNoticeParams,
    CreateUserParams, NewActivity, NewComplaintPhoto, NewGarbageReminder, NewNotification,
    NoticesRepo, NotificationScope, NotificationsRepo, RemindersRepo, RepoError, SessionsRepo,
    StatusCounts, StatusUpdateResult, UpdateComplaintStatusParams, UpdateNoticeParams,
    UserCredentials, UsersRepo,
};
use nagari::application::storage::{PhotoStore, PhotoStoreError, StoredPhoto};
use nagari::domain::entities::{
    ActivityLogRecord, ComplaintPhotoRecord, ComplaintRecord, GarbageReminderRecord, NoticeRecord,
    NotificationRecord, SessionRecord, UserRecord,
};
use nagari::domain::photos::PhotoUpload;
use nagari::domain::types::{ComplaintStatus, Role};

pub fn principal(role: Role) -> Principal {
    Principal {
        user_id: Uuid::new_v4(),
        full_name: "Test User".to_string(),
        email: format!("{}@example.test", Uuid::new_v4().simple()),
        role,
    }
}

pub fn image_upload(name: &str, len: usize) -> PhotoUpload {
    PhotoUpload {
        original_name: name.to_string(),
        content_type: "image/jpeg".to_string(),
        data: Bytes::from(vec![0u8; len]),
    }
}

#[derive(Default)]
pub struct InMemoryComplaintsRepo {
    pub complaints: Mutex<HashMap<Uuid, ComplaintRecord>>,
    pub photos: Mutex<HashMap<Uuid, Vec<ComplaintPhotoRecord>>>,
}

#[async_trait]
impl ComplaintsRepo for InMemoryComplaintsRepo {
    async fn create_complaint(
        &self,
        params: CreateComplaintParams,
        photos: Vec<NewComplaintPhoto>,
    ) -> Result<ComplaintRecord, RepoError> {
        let record = ComplaintRecord {
            id: params.id,
            category: params.category,
            title: params.title,
            description: params.description,
            status: ComplaintStatus::Pending,
            priority: params.priority,
            ward: params.ward,
            address: params.address,
            citizen_id: params.citizen_id,
            created_at: params.created_at,
            updated_at: params.created_at,
            resolved_at: None,
            revision: 1,
        };
        let photo_rows = photos
            .into_iter()
            .map(|photo| ComplaintPhotoRecord {
                id: photo.id,
                complaint_id: params.id,
                file_path: photo.file_path,
                original_name: photo.original_name,
                content_type: photo.content_type,
                size_bytes: photo.size_bytes,
                uploaded_at: params.created_at,
            })
            .collect();
        self.complaints
            .lock()
            .await
            .insert(record.id, record.clone());
        self.photos.lock().await.insert(record.id, photo_rows);
        Ok(record)
    }

    async fn find_complaint(&self, id: Uuid) -> Result<Option<ComplaintRecord>, RepoError> {
        Ok(self.complaints.lock().await.get(&id).cloned())
    }

    async fn find_owned_complaint(
        &self,
        id: Uuid,
        citizen_id: Uuid,
    ) -> Result<Option<ComplaintRecord>, RepoError> {
        Ok(self
            .complaints
            .lock()
            .await
            .get(&id)
            .filter(|record| record.citizen_id == Some(citizen_id))
            .cloned())
    }

    async fn list_complaints(&self) -> Result<Vec<ComplaintRecord>, RepoError> {
        let mut records: Vec<_> = self.complaints.lock().await.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn list_complaints_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<Vec<ComplaintRecord>, RepoError> {
        let mut records: Vec<_> = self
            .complaints
            .lock()
            .await
            .values()
            .filter(|record| record.citizen_id == Some(citizen_id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn list_complaint_photos(
        &self,
        complaint_id: Uuid,
    ) -> Result<Vec<ComplaintPhotoRecord>, RepoError> {
        Ok(self
            .photos
            .lock()
            .await
            .get(&complaint_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_complaint_status(
        &self,
        params: UpdateComplaintStatusParams,
    ) -> Result<StatusUpdateResult, RepoError> {
        let mut complaints = self.complaints.lock().await;
        let Some(record) = complaints.get_mut(&params.id) else {
            return Ok(StatusUpdateResult::NotFound);
        };
        if let Some(expected) = params.expected_revision {
            if record.revision != expected {
                return Ok(StatusUpdateResult::RevisionMismatch);
            }
        }
        record.status = params.status;
        record.resolved_at = params.resolved_at;
        record.updated_at = params.updated_at;
        record.revision += 1;
        Ok(StatusUpdateResult::Updated(record.clone()))
    }

    async fn count_complaints(&self) -> Result<u64, RepoError> {
        Ok(self.complaints.lock().await.len() as u64)
    }

    async fn count_complaints_with_status(
        &self,
        status: ComplaintStatus,
    ) -> Result<u64, RepoError> {
        Ok(self
            .complaints
            .lock()
            .await
            .values()
            .filter(|record| record.status == status)
            .count() as u64)
    }

    async fn status_counts_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<StatusCounts, RepoError> {
        let complaints = self.complaints.lock().await;
        let mut counts = StatusCounts::default();
        for record in complaints
            .values()
            .filter(|record| record.citizen_id == Some(citizen_id))
        {
            counts.total += 1;
            match record.status {
                ComplaintStatus::Pending => counts.pending += 1,
                ComplaintStatus::InProgress => counts.in_progress += 1,
                ComplaintStatus::Resolved => counts.resolved += 1,
            }
        }
        Ok(counts)
    }

    async fn complaints_created_per_day(
        &self,
        from: Date,
    ) -> Result<Vec<(Date, u64)>, RepoError> {
        let complaints = self.complaints.lock().await;
        let mut buckets: HashMap<Date, u64> = HashMap::new();
        for record in complaints.values() {
            let day = record.created_at.date();
            if day >= from {
                *buckets.entry(day).or_default() += 1;
            }
        }
        let mut rows: Vec<_> = buckets.into_iter().collect();
        rows.sort_by_key(|(day, _)| *day);
        Ok(rows)
    }

    async fn complaint_category_counts(&self) -> Result<Vec<CategoryCount>, RepoError> {
        let complaints = self.complaints.lock().await;
        let mut buckets: HashMap<String, u64> = HashMap::new();
        for record in complaints.values() {
            *buckets.entry(record.category.clone()).or_default() += 1;
        }
        let mut rows: Vec<_> = buckets
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));
        Ok(rows)
    }
}

#[derive(Default)]
pub struct InMemoryNotificationsRepo {
    pub rows: Mutex<Vec<NotificationRecord>>,
}

impl InMemoryNotificationsRepo {
    pub async fn all(&self) -> Vec<NotificationRecord> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl NotificationsRepo for InMemoryNotificationsRepo {
    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationRecord, RepoError> {
        let record = NotificationRecord {
            id: Uuid::new_v4(),
            citizen_id: notification.citizen_id,
            target_role: notification.target_role,
            title: notification.title,
            message: notification.message,
            kind: notification.kind,
            complaint_id: notification.complaint_id,
            is_read: false,
            created_at: OffsetDateTime::now_utc(),
        };
        self.rows.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_notifications(
        &self,
        scope: NotificationScope,
        unread_only: bool,
    ) -> Result<Vec<NotificationRecord>, RepoError> {
        let rows = self.rows.lock().await;
        let mut visible: Vec<_> = rows
            .iter()
            .filter(|row| {
                row.citizen_id == Some(scope.user_id) || row.target_role == Some(scope.role)
            })
            .filter(|row| !unread_only || !row.is_read)
            .cloned()
            .collect();
        visible.reverse();
        Ok(visible)
    }

    async fn mark_notification_read(
        &self,
        id: Uuid,
        scope: NotificationScope,
    ) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| {
            row.id == id
                && (row.citizen_id == Some(scope.user_id) || row.target_role == Some(scope.role))
        }) {
            row.is_read = true;
        }
        Ok(())
    }

    async fn mark_all_notifications_read(
        &self,
        scope: NotificationScope,
    ) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().await;
        let mut flipped = 0;
        for row in rows.iter_mut() {
            let visible =
                row.citizen_id == Some(scope.user_id) || row.target_role == Some(scope.role);
            if visible && !row.is_read {
                row.is_read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

#[derive(Default)]
pub struct InMemoryActivityRepo {
    pub rows: Mutex<Vec<ActivityLogRecord>>,
}

impl InMemoryActivityRepo {
    pub async fn all(&self) -> Vec<ActivityLogRecord> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl ActivityRepo for InMemoryActivityRepo {
    async fn append_activity(
        &self,
        activity: NewActivity,
    ) -> Result<ActivityLogRecord, RepoError> {
        let record = ActivityLogRecord {
            id: Uuid::new_v4(),
            kind: activity.kind,
            title: activity.title,
            detail: activity.detail,
            is_read: false,
            created_at: OffsetDateTime::now_utc(),
        };
        self.rows.lock().await.push(record.clone());
        Ok(record)
    }

    async fn list_recent_activity(
        &self,
        limit: u32,
    ) -> Result<Vec<ActivityLogRecord>, RepoError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn mark_activity_read(&self, id: Uuid) -> Result<(), RepoError> {
        let mut rows = self.rows.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id == id) {
            row.is_read = true;
        }
        Ok(())
    }

    async fn mark_all_activity_read(&self) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().await;
        let mut flipped = 0;
        for row in rows.iter_mut() {
            if !row.is_read {
                row.is_read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }
}

#[derive(Default)]
pub struct InMemoryNoticesRepo {
    pub rows: Mutex<HashMap<Uuid, NoticeRecord>>,
}

#[async_trait]
impl NoticesRepo for InMemoryNoticesRepo {
    async fn create_notice(&self, params: CreateNoticeParams) -> Result<NoticeRecord, RepoError> {
        let record = NoticeRecord {
            id: params.id,
            title: params.title,
            description: params.description,
            priority: params.priority,
            created_by: params.created_by,
            created_by_role: params.created_by_role,
            created_by_name: params.created_by_name,
            created_at: params.created_at,
            updated_at: params.created_at,
        };
        self.rows.lock().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_notice(
        &self,
        params: UpdateNoticeParams,
    ) -> Result<Option<NoticeRecord>, RepoError> {
        let mut rows = self.rows.lock().await;
        let Some(record) = rows.get_mut(&params.id) else {
            return Ok(None);
        };
        record.title = params.title;
        record.description = params.description;
        record.priority = params.priority;
        record.updated_at = params.updated_at;
        Ok(Some(record.clone()))
    }

    async fn delete_notice(&self, id: Uuid) -> Result<Option<NoticeRecord>, RepoError> {
        Ok(self.rows.lock().await.remove(&id))
    }

    async fn find_notice(&self, id: Uuid) -> Result<Option<NoticeRecord>, RepoError> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn list_notices(&self) -> Result<Vec<NoticeRecord>, RepoError> {
        let mut records: Vec<_> = self.rows.lock().await.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

#[derive(Default)]
pub struct InMemoryUsersRepo {
    pub rows: Mutex<HashMap<Uuid, (UserRecord, String)>>,
}

#[async_trait]
impl UsersRepo for InMemoryUsersRepo {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let mut rows = self.rows.lock().await;
        let email = params.email.to_ascii_lowercase();
        if rows
            .values()
            .any(|(user, _)| user.email.to_ascii_lowercase() == email)
        {
            return Err(RepoError::Duplicate {
                constraint: "users_email_key".to_string(),
            });
        }
        let record = UserRecord {
            id: params.id,
            full_name: params.full_name,
            email,
            role: params.role,
            address: params.address,
            is_active: params.is_active,
            created_at: params.created_at,
            updated_at: params.created_at,
        };
        rows.insert(record.id, (record.clone(), params.password_hash));
        Ok(record)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.rows.lock().await.get(&id).map(|(user, _)| user.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        let email = email.to_ascii_lowercase();
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|(user, _)| user.email.to_ascii_lowercase() == email)
            .map(|(user, _)| user.clone()))
    }

    async fn credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, RepoError> {
        let email = email.to_ascii_lowercase();
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|(user, _)| user.email.to_ascii_lowercase() == email)
            .map(|(user, hash)| UserCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, RepoError> {
        let mut records: Vec<_> = self
            .rows
            .lock()
            .await
            .values()
            .map(|(user, _)| user.clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn set_user_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<UserRecord>, RepoError> {
        let mut rows = self.rows.lock().await;
        let Some((user, _)) = rows.get_mut(&id) else {
            return Ok(None);
        };
        user.is_active = is_active;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn update_user_profile(
        &self,
        id: Uuid,
        full_name: String,
        address: Option<String>,
    ) -> Result<Option<UserRecord>, RepoError> {
        let mut rows = self.rows.lock().await;
        let Some((user, _)) = rows.get_mut(&id) else {
            return Ok(None);
        };
        user.full_name = full_name;
        user.address = address;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn count_users(&self) -> Result<u64, RepoError> {
        Ok(self.rows.lock().await.len() as u64)
    }
}

#[derive(Default)]
pub struct InMemorySessionsRepo {
    pub rows: Mutex<HashMap<Uuid, SessionRecord>>,
}

#[async_trait]
impl SessionsRepo for InMemorySessionsRepo {
    async fn insert_session(&self, session: SessionRecord) -> Result<(), RepoError> {
        self.rows.lock().await.insert(session.id, session);
        Ok(())
    }

    async fn find_session_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Option<SessionRecord>, RepoError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|session| session.prefix == prefix)
            .cloned())
    }

    async fn delete_session(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows.lock().await.remove(&id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRemindersRepo {
    pub rows: Mutex<Vec<GarbageReminderRecord>>,
}

#[async_trait]
impl RemindersRepo for InMemoryRemindersRepo {
    async fn reminder_exists(&self, citizen_id: Uuid, ward: i32) -> Result<bool, RepoError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .any(|row| row.citizen_id == citizen_id && row.ward == ward))
    }

    async fn insert_reminder(
        &self,
        reminder: NewGarbageReminder,
    ) -> Result<GarbageReminderRecord, RepoError> {
        let mut rows = self.rows.lock().await;
        if rows
            .iter()
            .any(|row| row.citizen_id == reminder.citizen_id && row.ward == reminder.ward)
        {
            return Err(RepoError::Duplicate {
                constraint: "garbage_reminders_citizen_id_ward_key".to_string(),
            });
        }
        let record = GarbageReminderRecord {
            id: reminder.id,
            citizen_id: reminder.citizen_id,
            ward: reminder.ward,
            collection_days: reminder.collection_days,
            collection_time: reminder.collection_time,
            notes: reminder.notes,
            created_at: reminder.created_at,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn list_reminders_for_citizen(
        &self,
        citizen_id: Uuid,
    ) -> Result<Vec<GarbageReminderRecord>, RepoError> {
        let mut records: Vec<_> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|row| row.citizen_id == citizen_id)
            .cloned()
            .collect();
        records.sort_by_key(|row| row.ward);
        Ok(records)
    }

    async fn delete_owned_reminder(&self, id: Uuid, citizen_id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|row| !(row.id == id && row.citizen_id == citizen_id));
        Ok(rows.len() < before)
    }
}

/// Photo store that only records paths, never touching the filesystem.
#[derive(Default)]
pub struct RecordingPhotoStore {
    pub stored: Mutex<Vec<String>>,
}

impl RecordingPhotoStore {
    pub async fn stored_paths(&self) -> Vec<String> {
        self.stored.lock().await.clone()
    }
}

#[async_trait]
impl PhotoStore for RecordingPhotoStore {
    async fn save_photo(
        &self,
        complaint_id: Uuid,
        _content_type: &str,
        data: Bytes,
    ) -> Result<StoredPhoto, PhotoStoreError> {
        let stored_path = format!("complaints/{complaint_id}/{}.jpg", Uuid::new_v4().simple());
        self.stored.lock().await.push(stored_path.clone());
        Ok(StoredPhoto {
            stored_path,
            size_bytes: data.len() as i64,
        })
    }

    async fn remove_photo(&self, stored_path: &str) -> Result<(), PhotoStoreError> {
        self.stored.lock().await.retain(|path| path != stored_path);
        Ok(())
    }
}

/// Reversible stand-in hasher so auth tests stay fast.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash == format!("plain:{password}")
    }
}

pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
