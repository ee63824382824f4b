//! Blob storage seam for complaint photos.
//!
//! Core only records the returned path string; it never reads files back.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PhotoStoreError {
    #[error("invalid stored path")]
    InvalidPath,
    #[error("photo storage io error: {0}")]
    Io(String),
}

/// Result of persisting one photo payload.
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    pub stored_path: String,
    pub size_bytes: i64,
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist a photo under a container keyed by the complaint id, using a
    /// randomly generated filename. Returns the stored relative path.
    async fn save_photo(
        &self,
        complaint_id: Uuid,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredPhoto, PhotoStoreError>;

    /// Best-effort removal; missing files are treated as success.
    async fn remove_photo(&self, stored_path: &str) -> Result<(), PhotoStoreError>;
}
