//! Filesystem-backed photo storage.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::application::storage::{PhotoStore, PhotoStoreError, StoredPhoto};
use crate::domain::photos::extension_for;

/// Stores complaint photos under `<root>/complaints/<complaint-id>/`.
/// Filenames are random; the client-supplied name is only kept as metadata
/// in the database.
#[derive(Debug)]
pub struct PhotoStorage {
    root: PathBuf,
}

impl PhotoStorage {
    /// Initialise storage rooted at the provided directory, creating it if
    /// necessary.
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Obtain the absolute filesystem path for a stored photo.
    pub fn absolute_path(&self, stored_path: &str) -> Result<PathBuf, PhotoStoreError> {
        self.resolve(stored_path)
    }

    fn resolve(&self, stored_path: &str) -> Result<PathBuf, PhotoStoreError> {
        let relative = Path::new(stored_path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(PhotoStoreError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }

    fn build_stored_path(complaint_id: Uuid, content_type: &str) -> String {
        let identifier = Uuid::new_v4();
        let extension = extension_for(content_type);
        format!("complaints/{complaint_id}/{identifier}.{extension}")
    }
}

#[async_trait]
impl PhotoStore for PhotoStorage {
    async fn save_photo(
        &self,
        complaint_id: Uuid,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredPhoto, PhotoStoreError> {
        let stored_path = Self::build_stored_path(complaint_id, content_type);
        let absolute = self.resolve(&stored_path)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| PhotoStoreError::Io(err.to_string()))?;
        }

        let size_bytes = data.len() as i64;
        let mut file = fs::File::create(&absolute)
            .await
            .map_err(|err| PhotoStoreError::Io(err.to_string()))?;
        if let Err(err) = file.write_all(&data).await {
            drop(file);
            let _ = fs::remove_file(&absolute).await;
            return Err(PhotoStoreError::Io(err.to_string()));
        }
        file.flush()
            .await
            .map_err(|err| PhotoStoreError::Io(err.to_string()))?;

        Ok(StoredPhoto {
            stored_path,
            size_bytes,
        })
    }

    async fn remove_photo(&self, stored_path: &str) -> Result<(), PhotoStoreError> {
        let absolute = self.resolve(stored_path)?;
        match fs::remove_file(&absolute).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(PhotoStoreError::Io(err.to_string())),
        }
    }
}
