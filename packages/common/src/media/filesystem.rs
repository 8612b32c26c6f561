use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use super::error::MediaError;
use super::payload;
use super::traits::{MediaStore, StoredFile};

/// Filesystem-backed media store for local development and tests.
///
/// Assets live at `{root}/{public_id}` where `public_id` is
/// `{folder}/{uuid}`; the public URL is `{public_base_url}/{public_id}`.
pub struct FilesystemMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl FilesystemMediaStore {
    pub async fn new(root: PathBuf, public_base_url: String) -> std::io::Result<Self> {
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn asset_path(&self, public_id: &str) -> PathBuf {
        self.root.join(public_id)
    }

    async fn store(&self, file: &str, folder: &str) -> Result<StoredFile, MediaError> {
        let decoded = payload::decode(file)?;

        let public_id = format!("{}/{}", folder.trim_matches('/'), Uuid::new_v4());
        let path = self.asset_path(&public_id);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| MediaError::Upload(e.to_string()))?;
        }
        fs::write(&path, &decoded.bytes)
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        Ok(StoredFile {
            url: format!("{}/{public_id}", self.public_base_url),
            public_id,
        })
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn upload(&self, file: &str, folder: &str) -> Result<StoredFile, MediaError> {
        self.store(file, folder).await
    }

    async fn upload_image(&self, file: &str, folder: &str) -> Result<StoredFile, MediaError> {
        self.store(file, folder).await
    }

    async fn delete(&self, public_id: &str) -> Result<bool, MediaError> {
        // Refuse identifiers that could escape the root.
        if public_id.split('/').any(|seg| seg == "..") || Path::new(public_id).is_absolute() {
            return Err(MediaError::Deletion(format!(
                "invalid public id: {public_id}"
            )));
        }

        match fs::remove_file(self.asset_path(public_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MediaError::Deletion(e.to_string())),
        }
    }
}
