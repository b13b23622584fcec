//! Thumbnail assets on the local filesystem.
//!
//! Thumbnails are stored as-is under the assets root with a random name and
//! served by whatever static file server fronts that directory.

use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tubely_core::{Config, MediaType};
use tubely_storage::random_object_id;

/// A thumbnail written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedThumbnail {
    /// Public URL stored on the record
    pub url: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct ThumbnailStore {
    assets_root: PathBuf,
    base_url: String,
}

impl ThumbnailStore {
    pub fn new(assets_root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            assets_root: assets_root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.assets_root.clone(), config.assets_base_url.clone())
    }

    /// Write `data` to a fresh file under a random name.
    pub async fn save(&self, media_type: MediaType, data: &[u8]) -> io::Result<SavedThumbnail> {
        tokio::fs::create_dir_all(&self.assets_root).await?;

        let file_name = format!("{}{}", random_object_id(), media_type.extension());
        let path = self.assets_root.join(&file_name);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(data).await?;
        file.flush().await?;

        tracing::info!(
            path = %path.display(),
            size_bytes = data.len(),
            "Thumbnail saved"
        );

        Ok(SavedThumbnail {
            url: format!("{}/{}", self.base_url, file_name),
            path,
        })
    }

    /// Delete a thumbnail that never made it onto a record.
    pub async fn discard(&self, thumbnail: &SavedThumbnail) {
        remove_asset(&thumbnail.path).await;
    }
}

async fn remove_asset(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed orphaned thumbnail"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            error = %e,
            path = %path.display(),
            "Failed to remove orphaned thumbnail"
        ),
    }
}
