//! Video upload orchestration: temp file → classify → remux → upload.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::{TempDir, TempPath};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use tubely_core::{AppError, Config, StoredObjectReference};
use tubely_storage::{generate_object_key, Storage, StorageError};

use super::types::MediaFile;
use crate::traits::{DimensionProbe, FastStartRemuxer, RemuxError};
use crate::video::{AspectClassifier, FfmpegRemuxer, FfprobeProbe};

const TEMP_PREFIX: &str = "tubely-upload-";
const INPUT_FILE_NAME: &str = "upload.mp4";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid media type for video upload: {0}")]
    UnsupportedMediaType(String),

    #[error("File size exceeds limit of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Remux(#[from] RemuxError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Upload timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedMediaType(_) => AppError::Validation(err.to_string()),
            UploadError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            UploadError::Io(e) => AppError::Io(e.to_string()),
            UploadError::Remux(e) => e.into(),
            UploadError::Storage(e) => e.into(),
            UploadError::Timeout(_) => AppError::Storage(err.to_string()),
        }
    }
}

/// Config for upload orchestration.
#[derive(Clone, Debug)]
pub struct UploadOrchestratorConfig {
    /// Parent of the per-upload scratch directory; the system temp dir when `None`.
    pub temp_dir: Option<PathBuf>,
    pub max_size_bytes: usize,
    /// Deadline for the object store write.
    pub upload_timeout: Duration,
}

impl UploadOrchestratorConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            temp_dir: config.upload_temp_dir.clone(),
            max_size_bytes: config.max_video_size_bytes,
            upload_timeout: config.storage_timeout,
        }
    }
}

/// Sequences one upload: copy to a scratch file, classify, remux, store.
///
/// Every scratch artifact is tied to a guard that deletes it on drop, so an
/// error, a cancelled future or an unwinding panic all leave nothing behind.
#[derive(Clone)]
pub struct UploadOrchestrator {
    storage: Arc<dyn Storage>,
    classifier: AspectClassifier,
    remuxer: Arc<dyn FastStartRemuxer>,
    config: UploadOrchestratorConfig,
}

impl UploadOrchestrator {
    pub fn new(
        storage: Arc<dyn Storage>,
        probe: Arc<dyn DimensionProbe>,
        remuxer: Arc<dyn FastStartRemuxer>,
        config: UploadOrchestratorConfig,
    ) -> Self {
        Self {
            storage,
            classifier: AspectClassifier::new(probe),
            remuxer,
            config,
        }
    }

    /// Orchestrator backed by the configured ffprobe and ffmpeg binaries.
    pub fn from_config(config: &Config, storage: Arc<dyn Storage>) -> Self {
        Self::new(
            storage,
            Arc::new(FfprobeProbe::new(config.ffprobe_path.clone(), config.probe_timeout)),
            Arc::new(FfmpegRemuxer::new(config.ffmpeg_path.clone(), config.remux_timeout)),
            UploadOrchestratorConfig::from_config(config),
        )
    }

    pub fn bucket(&self) -> &str {
        self.storage.bucket()
    }

    /// Run the full pipeline and return where the video was stored.
    pub async fn upload(&self, file: MediaFile) -> Result<StoredObjectReference, UploadError> {
        let start = Instant::now();
        let media_type = file.media_type;
        if !media_type.is_video() {
            return Err(UploadError::UnsupportedMediaType(media_type.to_string()));
        }

        let temp_dir = self.scratch_dir()?;
        let input_path = temp_dir.path().join(INPUT_FILE_NAME);

        let size = self.write_input(file, &input_path).await?;
        tracing::debug!(
            path = %input_path.display(),
            size_bytes = size,
            "Upload written to temp file"
        );

        let orientation = self.classifier.classify_or_other(&input_path).await;

        let processed = self.remuxer.remux_fast_start(&input_path).await.map_err(|e| {
            tracing::error!(error = %e, "Fast-start remux failed, aborting upload");
            e
        })?;
        // Deleted on drop even if the remuxer wrote outside the scratch directory.
        let processed = TempPath::from_path(processed);

        let data = tokio::fs::read(&processed).await?;
        let size_bytes = data.len();

        let bucket = self.storage.bucket().to_string();
        let key = generate_object_key(orientation, media_type.extension());

        tokio::time::timeout(
            self.config.upload_timeout,
            self.storage
                .put_object(&bucket, &key, data, media_type.as_str()),
        )
        .await
        .map_err(|_| UploadError::Timeout(self.config.upload_timeout))??;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            orientation = %orientation.as_str(),
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video upload completed"
        );

        drop(processed);
        drop(temp_dir);

        Ok(StoredObjectReference::new(bucket, key))
    }

    fn scratch_dir(&self) -> io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        match &self.config.temp_dir {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
    }

    /// Copy the body to `path`, rejecting bodies over the size limit.
    async fn write_input(
        &self,
        file: MediaFile,
        path: &std::path::Path,
    ) -> Result<u64, UploadError> {
        let limit = self.config.max_size_bytes;
        let mut out = tokio::fs::File::create(path).await?;
        // One byte over the limit is enough to tell an oversized body apart.
        let mut body = file.body.take((limit as u64).saturating_add(1));
        let written = tokio::io::copy(&mut body, &mut out).await?;
        if written > limit as u64 {
            return Err(UploadError::TooLarge { limit });
        }
        out.flush().await?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_mapping() {
        let err: AppError = UploadError::TooLarge { limit: 10 }.into();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));

        let err: AppError = UploadError::Storage(StorageError::BucketNotFound("b".into())).into();
        assert!(matches!(err, AppError::Storage(_)));

        let err: AppError =
            UploadError::Remux(RemuxError::MissingOutput(PathBuf::from("x.processing"))).into();
        assert!(matches!(err, AppError::Remux(_)));

        let err: AppError = UploadError::Timeout(Duration::from_secs(3)).into();
        assert!(matches!(err, AppError::Storage(ref msg) if msg.contains("3s")));
    }
}
