//! Video upload service: validation, pipeline, metadata update and signing.
//!
//! This is the boundary where typed references become the untyped `video_url`
//! field of a record, and where records become signed responses.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::AsyncRead;
use uuid::Uuid;

use tubely_core::validation::{
    parse_video_id, validate_file_size, validate_thumbnail_content_type,
    validate_video_content_type,
};
use tubely_core::{AppError, Config, VideoRecord, VideoResponse};
use tubely_db::VideoRepository;
use tubely_storage::Storage;

use super::orchestrator::UploadOrchestrator;
use super::thumbnail::ThumbnailStore;
use super::types::MediaFile;
use crate::signing::SignedAccessIssuer;

#[derive(Clone)]
pub struct VideoUploadService {
    repository: Arc<dyn VideoRepository>,
    orchestrator: UploadOrchestrator,
    thumbnails: ThumbnailStore,
    issuer: SignedAccessIssuer,
    max_thumbnail_size_bytes: usize,
}

impl VideoUploadService {
    pub fn new(
        repository: Arc<dyn VideoRepository>,
        orchestrator: UploadOrchestrator,
        thumbnails: ThumbnailStore,
        issuer: SignedAccessIssuer,
        max_thumbnail_size_bytes: usize,
    ) -> Self {
        Self {
            repository,
            orchestrator,
            thumbnails,
            issuer,
            max_thumbnail_size_bytes,
        }
    }

    /// Service wired to the configured tools, storage and repository.
    pub fn from_config(
        config: &Config,
        storage: Arc<dyn Storage>,
        repository: Arc<dyn VideoRepository>,
    ) -> Self {
        Self::new(
            repository,
            UploadOrchestrator::from_config(config, storage.clone()),
            ThumbnailStore::from_config(config),
            SignedAccessIssuer::with_default_expiry(storage, config.signed_url_expiry),
            config.max_thumbnail_size_bytes,
        )
    }

    async fn load(&self, id: Uuid) -> Result<VideoRecord, AppError> {
        self.repository
            .get_video(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))
    }

    /// Store a new video file for an existing record.
    ///
    /// The response is signed before the record is written, so the update is
    /// the last fallible step and any failure leaves the record untouched. A
    /// failure after the object is stored leaves that object unreferenced.
    #[tracing::instrument(skip(self, body), fields(video_id = %video_id))]
    pub async fn upload_video(
        &self,
        video_id: &str,
        content_type: &str,
        body: impl AsyncRead + Send + Unpin + 'static,
    ) -> Result<VideoResponse, AppError> {
        let id = parse_video_id(video_id)?;
        let media_type = validate_video_content_type(content_type)?;
        let record = self.load(id).await?;

        let reference = self
            .orchestrator
            .upload(MediaFile::new(media_type, body))
            .await?;

        let updated = record.with_stored_reference(&reference);
        let response = self.issuer.sign_record(&updated).await?;
        self.repository.update_video(&updated).await?;

        tracing::info!(
            video_id = %id,
            video_url = %reference,
            "Video record updated"
        );

        Ok(response)
    }

    /// Store a thumbnail image for an existing record.
    ///
    /// The asset is removed again if the record cannot be updated.
    #[tracing::instrument(skip(self, data), fields(video_id = %video_id, size_bytes = data.len()))]
    pub async fn upload_thumbnail(
        &self,
        video_id: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<VideoResponse, AppError> {
        let id = parse_video_id(video_id)?;
        let media_type = validate_thumbnail_content_type(content_type)?;
        validate_file_size(data.len(), self.max_thumbnail_size_bytes)?;
        let record = self.load(id).await?;

        let thumbnail = self.thumbnails.save(media_type, &data).await?;

        let updated = record.with_thumbnail_url(thumbnail.url.clone());
        let result = match self.issuer.sign_record(&updated).await {
            Ok(response) => self
                .repository
                .update_video(&updated)
                .await
                .map(|()| response)
                .map_err(AppError::from),
            Err(e) => Err(e.into()),
        };
        if result.is_err() {
            self.thumbnails.discard(&thumbnail).await;
        }
        result
    }

    /// Fetch a record and resolve its video reference to a signed URL.
    pub async fn get_video(&self, video_id: &str) -> Result<VideoResponse, AppError> {
        let id = parse_video_id(video_id)?;
        let record = self.load(id).await?;
        Ok(self.issuer.sign_record(&record).await?)
    }
}
