//! Video repository trait

use async_trait::async_trait;
use thiserror::Error;
use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Video not found: {0}")]
    NotFound(Uuid),

    #[error("Metadata store error: {0}")]
    Backend(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(id) => AppError::NotFound(format!("Video {} not found", id)),
            DbError::Backend(msg) => AppError::Database(msg),
        }
    }
}

/// Metadata operations the upload pipeline needs.
///
/// Updates are last-write-wins; no version check is performed.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Get a video record by ID
    async fn get_video(&self, id: Uuid) -> DbResult<Option<VideoRecord>>;

    /// Replace the stored record with the same ID
    async fn update_video(&self, record: &VideoRecord) -> DbResult<()>;
}
