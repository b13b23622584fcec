//! In-memory video repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::models::VideoRecord;
use uuid::Uuid;

use crate::repository::{DbError, DbResult, VideoRepository};

#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, VideoRecord>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: VideoRecord) {
        self.videos.write().await.insert(record.id, record);
    }

    pub async fn len(&self) -> usize {
        self.videos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.videos.read().await.is_empty()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get_video(&self, id: Uuid) -> DbResult<Option<VideoRecord>> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, record: &VideoRecord) -> DbResult<()> {
        let mut videos = self.videos.write().await;
        match videos.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                tracing::debug!(video_id = %record.id, "Video record updated");
                Ok(())
            }
            None => Err(DbError::NotFound(record.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::models::StoredObjectReference;

    #[tokio::test]
    async fn get_returns_inserted_record() {
        let repo = InMemoryVideoRepository::new();
        let record = VideoRecord::new(Uuid::new_v4(), "Boots", None);
        repo.insert(record.clone()).await;

        assert_eq!(repo.get_video(record.id).await.unwrap(), Some(record));
        assert_eq!(repo.get_video(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_is_last_write_wins() {
        let repo = InMemoryVideoRepository::new();
        let record = VideoRecord::new(Uuid::new_v4(), "Boots", None);
        repo.insert(record.clone()).await;

        let first = record.with_stored_reference(&StoredObjectReference::new("b", "other/1.mp4"));
        let second = record.with_stored_reference(&StoredObjectReference::new("b", "other/2.mp4"));
        repo.update_video(&first).await.unwrap();
        repo.update_video(&second).await.unwrap();

        let stored = repo.get_video(record.id).await.unwrap().unwrap();
        assert_eq!(stored.video_url.as_deref(), Some("b,other/2.mp4"));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_of_unknown_record_fails() {
        let repo = InMemoryVideoRepository::new();
        let record = VideoRecord::new(Uuid::new_v4(), "Boots", None);
        assert!(matches!(
            repo.update_video(&record).await,
            Err(DbError::NotFound(id)) if id == record.id
        ));
        assert!(repo.is_empty().await);
    }
}
