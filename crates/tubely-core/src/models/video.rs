use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::storage::{ReferenceParseError, StoredObjectReference};

/// Video metadata row owned by the metadata store.
///
/// `video_url` holds the serialized [`StoredObjectReference`] (`"<bucket>,<key>"`),
/// never a signed URL. Signed URLs only appear on [`VideoResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
}

impl VideoRecord {
    pub fn new(user_id: Uuid, title: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: title.into(),
            description,
            user_id,
            thumbnail_url: None,
            video_url: None,
        }
    }

    /// Parse the stored reference, if the record has one.
    pub fn stored_reference(&self) -> Option<Result<StoredObjectReference, ReferenceParseError>> {
        self.video_url.as_deref().map(str::parse)
    }

    /// Copy of this record pointing at a newly uploaded object.
    pub fn with_stored_reference(&self, reference: &StoredObjectReference) -> Self {
        Self {
            video_url: Some(reference.encode()),
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Copy of this record with a new thumbnail location.
    pub fn with_thumbnail_url(&self, thumbnail_url: String) -> Self {
        Self {
            thumbnail_url: Some(thumbnail_url),
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

/// Outbound view of a video with its reference resolved to a signed URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url_expires_at: Option<DateTime<Utc>>,
}

impl VideoResponse {
    /// Build a response from a record and an already signed URL.
    pub fn from_record(
        record: &VideoRecord,
        video_url: Option<String>,
        video_url_expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            title: record.title.clone(),
            description: record.description.clone(),
            user_id: record.user_id,
            thumbnail_url: record.thumbnail_url.clone(),
            video_url,
            video_url_expires_at,
        }
    }
}
