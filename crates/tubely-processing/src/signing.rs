//! Signed access to stored objects.
//!
//! Persisted records only ever hold the `bucket,key` reference. A signed URL is
//! produced on every read and handed out through [`VideoResponse`]; it is never
//! written back to the record.

use chrono::{SubsecRound, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tubely_core::constants::DEFAULT_SIGNED_URL_EXPIRY;
use tubely_core::{
    AppError, ReferenceParseError, SignedAccessUrl, StoredObjectReference, VideoRecord,
    VideoResponse,
};
use tubely_storage::{Storage, StorageError};

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Invalid stored reference: {0}")]
    InvalidReference(#[from] ReferenceParseError),

    #[error("Invalid expiry: {0:?}")]
    InvalidExpiry(Duration),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<SigningError> for AppError {
    fn from(err: SigningError) -> Self {
        AppError::Signing(err.to_string())
    }
}

/// Issues time-limited GET URLs using the store's own signing.
#[derive(Clone)]
pub struct SignedAccessIssuer {
    storage: Arc<dyn Storage>,
    default_expiry: Duration,
}

impl SignedAccessIssuer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_default_expiry(storage, DEFAULT_SIGNED_URL_EXPIRY)
    }

    pub fn with_default_expiry(storage: Arc<dyn Storage>, default_expiry: Duration) -> Self {
        Self {
            storage,
            default_expiry,
        }
    }

    pub fn default_expiry(&self) -> Duration {
        self.default_expiry
    }

    /// Sign `reference` for reads during `[now, now + expiry)`.
    pub async fn issue(
        &self,
        reference: &StoredObjectReference,
        expiry: Duration,
    ) -> Result<SignedAccessUrl, SigningError> {
        let ttl = chrono::Duration::from_std(expiry)
            .ok()
            .filter(|_| !expiry.is_zero())
            .ok_or(SigningError::InvalidExpiry(expiry))?;
        // Taken before signing and floored to whole seconds like the store's
        // own clock, so the reported expiry never outlives the URL.
        let issued_at = Utc::now().trunc_subsecs(0);

        let url = self
            .storage
            .presigned_get_url(&reference.bucket, &reference.key, expiry)
            .await?;

        tracing::debug!(
            bucket = %reference.bucket,
            key = %reference.key,
            expires_in_secs = expiry.as_secs(),
            "Issued signed URL"
        );

        Ok(SignedAccessUrl {
            url,
            expires_at: issued_at + ttl,
        })
    }

    pub async fn issue_default(
        &self,
        reference: &StoredObjectReference,
    ) -> Result<SignedAccessUrl, SigningError> {
        self.issue(reference, self.default_expiry).await
    }

    /// Parse a serialized `bucket,key` reference and sign it.
    pub async fn issue_for(
        &self,
        serialized: &str,
        expiry: Duration,
    ) -> Result<SignedAccessUrl, SigningError> {
        let reference: StoredObjectReference = serialized.parse()?;
        self.issue(&reference, expiry).await
    }

    /// Build the outbound view of `record` with a freshly signed video URL.
    ///
    /// A record without a stored video yields a response without a URL.
    pub async fn sign_record(&self, record: &VideoRecord) -> Result<VideoResponse, SigningError> {
        let Some(reference) = record.stored_reference() else {
            return Ok(VideoResponse::from_record(record, None, None));
        };
        let signed = self.issue_default(&reference?).await?;
        Ok(VideoResponse::from_record(
            record,
            Some(signed.url),
            Some(signed.expires_at),
        ))
    }
}
