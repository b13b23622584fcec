use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;

type HmacSha256 = Hmac<Sha256>;

/// Local filesystem storage implementation
///
/// Objects live at `{base_path}/{bucket}/{key}`. Presigned URLs carry an expiry
/// timestamp and an HMAC-SHA256 signature over bucket, key and expiry; the file
/// server in front of `base_path` checks them with [`LocalStorage::verify_presigned_url`].
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    bucket: String,
    signing_secret: Vec<u8>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for object storage (e.g., "/var/lib/tubely/objects")
    /// * `base_url` - Base URL the objects are served from (e.g., "http://localhost:8091/objects")
    /// * `bucket` - Bucket new uploads are written to
    /// * `signing_secret` - Key for presigned URL signatures
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        bucket: String,
        signing_secret: impl Into<Vec<u8>>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();
        let signing_secret = signing_secret.into();

        if signing_secret.is_empty() {
            return Err(StorageError::ConfigError(
                "Local storage signing secret cannot be empty".to_string(),
            ));
        }
        validate_bucket(&bucket)?;

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            signing_secret,
        })
    }

    /// Convert bucket and key to a filesystem path with traversal checks.
    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        validate_bucket(bucket)?;
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(bucket).join(key))
    }

    fn bucket_exists(&self, bucket: &str) -> bool {
        bucket == self.bucket || self.base_path.join(bucket).is_dir()
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    fn signature(&self, bucket: &str, key: &str, expires: u64) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.signing_secret)
            .expect("HMAC accepts any key size");
        mac.update(signing_payload(bucket, key, expires).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Build a signed URL that expires at the given unix timestamp.
    pub fn presigned_url_expiring_at(&self, bucket: &str, key: &str, expires: u64) -> String {
        format!(
            "{}/{}/{}?expires={}&signature={}",
            self.base_url,
            bucket,
            key,
            expires,
            self.signature(bucket, key, expires)
        )
    }

    /// Verify a presigned URL at the given unix time and return `(bucket, key)`.
    ///
    /// The URL is accepted while `now < expires`.
    pub fn verify_presigned_url(&self, url: &str, now: u64) -> StorageResult<(String, String)> {
        let rest = url
            .strip_prefix(&self.base_url)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(|| StorageError::SigningFailed("URL does not belong to this store".to_string()))?;
        let (path, query) = rest
            .split_once('?')
            .ok_or_else(|| StorageError::SigningFailed("URL is not signed".to_string()))?;
        let (bucket, key) = path
            .split_once('/')
            .ok_or_else(|| StorageError::InvalidKey(path.to_string()))?;

        let mut expires = None;
        let mut signature = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("expires", v)) => expires = v.parse::<u64>().ok(),
                Some(("signature", v)) => signature = hex::decode(v).ok(),
                _ => {}
            }
        }
        let expires = expires
            .ok_or_else(|| StorageError::SigningFailed("Missing or invalid expiry".to_string()))?;
        let signature = signature
            .ok_or_else(|| StorageError::SigningFailed("Missing or invalid signature".to_string()))?;

        let mut mac = HmacSha256::new_from_slice(&self.signing_secret)
            .expect("HMAC accepts any key size");
        mac.update(signing_payload(bucket, key, expires).as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| StorageError::SigningFailed("Signature mismatch".to_string()))?;

        if now >= expires {
            return Err(StorageError::SigningFailed("Signed URL has expired".to_string()));
        }

        Ok((bucket.to_string(), key.to_string()))
    }
}

fn signing_payload(bucket: &str, key: &str, expires: u64) -> String {
    format!("GET\n{}\n{}\n{}", bucket, key, expires)
}

fn validate_bucket(bucket: &str) -> StorageResult<()> {
    if bucket.is_empty()
        || bucket.contains('/')
        || bucket.contains('\\')
        || bucket.contains(',')
        || bucket.contains("..")
    {
        return Err(StorageError::InvalidKey(format!("Invalid bucket name: {}", bucket)));
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[async_trait]
impl Storage for LocalStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<()> {
        if !self.bucket_exists(bucket) {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }
        let path = self.object_path(bucket, key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.object_path(bucket, key)?;
        let expires = unix_now().saturating_add(expires_in.as_secs());
        Ok(self.presigned_url_expiring_at(bucket, key, expires))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
