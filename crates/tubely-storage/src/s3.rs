use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ClientOptions, ObjectStore, PutOptions,
    PutPayload, Result as ObjectResult, RetryConfig,
};
use std::time::Duration;

/// Settings for [`S3Storage`].
#[derive(Clone, Debug)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers
    /// (e.g. "http://localhost:9000" for MinIO)
    pub endpoint_url: Option<String>,
    /// Explicit credentials; when absent the AWS environment/instance chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Per-request timeout enforced by the HTTP client.
    pub request_timeout: Duration,
    /// Bounded retries for transient failures.
    pub max_retries: usize,
}

/// S3 storage implementation
///
/// The client for the upload bucket is built once and reused. References that
/// name another bucket get a client built from the same settings on demand.
#[derive(Clone)]
pub struct S3Storage {
    builder: AmazonS3Builder,
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    pub async fn new(settings: S3Settings) -> StorageResult<Self> {
        // Build AmazonS3 object store from environment and explicit settings.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(settings.region.clone())
            .with_client_options(ClientOptions::new().with_timeout(settings.request_timeout))
            .with_retry(RetryConfig {
                max_retries: settings.max_retries,
                retry_timeout: settings.request_timeout,
                ..Default::default()
            });

        if let Some(ref endpoint) = settings.endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        if let (Some(key_id), Some(secret)) =
            (&settings.access_key_id, &settings.secret_access_key)
        {
            builder = builder
                .with_access_key_id(key_id.clone())
                .with_secret_access_key(secret.clone());
        }

        let store = builder
            .clone()
            .with_bucket_name(settings.bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            builder,
            store,
            bucket: settings.bucket,
        })
    }

    fn store_for(&self, bucket: &str) -> StorageResult<AmazonS3> {
        if bucket == self.bucket {
            return Ok(self.store.clone());
        }
        self.builder
            .clone()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }

    fn location(key: &str) -> StorageResult<Path> {
        if key.is_empty() || key.starts_with('/') || key.contains("..") {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Path::parse(key).map_err(|e| StorageError::InvalidKey(e.to_string()))
    }

    fn map_put_error(bucket: &str, err: ObjectStoreError) -> StorageError {
        match err {
            ObjectStoreError::PermissionDenied { .. } | ObjectStoreError::Unauthenticated { .. } => {
                StorageError::Unauthorized(err.to_string())
            }
            other if other.to_string().contains("NoSuchBucket") => {
                StorageError::BucketNotFound(bucket.to_string())
            }
            other => StorageError::UploadFailed(other.to_string()),
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        let store = self.store_for(bucket)?;
        let location = Self::location(key)?;
        let size = data.len() as u64;

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            Self::map_put_error(bucket, e)
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let store = self.store_for(bucket)?;
        let location = Self::location(key)?;
        let url_result: ObjectResult<_> = store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| StorageError::SigningFailed(e.to_string()))?
            .to_string();

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
