//! Configuration module
//!
//! Configuration is read once from the environment at process start and then
//! passed explicitly to the components that need it.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::storage_types::StorageBackend;

// Common constants
const PROBE_TIMEOUT_SECS: u64 = 30;
const REMUX_TIMEOUT_SECS: u64 = 300;
const STORAGE_TIMEOUT_SECS: u64 = 120;
const STORAGE_MAX_RETRIES: usize = 3;
const SIGNED_URL_EXPIRY_SECS: u64 = 15 * 60;
const MAX_VIDEO_SIZE_MB: usize = 10 * 1024;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub local_signing_secret: Option<String>,
    pub storage_timeout: Duration,
    pub storage_max_retries: usize,
    pub signed_url_expiry: Duration,
    // Media tools
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub probe_timeout: Duration,
    pub remux_timeout: Duration,
    pub upload_temp_dir: Option<PathBuf>,
    // Upload limits
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
    // Thumbnail assets
    pub assets_root: PathBuf,
    pub assets_base_url: String,
}

fn env_parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Megabytes to bytes, clamped at `usize::MAX`.
fn megabytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let storage_backend = match env_non_empty("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let config = Config {
            environment,
            storage_backend,
            s3_bucket: env_non_empty("S3_BUCKET"),
            s3_region: env_non_empty("S3_REGION").or_else(|| env_non_empty("AWS_REGION")),
            s3_endpoint: env_non_empty("S3_ENDPOINT"),
            aws_access_key_id: env_non_empty("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: env_non_empty("AWS_SECRET_ACCESS_KEY"),
            local_storage_path: env_non_empty("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_non_empty("LOCAL_STORAGE_BASE_URL"),
            local_signing_secret: env_non_empty("LOCAL_SIGNING_SECRET"),
            storage_timeout: Duration::from_secs(env_parse_or(
                "STORAGE_TIMEOUT_SECS",
                STORAGE_TIMEOUT_SECS,
            )),
            storage_max_retries: env_parse_or("STORAGE_MAX_RETRIES", STORAGE_MAX_RETRIES),
            signed_url_expiry: Duration::from_secs(env_parse_or(
                "SIGNED_URL_EXPIRY_SECS",
                SIGNED_URL_EXPIRY_SECS,
            )),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            probe_timeout: Duration::from_secs(env_parse_or(
                "PROBE_TIMEOUT_SECS",
                PROBE_TIMEOUT_SECS,
            )),
            remux_timeout: Duration::from_secs(env_parse_or(
                "REMUX_TIMEOUT_SECS",
                REMUX_TIMEOUT_SECS,
            )),
            upload_temp_dir: env_non_empty("UPLOAD_TEMP_DIR").map(PathBuf::from),
            max_video_size_bytes: megabytes(env_parse_or("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB)),
            max_thumbnail_size_bytes: megabytes(env_parse_or(
                "MAX_THUMBNAIL_SIZE_MB",
                MAX_THUMBNAIL_SIZE_MB,
            )),
            assets_root: PathBuf::from(
                env::var("ASSETS_ROOT").unwrap_or_else(|_| "./assets".to_string()),
            ),
            assets_base_url: env::var("ASSETS_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8091/assets".to_string()),
        };

        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!("S3_BUCKET must be set for the s3 backend"));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set for the s3 backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for the local backend"
                    ));
                }
                match self.local_signing_secret.as_deref() {
                    None => {
                        return Err(anyhow::anyhow!(
                            "LOCAL_SIGNING_SECRET must be set for the local backend"
                        ))
                    }
                    Some(secret) if self.is_production() && secret.len() < 32 => {
                        return Err(anyhow::anyhow!(
                            "LOCAL_SIGNING_SECRET must be at least 32 bytes in production"
                        ))
                    }
                    Some(_) => {}
                }
            }
        }

        if self.signed_url_expiry.is_zero() {
            return Err(anyhow::anyhow!("SIGNED_URL_EXPIRY_SECS must be greater than 0"));
        }
        // S3 presigned URLs are capped at seven days.
        if self.signed_url_expiry > Duration::from_secs(7 * 24 * 60 * 60) {
            return Err(anyhow::anyhow!("SIGNED_URL_EXPIRY_SECS cannot exceed 604800"));
        }
        if self.probe_timeout.is_zero()
            || self.remux_timeout.is_zero()
            || self.storage_timeout.is_zero()
        {
            return Err(anyhow::anyhow!("Timeouts must be greater than 0"));
        }

        Ok(())
    }

    /// Bucket that new uploads are written to.
    pub fn upload_bucket(&self) -> &str {
        match self.storage_backend {
            StorageBackend::S3 => self.s3_bucket.as_deref().unwrap_or_default(),
            StorageBackend::Local => self.s3_bucket.as_deref().unwrap_or("local"),
        }
    }
}
