//! References to stored objects and the expiring URLs derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::REFERENCE_SEPARATOR;

/// Durable name of an uploaded object: `(bucket, key)`.
///
/// Serialized as `"<bucket>,<key>"` when written to a video record. Bucket names
/// cannot contain a comma, so everything after the first separator is the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredObjectReference {
    pub bucket: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceParseError {
    #[error("object reference '{0}' is not in bucket,key form")]
    MissingSeparator(String),

    #[error("object reference '{0}' has an empty bucket")]
    EmptyBucket(String),

    #[error("object reference '{0}' has an empty key")]
    EmptyKey(String),
}

impl StoredObjectReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Serialized form stored in `VideoRecord::video_url`.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.bucket, REFERENCE_SEPARATOR, self.key)
    }
}

impl FromStr for StoredObjectReference {
    type Err = ReferenceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bucket, key) = s
            .split_once(REFERENCE_SEPARATOR)
            .ok_or_else(|| ReferenceParseError::MissingSeparator(s.to_string()))?;

        if bucket.is_empty() {
            return Err(ReferenceParseError::EmptyBucket(s.to_string()));
        }
        if key.is_empty() {
            return Err(ReferenceParseError::EmptyKey(s.to_string()));
        }

        Ok(Self::new(bucket, key))
    }
}

impl Display for StoredObjectReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.encode())
    }
}

/// Time-limited URL granting read access to a stored object. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAccessUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl SignedAccessUrl {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl Display for SignedAccessUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn round_trips_well_formed_references() {
        for s in [
            "tubely-videos,landscape/abc_-123.mp4",
            "b,k",
            "bucket,portrait/nested/key.mp4",
            "bucket,key,with,commas",
        ] {
            let parsed: StoredObjectReference = s.parse().unwrap();
            assert_eq!(parsed.encode(), s);
            assert_eq!(parsed.to_string(), s);
        }
    }

    #[test]
    fn splits_on_first_separator() {
        let parsed: StoredObjectReference = "videos,other/x.mp4".parse().unwrap();
        assert_eq!(parsed.bucket, "videos");
        assert_eq!(parsed.key, "other/x.mp4");
    }

    #[test]
    fn rejects_malformed_references() {
        assert_eq!(
            "https://example.com/video.mp4".parse::<StoredObjectReference>(),
            Err(ReferenceParseError::MissingSeparator(
                "https://example.com/video.mp4".to_string()
            ))
        );
        assert!("".parse::<StoredObjectReference>().is_err());
        assert!(matches!(
            ",key".parse::<StoredObjectReference>(),
            Err(ReferenceParseError::EmptyBucket(_))
        ));
        assert!(matches!(
            "bucket,".parse::<StoredObjectReference>(),
            Err(ReferenceParseError::EmptyKey(_))
        ));
    }

    #[test]
    fn signed_url_expiry_window() {
        let now = Utc::now();
        let signed = SignedAccessUrl {
            url: "https://example.com/x".to_string(),
            expires_at: now + Duration::minutes(15),
        };
        assert!(!signed.is_expired_at(now));
        assert!(!signed.is_expired_at(now + Duration::minutes(15) - Duration::seconds(1)));
        assert!(signed.is_expired_at(now + Duration::minutes(15)));
    }
}
