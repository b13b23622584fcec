//! Types for the upload pipeline.

use bytes::Bytes;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::pin::Pin;
use tokio::io::AsyncRead;
use tubely_core::MediaType;

/// Boxed byte stream of an incoming upload.
pub type MediaBody = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// An incoming file: its declared media type plus a byte stream.
///
/// Owned by the orchestrator for the duration of one upload.
pub struct MediaFile {
    pub media_type: MediaType,
    pub body: MediaBody,
}

impl MediaFile {
    pub fn new(media_type: MediaType, body: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            media_type,
            body: Box::pin(body),
        }
    }

    /// Wrap bytes that are already in memory.
    pub fn from_bytes(media_type: MediaType, data: impl Into<Bytes>) -> Self {
        Self::new(media_type, Cursor::new(data.into()))
    }

    /// Stream a file from disk.
    pub async fn open(media_type: MediaType, path: &Path) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(media_type, file))
    }
}

impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("media_type", &self.media_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn from_bytes_streams_content() {
        let mut file = MediaFile::from_bytes(MediaType::VideoMp4, &b"abc"[..]);
        let mut out = Vec::new();
        file.body.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"abc");
        assert_eq!(file.media_type, MediaType::VideoMp4);
    }
}
