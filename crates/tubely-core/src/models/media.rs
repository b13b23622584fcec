//! Allow-listed media content types.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Content types accepted at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "video/mp4")]
    VideoMp4,
    #[serde(rename = "image/jpeg")]
    ImageJpeg,
    #[serde(rename = "image/png")]
    ImagePng,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::VideoMp4 => "video/mp4",
            MediaType::ImageJpeg => "image/jpeg",
            MediaType::ImagePng => "image/png",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            MediaType::VideoMp4 => ".mp4",
            MediaType::ImageJpeg => ".jpg",
            MediaType::ImagePng => ".png",
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaType::VideoMp4)
    }

    pub fn is_image(&self) -> bool {
        matches!(self, MediaType::ImageJpeg | MediaType::ImagePng)
    }
}

impl FromStr for MediaType {
    type Err = String;

    /// Parses a Content-Type header value, ignoring parameters such as `charset`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default().trim().to_lowercase();
        match essence.as_str() {
            "video/mp4" => Ok(MediaType::VideoMp4),
            "image/jpeg" => Ok(MediaType::ImageJpeg),
            "image/png" => Ok(MediaType::ImagePng),
            _ => Err(format!("Unsupported media type: {}", s)),
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
