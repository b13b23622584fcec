//! Seams for the external media tools.

use crate::command::ToolError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tubely_core::{AppError, Dimensions};

/// Failure to read the dimensions of a media file.
///
/// The upload pipeline treats these as non-fatal and falls back to `other`.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Failed to parse probe output: {0}")]
    InvalidOutput(String),

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Video stream has no usable dimensions")]
    MissingDimensions,
}

/// Failure to produce the fast-start copy of a media file.
#[derive(Debug, Error)]
pub enum RemuxError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("Remux produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("IO error during remux: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProbeError> for AppError {
    fn from(err: ProbeError) -> Self {
        AppError::Probe(err.to_string())
    }
}

impl From<RemuxError> for AppError {
    fn from(err: RemuxError) -> Self {
        AppError::Remux(err.to_string())
    }
}

/// Reads the pixel dimensions of the first video stream of a local file.
#[async_trait]
pub trait DimensionProbe: Send + Sync {
    async fn probe_dimensions(&self, path: &Path) -> Result<Dimensions, ProbeError>;
}

/// Rewrites a local MP4 so its index precedes the media data.
///
/// Implementations write a sibling file at `<input>.processing` and return its
/// path. The input is left untouched; the caller owns the output's lifetime.
#[async_trait]
pub trait FastStartRemuxer: Send + Sync {
    async fn remux_fast_start(&self, input: &Path) -> Result<PathBuf, RemuxError>;
}

/// Path of the fast-start output for `input`.
pub fn fast_start_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(tubely_core::constants::FAST_START_SUFFIX);
    PathBuf::from(name)
}
