//! Fast-start remux with ffmpeg stream copy.

use crate::command::run_tool;
use crate::traits::{fast_start_output_path, FastStartRemuxer, RemuxError};
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// [`FastStartRemuxer`] backed by the ffmpeg binary.
///
/// Streams are copied, never re-encoded; only the container layout changes.
#[derive(Clone, Debug)]
pub struct FfmpegRemuxer {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl FastStartRemuxer for FfmpegRemuxer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn remux_fast_start(&self, input: &Path) -> Result<PathBuf, RemuxError> {
        let start = Instant::now();
        let output = fast_start_output_path(input);

        let args: [&OsStr; 12] = [
            OsStr::new("-y"),
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-i"),
            input.as_os_str(),
            OsStr::new("-c"),
            OsStr::new("copy"),
            OsStr::new("-movflags"),
            OsStr::new("faststart"),
            OsStr::new("-f"),
            OsStr::new("mp4"),
            output.as_os_str(),
        ];

        if let Err(e) = run_tool("ffmpeg", &self.ffmpeg_path, args, self.timeout).await {
            remove_partial(&output).await;
            return Err(e.into());
        }

        if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
            return Err(RemuxError::MissingOutput(output));
        }

        tracing::info!(
            output = %output.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Fast-start remux completed"
        );

        Ok(output)
    }
}

async fn remove_partial(output: &Path) {
    match tokio::fs::remove_file(output).await {
        Ok(()) => tracing::debug!(path = %output.display(), "Removed partial remux output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            error = %e,
            path = %output.display(),
            "Failed to remove partial remux output"
        ),
    }
}
