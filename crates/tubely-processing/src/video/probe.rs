//! Dimension probing with ffprobe and orientation classification.

use crate::command::run_tool;
use crate::traits::{DimensionProbe, ProbeError};
use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::{Dimensions, Orientation};

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output.
///
/// Dimensions are taken from the first stream.
pub fn parse_probe_output(stdout: &[u8]) -> Result<Dimensions, ProbeError> {
    let output: FfprobeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::InvalidOutput(e.to_string()))?;

    let stream = output.streams.first().ok_or(ProbeError::NoVideoStream)?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) => Ok(Dimensions::new(width, height)),
        _ => Err(ProbeError::MissingDimensions),
    }
}

/// [`DimensionProbe`] backed by the ffprobe binary.
#[derive(Clone, Debug)]
pub struct FfprobeProbe {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeProbe {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DimensionProbe for FfprobeProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe_dimensions(&self, path: &Path) -> Result<Dimensions, ProbeError> {
        let args: [&OsStr; 8] = [
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-print_format"),
            OsStr::new("json"),
            OsStr::new("-show_streams"),
            OsStr::new("-select_streams"),
            OsStr::new("v:0"),
            path.as_os_str(),
        ];

        let stdout = run_tool("ffprobe", &self.ffprobe_path, args, self.timeout).await?;
        let dimensions = parse_probe_output(&stdout)?;

        tracing::info!(
            width = dimensions.width,
            height = dimensions.height,
            "Video probe completed"
        );

        Ok(dimensions)
    }
}

/// Classifies a local media file as landscape, portrait or other.
#[derive(Clone)]
pub struct AspectClassifier {
    probe: Arc<dyn DimensionProbe>,
}

impl AspectClassifier {
    pub fn new(probe: Arc<dyn DimensionProbe>) -> Self {
        Self { probe }
    }

    /// Probe `path` and classify its first video stream.
    pub async fn classify(&self, path: &Path) -> Result<Orientation, ProbeError> {
        let dimensions = self.probe.probe_dimensions(path).await?;
        Ok(dimensions.orientation())
    }

    /// Like [`classify`](Self::classify), but any probe failure yields `other`.
    pub async fn classify_or_other(&self, path: &Path) -> Orientation {
        match self.classify(path).await {
            Ok(orientation) => orientation,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    "Could not determine aspect ratio, using 'other'"
                );
                Orientation::Other
            }
        }
    }
}
