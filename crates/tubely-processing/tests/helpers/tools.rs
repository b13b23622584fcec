use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tubely_core::Dimensions;
use tubely_processing::traits::fast_start_output_path;
use tubely_processing::{DimensionProbe, FastStartRemuxer, ProbeError, RemuxError, ToolError};

pub const FAST_START_MARKER: &[u8] = b"faststart\n";

/// Reads `WIDTHxHEIGHT` from the first line of the file, skipping the
/// marker line a [`FakeRemuxer`] adds.
pub struct FakeProbe;

#[async_trait]
impl DimensionProbe for FakeProbe {
    async fn probe_dimensions(&self, path: &Path) -> Result<Dimensions, ProbeError> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| ProbeError::InvalidOutput(e.to_string()))?;
        let content = content
            .strip_prefix(FAST_START_MARKER)
            .unwrap_or(&content[..]);
        let content = String::from_utf8_lossy(content);
        let first = content.lines().next().unwrap_or_default();
        let (w, h) = first
            .split_once('x')
            .ok_or_else(|| ProbeError::InvalidOutput(first.to_string()))?;
        match (w.parse(), h.parse()) {
            (Ok(width), Ok(height)) => Ok(Dimensions::new(width, height)),
            _ => Err(ProbeError::MissingDimensions),
        }
    }
}

/// Writes `<input>.processing` as the input prefixed with a marker line.
#[derive(Default)]
pub struct FakeRemuxer {
    outputs: Mutex<Vec<PathBuf>>,
}

impl FakeRemuxer {
    pub fn outputs(&self) -> Vec<PathBuf> {
        self.outputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl FastStartRemuxer for FakeRemuxer {
    async fn remux_fast_start(&self, input: &Path) -> Result<PathBuf, RemuxError> {
        let mut data = FAST_START_MARKER.to_vec();
        data.extend(tokio::fs::read(input).await?);
        let output = fast_start_output_path(input);
        tokio::fs::write(&output, data).await?;
        self.outputs.lock().unwrap().push(output.clone());
        Ok(output)
    }
}

/// Fails like ffmpeg rejecting a corrupt container.
#[derive(Default)]
pub struct FailingRemuxer {
    inputs: Mutex<Vec<PathBuf>>,
}

impl FailingRemuxer {
    pub fn inputs(&self) -> Vec<PathBuf> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl FastStartRemuxer for FailingRemuxer {
    async fn remux_fast_start(&self, input: &Path) -> Result<PathBuf, RemuxError> {
        self.inputs.lock().unwrap().push(input.to_path_buf());
        Err(RemuxError::Tool(ToolError::Failed {
            tool: "ffmpeg",
            status: "exit status: 1".to_string(),
            stderr: "moov atom not found".to_string(),
        }))
    }
}
