//! Tubely Media Processing Library
//!
//! This crate turns an uploaded video into a stored, fast-start MP4 and resolves
//! stored references into signed URLs.
//!
//! External tools (`ffprobe`, `ffmpeg`) sit behind the [`DimensionProbe`] and
//! [`FastStartRemuxer`] traits so the pipeline can be exercised without them.

pub mod command;
pub mod signing;
pub mod traits;
pub mod upload;
pub mod video;

// Re-export commonly used types
pub use command::{run_tool, ToolError};
pub use signing::{SignedAccessIssuer, SigningError};
pub use traits::{DimensionProbe, FastStartRemuxer, ProbeError, RemuxError};
pub use upload::{
    MediaFile, SavedThumbnail, ThumbnailStore, UploadError, UploadOrchestrator, UploadOrchestratorConfig,
    VideoUploadService,
};
pub use video::{AspectClassifier, FfmpegRemuxer, FfprobeProbe};
