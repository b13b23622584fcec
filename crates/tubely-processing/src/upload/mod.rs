//! Upload pipeline: temp file, classify, remux, store.

pub mod orchestrator;
pub mod service;
pub mod thumbnail;
pub mod types;

pub use orchestrator::{UploadError, UploadOrchestrator, UploadOrchestratorConfig};
pub use service::VideoUploadService;
pub use thumbnail::{SavedThumbnail, ThumbnailStore};
pub use types::MediaFile;
