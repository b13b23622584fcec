//! Test helpers: in-memory storage and stand-ins for the media tools.
//!
//! Run from workspace root: `cargo test -p tubely-processing`.

#![allow(dead_code)]

pub mod storage;
pub mod tools;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tubely_processing::{UploadOrchestrator, UploadOrchestratorConfig};

pub use storage::MockStorage;
pub use tools::{FailingRemuxer, FakeProbe, FakeRemuxer, FAST_START_MARKER};

pub const TEST_BUCKET: &str = "tubely-test";

/// Body the fake probe reads as `width x height`.
pub fn video_body(width: u32, height: u32) -> Vec<u8> {
    format!("{}x{}\nframes...", width, height).into_bytes()
}

pub fn orchestrator_config(temp_parent: &Path) -> UploadOrchestratorConfig {
    UploadOrchestratorConfig {
        temp_dir: Some(temp_parent.to_path_buf()),
        max_size_bytes: 1024 * 1024,
        upload_timeout: Duration::from_secs(5),
    }
}

pub fn orchestrator(
    storage: Arc<MockStorage>,
    remuxer: Arc<dyn tubely_processing::FastStartRemuxer>,
    temp_parent: &Path,
) -> UploadOrchestrator {
    UploadOrchestrator::new(
        storage,
        Arc::new(FakeProbe),
        remuxer,
        orchestrator_config(temp_parent),
    )
}

/// Number of entries left in a scratch parent directory.
pub fn leftover_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
