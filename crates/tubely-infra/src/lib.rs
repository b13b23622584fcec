//! Tubely infrastructure
//!
//! Process-level concerns shared by the binaries.

pub mod telemetry;

pub use telemetry::{init_telemetry, LogFormat};
