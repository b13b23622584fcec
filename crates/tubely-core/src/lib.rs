//! Tubely Core Library
//!
//! This crate provides the domain models, error types, configuration, and validation
//! shared by every Tubely component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    Dimensions, MediaType, Orientation, ReferenceParseError, SignedAccessUrl,
    StoredObjectReference, VideoRecord, VideoResponse,
};
pub use storage_types::StorageBackend;
