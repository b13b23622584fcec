//! Tubely Storage Library
//!
//! This crate provides the object store abstraction and its implementations:
//! S3 (through `object_store`) and a local filesystem backend for development.
//!
//! # Object key format
//!
//! Video keys are namespaced by orientation: `{orientation}/{id}.mp4`, where
//! `id` is 32 random bytes encoded as unpadded base64url. Key generation lives in
//! the `keys` module; backends never generate keys themselves.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{generate_object_key, random_object_id};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Settings, S3Storage};
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
