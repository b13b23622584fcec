//! Tubely metadata store abstraction
//!
//! The relational store that owns video records lives outside this workspace.
//! This crate defines the narrow interface the upload pipeline needs from it,
//! plus an in-memory implementation used by tests and the CLI.

pub mod memory;
pub mod repository;

pub use memory::InMemoryVideoRepository;
pub use repository::{DbError, DbResult, VideoRepository};
