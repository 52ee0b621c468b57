//! Durable storage for ingested media.
//!
//! This crate provides:
//! - An S3-compatible object store client behind the [`ObjectStore`]
//!   trait (so tests can substitute a fake)
//! - Collision-resistant, classification-prefixed key derivation
//! - A flat local asset directory for thumbnails

pub mod assets;
pub mod client;
pub mod error;
pub mod key;

pub use assets::LocalAssets;
pub use client::{ObjectStore, S3Client, S3Config};
pub use error::{StorageError, StorageResult};
pub use key::{thumbnail_filename, video_key};
