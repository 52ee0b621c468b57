//! Shared data models for the reelhost backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video metadata records and their identifiers
//! - Probed stream geometry
//! - Aspect-ratio classification for storage partitioning

pub mod aspect;
pub mod video;

pub use aspect::AspectClass;
pub use video::{StreamDescriptor, Video, VideoId};
