//! FFmpeg/FFprobe subprocess orchestration for upload ingestion.
//!
//! This crate provides:
//! - Request-scoped staging of uploaded byte streams to scratch files
//! - Stream geometry probing via ffprobe
//! - Fast-start container remuxing via ffmpeg (codec copy only)
//! - The [`MediaTool`] trait so tests can fake subprocess invocation

pub mod error;
pub mod probe;
pub mod remux;
pub mod stage;
pub mod tool;

pub use error::{MediaError, MediaResult};
pub use probe::{parse_probe_output, probe};
pub use remux::{faststart_output_path, remux_faststart};
pub use stage::StagedFile;
pub use tool::{FfmpegTool, MediaTool, DEFAULT_TOOL_TIMEOUT_SECS};
