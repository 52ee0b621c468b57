//! Polymorphic media tool capability.
//!
//! Handlers talk to probing/remuxing through this trait so tests can
//! substitute a fake returning canned output instead of invoking real
//! subprocesses.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reel_models::StreamDescriptor;

use crate::error::{MediaError, MediaResult};
use crate::{probe, remux};

/// Default subprocess timeout. A hung ffprobe/ffmpeg would otherwise
/// block the request worker indefinitely.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 300;

/// Probing and remuxing capability.
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Extract the first stream's geometry from a staged file.
    async fn probe(&self, path: &Path) -> MediaResult<StreamDescriptor>;

    /// Rewrite the container for fast start, returning the sibling
    /// output path.
    async fn remux_faststart(&self, path: &Path) -> MediaResult<PathBuf>;
}

/// Production implementation backed by the ffmpeg/ffprobe binaries.
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    timeout: Duration,
}

impl FfmpegTool {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = MediaResult<T>> + Send,
    ) -> MediaResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            // The subprocess future is dropped here; the child was
            // spawned with kill_on_drop so it does not linger.
            Err(_) => Err(MediaError::Timeout(self.timeout.as_secs())),
        }
    }
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    async fn probe(&self, path: &Path) -> MediaResult<StreamDescriptor> {
        self.bounded(probe::probe(path)).await
    }

    async fn remux_faststart(&self, path: &Path) -> MediaResult<PathBuf> {
        self.bounded(remux::remux_faststart(path)).await
    }
}
