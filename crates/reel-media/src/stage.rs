//! Ephemeral upload staging.
//!
//! Downstream tools (ffprobe/ffmpeg) need a real file path with random
//! access, so the incoming byte stream is copied to a scratch file
//! before inspection. The scratch file is request-scoped: it is
//! removed on every exit path of the enclosing handler.

use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt, SeekFrom};
use tracing::warn;

use crate::error::{MediaError, MediaResult};

/// A request-scoped scratch copy of an uploaded byte stream.
///
/// Acquired by [`StagedFile::create`], released when dropped. Removal
/// failures are logged, never propagated over a real pipeline error.
#[derive(Debug)]
pub struct StagedFile {
    file: File,
    path: PathBuf,
}

impl StagedFile {
    /// Create a uniquely named scratch file under `scratch_dir`.
    pub async fn create(scratch_dir: &Path, suffix: &str) -> MediaResult<Self> {
        // NamedTempFile would tie deletion to its own handle; keeping
        // the path lets the ffmpeg subprocess reopen the file while the
        // handler still owns cleanup.
        let temp = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(suffix)
            .tempfile_in(scratch_dir)?;
        let (_, path) = temp.keep().map_err(|e| MediaError::Io(e.error))?;

        let file = File::options()
            .read(true)
            .write(true)
            .open(&path)
            .await?;

        Ok(Self { file, path })
    }

    /// Append a chunk of the incoming stream.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> MediaResult<()> {
        self.file.write_all(chunk).await?;
        Ok(())
    }

    /// Flush buffered bytes and rewind the handle to the start, so the
    /// caller gets a readable handle positioned at byte zero.
    pub async fn finish(&mut self) -> MediaResult<()> {
        self.file.flush().await?;
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }

    /// Path of the scratch file, for subprocess invocation.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open handle, positioned at the start after [`finish`].
    ///
    /// [`finish`]: StagedFile::finish
    pub fn file(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove staged file"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn stages_a_stream_and_rewinds() {
        let dir = TempDir::new().unwrap();
        let mut staged = StagedFile::create(dir.path(), ".mp4").await.unwrap();

        staged.write_chunk(b"hello ").await.unwrap();
        staged.write_chunk(b"world").await.unwrap();
        staged.finish().await.unwrap();

        // The returned handle reads from the start without reopening.
        let mut contents = String::new();
        staged.file().read_to_string(&mut contents).await.unwrap();
        assert_eq!(contents, "hello world");

        assert!(staged.path().exists());
        assert!(staged.path().extension().is_some());
    }

    #[tokio::test]
    async fn removes_scratch_file_on_release() {
        let dir = TempDir::new().unwrap();
        let path = {
            let mut staged = StagedFile::create(dir.path(), ".mp4").await.unwrap();
            staged.write_chunk(b"bytes").await.unwrap();
            staged.finish().await.unwrap();
            staged.path().to_path_buf()
        };
        assert!(!path.exists(), "staged file must not outlive its scope");
    }

    #[tokio::test]
    async fn two_staged_files_never_collide() {
        let dir = TempDir::new().unwrap();
        let a = StagedFile::create(dir.path(), ".mp4").await.unwrap();
        let b = StagedFile::create(dir.path(), ".mp4").await.unwrap();
        assert_ne!(a.path(), b.path());
    }
}
