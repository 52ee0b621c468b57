//! Fast-start container remux.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Suffix appended to the input path to form the remux output path.
const FASTSTART_SUFFIX: &str = ".faststart";

/// Deterministic sibling path the remuxed container is written to.
pub fn faststart_output_path(input: &Path) -> PathBuf {
    let mut os = OsString::from(input.as_os_str());
    os.push(FASTSTART_SUFFIX);
    PathBuf::from(os)
}

/// Rewrite the container so metadata precedes sample data.
///
/// Codec copy only, so the operation is lossless and fast; it exists to
/// make the object playable before the full byte range is downloaded.
/// Returns the sibling output path.
pub async fn remux_faststart(input: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let input = input.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

    let output_path = faststart_output_path(input);

    debug!(
        input = %input.display(),
        output = %output_path.display(),
        "Remuxing for fast start"
    );

    let output = Command::new("ffmpeg")
        .arg("-y")
        .args(["-v", "error"])
        .arg("-i")
        .arg(input)
        .args(["-c", "copy", "-movflags", "faststart", "-f", "mp4"])
        .arg(&output_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::remux_failed(
            "ffmpeg exited with non-zero status",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
            output.status.code(),
        ));
    }

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_is_input_plus_fixed_suffix() {
        let out = faststart_output_path(Path::new("/tmp/upload-abc123.mp4"));
        assert_eq!(out, PathBuf::from("/tmp/upload-abc123.mp4.faststart"));
    }

    #[test]
    fn output_path_preserves_parent_directory() {
        let out = faststart_output_path(Path::new("/var/scratch/x"));
        assert_eq!(out.parent(), Some(Path::new("/var/scratch")));
    }
}
