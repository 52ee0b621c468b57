//! FFprobe stream geometry extraction.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use reel_models::StreamDescriptor;

use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Probe a staged video file for the geometry of its first stream.
///
/// Runs `ffprobe -v error -print_format json -show_streams <path>` and
/// parses stdout. A non-zero exit is a probe failure; an empty stream
/// list is rejected before any ratio math can divide by zero.
pub async fn probe(path: impl AsRef<Path>) -> MediaResult<StreamDescriptor> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    debug!(path = %path.display(), "Probing staged file");

    let output = Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_streams"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::probe_failed(
            "ffprobe exited with non-zero status",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    parse_probe_output(&output.stdout)
}

/// Parse ffprobe's `-show_streams` JSON into a descriptor for the
/// first listed stream.
pub fn parse_probe_output(stdout: &[u8]) -> MediaResult<StreamDescriptor> {
    let parsed: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| MediaError::ProbeParse(e.to_string()))?;

    let first = parsed.streams.first().ok_or(MediaError::NoStreams)?;

    match (first.width, first.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            Ok(StreamDescriptor { width, height })
        }
        _ => Err(MediaError::ProbeParse(
            "first stream has no usable dimensions".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_stream_dimensions() {
        let json = br#"{
            "streams": [
                {"index": 0, "codec_type": "video", "width": 1920, "height": 1080},
                {"index": 1, "codec_type": "audio"}
            ]
        }"#;
        let desc = parse_probe_output(json).unwrap();
        assert_eq!(
            desc,
            StreamDescriptor {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn empty_stream_list_is_an_error() {
        let json = br#"{"streams": []}"#;
        assert!(matches!(
            parse_probe_output(json),
            Err(MediaError::NoStreams)
        ));
    }

    #[test]
    fn missing_streams_key_is_an_error() {
        let json = br#"{"format": {"duration": "12.0"}}"#;
        assert!(matches!(
            parse_probe_output(json),
            Err(MediaError::NoStreams)
        ));
    }

    #[test]
    fn dimensionless_first_stream_is_a_parse_error() {
        let json = br#"{"streams": [{"index": 0, "codec_type": "audio"}]}"#;
        assert!(matches!(
            parse_probe_output(json),
            Err(MediaError::ProbeParse(_))
        ));
    }

    #[test]
    fn zero_height_is_rejected_before_any_ratio_math() {
        let json = br#"{"streams": [{"width": 1920, "height": 0}]}"#;
        assert!(matches!(
            parse_probe_output(json),
            Err(MediaError::ProbeParse(_))
        ));
    }

    #[test]
    fn garbage_output_is_a_parse_error() {
        assert!(matches!(
            parse_probe_output(b"not json at all"),
            Err(MediaError::ProbeParse(_))
        ));
    }
}
