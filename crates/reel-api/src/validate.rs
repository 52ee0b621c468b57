//! Declared content-type validation.
//!
//! Advisory trust in the client-declared type: no byte sniffing. Runs
//! before any disk I/O so unsupported uploads fail fast.

use mime::Mime;

use crate::error::{ApiError, ApiResult};

/// Allow-list for thumbnail uploads.
pub const THUMBNAIL_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// Allow-list for video uploads.
pub const VIDEO_TYPES: &[&str] = &["video/mp4"];

/// Parse a declared content type and check it against an allow-list.
///
/// Parameters (charset etc.) are ignored; matching is on the base type
/// only, case-insensitively. Returns the normalized base type.
pub fn validate_media_type(raw: &str, allowed: &[&str]) -> ApiResult<String> {
    let parsed: Mime = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Malformed content type: {:?}", raw)))?;

    let essence = parsed.essence_str().to_ascii_lowercase();

    if allowed.contains(&essence.as_str()) {
        Ok(essence)
    } else {
        Err(ApiError::bad_request(format!(
            "Unsupported media type: {}",
            essence
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn accepts_exactly_the_allow_list() {
        assert_eq!(
            validate_media_type("image/png", THUMBNAIL_TYPES).unwrap(),
            "image/png"
        );
        assert_eq!(
            validate_media_type("image/jpeg", THUMBNAIL_TYPES).unwrap(),
            "image/jpeg"
        );
        assert_eq!(
            validate_media_type("video/mp4", VIDEO_TYPES).unwrap(),
            "video/mp4"
        );
    }

    #[test]
    fn matching_is_case_insensitive_on_the_base_type() {
        assert_eq!(
            validate_media_type("IMAGE/PNG", THUMBNAIL_TYPES).unwrap(),
            "image/png"
        );
        assert_eq!(
            validate_media_type("Video/MP4", VIDEO_TYPES).unwrap(),
            "video/mp4"
        );
    }

    #[test]
    fn parameters_are_ignored() {
        assert_eq!(
            validate_media_type("video/mp4; charset=binary", VIDEO_TYPES).unwrap(),
            "video/mp4"
        );
    }

    #[test]
    fn rejects_everything_else() {
        for raw in ["text/plain", "image/gif", "video/webm", "application/json"] {
            let err = validate_media_type(raw, THUMBNAIL_TYPES).unwrap_err();
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn rejects_malformed_headers() {
        for raw in ["", "not a type", "video/", "/mp4"] {
            let err = validate_media_type(raw, VIDEO_TYPES).unwrap_err();
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn video_types_do_not_leak_into_thumbnails() {
        assert!(validate_media_type("video/mp4", THUMBNAIL_TYPES).is_err());
        assert!(validate_media_type("image/png", VIDEO_TYPES).is_err());
    }
}
