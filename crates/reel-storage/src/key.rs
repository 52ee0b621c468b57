//! Storage key derivation.
//!
//! Keys carry 256 bits of randomness each; uniqueness is the only
//! collision defense, so a short read from the entropy source is a
//! hard failure rather than a shorter key.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;
use std::path::Path;

use reel_models::AspectClass;

use crate::error::{StorageError, StorageResult};

/// Bytes of entropy per derived key.
const KEY_ENTROPY_BYTES: usize = 32;

fn random_bytes() -> StorageResult<[u8; KEY_ENTROPY_BYTES]> {
    let mut buf = [0u8; KEY_ENTROPY_BYTES];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| StorageError::Randomness(e.to_string()))?;
    Ok(buf)
}

/// Derive the object-store key for a video upload.
///
/// `{class prefix}{hex(32 random bytes)}{original extension}`, the
/// extension taken verbatim (dot included) from the uploaded filename.
pub fn video_key(class: AspectClass, original_filename: &str) -> StorageResult<String> {
    let token = hex::encode(random_bytes()?);
    let ext = file_extension(original_filename);
    Ok(format!("{}{}{}", class.key_prefix(), token, ext))
}

/// Derive the local asset filename for a thumbnail upload.
///
/// `{url-safe base64(32 random bytes)}{ext}` with the extension mapped
/// from the validated media type. The validator guarantees the type is
/// in the allow-list before this runs.
pub fn thumbnail_filename(media_type: &str) -> StorageResult<String> {
    let ext = match media_type {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        other => {
            return Err(StorageError::InvalidFilename(format!(
                "no extension mapping for {}",
                other
            )))
        }
    };
    let token = URL_SAFE_NO_PAD.encode(random_bytes()?);
    Ok(format!("{}{}", token, ext))
}

/// Extension of the original filename, dot included; empty if none.
fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn video_keys_carry_prefix_token_and_extension() {
        let key = video_key(AspectClass::Landscape, "holiday.mp4").unwrap();
        assert!(key.starts_with("landscape/"));
        assert!(key.ends_with(".mp4"));
        // prefix + 64 hex chars + ".mp4"
        let token = &key["landscape/".len()..key.len() - ".mp4".len()];
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn video_key_without_extension_has_no_trailing_dot() {
        let key = video_key(AspectClass::Other, "rawupload").unwrap();
        assert!(key.starts_with("other/"));
        assert!(!key.ends_with('.'));
        assert_eq!(key.len(), "other/".len() + 64);
    }

    #[test]
    fn consecutive_derivations_are_pairwise_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let key = video_key(AspectClass::Portrait, "clip.mp4").unwrap();
            assert!(seen.insert(key), "derived a duplicate key");
        }
        for _ in 0..100 {
            let name = thumbnail_filename("image/png").unwrap();
            assert!(seen.insert(name), "derived a duplicate filename");
        }
    }

    #[test]
    fn thumbnail_filenames_map_extensions() {
        let png = thumbnail_filename("image/png").unwrap();
        assert!(png.ends_with(".png"));
        let jpg = thumbnail_filename("image/jpeg").unwrap();
        assert!(jpg.ends_with(".jpg"));
        // 32 bytes -> 43 url-safe base64 chars, unpadded
        assert_eq!(png.len(), 43 + ".png".len());
    }

    #[test]
    fn thumbnail_filename_rejects_unmapped_types() {
        assert!(matches!(
            thumbnail_filename("image/gif"),
            Err(StorageError::InvalidFilename(_))
        ));
    }

    #[test]
    fn extension_is_taken_verbatim_from_filename() {
        assert_eq!(file_extension("movie.mp4"), ".mp4");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("noext"), "");
    }
}
