//! Upload ingestion handlers.
//!
//! Both pipelines are strictly linear and request-scoped: every stage
//! is awaited in sequence and no state is shared across requests.
//! Scratch files are removed on every exit path; the remuxed artifact
//! is removed only after the upload attempt completes.

use std::path::Path as FsPath;

use axum::body::Bytes;
use axum::extract::multipart::{Field, Multipart};
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use reel_media::stage::StagedFile;
use reel_models::{AspectClass, Video, VideoId};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validate::{validate_media_type, THUMBNAIL_TYPES, VIDEO_TYPES};

/// Multipart field carrying the thumbnail file.
const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying the video file.
const VIDEO_FIELD: &str = "video";

/// Ingest a thumbnail: validate -> name -> persist-to-local-disk ->
/// persist-reference.
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<Video>> {
    let mut video = load_owned_video(&state, VideoId(video_id), &user).await?;

    let (media_type, bytes) =
        read_named_field(&mut multipart, THUMBNAIL_FIELD, THUMBNAIL_TYPES).await?;

    let filename = reel_storage::thumbnail_filename(&media_type)?;
    state.assets.save(&filename, &bytes).await?;

    video.thumbnail_url = Some(state.assets.public_url(&filename));
    video.updated_at = Utc::now();
    state.db.update(&video).await?;

    info!(video_id = %video.id, filename = %filename, "Thumbnail ingested");

    Ok(Json(video))
}

/// Ingest a video: validate -> buffer-to-disk -> inspect -> transform
/// -> key-derive -> upload -> persist-reference.
pub async fn upload_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
    user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<Video>> {
    // Record existence and ownership are checked before any disk or
    // network I/O happens for the upload itself.
    let mut video = load_owned_video(&state, VideoId(video_id), &user).await?;

    let (media_type, original_filename, staged) = stage_named_field(
        &mut multipart,
        VIDEO_FIELD,
        VIDEO_TYPES,
        &state.config.scratch_dir,
    )
    .await?;

    let descriptor = state.media.probe(staged.path()).await?;
    let class = AspectClass::from(descriptor);

    let remuxed = state.media.remux_faststart(staged.path()).await?;
    // Ordered cleanup: the remuxed artifact is deleted when this guard
    // drops, which is after the upload attempt completes (success or
    // error) and before the staged file is released.
    let remuxed = scopeguard::guard(remuxed, |path| {
        if let Err(e) = std::fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "Failed to remove remuxed file");
        }
    });

    let key = reel_storage::video_key(class, &original_filename)?;
    state.store.put_file(&remuxed, &key, &media_type).await?;

    video.video_url = Some(format!(
        "{}/{}",
        state.config.media_base_url.trim_end_matches('/'),
        key
    ));
    video.updated_at = Utc::now();
    state.db.update(&video).await?;

    info!(video_id = %video.id, key = %key, class = %class, "Video ingested");

    Ok(Json(video))
}

/// Fetch the target record and check ownership.
///
/// An ownership mismatch reports 404, same as a missing record, so the
/// response never leaks whether somebody else's record exists.
async fn load_owned_video(
    state: &AppState,
    id: VideoId,
    user: &AuthUser,
) -> ApiResult<Video> {
    let video = state
        .db
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    if video.user_id != user.user_id {
        return Err(ApiError::not_found("Video not found"));
    }

    Ok(video)
}

/// Scan the form for the named file field and buffer it in memory.
///
/// The field may appear at any position; other form fields are skipped
/// so clients can send extra metadata parts. Returns the validated
/// media type and the file bytes.
async fn read_named_field(
    multipart: &mut Multipart,
    name: &str,
    allowed: &[&str],
) -> ApiResult<(String, Bytes)> {
    loop {
        let Some(field) = next_field(multipart).await? else {
            return Err(missing_field(name));
        };
        if field.name() != Some(name) {
            continue;
        }

        let media_type = validate_field_type(&field, allowed)?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Unable to read form file: {}", e)))?;

        return Ok((media_type, bytes));
    }
}

/// Scan the form for the named file field and stream it to a scratch
/// file.
///
/// Same positioning rules as [`read_named_field`], but the body never
/// sits in memory: ffprobe/ffmpeg need a real path with random access.
/// Returns the validated media type, the client's original filename,
/// and the staged copy.
async fn stage_named_field(
    multipart: &mut Multipart,
    name: &str,
    allowed: &[&str],
    scratch_dir: &FsPath,
) -> ApiResult<(String, String, StagedFile)> {
    loop {
        let Some(mut field) = next_field(multipart).await? else {
            return Err(missing_field(name));
        };
        if field.name() != Some(name) {
            continue;
        }

        // Validated before any disk I/O; an unsupported type never
        // touches the scratch directory.
        let media_type = validate_field_type(&field, allowed)?;
        let original_filename = field.file_name().unwrap_or_default().to_string();

        let mut staged = StagedFile::create(scratch_dir, ".mp4").await?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::bad_request(format!("Unable to read form file: {}", e)))?
        {
            staged.write_chunk(&chunk).await?;
        }
        staged.finish().await?;

        return Ok((media_type, original_filename, staged));
    }
}

async fn next_field<'a>(multipart: &'a mut Multipart) -> ApiResult<Option<Field<'a>>> {
    multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Unable to parse form: {}", e)))
}

fn missing_field(name: &str) -> ApiError {
    ApiError::bad_request(format!("Missing `{}` form field", name))
}

/// Validate a field's declared content type against an allow-list.
fn validate_field_type(field: &Field<'_>, allowed: &[&str]) -> ApiResult<String> {
    let raw = field
        .content_type()
        .ok_or_else(|| ApiError::bad_request("Missing content type on form file"))?;
    validate_media_type(raw, allowed)
}
