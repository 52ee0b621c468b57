//! Video metadata models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a video metadata record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub Uuid);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for VideoId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A video metadata record as stored in the metadata store.
///
/// The ingestion pipeline only ever overwrites the two locator fields;
/// everything else is created ahead of time by the record's owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Unique record ID
    pub id: VideoId,

    /// Owning user ID
    pub user_id: Uuid,

    /// Video title
    pub title: String,

    /// Video description
    pub description: String,

    /// Public locator of the uploaded thumbnail, if any
    pub thumbnail_url: Option<String>,

    /// Public locator of the uploaded video, if any
    pub video_url: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Geometry of the first stream probed from a staged video file.
///
/// Both dimensions are always positive; a file with zero streams or a
/// stream without dimensions is an error in the prober, never a
/// defaulted descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_roundtrips_through_json() {
        let id = VideoId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: VideoId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn video_serializes_locators_as_nulls_when_unset() {
        let video = Video {
            id: VideoId::new(),
            user_id: Uuid::new_v4(),
            title: "demo".to_string(),
            description: String::new(),
            thumbnail_url: None,
            video_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&video).unwrap();
        assert!(json["thumbnail_url"].is_null());
        assert!(json["video_url"].is_null());
    }
}
