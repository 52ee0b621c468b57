//! Typed repository for video metadata records.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use reel_models::{Video, VideoId};

use crate::error::{DbError, DbResult};

/// Repository over the `videos` table.
#[derive(Clone)]
pub struct VideoRepository {
    pool: SqlitePool,
}

impl VideoRepository {
    /// Create a repository over an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the database named by `database_url` and ensure the
    /// schema exists.
    pub async fn connect(database_url: &str) -> DbResult<Self> {
        let pool = SqlitePool::connect(database_url).await?;
        let repo = Self::new(pool);
        repo.migrate().await?;
        Ok(repo)
    }

    /// Create the `videos` table if absent.
    pub async fn migrate(&self) -> DbResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS videos (
                id            TEXT PRIMARY KEY,
                user_id       TEXT NOT NULL,
                title         TEXT NOT NULL,
                description   TEXT NOT NULL,
                thumbnail_url TEXT,
                video_url     TEXT,
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Cheap connectivity check for readiness probes.
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Fetch a record by ID.
    pub async fn get(&self, id: &VideoId) -> DbResult<Option<Video>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, description, thumbnail_url,
                   video_url, created_at, updated_at
            FROM videos WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_video(&r)).transpose()
    }

    /// Insert a new record.
    pub async fn create(&self, video: &Video) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO videos (id, user_id, title, description,
                                thumbnail_url, video_url, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(video.id.to_string())
        .bind(video.user_id.to_string())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.created_at.to_rfc3339())
        .bind(video.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!("Created video record: {}", video.id);
        Ok(())
    }

    /// Overwrite a record with the given state, `updated_at` included,
    /// so the row always matches what the caller hands back to the
    /// client.
    ///
    /// The ingestion pipeline only ever changes the locator fields;
    /// last-writer-wins is acceptable because each request touches its
    /// own record.
    pub async fn update(&self, video: &Video) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE videos
            SET title = ?2, description = ?3, thumbnail_url = ?4,
                video_url = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(video.id.to_string())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(video.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn row_to_video(row: &SqliteRow) -> DbResult<Video> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Video {
        id: VideoId(parse_uuid(&id)?),
        user_id: parse_uuid(&user_id)?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        thumbnail_url: row.try_get("thumbnail_url")?,
        video_url: row.try_get("video_url")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn parse_uuid(s: &str) -> DbResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DbError::corrupt(format!("bad uuid {:?}: {}", s, e)))
}

fn parse_timestamp(s: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::corrupt(format!("bad timestamp {:?}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_repo() -> VideoRepository {
        // A single connection so the in-memory database is shared.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repo = VideoRepository::new(pool);
        repo.migrate().await.unwrap();
        repo
    }

    fn sample_video() -> Video {
        Video {
            id: VideoId::new(),
            user_id: Uuid::new_v4(),
            title: "boots".to_string(),
            description: "a video about boots".to_string(),
            thumbnail_url: None,
            video_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_and_get_roundtrip() {
        let repo = test_repo().await;
        let video = sample_video();
        repo.create(&video).await.unwrap();

        let fetched = repo.get(&video.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, video.id);
        assert_eq!(fetched.user_id, video.user_id);
        assert_eq!(fetched.title, video.title);
        assert_eq!(fetched.thumbnail_url, None);
        assert_eq!(fetched.video_url, None);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let repo = test_repo().await;
        assert!(repo.get(&VideoId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_overwrites_locators() {
        let repo = test_repo().await;
        let mut video = sample_video();
        repo.create(&video).await.unwrap();

        video.video_url = Some("https://cdn.example.com/landscape/abc.mp4".to_string());
        video.thumbnail_url = Some("http://localhost:8000/assets/tok.png".to_string());
        video.updated_at = Utc::now();
        repo.update(&video).await.unwrap();

        let fetched = repo.get(&video.id).await.unwrap().unwrap();
        assert_eq!(fetched.video_url, video.video_url);
        assert_eq!(fetched.thumbnail_url, video.thumbnail_url);
        // The row stores the exact timestamp the caller set, so the
        // value returned to the client matches what was persisted.
        assert_eq!(fetched.updated_at, video.updated_at);
    }
}
