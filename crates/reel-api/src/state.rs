//! Application state.

use std::sync::Arc;

use reel_db::VideoRepository;
use reel_media::{FfmpegTool, MediaTool};
use reel_storage::{LocalAssets, ObjectStore, S3Client};

use crate::config::ApiConfig;

/// Shared application state.
///
/// The media tool and object store sit behind trait objects so tests
/// can substitute fakes without touching subprocesses or the network.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub db: VideoRepository,
    pub store: Arc<dyn ObjectStore>,
    pub media: Arc<dyn MediaTool>,
    pub assets: LocalAssets,
}

impl AppState {
    /// Create new application state from configuration.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let db = VideoRepository::connect(&config.database_url).await?;
        let store = Arc::new(S3Client::from_env()?);
        let assets = LocalAssets::new(&config.assets_root, &config.assets_base_url).await?;

        tokio::fs::create_dir_all(&config.scratch_dir).await?;

        Ok(Self {
            config,
            db,
            store,
            media: Arc::new(FfmpegTool::new()),
            assets,
        })
    }
}
