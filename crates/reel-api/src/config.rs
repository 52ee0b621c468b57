//! API configuration.

use std::path::PathBuf;

/// API server configuration.
///
/// Every component receives its configuration at construction; nothing
/// reads ambient globals after startup.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Metadata store connection string
    pub database_url: String,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// Directory for request-scoped scratch files
    pub scratch_dir: PathBuf,
    /// Root directory for locally persisted thumbnails
    pub assets_root: PathBuf,
    /// Base URL thumbnails are served under
    pub assets_base_url: String,
    /// Base URL (distribution host) uploaded videos are served under
    pub media_base_url: String,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            database_url: "sqlite://reelhost.db".to_string(),
            jwt_secret: "dev-secret-change-me".to_string(),
            scratch_dir: std::env::temp_dir().join("reelhost"),
            assets_root: PathBuf::from("assets"),
            assets_base_url: "http://localhost:8000/assets".to_string(),
            media_base_url: "http://localhost:9000/reelhost".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            jwt_secret: std::env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            scratch_dir: std::env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_dir),
            assets_root: std::env::var("ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_root),
            assets_base_url: std::env::var("ASSETS_BASE_URL").unwrap_or(defaults.assets_base_url),
            media_base_url: std::env::var("MEDIA_BASE_URL").unwrap_or(defaults.media_base_url),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
