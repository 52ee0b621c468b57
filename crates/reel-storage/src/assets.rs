//! Local asset directory persister for thumbnails.

use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Flat local directory of public assets, served under a base URL.
#[derive(Debug, Clone)]
pub struct LocalAssets {
    root: PathBuf,
    base_url: String,
}

impl LocalAssets {
    /// Create the persister, creating the root directory if absent.
    pub async fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::config_error(format!(
                "Failed to create asset directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self {
            root,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Write an asset's bytes under the derived filename.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> StorageResult<()> {
        validate_filename(filename)?;

        let path = self.root.join(filename);
        fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::local_write(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), size = bytes.len(), "Saved asset");
        Ok(())
    }

    /// Public locator for a saved asset.
    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url, filename)
    }

    /// Asset root directory.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

/// Filenames are flat random tokens; anything that could traverse out
/// of the asset root is rejected.
fn validate_filename(filename: &str) -> StorageResult<()> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(StorageError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn saves_and_locates_an_asset() {
        let dir = TempDir::new().unwrap();
        let assets = LocalAssets::new(dir.path().join("assets"), "http://localhost:8000/assets/")
            .await
            .unwrap();

        assets.save("token.png", b"png bytes").await.unwrap();

        let saved = tokio::fs::read(assets.root().join("token.png")).await.unwrap();
        assert_eq!(saved, b"png bytes");
        assert_eq!(
            assets.public_url("token.png"),
            "http://localhost:8000/assets/token.png"
        );
    }

    #[tokio::test]
    async fn rejects_traversal_filenames() {
        let dir = TempDir::new().unwrap();
        let assets = LocalAssets::new(dir.path(), "http://localhost/assets")
            .await
            .unwrap();

        for bad in ["../escape.png", "a/b.png", "", "..\\win.png"] {
            assert!(matches!(
                assets.save(bad, b"x").await,
                Err(StorageError::InvalidFilename(_))
            ));
        }
    }
}
