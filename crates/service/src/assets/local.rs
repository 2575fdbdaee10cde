use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::{AssetError, AssetStore, ImageUpload, UploadedAsset};

/// Filesystem-backed store; files are served back under `/uploads`.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalAssetStore {
    pub fn new<P: Into<PathBuf>>(root: P, public_base_url: &str) -> Self {
        Self { root: root.into(), public_base_url: public_base_url.trim_end_matches('/').to_string() }
    }
}

fn is_safe_segment(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn upload(&self, image: &ImageUpload, namespace: &str) -> Result<UploadedAsset, AssetError> {
        if !is_safe_segment(namespace) {
            return Err(AssetError::Io(format!("invalid namespace: {namespace}")));
        }
        let dir = self.root.join(namespace);
        fs::create_dir_all(&dir).await.map_err(|e| AssetError::Io(e.to_string()))?;

        let file_name = format!("{}.{}", Uuid::new_v4(), image.extension());
        let path = dir.join(&file_name);
        fs::write(&path, &image.bytes).await.map_err(|e| AssetError::Io(e.to_string()))?;
        debug!(path = %path.display(), size = image.bytes.len(), "stored asset locally");

        Ok(UploadedAsset { secure_url: format!("{}/uploads/{}/{}", self.public_base_url, namespace, file_name) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_file_and_returns_public_url() -> Result<(), anyhow::Error> {
        let root = std::env::temp_dir().join(format!("local_assets_{}", Uuid::new_v4()));
        let store = LocalAssetStore::new(&root, "http://localhost:5000/");
        let img = ImageUpload::new(Some("cut.png".into()), Some("image/png".into()), vec![137, 80, 78, 71]);

        let asset = store.upload(&img, "services").await?;
        assert!(asset.secure_url.starts_with("http://localhost:5000/uploads/services/"));
        assert!(asset.secure_url.ends_with(".png"));

        let file_name = asset.secure_url.rsplit('/').next().unwrap();
        let stored = tokio::fs::read(root.join("services").join(file_name)).await?;
        assert_eq!(stored, vec![137, 80, 78, 71]);

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn rejects_path_like_namespace() {
        let store = LocalAssetStore::new(std::env::temp_dir(), "http://localhost:5000");
        let img = ImageUpload::new(None, None, vec![1]);
        assert!(matches!(store.upload(&img, "../escape").await, Err(AssetError::Io(_))));
    }
}
