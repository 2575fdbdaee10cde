//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure the uploads directory exists; warn when the public directory is missing.
pub async fn ensure_env(public_dir: &str, uploads_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(public_dir).await.is_err() {
        warn!(%public_dir, "public assets directory not found; /public will 404");
    }
    tokio::fs::create_dir_all(uploads_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {uploads_dir}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_uploads_dir() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("booking_env_{}", uuid::Uuid::new_v4()));
        let uploads = root.join("uploads");
        ensure_env("/nonexistent-public-dir", uploads.to_str().unwrap()).await?;
        assert!(tokio::fs::metadata(&uploads).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
