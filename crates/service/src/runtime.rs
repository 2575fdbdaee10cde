//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the uploads directory exists; warn on a missing public directory.
pub async fn ensure_env(public_dir: &str, uploads_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(public_dir, uploads_dir).await
}
