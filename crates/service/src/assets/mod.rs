//! Binary asset storage for service images.
//!
//! An [`AssetStore`] turns an uploaded payload into a durable public URL.
//! Uploads are attempted once; no store retries on failure.

pub mod cloudinary;
pub mod local;

use async_trait::async_trait;
use thiserror::Error;

pub use cloudinary::CloudinaryAssetStore;
pub use local::LocalAssetStore;

/// Image payload received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, content_type, bytes }
    }

    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    /// File extension derived from the client file name, then the content type.
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|n| n.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()))
            .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()));
        if let Some(ext) = from_name {
            return ext;
        }
        match self.content_type.as_deref() {
            Some("image/jpeg") => "jpg",
            Some("image/png") => "png",
            Some("image/gif") => "gif",
            Some("image/webp") => "webp",
            _ => "bin",
        }
        .to_string()
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub secure_url: String,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("io error: {0}")]
    Io(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `image` under the logical `namespace` and return its public URL.
    async fn upload(&self, image: &ImageUpload, namespace: &str) -> Result<UploadedAsset, AssetError>;
}

/// In-memory asset store for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    pub const MOCK_ASSET_BASE: &str = "https://res.cloudinary.com/mock/image/upload";

    /// Namespace, file name and size of each accepted upload.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedUpload {
        pub namespace: String,
        pub file_name: Option<String>,
        pub size: usize,
        pub secure_url: String,
    }

    #[derive(Default)]
    pub struct MockAssetStore {
        uploads: Mutex<Vec<RecordedUpload>>,
        fail: AtomicBool,
    }

    fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
        m.lock().unwrap_or_else(|e| e.into_inner())
    }

    impl MockAssetStore {
        pub fn failing() -> Self {
            let s = Self::default();
            s.set_failing(true);
            s
        }

        pub fn set_failing(&self, fail: bool) { self.fail.store(fail, Ordering::SeqCst); }

        pub fn uploads(&self) -> Vec<RecordedUpload> { guard(&self.uploads).clone() }

        pub fn upload_count(&self) -> usize { guard(&self.uploads).len() }
    }

    #[async_trait]
    impl AssetStore for MockAssetStore {
        async fn upload(&self, image: &ImageUpload, namespace: &str) -> Result<UploadedAsset, AssetError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AssetError::Rejected { status: 503, message: "asset store unavailable".into() });
            }
            let secure_url = format!("{}/{}/{}.{}", MOCK_ASSET_BASE, namespace, uuid::Uuid::new_v4(), image.extension());
            guard(&self.uploads).push(RecordedUpload {
                namespace: namespace.to_string(),
                file_name: image.file_name.clone(),
                size: image.bytes.len(),
                secure_url: secure_url.clone(),
            });
            Ok(UploadedAsset { secure_url })
        }
    }
}
