use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument, warn};

use super::{AssetError, AssetStore, ImageUpload, UploadedAsset};

pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Credentials and endpoint for signed uploads.
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Signed image uploads to Cloudinary's upload API.
#[derive(Clone)]
pub struct CloudinaryAssetStore {
    client: reqwest::Client,
    creds: CloudinaryCredentials,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

impl CloudinaryAssetStore {
    pub fn new(creds: CloudinaryCredentials, timeout: Duration) -> Result<Self, AssetError> {
        Self::with_api_base(creds, timeout, DEFAULT_API_BASE)
    }

    pub fn with_api_base(creds: CloudinaryCredentials, timeout: Duration, api_base: &str) -> Result<Self, AssetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssetError::Http(e.to_string()))?;
        Ok(Self { client, creds, api_base: api_base.trim_end_matches('/').to_string() })
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.api_base, self.creds.cloud_name)
    }
}

/// Parameters are signed sorted by name, joined as a query string, with the secret appended.
pub fn string_to_sign(folder: &str, timestamp: i64, api_secret: &str) -> String {
    format!("folder={folder}&timestamp={timestamp}{api_secret}")
}

pub fn sign(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let digest = Sha256::digest(string_to_sign(folder, timestamp, api_secret).as_bytes());
    hex::encode(digest)
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    #[instrument(skip(self, image), fields(size = image.bytes.len(), cloud = %self.creds.cloud_name))]
    async fn upload(&self, image: &ImageUpload, namespace: &str) -> Result<UploadedAsset, AssetError> {
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(namespace, timestamp, &self.creds.api_secret);

        let file_name = image.file_name.clone().unwrap_or_else(|| format!("upload.{}", image.extension()));
        let mut part = Part::bytes(image.bytes.clone()).file_name(file_name);
        if let Some(ct) = image.content_type.as_deref() {
            part = part.mime_str(ct).map_err(|e| AssetError::Http(e.to_string()))?;
        }
        let form = Form::new()
            .part("file", part)
            .text("api_key", self.creds.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", namespace.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let resp = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AssetError::Http(e.to_string()))?;
        let status = resp.status();
        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| AssetError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            let message = body.error.map(|e| e.message).unwrap_or_else(|| status.to_string());
            warn!(status = status.as_u16(), %message, "cloudinary rejected upload");
            return Err(AssetError::Rejected { status: status.as_u16(), message });
        }
        let secure_url = body
            .secure_url
            .ok_or_else(|| AssetError::InvalidResponse("missing secure_url".into()))?;
        debug!(%secure_url, "cloudinary upload complete");
        Ok(UploadedAsset { secure_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::{Multipart, Path}, http::StatusCode, routing::post, Json, Router};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn fake_upload(Path(cloud): Path<String>, mut mp: Multipart) -> (StatusCode, Json<serde_json::Value>) {
        if cloud == "locked" {
            return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"error": {"message": "Invalid Signature"}})));
        }
        let mut fields: HashMap<String, String> = HashMap::new();
        let mut file_len = 0usize;
        while let Ok(Some(field)) = mp.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                file_len = field.bytes().await.map(|b| b.len()).unwrap_or_default();
            } else {
                fields.insert(name, field.text().await.unwrap_or_default());
            }
        }
        let folder = fields.get("folder").cloned().unwrap_or_default();
        let url = format!("https://res.cloudinary.com/{cloud}/image/upload/{folder}/abc.jpg");
        (StatusCode::OK, Json(serde_json::json!({"secure_url": url, "fields": fields, "file_len": file_len})))
    }

    async fn start_fake() -> anyhow::Result<String> {
        let app = Router::new().route("/v1_1/:cloud/image/upload", post(fake_upload));
        let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await { eprintln!("fake cloudinary error: {}", e); }
        });
        Ok(format!("http://{}/v1_1", addr))
    }

    fn creds(cloud: &str) -> CloudinaryCredentials {
        CloudinaryCredentials { cloud_name: cloud.into(), api_key: "key".into(), api_secret: "secret".into() }
    }

    #[test]
    fn signature_payload_layout() {
        assert_eq!(string_to_sign("services", 1700000000, "shh"), "folder=services&timestamp=1700000000shh");
        let sig = sign("services", 1700000000, "shh");
        assert_eq!(sig.len(), 64);
        assert_ne!(sig, sign("services", 1700000001, "shh"));
    }

    #[tokio::test]
    async fn upload_returns_secure_url() -> anyhow::Result<()> {
        let base = start_fake().await?;
        let store = CloudinaryAssetStore::with_api_base(creds("demo"), Duration::from_secs(5), &base)?;
        let img = ImageUpload::new(Some("cut.jpg".into()), Some("image/jpeg".into()), vec![0xff, 0xd8, 0xff]);
        let asset = store.upload(&img, "services").await?;
        assert_eq!(asset.secure_url, "https://res.cloudinary.com/demo/image/upload/services/abc.jpg");
        Ok(())
    }

    #[tokio::test]
    async fn rejected_upload_surfaces_message() -> anyhow::Result<()> {
        let base = start_fake().await?;
        let store = CloudinaryAssetStore::with_api_base(creds("locked"), Duration::from_secs(5), &base)?;
        let img = ImageUpload::new(None, None, vec![1, 2, 3]);
        match store.upload(&img, "services").await {
            Err(AssetError::Rejected { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        Ok(())
    }
}
