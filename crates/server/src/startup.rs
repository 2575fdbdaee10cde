use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging;
use configs::{AppConfig, AssetBackend, AssetsConfig};
use dotenvy::dotenv;
use tracing::info;

use crate::cors::build_cors;
use crate::errors::StartupError;
use crate::routes::{self, auth, RouterOptions};
use service::{
    assets::{cloudinary::CloudinaryCredentials, AssetStore, CloudinaryAssetStore, LocalAssetStore},
    catalog::{repo::SeaOrmServiceRepository, ServiceManager},
    runtime,
};

/// Pick the asset backend named in configuration.
pub fn build_asset_store(cfg: &AssetsConfig) -> Result<Arc<dyn AssetStore>, StartupError> {
    match cfg.backend {
        AssetBackend::Local => {
            info!(dir = %cfg.uploads_dir, "using local asset store");
            Ok(Arc::new(LocalAssetStore::new(&cfg.uploads_dir, &cfg.public_base_url)))
        }
        AssetBackend::Cloudinary => {
            let creds = CloudinaryCredentials {
                cloud_name: cfg.cloudinary.cloud_name.clone(),
                api_key: cfg.cloudinary.api_key.clone(),
                api_secret: cfg.cloudinary.api_secret.clone(),
            };
            let store = CloudinaryAssetStore::new(creds, Duration::from_secs(cfg.timeout_secs))
                .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            info!(cloud = %cfg.cloudinary.cloud_name, "using cloudinary asset store");
            Ok(Arc::new(store))
        }
    }
}

fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")))
}

/// Public entry: load configuration, build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_default().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    init_logging(cfg.logging.format);
    run_with(cfg).await
}

pub async fn run_with(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.server.public_dir, &cfg.assets.uploads_dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from(&cfg.database)).await?;
    let repo = Arc::new(SeaOrmServiceRepository::new(db));
    let assets = build_asset_store(&cfg.assets)?;
    let manager = ServiceManager::new(repo, assets).with_namespace(&cfg.assets.namespace);

    let state = auth::ServerState {
        manager: Arc::new(manager),
        auth: auth::ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone() },
    };
    let app: Router = routes::build_router(state, build_cors(&cfg.cors), &RouterOptions::from(&cfg));

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
