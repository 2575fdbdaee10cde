use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5000,
            worker_threads: Some(4),
            max_upload_bytes: default_max_upload_bytes(),
            public_dir: default_public_dir(),
        }
    }
}

fn default_max_upload_bytes() -> usize { 10 * 1024 * 1024 }
fn default_public_dir() -> String { "public".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Verification settings for tokens issued by the user/admin login flow.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Any origin whose host ends with one of these is accepted (preview deployments).
    #[serde(default = "default_allowed_origin_suffixes")]
    pub allowed_origin_suffixes: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allowed_origin_suffixes: default_allowed_origin_suffixes(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".into(),
        "https://our-service-frontend.vercel.app".into(),
    ]
}

fn default_allowed_origin_suffixes() -> Vec<String> { vec![".vercel.app".into()] }

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetBackend {
    #[default]
    Local,
    Cloudinary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    #[serde(default)]
    pub backend: AssetBackend,
    /// Logical folder images are uploaded under.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
    /// Externally reachable base URL used to build links for locally stored assets.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default = "default_upload_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            backend: AssetBackend::default(),
            namespace: default_namespace(),
            uploads_dir: default_uploads_dir(),
            public_base_url: default_public_base_url(),
            timeout_secs: default_upload_timeout(),
            cloudinary: CloudinaryConfig::default(),
        }
    }
}

fn default_namespace() -> String { "services".into() }
fn default_uploads_dir() -> String { "uploads".into() }
fn default_public_base_url() -> String { "http://localhost:5000".into() }
fn default_upload_timeout() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like [`AppConfig::load_and_validate`], but a missing config file means defaults plus environment.
    pub fn load_or_default() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env_with(|k| std::env::var(k).ok());
        self.server.normalize()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.assets.validate()?;
        Ok(())
    }

    /// Host and port from the environment override the file; secrets and URLs only fill blanks.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").or_else(|| lookup("PORT")).and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if self.server.worker_threads.is_none() {
            self.server.worker_threads = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok());
        }
        if self.database.url.trim().is_empty() {
            if let Some(url) = lookup("DATABASE_URL") {
                self.database.url = url;
            }
        }
        if self.auth.jwt_secret.trim().is_empty() {
            if let Some(secret) = lookup("JWT_SECRET") {
                self.auth.jwt_secret = secret;
            }
        }
        let cl = &mut self.assets.cloudinary;
        if cl.cloud_name.is_empty() {
            cl.cloud_name = lookup("CLOUDINARY_CLOUD_NAME").unwrap_or_default();
        }
        if cl.api_key.is_empty() {
            cl.api_key = lookup("CLOUDINARY_API_KEY").unwrap_or_default();
        }
        if cl.api_secret.is_empty() {
            cl.api_secret = lookup("CLOUDINARY_API_SECRET").unwrap_or_default();
        }
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("server.max_upload_bytes must be positive"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        Ok(())
    }
}

impl AssetsConfig {
    fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(anyhow!("assets.namespace must not be empty"));
        }
        if self.backend == AssetBackend::Local {
            let lower = self.public_base_url.to_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(anyhow!("assets.public_base_url must be an absolute http(s) URL"));
            }
        }
        if self.backend == AssetBackend::Cloudinary {
            let c = &self.cloudinary;
            if c.cloud_name.is_empty() || c.api_key.is_empty() || c.api_secret.is_empty() {
                return Err(anyhow!("assets.backend = cloudinary requires cloud_name, api_key and api_secret"));
            }
        }
        Ok(())
    }
}
