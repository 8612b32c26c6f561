use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Which media backend to construct at startup.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackend {
    Hosted,
    Filesystem,
}

/// Credentials for the hosted upload/destroy API. Supplied through the
/// environment (`BRICKLANE__MEDIA__HOSTED__API_SECRET`, ...).
#[derive(Debug, Deserialize, Clone)]
pub struct HostedMediaConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Override the API host (tests, proxies).
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemMediaConfig {
    pub root: PathBuf,
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    pub backend: MediaBackend,
    /// Remote folder instruction PDFs are uploaded under.
    pub folder: String,
    pub hosted: Option<HostedMediaConfig>,
    pub filesystem: Option<FilesystemMediaConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("media.backend", "hosted")?
            .set_default("media.folder", "bricklane/instructions")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., BRICKLANE__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("BRICKLANE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
