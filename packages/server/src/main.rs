use std::sync::Arc;

use common::MediaStore;
use common::media::filesystem::FilesystemMediaStore;
use common::media::hosted::HostedMediaStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::{AppConfig, MediaBackend, MediaConfig};
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    let db = server::database::init_db(&config.database.url).await?;
    server::seed::ensure_indexes(&db).await?;

    let media = media_store(&config.media).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState { db, media, config };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Construct the configured media backend. The adapter is built once here
/// and injected through `AppState`.
async fn media_store(cfg: &MediaConfig) -> anyhow::Result<Arc<dyn MediaStore>> {
    match cfg.backend {
        MediaBackend::Hosted => {
            let hosted = cfg.hosted.as_ref().ok_or_else(|| {
                anyhow::anyhow!("media.backend = \"hosted\" requires the [media.hosted] section")
            })?;
            let store = match &hosted.base_url {
                Some(base) => HostedMediaStore::with_base_url(
                    base.clone(),
                    hosted.cloud_name.clone(),
                    hosted.api_key.clone(),
                    hosted.api_secret.clone(),
                ),
                None => HostedMediaStore::new(
                    hosted.cloud_name.clone(),
                    hosted.api_key.clone(),
                    hosted.api_secret.clone(),
                ),
            };
            Ok(Arc::new(store))
        }
        MediaBackend::Filesystem => {
            let fs = cfg.filesystem.as_ref().ok_or_else(|| {
                anyhow::anyhow!(
                    "media.backend = \"filesystem\" requires the [media.filesystem] section"
                )
            })?;
            let store =
                FilesystemMediaStore::new(fs.root.clone(), fs.public_base_url.clone()).await?;
            Ok(Arc::new(store))
        }
    }
}
