use std::sync::Arc;

use common::MediaStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Injected media adapter; constructed once at startup.
    pub media: Arc<dyn MediaStore>,
    pub config: AppConfig,
}
