use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use backend_application::{AppState, Metrics};
use backend_infrastructure::{AppConfig, DefaultHealthService, SqliteStore};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let store = Arc::new(SqliteStore::open(&db_config)?);
        if config.is_in_memory() {
            info!("using in-memory database; data is lost on exit");
        }

        let state = AppState {
            config: runtime_config,
            entity_repo: store.clone(),
            event_repo: store.clone(),
            link_repo: store.clone(),
            tracking_repo: store.clone(),
            health: Arc::new(DefaultHealthService::new(store)),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
