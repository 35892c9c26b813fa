use std::sync::Arc;
use tracing::info;

use crate::clients::{FlickrClient, PhotoProvider};
use crate::config::Config;
use crate::db::Store;
use crate::services::{PhotoSearchService, SeaOrmHistoryService, SearchHistoryService};

/// Build a shared HTTP client for provider calls. One client per process keeps
/// connection pooling effective.
pub fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Photoscroll/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub provider: Arc<dyn PhotoProvider>,

    pub history: Arc<dyn SearchHistoryService>,

    pub search_service: Arc<PhotoSearchService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.flickr.request_timeout_seconds)?;
        let flickr = FlickrClient::with_shared_client(http_client, &config.flickr)?;
        Self::with_provider(config, Arc::new(flickr)).await
    }

    pub async fn with_provider(
        config: Config,
        provider: Arc<dyn PhotoProvider>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let history: Arc<dyn SearchHistoryService> =
            Arc::new(SeaOrmHistoryService::new(store.clone()));

        if config.general.reset_history_on_startup {
            let removed = history.clear().await?;
            info!("Search history reset on startup ({} entries removed)", removed);
        }

        let search_service = Arc::new(PhotoSearchService::new(history.clone(), provider.clone()));

        Ok(Self {
            config: Arc::new(config),
            store,
            provider,
            history,
            search_service,
        })
    }
}
