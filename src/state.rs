use std::sync::Arc;
use std::time::Duration;

use crate::clients::job_search::JobSearchClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AttachmentService, JobService, SeaOrmAttachmentService, SeaOrmJobService, SearchService,
};

/// Build the HTTP client shared by outbound integrations.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("job-tracker/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub job_service: Arc<dyn JobService>,

    pub attachment_service: Arc<dyn AttachmentService>,

    pub search_service: Arc<SearchService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_url = config.database.connection_url()?;
        let store = Store::with_pool_options(
            &db_url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires services around an already-open store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.search.request_timeout_seconds)?;
        let search_client =
            JobSearchClient::with_shared_client(http_client, &config.search.base_url);

        let job_service =
            Arc::new(SeaOrmJobService::new(store.clone())) as Arc<dyn JobService + 'static>;
        let attachment_service = Arc::new(SeaOrmAttachmentService::new(store.clone()))
            as Arc<dyn AttachmentService + 'static>;
        let search_service = Arc::new(SearchService::new(store.clone(), search_client));

        Ok(Self {
            config: Arc::new(config),
            store,
            job_service,
            attachment_service,
            search_service,
        })
    }
}
