use std::sync::Arc;

use crate::clients::oidc::OidcClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AdminService, AuthService, CatalogService, SeaOrmAdminService, SeaOrmAuthService,
    SeaOrmCatalogService,
};

/// Build a shared HTTP client with reasonable defaults for provider calls.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Warden/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub admin_service: Arc<dyn AdminService>,

    pub catalog_service: Arc<dyn CatalogService>,

    /// Absent when the external-identity login path is disabled.
    pub oidc: Option<Arc<OidcClient>>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        store.seed_default_games().await?;

        let oidc = if config.oidc.enabled {
            let http_client = build_shared_http_client(30)?;
            Some(Arc::new(OidcClient::new(config.oidc.clone(), http_client)))
        } else {
            None
        };

        let auth_service: Arc<dyn AuthService> =
            Arc::new(SeaOrmAuthService::new(store.clone(), &config.security)?);

        let admin_service: Arc<dyn AdminService> = Arc::new(SeaOrmAdminService::new(
            store.clone(),
            config.security.clone(),
        ));

        let catalog_service: Arc<dyn CatalogService> =
            Arc::new(SeaOrmCatalogService::new(store.clone()));

        Ok(Self {
            config,
            store,
            auth_service,
            admin_service,
            catalog_service,
            oidc,
        })
    }
}
