use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::jwt::JwtKeys;
use crate::config::{AppConfig, StoreKind};
use crate::store::{MemoryStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub keys: JwtKeys,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the state from configuration: connect the chosen backend and derive signing keys.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        config.warn_on_insecure_defaults();

        let store: Arc<dyn Store> = match config.store {
            StoreKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
                migrated(PgStore::connect(url).await?).await?
            }
            StoreKind::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Self::from_parts(store, Arc::new(config))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let keys = JwtKeys::new(&config.jwt)?;
        Ok(Self {
            store,
            keys,
            config,
        })
    }
}

/// A schema that failed to migrate makes every route fail, so startup stops here.
async fn migrated(pg: PgStore) -> anyhow::Result<Arc<dyn Store>> {
    pg.migrate().await?;
    tracing::info!("database migrations applied");
    Ok(Arc::new(pg))
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
