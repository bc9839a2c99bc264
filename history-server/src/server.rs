use anyhow::{Context, Result};
use auth_zanzibar::{repository::postgres::PostgresTupleRepository, InMemoryTupleRepository, TupleRepository};
use history_engine::{
    postgres::PostgresHistoryStore, EntityKind, HistoryStore, InMemoryEntityRepository, InMemoryHistoryStore,
    ModelRegistry,
};
use sqlx::postgres::PgPoolOptions;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::HistoryConfig;
use crate::middleware::TokenVerifier;
use crate::services::{HistoryEndpoint, HistoryEndpointConfig};

/// Where entities, history and permission tuples are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main history server state
#[derive(Clone)]
pub struct HistoryServer {
    /// Server configuration
    pub config: Arc<HistoryConfig>,
    /// Entity accessors per kind
    pub registry: Arc<ModelRegistry>,
    /// History entry store shared by every endpoint
    pub store: Arc<dyn HistoryStore>,
    /// Bearer token validation
    pub tokens: Arc<TokenVerifier>,
    pub backend: StorageBackend,
    pub started_at: Instant,
    endpoints: Vec<Arc<HistoryEndpoint>>,
}

impl HistoryServer {
    /// Create a server from configuration.
    ///
    /// Connects to PostgreSQL when `database.url` is set; otherwise serves
    /// from empty in-memory stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection cannot be established.
    pub async fn new(config: HistoryConfig) -> Result<Self> {
        match config.database.url.clone() {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .connect(&url)
                    .await
                    .context("Failed to connect to the history database")?;

                tracing::info!(max_connections = config.database.max_connections, "Connected to PostgreSQL");

                let registry = ModelRegistry::postgres(pool.clone());
                let store: Arc<dyn HistoryStore> = Arc::new(PostgresHistoryStore::new(pool.clone()));
                let tuples: Arc<dyn TupleRepository> = Arc::new(PostgresTupleRepository::new(pool));

                Ok(Self::from_parts(
                    config,
                    registry,
                    store,
                    HistoryEndpointConfig::all_kinds(tuples),
                    StorageBackend::Postgres,
                ))
            }
            None => {
                tracing::warn!("No database URL configured, serving from empty in-memory stores");

                let registry = EntityKind::ALL.into_iter().fold(ModelRegistry::new(), |registry, kind| {
                    registry.with(Arc::new(InMemoryEntityRepository::new(kind)))
                });
                let store: Arc<dyn HistoryStore> = Arc::new(InMemoryHistoryStore::new());
                let tuples: Arc<dyn TupleRepository> = Arc::new(InMemoryTupleRepository::new());

                Ok(Self::from_parts(
                    config,
                    registry,
                    store,
                    HistoryEndpointConfig::all_kinds(tuples),
                    StorageBackend::Memory,
                ))
            }
        }
    }

    /// Assemble a server from already-built collaborators.
    ///
    /// One endpoint is created per kind in `endpoint_configs`; the first
    /// configuration of a kind wins and kinds left out get no routes.
    pub fn from_parts(
        config: HistoryConfig,
        registry: ModelRegistry,
        store: Arc<dyn HistoryStore>,
        endpoint_configs: Vec<HistoryEndpointConfig>,
        backend: StorageBackend,
    ) -> Self {
        let registry = Arc::new(registry);
        let tokens = Arc::new(TokenVerifier::new(config.auth.jwt_secret.as_deref()));

        let mut endpoints: Vec<Arc<HistoryEndpoint>> = Vec::with_capacity(endpoint_configs.len());
        for endpoint in endpoint_configs {
            if endpoints.iter().any(|existing| existing.kind() == endpoint.kind) {
                tracing::warn!(kind = %endpoint.kind, "Ignoring duplicate history endpoint configuration");
                continue;
            }
            endpoints.push(Arc::new(HistoryEndpoint::new(endpoint, registry.clone(), store.clone())));
        }

        Self {
            config: Arc::new(config),
            registry,
            store,
            tokens,
            backend,
            started_at: Instant::now(),
            endpoints,
        }
    }

    /// Get server configuration
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// History endpoints, one per served kind
    pub fn endpoints(&self) -> &[Arc<HistoryEndpoint>] {
        &self.endpoints
    }

    /// Seconds since the server state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
