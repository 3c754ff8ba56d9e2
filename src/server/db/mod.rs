//! Database access layer: per-tenant connection pools over sqlx/PostgreSQL.

pub mod campaigns;
pub mod filter;
pub mod leads;
pub mod stats;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::config::Config;

const MIN_CONNECTIONS: u32 = 0;
const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(15);
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);
const STATEMENT_TIMEOUT_MS: &str = "30000";

/// Opens a connection pool against one tenant database. The seam exists so
/// the registry's lifecycle can be exercised without a live server.
#[async_trait]
pub trait PoolConnector: Send + Sync {
    async fn connect(&self, database: &str) -> Result<PgPool, sqlx::Error>;
}

/// Production connector: shared host/credentials, per-tenant database name.
pub struct PgConnector {
    options: PgConnectOptions,
}

impl PgConnector {
    pub fn new(config: &Config) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.db_server)
            .port(config.db_port)
            .username(&config.db_user)
            .password(&config.db_password)
            // Encrypted transport without certificate verification; the
            // servers run self-signed certs.
            .ssl_mode(PgSslMode::Require)
            .options([("statement_timeout", STATEMENT_TIMEOUT_MS)]);
        Self { options }
    }
}

#[async_trait]
impl PoolConnector for PgConnector {
    async fn connect(&self, database: &str) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .min_connections(MIN_CONNECTIONS)
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .idle_timeout(IDLE_TIMEOUT)
            .connect_with(self.options.clone().database(database))
            .await
    }
}

type PoolSlot = Arc<Mutex<Option<PgPool>>>;

/// Lazily-created, cached connection pools keyed by tenant id.
///
/// Creation is single-flight per tenant: the slot lock is held across the
/// connect, so concurrent first-requests for one tenant share a single pool
/// instead of racing to create duplicates. The outer map lock is only held
/// for lookup/insert, never across an await.
pub struct PoolRegistry {
    connector: Arc<dyn PoolConnector>,
    slots: Mutex<HashMap<String, PoolSlot>>,
}

impl PoolRegistry {
    pub fn new(connector: Arc<dyn PoolConnector>) -> Self {
        Self {
            connector,
            slots: Mutex::new(HashMap::new()),
        }
    }

    async fn slot(&self, tenant: &str) -> PoolSlot {
        let mut slots = self.slots.lock().await;
        slots.entry(tenant.to_string()).or_default().clone()
    }

    /// Resolve the cached pool for `tenant`, connecting on first use or when
    /// the cached pool has been closed. The caller has already validated the
    /// tenant; `database` is its configured database name.
    pub async fn pool_for(&self, tenant: &str, database: &str) -> Result<PgPool, sqlx::Error> {
        let slot = self.slot(tenant).await;
        let mut guard = slot.lock().await;

        if let Some(pool) = guard.as_ref() {
            if !pool.is_closed() {
                return Ok(pool.clone());
            }
        }

        let pool = self.connector.connect(database).await?;
        tracing::info!("Conectado: {} → {}", tenant, database);
        *guard = Some(pool.clone());
        Ok(pool)
    }

    /// Drop the cached pool so the next request reconnects.
    pub async fn invalidate(&self, tenant: &str) {
        let slot = self.slot(tenant).await;
        let mut guard = slot.lock().await;
        if let Some(pool) = guard.take() {
            tracing::warn!("Pool invalidado: {}", tenant);
            // close() waits for in-flight connections; don't hold the caller.
            tokio::spawn(async move { pool.close().await });
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::CountingConnector;
    use super::*;

    #[tokio::test]
    async fn concurrent_first_access_creates_one_pool() {
        let connector = CountingConnector::new();
        let registry = Arc::new(PoolRegistry::new(connector.clone()));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.pool_for("amm", "LEADS_AMM").await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(connector.call_count(), 1);
    }

    #[tokio::test]
    async fn cached_pool_is_reused_across_requests() {
        let connector = CountingConnector::new();
        let registry = PoolRegistry::new(connector.clone());

        registry.pool_for("amm", "LEADS_AMM").await.unwrap();
        registry.pool_for("amm", "LEADS_AMM").await.unwrap();
        registry.pool_for("amm", "LEADS_AMM").await.unwrap();

        assert_eq!(connector.call_count(), 1);
    }

    #[tokio::test]
    async fn tenants_get_independent_pools() {
        let connector = CountingConnector::new();
        let registry = PoolRegistry::new(connector.clone());

        registry.pool_for("amm", "LEADS_AMM").await.unwrap();
        registry.pool_for("holavet", "LEADS_HOLAVET").await.unwrap();

        assert_eq!(connector.call_count(), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_reconnect() {
        let connector = CountingConnector::new();
        let registry = PoolRegistry::new(connector.clone());

        registry.pool_for("amm", "LEADS_AMM").await.unwrap();
        assert_eq!(connector.call_count(), 1);

        registry.invalidate("amm").await;
        registry.pool_for("amm", "LEADS_AMM").await.unwrap();
        assert_eq!(connector.call_count(), 2);
    }

    #[tokio::test]
    async fn closed_pool_is_replaced_on_access() {
        let connector = CountingConnector::new();
        let registry = PoolRegistry::new(connector.clone());

        let pool = registry.pool_for("amm", "LEADS_AMM").await.unwrap();
        pool.close().await;

        registry.pool_for("amm", "LEADS_AMM").await.unwrap();
        assert_eq!(connector.call_count(), 2);
    }
}
