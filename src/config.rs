//! Process-wide configuration, read once at startup.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_DB_SERVER: &str = "sql.ar-vida.com.ar";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_HTTP_PORT: u16 = 3000;

/// Built-in tenants and their database names. The env var overrides the
/// database a tenant maps to, never the tenant set itself.
const TENANTS: [(&str, &str, &str); 3] = [
    ("amm", "DB_AMM", "LEADS_AMM"),
    ("holavet", "DB_HOLAVET", "LEADS_HOLAVET"),
    ("holarene", "DB_HOLARENE", "LEADS_HOLARENE"),
];

/// Fixed tenant id → database name mapping, case-insensitive on lookup.
#[derive(Debug, Clone)]
pub struct TenantMap {
    databases: HashMap<String, String>,
}

impl TenantMap {
    fn from_env() -> Self {
        let databases = TENANTS
            .iter()
            .map(|(tenant, var, default)| {
                let db = env::var(var).unwrap_or_else(|_| (*default).to_string());
                ((*tenant).to_string(), db)
            })
            .collect();
        Self { databases }
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let databases = pairs
            .iter()
            .map(|(t, d)| ((*t).to_string(), (*d).to_string()))
            .collect();
        Self { databases }
    }

    /// Resolve a tenant identifier to its database name. This is the only
    /// gate: unknown tenants never reach the pool registry.
    pub fn database_for(&self, producto: &str) -> Option<&str> {
        self.databases
            .get(&producto.to_lowercase())
            .map(String::as_str)
    }

    /// Known tenant identifiers, sorted for stable output.
    pub fn productos(&self) -> Vec<String> {
        let mut names: Vec<String> = self.databases.keys().cloned().collect();
        names.sort();
        names
    }

    /// Configured database names, sorted.
    pub fn databases(&self) -> Vec<String> {
        let mut names: Vec<String> = self.databases.values().cloned().collect();
        names.sort();
        names
    }
}

/// Everything the server needs from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_server: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub tenants: TenantMap,
    pub http_port: u16,
    /// When set, the dashboard assets in this directory are served at `/`;
    /// otherwise `/` answers with a JSON health object (API-only mode).
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let db_user = env::var("DB_USER").context("DB_USER must be set")?;
        let db_password = env::var("DB_PASSWORD").context("DB_PASSWORD must be set")?;
        let db_server = env::var("DB_SERVER").unwrap_or_else(|_| DEFAULT_DB_SERVER.to_string());
        let db_port = match env::var("DB_PORT") {
            Ok(raw) => raw.parse().context("DB_PORT must be a port number")?,
            Err(_) => DEFAULT_DB_PORT,
        };
        let http_port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a port number")?,
            Err(_) => DEFAULT_HTTP_PORT,
        };
        let static_dir = env::var("STATIC_DIR").ok().map(PathBuf::from);

        Ok(Self {
            db_server,
            db_port,
            db_user,
            db_password,
            tenants: TenantMap::from_env(),
            http_port,
            static_dir,
        })
    }
}
