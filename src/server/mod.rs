//! HTTP surface for the leads reporting API.
//!
//! Router, shared state and handlers. Three read-only endpoints per tenant
//! (`producto`): lead listing, aggregate statistics and filter values. The
//! dashboard consumes these as-is and does its own pagination client-side,
//! so result sets are always complete.

pub mod db;
pub mod error;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::Method;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::models::{Lead, StatsReport};
use db::filter::{LeadFilter, LeadParams, StatsParams};
use db::{PgConnector, PoolRegistry};
use error::ApiError;

/// Application state shared across all routes
pub struct AppState {
    pub config: Config,
    pub registry: PoolRegistry,
}

/// Create the Axum router with all API routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/leads/{producto}", get(get_leads))
        .route("/api/stats/{producto}", get(get_stats))
        .route("/api/filters/{producto}", get(get_filters));

    // One binary covers both upstream deployments: a bare API, or the API
    // plus the static dashboard when STATIC_DIR points at its assets.
    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.route("/", get(health_check)),
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let port = config.http_port;
    tracing::info!("Leads API escuchando en puerto {}", port);
    tracing::info!("Servidor SQL: {}", config.db_server);
    tracing::info!("Bases: {}", config.tenants.databases().join(", "));

    let registry = PoolRegistry::new(Arc::new(PgConnector::new(&config)));
    let app = create_router(AppState { config, registry });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// Health check
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    productos: Vec<String>,
    server: String,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        productos: state.config.tenants.productos(),
        server: state.config.db_server.clone(),
    })
}

/// Validate the tenant and resolve its pool. The map lookup happens before
/// any pool access, so unknown tenants never cause network I/O.
async fn tenant_pool(state: &AppState, producto: &str) -> Result<sqlx::PgPool, ApiError> {
    let database = state
        .config
        .tenants
        .database_for(producto)
        .ok_or_else(|| ApiError::InvalidTenant(producto.to_string()))?;
    state
        .registry
        .pool_for(&producto.to_lowercase(), database)
        .await
        .map_err(ApiError::Connection)
}

/// Map a query failure, invalidating the tenant pool when the connection
/// itself is the problem so the next request reconnects.
async fn query_error(state: &AppState, producto: &str, err: sqlx::Error) -> ApiError {
    if error::is_connection_error(&err) {
        state.registry.invalidate(&producto.to_lowercase()).await;
    }
    ApiError::Query(err)
}

// ============== Report Routes ==============

#[derive(Serialize)]
struct LeadsResponse {
    producto: String,
    total: usize,
    leads: Vec<Lead>,
}

async fn get_leads(
    State(state): State<Arc<AppState>>,
    Path(producto): Path<String>,
    Query(params): Query<LeadParams>,
) -> Result<Json<LeadsResponse>, ApiError> {
    let filters = LeadFilter::from_params(&params)?;
    let pool = tenant_pool(&state, &producto).await?;

    let leads = match db::leads::fetch(&pool, &filters).await {
        Ok(leads) => leads,
        Err(err) => return Err(query_error(&state, &producto, err).await),
    };

    Ok(Json(LeadsResponse {
        total: leads.len(),
        producto,
        leads,
    }))
}

#[derive(Serialize)]
struct StatsResponse {
    producto: String,
    #[serde(flatten)]
    report: StatsReport,
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(producto): Path<String>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsResponse>, ApiError> {
    let filters = LeadFilter::from_stats_params(&params)?;
    let pool = tenant_pool(&state, &producto).await?;

    let report = match db::stats::fetch(&pool, &filters).await {
        Ok(report) => report,
        Err(err) => return Err(query_error(&state, &producto, err).await),
    };

    Ok(Json(StatsResponse { producto, report }))
}

#[derive(Serialize)]
struct FiltersResponse {
    producto: String,
    campanas: Vec<String>,
}

async fn get_filters(
    State(state): State<Arc<AppState>>,
    Path(producto): Path<String>,
) -> Result<Json<FiltersResponse>, ApiError> {
    let pool = tenant_pool(&state, &producto).await?;

    let campanas = match db::campaigns::distinct(&pool).await {
        Ok(campanas) => campanas,
        Err(err) => return Err(query_error(&state, &producto, err).await),
    };

    Ok(Json(FiltersResponse { producto, campanas }))
}
