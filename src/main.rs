//! Fleet Dashboard Backend
//!
//! A read-only JSON backend that reshapes a Google Sheets fleet workbook into
//! vehicle listings and dashboard counters.

mod api;
mod auth;
mod cache;
mod config;
mod errors;
mod models;
mod normalize;
mod service;
mod sheets;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use service::DashboardService;
use sheets::{CellGridClient, GoogleSheetsClient, UnavailableSource};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DashboardService>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fleet Dashboard Backend");
    tracing::info!(
        "Spreadsheet id: {}",
        if config.spreadsheet_id.is_some() { "set" } else { "not set" }
    );
    tracing::info!("Vehicle layout: {:?}", config.vehicle_layout);
    tracing::info!("Static directory: {:?}", config.static_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (FLEET_API_PSK). Authentication is disabled!");
    }

    // Missing credentials install the unavailable source
    let source = build_source(&config);

    let service = Arc::new(DashboardService::new(
        source,
        config.vehicle_layout,
        config.cache_ttl,
    ));

    let state = AppState {
        service,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the spreadsheet client, falling back to an unavailable source.
fn build_source(config: &Config) -> Arc<dyn CellGridClient> {
    match GoogleSheetsClient::from_config(config) {
        Ok(client) => {
            tracing::info!("Google Sheets client ready");
            Arc::new(client)
        }
        Err(e) => {
            tracing::error!("Failed to initialize Google Sheets client: {}", e);
            Arc::new(UnavailableSource::new(e.message()))
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();
    let static_dir = state.config.static_dir.clone();

    // Data routes
    let data_routes = Router::new()
        .route("/api/vehicles", get(api::get_vehicles))
        .route("/api/dashboard", get(api::get_dashboard))
        .route("/api/dashboard-data", get(api::get_dashboard_data))
        .route("/api/immo", get(api::get_immo))
        .route("/get_point_fs_data", get(api::get_point_fs_data))
        .route("/get_point_mc_data", get(api::get_point_mc_data))
        .route("/test", get(api::test_sheets))
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Dashboard pages and assets (no auth required)
    let page_routes = Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/point_fs", ServeFile::new(static_dir.join("point_fs.html")))
        .route_service("/point_mc", ServeFile::new(static_dir.join("point_mc.html")))
        .route_service("/favicon.ico", ServeFile::new(static_dir.join("favicon.ico")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .route("/health", get(health_check));

    Router::new()
        .merge(data_routes)
        .merge(page_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
