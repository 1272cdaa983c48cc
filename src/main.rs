// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::query_service::QueryService;
use crate::application::series_source::load_store;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::csv_source::CsvSeriesSource;
use crate::infrastructure::timestamp::format_timestamp_ms;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, query_series, series_bounds};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = load_app_config()?;

    // Initialize tracing, RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let policy = config.decimation.to_policy()?;

    // Load the series once; a missing, empty or unsorted file stops startup
    let source = CsvSeriesSource::new(&config.data.path);
    let store = Arc::new(load_store(&source).await?);

    // Create services (application layer)
    let query_service = QueryService::new(store, policy)?;
    let bounds = query_service.bounds();
    tracing::info!(
        "Serving series from {} to {} with {} decimation tiers",
        format_timestamp_ms(bounds.start_ms),
        format_timestamp_ms(bounds.end_ms),
        query_service.policy().tiers().len()
    );

    // Create application state
    let state = Arc::new(AppState { query_service });

    // Build router (presentation layer)
    // Compression is negotiated per response in the handlers
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/series/bounds", get(series_bounds))
        .route("/series/query", get(query_series))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Starting sensor-viewport service on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    Ok(())
}
