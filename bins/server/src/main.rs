//! Lexbudget API Server
//!
//! Main entry point for the budget statistics service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexbudget_api::{AppState, create_router};
use lexbudget_core::statistics::StatisticsService;
use lexbudget_db::{StatisticsRepository, connect_with};
use lexbudget_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexbudget=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    // Create statistics service over the database record source
    let repository = StatisticsRepository::new(db);
    let statistics = StatisticsService::new(Arc::new(repository), config.statistics.clone());
    info!(
        founding_year = config.statistics.founding_year,
        max_years_ahead = config.statistics.max_years_ahead,
        "Statistics service configured"
    );

    // Create application state
    let state = AppState {
        statistics: Arc::new(statistics),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
