//! Certificate Catalog API Service
//!
//! Serves the certificate catalog and streams certificate bundles.

use anyhow::{Context, Result};
use cert_catalog_api::{config::Config, create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cert_catalog_api=debug,cert_catalog=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Certificate Catalog API Service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded - listening on {}",
        config.api_address()
    );

    // Build the catalog once; it is read-only from here on
    let catalog = config.load_catalog()?;
    info!(
        "Catalog ready: {} certificates ({} active)",
        catalog.len(),
        catalog.active_count()
    );

    config.check_static_dir();
    info!("Static directory: {}", config.static_dir.display());

    let state = AppState::new(catalog, config.static_dir.clone());
    let app = create_router(state);

    let listener = TcpListener::bind(&config.api_address())
        .await
        .with_context(|| format!("Failed to bind to {}", config.api_address()))?;

    info!("Certificate Catalog API listening on http://{}", config.api_address());
    info!("API endpoints:");
    info!("  GET /api/certificates - List active certificates");
    info!("  GET /api/download/{{id}} - Download certificate bundle");
    info!("  GET /health - Health check");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
