//! Certificate Catalog API
//!
//! HTTP front for the certificate catalog. Lists active certificates and
//! streams a generated ZIP bundle per certificate.
//!
//! ## Endpoints
//!
//! - `GET /api/certificates` - List active certificates
//! - `GET /api/download/{id}` - Download certificate bundle as ZIP
//! - `GET /health` - Health check
//!
//! Any other path is served from the static front-end directory.

pub mod config;
pub mod handlers;
pub mod stream;

use axum::{routing::get, Router};
use cert_catalog::Catalog;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Application state shared across handlers
pub struct AppState {
    /// Read-only certificate catalog, built once at startup
    pub catalog: Catalog,

    /// Directory holding the front-end assets
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create new application state
    pub fn new(catalog: Catalog, static_dir: PathBuf) -> Self {
        Self {
            catalog,
            static_dir,
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/api/certificates",
            get(handlers::list_certificates_handler),
        )
        .route("/api/download/{id}", get(handlers::download_handler))
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
