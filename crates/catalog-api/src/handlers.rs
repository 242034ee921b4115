//! API request handlers for catalog operations

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use cert_catalog::{archive_file_name, CatalogError, CertificateSummary};
use std::sync::Arc;
use tracing::{error, info};

use crate::{stream::stream_archive, AppState};

/// Message returned for unknown and revoked certificates alike
pub const NOT_FOUND_MESSAGE: &str = "Certificate not found or revoked";

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn not_found() -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.message
        });

        (self.status, Json(body)).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => ApiError::not_found(),
            other => {
                error!("Catalog error: {}", other);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: other.to_string(),
                }
            }
        }
    }
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "cert-catalog-api"
    }))
}

/// List active certificates in catalog order
pub async fn list_certificates_handler(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<CertificateSummary>> {
    let certificates: Vec<CertificateSummary> = state
        .catalog
        .list_active()
        .into_iter()
        .map(CertificateSummary::from)
        .collect();

    info!("Listing {} active certificates", certificates.len());
    Json(certificates)
}

/// Download a certificate bundle as a streamed ZIP
///
/// The whole segment must be a `u32`; anything else, including a numeric
/// prefix such as `1abc`, is treated like an unknown id.
pub async fn download_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Ok(id) = id.parse::<u32>() else {
        info!("Rejected download for malformed id: {}", id);
        return Err(ApiError::not_found());
    };

    let record = state.catalog.find_active_by_id(id).map_err(|e| {
        info!("Download refused for certificate {}", id);
        ApiError::from(e)
    })?;

    let filename = archive_file_name(record);
    info!("Streaming bundle {} for certificate {}", filename, id);

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, stream_archive(record.clone())).into_response())
}
