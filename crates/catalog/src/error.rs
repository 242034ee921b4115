use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Certificate not found or revoked: {0}")]
    NotFound(u32),

    #[error("Duplicate certificate id in catalog: {0}")]
    DuplicateId(u32),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
