//! Certificate Catalog
//!
//! Read-only catalog of certificate-like records together with the pipeline
//! that turns one record into a downloadable ZIP bundle.
//!
//! ## Pipeline
//!
//! - [`Catalog`] resolves an id to an active [`CertificateRecord`]
//! - [`payload`] renders the credential, profile and instructions documents
//! - [`archive`] streams those documents into a single deflated ZIP

pub mod archive;
pub mod error;
pub mod payload;
pub mod record;
pub mod store;

pub use archive::{archive_file_name, write_archive, INSTRUCTIONS_FILE_NAME};
pub use error::{CatalogError, Result};
pub use record::{CertificateRecord, CertificateSummary, CertificateType};
pub use store::Catalog;
