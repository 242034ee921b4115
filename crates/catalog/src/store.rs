//! In-memory catalog store

use crate::error::{CatalogError, Result};
use crate::record::CertificateRecord;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Records served when no catalog file is configured
const SEED_CATALOG: &str = include_str!("seed_catalog.json");

/// Read-only, ordered collection of certificate records
///
/// Built once at startup and shared behind an `Arc`; there is no mutation API.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<CertificateRecord>,
}

impl Catalog {
    /// Create a catalog, keeping the given order
    pub fn new(records: Vec<CertificateRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(CatalogError::DuplicateId(record.id));
            }
        }

        Ok(Self { records })
    }

    /// Parse a JSON array of records
    ///
    /// Dates and types are checked while parsing; ids are checked by [`Catalog::new`].
    pub fn from_json_str(content: &str) -> Result<Self> {
        let records: Vec<CertificateRecord> = serde_json::from_str(content)?;
        Self::new(records)
    }

    /// Load a catalog from a JSON array of records
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&content)?;

        info!("Loaded {} certificates from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Built-in catalog used when no catalog file is configured
    pub fn seeded() -> Result<Self> {
        Self::from_json_str(SEED_CATALOG)
    }

    /// All non-revoked records, in definition order
    pub fn list_active(&self) -> Vec<&CertificateRecord> {
        self.records.iter().filter(|r| r.is_active()).collect()
    }

    /// Look up a non-revoked record
    ///
    /// Revoked and unknown ids both yield [`CatalogError::NotFound`].
    pub fn find_active_by_id(&self, id: u32) -> Result<&CertificateRecord> {
        match self.records.iter().find(|r| r.id == id) {
            Some(record) if record.is_active() => Ok(record),
            Some(_) => {
                debug!("Certificate {} is revoked", id);
                Err(CatalogError::NotFound(id))
            }
            None => Err(CatalogError::NotFound(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_active()).count()
    }
}
