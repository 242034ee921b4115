//! Configuration management for the Certificate Catalog API
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use cert_catalog::Catalog;
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Directory containing the front-end assets
    pub static_dir: PathBuf,

    /// JSON catalog to load instead of the built-in one
    pub catalog_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            api_host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,

            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "./public".to_string())
                .into(),

            catalog_file: env::var("CATALOG_FILE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    /// Build the catalog from the configured file, or the built-in records
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog_file {
            Some(path) => Catalog::from_json_file(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display())),
            None => Catalog::seeded().context("Failed to build the built-in catalog"),
        }
    }

    /// Warn when the front-end directory is missing
    pub fn check_static_dir(&self) {
        // The API still works without the front end
        if !self.static_dir.exists() {
            tracing::warn!(
                "Static directory does not exist: {}",
                self.static_dir.display()
            );
        }
    }
}
