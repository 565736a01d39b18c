//! Application configuration.
//!
//! Every section has defaults, so an empty file (or no file at all) gives a
//! working setup: `facturas.csv` in the working directory and PDFs under
//! `output/`.
//!
//! ```toml
//! [store]
//! path = "data/facturas.csv"
//! malformed_rows = "strict"
//!
//! [render]
//! output_dir = "pdf"
//! number_format = { prefix = "F-", width = 5 }
//!
//! [render.company]
//! name = "ACME S.A."
//! tax_id = "NIT: 900123456-7"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::NumberFormat;
use crate::store::MalformedRowPolicy;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Record store location and scan behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// CSV file holding one row per invoice.
    pub path: PathBuf,
    /// Handling of rows whose number is not an integer.
    pub malformed_rows: MalformedRowPolicy,
    /// Keep the highest number in memory between lookups.
    pub cache_high_water: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("facturas.csv"),
            malformed_rows: MalformedRowPolicy::default(),
            cache_high_water: true,
        }
    }
}

/// Printed document settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Issuer shown in the document header.
    pub company: CompanyIdentity,
    /// Directory receiving `invoice_{number}.pdf`; created on demand.
    pub output_dir: PathBuf,
    /// How the invoice number is printed.
    pub number_format: NumberFormat,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            company: CompanyIdentity::default(),
            output_dir: PathBuf::from("output"),
            number_format: NumberFormat::default(),
        }
    }
}

/// Header lines of the issuing company, printed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyIdentity {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub phone: String,
}

impl Default for CompanyIdentity {
    fn default() -> Self {
        Self {
            name: "Mi Empresa S.A.".into(),
            tax_id: "NIT: 123456789-0".into(),
            address: "Dirección: Calle Falsa 123".into(),
            phone: "Teléfono: 555-1234".into(),
        }
    }
}
