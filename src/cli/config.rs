//! Configuration file structure
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "storage": "file",
//!   "collection": "employees",
//!   "http": { "host": "0.0.0.0", "port": 8000, "cors_origins": [] }
//! }
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;
use crate::store::{EmployeeStore, FileStore, MemoryStore};

/// Which store backs the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Append-only log under `data_dir`
    File,
    /// Process memory; contents are lost on exit
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (default "./data")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage backend (default "file")
    #[serde(default = "default_storage")]
    pub storage: StorageBackend,

    /// Collection name (default "employees")
    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_storage() -> StorageBackend {
    StorageBackend::File
}

fn default_collection() -> String {
    "employees".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: default_storage(),
            collection: default_collection(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::config_error(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.collection.is_empty() {
            return Err(CliError::config_error("collection must not be empty"));
        }

        // Collection names become file names
        if !self
            .collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(CliError::config_error(format!(
                "Invalid collection '{}': only [A-Za-z0-9_-] allowed",
                self.collection
            )));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        Ok(())
    }

    /// Open the configured store
    pub fn open_store(&self) -> CliResult<Arc<dyn EmployeeStore>> {
        let store: Arc<dyn EmployeeStore> = match self.storage {
            StorageBackend::File => Arc::new(FileStore::open(&self.data_dir, &self.collection)?),
            StorageBackend::Memory => Arc::new(MemoryStore::new(&self.collection)),
        };
        Ok(store)
    }
}
