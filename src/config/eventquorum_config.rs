//! EventQuorum configuration file handling
//!
//! Loads and manages ~/.config/eventquorum/config.yaml.

use crate::participant::DEFAULT_STORAGE_KEY;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, SqliteStore};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage backend for participant snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One JSON file per key in a directory
    #[default]
    File,
    /// Key-value table in a SQLite database file
    Sqlite,
    /// Nothing survives the process
    Memory,
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory (file backend) or database file (sqlite backend)
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Key the participant snapshot is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn config_dir() -> PathBuf {
    // Always use ~/.config for consistency across platforms (macOS, Linux)
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("eventquorum");
    path
}

fn default_storage_path() -> PathBuf {
    config_dir().join("storage")
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            key: default_storage_key(),
        }
    }
}

impl StorageConfig {
    /// Open the configured backend
    pub fn open(&self) -> Result<Box<dyn KeyValueStore>> {
        tracing::debug!(backend = ?self.backend, path = %self.path.display(), "Opening storage");
        let storage: Box<dyn KeyValueStore> = match self.backend {
            StorageBackend::File => Box::new(FileStore::open(&self.path)?),
            StorageBackend::Sqlite => Box::new(SqliteStore::open(&self.path)?),
            StorageBackend::Memory => Box::new(MemoryStore::new()),
        };
        Ok(storage)
    }
}

/// EventQuorum configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQuorumConfig {
    #[serde(default)]
    pub storage: StorageConfig,
}

impl EventQuorumConfig {
    /// Configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the default path (~/.config/eventquorum/config.yaml)
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path())
    }

    /// Load from the default path, falling back to defaults when absent
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::ParticipantError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading EventQuorum configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;

        tracing::debug!(
            backend = ?config.storage.backend,
            key = %config.storage.key,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save_default(&self) -> Result<()> {
        self.save(Self::default_path())
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving EventQuorum configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/eventquorum/config.yaml)
    pub fn default_path() -> PathBuf {
        config_dir().join("config.yaml")
    }
}
