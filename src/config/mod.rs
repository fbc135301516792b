//! Configuration system
//!
//! Loads ~/.config/eventquorum/config.yaml, which selects where participant
//! snapshots are stored:
//! - Storage backend (file, sqlite, memory)
//! - Storage location
//! - Storage key

mod eventquorum_config;
pub mod validation;

pub use eventquorum_config::{EventQuorumConfig, StorageBackend, StorageConfig};
pub use validation::{validate_config, validate_config_result, ValidationError};
