//! Configuration validation
//!
//! Checks an EventQuorum configuration for correctness:
//! - Storage key is usable as a file name
//! - Storage path is set for persistent backends
//! - Storage path does not point at the wrong kind of filesystem entry

use super::eventquorum_config::{EventQuorumConfig, StorageBackend};
use crate::ParticipantError;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate an EventQuorum configuration, collecting every problem
pub fn validate_config(config: &EventQuorumConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let storage = &config.storage;

    if storage.key.is_empty() {
        errors.push(ValidationError::new("storage.key", "Storage key cannot be empty"));
    } else if storage.key.starts_with('.')
        || !storage
            .key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        errors.push(ValidationError::new(
            "storage.key",
            format!(
                "Invalid storage key '{}': use letters, digits, '-', '_' or '.'",
                storage.key
            ),
        ));
    }

    if storage.backend != StorageBackend::Memory {
        if storage.path.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "storage.path",
                "A path is required for persistent storage",
            ));
        } else {
            match storage.backend {
                StorageBackend::File if storage.path.is_file() => {
                    errors.push(ValidationError::new(
                        "storage.path",
                        format!("{} is a file, expected a directory", storage.path.display()),
                    ));
                }
                StorageBackend::Sqlite if storage.path.is_dir() => {
                    errors.push(ValidationError::new(
                        "storage.path",
                        format!(
                            "{} is a directory, expected a database file",
                            storage.path.display()
                        ),
                    ));
                }
                _ => {}
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate and convert to a crate error listing every problem
pub fn validate_config_result(config: &EventQuorumConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| format!("  - {}", e)).collect();
        ParticipantError::Config(format!(
            "Configuration validation failed:\n{}",
            messages.join("\n")
        ))
    })
}
