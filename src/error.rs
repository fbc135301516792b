//! Error types for EventQuorum
//!
//! Store operations never surface these to callers; they are returned by the
//! storage backends, the configuration layer and the CLI, and the store
//! downgrades storage errors into soft persistence outcomes.

use thiserror::Error;

/// Result type alias for EventQuorum operations
pub type Result<T> = std::result::Result<T, ParticipantError>;

/// Error type for EventQuorum operations
#[derive(Error, Debug)]
pub enum ParticipantError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Parsing errors (CLI arguments, enum values)
    #[error("Parse error: {0}")]
    Parse(String),

    /// The session owning the store has ended
    #[error("Participant store accessed outside of an active session")]
    SessionEnded,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// SQLite database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
