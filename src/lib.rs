//! EventQuorum - participant journey state for hybrid conferences
//!
//! Tracks a participant's progress through presence confirmation, activity
//! payment and live-follow unlocking, derives the current journey step, and
//! persists the status across sessions through a key-value backend.
//!
//! # Architecture
//!
//! - **participant**: Status model, partial updates, the status store, feature access, sessions
//! - **storage**: Key-value backends (memory, JSON files, SQLite)
//! - **config**: YAML configuration selecting the storage backend
//! - **logging**: tracing subscriber setup

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod participant;
pub mod storage;
pub mod style;

// Re-exports
pub use error::{ParticipantError, Result};
pub use participant::{
    FeatureAccess, ParticipantStatus, ParticipantStore, ParticipationType, Session, StatusUpdate,
    Step,
};
