//! Participant journey
//!
//! Status model, partial updates, the persistent status store, feature
//! access rules and the session that scopes the store.

pub mod access;
pub mod session;
pub mod status;
pub mod store;
pub mod update;

pub use access::FeatureAccess;
pub use session::Session;
pub use status::{InvariantViolation, ParticipantStatus, ParticipationType, Section, Step};
pub use store::{
    ExternalChange, LoadOutcome, ParticipantStore, Persistence, UpdateOutcome,
    DEFAULT_STORAGE_KEY,
};
pub use update::{complete_payment, confirm_live_follow, confirm_presence, StatusUpdate};
