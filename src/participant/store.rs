//! Participant status store
//!
//! Single source of truth for journey progress. Every update is
//! merged onto the current status, validated, derived and then persisted on a
//! best-effort basis. Nothing here returns an error to the caller: rejected
//! updates and storage failures are reported through the returned outcomes.
//!
//! # Multiple instances
//!
//! Stores opened over the same storage key follow a last-writer-wins policy.
//! Each store remembers the snapshot it last loaded or wrote;
//! [`ParticipantStore::sync_external`] picks up a newer snapshot written by
//! another instance.

use super::status::{InvariantViolation, ParticipantStatus};
use super::update::StatusUpdate;
use crate::storage::KeyValueStore;
use serde::Serialize;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "eventquorum-participant-status";

/// What happened when the store looked for a saved snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A snapshot was found and adopted as-is
    Restored,
    /// No snapshot under the key
    Missing,
    /// A snapshot exists but could not be parsed
    Corrupt(String),
    /// The storage backend failed
    ReadFailed(String),
}

/// Result of writing to the storage collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "error", rename_all = "camelCase")]
pub enum Persistence {
    /// Snapshot written
    Written,
    /// Snapshot removed
    Removed,
    /// Nothing to persist (rejected update)
    Skipped,
    /// Backend error; the in-memory status was still changed
    Failed(String),
}

impl Persistence {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Result of [`ParticipantStore::update`] and [`ParticipantStore::reset`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// Status after the call
    pub status: ParticipantStatus,

    /// Set when the update was discarded
    pub rejection: Option<InvariantViolation>,

    pub persistence: Persistence,
}

impl UpdateOutcome {
    pub fn is_applied(&self) -> bool {
        self.rejection.is_none()
    }

    pub fn is_persisted(&self) -> bool {
        matches!(
            self.persistence,
            Persistence::Written | Persistence::Removed
        )
    }
}

/// Result of [`ParticipantStore::sync_external`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalChange {
    /// Storage still holds what this store last saw
    Unchanged,
    /// Another instance wrote a snapshot; it is now the current status
    Adopted,
    /// Another instance removed the snapshot; the status is back to defaults
    Cleared,
    /// The stored snapshot could not be parsed; the status was kept
    Corrupt(String),
    /// The storage backend failed; the status was kept
    ReadFailed(String),
}

/// Participant status store over a key-value backend
pub struct ParticipantStore<S: KeyValueStore> {
    storage: S,
    key: String,
    status: ParticipantStatus,
    load_outcome: LoadOutcome,
    /// Raw snapshot last loaded from or written to storage
    last_seen: Option<String>,
}

impl<S: KeyValueStore> ParticipantStore<S> {
    /// Open a store under the default key
    pub fn open(storage: S) -> Self {
        Self::initialize(storage, DEFAULT_STORAGE_KEY)
    }

    /// Open a store and restore the snapshot saved under `key`
    ///
    /// A restored snapshot is trusted verbatim: derived fields and the
    /// live-follow invariant are only re-checked by the next update.
    pub fn initialize(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let (status, load_outcome, last_seen) = match storage.get(&key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => {
                match serde_json::from_str::<ParticipantStatus>(&raw) {
                    Ok(status) => {
                        tracing::debug!(key = %key, step = %status.current_step, "Restored participant status");
                        if !status.is_consistent() {
                            tracing::warn!(key = %key, "Restored participant status is inconsistent");
                        }
                        (status, LoadOutcome::Restored, Some(raw))
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Stored participant status is unreadable, using defaults");
                        (ParticipantStatus::default(), LoadOutcome::Corrupt(e.to_string()), None)
                    }
                }
            }
            Ok(_) => {
                tracing::debug!(key = %key, "No stored participant status");
                (ParticipantStatus::default(), LoadOutcome::Missing, None)
            }
            Err(e) => {
                tracing::warn!(key = %key, backend = storage.backend_name(), error = %e, "Failed to read participant status, using defaults");
                (ParticipantStatus::default(), LoadOutcome::ReadFailed(e.to_string()), None)
            }
        };

        Self {
            storage,
            key,
            status,
            load_outcome,
            last_seen,
        }
    }

    /// Current status
    pub fn status(&self) -> &ParticipantStatus {
        &self.status
    }

    /// How the status was obtained when the store was opened
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give back the storage backend
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Merge `update`, validate, derive and persist
    ///
    /// An update that confirms live follow or changes the participation type
    /// is discarded in full when the candidate ends up with live follow but
    /// no online participation; the previous status is returned unchanged.
    /// Other updates are always applied, even over an inconsistent
    /// snapshot.
    pub fn update(&mut self, update: StatusUpdate) -> UpdateOutcome {
        let mut candidate = update.merge_into(&self.status);

        let violation = if update.affects_live_follow() {
            candidate.live_follow_violation()
        } else {
            None
        };

        if let Some(violation) = violation {
            tracing::warn!(key = %self.key, %violation, "Rejected participant status update");
            return UpdateOutcome {
                status: self.status.clone(),
                rejection: Some(violation),
                persistence: Persistence::Skipped,
            };
        }

        candidate.derive();

        let persistence = self.persist(&candidate);
        self.status = candidate;

        tracing::info!(
            key = %self.key,
            step = %self.status.current_step,
            section = %self.status.current_section,
            "Participant status updated"
        );

        UpdateOutcome {
            status: self.status.clone(),
            rejection: None,
            persistence,
        }
    }

    /// Back to defaults, removing the stored snapshot
    pub fn reset(&mut self) -> UpdateOutcome {
        self.status = ParticipantStatus::default();

        let persistence = match self.storage.remove(&self.key) {
            Ok(()) => {
                self.last_seen = None;
                Persistence::Removed
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to clear participant status");
                Persistence::Failed(e.to_string())
            }
        };

        tracing::info!(key = %self.key, "Participant status reset");

        UpdateOutcome {
            status: self.status.clone(),
            rejection: None,
            persistence,
        }
    }

    /// Pick up a snapshot written or removed by another instance
    pub fn sync_external(&mut self) -> ExternalChange {
        let raw = match self.storage.get(&self.key) {
            Ok(raw) => raw.filter(|r| !r.trim().is_empty()),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read participant status");
                return ExternalChange::ReadFailed(e.to_string());
            }
        };

        match raw {
            None if self.last_seen.is_none() => ExternalChange::Unchanged,
            None => {
                tracing::info!(key = %self.key, "Participant status cleared by another instance");
                self.status = ParticipantStatus::default();
                self.last_seen = None;
                ExternalChange::Cleared
            }
            Some(raw) if self.last_seen.as_deref() == Some(raw.as_str()) => {
                ExternalChange::Unchanged
            }
            Some(raw) => match serde_json::from_str::<ParticipantStatus>(&raw) {
                Ok(status) => {
                    tracing::info!(key = %self.key, step = %status.current_step, "Adopted participant status from another instance");
                    self.status = status;
                    self.last_seen = Some(raw);
                    ExternalChange::Adopted
                }
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "Stored participant status is unreadable");
                    ExternalChange::Corrupt(e.to_string())
                }
            },
        }
    }

    fn persist(&mut self, status: &ParticipantStatus) -> Persistence {
        let raw = match serde_json::to_string(status) {
            Ok(raw) => raw,
            Err(e) => return Persistence::Failed(e.to_string()),
        };

        match self.storage.set(&self.key, &raw) {
            Ok(()) => {
                self.last_seen = Some(raw);
                Persistence::Written
            }
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    backend = self.storage.backend_name(),
                    error = %e,
                    "Failed to save participant status"
                );
                Persistence::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::status::{ParticipationType, Section, Step};
    use crate::participant::update::{complete_payment, confirm_live_follow, confirm_presence};
    use crate::storage::MemoryStore;
    use crate::{ParticipantError, Result};

    /// Backend whose reads and writes can be made to fail
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(ParticipantError::Storage("read refused".into()));
            }
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(ParticipantError::Storage("quota exceeded".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            if self.fail_writes {
                return Err(ParticipantError::Storage("remove refused".into()));
            }
            self.inner.remove(key)
        }

        fn backend_name(&self) -> &'static str {
            "flaky"
        }
    }

    fn online_live_store() -> ParticipantStore<MemoryStore> {
        let mut store = ParticipantStore::open(MemoryStore::new());
        store.update(confirm_presence(ParticipationType::Online));
        store.update(complete_payment());
        store.update(confirm_live_follow());
        store
    }

    #[test]
    fn test_fresh_store_has_defaults() {
        let store = ParticipantStore::open(MemoryStore::new());
        assert_eq!(store.status(), &ParticipantStatus::default());
        assert_eq!(store.load_outcome(), &LoadOutcome::Missing);
        assert_eq!(store.key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_journey_scenario() {
        let mut store = ParticipantStore::open(MemoryStore::new());

        let outcome = store.update(confirm_presence(ParticipationType::Online));
        assert!(outcome.is_applied());
        assert_eq!(outcome.status.current_section, Section::Online);
        assert_eq!(outcome.status.current_step, Step::Confirmed);

        let outcome = store.update(complete_payment());
        assert_eq!(outcome.status.current_step, Step::Paid);

        let outcome = store.update(confirm_live_follow());
        assert_eq!(outcome.status.current_step, Step::LiveReady);

        let before = store.status().clone();
        let outcome = store.update(
            StatusUpdate::new()
                .live_follow(true)
                .participation(ParticipationType::InPerson),
        );
        assert!(!outcome.is_applied());
        assert_eq!(outcome.persistence, Persistence::Skipped);
        assert_eq!(outcome.status, before);
        assert_eq!(store.status().current_step, Step::LiveReady);
        assert_eq!(
            store.status().participation_type,
            Some(ParticipationType::Online)
        );
    }

    #[test]
    fn test_live_follow_without_participation_rejected() {
        let mut store = ParticipantStore::open(MemoryStore::new());
        let outcome = store.update(confirm_live_follow());

        assert_eq!(
            outcome.rejection,
            Some(InvariantViolation::LiveFollowRequiresOnline {
                participation_type: None
            })
        );
        assert_eq!(store.status(), &ParticipantStatus::default());
        assert!(store.storage().is_empty());
    }

    #[test]
    fn test_switching_to_in_person_after_live_follow_rejected() {
        let mut store = online_live_store();
        let before = store.status().clone();

        let outcome = store.update(StatusUpdate::new().participation(ParticipationType::InPerson));
        assert!(!outcome.is_applied());
        assert_eq!(store.status(), &before);
    }

    #[test]
    fn test_unsetting_a_flag_falls_back() {
        let mut store = ParticipantStore::open(MemoryStore::new());
        store.update(confirm_presence(ParticipationType::InPerson));
        store.update(complete_payment());
        assert_eq!(store.status().current_step, Step::Paid);

        let outcome = store.update(StatusUpdate::new().paid(false));
        assert_eq!(outcome.status.current_step, Step::Confirmed);
    }

    #[test]
    fn test_clearing_participation_resets_section() {
        let mut store = ParticipantStore::open(MemoryStore::new());
        store.update(confirm_presence(ParticipationType::InPerson));
        assert_eq!(store.status().current_section, Section::InPerson);

        let outcome = store.update(StatusUpdate::new().clear_participation());
        assert_eq!(outcome.status.participation_type, None);
        assert_eq!(outcome.status.current_section, Section::Initial);
        assert_eq!(outcome.status.current_step, Step::Confirmed);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut store = ParticipantStore::open(MemoryStore::new());
        let update = confirm_presence(ParticipationType::Online).paid(true);

        let first = store.update(update);
        let second = store.update(update);
        assert_eq!(first.status, second.status);
    }

    #[test]
    fn test_update_persists_snapshot() {
        let storage = MemoryStore::new();
        let mut store = ParticipantStore::open(storage.clone());
        let outcome = store.update(confirm_presence(ParticipationType::Online));
        assert!(outcome.is_persisted());

        let raw = storage.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let saved: ParticipantStatus = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved, outcome.status);
    }

    #[test]
    fn test_reload_round_trip() {
        let storage = MemoryStore::new();
        let expected = {
            let mut store = ParticipantStore::open(storage.clone());
            store.update(confirm_presence(ParticipationType::Online));
            store.update(complete_payment()).status
        };

        let reloaded = ParticipantStore::open(storage);
        assert_eq!(reloaded.load_outcome(), &LoadOutcome::Restored);
        assert_eq!(reloaded.status(), &expected);
    }

    #[test]
    fn test_reset_clears_storage() {
        let storage = MemoryStore::new();
        let mut store = ParticipantStore::open(storage.clone());
        store.update(confirm_presence(ParticipationType::Online));

        let outcome = store.reset();
        assert_eq!(outcome.status, ParticipantStatus::default());
        assert_eq!(outcome.persistence, Persistence::Removed);
        assert!(storage.is_empty());

        let reloaded = ParticipantStore::open(storage);
        assert_eq!(reloaded.status(), &ParticipantStatus::default());
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_defaults() {
        let mut storage = MemoryStore::new();
        storage.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();

        let store = ParticipantStore::open(storage);
        assert!(matches!(store.load_outcome(), LoadOutcome::Corrupt(_)));
        assert_eq!(store.status(), &ParticipantStatus::default());
    }

    #[test]
    fn test_null_and_empty_snapshots() {
        let mut storage = MemoryStore::new();
        storage.set(DEFAULT_STORAGE_KEY, "null").unwrap();
        let store = ParticipantStore::open(storage.clone());
        assert!(matches!(store.load_outcome(), LoadOutcome::Corrupt(_)));

        storage.set(DEFAULT_STORAGE_KEY, "").unwrap();
        let store = ParticipantStore::open(storage);
        assert_eq!(store.load_outcome(), &LoadOutcome::Missing);
    }

    #[test]
    fn test_inconsistent_snapshot_loaded_verbatim() {
        let mut storage = MemoryStore::new();
        storage
            .set(
                DEFAULT_STORAGE_KEY,
                r#"{"hasConfirmedPresence":true,"participationType":"inPerson","currentSection":"initial","hasPaidActivities":false,"hasConfirmedLiveFollow":true,"currentStep":"initial"}"#,
            )
            .unwrap();

        let mut store = ParticipantStore::open(storage);
        assert_eq!(store.load_outcome(), &LoadOutcome::Restored);
        assert!(store.status().has_confirmed_live_follow);
        assert_eq!(store.status().current_step, Step::Initial);
        assert_eq!(store.status().current_section, Section::Initial);

        // Updates that leave live follow and participation alone go through
        let outcome = store.update(complete_payment());
        assert!(outcome.is_applied());
        assert!(outcome.is_persisted());
        assert_eq!(outcome.status.current_section, Section::InPerson);
        assert_eq!(outcome.status.current_step, Step::LiveReady);
        assert!(outcome.status.has_paid_activities);

        // Re-confirming presence touches the participation type and is checked
        let outcome = store.update(confirm_presence(ParticipationType::InPerson));
        assert!(!outcome.is_applied());

        // Clearing live follow heals the snapshot
        let outcome = store.update(StatusUpdate::new().live_follow(false));
        assert!(outcome.is_applied());
        assert_eq!(outcome.status.current_step, Step::Paid);
        assert!(outcome.status.is_consistent());
    }

    #[test]
    fn test_outcome_json_reports_rejection_and_persistence() {
        let mut store = ParticipantStore::open(MemoryStore::new());

        let rejected = serde_json::to_value(store.update(confirm_live_follow())).unwrap();
        assert_eq!(rejected["rejection"]["kind"], "liveFollowRequiresOnline");
        assert_eq!(rejected["rejection"]["participationType"], serde_json::Value::Null);
        assert_eq!(rejected["persistence"]["result"], "skipped");
        assert_eq!(rejected["status"]["currentStep"], "initial");

        let applied = serde_json::to_value(store.update(complete_payment())).unwrap();
        assert_eq!(applied["rejection"], serde_json::Value::Null);
        assert_eq!(applied["persistence"]["result"], "written");
        assert_eq!(applied["status"]["currentStep"], "paid");

        let failed = serde_json::to_value(UpdateOutcome {
            status: ParticipantStatus::default(),
            rejection: None,
            persistence: Persistence::Failed("quota exceeded".into()),
        })
        .unwrap();
        assert_eq!(failed["persistence"]["result"], "failed");
        assert_eq!(failed["persistence"]["error"], "quota exceeded");
    }

    #[test]
    fn test_read_failure_falls_back_to_defaults() {
        let storage = FlakyStore {
            fail_reads: true,
            ..Default::default()
        };
        let store = ParticipantStore::open(storage);
        assert!(matches!(store.load_outcome(), LoadOutcome::ReadFailed(_)));
        assert_eq!(store.status(), &ParticipantStatus::default());
    }

    #[test]
    fn test_write_failure_keeps_in_memory_change() {
        let storage = FlakyStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut store = ParticipantStore::open(storage);

        let outcome = store.update(confirm_presence(ParticipationType::Online));
        assert!(outcome.is_applied());
        assert!(!outcome.is_persisted());
        assert!(matches!(outcome.persistence, Persistence::Failed(_)));
        assert_eq!(store.status().current_step, Step::Confirmed);

        let outcome = store.reset();
        assert!(!outcome.persistence.is_ok());
        assert_eq!(store.status(), &ParticipantStatus::default());
    }

    #[test]
    fn test_sync_external_adopts_other_writer() {
        let storage = MemoryStore::new();
        let mut first = ParticipantStore::open(storage.clone());
        let mut second = ParticipantStore::open(storage);

        assert_eq!(first.sync_external(), ExternalChange::Unchanged);

        second.update(confirm_presence(ParticipationType::Online));
        assert_eq!(first.sync_external(), ExternalChange::Adopted);
        assert_eq!(first.status(), second.status());
        assert_eq!(first.sync_external(), ExternalChange::Unchanged);

        // Last writer wins
        first.update(complete_payment());
        assert_eq!(second.sync_external(), ExternalChange::Adopted);
        assert_eq!(second.status().current_step, Step::Paid);

        second.reset();
        assert_eq!(first.sync_external(), ExternalChange::Cleared);
        assert_eq!(first.status(), &ParticipantStatus::default());
    }

    #[test]
    fn test_sync_external_keeps_status_on_corrupt_snapshot() {
        let mut storage = MemoryStore::new();
        let mut store = ParticipantStore::open(storage.clone());
        store.update(confirm_presence(ParticipationType::InPerson));
        let before = store.status().clone();

        storage.set(DEFAULT_STORAGE_KEY, "garbage").unwrap();
        assert!(matches!(store.sync_external(), ExternalChange::Corrupt(_)));
        assert_eq!(store.status(), &before);
    }

    #[test]
    fn test_custom_key() {
        let storage = MemoryStore::new();
        let mut store = ParticipantStore::initialize(storage.clone(), "event-42");
        store.update(confirm_presence(ParticipationType::Online));

        assert!(storage.get("event-42").unwrap().is_some());
        assert!(storage.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }
}
