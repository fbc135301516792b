//! Participant session
//!
//! A session owns the one store for its lifetime. Consumers borrow the store
//! from the session; once the session has ended, access is an error.

use super::store::ParticipantStore;
use crate::storage::KeyValueStore;
use crate::{ParticipantError, Result};

/// Lifetime scope for a participant store
pub struct Session<S: KeyValueStore> {
    store: Option<ParticipantStore<S>>,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session, restoring any snapshot saved under `key`
    pub fn start(storage: S, key: impl Into<String>) -> Self {
        let store = ParticipantStore::initialize(storage, key);
        tracing::debug!(key = store.key(), "Participant session started");
        Self { store: Some(store) }
    }

    /// Wrap an already opened store
    pub fn with_store(store: ParticipantStore<S>) -> Self {
        Self { store: Some(store) }
    }

    pub fn is_active(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Result<&ParticipantStore<S>> {
        self.store.as_ref().ok_or(ParticipantError::SessionEnded)
    }

    pub fn store_mut(&mut self) -> Result<&mut ParticipantStore<S>> {
        self.store.as_mut().ok_or(ParticipantError::SessionEnded)
    }

    /// End the session, handing back the store if it was still active
    pub fn end(&mut self) -> Option<ParticipantStore<S>> {
        let store = self.store.take();
        if let Some(ref store) = store {
            tracing::debug!(key = store.key(), "Participant session ended");
        }
        store
    }
}
