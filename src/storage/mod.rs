//! Storage layer
//!
//! Key-value persistence for participant snapshots. The store reads one entry
//! when a session starts and writes or removes it on every update/reset.
//!
//! Backends:
//! - `MemoryStore`: process-local map, shared between clones
//! - `FileStore`: one JSON file per key in a directory
//! - `SqliteStore`: key-value table in a SQLite database

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::Result;

/// Key-value collaborator used by the participant store
///
/// Implementations should make `set` atomic with respect to concurrent
/// readers; the store itself performs no locking.
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Short backend name for diagnostics
    fn backend_name(&self) -> &'static str;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
