//! Persistence gateway between the handle store and a durable slot.
//!
//! # Responsibility
//! - Restore the store from its slot at construction time.
//! - Write the full state back after every commit.
//!
//! # Invariants
//! - Restore never fails: an empty slot or any read/decode error yields an
//!   empty collection.
//! - Write failures are logged and dropped; the in-memory commit stands.
//! - The persisted document is `{ "handles": { "items": [...] } }`.
//! - Usernames never appear in log events.

use crate::config::CoreConfig;
use crate::persistence::memory_slot::MemorySlot;
use crate::persistence::sqlite_slot::SqliteSlot;
use crate::persistence::{KeyValueSlot, SlotError};
use crate::state::reducer::HandlesState;
use crate::state::store::{CommitObserver, HandleStore};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key used when the host does not configure one.
pub const DEFAULT_STORAGE_KEY: &str = "social_handles";

/// Gateway-internal failure. Never surfaced past the gateway's public
/// restore/commit paths.
#[derive(Debug)]
pub enum SnapshotError {
    Slot(SlotError),
    Decode(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Slot(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "malformed snapshot: {err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Slot(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<SlotError> for SnapshotError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

#[derive(Serialize)]
struct PersistedRootRef<'a> {
    handles: &'a HandlesState,
}

#[derive(Deserialize)]
struct PersistedRoot {
    handles: HandlesState,
}

/// Observer that mirrors every committed state into `slot` under `key`.
pub struct PersistenceGateway<S: KeyValueSlot> {
    slot: S,
    key: String,
}

impl<S: KeyValueSlot> PersistenceGateway<S> {
    pub fn new(slot: S, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    /// Reads and decodes the stored snapshot.
    ///
    /// Returns `Ok(None)` when the slot has never been written.
    pub fn read_snapshot(&self) -> Result<Option<HandlesState>, SnapshotError> {
        let Some(raw) = self.slot.read(&self.key)? else {
            return Ok(None);
        };
        let root: PersistedRoot = serde_json::from_str(&raw).map_err(SnapshotError::Decode)?;
        Ok(Some(root.handles))
    }

    /// Restores the stored state, falling back to an empty collection.
    pub fn restore(&self) -> HandlesState {
        match self.read_snapshot() {
            Ok(Some(state)) => {
                info!(
                    "event=snapshot_restore module=persistence status=ok key={} count={}",
                    self.key,
                    state.len()
                );
                state
            }
            Ok(None) => {
                info!(
                    "event=snapshot_restore module=persistence status=empty key={}",
                    self.key
                );
                HandlesState::default()
            }
            Err(err) => {
                warn!(
                    "event=snapshot_restore module=persistence status=fallback key={} error={}",
                    self.key, err
                );
                HandlesState::default()
            }
        }
    }

    /// Encodes `state` and overwrites the slot.
    pub fn save(&mut self, state: &HandlesState) -> Result<(), SnapshotError> {
        let document = serde_json::to_string(&PersistedRootRef { handles: state })
            .map_err(SnapshotError::Encode)?;
        self.slot.write(&self.key, &document)?;
        Ok(())
    }
}

impl<S: KeyValueSlot> CommitObserver for PersistenceGateway<S> {
    fn on_commit(&mut self, state: &HandlesState) {
        if let Err(err) = self.save(state) {
            error!(
                "event=snapshot_save module=persistence status=error key={} count={} error={}",
                self.key,
                state.len(),
                err
            );
        }
    }
}

/// Builds a store restored from `slot` with write-through registered.
pub fn open_persistent_store<S>(slot: S, key: impl Into<String>) -> HandleStore
where
    S: KeyValueSlot + 'static,
{
    let gateway = PersistenceGateway::new(slot, key);
    let mut store = HandleStore::with_state(gateway.restore());
    store.subscribe(Box::new(gateway));
    store
}

/// Convenience wiring for simple hosts: SQLite slot at `config.db_path`.
///
/// When the database cannot be opened the store still starts, backed by an
/// in-process slot, so changes last only for this process.
pub fn open_default_store(config: &CoreConfig) -> HandleStore {
    match SqliteSlot::open(&config.db_path) {
        Ok(slot) => open_persistent_store(slot, config.storage_key.as_str()),
        Err(err) => {
            warn!(
                "event=store_open module=persistence status=degraded path={} error={}",
                config.db_path.display(),
                err
            );
            open_persistent_store(MemorySlot::new(), config.storage_key.as_str())
        }
    }
}
