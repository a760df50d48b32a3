//! Core state container for tracked social-media handles.
//! This crate owns every mutation rule and the durable snapshot format.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod state;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging_from_config};
pub use model::handle::{
    is_recognized_platform, normalize_username, validate_username_input, Handle, HandleId,
    InputError, DEFAULT_PLATFORM, RECOGNIZED_PLATFORMS,
};
pub use persistence::gateway::{
    open_default_store, open_persistent_store, PersistenceGateway, SnapshotError,
    DEFAULT_STORAGE_KEY,
};
pub use persistence::memory_slot::MemorySlot;
pub use persistence::sqlite_slot::SqliteSlot;
pub use persistence::{KeyValueSlot, SlotError, SlotResult};
pub use state::command::{CommandBuilder, HandleCommand, HandlePatch, PreparedHandle};
pub use state::reducer::{reduce, HandlesState};
pub use state::store::{CommitObserver, HandleStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
