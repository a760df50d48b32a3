//! Durable key-value slots and the gateway mirroring the store into them.
//!
//! # Responsibility
//! - Define the slot contract the gateway writes through.
//! - Keep SQL and in-process storage details out of the state container.
//!
//! # Invariants
//! - A slot stores opaque UTF-8 strings; encoding is the gateway's job.
//! - Writes overwrite any previous value under the same key.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gateway;
pub mod memory_slot;
pub mod sqlite_slot;

pub type SlotResult<T> = Result<T, SlotError>;

/// Failure reading or writing a durable slot.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    /// Backend refused the operation (disabled, quota exceeded, ...).
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "slot unavailable: {reason}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string storage addressed by key.
pub trait KeyValueSlot {
    /// Returns the stored value, or `None` when the key was never written.
    fn read(&self, key: &str) -> SlotResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> SlotResult<()>;
}
