//! Commands accepted by the handle store and the builder that prepares them.
//!
//! # Responsibility
//! - Describe every mutation the store understands as a plain value.
//! - Inject externally sourced values (IDs, timestamps) before reduction, so
//!   the reducer stays deterministic.
//!
//! # Invariants
//! - `HandleCommand::Add` carries a `PreparedHandle`, which only
//!   `CommandBuilder` can create: ID assigned, timestamp set, username
//!   normalized.
//! - A prepared handle is consumed by the dispatch that commits it.
//! - Generated IDs combine a millisecond time component with ten random
//!   base36 digits; collisions are not checked.

use crate::model::handle::{normalize_username, Handle, HandleId};
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_ID_DIGITS: u32 = 10;

/// Partial update for an existing handle. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlePatch {
    pub platform: Option<String>,
    pub username: Option<String>,
}

impl HandlePatch {
    pub fn platform(platform: impl Into<String>) -> Self {
        Self {
            platform: Some(platform.into()),
            username: None,
        }
    }

    pub fn username(username: impl Into<String>) -> Self {
        Self {
            platform: None,
            username: Some(username.into()),
        }
    }

    /// Returns whether the patch would leave a handle unchanged.
    pub fn is_empty(&self) -> bool {
        self.platform.is_none() && self.username.is_none()
    }
}

/// Handle produced by `CommandBuilder`, ready to be appended.
///
/// Fields stay private to this module, so a raw `Handle` cannot be smuggled
/// into the collection through `HandleCommand::Add`:
///
/// ```compile_fail
/// use handles_core::{Handle, HandleCommand};
///
/// let raw = Handle {
///     id: "1".to_string(),
///     platform: "twitter".to_string(),
///     username: "@raw".to_string(),
///     created_at: "t1".to_string(),
/// };
/// let _ = HandleCommand::Add(raw);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct PreparedHandle(Handle);

impl PreparedHandle {
    pub fn handle(&self) -> &Handle {
        &self.0
    }

    pub(crate) fn into_handle(self) -> Handle {
        self.0
    }
}

/// Named request to change the handle collection.
#[derive(Debug, PartialEq, Eq)]
pub enum HandleCommand {
    /// Append a prepared handle. Build it with `CommandBuilder::add`.
    Add(PreparedHandle),
    /// Overwrite the supplied fields of the handle with this ID.
    Update { id: HandleId, patch: HandlePatch },
    /// Drop the handle with this ID.
    Remove(HandleId),
    /// Replace the collection verbatim; `None` means empty.
    Load(Option<Vec<Handle>>),
    /// Replace the collection with an empty one.
    ClearAll,
}

impl HandleCommand {
    /// Stable command name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Update { .. } => "update",
            Self::Remove(_) => "remove",
            Self::Load(_) => "load",
            Self::ClearAll => "clear_all",
        }
    }
}

/// Prepares commands that need time or randomness.
///
/// Sources are plain function pointers so tests can pin IDs and timestamps
/// without a mocking layer.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder {
    next_id: fn() -> HandleId,
    now: fn() -> String,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self {
            next_id: new_handle_id,
            now: now_iso8601,
        }
    }
}

impl CommandBuilder {
    /// Creates a builder with custom ID and clock sources.
    ///
    /// A pinned ID source is for tests; uniqueness is then up to the caller.
    pub fn with_sources(next_id: fn() -> HandleId, now: fn() -> String) -> Self {
        Self { next_id, now }
    }

    /// Builds a new handle with a fresh ID, creation timestamp and normalized
    /// username.
    pub fn new_handle(&self, platform: impl Into<String>, username: &str) -> PreparedHandle {
        PreparedHandle(Handle {
            id: (self.next_id)(),
            platform: platform.into(),
            username: normalize_username(username),
            created_at: (self.now)(),
        })
    }

    /// Builds an `Add` command for a fresh handle.
    pub fn add(&self, platform: impl Into<String>, username: &str) -> HandleCommand {
        HandleCommand::Add(self.new_handle(platform, username))
    }
}

/// Generates a new handle ID: base36 epoch milliseconds followed by ten
/// random base36 digits.
pub fn new_handle_id() -> HandleId {
    let millis = u128::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let random = Uuid::new_v4().as_u128() % 36u128.pow(RANDOM_ID_DIGITS);

    let mut id = encode_base36(millis, 1);
    id.push_str(&encode_base36(random, RANDOM_ID_DIGITS as usize));
    id
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2025-10-17T08:30:00.123Z`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn encode_base36(mut value: u128, min_width: usize) -> String {
    let mut digits = Vec::new();
    loop {
        digits.push(char::from(BASE36_ALPHABET[(value % 36) as usize]));
        value /= 36;
        if value == 0 {
            break;
        }
    }
    while digits.len() < min_width {
        digits.push('0');
    }
    digits.iter().rev().collect()
}
