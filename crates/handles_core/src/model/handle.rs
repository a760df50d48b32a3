//! Handle domain model.
//!
//! # Responsibility
//! - Define the canonical platform + username record.
//! - Own the username normalization rule shared by every mutation path.
//! - Provide caller-side input checks used before commands are issued.
//!
//! # Invariants
//! - `id` is assigned once at creation and never rewritten.
//! - `username` never starts with `@` once it passed through
//!   `normalize_username`.
//! - `created_at` is an ISO-8601 UTC string and is never touched by updates.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque identifier for a handle record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type HandleId = String;

/// Platforms offered to users when adding or editing a handle.
///
/// The core accepts any platform string; this list only drives pickers and
/// the `is_recognized_platform` helper.
pub const RECOGNIZED_PLATFORMS: [&str; 5] = ["twitter", "instagram", "facebook", "linkedin", "other"];

/// Platform preselected by hosts that offer a picker.
pub const DEFAULT_PLATFORM: &str = RECOGNIZED_PLATFORMS[0];

/// One tracked social-media identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handle {
    /// Opaque stable ID, unique within a collection.
    pub id: HandleId,
    /// Platform name, usually one of `RECOGNIZED_PLATFORMS`.
    pub platform: String,
    /// Username without a leading `@`.
    pub username: String,
    /// Serialized as `createdAt` to match the persisted document shape.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Handle {
    /// Returns the `platform: @username` label used by list views.
    pub fn display_label(&self) -> String {
        format!("{}: @{}", self.platform, self.username)
    }
}

/// Strips at most one leading `@` from `username`.
///
/// Applying it to an already normalized value is a no-op.
pub fn normalize_username(username: &str) -> String {
    username.strip_prefix('@').unwrap_or(username).to_string()
}

/// Returns whether `platform` is one of the platforms offered to users.
pub fn is_recognized_platform(platform: &str) -> bool {
    RECOGNIZED_PLATFORMS.contains(&platform)
}

/// Input rejected before a command reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    EmptyUsername,
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "Please enter a username"),
        }
    }
}

impl Error for InputError {}

/// Trims raw username input and rejects blank values.
///
/// The store performs no validation of its own, so hosts call this before
/// issuing add/update commands.
pub fn validate_username_input(raw: &str) -> Result<String, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyUsername);
    }
    Ok(trimmed.to_string())
}
