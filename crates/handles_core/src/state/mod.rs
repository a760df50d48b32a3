//! State container: commands, pure reducer and the owning store.
//!
//! # Responsibility
//! - Keep command preparation (time, randomness) apart from reduction.
//! - Expose one explicitly constructed store instead of a global singleton.
//!
//! # See also
//! - `persistence::gateway` for write-through on commit.

pub mod command;
pub mod reducer;
pub mod store;
