//! Handle domain model.
//!
//! # Responsibility
//! - Define the canonical record tracked by the state container.
//! - Keep normalization rules next to the data they constrain.
//!
//! # Invariants
//! - Every handle is identified by a stable `HandleId`.

pub mod handle;
