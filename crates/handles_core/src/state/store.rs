//! Handle state container.
//!
//! # Responsibility
//! - Own the single authoritative `HandlesState`.
//! - Route commands through the reducer and commit the result.
//! - Notify registered observers synchronously after every commit.
//!
//! # Invariants
//! - Only `dispatch` replaces the held state.
//! - Observers run in registration order, after the new state is visible.
//! - Queries hand out shared borrows only.

use crate::model::handle::{Handle, HandleId};
use crate::state::command::{CommandBuilder, HandleCommand, HandlePatch};
use crate::state::reducer::{reduce, HandlesState};
use log::debug;

/// Callback invoked after each committed transition.
pub trait CommitObserver {
    fn on_commit(&mut self, state: &HandlesState);
}

/// Explicitly constructed container for the handle collection.
#[derive(Default)]
pub struct HandleStore {
    state: HandlesState,
    builder: CommandBuilder,
    observers: Vec<Box<dyn CommitObserver>>,
}

impl HandleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with `state`. Observers are not notified.
    pub fn with_state(state: HandlesState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Replaces the builder used by `add`, typically to pin IDs in tests.
    pub fn with_builder(mut self, builder: CommandBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Registers an observer called after every commit.
    pub fn subscribe(&mut self, observer: Box<dyn CommitObserver>) {
        self.observers.push(observer);
    }

    /// Reduces `command` against the current state and commits the result.
    pub fn dispatch(&mut self, command: HandleCommand) {
        let name = command.name();
        let current = std::mem::take(&mut self.state);
        self.state = reduce(current, command);
        debug!(
            "event=handle_dispatch module=store status=ok command={} count={}",
            name,
            self.state.len()
        );

        for observer in &mut self.observers {
            observer.on_commit(&self.state);
        }
    }

    /// Adds a handle and returns the stored (normalized) entry.
    pub fn add(&mut self, platform: impl Into<String>, username: &str) -> Handle {
        let prepared = self.builder.new_handle(platform, username);
        let stored = prepared.handle().clone();
        self.dispatch(HandleCommand::Add(prepared));
        stored
    }

    /// Applies `patch` to the handle with `id`. Unknown IDs are ignored.
    pub fn update(&mut self, id: impl Into<HandleId>, patch: HandlePatch) {
        self.dispatch(HandleCommand::Update {
            id: id.into(),
            patch,
        });
    }

    /// Removes the handle with `id`. Unknown IDs are ignored.
    pub fn remove(&mut self, id: impl Into<HandleId>) {
        self.dispatch(HandleCommand::Remove(id.into()));
    }

    /// Replaces the collection with `snapshot` verbatim.
    pub fn load(&mut self, snapshot: Option<Vec<Handle>>) {
        self.dispatch(HandleCommand::Load(snapshot));
    }

    pub fn clear_all(&mut self) {
        self.dispatch(HandleCommand::ClearAll);
    }

    /// Current committed state.
    pub fn state(&self) -> &HandlesState {
        &self.state
    }

    /// All handles in insertion order.
    pub fn list_all(&self) -> &[Handle] {
        self.state.items()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Handle> {
        self.state.items().iter().find(|handle| handle.id == id)
    }

    /// Handles on `platform`, in collection order.
    pub fn list_by_platform(&self, platform: &str) -> Vec<&Handle> {
        self.state
            .items()
            .iter()
            .filter(|handle| handle.platform == platform)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}
