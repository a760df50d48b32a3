//! Pure transition function for the handle collection.
//!
//! # Invariants
//! - A state value held elsewhere is never changed by a transition.
//! - No-op transitions (unknown ID, empty patch) return the input storage
//!   untouched, so holders of a clone can detect "nothing changed" cheaply.
//! - Updates keep `id`, `created_at` and position of the target entry.

use crate::model::handle::{normalize_username, Handle};
use crate::state::command::{HandleCommand, HandlePatch};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Ordered handle collection held by the store.
///
/// Serialized as `{ "items": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlesState {
    #[serde(default, deserialize_with = "null_as_empty")]
    items: Arc<Vec<Handle>>,
}

impl HandlesState {
    pub fn from_items(items: Vec<Handle>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    /// Handles in insertion order.
    pub fn items(&self) -> &[Handle] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns whether both states share backing storage, i.e. no transition
    /// happened in between.
    pub fn same_items(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Arc<Vec<Handle>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Handle>>::deserialize(deserializer)?;
    Ok(Arc::new(items.unwrap_or_default()))
}

/// Computes the next state for `command`.
///
/// Takes the state by value: storage is only mutated in place when no other
/// clone of `state` is alive, otherwise it is copied first.
pub fn reduce(mut state: HandlesState, command: HandleCommand) -> HandlesState {
    match command {
        HandleCommand::Add(prepared) => {
            Arc::make_mut(&mut state.items).push(prepared.into_handle());
            state
        }
        HandleCommand::Update { id, patch } => update(state, &id, patch),
        HandleCommand::Remove(id) => {
            if state.items().iter().any(|handle| handle.id == id) {
                Arc::make_mut(&mut state.items).retain(|handle| handle.id != id);
            }
            state
        }
        HandleCommand::Load(snapshot) => HandlesState::from_items(snapshot.unwrap_or_default()),
        HandleCommand::ClearAll => HandlesState::default(),
    }
}

fn update(mut state: HandlesState, id: &str, patch: HandlePatch) -> HandlesState {
    let Some(index) = state.items().iter().position(|handle| handle.id == id) else {
        return state;
    };
    if patch.is_empty() {
        return state;
    }

    let target = &mut Arc::make_mut(&mut state.items)[index];
    if let Some(platform) = patch.platform {
        target.platform = platform;
    }
    if let Some(username) = patch.username {
        target.username = normalize_username(&username);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::{reduce, HandlesState};
    use crate::model::handle::Handle;
    use crate::state::command::{CommandBuilder, HandleCommand, HandlePatch};

    fn handle(id: &str, platform: &str, username: &str) -> Handle {
        Handle {
            id: id.to_string(),
            platform: platform.to_string(),
            username: username.to_string(),
            created_at: format!("t{id}"),
        }
    }

    fn state(items: Vec<Handle>) -> HandlesState {
        HandlesState::from_items(items)
    }

    #[test]
    fn add_appends_without_touching_input() {
        let before = state(vec![handle("1", "twitter", "a")]);
        let builder = CommandBuilder::with_sources(|| "2".to_string(), || "t2".to_string());
        let after = reduce(before.clone(), builder.add("instagram", "@b"));

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
        assert_eq!(after.items()[1], handle("2", "instagram", "b"));
        assert!(!after.same_items(&before));
    }

    #[test]
    fn update_overwrites_only_supplied_fields() {
        let before = state(vec![handle("1", "twitter", "a")]);
        let after = reduce(
            before.clone(),
            HandleCommand::Update {
                id: "1".to_string(),
                patch: HandlePatch::username("@b"),
            },
        );

        assert_eq!(after.items(), &[handle("1", "twitter", "b")]);
        assert_eq!(before.items()[0].username, "a");
    }

    #[test]
    fn update_keeps_position_of_target() {
        let before = state(vec![
            handle("1", "twitter", "a"),
            handle("2", "twitter", "b"),
            handle("3", "twitter", "c"),
        ]);
        let after = reduce(
            before.clone(),
            HandleCommand::Update {
                id: "2".to_string(),
                patch: HandlePatch::platform("linkedin"),
            },
        );

        let ids: Vec<&str> = after.items().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(after.items()[1].platform, "linkedin");
        assert_eq!(after.items()[1].created_at, "t2");
    }

    #[test]
    fn unknown_ids_are_no_ops_sharing_storage() {
        let before = state(vec![handle("1", "twitter", "a")]);

        let updated = reduce(
            before.clone(),
            HandleCommand::Update {
                id: "missing".to_string(),
                patch: HandlePatch::username("x"),
            },
        );
        let removed = reduce(before.clone(), HandleCommand::Remove("missing".to_string()));

        assert!(updated.same_items(&before));
        assert!(removed.same_items(&before));
    }

    #[test]
    fn empty_patch_leaves_entry_identical() {
        let before = state(vec![handle("1", "twitter", "a")]);
        let after = reduce(
            before.clone(),
            HandleCommand::Update {
                id: "1".to_string(),
                patch: HandlePatch::default(),
            },
        );
        assert_eq!(after, before);
    }

    #[test]
    fn remove_preserves_relative_order() {
        let before = state(vec![
            handle("1", "twitter", "a"),
            handle("2", "facebook", "b"),
            handle("3", "other", "c"),
        ]);
        let after = reduce(before, HandleCommand::Remove("2".to_string()));
        let ids: Vec<&str> = after.items().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn load_replaces_verbatim_and_none_means_empty() {
        let before = state(vec![handle("1", "twitter", "a")]);
        let snapshot = vec![handle("9", "other", "@kept"), handle("8", "twitter", "z")];

        let loaded = reduce(before.clone(), HandleCommand::Load(Some(snapshot.clone())));
        assert_eq!(loaded.items(), snapshot.as_slice());

        let emptied = reduce(before, HandleCommand::Load(None));
        assert!(emptied.is_empty());
    }

    #[test]
    fn clear_all_is_idempotent() {
        let before = state(vec![handle("1", "twitter", "a")]);
        let once = reduce(before, HandleCommand::ClearAll);
        let twice = reduce(once.clone(), HandleCommand::ClearAll);
        assert!(once.is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn state_serializes_items_field() {
        let json = serde_json::to_value(state(vec![handle("1", "twitter", "a")])).unwrap();
        assert_eq!(json["items"][0]["createdAt"], "t1");

        let decoded: HandlesState = serde_json::from_str(r#"{"items":null}"#).unwrap();
        assert!(decoded.is_empty());
    }
}
