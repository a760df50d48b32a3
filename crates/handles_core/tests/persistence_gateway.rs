use handles_core::{
    open_default_store, open_persistent_store, CoreConfig, Handle, HandlePatch, MemorySlot,
    SqliteSlot, DEFAULT_STORAGE_KEY,
};

const KEY: &str = "handles_test";

fn handle(id: &str, platform: &str, username: &str) -> Handle {
    Handle {
        id: id.to_string(),
        platform: platform.to_string(),
        username: username.to_string(),
        created_at: "2025-10-17T08:30:00.000Z".to_string(),
    }
}

#[test]
fn three_entries_survive_restart_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("handles.sqlite3");

    let written = {
        let mut store = open_persistent_store(SqliteSlot::open(&path).unwrap(), KEY);
        store.add("twitter", "@a");
        store.add("instagram", "b");
        store.add("linkedin", "c");
        store.list_all().to_vec()
    };

    let restarted = open_persistent_store(SqliteSlot::open(&path).unwrap(), KEY);
    assert_eq!(restarted.list_all(), written.as_slice());
}

#[test]
fn every_command_writes_through_before_returning() {
    let slot = MemorySlot::new();
    let mut store = open_persistent_store(slot.clone(), KEY);

    store.load(Some(vec![handle("1", "twitter", "a"), handle("2", "other", "b")]));
    store.update("1", HandlePatch::username("@z"));
    store.remove("2");

    let raw = slot.peek(KEY).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let items = json["handles"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], "1");
    assert_eq!(items[0]["username"], "z");

    store.clear_all();
    assert_eq!(slot.peek(KEY).unwrap(), r#"{"handles":{"items":[]}}"#);
}

#[test]
fn empty_slot_starts_empty() {
    let store = open_persistent_store(MemorySlot::new(), KEY);
    assert!(store.is_empty());
}

#[test]
fn malformed_snapshot_falls_back_to_empty() {
    for raw in ["{not json", r#"{"other":1}"#, r#"{"handles":{"items":[{"id":1}]}}"#] {
        let slot = MemorySlot::new();
        slot.seed(KEY, raw);

        let store = open_persistent_store(slot, KEY);
        assert!(store.is_empty(), "expected fallback for {raw}");
    }
}

#[test]
fn null_or_missing_items_restore_as_empty() {
    for raw in [r#"{"handles":{"items":null}}"#, r#"{"handles":{}}"#] {
        let slot = MemorySlot::new();
        slot.seed(KEY, raw);

        let store = open_persistent_store(slot, KEY);
        assert!(store.is_empty(), "expected empty for {raw}");
    }
}

#[test]
fn restore_is_verbatim_without_renormalizing() {
    let slot = MemorySlot::new();
    slot.seed(
        KEY,
        r#"{"handles":{"items":[{"id":"x","platform":"mastodon","username":"@raw","createdAt":"t"}]}}"#,
    );

    let store = open_persistent_store(slot, KEY);
    let restored = store.get_by_id("x").unwrap();
    assert_eq!(restored.username, "@raw");
    assert_eq!(restored.platform, "mastodon");
}

#[test]
fn read_failure_falls_back_to_empty() {
    let slot = MemorySlot::new();
    slot.seed(
        KEY,
        r#"{"handles":{"items":[{"id":"x","platform":"other","username":"a","createdAt":"t"}]}}"#,
    );

    let store = open_persistent_store(slot.failing_reads(), KEY);
    assert!(store.is_empty());
}

#[test]
fn write_failure_keeps_in_memory_commit() {
    let slot = MemorySlot::new();
    let mut store = open_persistent_store(slot.failing_writes(), KEY);

    let created = store.add("facebook", "kept");

    assert_eq!(store.get_by_id(&created.id), Some(&created));
    assert_eq!(slot.peek(KEY), None);
}

#[test]
fn slots_are_isolated_by_key() {
    let slot = MemorySlot::new();
    let mut first = open_persistent_store(slot.clone(), "first");
    first.add("twitter", "a");

    let second = open_persistent_store(slot, "second");
    assert!(second.is_empty());
}

#[test]
fn default_store_uses_configured_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::default()
        .with_db_path(dir.path().join("nested").join("handles.sqlite3"))
        .unwrap();

    let created = {
        let mut store = open_default_store(&config);
        store.add("other", "@someone")
    };

    let reopened = open_default_store(&config);
    assert_eq!(reopened.list_all(), &[created]);
    assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
}

#[test]
fn default_store_degrades_when_database_cannot_open() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();
    let config = CoreConfig::default()
        .with_db_path(blocker.join("handles.sqlite3"))
        .unwrap();

    let mut store = open_default_store(&config);
    store.add("twitter", "a");

    assert_eq!(store.len(), 1);
}
