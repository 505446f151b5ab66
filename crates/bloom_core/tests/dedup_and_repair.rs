use bloom_core::{
    storage_key, JournalEntry, JournalService, MemoryRemote, MemoryStore, RepairOutcome,
};

fn entry_with_id(owner: &str, id: &str, title: &str) -> JournalEntry {
    let mut entry = JournalEntry::new(owner, title, "", 3);
    entry.id = id.to_string();
    entry
}

fn journal_key(owner: &str) -> String {
    storage_key(JournalService::STORAGE_NAMESPACE, owner)
}

#[test]
fn duplicate_ids_in_blob_are_deduped_and_rewritten() {
    let store = MemoryStore::new();
    let first = entry_with_id("u1", "r1", "Keep me");
    let second = entry_with_id("u1", "r1", "Drop me");
    let blob = serde_json::to_string(&vec![first, second]).unwrap();
    store.set_raw_value(&journal_key("u1"), &blob);

    let mut service = JournalService::new(
        Box::new(store.clone()),
        Box::new(MemoryRemote::<JournalEntry>::offline()),
    );
    let loaded = service.entries("u1").unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "r1");
    assert_eq!(loaded[0].title, "Keep me");

    // the cleaned collection was written back immediately
    let rewritten: Vec<JournalEntry> =
        serde_json::from_str(&store.raw_value(&journal_key("u1")).unwrap()).unwrap();
    assert_eq!(rewritten.len(), 1);
    assert_eq!(rewritten[0].title, "Keep me");
}

#[test]
fn corrupt_blob_loads_as_empty_without_error() {
    let store = MemoryStore::new();
    store.set_raw_value(&journal_key("u1"), "definitely not json");

    let mut service = JournalService::new(
        Box::new(store.clone()),
        Box::new(MemoryRemote::<JournalEntry>::offline()),
    );
    assert!(service.entries("u1").unwrap().is_empty());
}

#[test]
fn non_collection_blob_loads_as_empty() {
    let store = MemoryStore::new();
    store.set_raw_value(&journal_key("u1"), r#"{"id":"r1"}"#);

    let mut service = JournalService::new(
        Box::new(store.clone()),
        Box::new(MemoryRemote::<JournalEntry>::offline()),
    );
    assert!(service.entries("u1").unwrap().is_empty());
}

#[test]
fn repair_reports_intact_for_healthy_or_missing_blob() {
    let store = MemoryStore::new();
    let mut service = JournalService::new(
        Box::new(store.clone()),
        Box::new(MemoryRemote::<JournalEntry>::offline()),
    );

    // no blob at all
    assert_eq!(
        service.repair_local_store("u1").unwrap(),
        RepairOutcome::Intact
    );

    let blob = serde_json::to_string(&vec![entry_with_id("u1", "r1", "Fine")]).unwrap();
    store.set_raw_value(&journal_key("u1"), &blob);
    assert_eq!(
        service.repair_local_store("u1").unwrap(),
        RepairOutcome::Intact
    );
    // healthy blob untouched
    assert_eq!(store.raw_value(&journal_key("u1")).unwrap(), blob);
}

#[test]
fn repair_resets_to_empty_when_remote_unreachable() {
    let store = MemoryStore::new();
    store.set_raw_value(&journal_key("u1"), "garbage");

    let mut service = JournalService::new(
        Box::new(store.clone()),
        Box::new(MemoryRemote::<JournalEntry>::offline()),
    );
    assert_eq!(
        service.repair_local_store("u1").unwrap(),
        RepairOutcome::ResetToEmpty
    );

    // blob is parseable again and the owner reads as empty
    let repaired: Vec<JournalEntry> =
        serde_json::from_str(&store.raw_value(&journal_key("u1")).unwrap()).unwrap();
    assert!(repaired.is_empty());
    assert!(service.entries("u1").unwrap().is_empty());
}

#[test]
fn repair_rebuilds_from_remote_when_reachable() {
    let store = MemoryStore::new();
    store.set_raw_value(&journal_key("u1"), "garbage");

    let remote = MemoryRemote::<JournalEntry>::new();
    remote.seed(
        "u1",
        vec![
            entry_with_id("u1", "r1", "From remote"),
            entry_with_id("u1", "r2", "Also remote"),
        ],
    );

    let mut service = JournalService::new(Box::new(store.clone()), Box::new(remote));
    assert_eq!(
        service.repair_local_store("u1").unwrap(),
        RepairOutcome::RebuiltFromRemote(2)
    );

    let rebuilt: Vec<JournalEntry> =
        serde_json::from_str(&store.raw_value(&journal_key("u1")).unwrap()).unwrap();
    assert_eq!(rebuilt.len(), 2);
    assert_eq!(service.entries("u1").unwrap().len(), 2);
}

#[test]
fn repair_falls_back_to_empty_when_remote_list_fails() {
    let store = MemoryStore::new();
    store.set_raw_value(&journal_key("u1"), "garbage");

    let remote = MemoryRemote::<JournalEntry>::new();
    remote.set_fail_lists(true);

    let mut service = JournalService::new(Box::new(store.clone()), Box::new(remote));
    assert_eq!(
        service.repair_local_store("u1").unwrap(),
        RepairOutcome::ResetToEmpty
    );
    let repaired: Vec<JournalEntry> =
        serde_json::from_str(&store.raw_value(&journal_key("u1")).unwrap()).unwrap();
    assert!(repaired.is_empty());
}
