//! Integration tests for the `agora-db` file store.
//!
//! Each test works in its own temporary directory.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use agora_db::{DbError, JsonFileStore, MemoryStore, StateStore, StateStoreExt};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Roster {
    members: BTreeMap<String, String>,
}

fn roster() -> Roster {
    let mut members = BTreeMap::new();
    members.insert(String::from("Marcus"), String::from("Senator"));
    members.insert(String::from("Livia"), String::from("Merchant"));
    Roster { members }
}

#[test]
fn values_survive_reopening_the_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    {
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.save_json("agents", &roster()).unwrap();
    }
    let reopened = JsonFileStore::open(dir.path()).unwrap();
    let loaded: Option<Roster> = reopened.load_json("agents").unwrap();
    assert_eq!(loaded, Some(roster()));
    assert!(dir.path().join("agents.json").is_file());
    assert!(!dir.path().join("agents.json.tmp").exists());
}

#[test]
fn missing_key_is_none_not_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path()).unwrap();
    let loaded: Option<Roster> = store.load_json("economy").unwrap();
    assert!(loaded.is_none());
    assert_eq!(store.load_or("economy", roster()).unwrap(), roster());
}

#[test]
fn overwrite_replaces_previous_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path()).unwrap();
    store.save_json("counter", &1_u32).unwrap();
    store.save_json("counter", &2_u32).unwrap();
    assert_eq!(store.load_json::<u32>("counter").unwrap(), Some(2));

    store.delete("counter").unwrap();
    store.delete("counter").unwrap();
    assert_eq!(store.load_json::<u32>("counter").unwrap(), None);
}

#[test]
fn corrupt_file_reports_serialization_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("agents.json"), "{ not json").unwrap();
    let store = JsonFileStore::open(dir.path()).unwrap();
    let result = store.load_json::<Roster>("agents");
    assert!(matches!(result, Err(DbError::Serialization(_))));
}

#[test]
fn path_traversal_keys_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path()).unwrap();
    let result = store.save_raw("../escape", "{}");
    assert!(matches!(result, Err(DbError::InvalidKey(_))));
}

#[test]
fn open_fails_when_path_is_a_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("occupied");
    std::fs::write(&file, "x").unwrap();
    assert!(matches!(JsonFileStore::open(&file), Err(DbError::Config(_))));
}

#[test]
fn stores_work_behind_a_trait_object() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stores: Vec<Arc<dyn StateStore>> = vec![
        Arc::new(MemoryStore::new()),
        Arc::new(JsonFileStore::open(dir.path()).unwrap()),
    ];
    for store in stores {
        store.save_json("events_rome", &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<i32>> = store.load_json("events_rome").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }
}
