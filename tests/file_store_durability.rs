//! File Store Durability Tests
//!
//! - Acknowledged writes survive reopen
//! - Corrupted log lines abort open instead of being skipped
//! - Compaction keeps live documents and drops tombstones

use std::fs;

use employee_api::{Employee, EmployeeStore, EmployeeUpdate, FileStore, StoreError};
use tempfile::TempDir;

fn employee(id: i64, name: &str) -> Employee {
    Employee {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name),
        profession: "engineer".to_string(),
        level: "L1".to_string(),
    }
}

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Encode a log line the way the store writes it
fn log_line(entry: serde_json::Value) -> String {
    let body = entry.to_string();
    format!("{:08x} {}\n", crc32fast::hash(body.as_bytes()), body)
}

fn put_line(object_id: &str, id: i64, name: &str) -> String {
    log_line(serde_json::json!({
        "op": "put",
        "doc": {
            "_id": object_id,
            "id": id,
            "name": name,
            "email": format!("{}@example.com", name),
            "profession": "engineer",
            "level": "L1"
        }
    }))
}

#[test]
fn test_open_creates_empty_log() {
    let temp_dir = create_temp_data_dir();
    let store = FileStore::open(temp_dir.path(), "employees").unwrap();

    assert!(store.path().exists());
    assert_eq!(store.path(), FileStore::log_path(temp_dir.path(), "employees"));
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
}

#[test]
fn test_writes_survive_reopen() {
    let temp_dir = create_temp_data_dir();

    {
        let store = FileStore::open(temp_dir.path(), "employees").unwrap();
        store.insert(employee(1, "ada")).unwrap();
        store.insert(employee(2, "grace")).unwrap();
        store.insert(employee(3, "linus")).unwrap();
        store
            .update(2, &EmployeeUpdate::new(2).level("L7"))
            .unwrap();
        store.delete(3).unwrap();
    }

    let store = FileStore::open(temp_dir.path(), "employees").unwrap();
    assert_eq!(store.fetch(1).unwrap(), Some(employee(1, "ada")));
    assert_eq!(store.fetch(2).unwrap().unwrap().level, "L7");
    assert_eq!(store.fetch(3).unwrap(), None);

    // Uniqueness still holds against replayed state
    assert!(matches!(
        store.insert(employee(1, "again")),
        Err(StoreError::DuplicateId(1))
    ));
}

#[test]
fn test_unchanged_update_appends_nothing() {
    let temp_dir = create_temp_data_dir();
    let store = FileStore::open(temp_dir.path(), "employees").unwrap();
    store.insert(employee(1, "ada")).unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    let outcome = store.update(1, &EmployeeUpdate::new(1).name("ada")).unwrap();
    assert_eq!(outcome.modified, 0);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn test_corrupted_line_aborts_open() {
    let temp_dir = create_temp_data_dir();
    let path = {
        let store = FileStore::open(temp_dir.path(), "employees").unwrap();
        store.insert(employee(1, "ada")).unwrap();
        store.insert(employee(2, "grace")).unwrap();
        store.path().to_path_buf()
    };

    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, contents.replacen("grace", "gracE", 1)).unwrap();

    let err = FileStore::open(temp_dir.path(), "employees").err().unwrap();
    assert!(matches!(err, StoreError::Corruption { line: 2, .. }));
}

#[test]
fn test_same_employee_id_under_two_documents_aborts_open() {
    let temp_dir = create_temp_data_dir();
    let path = FileStore::log_path(temp_dir.path(), "employees");
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let mut contents = put_line("11111111-1111-4111-8111-111111111111", 1, "first");
    contents.push_str(&put_line("22222222-2222-4222-8222-222222222222", 1, "second"));
    fs::write(&path, contents).unwrap();

    let err = FileStore::open(temp_dir.path(), "employees").err().unwrap();
    assert!(matches!(err, StoreError::Corruption { line: 2, .. }));
}

#[test]
fn test_hand_written_log_replays() {
    let temp_dir = create_temp_data_dir();
    let path = FileStore::log_path(temp_dir.path(), "employees");
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    // Same document rewritten, then a second employee deleted by tombstone
    let mut contents = put_line("11111111-1111-4111-8111-111111111111", 1, "first");
    contents.push_str(&put_line("11111111-1111-4111-8111-111111111111", 1, "renamed"));
    contents.push_str(&put_line("22222222-2222-4222-8222-222222222222", 2, "second"));
    contents.push_str(&log_line(serde_json::json!({
        "op": "del",
        "_id": "22222222-2222-4222-8222-222222222222"
    })));
    fs::write(&path, contents).unwrap();

    let store = FileStore::open(temp_dir.path(), "employees").unwrap();
    assert_eq!(store.fetch(1).unwrap().unwrap().name, "renamed");
    assert_eq!(store.fetch(2).unwrap(), None);

    assert_eq!(store.delete(1).unwrap().deleted, 1);
    assert_eq!(store.fetch(1).unwrap(), None);
    drop(store);

    let store = FileStore::open(temp_dir.path(), "employees").unwrap();
    assert_eq!(store.fetch(1).unwrap(), None);
}

#[test]
fn test_compact_leaves_no_temp_file() {
    let temp_dir = create_temp_data_dir();
    let store = FileStore::open(temp_dir.path(), "employees").unwrap();
    store.insert(employee(1, "ada")).unwrap();
    store.compact().unwrap();

    let tmp = store.path().with_extension("log.tmp");
    assert!(!tmp.exists());

    // Appends after compaction land in the live log
    store.insert(employee(2, "grace")).unwrap();
    let log = fs::read_to_string(store.path()).unwrap();
    assert_eq!(log.lines().count(), 2);
}

#[test]
fn test_compact_failure_keeps_old_log_live() {
    let temp_dir = create_temp_data_dir();
    let store = FileStore::open(temp_dir.path(), "employees").unwrap();
    store.insert(employee(1, "ada")).unwrap();

    // A directory in the temp file's place makes the rewrite fail
    let tmp = store.path().with_extension("log.tmp");
    fs::create_dir(&tmp).unwrap();
    assert!(store.compact().is_err());
    fs::remove_dir(&tmp).unwrap();

    store.insert(employee(2, "grace")).unwrap();
    drop(store);

    let store = FileStore::open(temp_dir.path(), "employees").unwrap();
    assert!(store.fetch(1).unwrap().is_some());
    assert!(store.fetch(2).unwrap().is_some());
}

#[test]
fn test_truncated_tail_aborts_open() {
    let temp_dir = create_temp_data_dir();
    let path = {
        let store = FileStore::open(temp_dir.path(), "employees").unwrap();
        store.insert(employee(1, "ada")).unwrap();
        store.path().to_path_buf()
    };

    let mut contents = fs::read_to_string(&path).unwrap();
    contents.push_str("0badc0de {\"op\":\"put\"");
    fs::write(&path, contents).unwrap();

    let err = FileStore::open(temp_dir.path(), "employees").err().unwrap();
    assert!(matches!(err, StoreError::Corruption { line: 2, .. }));
}

#[test]
fn test_compact_drops_history() {
    let temp_dir = create_temp_data_dir();
    let store = FileStore::open(temp_dir.path(), "employees").unwrap();

    store.insert(employee(1, "ada")).unwrap();
    store.insert(employee(2, "grace")).unwrap();
    store.update(1, &EmployeeUpdate::new(1).level("L2")).unwrap();
    store.update(1, &EmployeeUpdate::new(1).level("L3")).unwrap();
    store.delete(2).unwrap();
    assert_eq!(fs::read_to_string(store.path()).unwrap().lines().count(), 5);

    store.compact().unwrap();
    assert_eq!(fs::read_to_string(store.path()).unwrap().lines().count(), 1);

    // The store keeps working after compaction and appends to the new log
    store.insert(employee(3, "linus")).unwrap();
    drop(store);

    let store = FileStore::open(temp_dir.path(), "employees").unwrap();
    assert_eq!(store.fetch(1).unwrap().unwrap().level, "L3");
    assert_eq!(store.fetch(2).unwrap(), None);
    assert_eq!(store.fetch(3).unwrap(), Some(employee(3, "linus")));
}

#[test]
fn test_collections_are_isolated() {
    let temp_dir = create_temp_data_dir();
    let staff = FileStore::open(temp_dir.path(), "staff").unwrap();
    let contractors = FileStore::open(temp_dir.path(), "contractors").unwrap();

    staff.insert(employee(1, "ada")).unwrap();
    assert_eq!(contractors.fetch(1).unwrap(), None);
    contractors.insert(employee(1, "bob")).unwrap();
    assert_eq!(staff.fetch(1).unwrap().unwrap().name, "ada");
}
