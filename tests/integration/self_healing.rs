//! Self-Healing
//!
//! Buffers deleted out from under a store are recreated on the next access;
//! a store whose directory cannot be created drops entries silently.

use crate::common::*;
use rotalog::{
    AppendOutcome, BufferState, DropReason, LogDirectory, LogIdentity, RotatingLogStore,
    StoreConfig,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn append_succeeds_after_directory_deleted() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("logs");
    let store = RotatingLogStore::open(
        LogDirectory::from_root(&root),
        LogIdentity::new("heal", 128).unwrap(),
        StoreConfig::for_testing(),
    )
    .unwrap();

    store.append("one").unwrap();
    fs::remove_dir_all(&root).unwrap();
    assert_eq!(store.primary_state(), BufferState::Broken);
    assert_eq!(store.backup_state(), BufferState::Broken);

    assert!(store.recover_from_error_if_possible());
    assert_eq!(store.append("two").unwrap(), AppendOutcome::Appended);
    assert_eq!(store.read_messages().unwrap(), vec!["two"]);
}

#[test]
fn unavailable_storage_then_available_again() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("later");
    fs::write(&root, b"placeholder file").unwrap();

    let store = RotatingLogStore::open(
        LogDirectory::from_root(&root),
        LogIdentity::new("late", 128).unwrap(),
        StoreConfig::for_testing(),
    )
    .unwrap();

    assert_eq!(
        store.append("dropped").unwrap(),
        AppendOutcome::Dropped(DropReason::Unavailable)
    );
    assert_eq!(store.primary_state(), BufferState::Uninitialized);

    fs::remove_file(&root).unwrap();
    assert!(store.recover_from_error_if_possible());
    assert_eq!(store.append("kept").unwrap(), AppendOutcome::Appended);
    assert_eq!(store.read_messages().unwrap(), vec!["kept"]);

    let counters = store.counters();
    assert_eq!(counters.dropped_unavailable, 1);
    assert_eq!(counters.appends, 1);
}

#[test]
fn expired_handles_reopen_transparently() {
    let temp = TempDir::new().unwrap();
    let store = RotatingLogStore::open(
        LogDirectory::from_root(temp.path()),
        LogIdentity::new("ttl", 128).unwrap(),
        StoreConfig::for_testing().with_handle_ttl(Duration::from_millis(10)),
    )
    .unwrap();

    store.append("before").unwrap();
    std::thread::sleep(Duration::from_millis(40));
    assert_eq!(store.primary_state(), BufferState::Uninitialized);

    store.append("after").unwrap();
    assert_eq!(store.read_messages().unwrap(), vec!["after", "before"]);
}

#[test]
fn existing_files_are_reused() {
    let temp = TempDir::new().unwrap();
    {
        let store = test_store(&temp, "persist", 128);
        store.append("from first open").unwrap();
    }

    let store = test_store(&temp, "persist", 128);
    store.append("from second open").unwrap();
    assert_eq!(
        store.read_messages().unwrap(),
        vec!["from second open", "from first open"]
    );
}
