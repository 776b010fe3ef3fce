//! Rotation Bounds
//!
//! The primary buffer never exceeds the budget, rotation is a full copy,
//! and oversized entries are dropped without side effects.

use crate::common::*;
use rotalog::{AppendOutcome, DropReason};
use tempfile::TempDir;

#[test]
fn primary_bounded_after_every_append() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp, "bounded", 40);

    for i in 0..500 {
        let msg = "y".repeat(i % 30);
        store.append(&msg).unwrap();
        assert!(read_bytes(store.primary_path()).len() <= 40);
    }
}

#[test]
fn oversized_entry_is_noop() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp, "big", 16);
    store.append("small").unwrap();
    store.append("other").unwrap();
    let primary = read_bytes(store.primary_path());
    let backup = read_bytes(store.backup_path());

    // 3-byte separator + 14 bytes = 17 > 16
    let outcome = store.append("fourteen-bytes").unwrap();
    assert_eq!(outcome, AppendOutcome::Dropped(DropReason::TooLarge));
    assert_eq!(read_bytes(store.primary_path()), primary);
    assert_eq!(read_bytes(store.backup_path()), backup);
}

#[test]
fn rotation_copies_previous_primary_exactly() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp, "rot", 20);
    store.append("first").unwrap();
    store.append("second").unwrap();
    let before = read_bytes(store.primary_path());
    assert_eq!(before, b"<|>first<|>second");

    assert_eq!(store.append("third").unwrap(), AppendOutcome::Rotated);
    assert_eq!(read_bytes(store.backup_path()), before);
    assert_eq!(read_bytes(store.primary_path()), b"<|>third");
}

#[test]
fn backup_holds_only_latest_snapshot() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp, "hist", 10);
    for msg in ["aaaaa", "bbbbb", "ccccc", "ddddd"] {
        store.append(msg).unwrap();
    }
    assert_eq!(store.read_messages().unwrap(), vec!["ddddd", "ccccc"]);
}
