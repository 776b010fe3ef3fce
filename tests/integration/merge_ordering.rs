//! Merge Ordering
//!
//! Newest first within a buffer, caller order across stores, soft budget.

use crate::common::*;
use rotalog::{merge_log_stores, LogDirectory, MergeError};
use tempfile::TempDir;

#[test]
fn copy_contents_reverses_append_order() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp, "abc", 1024);
    for msg in ["a", "b", "c"] {
        store.append(msg).unwrap();
    }

    let output = store.copy_contents("abc.txt").unwrap();
    assert_eq!(read_lines(&output.path), vec!["c", "b", "a"]);
}

#[test]
fn merge_two_stores_in_caller_order() {
    let temp = TempDir::new().unwrap();
    let s1 = test_store(&temp, "s1", 1024);
    let s2 = test_store(&temp, "s2", 1024);
    s2.append("p").unwrap();
    s1.append("x").unwrap();
    s2.append("q").unwrap();
    s1.append("y").unwrap();

    let directory = LogDirectory::from_root(temp.path());
    let output = merge_log_stores(&directory, "all.txt", 1024, &[&s1, &s2]).unwrap();
    assert_eq!(read_lines(&output.path), vec!["y", "x", "q", "p"]);
}

#[test]
fn merge_overshoots_by_one_line_per_buffer() {
    let temp = TempDir::new().unwrap();
    let stores: Vec<_> = (0..3)
        .map(|i| {
            let store = test_store(&temp, &format!("log{}", i), 1024);
            for j in 0..5 {
                store.append(&format!("{}-{}", i, j)).unwrap();
            }
            store
        })
        .collect();
    let refs: Vec<_> = stores.iter().collect();

    // Budget of one 4-byte line: the first primary stops after the line
    // that crosses it, every later primary still writes its newest line
    let directory = LogDirectory::from_root(temp.path());
    let output = merge_log_stores(&directory, "tiny.txt", 4, &refs).unwrap();
    assert_eq!(read_lines(&output.path), vec!["0-4", "0-3", "1-4", "2-4"]);
    assert_eq!(output.bytes_written, 16);
}

#[test]
fn merge_with_no_stores_writes_empty_output() {
    let temp = TempDir::new().unwrap();
    let directory = LogDirectory::from_root(temp.path().join("out"));
    let output = merge_log_stores(&directory, "none.txt", 10, &[]).unwrap();
    assert!(output.path.exists());
    assert_eq!(output.lines, 0);
}

#[test]
fn merge_rejects_path_like_output_name() {
    let temp = TempDir::new().unwrap();
    let store = test_store(&temp, "app", 64);
    let directory = LogDirectory::from_root(temp.path());
    let result = merge_log_stores(&directory, "a/b", 64, &[&store]);
    assert!(matches!(result, Err(MergeError::InvalidOutputName(_))));
}
