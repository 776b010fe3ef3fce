//! Shared test utilities for all integration test suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

use rotalog::{LogDirectory, LogIdentity, RotatingLogStore, StoreConfig};
use std::fs;
use std::path::Path;
use std::sync::Once;
use tempfile::TempDir;

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Store named `name` with budget `max` under `temp`, readable separator.
pub fn test_store(temp: &TempDir, name: &str, max: u64) -> RotatingLogStore {
    init_tracing();
    RotatingLogStore::open(
        LogDirectory::from_root(temp.path()),
        LogIdentity::new(name, max).unwrap(),
        StoreConfig::for_testing(),
    )
    .unwrap()
}

/// File content, empty if missing.
pub fn read_bytes(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap_or_default()
}

/// Lines of a merge output file.
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
