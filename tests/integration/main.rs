//! Integration tests for the rotalog facade.
//!
//! Run with: cargo test --test integration

#[path = "../common/mod.rs"]
mod common;

mod config_loading;
mod merge_ordering;
mod rotation_bounds;
mod self_healing;
