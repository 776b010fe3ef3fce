//! Concurrency layer for rotalog
//!
//! This crate implements the resettable lazy cache the storage layer keeps
//! its file handles in:
//! - LazyHandleCache: thread-safe, single-flight initialization with an
//!   optional expiry
//! - UnsyncLazyCache: the same state machine for single-threaded call sites

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lazy;

pub use lazy::{LazyHandleCache, UnsyncLazyCache};
