//! Storage layer for rotalog
//!
//! This crate implements size-bounded rotating logs on the local filesystem:
//! - LogDirectory: layout of buffers and merge outputs under one root
//! - BufferHandle: lazily opened, self-healing backing file handle
//! - RotatingLogStore: primary/backup dual-buffer log with full-copy rotation
//! - merge_log_stores: bounded, newest-first merge of one or more stores
//!
//! # Concurrency
//!
//! Each store serializes its appends behind its own lock. Merges read
//! without that lock. Nothing here coordinates across processes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod merge;
pub mod paths;
pub mod store;

pub use buffer::{BufferHandle, BufferState};
pub use merge::{merge_log_stores, MergeError, MergeOutput};
pub use paths::{LogDirectory, BACKUP_SUFFIX};
pub use store::{AppendOutcome, DropReason, RotatingLogStore, StoreCounters};
