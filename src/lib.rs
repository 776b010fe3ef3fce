//! rotalog - Size-bounded rotating log storage
//!
//! Each named log keeps roughly its most recent N bytes of messages in two
//! files, a primary buffer and a backup holding the previous full primary.
//! Merges produce a bounded, newest-first text view across one or more logs.
//!
//! # Quick Start
//!
//! ```ignore
//! use rotalog::{LogDirectory, LogIdentity, RotatingLogStore, StoreConfig};
//!
//! let store = RotatingLogStore::open(
//!     LogDirectory::from_root("/var/lib/myapp/logs"),
//!     LogIdentity::new("agent", 64 * 1024)?,
//!     StoreConfig::default(),
//! )?;
//!
//! store.append("connected")?;
//! let snapshot = store.copy_contents("agent.txt")?;
//! ```
//!
//! # Architecture
//!
//! - `rotalog-core`: identities, entry encoding, configuration, errors
//! - `rotalog-concurrency`: resettable lazy caches
//! - `rotalog-storage`: buffers, rotating stores, merge

pub use rotalog_concurrency::{LazyHandleCache, UnsyncLazyCache};
pub use rotalog_core::{
    Cancelled, CancellationToken, ConfigError, Error, IdentityError, LogIdentity, Result,
    StoreConfig, DEFAULT_SEPARATOR,
};
pub use rotalog_storage::{
    merge_log_stores, AppendOutcome, BufferState, DropReason, LogDirectory, MergeError,
    MergeOutput, RotatingLogStore, StoreCounters,
};
