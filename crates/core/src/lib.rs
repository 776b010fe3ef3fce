//! Core types for rotalog
//!
//! This crate defines the foundational types shared by the cache and storage layers:
//! - LogIdentity: name and byte budget of one rotating log
//! - Entry codec: separator-prefixed on-disk entries
//! - CancellationToken: cooperative cancellation for blocking operations
//! - StoreConfig: tunables for a rotating log store
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod config;
pub mod entry;
pub mod error;
pub mod identity;

pub use cancel::{Cancelled, CancellationToken};
pub use config::{ConfigError, StoreConfig};
pub use entry::{decode_entries, encode_entry, encoded_len, DEFAULT_SEPARATOR};
pub use error::{Error, Result};
pub use identity::{IdentityError, LogIdentity};
