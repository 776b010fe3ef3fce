//! Error types for rotalog
//!
//! This module defines the error taxonomy shared by the storage layer.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Most of these never reach a caller of `append`: self-healable conditions
//! become outcome values and I/O failures are logged. [`Error::Cancelled`]
//! is the exception and is always handed back as [`Cancelled`].

use crate::cancel::Cancelled;
use crate::config::ConfigError;
use crate::identity::IdentityError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rotalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for rotalog
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading or writing a buffer
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A backing file or directory could not be created or opened
    #[error("Resource unavailable at {path}: {source}")]
    ResourceUnavailable {
        /// File or directory that failed
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// Encoded entry does not fit in the log's byte budget
    #[error("Entry too large: {len} bytes (max {max})")]
    EntryTooLarge {
        /// Encoded entry length
        len: u64,
        /// Byte budget of the log
        max: u64,
    },

    /// Operation was cancelled by its caller
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid log identity
    #[error("Invalid identity: {0}")]
    InvalidIdentity(#[from] IdentityError),

    /// Invalid store configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl From<Cancelled> for Error {
    fn from(_: Cancelled) -> Self {
        Error::Cancelled
    }
}

impl Error {
    /// Wrap an I/O failure on a backing resource
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::ResourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Split cancellation out of an error at an operation boundary.
    ///
    /// Returns `Err(Cancelled)` for a cancellation and `Ok(self)` for any
    /// other error, so callers can re-raise the former and report the latter.
    pub fn into_cancelled(self) -> std::result::Result<Self, Cancelled> {
        match self {
            Error::Cancelled => Err(Cancelled),
            other => Ok(other),
        }
    }
}
