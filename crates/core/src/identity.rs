//! Log identity type
//!
//! A log identity names one rotating log and fixes its byte budget.
//! The name doubles as the primary file name, so it must be usable as a
//! single path component.
//!
//! ## Validation
//!
//! Log names must:
//! - Be non-empty
//! - Not contain `/` or `\`
//! - Not be `.` or `..`
//!
//! The byte budget must be greater than zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name and size budget of one rotating log.
///
/// Immutable once constructed. Deserialization applies the same validation
/// as [`LogIdentity::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IdentityParts")]
pub struct LogIdentity {
    name: String,
    max_size_bytes: u64,
}

#[derive(Deserialize)]
struct IdentityParts {
    name: String,
    max_size_bytes: u64,
}

impl TryFrom<IdentityParts> for LogIdentity {
    type Error = IdentityError;

    fn try_from(parts: IdentityParts) -> Result<Self, Self::Error> {
        LogIdentity::new(parts.name, parts.max_size_bytes)
    }
}

/// Error when validating a log identity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Name is empty
    #[error("log name cannot be empty")]
    EmptyName,

    /// Name cannot be used as a single file name
    #[error("log name '{name}' is not a valid file name")]
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// Byte budget is zero
    #[error("log size budget must be positive")]
    ZeroSize,
}

impl LogIdentity {
    /// Create a new identity, validating the input
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the name or the size budget is invalid.
    pub fn new(name: impl Into<String>, max_size_bytes: u64) -> Result<Self, IdentityError> {
        let name = name.into();
        Self::validate_name(&name)?;
        if max_size_bytes == 0 {
            return Err(IdentityError::ZeroSize);
        }
        Ok(LogIdentity {
            name,
            max_size_bytes,
        })
    }

    /// Validate a log name
    pub fn validate_name(name: &str) -> Result<(), IdentityError> {
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(IdentityError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Log name (also the primary file name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte budget of the primary buffer
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }
}

impl fmt::Display for LogIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.max_size_bytes)
    }
}
