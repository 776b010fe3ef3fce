//! Store configuration
//!
//! Tunables shared by every rotating log store: the entry separator, the
//! optional expiry of cached file handles, and how often a blocked append
//! re-checks its cancellation token while waiting for the store lock.

use crate::entry::DEFAULT_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rotating log store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Token written before every message (default: [`DEFAULT_SEPARATOR`])
    pub separator: String,

    /// Expiry of cached file handles (default: never).
    ///
    /// When set, a handle older than this is reopened on next access even
    /// if no failure was observed.
    pub handle_ttl: Option<Duration>,

    /// Interval between cancellation checks while waiting for the store lock
    /// (default: 10ms)
    pub lock_poll_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            separator: DEFAULT_SEPARATOR.to_string(),
            handle_ttl: None,
            lock_poll_interval: Duration::from_millis(10),
        }
    }
}

impl StoreConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry separator (builder pattern).
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the handle expiry (builder pattern).
    pub fn with_handle_ttl(mut self, ttl: Duration) -> Self {
        self.handle_ttl = Some(ttl);
        self
    }

    /// Set the lock poll interval (builder pattern).
    pub fn with_lock_poll_interval(mut self, interval: Duration) -> Self {
        self.lock_poll_interval = interval;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }
        // Merge output is line oriented
        if self.separator.contains('\n') {
            return Err(ConfigError::SeparatorContainsNewline);
        }
        if self.lock_poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }

    /// Create a configuration for testing (short, readable separator).
    pub fn for_testing() -> Self {
        StoreConfig {
            separator: "<|>".to_string(),
            handle_ttl: None,
            lock_poll_interval: Duration::from_millis(1),
        }
    }
}

/// Store configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Separator is empty.
    #[error("Separator cannot be empty")]
    EmptySeparator,

    /// Separator contains a newline.
    #[error("Separator cannot contain a newline")]
    SeparatorContainsNewline,

    /// Lock poll interval is zero.
    #[error("Lock poll interval must be positive")]
    ZeroPollInterval,
}
