//! Log directory structure
//!
//! Every rotating log is a pair of files under one root directory, and
//! merge outputs land next to them:
//!
//! ```text
//! logs/
//! ├── app              # primary buffer of log "app"
//! ├── app.backup       # backup buffer of log "app"
//! ├── worker
//! ├── worker.backup
//! └── combined         # merge output
//! ```
//!
//! Resolving the root is up to the caller. The directory is created on
//! demand the first time a buffer or output file is opened.

use std::path::{Path, PathBuf};

/// Suffix appended to a log name to form its backup file name
pub const BACKUP_SUFFIX: &str = ".backup";

/// Log directory paths
///
/// Provides access to all paths within a log directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirectory {
    /// Root log directory
    root: PathBuf,
}

impl LogDirectory {
    /// Create paths from root directory
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        LogDirectory {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root log directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the primary buffer path of a log
    pub fn primary(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Get the backup buffer path of a log
    pub fn backup(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}{}", name, BACKUP_SUFFIX))
    }

    /// Get the path of a merge output file
    pub fn output(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Create the root directory if missing
    pub fn create_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)
    }
}
