//! Backing buffer handles
//!
//! A [`BufferHandle`] owns the path of one backing file and a lazily opened
//! handle to it. The handle is opened (parent directory and file created if
//! absent) on first access and reopened after a recovery check finds the
//! file gone from disk.
//!
//! Files are opened in append mode: every write lands at the current end of
//! file, including right after a truncation.

use rotalog_concurrency::LazyHandleCache;
use rotalog_core::{decode_entries, CancellationToken, Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Observable state of a buffer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// No handle cached; next access opens the file
    Uninitialized,
    /// Handle cached and the file exists
    Valid,
    /// Handle cached but the file has disappeared
    Broken,
}

/// Lazily opened handle to one backing file.
#[derive(Debug)]
pub struct BufferHandle {
    path: PathBuf,
    cache: LazyHandleCache<Arc<File>, Error>,
}

impl BufferHandle {
    /// Create a handle for `path`. Does not touch the filesystem.
    pub fn new(path: PathBuf, ttl: Option<Duration>) -> Self {
        Self::with_opener(path, ttl, |path| {
            open_buffer(path).map_err(|e| Error::unavailable(path, e))
        })
    }

    /// Create a handle that opens its file through `opener`
    pub(crate) fn with_opener<F>(path: PathBuf, ttl: Option<Duration>, opener: F) -> Self
    where
        F: Fn(&Path) -> Result<Arc<File>> + Send + Sync + 'static,
    {
        let target = path.clone();
        let open = move || opener(&target);
        let cache = match ttl {
            Some(ttl) => LazyHandleCache::with_ttl(open, ttl),
            None => LazyHandleCache::new(open),
        };
        BufferHandle { path, cache }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current state, without opening anything
    pub fn state(&self) -> BufferState {
        if !self.cache.is_initialized() {
            BufferState::Uninitialized
        } else if self.path.exists() {
            BufferState::Valid
        } else {
            BufferState::Broken
        }
    }

    /// Recovery check: drop a handle whose file is gone, then (re)open.
    ///
    /// Must precede every buffer access. A failed open leaves the handle
    /// uninitialized so the next check retries.
    pub fn recover(&self) -> Result<Arc<File>> {
        self.reset_if_missing();
        self.cache.get()
    }

    /// Like [`recover`](Self::recover), but stops waiting on another
    /// thread's open once `token` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if `token` was cancelled while waiting.
    pub fn recover_cancellable(
        &self,
        token: &CancellationToken,
        poll: Duration,
    ) -> Result<Arc<File>> {
        self.reset_if_missing();
        self.cache.get_cancellable(token, poll)
    }

    fn reset_if_missing(&self) {
        if self.path.exists() {
            return;
        }
        if self.cache.is_initialized() {
            warn!(path = ?self.path, "Backing file disappeared, resetting handle");
        }
        self.cache.reset();
    }
}

fn open_buffer(path: &Path) -> io::Result<Arc<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;
    debug!(path = ?path, "Opened backing file");
    Ok(Arc::new(file))
}

/// Current size of an open buffer in bytes
pub(crate) fn buffer_size(file: &File) -> io::Result<u64> {
    Ok(file.metadata()?.len())
}

/// Read one buffer file and decode it, newest entry first.
///
/// A missing file reads as empty.
pub(crate) fn read_messages_newest_first(path: &Path, separator: &str) -> io::Result<Vec<String>> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e),
    };
    let mut messages = decode_entries(separator, &content);
    messages.reverse();
    Ok(messages)
}

/// Overwrite `dst` with the full content of `src`. Returns bytes copied.
pub(crate) fn copy_buffer(src: &File, dst: &File) -> io::Result<u64> {
    let mut reader = src;
    reader.seek(SeekFrom::Start(0))?;
    dst.set_len(0)?;
    let mut writer = dst;
    io::copy(&mut reader, &mut writer)
}
