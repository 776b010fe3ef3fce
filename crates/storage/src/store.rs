//! Size-bounded rotating log store
//!
//! A store keeps one named log in two files: the primary buffer receives
//! new entries, the backup buffer holds the previous full primary.
//!
//! ## Append Sequence
//!
//! ```text
//! 1. Encode entry = separator + message; drop it if larger than the budget
//! 2. Recovery check on primary and backup (cancellable wait on a concurrent open);
//!    drop the entry if either is unavailable
//! 3. Acquire the store lock (cancellable wait)
//! 4. projected = size(primary) + len(entry)
//! 5. IF projected > budget:
//!      copy primary -> backup (overwrite)
//!      cancellation checkpoint
//!      truncate primary
//! 6. Append entry to primary
//! 7. Release the lock
//! ```
//!
//! After any completed append `size(primary) <= budget`. Cancellation at the
//! checkpoint in step 5 leaves the backup updated and the primary intact,
//! which the next append resolves by rotating again.

use crate::buffer::{
    buffer_size, copy_buffer, read_messages_newest_first, BufferHandle, BufferState,
};
use crate::merge::{self, MergeError, MergeOutput};
use crate::paths::LogDirectory;
use parking_lot::{Mutex, MutexGuard};
use rotalog_core::{
    encode_entry, CancellationToken, Cancelled, Error, LogIdentity, Result, StoreConfig,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};
use uuid::Uuid;

/// Result of an append that was not cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Entry appended to the primary buffer
    Appended,
    /// Primary rotated into the backup, then the entry appended
    Rotated,
    /// Nothing written for this entry
    Dropped(DropReason),
}

impl AppendOutcome {
    /// Whether the entry reached the primary buffer
    pub fn is_written(&self) -> bool {
        !matches!(self, AppendOutcome::Dropped(_))
    }
}

/// Why an append wrote nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Encoded entry exceeds the byte budget
    TooLarge,
    /// A backing file could not be opened or created
    Unavailable,
    /// I/O failed while holding the lock; the store may be partially rotated
    IoFailure,
}

/// Cumulative store counters.
///
/// These counters accumulate over the lifetime of the store and are never reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCounters {
    /// Entries written to the primary buffer
    pub appends: u64,
    /// Rotations performed
    pub rotations: u64,
    /// Entries dropped for exceeding the budget
    pub dropped_too_large: u64,
    /// Entries dropped because a buffer was unavailable
    pub dropped_unavailable: u64,
    /// Appends abandoned on an I/O failure
    pub io_failures: u64,
    /// Entry bytes written to the primary buffer
    pub bytes_written: u64,
}

#[derive(Debug, Default)]
struct Counters {
    appends: AtomicU64,
    rotations: AtomicU64,
    dropped_too_large: AtomicU64,
    dropped_unavailable: AtomicU64,
    io_failures: AtomicU64,
    bytes_written: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> StoreCounters {
        StoreCounters {
            appends: self.appends.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            dropped_too_large: self.dropped_too_large.load(Ordering::Relaxed),
            dropped_unavailable: self.dropped_unavailable.load(Ordering::Relaxed),
            io_failures: self.io_failures.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

/// One named, size-bounded log backed by a primary and a backup file.
///
/// Appends are serialized by a per-store lock; separate stores never
/// contend. Share a store across threads with `Arc`.
#[derive(Debug)]
pub struct RotatingLogStore {
    identity: LogIdentity,
    directory: LogDirectory,
    config: StoreConfig,
    primary: BufferHandle,
    backup: BufferHandle,
    lock: Mutex<()>,
    counters: Counters,
}

impl RotatingLogStore {
    /// Open a store for `identity` under `directory`.
    ///
    /// Does not touch the filesystem; buffers are opened on first use.
    ///
    /// # Errors
    ///
    /// Returns [`rotalog_core::Error::InvalidConfig`] if `config` fails validation.
    pub fn open(
        directory: LogDirectory,
        identity: LogIdentity,
        config: StoreConfig,
    ) -> Result<Self> {
        config.validate()?;
        let primary = BufferHandle::new(directory.primary(identity.name()), config.handle_ttl);
        let backup = BufferHandle::new(directory.backup(identity.name()), config.handle_ttl);
        Ok(RotatingLogStore {
            identity,
            directory,
            config,
            primary,
            backup,
            lock: Mutex::new(()),
            counters: Counters::default(),
        })
    }

    /// Open a store with the default configuration.
    pub fn open_in(root: impl AsRef<Path>, name: &str, max_size_bytes: u64) -> Result<Self> {
        let identity = LogIdentity::new(name, max_size_bytes)?;
        Self::open(LogDirectory::from_root(root), identity, StoreConfig::default())
    }

    /// Append one message.
    ///
    /// Oversized entries, unavailable buffers and I/O failures are not
    /// errors: they come back as [`AppendOutcome::Dropped`].
    pub fn append(&self, message: &str) -> std::result::Result<AppendOutcome, Cancelled> {
        self.append_cancellable(message, &CancellationToken::new())
    }

    /// Append one message, observing `token` while waiting on a buffer
    /// open or the lock, and at the rotation checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `token` was cancelled at any of these points.
    pub fn append_cancellable(
        &self,
        message: &str,
        token: &CancellationToken,
    ) -> std::result::Result<AppendOutcome, Cancelled> {
        let entry = encode_entry(&self.config.separator, message);
        if let Err(e) = self.check_fits(&entry) {
            trace!(log = %self.identity.name(), error = %e, "Dropping oversized entry");
            Counters::bump(&self.counters.dropped_too_large);
            return Ok(AppendOutcome::Dropped(DropReason::TooLarge));
        }

        let (primary, backup) = match self.recover_handles_cancellable(token) {
            Ok(files) => files,
            Err(e) => {
                let e = e.into_cancelled()?;
                warn!(log = %self.identity.name(), error = %e, "Dropping entry, buffer unavailable");
                Counters::bump(&self.counters.dropped_unavailable);
                return Ok(AppendOutcome::Dropped(DropReason::Unavailable));
            }
        };

        let _guard = self.acquire(token)?;
        match self.append_locked(&entry, &primary, &backup, token) {
            Ok(rotated) => {
                Counters::bump(&self.counters.appends);
                self.counters
                    .bytes_written
                    .fetch_add(entry.len() as u64, Ordering::Relaxed);
                if rotated {
                    Ok(AppendOutcome::Rotated)
                } else {
                    Ok(AppendOutcome::Appended)
                }
            }
            Err(e) => {
                let e = e.into_cancelled()?;
                error!(log = %self.identity.name(), error = %e, "Append failed");
                Counters::bump(&self.counters.io_failures);
                Ok(AppendOutcome::Dropped(DropReason::IoFailure))
            }
        }
    }

    /// Steps 4-6 of the append sequence. Caller holds the lock.
    fn append_locked(
        &self,
        entry: &[u8],
        primary: &File,
        backup: &File,
        token: &CancellationToken,
    ) -> Result<bool> {
        let max = self.identity.max_size_bytes();
        let projected = buffer_size(primary)? + entry.len() as u64;

        let rotated = projected > max;
        if rotated {
            let copied = copy_buffer(primary, backup)?;
            token.check()?;
            primary.set_len(0)?;
            Counters::bump(&self.counters.rotations);
            debug!(log = %self.identity.name(), bytes = copied, "Rotated primary into backup");
        }

        let mut writer = primary;
        writer.write_all(entry)?;
        Ok(rotated)
    }

    /// Wait for the store lock, checking `token` between timed attempts.
    fn acquire(
        &self,
        token: &CancellationToken,
    ) -> std::result::Result<MutexGuard<'_, ()>, Cancelled> {
        loop {
            if let Some(guard) = self.lock.try_lock_for(self.config.lock_poll_interval) {
                return Ok(guard);
            }
            token.check()?;
        }
    }

    /// Step 1 of the append sequence
    fn check_fits(&self, entry: &[u8]) -> Result<()> {
        let (len, max) = (entry.len() as u64, self.identity.max_size_bytes());
        if len > max {
            return Err(Error::EntryTooLarge { len, max });
        }
        Ok(())
    }

    fn recover_handles_cancellable(
        &self,
        token: &CancellationToken,
    ) -> Result<(Arc<File>, Arc<File>)> {
        let poll = self.config.lock_poll_interval;
        let primary = self.primary.recover_cancellable(token, poll)?;
        let backup = self.backup.recover_cancellable(token, poll)?;
        Ok((primary, backup))
    }

    fn recover_handles(&self) -> Result<(Arc<File>, Arc<File>)> {
        let primary = self.primary.recover()?;
        let backup = self.backup.recover()?;
        Ok((primary, backup))
    }

    /// Recovery check on both buffers.
    ///
    /// Resets any handle whose file is missing and reopens it. Returns
    /// whether both buffers are usable afterwards.
    pub fn recover_from_error_if_possible(&self) -> bool {
        match self.recover_handles() {
            Ok(_) => true,
            Err(e) => {
                warn!(log = %self.identity.name(), error = %e, "Recovery failed");
                false
            }
        }
    }

    /// Write a bounded, newest-first snapshot of this log to `new_name`.
    ///
    /// Equivalent to merging this store alone with its own byte budget.
    /// The store itself is not modified.
    pub fn copy_contents(&self, new_name: &str) -> std::result::Result<MergeOutput, MergeError> {
        merge::merge_log_stores(
            &self.directory,
            new_name,
            self.identity.max_size_bytes(),
            &[self],
        )
    }

    /// Like [`copy_contents`](Self::copy_contents) to a fresh
    /// `<name>.<uuid>.snapshot` file.
    pub fn snapshot(&self) -> std::result::Result<MergeOutput, MergeError> {
        let name = format!("{}.{}.snapshot", self.identity.name(), Uuid::new_v4().simple());
        self.copy_contents(&name)
    }

    /// Every stored message, newest first (primary, then backup).
    ///
    /// Does not take the append lock.
    pub fn read_messages(&self) -> Result<Vec<String>> {
        self.recover_handles()?;
        let mut messages = read_messages_newest_first(self.primary.path(), self.separator())?;
        messages.extend(read_messages_newest_first(
            self.backup.path(),
            self.separator(),
        )?);
        Ok(messages)
    }

    /// Log identity
    pub fn identity(&self) -> &LogIdentity {
        &self.identity
    }

    /// Directory holding the buffers
    pub fn directory(&self) -> &LogDirectory {
        &self.directory
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Entry separator in use
    pub fn separator(&self) -> &str {
        &self.config.separator
    }

    /// Primary buffer path
    pub fn primary_path(&self) -> &Path {
        self.primary.path()
    }

    /// Backup buffer path
    pub fn backup_path(&self) -> &Path {
        self.backup.path()
    }

    /// Both buffer paths, primary first
    pub fn buffer_paths(&self) -> [PathBuf; 2] {
        [
            self.primary.path().to_path_buf(),
            self.backup.path().to_path_buf(),
        ]
    }

    /// Primary buffer state
    pub fn primary_state(&self) -> BufferState {
        self.primary.state()
    }

    /// Backup buffer state
    pub fn backup_state(&self) -> BufferState {
        self.backup.state()
    }

    /// Snapshot of cumulative counters
    pub fn counters(&self) -> StoreCounters {
        self.counters.snapshot()
    }
}
