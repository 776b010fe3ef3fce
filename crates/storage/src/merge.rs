//! Bounded merge of rotating logs
//!
//! Writes the recent history of one or more stores into a single text file,
//! one message per line.
//!
//! ## Merge Sequence
//!
//! ```text
//! 1. Recovery check on every store; any failure aborts with no output
//! 2. Create or truncate the output file
//! 3. FOR store IN caller order:
//!      FOR buffer IN [primary, backup]:
//!        read buffer, split on separator, reverse (newest first)
//!        FOR message:
//!          write "message\n"; total += len + 1
//!          IF total > budget: stop this buffer
//! 4. Return the output description
//! ```
//!
//! The budget check only ends the buffer being written. Every later buffer
//! still writes its newest entry before the check stops it again, so the
//! output can exceed the budget by one line per remaining buffer.
//!
//! Ordering is newest first within a buffer and caller order across stores.
//! There is no global recency order across stores.
//!
//! Buffers are read without taking a store's append lock. A merge running
//! concurrently with an append on the same store may observe a torn buffer;
//! the torn prefix before the first separator is discarded.

use crate::buffer::read_messages_newest_first;
use crate::paths::LogDirectory;
use crate::store::RotatingLogStore;
use rotalog_core::{IdentityError, LogIdentity};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Description of a written merge output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutput {
    /// Output file path
    pub path: PathBuf,
    /// Lines written
    pub lines: usize,
    /// Bytes written, newlines included
    pub bytes_written: u64,
}

/// Merge errors
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Output name cannot be used as a file name
    #[error("Invalid output name: {0}")]
    InvalidOutputName(#[from] IdentityError),

    /// Output path is a buffer of a participating store
    #[error("Merge output {path} would overwrite a log buffer")]
    OutputIsBuffer {
        /// Conflicting path
        path: PathBuf,
    },

    /// A participating store failed its recovery check
    #[error("Store '{name}' unavailable")]
    StoreUnavailable {
        /// Name of the failing store
        name: String,
    },

    /// Output file could not be created
    #[error("Cannot create merge output at {path}: {source}")]
    Output {
        /// Output file path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: io::Error,
    },

    /// I/O failed after writing began; the output is partially written
    #[error("Merge I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Merge `stores` into `output_name` under `directory`, bounded by
/// `max_size_bytes` (soft cap, see module docs).
///
/// The output may not be a buffer of any store in `stores`
/// ([`MergeError::OutputIsBuffer`]). Buffers of stores that do not take
/// part in this merge are not checked and will be overwritten if named.
pub fn merge_log_stores(
    directory: &LogDirectory,
    output_name: &str,
    max_size_bytes: u64,
    stores: &[&RotatingLogStore],
) -> Result<MergeOutput, MergeError> {
    LogIdentity::validate_name(output_name)?;

    let path = directory.output(output_name);
    if stores
        .iter()
        .any(|store| store.buffer_paths().contains(&path))
    {
        return Err(MergeError::OutputIsBuffer { path });
    }

    for store in stores {
        if !store.recover_from_error_if_possible() {
            return Err(MergeError::StoreUnavailable {
                name: store.identity().name().to_string(),
            });
        }
    }

    let file = create_output(directory, &path).map_err(|source| MergeError::Output {
        path: path.clone(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    let mut output = MergeOutput {
        path,
        lines: 0,
        bytes_written: 0,
    };

    let result = write_stores(&mut writer, &mut output, max_size_bytes, stores)
        .and_then(|()| writer.flush());
    if let Err(e) = result {
        error!(path = ?output.path, error = %e, "Merge failed after writing began");
        return Err(MergeError::Io(e));
    }

    debug!(
        path = ?output.path,
        stores = stores.len(),
        lines = output.lines,
        bytes = output.bytes_written,
        "Merged logs"
    );
    Ok(output)
}

fn create_output(directory: &LogDirectory, path: &Path) -> io::Result<File> {
    directory.create_directories()?;
    File::create(path)
}

fn write_stores<W: Write>(
    writer: &mut W,
    output: &mut MergeOutput,
    max_size_bytes: u64,
    stores: &[&RotatingLogStore],
) -> io::Result<()> {
    for store in stores {
        for buffer in store.buffer_paths() {
            let messages = read_messages_newest_first(&buffer, store.separator())?;
            for message in messages {
                writer.write_all(message.as_bytes())?;
                writer.write_all(b"\n")?;
                output.lines += 1;
                output.bytes_written += message.len() as u64 + 1;
                if output.bytes_written > max_size_bytes {
                    break;
                }
            }
        }
    }
    Ok(())
}
