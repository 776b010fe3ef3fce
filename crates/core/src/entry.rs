//! On-disk entry encoding
//!
//! ```text
//! ┌───────────┬─────────────┬───────────┬─────────────┬─────
//! │ SEPARATOR │ message ... │ SEPARATOR │ message ... │ ...
//! └───────────┴─────────────┴───────────┴─────────────┴─────
//! ```
//!
//! Entries are concatenated with no trailing delimiter. Boundaries are
//! defined only by the next occurrence of the separator, so a message that
//! contains the separator is split on read. No escaping is performed.

/// Separator written before every message unless configured otherwise.
pub const DEFAULT_SEPARATOR: &str = "\u{1e}\u{241e}\u{1e}";

/// Encode one entry: separator immediately followed by the message bytes.
pub fn encode_entry(separator: &str, message: &str) -> Vec<u8> {
    let mut entry = Vec::with_capacity(encoded_len(separator, message));
    entry.extend_from_slice(separator.as_bytes());
    entry.extend_from_slice(message.as_bytes());
    entry
}

/// Encoded length of one entry in bytes.
pub fn encoded_len(separator: &str, message: &str) -> usize {
    separator.len() + message.len()
}

/// Decode a buffer into messages, oldest first.
///
/// Anything before the first separator (a torn or foreign prefix) is
/// discarded. Invalid UTF-8 is replaced lossily.
///
/// `separator` must be non-empty, which [`StoreConfig::validate`] enforces.
///
/// [`StoreConfig::validate`]: crate::StoreConfig::validate
pub fn decode_entries(separator: &str, content: &[u8]) -> Vec<String> {
    debug_assert!(!separator.is_empty(), "empty separator");
    let text = String::from_utf8_lossy(content);
    text.split(separator).skip(1).map(str::to_string).collect()
}
