//! Capacity limits and persistence constants.
//!
//! These values must match the ones used by existing exported data and by
//! the downstream scanner that reads the export QR code.

use std::time::Duration;

/// Practical character budget of a single export QR code.
pub const QR_CHAR_LIMIT: usize = 2800;

/// Starting value for the largest-entry estimate before any entry is added.
pub const SEED_ENTRY_LENGTH: usize = 50;

/// Store key holding the accumulated entry payload.
pub const ENTRY_STORE_KEY: &str = "questEntryContent";

/// Store key holding the JSON-encoded field specifications.
pub const FIELDS_STORE_KEY: &str = "questFormFields";

/// Lifetime of the stored entry payload.
pub const ENTRY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Lifetime of the stored field specifications.
pub const FIELDS_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Counts characters the way the capacity budget does: UTF-16 code units,
/// so a character outside the Basic Multilingual Plane counts as two.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_utf16_units() {
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("Name:Alice"), 10);
        assert_eq!(char_len("caf\u{e9}"), 4);
        // Astral characters take a surrogate pair.
        assert_eq!(char_len("\u{1F600}"), 2);
        assert_eq!(char_len("Mood:\u{1F600}"), 7);
    }
}
