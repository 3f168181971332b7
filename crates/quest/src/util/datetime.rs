//! Timestamp formatting for `NOW()` field defaults.
//!
//! Entries carry local wall-clock time as `MM/DD/YYYY HH:MM` (24-hour,
//! zero-padded), the format downstream consumers of the export already parse.

use chrono::{Local, NaiveDateTime};

/// `strftime` pattern for entry timestamps.
pub const ENTRY_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Formats a local date-time as an entry timestamp.
pub fn format_entry_timestamp(at: &NaiveDateTime) -> String {
    at.format(ENTRY_TIMESTAMP_FORMAT).to_string()
}

/// Current local wall-clock time.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}
