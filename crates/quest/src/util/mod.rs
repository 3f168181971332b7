//! Utility modules for QUEST.

pub mod datetime;

pub use datetime::{format_entry_timestamp, now_local, ENTRY_TIMESTAMP_FORMAT};
