//! Data model types for QUEST.
//!
//! - Field specifications (the schema from a setup code)
//! - Field values (one name/value pair)
//! - Entries (one submitted set of field values)

pub mod entry;
pub mod field;

pub use entry::Entry;
pub use field::{normalize_name, FieldSpec, FieldValue, NOW_SENTINEL};
