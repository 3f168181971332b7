//! Text encodings for QUEST.
//!
//! Two scanned grammars (setup codes and field-data codes) and the entry
//! encoding used for the accumulated export payload. The separator
//! characters below are part of the interchange format.

pub mod entry;
pub mod field_data;
pub mod setup;

/// Separates entries in the accumulated payload.
pub const ENTRY_SEPARATOR: char = '~';

/// Separates fields within one encoded entry.
pub const FIELD_SEPARATOR: char = '|';

/// Separates a field name from its value.
pub const NAME_VALUE_SEPARATOR: char = ':';

/// Separates segments of setup and field-data codes.
pub const SEGMENT_SEPARATOR: char = ';';

/// Separates the name, default and required flag within a setup segment.
pub const TRIPLET_SEPARATOR: char = ':';

pub use entry::{decode_all_entries, encode_entries, encode_entry, encode_field, join_entries};
pub use field_data::{parse_field_data, FieldDataMap};
pub use setup::parse_setup;
