//! Error types for QUEST parsing, encoding, accumulation and persistence.

use thiserror::Error;

/// Stable error codes, one per user-facing failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Q001: Setup code malformed or empty
    SetupParse,
    /// Q002: Field-data code malformed or empty
    FieldDataParse,
    /// Q003: Entry would overflow the export budget
    CapacityExceeded,
    /// Q004: Required field left blank
    MissingRequiredField,
    /// Q005: Field name or value contains a reserved separator
    Encode,
    /// Q006: Persistent store unavailable or holding corrupt data
    Store,
    /// Q007: Invalid configuration
    Config,
    /// Q008: Submitted entry has no non-empty fields
    EmptyEntry,
    /// Q009: Entry index does not name a stored entry
    EntryNotFound,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "Q001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::SetupParse => "Q001",
            ErrorCode::FieldDataParse => "Q002",
            ErrorCode::CapacityExceeded => "Q003",
            ErrorCode::MissingRequiredField => "Q004",
            ErrorCode::Encode => "Q005",
            ErrorCode::Store => "Q006",
            ErrorCode::Config => "Q007",
            ErrorCode::EmptyEntry => "Q008",
            ErrorCode::EntryNotFound => "Q009",
        }
    }

    /// Returns true if the user can recover by retrying (rescan, re-edit).
    pub fn is_user_recoverable(&self) -> bool {
        !matches!(self, ErrorCode::Store | ErrorCode::Config)
    }
}

/// Problem with a single `name:value:flag` segment of a setup code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("segment {index} {segment:?} has {parts} parts, expected name:value:required")]
    WrongPartCount {
        index: usize,
        segment: String,
        parts: usize,
    },

    #[error("segment {index} {segment:?} has an empty field name")]
    EmptyName { index: usize, segment: String },

    #[error("segment {index} {segment:?} has required flag {flag:?}, expected T or F")]
    InvalidRequiredFlag {
        index: usize,
        segment: String,
        flag: String,
    },
}

impl SegmentError {
    /// Index of the offending segment within the setup text.
    pub fn index(&self) -> usize {
        match self {
            SegmentError::WrongPartCount { index, .. }
            | SegmentError::EmptyName { index, .. }
            | SegmentError::InvalidRequiredFlag { index, .. } => *index,
        }
    }
}

/// Error while parsing a scanned setup code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupParseError {
    #[error("[Q001] setup code is empty")]
    Empty,

    #[error("[Q001] setup code contains no field definitions")]
    NoFields,

    #[error("[Q001] setup code has {} malformed segment(s)", .errors.len())]
    Malformed { errors: Vec<SegmentError> },
}

/// Error while parsing a scanned field-data code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldDataParseError {
    #[error("[Q002] field-data code is empty")]
    Empty,

    #[error("[Q002] field-data code has no usable name:value pairs ({segments} segment(s) skipped)")]
    Malformed { segments: usize },
}

/// Error while encoding a field or entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("[Q005] field name is empty")]
    EmptyName,

    #[error("[Q005] {field} contains reserved character {ch:?}")]
    ReservedCharacter { field: String, ch: char },
}

/// Error from the bounded entry accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccumulatorError {
    #[error("[Q003] adding this entry would exceed the QR character limit ({current_length} > {limit})")]
    CapacityExceeded { current_length: usize, limit: usize },

    #[error("[Q008] entry has no values to store")]
    EmptyEntry,

    #[error("[Q009] entry index {index} out of bounds (entries: {len})")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl AccumulatorError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AccumulatorError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            AccumulatorError::EmptyEntry => ErrorCode::EmptyEntry,
            AccumulatorError::IndexOutOfBounds { .. } => ErrorCode::EntryNotFound,
        }
    }
}

/// Submission blocked because required fields are blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[Q004] required field(s) missing: {}", .fields.join(", "))]
pub struct MissingRequiredFieldError {
    pub fields: Vec<String>,
}

/// Error from the persistent store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("[Q006] store unavailable: {0}")]
    Unavailable(String),

    #[error("[Q006] stored value under {key:?} is corrupt: {reason}")]
    Corrupt { key: &'static str, reason: String },
}

/// Error while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("[Q007] no persistent store configured")]
    MissingStore,

    #[error("[Q007] invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("[Q007] invalid config JSON: {0}")]
    Json(String),
}

/// Any failure surfaced by a [`crate::QuestSession`] operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error(transparent)]
    Setup(#[from] SetupParseError),

    #[error(transparent)]
    FieldData(#[from] FieldDataParseError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Accumulator(#[from] AccumulatorError),

    #[error(transparent)]
    MissingRequired(#[from] MissingRequiredFieldError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl QuestError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            QuestError::Setup(_) => ErrorCode::SetupParse,
            QuestError::FieldData(_) => ErrorCode::FieldDataParse,
            QuestError::Encode(_) => ErrorCode::Encode,
            QuestError::Accumulator(e) => e.code(),
            QuestError::MissingRequired(_) => ErrorCode::MissingRequiredField,
            QuestError::Store(_) => ErrorCode::Store,
            QuestError::Config(_) => ErrorCode::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err: QuestError = SetupParseError::Empty.into();
        assert_eq!(err.code().code(), "Q001");
        assert!(err.code().is_user_recoverable());

        let err: QuestError = StoreError::Unavailable("cookies disabled".into()).into();
        assert_eq!(err.code(), ErrorCode::Store);
        assert!(!err.code().is_user_recoverable());
    }

    #[test]
    fn test_messages() {
        let err = SetupParseError::Malformed {
            errors: vec![SegmentError::EmptyName {
                index: 0,
                segment: ":x:T".into(),
            }],
        };
        assert_eq!(err.to_string(), "[Q001] setup code has 1 malformed segment(s)");

        let err = MissingRequiredFieldError {
            fields: vec!["Name".into(), "Site".into()],
        };
        assert_eq!(err.to_string(), "[Q004] required field(s) missing: Name, Site");

        let err = AccumulatorError::CapacityExceeded {
            current_length: 11,
            limit: 10,
        };
        assert!(err.to_string().contains("11 > 10"));
    }

    #[test]
    fn test_accumulator_codes_are_distinct() {
        let capacity: QuestError = AccumulatorError::CapacityExceeded {
            current_length: 11,
            limit: 10,
        }
        .into();
        let empty: QuestError = AccumulatorError::EmptyEntry.into();
        let missing: QuestError = AccumulatorError::IndexOutOfBounds { index: 3, len: 0 }.into();

        assert_eq!(capacity.code().code(), "Q003");
        assert_eq!(empty.code(), ErrorCode::EmptyEntry);
        assert_eq!(empty.code().code(), "Q008");
        assert_eq!(missing.code(), ErrorCode::EntryNotFound);
        assert_eq!(missing.code().code(), "Q009");
        assert!(empty.to_string().starts_with("[Q008]"));
        assert!(missing.to_string().starts_with("[Q009]"));
        assert!(empty.code().is_user_recoverable());
        assert!(missing.code().is_user_recoverable());
    }
}
