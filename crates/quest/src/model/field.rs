//! Field specifications and field values.

use serde::{Deserialize, Serialize};

/// Default value that resolves to the current local timestamp at render time.
pub const NOW_SENTINEL: &str = "NOW()";

/// One field of the form schema defined by a setup code.
///
/// Serialized with the same keys the stored form fields have always used,
/// so previously persisted setups restore unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field label, never empty.
    #[serde(rename = "fieldName")]
    pub name: String,
    /// Initial value; may be empty or the [`NOW_SENTINEL`].
    #[serde(rename = "fieldValue")]
    pub default_value: String,
    /// Whether submission requires a non-blank value.
    #[serde(rename = "fieldRequired")]
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, default_value: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            default_value: default_value.into(),
            required,
        }
    }

    /// Returns true if the default is the dynamic timestamp sentinel.
    pub fn has_now_default(&self) -> bool {
        self.default_value.eq_ignore_ascii_case(NOW_SENTINEL)
    }
}

/// Normalized lookup key for case-insensitive field name matching.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A single name/value pair, from a form field or a scanned field-data code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldValue {
    pub name: String,
    pub value: String,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
