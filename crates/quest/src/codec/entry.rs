//! Entry encoding/decoding.
//!
//! An entry encodes as `name:value` fields joined by `|`; the accumulated
//! payload is entries joined by `~`:
//!
//! ```text
//! Name:Alice|Age:30~Name:Bob|Age:25
//! ```
//!
//! Separators are not escaped. Field names may not contain `~`, `|` or `:`,
//! and values may not contain `~` or `|`. A value may contain `:` because
//! decoding splits each field on its first colon.

use tracing::debug;

use crate::codec::{ENTRY_SEPARATOR, FIELD_SEPARATOR, NAME_VALUE_SEPARATOR};
use crate::error::EncodeError;
use crate::model::{Entry, FieldValue};

const RESERVED_IN_NAME: [char; 3] = [ENTRY_SEPARATOR, FIELD_SEPARATOR, NAME_VALUE_SEPARATOR];
const RESERVED_IN_VALUE: [char; 2] = [ENTRY_SEPARATOR, FIELD_SEPARATOR];

// =============================================================================
// VALIDATION
// =============================================================================

/// Checks a field name against the reserved separators.
pub fn validate_name(name: &str) -> Result<(), EncodeError> {
    if name.trim().is_empty() {
        return Err(EncodeError::EmptyName);
    }
    check_reserved(name, &RESERVED_IN_NAME, || format!("field name {:?}", name))
}

/// Checks a field value against the reserved separators.
pub fn validate_value(name: &str, value: &str) -> Result<(), EncodeError> {
    check_reserved(value, &RESERVED_IN_VALUE, || format!("value of {:?}", name))
}

fn check_reserved(
    text: &str,
    reserved: &[char],
    field: impl FnOnce() -> String,
) -> Result<(), EncodeError> {
    match text.chars().find(|c| reserved.contains(c)) {
        Some(ch) => Err(EncodeError::ReservedCharacter { field: field(), ch }),
        None => Ok(()),
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes one field as `name:value`.
pub fn encode_field(name: &str, value: &str) -> Result<String, EncodeError> {
    validate_name(name)?;
    validate_value(name, value)?;

    let mut out = String::with_capacity(name.len() + 1 + value.len());
    out.push_str(name);
    out.push(NAME_VALUE_SEPARATOR);
    out.push_str(value);
    Ok(out)
}

/// Encodes an entry's fields in the order supplied, skipping empty values.
pub fn encode_entry(fields: &[FieldValue]) -> Result<String, EncodeError> {
    for fv in fields.iter().filter(|fv| !fv.value.is_empty()) {
        validate_name(&fv.name)?;
        validate_value(&fv.name, &fv.value)?;
    }
    Ok(render_fields(fields))
}

/// Writes fields without validation. Only for data that came out of
/// [`decode_all_entries`], which cannot contain reserved characters.
pub(crate) fn render_fields(fields: &[FieldValue]) -> String {
    let mut out = String::new();
    for fv in fields.iter().filter(|fv| !fv.value.is_empty()) {
        if !out.is_empty() {
            out.push(FIELD_SEPARATOR);
        }
        out.push_str(&fv.name);
        out.push(NAME_VALUE_SEPARATOR);
        out.push_str(&fv.value);
    }
    out
}

/// Joins already-encoded entries into one payload.
pub fn join_entries<S: AsRef<str>>(encoded: &[S]) -> String {
    let mut out = String::new();
    for (i, entry) in encoded.iter().enumerate() {
        if i > 0 {
            out.push(ENTRY_SEPARATOR);
        }
        out.push_str(entry.as_ref());
    }
    out
}

/// Encodes a sequence of entries into one payload.
pub fn encode_entries(entries: &[Entry]) -> Result<String, EncodeError> {
    let encoded = entries
        .iter()
        .map(|e| encode_entry(&e.fields))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(join_entries(&encoded))
}

// =============================================================================
// DECODING
// =============================================================================

/// Decodes a payload of `~`-separated entries.
///
/// Field pieces without a colon or with an empty name are skipped, and
/// entries that end up with no fields are omitted. Never fails.
pub fn decode_all_entries(payload: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    for piece in payload.split(ENTRY_SEPARATOR) {
        if piece.trim().is_empty() {
            continue;
        }
        let entry = decode_entry(piece);
        if !entry.is_empty() {
            entries.push(entry);
        }
    }
    entries
}

fn decode_entry(piece: &str) -> Entry {
    let mut entry = Entry::new();
    for field in piece.split(FIELD_SEPARATOR) {
        if field.trim().is_empty() {
            continue;
        }
        match field.split_once(NAME_VALUE_SEPARATOR) {
            Some((name, value)) if !name.trim().is_empty() => {
                entry.push(FieldValue::new(name, value));
            }
            _ => debug!(field, "skipping undecodable field"),
        }
    }
    entry
}
