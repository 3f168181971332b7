//! Field-data code parsing.
//!
//! A field-data code fills one or more form fields at once:
//! `Phone:555-1234;Site:North`. Each segment splits on its first `:` only,
//! so values may themselves contain colons. Segments without a colon or
//! with a blank name are skipped with a warning.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::codec::{NAME_VALUE_SEPARATOR, SEGMENT_SEPARATOR};
use crate::error::FieldDataParseError;
use crate::model::{normalize_name, FieldValue};

/// Parses a scanned field-data code into name/value pairs, in scan order.
pub fn parse_field_data(text: &str) -> Result<Vec<FieldValue>, FieldDataParseError> {
    if text.trim().is_empty() {
        warn!("field-data code is empty");
        return Err(FieldDataParseError::Empty);
    }

    let mut values = Vec::new();
    let mut skipped = 0;

    for segment in text.split(SEGMENT_SEPARATOR) {
        if segment.trim().is_empty() {
            continue;
        }
        let Some((name, value)) = segment.split_once(NAME_VALUE_SEPARATOR) else {
            warn!(segment, "field-data segment has no name:value separator");
            skipped += 1;
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            warn!(segment, "field-data segment has an empty name");
            skipped += 1;
            continue;
        }
        values.push(FieldValue::new(name, value.trim()));
    }

    if values.is_empty() {
        return Err(FieldDataParseError::Malformed { segments: skipped });
    }

    debug!(pairs = values.len(), skipped, "parsed field-data code");
    Ok(values)
}

/// Scanned field values keyed by normalized (trimmed, lowercased) name.
///
/// The first occurrence of a name wins when a code repeats it.
#[derive(Debug, Clone, Default)]
pub struct FieldDataMap {
    values: FxHashMap<String, String>,
}

impl FieldDataMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a lookup map from parsed field values.
    pub fn from_values(values: &[FieldValue]) -> Self {
        let mut map = Self::new();
        for fv in values {
            map.values
                .entry(normalize_name(&fv.name))
                .or_insert_with(|| fv.value.clone());
        }
        map
    }

    /// Parses a field-data code straight into a lookup map.
    pub fn parse(text: &str) -> Result<Self, FieldDataParseError> {
        parse_field_data(text).map(|values| Self::from_values(&values))
    }

    /// Looks up a scanned value by field name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&normalize_name(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_segment_skipped() {
        let values = parse_field_data("Phone:555-1234;").unwrap();
        assert_eq!(values, vec![FieldValue::new("Phone", "555-1234")]);
    }

    #[test]
    fn test_split_on_first_colon() {
        let values = parse_field_data("Time:12:30;Url:http://x").unwrap();
        assert_eq!(values[0], FieldValue::new("Time", "12:30"));
        assert_eq!(values[1], FieldValue::new("Url", "http://x"));
    }

    #[test]
    fn test_segments_without_colon_skipped() {
        let values = parse_field_data("garbage;Site:North;:orphan").unwrap();
        assert_eq!(values, vec![FieldValue::new("Site", "North")]);
    }

    #[test]
    fn test_empty_vs_malformed() {
        assert_eq!(parse_field_data(""), Err(FieldDataParseError::Empty));
        assert_eq!(parse_field_data(" ; "), Err(FieldDataParseError::Malformed { segments: 0 }));
        assert_eq!(
            parse_field_data("nocolon;:novalue"),
            Err(FieldDataParseError::Malformed { segments: 2 })
        );
    }

    #[test]
    fn test_map_lookup_case_insensitive() {
        let map = FieldDataMap::parse("PHONE:555;phone:666;Site:North").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("Phone"), Some("555"));
        assert_eq!(map.get(" site "), Some("North"));
        assert_eq!(map.get("Name"), None);
    }
}
