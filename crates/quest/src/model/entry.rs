//! Submitted entries.

use crate::model::{normalize_name, FieldValue};

/// One completed entry: the non-empty field values in setup order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub fields: Vec<FieldValue>,
}

impl Entry {
    /// Creates an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an entry from field values, in the order given.
    pub fn from_fields(fields: impl IntoIterator<Item = FieldValue>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Appends a field value.
    pub fn push(&mut self, field: FieldValue) {
        self.fields.push(field);
    }

    /// Looks up a value by field name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = normalize_name(name);
        self.fields
            .iter()
            .find(|f| normalize_name(&f.name) == key)
            .map(|f| f.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.iter()
    }
}

impl FromIterator<FieldValue> for Entry {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        Self::from_fields(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_case_insensitive() {
        let entry = Entry::from_fields([
            FieldValue::new("Name", "Alice"),
            FieldValue::new("Age", "30"),
        ]);
        assert_eq!(entry.get("name"), Some("Alice"));
        assert_eq!(entry.get("AGE"), Some("30"));
        assert_eq!(entry.get("Email"), None);
        assert_eq!(entry.len(), 2);
    }
}
