//! Browsing stored entries.

use crate::codec::decode_all_entries;
use crate::model::Entry;

/// Cursor over the decoded entries of a payload.
#[derive(Debug, Clone, Default)]
pub struct ReviewCursor {
    entries: Vec<Entry>,
    index: usize,
}

impl ReviewCursor {
    /// Decodes `payload` and positions the cursor on the first entry.
    pub fn new(payload: &str) -> Self {
        Self::from_entries(decode_all_entries(payload))
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries, index: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Index of the current entry, or `None` when there are no entries.
    pub fn index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.index)
    }

    pub fn current(&self) -> Option<&Entry> {
        self.entries.get(self.index)
    }

    /// Moves to the next entry. Returns false at the end.
    pub fn next_entry(&mut self) -> bool {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous entry. Returns false at the start.
    pub fn previous_entry(&mut self) -> bool {
        if self.index > 0 && !self.entries.is_empty() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Human-readable position, e.g. `Entry 2 of 5`.
    pub fn progress_label(&self) -> String {
        if self.entries.is_empty() {
            "No Entries".to_string()
        } else {
            format!("Entry {} of {}", self.index + 1, self.entries.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation() {
        let mut cursor = ReviewCursor::new("a:1~a:2~a:3");
        assert_eq!(cursor.len(), 3);
        assert_eq!(cursor.progress_label(), "Entry 1 of 3");
        assert!(!cursor.previous_entry());
        assert!(cursor.next_entry());
        assert!(cursor.next_entry());
        assert!(!cursor.next_entry());
        assert_eq!(cursor.current().and_then(|e| e.get("a")), Some("3"));
        assert_eq!(cursor.index(), Some(2));
        assert!(cursor.previous_entry());
        assert_eq!(cursor.progress_label(), "Entry 2 of 3");
    }

    #[test]
    fn test_empty() {
        let mut cursor = ReviewCursor::new("");
        assert!(cursor.is_empty());
        assert_eq!(cursor.index(), None);
        assert!(cursor.current().is_none());
        assert!(!cursor.next_entry());
        assert!(!cursor.previous_entry());
        assert_eq!(cursor.progress_label(), "No Entries");
    }
}
