//! The in-progress entry form.
//!
//! An [`EntryForm`] is rendered from the current [`FormFieldRegistry`]: one
//! slot per field, prefilled with its resolved default. The user types
//! values, scanned field-data codes fill the slots that are still empty, and
//! [`EntryForm::submit`] turns the result into an [`Entry`].

use chrono::NaiveDateTime;
use tracing::debug;

use crate::codec::entry::{validate_name, validate_value};
use crate::codec::FieldDataMap;
use crate::error::{MissingRequiredFieldError, QuestError};
use crate::model::{normalize_name, Entry, FieldSpec, FieldValue};
use crate::registry::{resolve_default_at, FormFieldRegistry};
use crate::util::now_local;

/// One rendered field and its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub spec: FieldSpec,
    pub value: String,
}

impl FormField {
    /// Returns true if the slot holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Form state for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    fields: Vec<FormField>,
}

impl EntryForm {
    /// Renders a form for the registry's fields using the local clock.
    pub fn new(registry: &FormFieldRegistry) -> Self {
        Self::new_at(registry, &now_local())
    }

    /// Renders a form resolving `NOW()` defaults against `now`.
    pub fn new_at(registry: &FormFieldRegistry, now: &NaiveDateTime) -> Self {
        let fields = registry
            .specs()
            .iter()
            .map(|spec| FormField {
                value: resolve_default_at(spec, now),
                spec: spec.clone(),
            })
            .collect();
        Self { fields }
    }

    /// Resets every field to a freshly resolved default.
    pub fn clear(&mut self) {
        self.clear_at(&now_local());
    }

    /// Resets every field, resolving `NOW()` against `now`.
    pub fn clear_at(&mut self, now: &NaiveDateTime) {
        for field in &mut self.fields {
            field.value = resolve_default_at(&field.spec, now);
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Current value of a field (case-insensitive name).
    pub fn value(&self, name: &str) -> Option<&str> {
        self.field_index(name).map(|i| self.fields[i].value.as_str())
    }

    /// Sets a typed value. Returns false if the form has no such field.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.field_index(name) {
            Some(i) => {
                self.fields[i].value = value.into();
                true
            }
            None => false,
        }
    }

    /// Fills currently-blank fields from a scanned field-data code.
    ///
    /// Fields that already hold text are never overwritten, and empty scanned
    /// values fill nothing. Returns how many fields were filled.
    pub fn merge_fill(&mut self, data: &FieldDataMap) -> usize {
        let mut filled = 0;
        for field in self.fields.iter_mut().filter(|f| f.is_blank()) {
            if let Some(value) = data.get(&field.spec.name).filter(|v| !v.is_empty()) {
                field.value = value.to_string();
                filled += 1;
            }
        }
        debug!(filled, "merged scanned field data");
        filled
    }

    /// Prefills the form from an entry taken out of storage for editing.
    ///
    /// Fields absent from the entry were empty when it was submitted and are
    /// left empty.
    pub fn load_entry(&mut self, entry: &Entry) {
        for field in &mut self.fields {
            field.value = entry.get(&field.spec.name).unwrap_or_default().to_string();
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_required(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.spec.required && f.is_blank())
            .map(|f| f.spec.name.clone())
            .collect()
    }

    /// Validates the form and builds the entry.
    ///
    /// Values are trimmed; blank fields are omitted. Fails if a required
    /// field is blank or a name/value contains a reserved separator.
    pub fn submit(&self) -> Result<Entry, QuestError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(MissingRequiredFieldError { fields: missing }.into());
        }

        let mut entry = Entry::new();
        for field in self.fields.iter().filter(|f| !f.is_blank()) {
            let value = field.value.trim();
            validate_name(&field.spec.name)?;
            validate_value(&field.spec.name, value)?;
            entry.push(FieldValue::new(field.spec.name.clone(), value));
        }
        Ok(entry)
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        let key = normalize_name(name);
        self.fields
            .iter()
            .position(|f| normalize_name(&f.spec.name) == key)
    }
}
