//! The current form schema.
//!
//! Holds the field specifications from the last successfully parsed setup
//! code and resolves their defaults when a form is rendered.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::config::QuestConfig;
use crate::error::StoreError;
use crate::limits::FIELDS_STORE_KEY;
use crate::model::{normalize_name, FieldSpec};
use crate::store::PersistentStore;
use crate::util::{format_entry_timestamp, now_local};

/// Ordered field specifications for the active setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFieldRegistry {
    specs: Vec<FieldSpec>,
}

impl FormFieldRegistry {
    /// Creates an empty registry (no setup scanned yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `specs`.
    pub fn from_specs(specs: Vec<FieldSpec>) -> Self {
        Self { specs }
    }

    /// Replaces the whole schema at once.
    pub fn replace(&mut self, specs: Vec<FieldSpec>) {
        info!(fields = specs.len(), "form fields replaced");
        self.specs = specs;
    }

    /// The field specifications, in setup order.
    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    /// Looks up a field by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        let key = normalize_name(name);
        self.specs.iter().find(|s| normalize_name(&s.name) == key)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Restores the schema from the store, or starts empty if none is stored.
    pub fn load(store: &dyn PersistentStore) -> Result<Self, StoreError> {
        let Some(json) = store.get(FIELDS_STORE_KEY)? else {
            return Ok(Self::new());
        };
        let specs: Vec<FieldSpec> =
            serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
                key: FIELDS_STORE_KEY,
                reason: e.to_string(),
            })?;
        debug!(fields = specs.len(), "form fields restored");
        Ok(Self { specs })
    }

    /// Writes the schema to the store as JSON.
    pub fn persist(
        &self,
        config: &QuestConfig,
        store: &mut dyn PersistentStore,
    ) -> Result<(), StoreError> {
        Self::persist_specs(&self.specs, config, store)
    }

    pub(crate) fn persist_specs(
        specs: &[FieldSpec],
        config: &QuestConfig,
        store: &mut dyn PersistentStore,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(specs).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        store.set(FIELDS_STORE_KEY, &json, config.fields_ttl)
    }
}

/// Resolves a field's initial value, expanding `NOW()` to the current time.
pub fn resolve_default(spec: &FieldSpec) -> String {
    resolve_default_at(spec, &now_local())
}

/// Resolves a field's initial value against a fixed clock reading.
pub fn resolve_default_at(spec: &FieldSpec, now: &NaiveDateTime) -> String {
    if spec.has_now_default() {
        format_entry_timestamp(now)
    } else {
        spec.default_value.clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::store::MemoryStore;

    fn sample() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("Name", "John", true),
            FieldSpec::new("When", "NOW()", false),
        ]
    }

    #[test]
    fn test_resolve_default() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 9)
            .unwrap()
            .and_hms_opt(7, 3, 0)
            .unwrap();
        let specs = sample();
        assert_eq!(resolve_default_at(&specs[0], &now), "John");
        assert_eq!(resolve_default_at(&specs[1], &now), "06/09/2025 07:03");

        let lower = FieldSpec::new("When", "now()", false);
        assert_eq!(resolve_default_at(&lower, &now), "06/09/2025 07:03");
    }

    #[test]
    fn test_resolve_default_live_clock() {
        let value = resolve_default(&FieldSpec::new("When", "NOW()", false));
        assert_eq!(value.len(), 16);
    }

    #[test]
    fn test_get_case_insensitive() {
        let registry = FormFieldRegistry::from_specs(sample());
        assert_eq!(registry.get("name").map(|s| s.required), Some(true));
        assert!(registry.get("Age").is_none());
    }

    #[test]
    fn test_replace() {
        let mut registry = FormFieldRegistry::from_specs(sample());
        registry.replace(vec![FieldSpec::new("Site", "", false)]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.specs()[0].name, "Site");
    }

    #[test]
    fn test_persist_and_load() {
        let config = QuestConfig::default();
        let mut store = MemoryStore::new();
        assert!(FormFieldRegistry::load(&store).unwrap().is_empty());

        let registry = FormFieldRegistry::from_specs(sample());
        registry.persist(&config, &mut store).unwrap();
        assert_eq!(FormFieldRegistry::load(&store).unwrap(), registry);
    }

    #[test]
    fn test_load_corrupt_json() {
        let mut store = MemoryStore::new();
        store
            .set(FIELDS_STORE_KEY, "[{not json", std::time::Duration::from_secs(60))
            .unwrap();
        assert!(matches!(
            FormFieldRegistry::load(&store),
            Err(StoreError::Corrupt { key: FIELDS_STORE_KEY, .. })
        ));
    }
}
