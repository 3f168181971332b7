//! A single user's data-collection session.
//!
//! [`QuestSession`] owns the form schema, the accumulated entries, the entry
//! form being filled and the persistent store, and is the only thing that
//! mutates them. Every operation runs to completion synchronously.
//!
//! State changes are written to the store before they become visible in
//! memory, so a store failure leaves the session as it was. The one
//! exception is a setup whose schema write fails after the old entries were
//! deleted: the entries stay discarded in memory as they are in the store.

use std::fmt;

use tracing::{error, info, warn};

use crate::accumulator::{CapacityAccumulator, CapacityEstimate, CapacityObserver};
use crate::codec::{encode_entry, parse_field_data, parse_setup, FieldDataMap};
use crate::config::QuestConfig;
use crate::error::{ConfigError, QuestError, SetupParseError};
use crate::export::ExportAssembler;
use crate::form::EntryForm;
use crate::model::Entry;
use crate::registry::FormFieldRegistry;
use crate::review::ReviewCursor;
use crate::scan::{is_in_target_area, QrLocation, Rect, ScanMode, VideoGeometry};
use crate::store::PersistentStore;

/// Result of feeding one decoded scan to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A setup code replaced the schema; previous entries were discarded.
    Setup { fields: usize, discarded_entries: usize },
    /// A field-data code was merged into the open form.
    FieldData { scanned: usize, filled: usize },
}

/// Builder for [`QuestSession`].
pub struct QuestSessionBuilder {
    config: QuestConfig,
    store: Option<Box<dyn PersistentStore>>,
    observers: Vec<Box<dyn CapacityObserver>>,
}

impl QuestSessionBuilder {
    fn new() -> Self {
        Self {
            config: QuestConfig::default(),
            store: None,
            observers: Vec::new(),
        }
    }

    /// Sets the configuration (defaults otherwise).
    pub fn config(mut self, config: QuestConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the persistent store. Required.
    pub fn store(mut self, store: impl PersistentStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Registers an observer notified after every capacity change.
    pub fn observer(mut self, observer: impl CapacityObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Validates the configuration and restores persisted state.
    pub fn build(self) -> Result<QuestSession, QuestError> {
        let store = self.store.ok_or(ConfigError::MissingStore)?;
        self.config.validate()?;

        let registry = FormFieldRegistry::load(&*store)?;
        let accumulator = CapacityAccumulator::load(&self.config, &*store)?;
        info!(
            fields = registry.len(),
            payload_len = accumulator.len(),
            "session restored"
        );

        let mut session = QuestSession {
            config: self.config,
            registry,
            accumulator,
            form: None,
            mode: ScanMode::default(),
            store,
            observers: self.observers,
        };
        session.notify();
        Ok(session)
    }
}

/// Explicitly owned session state.
pub struct QuestSession {
    config: QuestConfig,
    registry: FormFieldRegistry,
    accumulator: CapacityAccumulator,
    form: Option<EntryForm>,
    mode: ScanMode,
    store: Box<dyn PersistentStore>,
    observers: Vec<Box<dyn CapacityObserver>>,
}

impl fmt::Debug for QuestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestSession")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("accumulator", &self.accumulator)
            .field("form", &self.form)
            .field("mode", &self.mode)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl QuestSession {
    pub fn builder() -> QuestSessionBuilder {
        QuestSessionBuilder::new()
    }

    pub fn config(&self) -> &QuestConfig {
        &self.config
    }

    pub fn registry(&self) -> &FormFieldRegistry {
        &self.registry
    }

    pub fn accumulator(&self) -> &CapacityAccumulator {
        &self.accumulator
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.mode
    }

    pub fn set_scan_mode(&mut self, mode: ScanMode) {
        self.mode = mode;
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Handles one decoded scan according to the current mode.
    pub fn on_decoded(&mut self, text: &str) -> Result<ScanOutcome, QuestError> {
        match self.mode {
            ScanMode::Setup => self.apply_setup(text),
            ScanMode::FieldData => self.apply_field_data(text),
        }
    }

    /// Handles a detection only if it is centred in the target box.
    ///
    /// Returns `Ok(None)` for detections outside the box.
    pub fn on_detected(
        &mut self,
        text: &str,
        location: &QrLocation,
        video: &VideoGeometry,
        target: &Rect,
    ) -> Result<Option<ScanOutcome>, QuestError> {
        if !is_in_target_area(location, video, target) {
            return Ok(None);
        }
        self.on_decoded(text).map(Some)
    }

    /// Replaces the schema from a setup code and discards all entries.
    ///
    /// A code that fails to parse changes nothing. Stored entries are deleted
    /// before the new schema is written, so the store never pairs the new
    /// schema with old entries. If the schema write fails after the delete,
    /// the entries are gone (in memory too) and the old schema stays.
    pub fn apply_setup(&mut self, text: &str) -> Result<ScanOutcome, QuestError> {
        let specs = parse_setup(text)?;
        let discarded_entries = self.accumulator.entries().len();

        CapacityAccumulator::persist("", &self.config, &mut *self.store)?;
        self.accumulator.clear();
        if discarded_entries > 0 {
            warn!(discarded_entries, "new setup discarded stored entries");
        }

        if let Err(err) = FormFieldRegistry::persist_specs(&specs, &self.config, &mut *self.store) {
            error!(%err, "new setup not stored; entries already discarded");
            self.notify();
            return Err(err.into());
        }

        let fields = specs.len();
        self.registry.replace(specs);
        self.form = None;
        self.notify();
        Ok(ScanOutcome::Setup {
            fields,
            discarded_entries,
        })
    }

    /// Fills blank fields of the open form from a field-data code.
    pub fn apply_field_data(&mut self, text: &str) -> Result<ScanOutcome, QuestError> {
        let values = parse_field_data(text)?;
        let data = FieldDataMap::from_values(&values);
        let filled = self.form_mut()?.merge_fill(&data);
        Ok(ScanOutcome::FieldData {
            scanned: values.len(),
            filled,
        })
    }

    // =========================================================================
    // Entry form
    // =========================================================================

    /// The open entry form, if any.
    pub fn form(&self) -> Option<&EntryForm> {
        self.form.as_ref()
    }

    /// The open entry form, rendering a fresh one if none is open.
    pub fn form_mut(&mut self) -> Result<&mut EntryForm, QuestError> {
        if self.registry.is_empty() {
            return Err(SetupParseError::NoFields.into());
        }
        Ok(self
            .form
            .get_or_insert_with(|| EntryForm::new(&self.registry)))
    }

    /// Discards the open form and renders a fresh one.
    pub fn new_form(&mut self) -> Result<&mut EntryForm, QuestError> {
        self.form = None;
        self.form_mut()
    }

    /// Submits the open form as a new entry.
    ///
    /// On success the form is reset to fresh defaults. On failure the form
    /// keeps its values so the user can fix them.
    pub fn add_entry(&mut self) -> Result<CapacityEstimate, QuestError> {
        let entry = self.form_mut()?.submit()?;
        let estimate = self.append_entry(&entry)?;
        if let Some(form) = self.form.as_mut() {
            form.clear();
        }
        Ok(estimate)
    }

    /// Encodes and stores an entry.
    pub fn append_entry(&mut self, entry: &Entry) -> Result<CapacityEstimate, QuestError> {
        let text = encode_entry(&entry.fields)?;
        let pending = self.accumulator.prepare_append(&text)?;
        CapacityAccumulator::persist(pending.payload(), &self.config, &mut *self.store)?;
        self.accumulator.commit(pending);
        Ok(self.notify())
    }

    /// Takes entry `index` out of storage and loads it into the form.
    ///
    /// Saving the form re-adds it at the end.
    pub fn take_entry_for_edit(&mut self, index: usize) -> Result<Entry, QuestError> {
        if self.registry.is_empty() {
            return Err(SetupParseError::NoFields.into());
        }
        let (payload, removed) = self.accumulator.prepare_remove(index)?;
        CapacityAccumulator::persist(&payload, &self.config, &mut *self.store)?;
        self.accumulator.replace_payload(payload);
        self.notify();

        let mut form = EntryForm::new(&self.registry);
        form.load_entry(&removed);
        self.form = Some(form);
        Ok(removed)
    }

    // =========================================================================
    // Stored entries
    // =========================================================================

    /// All stored entries, decoded.
    pub fn entries(&self) -> Vec<Entry> {
        self.accumulator.entries()
    }

    /// A cursor for browsing the stored entries.
    pub fn review(&self) -> ReviewCursor {
        ReviewCursor::new(self.accumulator.payload())
    }

    /// Deletes every stored entry.
    pub fn delete_all(&mut self) -> Result<(), QuestError> {
        CapacityAccumulator::persist("", &self.config, &mut *self.store)?;
        self.accumulator.clear();
        self.notify();
        Ok(())
    }

    pub fn estimate(&self) -> CapacityEstimate {
        self.accumulator.estimate()
    }

    /// Estimated number of further entries that fit.
    pub fn estimate_remaining(&self) -> usize {
        self.accumulator.estimate_remaining()
    }

    /// The export view of the stored entries.
    pub fn export(&self) -> ExportAssembler<'_> {
        ExportAssembler::new(&self.accumulator)
    }

    fn notify(&mut self) -> CapacityEstimate {
        let estimate = self.accumulator.estimate();
        for observer in &mut self.observers {
            observer.capacity_changed(&estimate);
        }
        estimate
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::{AccumulatorError, ErrorCode};
    use crate::store::MemoryStore;

    fn session() -> QuestSession {
        QuestSession::builder()
            .store(MemoryStore::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_store_is_config_error() {
        let err = QuestSession::builder().build().unwrap_err();
        assert_eq!(err, QuestError::Config(ConfigError::MissingStore));
        assert_eq!(err.code(), ErrorCode::Config);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = QuestSession::builder()
            .store(MemoryStore::new())
            .config(QuestConfig::default().with_qr_char_limit(0))
            .build()
            .unwrap_err();
        assert!(matches!(err, QuestError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_form_requires_setup() {
        let mut session = session();
        assert!(matches!(
            session.add_entry(),
            Err(QuestError::Setup(SetupParseError::NoFields))
        ));
    }

    #[test]
    fn test_failed_setup_keeps_state() {
        let mut session = session();
        session.apply_setup("Name::T").unwrap();
        session.form_mut().unwrap().set("Name", "Alice");
        session.add_entry().unwrap();

        let err = session.on_decoded("Bad:Segment").unwrap_err();
        assert_eq!(err.code(), ErrorCode::SetupParse);
        assert_eq!(session.registry().len(), 1);
        assert_eq!(session.accumulator().payload(), "Name:Alice");
    }

    #[test]
    fn test_field_data_mode() {
        let mut session = session();
        session.apply_setup("Name::T;Phone::F").unwrap();
        session.set_scan_mode(ScanMode::FieldData);

        let outcome = session.on_decoded("phone:555-1234;Other:x").unwrap();
        assert_eq!(outcome, ScanOutcome::FieldData { scanned: 2, filled: 1 });
        assert_eq!(session.form().and_then(|f| f.value("Phone")), Some("555-1234"));
    }

    #[test]
    fn test_capacity_rejection_keeps_form() {
        let mut session = QuestSession::builder()
            .store(MemoryStore::new())
            .config(QuestConfig::default().with_qr_char_limit(12))
            .build()
            .unwrap();
        session.apply_setup("Name::T").unwrap();
        session.form_mut().unwrap().set("Name", "Alexandria");

        let err = session.add_entry().unwrap_err();
        assert_eq!(
            err,
            QuestError::Accumulator(AccumulatorError::CapacityExceeded {
                current_length: 15,
                limit: 12,
            })
        );
        assert_eq!(session.form().and_then(|f| f.value("Name")), Some("Alexandria"));
        assert!(session.accumulator().is_empty());
    }

    #[test]
    fn test_observers_notified() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut session = QuestSession::builder()
            .store(MemoryStore::new())
            .config(QuestConfig::default().with_qr_char_limit(100).with_seed_entry_length(10))
            .observer(move |e: &CapacityEstimate| sink.borrow_mut().push(e.entries_left))
            .build()
            .unwrap();

        session.apply_setup("Name::T").unwrap();
        session.form_mut().unwrap().set("Name", "Alice");
        session.add_entry().unwrap();
        session.delete_all().unwrap();

        // build, setup, add, delete
        assert_eq!(*seen.borrow(), vec![10, 10, 9, 10]);
    }

    #[test]
    fn test_on_detected_ignores_misaligned() {
        let mut session = session();
        let video = VideoGeometry {
            intrinsic_width: 100.0,
            intrinsic_height: 100.0,
            display: Rect::new(0.0, 0.0, 100.0, 100.0),
        };
        let target = Rect::new(25.0, 25.0, 50.0, 50.0);
        let off = QrLocation {
            top_left: crate::scan::Point::new(0.0, 0.0),
            bottom_right: crate::scan::Point::new(10.0, 10.0),
        };
        assert_eq!(session.on_detected("Name::T", &off, &video, &target), Ok(None));
        assert!(session.registry().is_empty());

        let centred = QrLocation {
            top_left: crate::scan::Point::new(40.0, 40.0),
            bottom_right: crate::scan::Point::new(60.0, 60.0),
        };
        let outcome = session.on_detected("Name::T", &centred, &video, &target).unwrap();
        assert_eq!(
            outcome,
            Some(ScanOutcome::Setup {
                fields: 1,
                discarded_entries: 0,
            })
        );
    }
}
