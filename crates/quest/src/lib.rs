//! QUEST: entry encoding and capacity-bounded accumulation for QR data collection.
//!
//! A setup QR code defines a form; the user fills entries (typing or scanning
//! field-data QR codes); completed entries accumulate in a payload small
//! enough to be re-emitted as one export QR code.
//!
//! # Overview
//!
//! - **Setup codes**: `name:default:required` triplets joined by `;`
//! - **Field-data codes**: `name:value` pairs joined by `;`
//! - **Entries**: `name:value` fields joined by `|`, entries joined by `~`
//! - **Capacity**: the payload never exceeds the QR character budget (2800)
//!
//! # Quick Start
//!
//! ```rust
//! use quest::{MemoryStore, QuestSession};
//!
//! let mut session = QuestSession::builder()
//!     .store(MemoryStore::new())
//!     .build()
//!     .unwrap();
//!
//! session.apply_setup("Name::T;Age::F").unwrap();
//!
//! let form = session.form_mut().unwrap();
//! form.set("Name", "Alice");
//! form.set("Age", "30");
//! session.add_entry().unwrap();
//!
//! assert_eq!(session.export().build_export_string(), "Name:Alice|Age:30");
//! ```
//!
//! # Modules
//!
//! - [`codec`]: Setup, field-data and entry grammars
//! - [`model`]: Core data types (FieldSpec, FieldValue, Entry)
//! - [`accumulator`]: The bounded payload and its capacity estimate
//! - [`registry`]: The current form schema and default resolution
//! - [`form`]: The in-progress entry
//! - [`session`]: Explicitly owned session state tying everything together
//! - [`store`]: The persistence boundary
//! - [`error`]: Error types
//! - [`limits`]: Capacity and persistence constants

pub mod accumulator;
pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod limits;
pub mod model;
pub mod registry;
pub mod review;
pub mod scan;
pub mod session;
pub mod store;
pub mod util;

// Re-export commonly used types at crate root
pub use accumulator::{CapacityAccumulator, CapacityEstimate, CapacityObserver, PendingAppend};
pub use codec::{
    decode_all_entries, encode_entries, encode_entry, encode_field, join_entries,
    parse_field_data, parse_setup, FieldDataMap,
};
pub use config::QuestConfig;
pub use error::{
    AccumulatorError, ConfigError, EncodeError, ErrorCode, FieldDataParseError,
    MissingRequiredFieldError, QuestError, SegmentError, SetupParseError, StoreError,
};
pub use export::{ExportAssembler, QrEncoder};
pub use form::{EntryForm, FormField};
pub use model::{Entry, FieldSpec, FieldValue};
pub use registry::{resolve_default, resolve_default_at, FormFieldRegistry};
pub use review::ReviewCursor;
pub use scan::{is_in_target_area, Point, QrLocation, Rect, ScanMode, VideoGeometry};
pub use session::{QuestSession, QuestSessionBuilder, ScanOutcome};
pub use store::{MemoryStore, PersistentStore};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
