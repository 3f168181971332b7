//! Bounded accumulation of encoded entries.
//!
//! The accumulator owns the export payload: encoded entries joined by `~`.
//! Its length never exceeds the configured character budget after a
//! successful mutation, and a rejected append leaves it untouched.
//!
//! Alongside the payload it tracks the largest single increment appended so
//! far (seeded at 50), which drives the advisory "entries left" estimate.

use tracing::{debug, info, warn};

use crate::codec::entry::render_fields;
use crate::codec::{decode_all_entries, join_entries, ENTRY_SEPARATOR};
use crate::config::QuestConfig;
use crate::error::{AccumulatorError, StoreError};
use crate::limits::{char_len, ENTRY_STORE_KEY};
use crate::model::Entry;
use crate::store::PersistentStore;

/// Snapshot of how much of the budget is used and what is likely to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityEstimate {
    /// Characters currently in the payload.
    pub used: usize,
    /// The character budget.
    pub limit: usize,
    /// `limit - used`.
    pub remaining: usize,
    /// Largest increment appended so far (or the seed).
    pub largest_entry_length: usize,
    /// `round(remaining / largest_entry_length)`, never negative.
    pub entries_left: usize,
}

impl CapacityEstimate {
    fn compute(used: usize, limit: usize, largest_entry_length: usize) -> Self {
        let remaining = limit.saturating_sub(used);
        let entries_left = if remaining == 0 || largest_entry_length == 0 {
            0
        } else {
            (remaining as f64 / largest_entry_length as f64).round() as usize
        };
        Self {
            used,
            limit,
            remaining,
            largest_entry_length,
            entries_left,
        }
    }
}

/// Receives a fresh estimate after every change to the payload.
pub trait CapacityObserver {
    fn capacity_changed(&mut self, estimate: &CapacityEstimate);
}

impl<F: FnMut(&CapacityEstimate)> CapacityObserver for F {
    fn capacity_changed(&mut self, estimate: &CapacityEstimate) {
        self(estimate)
    }
}

/// An append that passed the capacity check but is not yet visible.
///
/// Lets a caller persist the candidate payload first and only then
/// [`commit`](CapacityAccumulator::commit) it, so a failed store write
/// leaves the accumulator unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAppend {
    candidate: String,
    candidate_len: usize,
    increment_len: usize,
}

impl PendingAppend {
    /// The payload as it will be after the append.
    pub fn payload(&self) -> &str {
        &self.candidate
    }
}

/// The bounded entry store.
#[derive(Debug, Clone)]
pub struct CapacityAccumulator {
    payload: String,
    payload_len: usize,
    largest_entry_length: usize,
    seed_entry_length: usize,
    limit: usize,
}

impl CapacityAccumulator {
    /// Creates an empty accumulator.
    pub fn new(config: &QuestConfig) -> Self {
        Self::with_limit(config.qr_char_limit, config.seed_entry_length)
    }

    /// Creates an empty accumulator with an explicit budget and seed.
    pub fn with_limit(limit: usize, seed_entry_length: usize) -> Self {
        Self {
            payload: String::new(),
            payload_len: 0,
            largest_entry_length: seed_entry_length,
            seed_entry_length,
            limit,
        }
    }

    /// Rebuilds an accumulator around an existing payload.
    ///
    /// The largest-entry estimate restarts at the seed.
    pub fn from_payload(config: &QuestConfig, payload: String) -> Result<Self, AccumulatorError> {
        let payload_len = char_len(&payload);
        if payload_len > config.qr_char_limit {
            return Err(AccumulatorError::CapacityExceeded {
                current_length: payload_len,
                limit: config.qr_char_limit,
            });
        }
        Ok(Self {
            payload,
            payload_len,
            ..Self::new(config)
        })
    }

    /// The raw accumulated payload.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Payload length as counted against the limit (UTF-16 code units).
    pub fn len(&self) -> usize {
        self.payload_len
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn largest_entry_length(&self) -> usize {
        self.largest_entry_length
    }

    /// Appends an encoded entry, or fails without changing anything.
    pub fn append(&mut self, entry_text: &str) -> Result<(), AccumulatorError> {
        let pending = self.prepare_append(entry_text)?;
        self.commit(pending);
        Ok(())
    }

    /// Runs the capacity check for an append without applying it.
    pub fn prepare_append(&self, entry_text: &str) -> Result<PendingAppend, AccumulatorError> {
        if entry_text.is_empty() {
            return Err(AccumulatorError::EmptyEntry);
        }

        let mut candidate = String::with_capacity(self.payload.len() + 1 + entry_text.len());
        candidate.push_str(&self.payload);
        let mut increment_len = char_len(entry_text);
        if !self.payload.is_empty() {
            candidate.push(ENTRY_SEPARATOR);
            increment_len += 1;
        }
        candidate.push_str(entry_text);

        let candidate_len = self.payload_len + increment_len;
        if candidate_len > self.limit {
            warn!(
                current_length = candidate_len,
                limit = self.limit,
                "entry rejected: would exceed QR character limit"
            );
            return Err(AccumulatorError::CapacityExceeded {
                current_length: candidate_len,
                limit: self.limit,
            });
        }

        Ok(PendingAppend {
            candidate,
            candidate_len,
            increment_len,
        })
    }

    /// Applies a prepared append.
    pub fn commit(&mut self, pending: PendingAppend) {
        self.payload = pending.candidate;
        self.payload_len = pending.candidate_len;
        if pending.increment_len > self.largest_entry_length {
            self.largest_entry_length = pending.increment_len;
            debug!(largest = self.largest_entry_length, "largest entry length updated");
        }
    }

    /// Decodes the payload into entries.
    pub fn entries(&self) -> Vec<Entry> {
        decode_all_entries(&self.payload)
    }

    /// Removes the entry at `index` (in decoded order) and returns it.
    ///
    /// The payload is re-encoded from the remaining entries. The largest-entry
    /// estimate is left as is.
    pub fn remove_at(&mut self, index: usize) -> Result<Entry, AccumulatorError> {
        let (payload, removed) = self.prepare_remove(index)?;
        self.replace_payload(payload);
        Ok(removed)
    }

    /// Computes the payload that results from removing entry `index`.
    pub fn prepare_remove(&self, index: usize) -> Result<(String, Entry), AccumulatorError> {
        let mut entries = self.entries();
        if index >= entries.len() {
            return Err(AccumulatorError::IndexOutOfBounds {
                index,
                len: entries.len(),
            });
        }
        let removed = entries.remove(index);
        let encoded: Vec<String> = entries.iter().map(|e| render_fields(&e.fields)).collect();
        Ok((join_entries(&encoded), removed))
    }

    /// Overwrites the payload with a shrunken one (no capacity check).
    pub(crate) fn replace_payload(&mut self, payload: String) {
        self.payload_len = char_len(&payload);
        self.payload = payload;
    }

    /// Empties the payload and resets the largest-entry estimate to the seed.
    pub fn clear(&mut self) {
        self.payload.clear();
        self.payload_len = 0;
        self.largest_entry_length = self.seed_entry_length;
        info!("accumulated entries cleared");
    }

    /// Current capacity estimate.
    pub fn estimate(&self) -> CapacityEstimate {
        CapacityEstimate::compute(self.payload_len, self.limit, self.largest_entry_length)
    }

    /// Estimated number of further entries that fit.
    pub fn estimate_remaining(&self) -> usize {
        self.estimate().entries_left
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Restores the payload from the store, or starts empty if none is stored.
    pub fn load(config: &QuestConfig, store: &dyn PersistentStore) -> Result<Self, StoreError> {
        match store.get(ENTRY_STORE_KEY)? {
            Some(payload) => {
                Self::from_payload(config, payload).map_err(|e| StoreError::Corrupt {
                    key: ENTRY_STORE_KEY,
                    reason: e.to_string(),
                })
            }
            None => Ok(Self::new(config)),
        }
    }

    /// Writes `payload` (current or pending) to the store.
    pub fn persist(
        payload: &str,
        config: &QuestConfig,
        store: &mut dyn PersistentStore,
    ) -> Result<(), StoreError> {
        if payload.is_empty() {
            store.delete(ENTRY_STORE_KEY)
        } else {
            store.set(ENTRY_STORE_KEY, payload, config.entry_ttl)
        }
    }
}
