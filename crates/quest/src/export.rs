//! Export of the accumulated payload.
//!
//! The accumulated payload is the export string. Nothing is re-encoded,
//! escaped or compressed between storage and the QR encoder.

use tracing::debug;

use crate::accumulator::CapacityAccumulator;

/// Turns text into a QR symbol. Implemented outside this crate.
pub trait QrEncoder {
    type Image;
    type Error;

    fn encode(&self, text: &str) -> Result<Self::Image, Self::Error>;
}

/// Hands the accumulated payload to the QR encoder verbatim.
#[derive(Debug, Clone, Copy)]
pub struct ExportAssembler<'a> {
    accumulator: &'a CapacityAccumulator,
}

impl<'a> ExportAssembler<'a> {
    pub fn new(accumulator: &'a CapacityAccumulator) -> Self {
        Self { accumulator }
    }

    /// Returns true if there is nothing to export.
    pub fn is_empty(&self) -> bool {
        self.accumulator.is_empty()
    }

    /// The export string: the raw accumulated payload.
    pub fn build_export_string(&self) -> String {
        self.accumulator.payload().to_string()
    }

    /// Encodes the export string, or returns `None` when there are no entries.
    pub fn encode_with<E: QrEncoder>(&self, encoder: &E) -> Result<Option<E::Image>, E::Error> {
        if self.is_empty() {
            return Ok(None);
        }
        let payload = self.accumulator.payload();
        debug!(len = self.accumulator.len(), "encoding export payload");
        encoder.encode(payload).map(Some)
    }
}
