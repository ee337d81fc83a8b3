//! Transition history for one encoder
//!
//! Ordered record of recent pin transitions, appended by the consumer task
//! and cleared whenever a direction decodes. Single-writer/single-reader
//! for its whole lifetime; the producer side never touches it.

use heapless::Vec;

use crate::pins::PinStateChange;

/// Maximum retained transitions before the history self-resets
pub const HISTORY_CAPACITY: usize = 16;

/// Append-only transition record, reset on every successful decode
#[derive(Debug, Default, Clone)]
pub struct TransitionHistory {
    entries: Vec<PinStateChange, HISTORY_CAPACITY>,
}

impl TransitionHistory {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a transition.
    ///
    /// Every rotation pattern keys off the first recorded element, so a
    /// history that reached capacity without decoding can never decode at
    /// all. Saturation therefore discards the record and the new transition
    /// starts a fresh window.
    pub fn push(&mut self, change: PinStateChange) {
        if self.entries.is_full() {
            self.entries.clear();
        }
        let _ = self.entries.push(change);
    }

    /// Discard all recorded transitions
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[PinStateChange] {
        &self.entries
    }
}
