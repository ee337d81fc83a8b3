//! Quadrature pattern matcher
//!
//! Stateless classifier over a transition history. Two pattern families:
//! the clean 4-edge detent sequence, and a dirty fallback that trusts the
//! first observed falling edge once more than 4 noisy edges have
//! accumulated. Bouncy encoders often never produce the clean sequence at
//! all; the fallback is what keeps them usable.
//!
//! Pattern lengths and the match order are empirically tuned constants.
//! Do not re-derive them.

use crate::command::Direction;
use crate::pins::{PinId, PinLevel, PinStateChange};

/// Clean RIGHT detent: phase B falls first
const CLEAN_RIGHT: &[PinStateChange] = &[
    PinStateChange::new(PinId::B, PinLevel::Low),
    PinStateChange::new(PinId::A, PinLevel::Low),
    PinStateChange::new(PinId::B, PinLevel::High),
    PinStateChange::new(PinId::A, PinLevel::High),
];

/// Clean LEFT detent: phase A falls first
const CLEAN_LEFT: &[PinStateChange] = &[
    PinStateChange::new(PinId::A, PinLevel::Low),
    PinStateChange::new(PinId::B, PinLevel::Low),
    PinStateChange::new(PinId::A, PinLevel::High),
    PinStateChange::new(PinId::B, PinLevel::High),
];

/// Edge count beyond which the dirty fallback applies
const DIRTY_THRESHOLD: usize = 4;

/// Match a transition history against the rotation patterns.
///
/// Match order resolves ambiguity and must stay fixed: clean RIGHT, clean
/// LEFT, then (only past [`DIRTY_THRESHOLD`] edges) dirty RIGHT, dirty
/// LEFT. Returns `None` for an empty, partial, or unclassifiable history;
/// the caller keeps accumulating. On `Some`, the caller must clear the
/// history before feeding the next transition.
pub fn decode(history: &[PinStateChange]) -> Option<Direction> {
    if history == CLEAN_RIGHT {
        return Some(Direction::Right);
    }
    if history == CLEAN_LEFT {
        return Some(Direction::Left);
    }
    if history.len() > DIRTY_THRESHOLD {
        // Trust the first falling edge as the direction signal
        if history[0] == CLEAN_RIGHT[0] {
            return Some(Direction::Right);
        }
        if history[0] == CLEAN_LEFT[0] {
            return Some(Direction::Left);
        }
    }
    None
}
