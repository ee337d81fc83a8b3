//! Pipeline tuning constants
//!
//! The debounce and poll periods are carried over from the tuned hardware
//! values; treat them as empirical constants rather than re-deriving them.

use embassy_time::Duration;

/// Software debounce applied to every registered input (ms)
pub const DEBOUNCE_MS: u64 = 100;

/// Poll period bounding command dispatch to 10 Hz per axis (ms)
pub const POLL_PERIOD_MS: u64 = 100;

/// Transition queue depth per encoder
pub const QUEUE_DEPTH: usize = 1000;

/// Outbound command queue depth
pub const COMMAND_QUEUE_DEPTH: usize = 16;

/// Input pipeline configuration
#[derive(Debug, Clone, Copy)]
pub struct InputConfig {
    /// Debounce interval for every registered pin
    pub debounce: Duration,
    /// Rotation flag sampling period
    pub poll_period: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            poll_period: Duration::from_millis(POLL_PERIOD_MS),
        }
    }
}
