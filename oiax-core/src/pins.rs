//! Logical pin value types
//!
//! A quadrature encoder exposes two phases, named A and B. The decode
//! pipeline only ever sees transitions as (phase, level) pairs; physical
//! line numbers stay on the monitor side of the seam.

/// Logical encoder phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinId {
    /// Phase A
    A,
    /// Phase B
    B,
}

/// Digital input level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinLevel {
    Low,
    High,
}

impl PinLevel {
    pub fn is_high(self) -> bool {
        self == PinLevel::High
    }

    pub fn is_low(self) -> bool {
        self == PinLevel::Low
    }
}

impl From<bool> for PinLevel {
    fn from(high: bool) -> Self {
        if high {
            PinLevel::High
        } else {
            PinLevel::Low
        }
    }
}

/// A single debounced transition on one encoder phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinStateChange {
    pub pin: PinId,
    pub level: PinLevel,
}

impl PinStateChange {
    pub const fn new(pin: PinId, level: PinLevel) -> Self {
        Self { pin, level }
    }
}
