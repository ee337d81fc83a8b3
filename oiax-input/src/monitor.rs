//! GPIO monitor seam
//!
//! The pipeline never touches hardware directly. A platform layer
//! implements [`PinMonitor`] over its GPIO subsystem and delivers settled
//! levels through the registered callback after each debounced edge. The
//! callback may run in an arbitrary interrupt or thread context and must
//! not block.

use embassy_time::Duration;

use oiax_core::PinLevel;

/// Physical GPIO line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Line(pub u8);

/// Input bias configuration
///
/// Both wiring variants appear in the field: encoders and buttons are
/// found wired active-low with pull-ups as well as active-high with
/// pull-downs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    Up,
    Down,
}

/// Debounced digital input provider
///
/// A provisioning failure means a physical input is missing; it cannot
/// self-heal, so callers treat it as fatal at startup and abort
/// initialization instead of retrying.
pub trait PinMonitor {
    /// Token returned by registration, used to release the line
    type Handle;
    /// Platform provisioning error
    type Error: core::fmt::Debug;

    /// Register a debounced digital input.
    ///
    /// `on_transition` receives the settled level after each debounced
    /// edge. It runs in the monitor's delivery context and must return
    /// without blocking.
    fn register_debounced_input<F>(
        &mut self,
        line: Line,
        pull: Pull,
        debounce: Duration,
        on_transition: F,
    ) -> Result<Self::Handle, Self::Error>
    where
        F: Fn(PinLevel) + Send + Sync + 'static;

    /// Release a previously registered line
    fn unprovision(&mut self, handle: Self::Handle);
}
