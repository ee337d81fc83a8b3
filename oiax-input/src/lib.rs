//! Async rotary-encoder navigation pipeline
//!
//! Turns debounced pin transitions from two quadrature encoders and two
//! push buttons into rate-limited [`RoutedCommand`]s for a host
//! application:
//!
//! ```text
//! monitor callback -> bounded queue -> consumer task -> matcher
//!     -> rotation flag -> poll task -> command queue -> host
//! ```
//!
//! The hardware side is reached only through the [`PinMonitor`] trait, so
//! the whole pipeline runs unmodified against a mock on the host.
//!
//! [`RoutedCommand`]: oiax_core::RoutedCommand

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod dispatcher;
pub mod encoder;
pub mod monitor;

pub use config::InputConfig;
pub use dispatcher::{
    run_horizontal, run_poll, run_vertical, ButtonPins, CommandQueue, FocusHandle, InputWiring,
    NavigationDispatcher, PipelineState, RotationFlag, ShutdownFlags,
};
pub use encoder::{EncoderPins, RotaryEncoderHandler, Shutdown, TransitionQueue};
pub use monitor::{Line, PinMonitor, Pull};
