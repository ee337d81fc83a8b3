//! Hardware-independent decode logic for the Oiax input pipeline
//!
//! This crate contains everything that does not depend on a GPIO subsystem
//! or an async runtime:
//!
//! - Pin value types (phase, level, transition)
//! - Transition history accumulation
//! - Quadrature pattern matching
//! - Navigation command types handed to the host application

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod decoder;
pub mod history;
pub mod pins;

pub use command::{Axis, Direction, NavigationCommand, Route, RoutedCommand};
pub use history::TransitionHistory;
pub use pins::{PinId, PinLevel, PinStateChange};
