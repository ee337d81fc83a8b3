//! Navigation command types
//!
//! The only artifacts that cross from the input pipeline into the host
//! application.

/// Decoded rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Which encoder a rotation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Encoder 1, mapped to LEFT/RIGHT
    Horizontal,
    /// Encoder 2, mapped to UP/DOWN
    Vertical,
}

/// Abstract navigation command sent to the host application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavigationCommand {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Space,
}

impl NavigationCommand {
    /// Map a decoded rotation onto its axis command
    pub fn from_rotation(axis: Axis, direction: Direction) -> Self {
        match (axis, direction) {
            (Axis::Horizontal, Direction::Left) => NavigationCommand::Left,
            (Axis::Horizontal, Direction::Right) => NavigationCommand::Right,
            (Axis::Vertical, Direction::Left) => NavigationCommand::Up,
            (Axis::Vertical, Direction::Right) => NavigationCommand::Down,
        }
    }

    /// Returns true if this command came from an encoder rotation
    pub fn is_rotation(&self) -> bool {
        matches!(
            self,
            NavigationCommand::Left
                | NavigationCommand::Right
                | NavigationCommand::Up
                | NavigationCommand::Down
        )
    }

    /// Returns true if this command came from a button press
    pub fn is_button(&self) -> bool {
        matches!(self, NavigationCommand::Escape | NavigationCommand::Space)
    }
}

/// Delivery target for a command
///
/// UP/DOWN can drive a focused adjustable control directly; everything
/// else goes to the application's top-level input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// The UI element currently holding input focus
    Focused,
    /// The application's top-level input handler
    Root,
}

/// A navigation command together with its delivery target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoutedCommand {
    pub command: NavigationCommand,
    pub route: Route,
}
