//! GPIO driver abstraction
//!
//! Channel numbers are physical connector positions (board numbering).
//! Implementations wrap the native library of a specific platform.

/// Pin direction requested at setup time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Pin is read
    Input,
    /// Pin is driven
    Output,
}

/// Internal pull resistor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull resistor
    #[default]
    None,
    /// Pull towards ground
    Down,
    /// Pull towards supply
    Up,
}

/// Digital signal level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// Check if the level is high
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Native GPIO library
///
/// Every call may touch real hardware and cannot be undone by the caller.
pub trait GpioDriver {
    /// Error reported by the native library
    type Error: core::fmt::Debug;

    /// Claim a channel and configure its direction and pull resistor
    fn setup(&mut self, channel: i32, direction: Direction, pull: Pull) -> Result<(), Self::Error>;

    /// Release a single channel back to its reset state
    fn cleanup(&mut self, channel: i32) -> Result<(), Self::Error>;

    /// Release every channel claimed through this driver
    fn cleanup_all(&mut self) -> Result<(), Self::Error>;

    /// Read the level of a channel
    fn input(&mut self, channel: i32) -> Result<Level, Self::Error>;

    /// Drive a channel to the given level
    fn output(&mut self, channel: i32, level: Level) -> Result<(), Self::Error>;
}
