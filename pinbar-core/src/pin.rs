//! Pin model
//!
//! A pin bar is made of [`Pin`]s with a fixed position and kind. Pins of
//! kind [`PinKind::Gpio`] additionally carry a [`GpioPin`] record with
//! their GPIO enumeration index and current mode.

use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PinBarError;

/// What a connector position is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PinKind {
    /// Supply voltage
    Power,
    /// Ground reference
    Ground,
    /// General purpose I/O
    Gpio,
    /// Anything else (ID EEPROM, reserved, ...)
    Other,
}

/// Configured direction and pull of a GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PinMode {
    /// Not configured; the pin has no readable state
    #[default]
    Off,
    /// Input without pull resistor
    In,
    /// Input with pull-down resistor
    InPullDown,
    /// Input with pull-up resistor
    InPullUp,
    /// Push-pull output
    Out,
}

impl PinMode {
    /// Check if the pin has a readable state in this mode
    pub fn is_active(self) -> bool {
        self != PinMode::Off
    }
}

/// Electrical level of a GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PinState {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl PinState {
    /// Check if the state is high
    pub fn is_high(self) -> bool {
        self == PinState::High
    }
}

impl From<bool> for PinState {
    fn from(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

impl FromStr for PinKind {
    type Err = PinBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "power" => Ok(PinKind::Power),
            "ground" => Ok(PinKind::Ground),
            "gpio" => Ok(PinKind::Gpio),
            "other" => Ok(PinKind::Other),
            _ => Err(PinBarError::InvalidValueType),
        }
    }
}

impl FromStr for PinMode {
    type Err = PinBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(PinMode::Off),
            "in" => Ok(PinMode::In),
            "in_pull_down" => Ok(PinMode::InPullDown),
            "in_pull_up" => Ok(PinMode::InPullUp),
            "out" => Ok(PinMode::Out),
            _ => Err(PinBarError::InvalidValueType),
        }
    }
}

impl FromStr for PinState {
    type Err = PinBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(PinState::Low),
            "high" => Ok(PinState::High),
            _ => Err(PinBarError::InvalidValueType),
        }
    }
}

/// A connector position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    bar_index: i32,
    kind: PinKind,
}

impl Pin {
    pub(crate) const fn new(bar_index: i32, kind: PinKind) -> Self {
        Self { bar_index, kind }
    }

    /// Permanent position on the connector (bar offset included)
    pub fn bar_index(&self) -> i32 {
        self.bar_index
    }

    /// What the position is wired to
    pub fn kind(&self) -> PinKind {
        self.kind
    }

    /// Check if the pin is a GPIO pin
    pub fn is_gpio(&self) -> bool {
        self.kind == PinKind::Gpio
    }
}

/// Controllable part of a GPIO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioPin {
    bar_index: i32,
    gpio_index: i32,
    mode: PinMode,
}

impl GpioPin {
    pub(crate) const fn new(bar_index: i32, gpio_index: i32) -> Self {
        Self {
            bar_index,
            gpio_index,
            mode: PinMode::Off,
        }
    }

    /// Position on the connector (bar offset included)
    pub fn bar_index(&self) -> i32 {
        self.bar_index
    }

    /// Position in the GPIO enumeration (GPIO offset included)
    pub fn gpio_index(&self) -> i32 {
        self.gpio_index
    }

    /// Current mode
    pub fn mode(&self) -> PinMode {
        self.mode
    }

    /// Record a new mode
    ///
    /// Drivers call this once the hardware actually is in `mode`.
    pub fn set_mode(&mut self, mode: PinMode) {
        self.mode = mode;
    }
}

/// A resolved pin: its position record plus the GPIO record if it has one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinRef {
    /// Connector position
    pub pin: Pin,
    /// GPIO record (only for [`PinKind::Gpio`])
    pub gpio: Option<GpioPin>,
}

impl PinRef {
    /// Mode of the pin, or `None` for non-GPIO pins
    pub fn mode(&self) -> Option<PinMode> {
        self.gpio.map(|g| g.mode())
    }

    /// GPIO record if the pin is a GPIO pin with a readable state
    pub fn active_gpio(&self) -> Option<GpioPin> {
        self.gpio.filter(|g| g.mode().is_active())
    }
}
