//! Pin bar layout configuration
//!
//! A [`PinBarConfig`] fully describes a bar: what every connector position
//! is wired to, how positions and GPIO pins are numbered and which
//! addressing a new bar starts in.
//!
//! Layouts can be written as TOML (with the `toml` feature):
//!
//! ```toml
//! pin_assignment = ["power", "gpio", "ground", "gpio"]
//! bar_index_offset = 1
//! gpio_order_from_ids = [4, 2]
//! initial_addressing = "gpio"
//! ```

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::addressing::Addressing;
use crate::error::PinBarError;
use crate::pin::PinKind;
use crate::MAX_PINS;

/// Layout of a pin bar
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PinBarConfig {
    /// Kind of every connector position, in bar order
    pub pin_assignment: Vec<PinKind, MAX_PINS>,
    /// Bar index of the first position
    pub bar_index_offset: i32,
    /// Bar indices of the GPIO pins in GPIO order (`None` = bar order)
    pub gpio_order_from_ids: Option<Vec<i32, MAX_PINS>>,
    /// GPIO index of the first GPIO pin
    pub gpio_index_offset: i32,
    /// Addressing a new bar starts in
    pub initial_addressing: Addressing,
}

impl PinBarConfig {
    /// Create a config with default numbering
    pub fn new(pin_assignment: &[PinKind]) -> Result<Self, PinBarError> {
        Ok(Self {
            pin_assignment: Vec::from_slice(pin_assignment)
                .map_err(|_| PinBarError::CapacityExceeded)?,
            ..Self::default()
        })
    }

    /// Number positions starting at `offset`
    pub fn with_bar_index_offset(mut self, offset: i32) -> Self {
        self.bar_index_offset = offset;
        self
    }

    /// Number GPIO pins in the order of the given bar indices
    pub fn with_gpio_order(mut self, ids: &[i32]) -> Result<Self, PinBarError> {
        self.gpio_order_from_ids =
            Some(Vec::from_slice(ids).map_err(|_| PinBarError::CapacityExceeded)?);
        Ok(self)
    }

    /// Number GPIO pins starting at `offset`
    pub fn with_gpio_index_offset(mut self, offset: i32) -> Self {
        self.gpio_index_offset = offset;
        self
    }

    /// Start in the given addressing
    pub fn with_initial_addressing(mut self, addressing: Addressing) -> Self {
        self.initial_addressing = addressing;
        self
    }

    /// Number of GPIO positions in the assignment
    pub fn num_gpio_pins(&self) -> usize {
        self.pin_assignment
            .iter()
            .filter(|&&kind| kind == PinKind::Gpio)
            .count()
    }

    /// Parse a layout from TOML
    ///
    /// Missing keys take their defaults; unknown keys are rejected.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(src: &str) -> Result<Self, PinBarError> {
        toml::from_str(src).map_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("failed to parse pin layout: {}", defmt::Debug2Format(&_e));
            PinBarError::ConfigParse
        })
    }

    /// Serialize into `buf` as postcard binary data
    ///
    /// Returns the used part of `buf`.
    #[cfg(feature = "postcard")]
    pub fn to_bytes<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], PinBarError> {
        postcard::to_slice(self, buf).map_err(|_| PinBarError::CapacityExceeded)
    }

    /// Deserialize from postcard binary data
    #[cfg(feature = "postcard")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PinBarError> {
        postcard::from_bytes(bytes).map_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::warn!("failed to decode pin layout: {}", defmt::Debug2Format(&_e));
            PinBarError::ConfigParse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PinKind::*;

    #[test]
    fn test_builder() {
        let config = PinBarConfig::new(&[Power, Gpio, Gpio])
            .unwrap()
            .with_bar_index_offset(1)
            .with_gpio_order(&[3, 2])
            .unwrap()
            .with_gpio_index_offset(4)
            .with_initial_addressing(Addressing::Gpio);

        assert_eq!(config.pin_assignment.as_slice(), [Power, Gpio, Gpio]);
        assert_eq!(config.bar_index_offset, 1);
        assert_eq!(config.gpio_order_from_ids.as_deref(), Some(&[3, 2][..]));
        assert_eq!(config.gpio_index_offset, 4);
        assert_eq!(config.initial_addressing, Addressing::Gpio);
        assert_eq!(config.num_gpio_pins(), 2);
    }

    #[test]
    fn test_defaults() {
        let config = PinBarConfig::new(&[Gpio]).unwrap();
        assert_eq!(config.bar_index_offset, 0);
        assert_eq!(config.gpio_index_offset, 0);
        assert!(config.gpio_order_from_ids.is_none());
        assert_eq!(config.initial_addressing, Addressing::PinBar);
    }

    #[test]
    fn test_capacity() {
        let assignment = [Gpio; MAX_PINS + 1];
        assert_eq!(
            PinBarConfig::new(&assignment).unwrap_err(),
            PinBarError::CapacityExceeded
        );
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_parse_toml() {
        let src = r#"
            pin_assignment = ["power", "gpio", "ground", "gpio"]
            bar_index_offset = 1
            gpio_order_from_ids = [4, 2]
            initial_addressing = "gpio"
        "#;
        let config = PinBarConfig::from_toml_str(src).unwrap();
        assert_eq!(config.pin_assignment.as_slice(), [Power, Gpio, Ground, Gpio]);
        assert_eq!(config.bar_index_offset, 1);
        assert_eq!(config.gpio_order_from_ids.as_deref(), Some(&[4, 2][..]));
        assert_eq!(config.gpio_index_offset, 0);
        assert_eq!(config.initial_addressing, Addressing::Gpio);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_parse_toml_rejects_bad_input() {
        assert_eq!(
            PinBarConfig::from_toml_str(r#"pin_assignment = ["gpoi"]"#),
            Err(PinBarError::ConfigParse)
        );
        assert_eq!(
            PinBarConfig::from_toml_str("pin_count = 4"),
            Err(PinBarError::ConfigParse)
        );
    }

    #[cfg(feature = "postcard")]
    #[test]
    fn test_binary_layout() {
        let config = PinBarConfig::new(&[Ground, Gpio, Other])
            .unwrap()
            .with_bar_index_offset(1)
            .with_initial_addressing(Addressing::Gpio);

        let mut buf = [0u8; 128];
        let bytes = config.to_bytes(&mut buf).unwrap();
        assert_eq!(PinBarConfig::from_bytes(bytes), Ok(config));

        let mut tiny = [0u8; 2];
        assert_eq!(
            PinBarConfig::new(&[Gpio; 8]).unwrap().to_bytes(&mut tiny),
            Err(PinBarError::CapacityExceeded)
        );
    }
}
