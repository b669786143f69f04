//! Known board layouts

use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::addressing::Addressing;
use crate::error::PinBarError;
use crate::pin::PinKind::{self, Gpio, Ground, Power};

use super::PinBarConfig;

/// Raspberry Pi 40-pin header, positions 1 to 40
const RASPI_40_PIN_ASSIGNMENT: [PinKind; 40] = [
    Power, Power, Gpio, Power, // 1 - 4
    Gpio, Ground, Gpio, Gpio, // 5 - 8
    Ground, Gpio, Gpio, Gpio, // 9 - 12
    Gpio, Ground, Gpio, Gpio, // 13 - 16
    Power, Gpio, Gpio, Ground, // 17 - 20
    Gpio, Gpio, Gpio, Gpio, // 21 - 24
    Ground, Gpio, Gpio, Gpio, // 25 - 28
    Gpio, Ground, Gpio, Gpio, // 29 - 32
    Gpio, Ground, Gpio, Gpio, // 33 - 36
    Gpio, Gpio, Ground, Gpio, // 37 - 40
];

/// Header positions of BCM GPIO 0 to 27
const RASPI_40_BCM_ORDER: [i32; 28] = [
    27, 28, 3, 5, 7, 29, 31, 26, 24, 21, 19, 23, 32, 33, 8, 10, 36, 11, 12, 35, 38, 40, 15, 16,
    18, 22, 37, 13,
];

/// Boards with a built-in layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Board {
    /// Raspberry Pi with the 40-pin header, GPIO pins numbered by BCM
    Raspi40PinHeader,
}

impl Board {
    /// Kind of every header position
    pub fn pin_assignment(self) -> &'static [PinKind] {
        match self {
            Board::Raspi40PinHeader => &RASPI_40_PIN_ASSIGNMENT,
        }
    }

    /// Bar index of the first header position
    pub fn bar_index_offset(self) -> i32 {
        match self {
            Board::Raspi40PinHeader => 1,
        }
    }

    /// Header positions in GPIO order
    pub fn gpio_order(self) -> &'static [i32] {
        match self {
            Board::Raspi40PinHeader => &RASPI_40_BCM_ORDER,
        }
    }

    /// GPIO index of the first GPIO pin
    pub fn gpio_index_offset(self) -> i32 {
        match self {
            Board::Raspi40PinHeader => 0,
        }
    }

    /// Full layout of the board
    pub fn config(self, initial_addressing: Addressing) -> PinBarConfig {
        PinBarConfig {
            pin_assignment: self.pin_assignment().iter().copied().collect(),
            bar_index_offset: self.bar_index_offset(),
            gpio_order_from_ids: Some(self.gpio_order().iter().copied().collect()),
            gpio_index_offset: self.gpio_index_offset(),
            initial_addressing,
        }
    }
}

impl FromStr for Board {
    type Err = PinBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raspi_40_pin_header" => Ok(Board::Raspi40PinHeader),
            _ => Err(PinBarError::InvalidValueType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PinLayout;

    #[test]
    fn test_raspi_layout_is_valid() {
        let config = Board::Raspi40PinHeader.config(Addressing::PinBar);
        assert_eq!(config.pin_assignment.len(), 40);
        assert_eq!(config.num_gpio_pins(), 28);

        let layout = PinLayout::new(&config).unwrap();
        assert_eq!(layout.num_gpio_pins(), 28);
        assert_eq!(layout.pins()[0].bar_index(), 1);
        assert_eq!(layout.pins()[39].bar_index(), 40);
    }

    #[test]
    fn test_raspi_bcm_numbering() {
        let layout = PinLayout::new(&Board::Raspi40PinHeader.config(Addressing::Gpio)).unwrap();
        // BCM 2 and 3 are the I2C pins on header positions 3 and 5
        assert_eq!(layout.gpio_pin(2).map(|g| g.bar_index()), Some(3));
        assert_eq!(layout.gpio_pin(3).map(|g| g.bar_index()), Some(5));
        assert_eq!(layout.gpio_pin(17).map(|g| g.bar_index()), Some(11));
        assert_eq!(layout.gpio_pin(27).map(|g| g.bar_index()), Some(13));
    }

    #[test]
    fn test_parse_board() {
        assert_eq!(
            "raspi_40_pin_header".parse::<Board>(),
            Ok(Board::Raspi40PinHeader)
        );
        assert!("arduino_uno".parse::<Board>().is_err());
    }
}
