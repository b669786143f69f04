//! Addressing modes
//!
//! A pin bar can be indexed by connector position ([`Addressing::PinBar`])
//! or by GPIO enumeration ([`Addressing::Gpio`]). The active namespace is
//! captured in an [`AddressSpace`] so offset and length always agree with
//! the selected addressing.

use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PinBarError;

/// Namespace that indices are resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Addressing {
    /// Every pin, by connector position
    #[default]
    PinBar,
    /// GPIO pins only, by GPIO enumeration
    Gpio,
}

impl FromStr for Addressing {
    type Err = PinBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pin_bar" => Ok(Addressing::PinBar),
            "gpio" => Ok(Addressing::Gpio),
            _ => Err(PinBarError::InvalidValueType),
        }
    }
}

/// Offset and length of one addressing namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressSpace {
    addressing: Addressing,
    offset: i32,
    length: usize,
}

impl AddressSpace {
    pub(crate) const fn new(addressing: Addressing, offset: i32, length: usize) -> Self {
        Self {
            addressing,
            offset,
            length,
        }
    }

    /// Addressing this space belongs to
    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// Lowest valid index
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Number of addressable pins
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check if nothing is addressable
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Check if `index` lies in `[offset, offset + length)`
    pub fn contains(&self, index: i32) -> bool {
        let index = i64::from(index);
        let offset = i64::from(self.offset);
        offset <= index && index < offset + self.length as i64
    }

    /// Namespace position of an index
    ///
    /// Returns `None` when the index is outside the space.
    pub fn position(&self, index: i32) -> Option<usize> {
        if self.contains(index) {
            Some((i64::from(index) - i64::from(self.offset)) as usize)
        } else {
            None
        }
    }

    /// Out-of-range error for an index of this space
    pub(crate) fn out_of_range(&self, index: i32, position: Option<usize>) -> PinBarError {
        PinBarError::IndexOutOfRange {
            index,
            addressing: self.addressing,
            position,
        }
    }
}
