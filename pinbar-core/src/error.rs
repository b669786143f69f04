//! Error types
//!
//! Every failure is detected synchronously at the violating call and
//! reported before any pin is touched.

use core::fmt;

use crate::addressing::Addressing;
use crate::pin::{PinKind, PinMode};

/// Failure reported by a driver while talking to the pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Channel could not be configured
    Setup { channel: i32 },
    /// Channel could not be released
    Cleanup { channel: i32 },
    /// Channel could not be read
    Input { channel: i32 },
    /// Channel could not be driven
    Output { channel: i32 },
}

/// Errors that can occur when building or accessing a pin bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinBarError {
    /// Index has an unusable shape (zero range step)
    InvalidIndexType,
    /// Index outside `[offset, offset + length)` of the addressed namespace
    IndexOutOfRange {
        index: i32,
        addressing: Addressing,
        /// Position inside a list index
        position: Option<usize>,
    },
    /// Value could not be interpreted as a mode, state or pin kind
    InvalidValueType,
    /// A value list was assigned to a single pin
    ValueIsSequence,
    /// Value list length differs from the number of addressed pins
    BroadcastSize { value_len: usize, target_len: usize },
    /// Operation not valid for the kind of this pin
    PinType {
        bar_index: i32,
        kind: PinKind,
        position: Option<usize>,
    },
    /// Operation requires a GPIO pin that is not `Off`
    ModeIsOff {
        bar_index: i32,
        position: Option<usize>,
    },
    /// An active GPIO pin inside a range was not given a value
    MissingValue {
        bar_index: i32,
        mode: PinMode,
        position: usize,
    },
    /// GPIO order is not a permutation of the GPIO positions
    InvalidGpioOrder,
    /// More pins or list entries than a bar can hold
    CapacityExceeded,
    /// Pin layout description could not be parsed
    ConfigParse,
    /// Driver failed while applying a validated change
    Driver(DriverError),
}

impl From<DriverError> for PinBarError {
    fn from(e: DriverError) -> Self {
        PinBarError::Driver(e)
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Setup { channel } => write!(f, "failed to set up channel {}", channel),
            DriverError::Cleanup { channel } => write!(f, "failed to clean up channel {}", channel),
            DriverError::Input { channel } => write!(f, "failed to read channel {}", channel),
            DriverError::Output { channel } => write!(f, "failed to drive channel {}", channel),
        }
    }
}

impl fmt::Display for PinBarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinBarError::InvalidIndexType => write!(f, "slice step cannot be zero"),
            PinBarError::IndexOutOfRange {
                index,
                addressing,
                position: None,
            } => write!(f, "index {} out of range for {:?} addressing", index, addressing),
            PinBarError::IndexOutOfRange {
                index,
                addressing,
                position: Some(position),
            } => write!(
                f,
                "index {} out of range for {:?} addressing at position {}",
                index, addressing, position
            ),
            PinBarError::InvalidValueType => write!(f, "value is not a known mode, state or pin kind"),
            PinBarError::ValueIsSequence => write!(f, "setting a single pin with a sequence"),
            PinBarError::BroadcastSize {
                value_len,
                target_len,
            } => write!(
                f,
                "could not broadcast input of size {} into size {}",
                value_len, target_len
            ),
            PinBarError::PinType {
                bar_index, kind, ..
            } => write!(f, "pin {} of kind {:?} is not a GPIO pin", bar_index, kind),
            PinBarError::ModeIsOff { bar_index, .. } => {
                write!(f, "gpio pin {} is off", bar_index)
            }
            PinBarError::MissingValue {
                bar_index,
                mode,
                position,
            } => write!(
                f,
                "no value at position {} for gpio pin {} in mode {:?}",
                position, bar_index, mode
            ),
            PinBarError::InvalidGpioOrder => write!(
                f,
                "gpio order is invalid, check for a missing gpio pin or duplicates"
            ),
            PinBarError::CapacityExceeded => write!(f, "pin bar capacity exceeded"),
            PinBarError::ConfigParse => write!(f, "pin layout could not be parsed"),
            PinBarError::Driver(e) => write!(f, "driver error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_conversion() {
        let err: PinBarError = DriverError::Output { channel: 7 }.into();
        assert_eq!(err, PinBarError::Driver(DriverError::Output { channel: 7 }));
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = PinBarError::IndexOutOfRange {
            index: 9,
            addressing: Addressing::Gpio,
            position: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "index 9 out of range for Gpio addressing at position 2"
        );

        let err = PinBarError::BroadcastSize {
            value_len: 2,
            target_len: 3,
        };
        assert_eq!(err.to_string(), "could not broadcast input of size 2 into size 3");
    }
}
