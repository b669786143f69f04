//! Value validation
//!
//! Checks that an [`Assignment`] fits the pins an index resolved to before
//! anything is handed to a driver. A batch is either accepted as a whole or
//! rejected without side effects.

use heapless::Vec;

use crate::error::PinBarError;
use crate::index::IndexKind;
use crate::pin::{GpioPin, PinMode, PinRef, PinState};
use crate::MAX_PINS;

/// Value written through a mode or state accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Assignment<'a, T> {
    /// Broadcast one value to every addressed pin
    One(T),
    /// One entry per addressed pin; `None` marks a pin that is left alone
    Each(&'a [Option<T>]),
}

impl From<PinMode> for Assignment<'_, PinMode> {
    fn from(mode: PinMode) -> Self {
        Assignment::One(mode)
    }
}

impl From<PinState> for Assignment<'_, PinState> {
    fn from(state: PinState) -> Self {
        Assignment::One(state)
    }
}

impl<'a, T> From<&'a [Option<T>]> for Assignment<'a, T> {
    fn from(values: &'a [Option<T>]) -> Self {
        Assignment::Each(values)
    }
}

impl<'a, T, const N: usize> From<&'a [Option<T>; N]> for Assignment<'a, T> {
    fn from(values: &'a [Option<T>; N]) -> Self {
        Assignment::Each(values)
    }
}

/// A validated batch ready for a driver
pub(crate) struct Batch<T> {
    pub pins: Vec<GpioPin, MAX_PINS>,
    pub values: Vec<T, MAX_PINS>,
}

fn entry_position(kind: IndexKind, position: usize) -> Option<usize> {
    match kind {
        IndexKind::Single => None,
        IndexKind::Span | IndexKind::List => Some(position),
    }
}

/// Every addressed pin must be a GPIO pin
pub(crate) fn require_gpio(kind: IndexKind, pins: &[PinRef]) -> Result<(), PinBarError> {
    for (position, pin) in pins.iter().enumerate() {
        if pin.gpio.is_none() {
            return Err(PinBarError::PinType {
                bar_index: pin.pin.bar_index(),
                kind: pin.pin.kind(),
                position: entry_position(kind, position),
            });
        }
    }
    Ok(())
}

/// Every addressed GPIO pin must have a mode other than `Off`
pub(crate) fn require_active(kind: IndexKind, pins: &[PinRef]) -> Result<(), PinBarError> {
    for (position, pin) in pins.iter().enumerate() {
        if pin.mode() == Some(PinMode::Off) {
            return Err(PinBarError::ModeIsOff {
                bar_index: pin.pin.bar_index(),
                position: entry_position(kind, position),
            });
        }
    }
    Ok(())
}

/// Check the shape of an assignment and apply `rule` to every entry
fn check_entries<T: Copy>(
    assignment: &Assignment<'_, T>,
    kind: IndexKind,
    pins: &[PinRef],
    rule: impl Fn(Option<T>, &PinRef, usize) -> Result<(), PinBarError>,
) -> Result<(), PinBarError> {
    let values = match assignment {
        Assignment::One(_) => return Ok(()),
        Assignment::Each(values) => values,
    };

    if kind == IndexKind::Single {
        return Err(PinBarError::ValueIsSequence);
    }

    if values.len() != pins.len() {
        return Err(PinBarError::BroadcastSize {
            value_len: values.len(),
            target_len: pins.len(),
        });
    }

    for (position, (value, pin)) in values.iter().zip(pins).enumerate() {
        if kind == IndexKind::List && value.is_none() {
            return Err(PinBarError::PinType {
                bar_index: pin.pin.bar_index(),
                kind: pin.pin.kind(),
                position: Some(position),
            });
        }
        rule(*value, pin, position)?;
    }
    Ok(())
}

/// Check a mode assignment
///
/// Entries must be `Some` exactly for the GPIO pins.
pub(crate) fn check_modes(
    assignment: &Assignment<'_, PinMode>,
    kind: IndexKind,
    pins: &[PinRef],
) -> Result<(), PinBarError> {
    check_entries(assignment, kind, pins, |value, pin, position| {
        match (value, pin.gpio) {
            (None, Some(_)) | (Some(_), None) => Err(PinBarError::PinType {
                bar_index: pin.pin.bar_index(),
                kind: pin.pin.kind(),
                position: Some(position),
            }),
            _ => Ok(()),
        }
    })
}

/// Check a state assignment
///
/// Entries must be `Some` exactly for the GPIO pins that are not `Off`.
pub(crate) fn check_states(
    assignment: &Assignment<'_, PinState>,
    kind: IndexKind,
    pins: &[PinRef],
) -> Result<(), PinBarError> {
    check_entries(assignment, kind, pins, |value, pin, position| {
        match (value, pin.gpio) {
            (Some(_), None) => Err(PinBarError::PinType {
                bar_index: pin.pin.bar_index(),
                kind: pin.pin.kind(),
                position: Some(position),
            }),
            (Some(_), Some(gpio)) if !gpio.mode().is_active() => Err(PinBarError::ModeIsOff {
                bar_index: pin.pin.bar_index(),
                position: Some(position),
            }),
            (None, Some(gpio)) if gpio.mode().is_active() => Err(PinBarError::MissingValue {
                bar_index: pin.pin.bar_index(),
                mode: gpio.mode(),
                position,
            }),
            _ => Ok(()),
        }
    })
}

/// Pair the pins picked by `select` with their values, in index order
///
/// Every pin appears once; a repeated pin takes the last value given.
///
/// The assignment must already be checked, so `Each` entries are `Some`
/// exactly where `select` picks a pin.
pub(crate) fn batch<T: Copy>(
    assignment: &Assignment<'_, T>,
    pins: &[PinRef],
    select: impl Fn(&PinRef) -> Option<GpioPin>,
) -> Result<Batch<T>, PinBarError> {
    let mut batch = Batch {
        pins: Vec::new(),
        values: Vec::new(),
    };

    for (position, pin) in pins.iter().enumerate() {
        let value = match assignment {
            Assignment::One(value) => Some(*value),
            Assignment::Each(values) => values.get(position).copied().flatten(),
        };
        let (gpio, value) = match (select(pin), value) {
            (Some(gpio), Some(value)) => (gpio, value),
            _ => continue,
        };

        // A pin listed twice keeps its first slot and its last value
        let seen = batch
            .pins
            .iter()
            .position(|p| p.gpio_index() == gpio.gpio_index());
        match seen {
            Some(slot) => batch.values[slot] = value,
            None => {
                batch
                    .pins
                    .push(gpio)
                    .map_err(|_| PinBarError::CapacityExceeded)?;
                batch
                    .values
                    .push(value)
                    .map_err(|_| PinBarError::CapacityExceeded)?;
            }
        }
    }
    Ok(batch)
}
