//! Pin driver trait
//!
//! A [`PinDriver`] receives only validated batches: every pin exists, every
//! pin handed to [`PinDriver::read_states`] or [`PinDriver::write_states`]
//! is a GPIO pin that is not `Off`, and value slices always have the same
//! length as the pin slices.

use heapless::Vec;

use crate::error::DriverError;
use crate::pin::{GpioPin, PinMode, PinState};
use crate::MAX_PINS;

/// States read from a batch of pins, in batch order
pub type States = Vec<PinState, MAX_PINS>;

/// Backend that applies mode and state changes
pub trait PinDriver {
    /// Apply `new_modes[i]` to `pins[i]`
    ///
    /// The implementer must leave each `pin.mode` matching what the backend
    /// is actually in, also when returning an error part way through. The
    /// bar stores the resulting modes either way.
    fn change_modes(
        &mut self,
        pins: &mut [GpioPin],
        new_modes: &[PinMode],
    ) -> Result<(), DriverError>;

    /// Read one state per pin
    fn read_states(&mut self, pins: &[GpioPin]) -> Result<States, DriverError>;

    /// Write `new_states[i]` to `pins[i]`
    fn write_states(&mut self, pins: &[GpioPin], new_states: &[PinState])
        -> Result<(), DriverError>;
}
