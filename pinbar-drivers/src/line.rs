//! embedded-hal digital pin adapter
//!
//! A [`GpioLine`] borrows a bar and stands for one of its GPIO pins, so
//! drivers written against `embedded-hal` can use it directly. Every call
//! goes through the bar's validated accessors with GPIO addressing.

use core::fmt;

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin, StatefulOutputPin};
use pinbar_core::{Addressing, DriverError, PinBar, PinBarError, PinDriver, PinMode, PinState};

/// Error of a [`GpioLine`] access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineError(pub PinBarError);

impl From<PinBarError> for LineError {
    fn from(e: PinBarError) -> Self {
        LineError(e)
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl digital::Error for LineError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One GPIO pin of a bar as an embedded-hal pin
pub struct GpioLine<'b, D: PinDriver> {
    bar: &'b mut PinBar<D>,
    gpio_index: i32,
}

impl<'b, D: PinDriver> GpioLine<'b, D> {
    /// Borrow the GPIO pin `gpio_index` of `bar`
    ///
    /// Fails if the bar has no such GPIO pin.
    pub fn new(bar: &'b mut PinBar<D>, gpio_index: i32) -> Result<Self, LineError> {
        bar.modes_in(Addressing::Gpio, gpio_index)?;
        Ok(Self { bar, gpio_index })
    }

    pub fn gpio_index(&self) -> i32 {
        self.gpio_index
    }

    /// Current mode of the pin
    pub fn mode(&self) -> Result<PinMode, LineError> {
        let mode = self.bar.modes_in(Addressing::Gpio, self.gpio_index)?.one();
        Ok(mode.unwrap_or_default())
    }

    /// Change the mode of the pin
    pub fn configure(&mut self, mode: PinMode) -> Result<(), LineError> {
        self.bar
            .set_modes_in(Addressing::Gpio, self.gpio_index, mode)?;
        Ok(())
    }

    fn state(&mut self) -> Result<PinState, LineError> {
        self.bar
            .states_in(Addressing::Gpio, self.gpio_index)?
            .one()
            .ok_or(LineError(PinBarError::Driver(DriverError::Input {
                channel: self.gpio_index,
            })))
    }

    fn drive(&mut self, state: PinState) -> Result<(), LineError> {
        self.bar
            .set_states_in(Addressing::Gpio, self.gpio_index, state)?;
        Ok(())
    }
}

impl<D: PinDriver> ErrorType for GpioLine<'_, D> {
    type Error = LineError;
}

impl<D: PinDriver> InputPin for GpioLine<'_, D> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.state()?.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.state()?.is_high())
    }
}

impl<D: PinDriver> OutputPin for GpioLine<'_, D> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(PinState::High)
    }
}

impl<D: PinDriver> StatefulOutputPin for GpioLine<'_, D> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        self.is_high()
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        self.is_low()
    }
}
