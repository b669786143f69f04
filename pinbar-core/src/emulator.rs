//! In-memory pin driver
//!
//! Keeps one simulated state per GPIO pin. A pin in mode `Off` has no
//! state; switching it on starts it `Low`, and switching between modes
//! other than `Off` keeps whatever state it had.

use heapless::Vec;

use crate::error::{DriverError, PinBarError};
use crate::layout::PinLayout;
use crate::pin::{GpioPin, PinMode, PinState};
use crate::traits::{PinDriver, States};
use crate::MAX_PINS;

/// Pin driver that simulates GPIO states in memory
#[derive(Debug, Clone)]
pub struct Emulator {
    /// Indexed by `gpio_index - gpio_index_offset`
    states: Vec<Option<PinState>, MAX_PINS>,
    gpio_index_offset: i32,
}

impl Emulator {
    /// Create an emulator for `num_gpio_pins` pins, all without state
    pub fn new(num_gpio_pins: usize, gpio_index_offset: i32) -> Result<Self, PinBarError> {
        let mut states = Vec::new();
        states
            .resize(num_gpio_pins, None)
            .map_err(|_| PinBarError::CapacityExceeded)?;
        Ok(Self {
            states,
            gpio_index_offset,
        })
    }

    /// Create an emulator matching the GPIO pins of a layout
    pub fn for_layout(layout: &PinLayout) -> Result<Self, PinBarError> {
        Self::new(layout.num_gpio_pins(), layout.gpio_index_offset())
    }

    /// Simulated states by raw GPIO position
    pub fn states(&self) -> &[Option<PinState>] {
        &self.states
    }

    /// Mutable simulated states by raw GPIO position
    pub fn states_mut(&mut self) -> &mut [Option<PinState>] {
        &mut self.states
    }

    fn slot(&self, gpio_index: i32) -> Option<usize> {
        let position = i64::from(gpio_index) - i64::from(self.gpio_index_offset);
        usize::try_from(position)
            .ok()
            .filter(|&position| position < self.states.len())
    }
}

impl PinDriver for Emulator {
    fn change_modes(
        &mut self,
        pins: &mut [GpioPin],
        new_modes: &[PinMode],
    ) -> Result<(), DriverError> {
        for (pin, &mode) in pins.iter_mut().zip(new_modes) {
            let slot = self.slot(pin.gpio_index()).ok_or(DriverError::Setup {
                channel: pin.gpio_index(),
            })?;

            if mode == PinMode::Off {
                self.states[slot] = None;
            } else if self.states[slot].is_none() {
                self.states[slot] = Some(PinState::Low);
            }
            pin.set_mode(mode);

            #[cfg(feature = "defmt")]
            defmt::trace!("emulated gpio {} -> {}", pin.gpio_index(), mode);
        }
        Ok(())
    }

    fn read_states(&mut self, pins: &[GpioPin]) -> Result<States, DriverError> {
        let mut states = Vec::new();
        for pin in pins {
            let channel = pin.gpio_index();
            let state = self
                .slot(channel)
                .and_then(|slot| self.states[slot])
                .ok_or(DriverError::Input { channel })?;
            states
                .push(state)
                .map_err(|_| DriverError::Input { channel })?;
        }
        Ok(states)
    }

    fn write_states(
        &mut self,
        pins: &[GpioPin],
        new_states: &[PinState],
    ) -> Result<(), DriverError> {
        for (pin, &state) in pins.iter().zip(new_states) {
            let channel = pin.gpio_index();
            let slot = self.slot(channel).ok_or(DriverError::Output { channel })?;
            self.states[slot] = Some(state);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pins(count: i32, offset: i32) -> std::vec::Vec<GpioPin> {
        (0..count).map(|i| GpioPin::new(i, i + offset)).collect()
    }

    #[test]
    fn test_new_emulator_has_no_states() {
        let emulator = Emulator::new(3, 0).unwrap();
        assert_eq!(emulator.states(), [None, None, None]);
    }

    #[test]
    fn test_capacity() {
        assert_eq!(
            Emulator::new(MAX_PINS + 1, 0).unwrap_err(),
            PinBarError::CapacityExceeded
        );
    }

    #[test]
    fn test_switching_on_starts_low() {
        let mut emulator = Emulator::new(2, 0).unwrap();
        let mut pins = pins(2, 0);
        emulator
            .change_modes(&mut pins, &[PinMode::Out, PinMode::InPullUp])
            .unwrap();
        assert_eq!(pins[0].mode(), PinMode::Out);
        assert_eq!(pins[1].mode(), PinMode::InPullUp);
        assert_eq!(emulator.states(), [Some(PinState::Low), Some(PinState::Low)]);
    }

    #[test]
    fn test_mode_change_keeps_state() {
        let mut emulator = Emulator::new(1, 5).unwrap();
        let mut pins = pins(1, 5);
        emulator.change_modes(&mut pins, &[PinMode::Out]).unwrap();
        emulator.write_states(&pins, &[PinState::High]).unwrap();

        emulator.change_modes(&mut pins, &[PinMode::In]).unwrap();
        assert_eq!(emulator.read_states(&pins).unwrap().as_slice(), [PinState::High]);
    }

    #[test]
    fn test_switching_off_clears_state() {
        let mut emulator = Emulator::new(1, 0).unwrap();
        let mut pins = pins(1, 0);
        emulator.change_modes(&mut pins, &[PinMode::Out]).unwrap();
        emulator.write_states(&pins, &[PinState::High]).unwrap();
        emulator.change_modes(&mut pins, &[PinMode::Off]).unwrap();
        assert_eq!(emulator.states(), [None]);

        emulator.change_modes(&mut pins, &[PinMode::Off]).unwrap();
        assert_eq!(emulator.states(), [None]);
    }

    #[test]
    fn test_read_without_state_fails() {
        let mut emulator = Emulator::new(1, 0).unwrap();
        let pins = pins(1, 0);
        assert_eq!(
            emulator.read_states(&pins),
            Err(DriverError::Input { channel: 0 })
        );
    }

    #[test]
    fn test_unknown_channel_leaves_mode() {
        let mut emulator = Emulator::new(1, 0).unwrap();
        let mut pins = std::vec![GpioPin::new(0, 0), GpioPin::new(1, 4)];
        assert_eq!(
            emulator.change_modes(&mut pins, &[PinMode::Out, PinMode::Out]),
            Err(DriverError::Setup { channel: 4 })
        );
        assert_eq!(pins[0].mode(), PinMode::Out);
        assert_eq!(pins[1].mode(), PinMode::Off);
    }
}
