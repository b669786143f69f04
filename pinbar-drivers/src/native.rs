//! Native GPIO backend
//!
//! Drives real pins through a [`GpioDriver`]. Channels are the bar indices
//! of the pins (board numbering).
//!
//! Mode changes run in two phases: every pin leaving a mode other than
//! `Off` is cleaned up first, then every pin entering a mode other than
//! `Off` is set up. Pins already in the requested mode are not touched.

use core::fmt::Debug;

use heapless::Vec;
use pinbar_core::traits::{PinDriver, States};
use pinbar_core::{DriverError, GpioPin, PinMode, PinState, MAX_PINS};
use pinbar_hal::{Direction, GpioDriver, Level, Pull};

/// Pin driver backed by a native GPIO library
pub struct NativeDriver<G: GpioDriver> {
    gpio: G,
}

impl<G: GpioDriver> NativeDriver<G> {
    pub fn new(gpio: G) -> Self {
        Self { gpio }
    }

    /// The wrapped native library
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }
}

/// Direction and pull for a mode, `None` for `Off`
fn setup_params(mode: PinMode) -> Option<(Direction, Pull)> {
    match mode {
        PinMode::Off => None,
        PinMode::In => Some((Direction::Input, Pull::None)),
        PinMode::InPullDown => Some((Direction::Input, Pull::Down)),
        PinMode::InPullUp => Some((Direction::Input, Pull::Up)),
        PinMode::Out => Some((Direction::Output, Pull::None)),
    }
}

/// Log a native failure and report it as `error`
fn native_error<E: Debug>(error: DriverError, _native: E) -> DriverError {
    #[cfg(feature = "defmt")]
    defmt::warn!("native gpio failed: {} ({})", error, defmt::Debug2Format(&_native));
    error
}

impl<G: GpioDriver> PinDriver for NativeDriver<G> {
    fn change_modes(
        &mut self,
        pins: &mut [GpioPin],
        new_modes: &[PinMode],
    ) -> Result<(), DriverError> {
        for (pin, &mode) in pins.iter_mut().zip(new_modes) {
            if pin.mode() == mode || pin.mode() == PinMode::Off {
                continue;
            }
            let channel = pin.bar_index();
            self.gpio
                .cleanup(channel)
                .map_err(|e| native_error(DriverError::Cleanup { channel }, e))?;
            pin.set_mode(PinMode::Off);

            #[cfg(feature = "defmt")]
            defmt::trace!("channel {} released", channel);
        }

        for (pin, &mode) in pins.iter_mut().zip(new_modes) {
            if pin.mode() == mode {
                continue;
            }
            let Some((direction, pull)) = setup_params(mode) else {
                continue;
            };
            let channel = pin.bar_index();
            self.gpio
                .setup(channel, direction, pull)
                .map_err(|e| native_error(DriverError::Setup { channel }, e))?;
            pin.set_mode(mode);

            #[cfg(feature = "defmt")]
            defmt::trace!("channel {} set up as {}", channel, mode);
        }

        Ok(())
    }

    fn read_states(&mut self, pins: &[GpioPin]) -> Result<States, DriverError> {
        let mut states: Vec<PinState, MAX_PINS> = Vec::new();
        for pin in pins {
            let channel = pin.bar_index();
            let level = self
                .gpio
                .input(channel)
                .map_err(|e| native_error(DriverError::Input { channel }, e))?;
            states
                .push(PinState::from(level.is_high()))
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
            let channel = pin.bar_index();
            self.gpio
                .output(channel, Level::from(state.is_high()))
                .map_err(|e| native_error(DriverError::Output { channel }, e))?;
        }
        Ok(())
    }
}

impl<G: GpioDriver> Drop for NativeDriver<G> {
    fn drop(&mut self) {
        if let Err(_e) = self.gpio.cleanup_all() {
            #[cfg(feature = "defmt")]
            defmt::warn!("failed to release gpio channels: {}", defmt::Debug2Format(&_e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinbar_core::{Addressing, PinBar, PinBarConfig, PinBarError, PinKind};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Setup(i32, Direction, Pull),
        Cleanup(i32),
        CleanupAll,
        Input(i32),
        Output(i32, Level),
    }

    /// Records every call and simulates levels per channel
    #[derive(Clone)]
    struct MockGpio {
        calls: Rc<RefCell<Vec<Call>>>,
        levels: Rc<RefCell<[Level; 16]>>,
        fail_setup: Option<i32>,
    }

    impl MockGpio {
        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn clear(&self) {
            self.calls.borrow_mut().clear();
        }
    }

    impl Default for MockGpio {
        fn default() -> Self {
            Self {
                calls: Rc::default(),
                levels: Rc::new(RefCell::new([Level::Low; 16])),
                fail_setup: None,
            }
        }
    }

    impl GpioDriver for MockGpio {
        type Error = &'static str;

        fn setup(&mut self, channel: i32, direction: Direction, pull: Pull) -> Result<(), Self::Error> {
            if self.fail_setup == Some(channel) {
                return Err("busy");
            }
            self.calls.borrow_mut().push(Call::Setup(channel, direction, pull));
            Ok(())
        }

        fn cleanup(&mut self, channel: i32) -> Result<(), Self::Error> {
            self.calls.borrow_mut().push(Call::Cleanup(channel));
            Ok(())
        }

        fn cleanup_all(&mut self) -> Result<(), Self::Error> {
            self.calls.borrow_mut().push(Call::CleanupAll);
            Ok(())
        }

        fn input(&mut self, channel: i32) -> Result<Level, Self::Error> {
            self.calls.borrow_mut().push(Call::Input(channel));
            Ok(self.levels.borrow()[channel as usize])
        }

        fn output(&mut self, channel: i32, level: Level) -> Result<(), Self::Error> {
            self.calls.borrow_mut().push(Call::Output(channel, level));
            self.levels.borrow_mut()[channel as usize] = level;
            Ok(())
        }
    }

    fn pins(bar_indices: &[i32], mode: PinMode) -> Vec<GpioPin> {
        let config = PinBarConfig::new(&[PinKind::Gpio; 8]).unwrap();
        let mut bar = PinBar::emulated(&config).unwrap();
        bar.set_modes(.., mode).unwrap();
        bar.gpio_pins()
            .iter()
            .copied()
            .filter(|p| bar_indices.contains(&p.bar_index()))
            .collect()
    }

    #[test]
    fn test_setup_maps_modes() {
        let gpio = MockGpio::default();
        let mut driver = NativeDriver::new(gpio.clone());
        let mut pins = pins(&[1, 2, 3, 4], PinMode::Off);

        driver
            .change_modes(
                &mut pins,
                &[PinMode::In, PinMode::InPullDown, PinMode::InPullUp, PinMode::Out],
            )
            .unwrap();

        assert_eq!(
            gpio.calls(),
            [
                Call::Setup(1, Direction::Input, Pull::None),
                Call::Setup(2, Direction::Input, Pull::Down),
                Call::Setup(3, Direction::Input, Pull::Up),
                Call::Setup(4, Direction::Output, Pull::None),
            ]
        );
        assert_eq!(pins[3].mode(), PinMode::Out);
    }

    #[test]
    fn test_unchanged_modes_are_skipped() {
        let gpio = MockGpio::default();
        let mut driver = NativeDriver::new(gpio.clone());
        let mut pins = pins(&[1, 2], PinMode::Out);

        driver
            .change_modes(&mut pins, &[PinMode::Out, PinMode::Out])
            .unwrap();
        assert!(gpio.calls().is_empty());
    }

    #[test]
    fn test_cleanups_before_setups() {
        let gpio = MockGpio::default();
        let mut driver = NativeDriver::new(gpio.clone());
        let mut pins = pins(&[1, 2, 3], PinMode::In);
        pins[1].set_mode(PinMode::Off);

        driver
            .change_modes(&mut pins, &[PinMode::Out, PinMode::InPullUp, PinMode::Off])
            .unwrap();

        assert_eq!(
            gpio.calls(),
            [
                Call::Cleanup(1),
                Call::Cleanup(3),
                Call::Setup(1, Direction::Output, Pull::None),
                Call::Setup(2, Direction::Input, Pull::Up),
            ]
        );
        let modes: Vec<PinMode> = pins.iter().map(|p| p.mode()).collect();
        assert_eq!(modes, [PinMode::Out, PinMode::InPullUp, PinMode::Off]);
    }

    #[test]
    fn test_failed_setup_leaves_pin_off() {
        let gpio = MockGpio {
            fail_setup: Some(2),
            ..MockGpio::default()
        };
        let mut driver = NativeDriver::new(gpio.clone());
        let mut pins = pins(&[1, 2], PinMode::In);

        assert_eq!(
            driver.change_modes(&mut pins, &[PinMode::Out, PinMode::Out]),
            Err(DriverError::Setup { channel: 2 })
        );
        assert_eq!(pins[0].mode(), PinMode::Out);
        assert_eq!(pins[1].mode(), PinMode::Off);
    }

    #[test]
    fn test_reads_and_writes_use_bar_indices() {
        let gpio = MockGpio::default();
        let mut driver = NativeDriver::new(gpio.clone());
        let pins = pins(&[3, 5], PinMode::Out);

        driver
            .write_states(&pins, &[PinState::High, PinState::Low])
            .unwrap();
        let states = driver.read_states(&pins).unwrap();

        assert_eq!(states.as_slice(), [PinState::High, PinState::Low]);
        assert_eq!(
            gpio.calls(),
            [
                Call::Output(3, Level::High),
                Call::Output(5, Level::Low),
                Call::Input(3),
                Call::Input(5),
            ]
        );
    }

    #[test]
    fn test_drop_releases_everything() {
        let gpio = MockGpio::default();
        drop(NativeDriver::new(gpio.clone()));
        assert_eq!(gpio.calls(), [Call::CleanupAll]);
    }

    #[test]
    fn test_bar_over_native_driver() {
        let gpio = MockGpio::default();
        let config = PinBarConfig::new(&[PinKind::Power, PinKind::Gpio, PinKind::Gpio, PinKind::Ground])
            .unwrap()
            .with_bar_index_offset(1)
            .with_gpio_order(&[3, 2])
            .unwrap();
        let mut bar = PinBar::new(&config, NativeDriver::new(gpio.clone())).unwrap();

        bar.set_modes_in(Addressing::Gpio, 0, PinMode::Out).unwrap();
        bar.set_states_in(Addressing::Gpio, 0, PinState::High).unwrap();
        assert_eq!(
            gpio.calls(),
            [
                Call::Setup(3, Direction::Output, Pull::None),
                Call::Output(3, Level::High),
            ]
        );

        gpio.clear();
        assert_eq!(
            bar.set_states(1, PinState::High),
            Err(PinBarError::PinType {
                bar_index: 1,
                kind: PinKind::Power,
                position: None,
            })
        );
        assert!(bar.set_states(2, PinState::High).is_err());
        assert!(gpio.calls().is_empty());

        bar.reset_gpio_pins().unwrap();
        assert_eq!(gpio.calls(), [Call::Cleanup(3)]);

        drop(bar);
        assert_eq!(gpio.calls(), [Call::Cleanup(3), Call::CleanupAll]);
    }
}
