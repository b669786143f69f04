//! Pin bar construction
//!
//! Builds bars for known [`Board`]s or custom layouts, backed either by the
//! emulator or by a native GPIO library.

use pinbar_core::{Addressing, Board, Emulator, PinBar, PinBarConfig, PinBarError};
use pinbar_hal::GpioDriver;

use crate::native::NativeDriver;

/// Emulated bar with the layout of `board`
pub fn emulator(board: Board, addressing: Addressing) -> Result<PinBar<Emulator>, PinBarError> {
    PinBar::emulated(&board.config(addressing))
}

/// Emulated bar with a custom layout
pub fn emulator_with_config(config: &PinBarConfig) -> Result<PinBar<Emulator>, PinBarError> {
    PinBar::emulated(config)
}

/// Emulated bar with a custom layout written as TOML
#[cfg(feature = "toml")]
pub fn emulator_from_toml(src: &str) -> Result<PinBar<Emulator>, PinBarError> {
    PinBar::emulated(&PinBarConfig::from_toml_str(src)?)
}

/// Bar with the layout of `board`, driving real pins through `gpio`
pub fn native<G: GpioDriver>(
    board: Board,
    gpio: G,
    addressing: Addressing,
) -> Result<PinBar<NativeDriver<G>>, PinBarError> {
    native_with_config(&board.config(addressing), gpio)
}

/// Bar with a custom layout, driving real pins through `gpio`
pub fn native_with_config<G: GpioDriver>(
    config: &PinBarConfig,
    gpio: G,
) -> Result<PinBar<NativeDriver<G>>, PinBarError> {
    PinBar::new(config, NativeDriver::new(gpio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinbar_core::{PinKind, PinMode, PinState};
    use pinbar_hal::{Direction, Level, Pull};

    /// Accepts everything, remembers the last setup channel
    #[derive(Default)]
    struct NullGpio {
        last_setup: Option<i32>,
    }

    impl GpioDriver for NullGpio {
        type Error = ();

        fn setup(&mut self, channel: i32, _: Direction, _: Pull) -> Result<(), ()> {
            self.last_setup = Some(channel);
            Ok(())
        }

        fn cleanup(&mut self, _: i32) -> Result<(), ()> {
            Ok(())
        }

        fn cleanup_all(&mut self) -> Result<(), ()> {
            Ok(())
        }

        fn input(&mut self, _: i32) -> Result<Level, ()> {
            Ok(Level::Low)
        }

        fn output(&mut self, _: i32, _: Level) -> Result<(), ()> {
            Ok(())
        }
    }

    #[test]
    fn test_raspi_emulator() {
        let mut bar = emulator(Board::Raspi40PinHeader, Addressing::Gpio).unwrap();
        assert_eq!(bar.len(), 40);
        assert_eq!(bar.num_gpio_pins(), 28);
        assert_eq!(bar.current_offset(), 0);
        assert_eq!(bar.current_len(), 28);

        bar.set_modes(17, PinMode::Out).unwrap();
        bar.set_states(17, PinState::High).unwrap();
        assert_eq!(
            bar.states_in(Addressing::PinBar, 11).unwrap().one(),
            Some(PinState::High)
        );
        assert_eq!(
            bar.modes_in(Addressing::PinBar, 1).unwrap().one(),
            None
        );
    }

    #[test]
    fn test_raspi_native_uses_header_numbers() {
        let mut bar = native(Board::Raspi40PinHeader, NullGpio::default(), Addressing::Gpio).unwrap();
        bar.set_modes(4, PinMode::InPullUp).unwrap();
        assert_eq!(bar.driver().gpio().last_setup, Some(7));
    }

    #[test]
    fn test_custom_emulator() {
        let config = PinBarConfig::new(&[PinKind::Gpio, PinKind::Ground])
            .unwrap()
            .with_bar_index_offset(1);
        let bar = emulator_with_config(&config).unwrap();
        assert_eq!(bar.addressing(), Addressing::PinBar);
        assert_eq!(bar.current_offset(), 1);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_emulator_from_toml() {
        let bar = emulator_from_toml(
            r#"
            pin_assignment = ["ground", "gpio", "gpio"]
            gpio_order_from_ids = [2, 1]
            gpio_index_offset = 1
            "#,
        )
        .unwrap();
        assert_eq!(bar.gpio_pin(1).map(|g| g.bar_index()), Some(2));

        assert_eq!(
            emulator_from_toml(r#"pin_assignment = ["gpio"]
gpio_order_from_ids = [0, 0]"#)
            .err(),
            Some(PinBarError::InvalidGpioOrder)
        );
    }
}
