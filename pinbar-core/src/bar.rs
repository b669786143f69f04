//! Pin bar
//!
//! [`PinBar`] is the accessor surface: it resolves indices in the active
//! addressing, validates values against the addressed pins and hands the
//! accepted batch to its [`PinDriver`]. Nothing reaches the driver unless
//! the whole batch is valid.

use heapless::Vec;

use crate::addressing::{AddressSpace, Addressing};
use crate::config::PinBarConfig;
use crate::emulator::Emulator;
use crate::error::PinBarError;
use crate::index::{Index, IndexKind, Span};
use crate::layout::{PinLayout, PinRefs};
use crate::pin::{GpioPin, Pin, PinKind, PinMode, PinRef, PinState};
use crate::traits::PinDriver;
use crate::validate::{self, Assignment, Batch};
use crate::MAX_PINS;

/// Result of a read: one value for a single index, a sequence otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selection<T> {
    /// Read through a single index
    One(Option<T>),
    /// Read through a range or list, in index order
    Many(Vec<Option<T>, MAX_PINS>),
}

impl<T: Copy> Selection<T> {
    /// Value of a single-index read, `None` for sequences
    pub fn one(&self) -> Option<T> {
        match self {
            Selection::One(value) => *value,
            Selection::Many(_) => None,
        }
    }

    /// All values, a single-index read being a one-element slice
    pub fn as_slice(&self) -> &[Option<T>] {
        match self {
            Selection::One(value) => core::slice::from_ref(value),
            Selection::Many(values) => values,
        }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Check if a sequence read matched no pins
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Bounds-checked, dual-addressed access to a row of pins
pub struct PinBar<D: PinDriver> {
    layout: PinLayout,
    addressing: Addressing,
    driver: D,
}

impl PinBar<Emulator> {
    /// Create a bar backed by the in-memory emulator
    pub fn emulated(config: &PinBarConfig) -> Result<Self, PinBarError> {
        let layout = PinLayout::new(config)?;
        let emulator = Emulator::for_layout(&layout)?;
        Ok(Self::with_layout(layout, config.initial_addressing, emulator))
    }

    /// Mode of the GPIO pin at raw position `position`
    ///
    /// # Panics
    ///
    /// If `position >= num_gpio_pins()`.
    pub fn emulated_gpio_mode(&self, position: usize) -> PinMode {
        self.layout.gpio_pins()[position].mode()
    }

    /// Overwrite the mode of the GPIO pin at raw position `position`
    ///
    /// Bypasses validation. An active mode on a pin without emulated state
    /// starts it `Low`; any existing state is kept.
    ///
    /// # Panics
    ///
    /// If `position >= num_gpio_pins()`.
    pub fn set_emulated_gpio_mode(&mut self, position: usize, mode: PinMode) {
        self.layout.gpio_pins_mut()[position].set_mode(mode);
        let state = &mut self.driver.states_mut()[position];
        if mode.is_active() && state.is_none() {
            *state = Some(PinState::Low);
        }
    }

    /// Emulated state of the GPIO pin at raw position `position`
    ///
    /// # Panics
    ///
    /// If `position >= num_gpio_pins()`.
    pub fn emulated_gpio_state(&self, position: usize) -> Option<PinState> {
        self.driver.states()[position]
    }

    /// Overwrite the emulated state of the GPIO pin at raw position `position`
    ///
    /// # Panics
    ///
    /// If `position >= num_gpio_pins()`.
    pub fn set_emulated_gpio_state(&mut self, position: usize, state: Option<PinState>) {
        self.driver.states_mut()[position] = state;
    }

    /// Modes of all GPIO pins by raw position
    pub fn emulated_gpio_modes(&self) -> impl Iterator<Item = PinMode> + '_ {
        self.layout.gpio_pins().iter().map(GpioPin::mode)
    }

    /// Emulated states of all GPIO pins by raw position
    pub fn emulated_gpio_states(&self) -> &[Option<PinState>] {
        self.driver.states()
    }
}

impl<D: PinDriver> PinBar<D> {
    /// Create a bar for a layout, driven by `driver`
    pub fn new(config: &PinBarConfig, driver: D) -> Result<Self, PinBarError> {
        let layout = PinLayout::new(config)?;
        Ok(Self::with_layout(layout, config.initial_addressing, driver))
    }

    fn with_layout(layout: PinLayout, addressing: Addressing, driver: D) -> Self {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "pin bar ready: {} pins, {} gpio pins, {} addressing",
            layout.len(),
            layout.num_gpio_pins(),
            addressing
        );

        Self {
            layout,
            addressing,
            driver,
        }
    }

    /// Number of connector positions
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    /// Check if the bar has no pins
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Kind of every connector position, in bar order
    pub fn pin_assignment(&self) -> impl Iterator<Item = PinKind> + '_ {
        self.layout.pin_assignment()
    }

    pub fn bar_index_offset(&self) -> i32 {
        self.layout.bar_index_offset()
    }

    pub fn gpio_index_offset(&self) -> i32 {
        self.layout.gpio_index_offset()
    }

    pub fn num_gpio_pins(&self) -> usize {
        self.layout.num_gpio_pins()
    }

    /// Active addressing
    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// Switch the active addressing
    ///
    /// Only changes how later indices are read; no pin is touched.
    pub fn set_addressing(&mut self, addressing: Addressing) {
        self.addressing = addressing;
    }

    /// Namespace of the active addressing
    pub fn address_space(&self) -> AddressSpace {
        self.layout.address_space(self.addressing)
    }

    /// Lowest valid index in the active addressing
    pub fn current_offset(&self) -> i32 {
        self.address_space().offset()
    }

    /// Number of addressable pins in the active addressing
    pub fn current_len(&self) -> usize {
        self.address_space().len()
    }

    pub fn layout(&self) -> &PinLayout {
        &self.layout
    }

    /// All pins in bar order
    pub fn pins(&self) -> &[Pin] {
        self.layout.pins()
    }

    /// All GPIO pins in GPIO order
    pub fn gpio_pins(&self) -> &[GpioPin] {
        self.layout.gpio_pins()
    }

    /// GPIO pin with the given GPIO index
    pub fn gpio_pin(&self, gpio_index: i32) -> Option<&GpioPin> {
        self.layout.gpio_pin(gpio_index)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Modes in the active addressing
    pub fn modes<'a>(&self, index: impl Into<Index<'a>>) -> Result<Selection<PinMode>, PinBarError> {
        self.modes_in(self.addressing, index)
    }

    /// Set modes in the active addressing
    pub fn set_modes<'a>(
        &mut self,
        index: impl Into<Index<'a>>,
        value: impl Into<Assignment<'a, PinMode>>,
    ) -> Result<(), PinBarError> {
        self.set_modes_in(self.addressing, index, value)
    }

    /// States in the active addressing
    pub fn states<'a>(
        &mut self,
        index: impl Into<Index<'a>>,
    ) -> Result<Selection<PinState>, PinBarError> {
        self.states_in(self.addressing, index)
    }

    /// Set states in the active addressing
    pub fn set_states<'a>(
        &mut self,
        index: impl Into<Index<'a>>,
        value: impl Into<Assignment<'a, PinState>>,
    ) -> Result<(), PinBarError> {
        self.set_states_in(self.addressing, index, value)
    }

    /// Modes of the addressed pins, `None` for pins that are not GPIO
    pub fn modes_in<'a>(
        &self,
        addressing: Addressing,
        index: impl Into<Index<'a>>,
    ) -> Result<Selection<PinMode>, PinBarError> {
        let (kind, pins) = self.select(addressing, &index.into())?;
        collect(kind, pins.iter().map(PinRef::mode))
    }

    /// Change the modes of the addressed pins
    ///
    /// Single and list indices must only address GPIO pins. Ranges may
    /// cover other pins as long as their entries are `None`.
    pub fn set_modes_in<'a>(
        &mut self,
        addressing: Addressing,
        index: impl Into<Index<'a>>,
        value: impl Into<Assignment<'a, PinMode>>,
    ) -> Result<(), PinBarError> {
        let value = value.into();
        let (kind, pins) = self.select(addressing, &index.into())?;
        if kind != IndexKind::Span {
            validate::require_gpio(kind, &pins)?;
        }
        validate::check_modes(&value, kind, &pins)?;

        let batch = validate::batch(&value, &pins, |pin| pin.gpio)?;
        self.apply_modes(batch)
    }

    /// States of the addressed pins
    ///
    /// Single and list indices must only address GPIO pins that are not
    /// `Off`. Ranges report `None` for every other pin.
    pub fn states_in<'a>(
        &mut self,
        addressing: Addressing,
        index: impl Into<Index<'a>>,
    ) -> Result<Selection<PinState>, PinBarError> {
        let (kind, pins) = self.select(addressing, &index.into())?;
        if kind != IndexKind::Span {
            validate::require_gpio(kind, &pins)?;
            validate::require_active(kind, &pins)?;
        }

        let readable: Vec<GpioPin, MAX_PINS> = pins.iter().filter_map(PinRef::active_gpio).collect();
        let states = self.driver.read_states(&readable)?;

        let mut states = states.into_iter();
        collect(
            kind,
            pins.iter()
                .map(|pin| pin.active_gpio().and_then(|_| states.next())),
        )
    }

    /// Change the states of the addressed pins
    ///
    /// Single and list indices must only address GPIO pins that are not
    /// `Off`. Ranges skip every other pin.
    pub fn set_states_in<'a>(
        &mut self,
        addressing: Addressing,
        index: impl Into<Index<'a>>,
        value: impl Into<Assignment<'a, PinState>>,
    ) -> Result<(), PinBarError> {
        let value = value.into();
        let (kind, pins) = self.select(addressing, &index.into())?;
        if kind != IndexKind::Span {
            validate::require_gpio(kind, &pins)?;
            validate::require_active(kind, &pins)?;
        }
        validate::check_states(&value, kind, &pins)?;

        let batch = validate::batch(&value, &pins, PinRef::active_gpio)?;
        self.driver.write_states(&batch.pins, &batch.values)?;
        Ok(())
    }

    /// Switch every GPIO pin `Off`
    pub fn reset_gpio_pins(&mut self) -> Result<(), PinBarError> {
        self.set_modes_in(Addressing::Gpio, Span::full(), PinMode::Off)
    }

    fn select(
        &self,
        addressing: Addressing,
        index: &Index<'_>,
    ) -> Result<(IndexKind, PinRefs), PinBarError> {
        let space = self.layout.address_space(addressing);
        index.validate(&space)?;
        let pins = self.layout.resolve(&space, index)?;
        Ok((index.kind(), pins))
    }

    fn apply_modes(&mut self, mut batch: Batch<PinMode>) -> Result<(), PinBarError> {
        #[cfg(feature = "defmt")]
        defmt::trace!("changing modes of {} gpio pins", batch.pins.len());

        let result = self.driver.change_modes(&mut batch.pins, &batch.values);
        for pin in &batch.pins {
            self.layout.store_mode(pin);
        }

        if let Err(e) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("driver failed to change modes: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}

fn collect<T>(
    kind: IndexKind,
    mut values: impl Iterator<Item = Option<T>>,
) -> Result<Selection<T>, PinBarError> {
    match kind {
        IndexKind::Single => Ok(Selection::One(values.next().flatten())),
        IndexKind::Span | IndexKind::List => {
            let mut many = Vec::new();
            for value in values {
                many.push(value).map_err(|_| PinBarError::CapacityExceeded)?;
            }
            Ok(Selection::Many(many))
        }
    }
}
