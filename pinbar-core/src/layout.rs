//! Pin layout
//!
//! The fixed shape of a pin bar: one [`Pin`] per connector position and one
//! [`GpioPin`] per GPIO position, numbered either in bar order or in an
//! explicit order given by bar indices.

use heapless::Vec;

use crate::addressing::{AddressSpace, Addressing};
use crate::config::PinBarConfig;
use crate::error::PinBarError;
use crate::index::Index;
use crate::pin::{GpioPin, Pin, PinKind, PinRef};
use crate::MAX_PINS;

/// Pins resolved from an index, in index order
pub type PinRefs = Vec<PinRef, MAX_PINS>;

/// Connector positions and GPIO enumeration of a pin bar
#[derive(Debug, Clone)]
pub struct PinLayout {
    pins: Vec<Pin, MAX_PINS>,
    /// Sorted by GPIO index
    gpio_pins: Vec<GpioPin, MAX_PINS>,
    /// GPIO position for every bar position
    gpio_slots: Vec<Option<usize>, MAX_PINS>,
    bar_index_offset: i32,
    gpio_index_offset: i32,
}

impl PinLayout {
    /// Build the layout described by a configuration
    pub fn new(config: &PinBarConfig) -> Result<Self, PinBarError> {
        Self::from_parts(
            &config.pin_assignment,
            config.bar_index_offset,
            config.gpio_order_from_ids.as_deref(),
            config.gpio_index_offset,
        )
    }

    /// Build a layout from its raw parts
    ///
    /// # Arguments
    /// - `pin_assignment`: kind of every connector position, in bar order
    /// - `bar_index_offset`: bar index of the first position
    /// - `gpio_order_from_ids`: bar indices of the GPIO pins in GPIO order,
    ///   or `None` to number GPIO pins in bar order
    /// - `gpio_index_offset`: GPIO index of the first GPIO pin
    pub fn from_parts(
        pin_assignment: &[PinKind],
        bar_index_offset: i32,
        gpio_order_from_ids: Option<&[i32]>,
        gpio_index_offset: i32,
    ) -> Result<Self, PinBarError> {
        if pin_assignment.len() > MAX_PINS {
            return Err(PinBarError::CapacityExceeded);
        }

        let mut pins = Vec::new();
        let mut gpio_positions: Vec<usize, MAX_PINS> = Vec::new();
        for (position, &kind) in pin_assignment.iter().enumerate() {
            let bar_index = offset_index(bar_index_offset, position)?;
            pins.push(Pin::new(bar_index, kind))
                .map_err(|_| PinBarError::CapacityExceeded)?;
            if kind == PinKind::Gpio {
                gpio_positions
                    .push(position)
                    .map_err(|_| PinBarError::CapacityExceeded)?;
            }
        }

        let order = match gpio_order_from_ids {
            Some(ids) => gpio_order(ids, bar_index_offset, &gpio_positions)?,
            None => gpio_positions,
        };

        let mut gpio_pins = Vec::new();
        let mut gpio_slots: Vec<Option<usize>, MAX_PINS> = Vec::new();
        gpio_slots
            .resize(pins.len(), None)
            .map_err(|_| PinBarError::CapacityExceeded)?;

        for (gpio_position, &position) in order.iter().enumerate() {
            let gpio_index = offset_index(gpio_index_offset, gpio_position)?;
            gpio_pins
                .push(GpioPin::new(pins[position].bar_index(), gpio_index))
                .map_err(|_| PinBarError::CapacityExceeded)?;
            gpio_slots[position] = Some(gpio_position);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "pin layout: {} pins, {} gpio pins",
            pins.len(),
            gpio_pins.len()
        );

        Ok(Self {
            pins,
            gpio_pins,
            gpio_slots,
            bar_index_offset,
            gpio_index_offset,
        })
    }

    /// Number of connector positions
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Check if the bar has no pins at all
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Number of GPIO pins
    pub fn num_gpio_pins(&self) -> usize {
        self.gpio_pins.len()
    }

    /// Bar index of the first connector position
    pub fn bar_index_offset(&self) -> i32 {
        self.bar_index_offset
    }

    /// GPIO index of the first GPIO pin
    pub fn gpio_index_offset(&self) -> i32 {
        self.gpio_index_offset
    }

    /// All pins in bar order
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// All GPIO pins in GPIO order
    pub fn gpio_pins(&self) -> &[GpioPin] {
        &self.gpio_pins
    }

    /// Kind of every connector position, in bar order
    pub fn pin_assignment(&self) -> impl Iterator<Item = PinKind> + '_ {
        self.pins.iter().map(Pin::kind)
    }

    /// GPIO pin with the given GPIO index
    pub fn gpio_pin(&self, gpio_index: i32) -> Option<&GpioPin> {
        self.gpio_position(gpio_index)
            .and_then(|position| self.gpio_pins.get(position))
    }

    /// Namespace for an addressing mode
    pub fn address_space(&self, addressing: Addressing) -> AddressSpace {
        match addressing {
            Addressing::PinBar => {
                AddressSpace::new(addressing, self.bar_index_offset, self.pins.len())
            }
            Addressing::Gpio => {
                AddressSpace::new(addressing, self.gpio_index_offset, self.gpio_pins.len())
            }
        }
    }

    /// Pin at a namespace position
    fn pin_ref(&self, addressing: Addressing, position: usize) -> PinRef {
        match addressing {
            Addressing::PinBar => PinRef {
                pin: self.pins[position],
                gpio: self.gpio_slots[position].map(|slot| self.gpio_pins[slot]),
            },
            Addressing::Gpio => {
                let gpio = self.gpio_pins[position];
                let bar_position = (gpio.bar_index() - self.bar_index_offset) as usize;
                PinRef {
                    pin: self.pins[bar_position],
                    gpio: Some(gpio),
                }
            }
        }
    }

    /// Resolve an index to pins, keeping index order and repeats
    ///
    /// The index must already be validated against `space`.
    pub fn resolve(&self, space: &AddressSpace, index: &Index<'_>) -> Result<PinRefs, PinBarError> {
        let positions = index.positions(space)?;
        let mut refs = Vec::new();
        for position in positions {
            refs.push(self.pin_ref(space.addressing(), position))
                .map_err(|_| PinBarError::CapacityExceeded)?;
        }
        Ok(refs)
    }

    pub(crate) fn gpio_pins_mut(&mut self) -> &mut [GpioPin] {
        &mut self.gpio_pins
    }

    /// Store the mode a driver left a GPIO pin in
    pub(crate) fn store_mode(&mut self, pin: &GpioPin) {
        if let Some(position) = self.gpio_position(pin.gpio_index()) {
            if let Some(stored) = self.gpio_pins.get_mut(position) {
                stored.set_mode(pin.mode());
            }
        }
    }

    fn gpio_position(&self, gpio_index: i32) -> Option<usize> {
        let position = i64::from(gpio_index) - i64::from(self.gpio_index_offset);
        usize::try_from(position).ok()
    }
}

/// `offset + position` as an index, failing on overflow
fn offset_index(offset: i32, position: usize) -> Result<i32, PinBarError> {
    i32::try_from(position)
        .ok()
        .and_then(|position| offset.checked_add(position))
        .ok_or(PinBarError::CapacityExceeded)
}

/// Bar positions in the requested GPIO order
///
/// `ids` must name every GPIO position exactly once.
fn gpio_order(
    ids: &[i32],
    bar_index_offset: i32,
    gpio_positions: &[usize],
) -> Result<Vec<usize, MAX_PINS>, PinBarError> {
    if ids.len() != gpio_positions.len() {
        return Err(invalid_order());
    }

    let mut order: Vec<usize, MAX_PINS> = Vec::new();
    for &id in ids {
        let position = i64::from(id) - i64::from(bar_index_offset);
        let position = usize::try_from(position).map_err(|_| invalid_order())?;
        order.push(position).map_err(|_| invalid_order())?;
    }

    let mut sorted = order.clone();
    sorted.sort_unstable();
    if sorted.as_slice() != gpio_positions {
        return Err(invalid_order());
    }

    Ok(order)
}

fn invalid_order() -> PinBarError {
    #[cfg(feature = "defmt")]
    defmt::warn!("gpio order does not match the gpio pins of the layout");
    PinBarError::InvalidGpioOrder
}
