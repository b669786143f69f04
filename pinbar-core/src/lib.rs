//! Board-agnostic pin bar logic
//!
//! This crate contains everything needed to address and validate pin
//! accesses without touching hardware:
//!
//! - Pin model (kinds, modes, states)
//! - Dual addressing (bar position or GPIO enumeration)
//! - Index and value validation
//! - The [`PinBar`] accessor surface, generic over a [`PinDriver`]
//! - An in-memory [`Emulator`] driver
//! - Layout configuration and known board tables
//!
//! # Example
//!
//! ```
//! use pinbar_core::{Assignment, PinBar, PinBarConfig, PinKind, PinMode, PinState};
//!
//! let config = PinBarConfig::new(&[PinKind::Power, PinKind::Gpio, PinKind::Gpio]).unwrap();
//! let mut bar = PinBar::emulated(&config).unwrap();
//!
//! bar.set_modes(1, Assignment::One(PinMode::Out)).unwrap();
//! bar.set_states(1, Assignment::One(PinState::High)).unwrap();
//! assert_eq!(bar.states(1).unwrap().one(), Some(PinState::High));
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod addressing;
pub mod bar;
pub mod config;
pub mod emulator;
pub mod error;
pub mod index;
pub mod layout;
pub mod pin;
pub mod traits;
pub mod validate;

pub use addressing::{AddressSpace, Addressing};
pub use bar::{PinBar, Selection};
pub use config::{Board, PinBarConfig};
pub use emulator::Emulator;
pub use error::{DriverError, PinBarError};
pub use index::{Index, IndexKind, Positions, Span};
pub use layout::{PinLayout, PinRefs};
pub use pin::{GpioPin, Pin, PinKind, PinMode, PinRef, PinState};
pub use traits::{PinDriver, States};
pub use validate::Assignment;

/// Maximum number of pins on a bar
///
/// Also bounds the number of entries in a list index.
pub const MAX_PINS: usize = 64;
