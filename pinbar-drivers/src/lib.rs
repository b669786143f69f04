//! Pin bar backends
//!
//! This crate connects [`pinbar_core::PinBar`] to the outside world:
//!
//! - [`NativeDriver`] drives a native GPIO library through
//!   [`pinbar_hal::GpioDriver`]
//! - [`GpioLine`] exposes a single GPIO pin of a bar as an `embedded-hal`
//!   digital pin
//! - [`factory`] builds bars for known boards and custom layouts

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod factory;
pub mod line;
pub mod native;

pub use line::{GpioLine, LineError};
pub use native::NativeDriver;
