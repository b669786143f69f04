//! Pinbar Hardware Abstraction Layer
//!
//! This crate defines the contract a native GPIO library has to fulfil so
//! that a pin bar can drive real hardware. Board-level access (pin setup,
//! cleanup, reads and writes by channel number) is all a backend needs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pinbar-core (addressing, validation)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinbar-drivers (NativeDriver)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pinbar-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  RPi.GPIO /   │       │  test mocks   │
//! │  gpiochip     │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioDriver`] - Channel based pin setup and digital I/O

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{Direction, GpioDriver, Level, Pull};
