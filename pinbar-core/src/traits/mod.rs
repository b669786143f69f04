//! Backend abstraction traits
//!
//! These traits define the interface between the pin bar logic and the
//! backends that actually move pins (emulated or native).

pub mod driver;

pub use driver::{PinDriver, States};
