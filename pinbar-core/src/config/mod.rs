//! Configuration types
//!
//! Pin layouts are described by a [`PinBarConfig`], built in code, parsed
//! from TOML or taken from a known [`Board`].

pub mod bar;
pub mod boards;

pub use bar::*;
pub use boards::*;
