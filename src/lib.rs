//! INA260 Rust Driver
//!
//! Blocking (and optional async) driver for the TI INA260 current, bus voltage and
//! power monitor with integrated 2 mΩ shunt. Built on `embedded-hal` 1.0 I2C traits,
//! no-std, with optional `defmt` support.

#![no_std]

pub mod data_types;
pub mod driver;
pub mod error;
pub mod registers;

pub use driver::Ina260;
pub use error::Error;
pub use registers::DEFAULT_I2C_ADDRESS;
