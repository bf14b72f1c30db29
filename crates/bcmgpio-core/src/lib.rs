//! bcmgpio-core - Register-level GPIO control for Broadcom BCM283x SoCs
//!
//! This crate knows the layout of the BCM283x GPIO register block and turns
//! pin-level requests into register accesses. It does not know how the
//! registers are reached: that is provided by a [`RegisterWindow`]
//! implementation (a `/dev/mem` mapping, an in-memory emulator, ...).
//! It is `no_std` compatible.
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for [`Error`]
//!
//! # Example
//!
//! ```ignore
//! use bcmgpio_core::{GpioController, Level, PinMode};
//!
//! let mut gpio = GpioController::new(window);
//! gpio.configure(17, PinMode::Output)?;
//! gpio.write(17, Level::High)?;
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod gpio;
pub mod pin;
pub mod registers;

pub use error::{Error, Result};
pub use gpio::GpioController;
pub use pin::{is_valid_pin, Level, PinMode, HIGHEST_PIN, LOWEST_PIN};
pub use registers::RegisterWindow;
