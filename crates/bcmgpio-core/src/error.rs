//! Error types for bcmgpio-core
//!
//! This module provides a no_std compatible error type shared by the
//! controller and every `RegisterWindow` implementation.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Pin number is outside the usable GPIO range
    ///
    /// No register is read or written when this is returned.
    InvalidPin(u8),

    /// Register index is beyond the end of the mapped window
    RegisterOutOfRange {
        /// Index that was requested
        index: usize,
        /// Number of registers in the window
        len: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(pin) => write!(
                f,
                "GPIO{} is not a usable pin (valid range is {}-{})",
                pin,
                crate::pin::LOWEST_PIN,
                crate::pin::HIGHEST_PIN
            ),
            Self::RegisterOutOfRange { index, len } => write!(
                f,
                "register index {} out of range (window holds {} registers)",
                index, len
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
