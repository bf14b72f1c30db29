//! Pin numbers, modes and levels

use core::fmt;
use core::str::FromStr;

/// Lowest GPIO usable from the 40-pin header (GPIO0/1 are the HAT EEPROM bus)
pub const LOWEST_PIN: u8 = 2;

/// Highest GPIO routed to the 40-pin header
pub const HIGHEST_PIN: u8 = 27;

/// Returns true if `pin` falls within `LOWEST_PIN..=HIGHEST_PIN`
#[inline]
pub const fn is_valid_pin(pin: u8) -> bool {
    LOWEST_PIN <= pin && pin <= HIGHEST_PIN
}

/// Pin function
///
/// Only the two plain GPIO functions are supported. Alternate functions
/// (UART, SPI, PWM...) are never written by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Input pin (function select 0b000)
    Input,
    /// Output pin (function select 0b001)
    Output,
}

impl PinMode {
    /// Encoding of this mode in a 3-bit function select field
    pub const fn bits(self) -> u32 {
        match self {
            Self::Input => 0b000,
            Self::Output => 0b001,
        }
    }

    /// Decode a 3-bit function select field
    ///
    /// Returns `None` for the alternate function encodings.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits & 0b111 {
            0b000 => Some(Self::Input),
            0b001 => Some(Self::Output),
            _ => None,
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

impl FromStr for PinMode {
    type Err = &'static str;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "input" | "in" => Ok(Self::Input),
            "output" | "out" => Ok(Self::Output),
            _ => Err("expected 'input' or 'output'"),
        }
    }
}

/// Pin level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Low level
    Low,
    /// High level
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Level {
    type Err = &'static str;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "high" | "1" | "on" => Ok(Self::High),
            "low" | "0" | "off" => Ok(Self::Low),
            _ => Err("expected 'high' or 'low'"),
        }
    }
}
