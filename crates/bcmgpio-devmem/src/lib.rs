//! bcmgpio-devmem - GPIO register access through Linux memory devices
//!
//! This crate maps the BCM283x GPIO register block into the process and
//! exposes it as a `RegisterWindow` for `bcmgpio-core`.
//!
//! # Devices
//!
//! - `/dev/mem` - all of physical memory, requires root. The GPIO block is
//!   mapped at its physical address, which depends on the SoC.
//! - `/dev/gpiomem` - only the GPIO block, at offset 0. Usually accessible
//!   to members of the `gpio` group.
//!
//! # Example
//!
//! ```no_run
//! use bcmgpio_core::{GpioController, Level, PinMode};
//! use bcmgpio_devmem::{DevMemConfig, DevMemRegisters};
//!
//! let regs = DevMemRegisters::open(&DevMemConfig::default())?;
//! let mut gpio = GpioController::new(regs);
//! gpio.configure(17, PinMode::Output)?;
//! gpio.write(17, Level::High)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with bcmgpio CLI
//!
//! ```bash
//! # Raspberry Pi 3 (default chip)
//! sudo bcmgpio blink --pin 17
//!
//! # Raspberry Pi 4
//! sudo bcmgpio -b devmem:chip=bcm2711 blink --pin 17
//!
//! # Without root
//! bcmgpio -b gpiomem set 17 high
//! ```

pub mod error;
pub mod physmap;

use std::path::PathBuf;
use std::str::FromStr;

pub use error::{DevMemError, Result};
pub use physmap::DevMemRegisters;

/// Default memory device
pub const DEV_MEM: &str = "/dev/mem";

/// GPIO-only memory device provided by the Raspberry Pi kernel
pub const DEV_GPIOMEM: &str = "/dev/gpiomem";

/// SoCs sharing the BCM2835 GPIO register layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    /// Raspberry Pi 1, Zero
    Bcm2835,
    /// Raspberry Pi 2
    Bcm2836,
    /// Raspberry Pi 3, Zero 2
    Bcm2837,
    /// Raspberry Pi 4, 400
    Bcm2711,
}

impl Chip {
    /// All known chips, for help text
    pub const ALL: &'static [Chip] = &[Chip::Bcm2835, Chip::Bcm2836, Chip::Bcm2837, Chip::Bcm2711];

    /// Physical address of the GPIO register block (GPFSEL0)
    pub const fn gpio_base(self) -> u64 {
        match self {
            Chip::Bcm2835 => 0x2020_0000,
            Chip::Bcm2836 | Chip::Bcm2837 => 0x3F20_0000,
            Chip::Bcm2711 => 0xFE20_0000,
        }
    }

    /// Lowercase chip name
    pub const fn name(self) -> &'static str {
        match self {
            Chip::Bcm2835 => "bcm2835",
            Chip::Bcm2836 => "bcm2836",
            Chip::Bcm2837 => "bcm2837",
            Chip::Bcm2711 => "bcm2711",
        }
    }
}

impl FromStr for Chip {
    type Err = DevMemError;

    fn from_str(s: &str) -> Result<Self> {
        Chip::ALL
            .iter()
            .copied()
            .find(|chip| chip.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DevMemError::InvalidParameter(format!("unknown chip '{}'", s)))
    }
}

/// Configuration for mapping the GPIO block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevMemConfig {
    /// Memory device path
    pub device: PathBuf,
    /// Physical address (or device offset) of the GPIO block
    pub base: u64,
}

impl Default for DevMemConfig {
    fn default() -> Self {
        Self::for_chip(Chip::Bcm2837)
    }
}

impl DevMemConfig {
    /// Map `/dev/mem` at the GPIO base of `chip`
    pub fn for_chip(chip: Chip) -> Self {
        Self {
            device: PathBuf::from(DEV_MEM),
            base: chip.gpio_base(),
        }
    }

    /// Map `/dev/gpiomem` at offset 0
    pub fn gpiomem() -> Self {
        Self {
            device: PathBuf::from(DEV_GPIOMEM),
            base: 0,
        }
    }
}

/// Parse a hex (`0x` prefix) or decimal address
fn parse_address(s: &str) -> Result<u64> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(&hex.replace('_', ""), 16)
    } else {
        s.parse::<u64>()
    };
    parsed.map_err(|_| DevMemError::InvalidParameter(format!("invalid base address '{}'", s)))
}

/// Build a `DevMemConfig` from backend options
///
/// Starts from `defaults` and applies, in order:
///
/// - `dev=<path>` - memory device
/// - `chip=<name>` - take the base address from the chip table
/// - `base=<addr>` - explicit base address (wins over `chip`)
pub fn parse_options(options: &[(&str, &str)], defaults: DevMemConfig) -> Result<DevMemConfig> {
    let mut config = defaults;
    let mut explicit_base: Option<u64> = None;

    for (key, value) in options {
        match *key {
            "dev" => config.device = PathBuf::from(value),
            "chip" => config.base = value.parse::<Chip>()?.gpio_base(),
            "base" => explicit_base = Some(parse_address(value)?),
            _ => {
                return Err(DevMemError::InvalidParameter(format!(
                    "unknown option '{}'",
                    key
                )))
            }
        }
    }

    if let Some(base) = explicit_base {
        config.base = base;
    }

    Ok(config)
}

/// Build a `/dev/gpiomem` config from backend options
///
/// The device only exposes the GPIO block at offset 0, so the only accepted
/// option is `dev=<path>`.
pub fn parse_gpiomem_options(options: &[(&str, &str)]) -> Result<DevMemConfig> {
    let mut config = DevMemConfig::gpiomem();

    for (key, value) in options {
        match *key {
            "dev" => config.device = PathBuf::from(value),
            "chip" | "base" => {
                return Err(DevMemError::InvalidParameter(format!(
                    "'{}' is not supported by gpiomem, the GPIO block is always at offset 0",
                    key
                )))
            }
            _ => {
                return Err(DevMemError::InvalidParameter(format!(
                    "unknown option '{}'",
                    key
                )))
            }
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_bcm2837_devmem() {
        let config = DevMemConfig::default();
        assert_eq!(config.device, PathBuf::from("/dev/mem"));
        assert_eq!(config.base, 0x3F20_0000);
    }

    #[test]
    fn test_parse_chip() {
        let config = parse_options(&[("chip", "BCM2711")], DevMemConfig::default()).unwrap();
        assert_eq!(config.base, 0xFE20_0000);
    }

    #[test]
    fn test_base_overrides_chip() {
        let config = parse_options(
            &[("base", "0x2020_0000"), ("chip", "bcm2711"), ("dev", "/tmp/mem")],
            DevMemConfig::default(),
        )
        .unwrap();
        assert_eq!(config.base, 0x2020_0000);
        assert_eq!(config.device, PathBuf::from("/tmp/mem"));
    }

    #[test]
    fn test_gpiomem_defaults() {
        let config = parse_gpiomem_options(&[]).unwrap();
        assert_eq!(config, DevMemConfig::gpiomem());

        let config = parse_gpiomem_options(&[("dev", "/tmp/gpiomem")]).unwrap();
        assert_eq!(config.device, PathBuf::from("/tmp/gpiomem"));
        assert_eq!(config.base, 0);
    }

    #[test]
    fn test_gpiomem_rejects_address_options() {
        for option in [("chip", "bcm2711"), ("base", "0x3F20_0000"), ("speed", "1")] {
            assert!(matches!(
                parse_gpiomem_options(&[option]),
                Err(DevMemError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_invalid_options() {
        assert!(parse_options(&[("chip", "bcm9999")], DevMemConfig::default()).is_err());
        assert!(parse_options(&[("base", "0xZZ")], DevMemConfig::default()).is_err());
        assert!(parse_options(&[("speed", "1")], DevMemConfig::default()).is_err());
    }
}
