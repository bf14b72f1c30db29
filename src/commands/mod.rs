//! CLI command implementations
//!
//! Commands work on a `GpioController` over any `RegisterWindow`, so the
//! same code drives real hardware and the in-memory emulator.

pub mod blink;
mod list;
pub mod pin;

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use bcmgpio_core::{GpioController, RegisterWindow, Result};

use crate::cli::Commands;
use blink::BlinkOptions;

pub use list::list_backends;

/// Run a GPIO command against an opened controller
///
/// `stop` ends a running blink loop. `ListBackends` needs no hardware and
/// is handled by the caller.
pub fn run<W: RegisterWindow>(
    gpio: &mut GpioController<W>,
    command: Commands,
    stop: &AtomicBool,
) -> Result<()> {
    match command {
        Commands::Blink {
            pin,
            interval_ms,
            count,
        } => {
            let opts = BlinkOptions {
                pin,
                interval: Duration::from_millis(interval_ms),
                count,
            };
            blink::run_blink(gpio, &opts, stop, std::thread::sleep)
        }
        Commands::Mode { pin, mode } => pin::cmd_mode(gpio, pin, mode),
        Commands::Set { pin, level } => pin::cmd_set(gpio, pin, level),
        Commands::Get { pin } => pin::cmd_get(gpio, pin),
        Commands::ListBackends => {
            list_backends();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcmgpio_core::{Error, Level};
    use bcmgpio_dummy::DummyGpio;

    #[test]
    fn test_run_invalid_pin_reports_range() {
        let mut gpio = GpioController::new(DummyGpio::new());
        let stop = AtomicBool::new(false);

        let err = run(
            &mut gpio,
            Commands::Set {
                pin: 40,
                level: Level::High,
            },
            &stop,
        )
        .unwrap_err();

        assert_eq!(err, Error::InvalidPin(40));
        assert_eq!(err.to_string(), "GPIO40 is not a usable pin (valid range is 2-27)");
        assert_eq!(gpio.window().write_count(), 0);
    }

    #[test]
    fn test_run_mode_then_set() {
        let mut gpio = GpioController::new(DummyGpio::new());
        let stop = AtomicBool::new(false);

        run(
            &mut gpio,
            Commands::Mode {
                pin: 17,
                mode: bcmgpio_core::PinMode::Output,
            },
            &stop,
        )
        .unwrap();
        run(
            &mut gpio,
            Commands::Set {
                pin: 17,
                level: Level::High,
            },
            &stop,
        )
        .unwrap();

        assert_eq!(gpio.read(17), Ok(Level::High));
    }
}
