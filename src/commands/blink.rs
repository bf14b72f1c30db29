//! Blink command implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bcmgpio_core::{GpioController, Level, PinMode, RegisterWindow, Result};

/// Options for the blink loop
#[derive(Debug, Clone)]
pub struct BlinkOptions {
    /// GPIO to toggle
    pub pin: u8,
    /// Delay after each level change
    pub interval: Duration,
    /// Number of high/low cycles, `None` to run until terminated
    pub count: Option<u64>,
}

/// Toggle a pin high and low
///
/// The pin is configured as output and driven low before the first cycle.
/// `sleep` is called after every write. `stop` is checked before every
/// level change; once set, or once the cycle count is reached, the pin is
/// driven low and this returns.
pub fn run_blink<W, S>(
    gpio: &mut GpioController<W>,
    opts: &BlinkOptions,
    stop: &AtomicBool,
    mut sleep: S,
) -> Result<()>
where
    W: RegisterWindow,
    S: FnMut(Duration),
{
    gpio.configure(opts.pin, PinMode::Output)?;
    gpio.write(opts.pin, Level::Low)?;

    match opts.count {
        Some(n) => log::info!(
            "Blinking GPIO{} {} times every {:?}",
            opts.pin,
            n,
            opts.interval
        ),
        None => log::info!(
            "Blinking GPIO{} every {:?} until interrupted",
            opts.pin,
            opts.interval
        ),
    }

    let mut cycles = 0u64;
    while opts.count.map_or(true, |n| cycles < n) && !stop.load(Ordering::SeqCst) {
        gpio.write(opts.pin, Level::High)?;
        sleep(opts.interval);
        if stop.load(Ordering::SeqCst) {
            break;
        }
        gpio.write(opts.pin, Level::Low)?;
        sleep(opts.interval);

        cycles += 1;
        log::debug!("cycle {}", cycles);
    }

    if stop.load(Ordering::SeqCst) {
        log::info!("Interrupted after {} cycles, driving GPIO{} low", cycles, opts.pin);
    }
    gpio.write(opts.pin, Level::Low)
}
