//! Single pin commands

use bcmgpio_core::{GpioController, Level, PinMode, RegisterWindow, Result};

/// Set the function of a pin
pub fn cmd_mode<W: RegisterWindow>(gpio: &mut GpioController<W>, pin: u8, mode: PinMode) -> Result<()> {
    gpio.configure(pin, mode)?;
    println!("GPIO{}: {}", pin, mode);
    Ok(())
}

/// Drive a pin
///
/// Warns if the pin is not an output, since the level will not reach the
/// header until it is configured.
pub fn cmd_set<W: RegisterWindow>(gpio: &mut GpioController<W>, pin: u8, level: Level) -> Result<()> {
    if gpio.mode(pin)? != Some(PinMode::Output) {
        log::warn!(
            "GPIO{} is not configured as output, run 'bcmgpio mode {} output' first",
            pin,
            pin
        );
    }
    gpio.write(pin, level)?;
    println!("GPIO{}: {}", pin, level);
    Ok(())
}

/// Show a pin's level and function
pub fn cmd_get<W: RegisterWindow>(gpio: &GpioController<W>, pin: u8) -> Result<()> {
    println!("{}", describe_pin(gpio, pin)?);
    Ok(())
}

fn describe_pin<W: RegisterWindow>(gpio: &GpioController<W>, pin: u8) -> Result<String> {
    let level = gpio.read(pin)?;
    let mode = match gpio.mode(pin)? {
        Some(mode) => mode.to_string(),
        None => "alternate function".to_string(),
    };
    Ok(format!("GPIO{}: {} ({})", pin, level, mode))
}
