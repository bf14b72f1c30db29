//! Pin-level GPIO operations
//!
//! `GpioController` translates a logical pin number into the register index
//! and bit position documented for the BCM283x GPIO block, and performs the
//! access through a [`RegisterWindow`].
//!
//! Every operation validates the pin first. An out-of-range pin yields
//! [`Error::InvalidPin`] and the window is not accessed at all.

use crate::error::{Error, Result};
use crate::pin::{is_valid_pin, Level, PinMode};
use crate::registers::{
    RegisterWindow, FSEL_FIELD_BITS, FSEL_FIELD_MASK, GPCLR0, GPFSEL0, GPLEV0, GPSET0,
    PINS_PER_FSEL_REGISTER,
};

/// Location of a pin's function select field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FselField {
    /// Register index relative to the window base
    pub register: usize,
    /// Bit position of the field's least significant bit
    pub shift: u32,
}

impl FselField {
    /// Compute the field location for `pin`
    pub const fn for_pin(pin: u8) -> Self {
        Self {
            register: GPFSEL0 + (pin / PINS_PER_FSEL_REGISTER) as usize,
            shift: (pin % PINS_PER_FSEL_REGISTER) as u32 * FSEL_FIELD_BITS,
        }
    }

    /// Mask covering the field within its register
    pub const fn mask(&self) -> u32 {
        FSEL_FIELD_MASK << self.shift
    }
}

/// GPIO controller over a mapped register window
///
/// Construct with an owned window or a `&mut` borrow of one. Mutating
/// operations take `&mut self`; concurrent configuration from several
/// processes sharing the same hardware is not guarded against.
pub struct GpioController<W: RegisterWindow> {
    window: W,
}

impl<W: RegisterWindow> GpioController<W> {
    /// Create a controller over `window`
    pub fn new(window: W) -> Self {
        Self { window }
    }

    /// Returns true if `pin` can be used with this controller
    #[inline]
    pub fn is_valid_pin(&self, pin: u8) -> bool {
        is_valid_pin(pin)
    }

    /// Set the function of `pin`
    ///
    /// Clears the pin's 3-bit function select field and writes the mode's
    /// encoding into it. The other nine fields of the register are
    /// preserved.
    pub fn configure(&mut self, pin: u8, mode: PinMode) -> Result<()> {
        check_pin(pin)?;

        let field = FselField::for_pin(pin);
        log::debug!(
            "GPIO{}: mode {} (GPFSEL{} bits {}-{})",
            pin,
            mode,
            field.register - GPFSEL0,
            field.shift,
            field.shift + FSEL_FIELD_BITS - 1
        );

        self.window.modify(field.register, |value| {
            (value & !field.mask()) | (mode.bits() << field.shift)
        })
    }

    /// Drive `pin` to `level`
    ///
    /// Writes `1 << pin` to GPSET0 for [`Level::High`] or GPCLR0 for
    /// [`Level::Low`]. Both registers ignore zero bits, so this is a single
    /// store and never disturbs other pins.
    pub fn write(&mut self, pin: u8, level: Level) -> Result<()> {
        check_pin(pin)?;

        let register = match level {
            Level::High => GPSET0,
            Level::Low => GPCLR0,
        };
        log::trace!("GPIO{}: {} (reg {})", pin, level, register);

        self.window.write(register, 1 << pin)
    }

    /// Read the current level of `pin` from GPLEV0
    pub fn read(&self, pin: u8) -> Result<Level> {
        check_pin(pin)?;

        let value = self.window.read(GPLEV0)?;
        Ok(if value & (1 << pin) != 0 {
            Level::High
        } else {
            Level::Low
        })
    }

    /// Read back the function of `pin`
    ///
    /// Returns `None` if the pin is set to one of its alternate functions.
    pub fn mode(&self, pin: u8) -> Result<Option<PinMode>> {
        check_pin(pin)?;

        let field = FselField::for_pin(pin);
        let value = self.window.read(field.register)?;
        Ok(PinMode::from_bits(value >> field.shift))
    }

    /// Get a reference to the underlying window
    pub fn window(&self) -> &W {
        &self.window
    }
}

fn check_pin(pin: u8) -> Result<()> {
    if is_valid_pin(pin) {
        Ok(())
    } else {
        log::debug!("GPIO{}: outside usable range, ignored", pin);
        Err(Error::InvalidPin(pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::check_index;

    /// Plain array window with an access counter
    struct ArrayWindow {
        regs: [u32; 16],
        accesses: core::cell::Cell<usize>,
    }

    impl ArrayWindow {
        fn new() -> Self {
            Self {
                regs: [0; 16],
                accesses: core::cell::Cell::new(0),
            }
        }
    }

    impl RegisterWindow for ArrayWindow {
        fn len(&self) -> usize {
            self.regs.len()
        }

        fn read(&self, index: usize) -> Result<u32> {
            check_index(index, self.regs.len())?;
            self.accesses.set(self.accesses.get() + 1);
            Ok(self.regs[index])
        }

        fn write(&mut self, index: usize, value: u32) -> Result<()> {
            check_index(index, self.regs.len())?;
            self.accesses.set(self.accesses.get() + 1);
            self.regs[index] = value;
            Ok(())
        }
    }

    #[test]
    fn test_fsel_field_location() {
        assert_eq!(FselField::for_pin(17), FselField { register: 1, shift: 21 });
        assert_eq!(FselField::for_pin(2), FselField { register: 0, shift: 6 });
        assert_eq!(FselField::for_pin(27), FselField { register: 2, shift: 21 });
        assert_eq!(FselField::for_pin(17).mask(), 0b111 << 21);
    }

    #[test]
    fn test_configure_output_preserves_neighbours() {
        let mut gpio = GpioController::new(ArrayWindow::new());
        gpio.window.regs[1] = 0xFFFF_FFFF;

        gpio.configure(17, PinMode::Output).unwrap();

        let reg = gpio.window().regs[1];
        assert_eq!((reg >> 21) & 0b111, 0b001);
        assert_eq!(reg | (0b111 << 21), 0xFFFF_FFFF);
    }

    #[test]
    fn test_configure_input_clears_field() {
        let mut gpio = GpioController::new(ArrayWindow::new());
        gpio.window.regs[0] = 0b101 << 12;

        gpio.configure(4, PinMode::Input).unwrap();

        assert_eq!(gpio.window().regs[0], 0);
        assert_eq!(gpio.mode(4), Ok(Some(PinMode::Input)));
    }

    #[test]
    fn test_configure_writes_mode_encoding() {
        let mut gpio = GpioController::new(ArrayWindow::new());
        // ALT5 on GPIO27, ALT0 on GPIO20
        gpio.window.regs[2] = (0b010 << 21) | 0b100;

        gpio.configure(27, PinMode::Output).unwrap();
        assert_eq!(gpio.window().regs[2], (PinMode::Output.bits() << 21) | 0b100);
        assert_eq!(gpio.mode(27), Ok(Some(PinMode::Output)));

        gpio.configure(27, PinMode::Input).unwrap();
        assert_eq!(gpio.window().regs[2], (PinMode::Input.bits() << 21) | 0b100);
        assert_eq!(gpio.mode(20), Ok(None));
    }

    #[test]
    fn test_write_is_single_store() {
        let mut gpio = GpioController::new(ArrayWindow::new());

        gpio.write(17, Level::High).unwrap();
        assert_eq!(gpio.window().regs[GPSET0], 1 << 17);
        assert_eq!(gpio.window().accesses.get(), 1);

        gpio.write(17, Level::Low).unwrap();
        assert_eq!(gpio.window().regs[GPCLR0], 1 << 17);
        assert_eq!(gpio.window().accesses.get(), 2);
    }

    #[test]
    fn test_invalid_pin_touches_nothing() {
        let mut gpio = GpioController::new(ArrayWindow::new());

        for pin in [0u8, 1, 28, 255] {
            assert_eq!(gpio.configure(pin, PinMode::Output), Err(Error::InvalidPin(pin)));
            assert_eq!(gpio.write(pin, Level::High), Err(Error::InvalidPin(pin)));
            assert_eq!(gpio.read(pin), Err(Error::InvalidPin(pin)));
        }

        assert_eq!(gpio.window().accesses.get(), 0);
        assert!(gpio.window().regs.iter().all(|&r| r == 0));
    }

    #[test]
    fn test_read_level() {
        let mut gpio = GpioController::new(ArrayWindow::new());
        gpio.window.regs[GPLEV0] = 1 << 22;

        assert_eq!(gpio.read(22), Ok(Level::High));
        assert_eq!(gpio.read(21), Ok(Level::Low));
    }

    #[test]
    fn test_borrowed_window() {
        let mut window = ArrayWindow::new();
        {
            let mut gpio = GpioController::new(&mut window);
            gpio.configure(9, PinMode::Output).unwrap();
        }
        assert_eq!(window.regs[0], 1 << 27);
    }
}
