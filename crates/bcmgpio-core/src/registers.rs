//! GPIO register window abstraction
//!
//! A `RegisterWindow` is a zero-based array of 32-bit registers starting at
//! the GPIO block base (index 0 = GPFSEL0). Indices are register indices,
//! not byte offsets.
//!
//! # Concurrency
//!
//! Accesses are not synchronized. The function select registers are updated
//! with a read-modify-write and each one is shared by ten pins, so two
//! writers touching the same register can lose an update. Callers are
//! responsible for making sure only one context configures pins at a time.
//! The set/clear registers are write-1-to-act and are safe to share.
//!
//! Register layout from the BCM2835 ARM Peripherals datasheet, section 6.1.

use crate::error::{Error, Result};

/// First function select register (GPFSEL0)
pub const GPFSEL0: usize = 0;

/// Number of pins packed into one function select register
pub const PINS_PER_FSEL_REGISTER: u8 = 10;

/// Width of one pin's function select field in bits
pub const FSEL_FIELD_BITS: u32 = 3;

/// Mask of one function select field before shifting
pub const FSEL_FIELD_MASK: u32 = 0b111;

/// Pin output set register 0 (GPSET0), write-1-to-set
pub const GPSET0: usize = 7;

/// Pin output clear register 0 (GPCLR0), write-1-to-clear
pub const GPCLR0: usize = 10;

/// Pin level register 0 (GPLEV0), read-only
pub const GPLEV0: usize = 13;

/// Access to the memory-mapped GPIO registers
///
/// Hardware implementations must perform volatile accesses: every call
/// reaches the device and is neither elided nor reordered with respect to
/// other calls. Implementations must bounds check `index` against `len()`
/// and return [`Error::RegisterOutOfRange`] instead of touching memory.
pub trait RegisterWindow {
    /// Number of 32-bit registers in the window
    fn len(&self) -> usize;

    /// Returns true if the window holds no registers
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the register at `index`
    fn read(&self, index: usize) -> Result<u32>;

    /// Write `value` to the register at `index`
    fn write(&mut self, index: usize, value: u32) -> Result<()>;

    /// Read-modify-write the register at `index`
    ///
    /// Not atomic: see the module level concurrency notes.
    fn modify<F>(&mut self, index: usize, f: F) -> Result<()>
    where
        F: FnOnce(u32) -> u32,
        Self: Sized,
    {
        let value = self.read(index)?;
        self.write(index, f(value))
    }
}

/// Forwarding impl so a controller can borrow a window it does not own
impl<W: RegisterWindow + ?Sized> RegisterWindow for &mut W {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, index: usize) -> Result<u32> {
        (**self).read(index)
    }

    fn write(&mut self, index: usize, value: u32) -> Result<()> {
        (**self).write(index, value)
    }
}

/// Check `index` against a window of `len` registers
#[inline]
pub fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::RegisterOutOfRange { index, len })
    }
}
