//! bcmgpio-dummy - In-memory GPIO register block emulator
//!
//! This crate provides a `RegisterWindow` backed by plain memory that
//! behaves like the BCM283x GPIO block closely enough to test against:
//!
//! - GPSET0/GPCLR0 are write-1-to-act. Zero bits are ignored, so the stored
//!   value accumulates every bit ever written and a write never clears
//!   bits of other pins.
//! - GPLEV0 is read-only and follows the output latch of pins whose
//!   function select is output.
//! - Every other register is plain read/write storage.
//!
//! It also counts accesses so tests can assert that nothing was touched.

#![cfg_attr(not(feature = "std"), no_std)]

use core::cell::Cell;

use bcmgpio_core::error::Result;
use bcmgpio_core::gpio::FselField;
use bcmgpio_core::pin::PinMode;
use bcmgpio_core::registers::{check_index, RegisterWindow, GPCLR0, GPLEV0, GPSET0};

/// Number of 32-bit registers in one 4 KiB page
pub const DEFAULT_REGISTERS: usize = 1024;

/// Dummy GPIO register block
///
/// Emulates one page of GPIO registers in memory for testing purposes.
pub struct DummyGpio {
    regs: [u32; DEFAULT_REGISTERS],
    /// Output latch, reflected in GPLEV0 for output pins
    latch: u32,
    reads: Cell<usize>,
    writes: usize,
}

impl DummyGpio {
    /// Create a new register block with every register zeroed
    pub fn new() -> Self {
        Self {
            regs: [0; DEFAULT_REGISTERS],
            latch: 0,
            reads: Cell::new(0),
            writes: 0,
        }
    }

    /// Create a register block with pre-filled registers
    ///
    /// `initial` is copied from index 0; extra values are ignored.
    pub fn with_registers(initial: &[u32]) -> Self {
        let mut gpio = Self::new();
        let len = core::cmp::min(initial.len(), gpio.regs.len());
        gpio.regs[..len].copy_from_slice(&initial[..len]);
        gpio
    }

    /// Get a reference to the raw register contents
    pub fn registers(&self) -> &[u32] {
        &self.regs
    }

    /// Number of register reads performed through `RegisterWindow`
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    /// Number of register writes performed through `RegisterWindow`
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Bitmask of pins whose function select is output
    fn output_mask(&self) -> u32 {
        (0..32u8)
            .filter(|&pin| {
                let field = FselField::for_pin(pin);
                self.regs
                    .get(field.register)
                    .and_then(|reg| PinMode::from_bits(reg >> field.shift))
                    == Some(PinMode::Output)
            })
            .fold(0, |mask, pin| mask | (1 << pin))
    }

    fn update_levels(&mut self) {
        let outputs = self.output_mask();
        self.regs[GPLEV0] = (self.regs[GPLEV0] & !outputs) | (self.latch & outputs);
    }
}

impl Default for DummyGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterWindow for DummyGpio {
    fn len(&self) -> usize {
        self.regs.len()
    }

    fn read(&self, index: usize) -> Result<u32> {
        check_index(index, self.regs.len())?;
        self.reads.set(self.reads.get() + 1);
        Ok(self.regs[index])
    }

    fn write(&mut self, index: usize, value: u32) -> Result<()> {
        check_index(index, self.regs.len())?;
        self.writes += 1;

        match index {
            GPSET0 => {
                self.regs[GPSET0] |= value;
                self.latch |= value;
            }
            GPCLR0 => {
                self.regs[GPCLR0] |= value;
                self.latch &= !value;
            }
            GPLEV0 => {
                log::warn!("dummy: write of {:#010x} to read-only GPLEV0 ignored", value);
                return Ok(());
            }
            _ => self.regs[index] = value,
        }

        self.update_levels();
        Ok(())
    }
}
