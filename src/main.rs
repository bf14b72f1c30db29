//! bcmgpio - Raspberry Pi GPIO control through the SoC registers
//!
//! Drives GPIO pins by writing the BCM283x GPIO registers directly, with no
//! kernel driver or helper library in between.
//!
//! # Architecture
//!
//! - **bcmgpio-core** knows the register layout and turns pin operations
//!   into register accesses on a `RegisterWindow`.
//! - **Backends** provide the window: a `/dev/mem` or `/dev/gpiomem`
//!   mapping, or an in-memory emulator for running without hardware.
//!
//! Setup failures (device open, mmap) are fatal: the error is printed and
//! the process exits with status 1.

mod backends;
mod cli;
mod commands;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bcmgpio_core::GpioController;
use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    if let Commands::ListBackends = cli.command {
        commands::list_backends();
        return;
    }

    // Without the register mapping nothing else can work
    let mut backend = match backends::open_backend(&cli.backend) {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("Failed to set up GPIO access: {}", e);
            std::process::exit(1);
        }
    };
    let mut gpio = GpioController::new(backend.window());

    // Ctrl+C ends a blink loop with the pin driven low
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    if let Err(e) = ctrlc::set_handler(move || handler_stop.store(true, Ordering::SeqCst)) {
        log::warn!("Failed to set Ctrl+C handler: {}", e);
    }

    if let Err(e) = commands::run(&mut gpio, cli.command, &stop) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
