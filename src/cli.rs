//! CLI argument parsing

use bcmgpio_core::{Level, PinMode};
use clap::{Parser, Subcommand};

/// GPIO wired to the LED on the breadboard (header pin 11)
pub const DEFAULT_LED_PIN: u8 = 17;

/// Parse a pin mode for clap
fn parse_mode(s: &str) -> Result<PinMode, String> {
    s.to_ascii_lowercase().parse().map_err(|e: &str| e.to_string())
}

/// Parse a pin level for clap
fn parse_level(s: &str) -> Result<Level, String> {
    s.to_ascii_lowercase().parse().map_err(|e: &str| e.to_string())
}

#[derive(Parser)]
#[command(name = "bcmgpio")]
#[command(author, version, about = "Raspberry Pi GPIO control through the SoC registers", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Register backend: devmem[:dev=<path>,chip=<name>,base=<addr>], gpiomem[:dev=<path>] or dummy
    #[arg(short, long, default_value = "devmem", global = true)]
    pub backend: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Blink a pin until interrupted
    Blink {
        /// GPIO number (BCM numbering)
        #[arg(short, long, default_value_t = DEFAULT_LED_PIN)]
        pin: u8,

        /// Time between level changes in milliseconds
        #[arg(short, long, default_value_t = 1000)]
        interval_ms: u64,

        /// Stop after this many on/off cycles and leave the pin low
        #[arg(short, long)]
        count: Option<u64>,
    },

    /// Set the function of a pin
    Mode {
        /// GPIO number (BCM numbering)
        pin: u8,

        /// input or output
        #[arg(value_parser = parse_mode)]
        mode: PinMode,
    },

    /// Drive an output pin high or low
    Set {
        /// GPIO number (BCM numbering)
        pin: u8,

        /// high or low
        #[arg(value_parser = parse_level)]
        level: Level,
    },

    /// Show the level and function of a pin
    Get {
        /// GPIO number (BCM numbering)
        pin: u8,
    },

    /// List register backends
    ListBackends,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_blink_defaults() {
        let cli = Cli::try_parse_from(["bcmgpio", "blink"]).unwrap();
        assert_eq!(cli.backend, "devmem");
        match cli.command {
            Commands::Blink {
                pin,
                interval_ms,
                count,
            } => {
                assert_eq!(pin, 17);
                assert_eq!(interval_ms, 1000);
                assert_eq!(count, None);
            }
            _ => panic!("expected blink"),
        }
    }

    #[test]
    fn test_set_parses_level() {
        let cli = Cli::try_parse_from(["bcmgpio", "-b", "dummy", "set", "22", "HIGH"]).unwrap();
        assert_eq!(cli.backend, "dummy");
        assert!(matches!(
            cli.command,
            Commands::Set {
                pin: 22,
                level: Level::High
            }
        ));
        assert!(Cli::try_parse_from(["bcmgpio", "set", "22", "up"]).is_err());
    }
}
