//! Register backend registration and dispatch
//!
//! A backend provides the `RegisterWindow` the GPIO controller runs on.
//! Backends are selected with a string of the form `name` or
//! `name:key1=value1,key2=value2`. The emulator is only compiled in with
//! the `dummy` feature.

use bcmgpio_core::RegisterWindow;
use thiserror::Error;

/// Information about a backend
pub struct BackendInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Errors raised while setting up a backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend name not recognised or not compiled in
    #[error("Unknown backend: {0}\n\n{help}", help = backend_help())]
    Unknown(String),

    /// Malformed option string
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    InvalidOption(String),

    /// Backend takes no options
    #[error("Backend '{0}' does not take options")]
    UnexpectedOptions(&'static str),

    /// Mapping the register block failed
    #[error(transparent)]
    DevMem(#[from] bcmgpio_devmem::DevMemError),
}

/// Get information about all available backends (enabled at compile time)
#[allow(clippy::vec_init_then_push)]
pub fn available_backends() -> Vec<BackendInfo> {
    let mut backends = Vec::new();

    backends.push(BackendInfo {
        name: "devmem",
        aliases: &["mem"],
        description: "/dev/mem at the SoC GPIO base, requires root (dev=<path>,chip=<name>,base=<addr>)",
    });

    backends.push(BackendInfo {
        name: "gpiomem",
        aliases: &[],
        description: "/dev/gpiomem GPIO-only device, no root needed (dev=<path>)",
    });

    #[cfg(feature = "dummy")]
    backends.push(BackendInfo {
        name: "dummy",
        aliases: &["sim"],
        description: "In-memory GPIO register emulator for testing",
    });

    backends
}

/// Generate help text listing all available backends
pub fn backend_help() -> String {
    let backends = available_backends();

    let mut help = String::from("Available backends:\n");
    for b in &backends {
        help.push_str(&format!("  {:10} - {}\n", b.name, b.description));
    }
    help
}

/// Resolve a backend name or alias to its canonical name
pub fn find_backend(name: &str) -> Option<&'static str> {
    available_backends()
        .into_iter()
        .find(|b| b.name == name || b.aliases.contains(&name))
        .map(|b| b.name)
}

/// Parse a backend string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_backend_string(s: &str) -> Result<(&str, Vec<(&str, &str)>), BackendError> {
    let Some((name, opts)) = s.split_once(':') else {
        return Ok((s, Vec::new()));
    };

    let mut options = Vec::new();
    for opt in opts.split(',').filter(|opt| !opt.is_empty()) {
        let pair = opt
            .split_once('=')
            .ok_or_else(|| BackendError::InvalidOption(opt.to_string()))?;
        options.push(pair);
    }
    Ok((name, options))
}

/// An opened backend owning its register window
pub enum Backend {
    /// Memory device mapping
    DevMem(bcmgpio_devmem::DevMemRegisters),
    /// In-memory emulator
    #[cfg(feature = "dummy")]
    Dummy(Box<bcmgpio_dummy::DummyGpio>),
}

impl Backend {
    /// Borrow the register window
    pub fn window(&mut self) -> &mut dyn RegisterWindow {
        match self {
            Backend::DevMem(regs) => regs,
            #[cfg(feature = "dummy")]
            Backend::Dummy(regs) => &mut **regs,
        }
    }
}

/// Open the backend described by `spec`
pub fn open_backend(spec: &str) -> Result<Backend, BackendError> {
    let (name, options) = parse_backend_string(spec)?;

    let canonical_name =
        find_backend(name).ok_or_else(|| BackendError::Unknown(name.to_string()))?;

    match canonical_name {
        "devmem" | "gpiomem" => {
            use bcmgpio_devmem::{
                parse_gpiomem_options, parse_options, DevMemConfig, DevMemRegisters,
            };

            let config = if canonical_name == "gpiomem" {
                parse_gpiomem_options(&options)?
            } else {
                parse_options(&options, DevMemConfig::default())?
            };

            log::info!(
                "Opening {} at {:#x}...",
                config.device.display(),
                config.base
            );
            Ok(Backend::DevMem(DevMemRegisters::open(&config)?))
        }

        #[cfg(feature = "dummy")]
        "dummy" => {
            if !options.is_empty() {
                return Err(BackendError::UnexpectedOptions("dummy"));
            }
            log::info!("Using in-memory GPIO emulator");
            Ok(Backend::Dummy(Box::default()))
        }

        _ => Err(BackendError::Unknown(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_string() {
        let (name, opts) = parse_backend_string("devmem:chip=bcm2711,dev=/dev/mem").unwrap();
        assert_eq!(name, "devmem");
        assert_eq!(opts, vec![("chip", "bcm2711"), ("dev", "/dev/mem")]);

        let (name, opts) = parse_backend_string("dummy").unwrap();
        assert_eq!(name, "dummy");
        assert!(opts.is_empty());

        assert!(matches!(
            parse_backend_string("devmem:chip"),
            Err(BackendError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_unknown_backend() {
        assert!(find_backend("ch341a").is_none());
        assert!(matches!(
            open_backend("ch341a"),
            Err(BackendError::Unknown(_))
        ));
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy() {
        assert_eq!(find_backend("sim"), Some("dummy"));
        let mut backend = open_backend("dummy").unwrap();
        assert_eq!(backend.window().len(), bcmgpio_dummy::DEFAULT_REGISTERS);
        assert!(matches!(
            open_backend("dummy:foo=1"),
            Err(BackendError::UnexpectedOptions("dummy"))
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_devmem_open_failure_is_reported() {
        let err = open_backend("devmem:dev=/nonexistent/mem").err().unwrap();
        assert!(matches!(
            err,
            BackendError::DevMem(bcmgpio_devmem::DevMemError::DeviceOpenFailed { .. })
        ));
        assert!(err.to_string().starts_with("Unable to open /nonexistent/mem"));
    }

    #[test]
    fn test_gpiomem_rejects_chip_before_open() {
        // The device is missing, so getting past option parsing would
        // report DeviceOpenFailed instead
        for spec in [
            "gpiomem:chip=bcm2711,dev=/nonexistent/gpiomem",
            "gpiomem:base=0xFE200000,dev=/nonexistent/gpiomem",
        ] {
            assert!(matches!(
                open_backend(spec),
                Err(BackendError::DevMem(
                    bcmgpio_devmem::DevMemError::InvalidParameter(_)
                ))
            ));
        }
    }
}
