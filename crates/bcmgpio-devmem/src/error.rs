//! Error types for physical memory mapping

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up the register mapping
#[derive(Debug, Error)]
pub enum DevMemError {
    /// Failed to open the memory device
    #[error("Unable to open {}: {source}", .path.display())]
    DeviceOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// mmap() of the register block failed
    #[error("mmap of {size} bytes at {address:#x} failed: {source}")]
    MappingFailed {
        address: u64,
        size: usize,
        #[source]
        source: std::io::Error,
    },

    /// Physical base address is not page aligned
    #[error("Base address {address:#x} is not aligned to the {page_size} byte page size")]
    UnalignedBase { address: u64, page_size: usize },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Platform has no physical memory device
    #[error("Not supported: {0}")]
    NotSupported(&'static str),
}

/// Result type for mapping operations
pub type Result<T> = std::result::Result<T, DevMemError>;
