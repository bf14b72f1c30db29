//! Physical memory mapping of the GPIO register block
//!
//! The block is reached by mapping one page of a memory device into the
//! process: `/dev/mem` at the block's physical address, or `/dev/gpiomem`
//! (which only exposes the GPIO block) at offset 0.
//!
//! # Safety
//!
//! Mapping the wrong physical address gives write access to whatever
//! peripheral lives there. The base comes from the chip table or from an
//! explicit user override; nothing here can verify it.

#[cfg(target_os = "linux")]
use std::path::Path;

use bcmgpio_core::error::Result as CoreResult;
use bcmgpio_core::registers::{check_index, RegisterWindow};

use crate::error::{DevMemError, Result};
use crate::DevMemConfig;

/// One page of GPIO registers mapped from a memory device
#[cfg(target_os = "linux")]
pub struct DevMemRegisters {
    /// Start of the mapping, page aligned
    ptr: core::ptr::NonNull<u32>,
    /// Size of the mapping in bytes
    size: usize,
    /// Physical address (for logging)
    phys_addr: u64,
    /// Keeps the device open for the lifetime of the mapping
    _file: std::fs::File,
}

#[cfg(target_os = "linux")]
impl DevMemRegisters {
    /// Map the GPIO block described by `config`
    ///
    /// Fails with `DeviceOpenFailed` if the device cannot be opened, in
    /// which case no mapping is attempted, or with `MappingFailed` if
    /// mmap() rejects the request.
    pub fn open(config: &DevMemConfig) -> Result<Self> {
        let page_size = page_size();
        if config.base % page_size as u64 != 0 {
            return Err(DevMemError::UnalignedBase {
                address: config.base,
                page_size,
            });
        }

        let file = open_device(&config.device)?;
        let ptr = map_page(&file, config.base, page_size)?;

        log::info!(
            "Mapped GPIO block at {:#x} via {} ({} registers)",
            config.base,
            config.device.display(),
            page_size / 4
        );

        Ok(Self {
            ptr,
            size: page_size,
            phys_addr: config.base,
            _file: file,
        })
    }

    /// Get the size of this mapping in bytes
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Open the memory device read/write with O_SYNC for uncached access
#[cfg(target_os = "linux")]
fn open_device(path: &Path) -> Result<std::fs::File> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::OpenOptionsExt;

    log::debug!("Opening {}", path.display());

    OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_SYNC)
        .open(path)
        .map_err(|source| DevMemError::DeviceOpenFailed {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(target_os = "linux")]
fn map_page(
    file: &std::fs::File,
    phys_addr: u64,
    size: usize,
) -> Result<core::ptr::NonNull<u32>> {
    use std::os::unix::io::AsRawFd;

    // off_t is 32 bits on 32-bit targets without large file support
    let offset = libc::off_t::try_from(phys_addr).map_err(|_| {
        DevMemError::InvalidParameter(format!(
            "base address {:#x} does not fit in this platform's file offset",
            phys_addr
        ))
    })?;

    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            size,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_SHARED,
            file.as_raw_fd(),
            offset,
        )
    };

    if ptr == libc::MAP_FAILED {
        return Err(DevMemError::MappingFailed {
            address: phys_addr,
            size,
            source: std::io::Error::last_os_error(),
        });
    }

    // mmap returns page aligned memory, so this is also u32 aligned
    core::ptr::NonNull::new(ptr as *mut u32).ok_or_else(|| DevMemError::MappingFailed {
        address: phys_addr,
        size,
        source: std::io::Error::from(std::io::ErrorKind::AddrNotAvailable),
    })
}

#[cfg(target_os = "linux")]
fn page_size() -> usize {
    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

#[cfg(target_os = "linux")]
impl RegisterWindow for DevMemRegisters {
    fn len(&self) -> usize {
        self.size / 4
    }

    #[inline]
    fn read(&self, index: usize) -> CoreResult<u32> {
        check_index(index, self.len())?;
        // SAFETY: index is within the live mapping
        Ok(unsafe { core::ptr::read_volatile(self.ptr.as_ptr().add(index)) })
    }

    #[inline]
    fn write(&mut self, index: usize, value: u32) -> CoreResult<()> {
        check_index(index, self.len())?;
        // SAFETY: index is within the live mapping
        unsafe { core::ptr::write_volatile(self.ptr.as_ptr().add(index), value) };
        Ok(())
    }
}

#[cfg(target_os = "linux")]
impl Drop for DevMemRegisters {
    fn drop(&mut self) {
        log::debug!("Unmapping GPIO block at {:#x}", self.phys_addr);
        unsafe {
            libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.size);
        }
    }
}

// The mapping is owned and only written through &mut self, so it can move
// between threads. It is not Sync: configure() relies on exclusive access.
#[cfg(target_os = "linux")]
unsafe impl Send for DevMemRegisters {}

// Stub for non-Linux platforms
#[cfg(not(target_os = "linux"))]
pub struct DevMemRegisters {
    _private: (),
}

#[cfg(not(target_os = "linux"))]
impl DevMemRegisters {
    pub fn open(_config: &DevMemConfig) -> Result<Self> {
        Err(DevMemError::NotSupported(
            "Physical memory mapping only supported on Linux",
        ))
    }

    pub fn size(&self) -> usize {
        0
    }
}

#[cfg(not(target_os = "linux"))]
impl RegisterWindow for DevMemRegisters {
    fn len(&self) -> usize {
        0
    }

    fn read(&self, index: usize) -> CoreResult<u32> {
        check_index(index, 0).map(|_| 0)
    }

    fn write(&mut self, index: usize, _value: u32) -> CoreResult<()> {
        check_index(index, 0)
    }
}
