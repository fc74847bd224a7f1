use std::fs;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{FirmwareError, Result};

/// Bytes reserved at the top of memory for the parameter block.
pub const PARAM_BLOCK_BYTES: usize = 16;

/// Default image size: 128 KiB, the RAM footprint of the reference core.
pub const DEFAULT_IMAGE_BYTES: usize = 128 * 1024;

/// Flat little-endian memory image the firmware programs execute against.
///
/// Models the RAM of a minimal embedded core: a byte array addressed in
/// 32-bit words, loadable from and savable to an image file. Every access is
/// bounds- and alignment-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryImage {
    bytes: Vec<u8>,
}

impl MemoryImage {
    /// Zero-filled image of `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns `FirmwareError::ImageSize` unless `len` is word-aligned and
    /// holds at least the parameter block.
    pub fn new(len: usize) -> Result<Self> {
        if len % 4 != 0 || len < PARAM_BLOCK_BYTES {
            return Err(FirmwareError::ImageSize {
                len,
                min: PARAM_BLOCK_BYTES,
            });
        }
        Ok(MemoryImage {
            bytes: vec![0; len],
        })
    }

    /// Zero-filled image of the default 128 KiB.
    pub fn with_default_size() -> Self {
        MemoryImage {
            bytes: vec![0; DEFAULT_IMAGE_BYTES],
        }
    }

    /// Load an image file via a memory-mapped read.
    ///
    /// # Errors
    ///
    /// Returns `FirmwareError::Io` if the file cannot be opened or mapped,
    /// or `ImageSize` if its length is not a valid image size.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        let bytes = mmap.to_vec();
        if bytes.len() % 4 != 0 || bytes.len() < PARAM_BLOCK_BYTES {
            return Err(FirmwareError::ImageSize {
                len: bytes.len(),
                min: PARAM_BLOCK_BYTES,
            });
        }
        Ok(MemoryImage { bytes })
    }

    /// Write the image to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }

    /// Image length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; a valid image holds at least the parameter block.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw image bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn check_word(&self, addr: usize) -> Result<()> {
        if addr % 4 != 0 {
            return Err(FirmwareError::UnalignedAddress { addr });
        }
        let end = addr.checked_add(4).ok_or(FirmwareError::AddressOutOfRange {
            addr,
            len: self.bytes.len(),
        })?;
        if end > self.bytes.len() {
            return Err(FirmwareError::AddressOutOfRange {
                addr,
                len: self.bytes.len(),
            });
        }
        Ok(())
    }

    /// Little-endian word at `addr`.
    ///
    /// # Errors
    ///
    /// Returns `UnalignedAddress` or `AddressOutOfRange` for a bad address.
    pub fn read_word(&self, addr: usize) -> Result<u32> {
        self.check_word(addr)?;
        let bytes: [u8; 4] = [
            self.bytes[addr],
            self.bytes[addr + 1],
            self.bytes[addr + 2],
            self.bytes[addr + 3],
        ];
        Ok(u32::from_le_bytes(bytes))
    }

    /// Store a little-endian word at `addr`.
    ///
    /// # Errors
    ///
    /// Returns `UnalignedAddress` or `AddressOutOfRange` for a bad address.
    pub fn write_word(&mut self, addr: usize, value: u32) -> Result<()> {
        self.check_word(addr)?;
        self.bytes[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// The word at `addr` as a two's-complement signed value.
    pub fn read_i32(&self, addr: usize) -> Result<i32> {
        Ok(self.read_word(addr)? as i32)
    }

    /// Store a signed value as its two's-complement word.
    pub fn write_i32(&mut self, addr: usize, value: i32) -> Result<()> {
        self.write_word(addr, value as u32)
    }
}
