//! Unified code + data memory.

/// Shared bounds check for data accesses.
pub mod access;

pub use access::validate_data_address;

use crate::VmError;

/// Default size in bytes of unified memory (64 KiB).
pub const DEFAULT_MEMORY_SIZE: usize = 65_536;

/// Largest memory a `u32` register can address (4 GiB, or `usize::MAX` on
/// narrower targets).
#[allow(clippy::cast_possible_truncation)]
pub const MAX_MEMORY_SIZE: usize = (u32::MAX as usize).saturating_add(1);

/// Fixed-capacity byte memory holding the program image followed by data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    /// Allocates `size` zeroed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::MemoryTooLarge`] when `size` exceeds
    /// [`MAX_MEMORY_SIZE`] or the allocator cannot reserve it.
    pub fn new(size: usize) -> Result<Self, VmError> {
        let too_large = VmError::MemoryTooLarge {
            size,
            limit: MAX_MEMORY_SIZE,
        };
        if size > MAX_MEMORY_SIZE {
            return Err(too_large);
        }

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(size).map_err(|_| too_large)?;
        bytes.resize(size, 0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Allocates `size` bytes and copies `program` to address 0.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::ProgramTooLarge`] when `program` is longer than `size`,
    /// or [`VmError::MemoryTooLarge`] when `size` cannot be allocated.
    pub fn with_program(program: &[u8], size: usize) -> Result<Self, VmError> {
        if program.len() > size {
            return Err(VmError::ProgramTooLarge {
                len: program.len(),
                capacity: size,
            });
        }

        let mut memory = Self::new(size)?;
        memory.bytes[..program.len()].copy_from_slice(program);
        Ok(memory)
    }

    /// Returns the capacity in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for a zero-capacity memory.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads one byte at a register-held address.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::MemoryOutOfRange`] when `addr` is outside memory.
    pub fn read_byte(&self, addr: u32) -> Result<u8, VmError> {
        let index = validate_data_address(addr, self.len())?;
        Ok(self.bytes[index])
    }

    /// Writes one byte at a register-held address.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::MemoryOutOfRange`] when `addr` is outside memory.
    pub fn write_byte(&mut self, addr: u32, value: u8) -> Result<(), VmError> {
        let index = validate_data_address(addr, self.len())?;
        self.bytes[index] = value;
        Ok(())
    }

    /// Returns the whole memory image.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            bytes: vec![0; DEFAULT_MEMORY_SIZE].into_boxed_slice(),
        }
    }
}
