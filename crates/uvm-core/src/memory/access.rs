//! Bounds policy for register-addressed data accesses.

use crate::VmError;

/// Validates a register-held address against a memory of `size` bytes.
///
/// This is the only place `LOAD`, `STORE`, and `ROR` addresses are checked.
///
/// # Errors
///
/// Returns [`VmError::MemoryOutOfRange`] when `addr >= size`.
pub fn validate_data_address(addr: u32, size: usize) -> Result<usize, VmError> {
    usize::try_from(addr)
        .ok()
        .filter(|index| *index < size)
        .ok_or(VmError::MemoryOutOfRange { addr, size })
}
