use thiserror::Error;

/// Stable fault taxonomy shared by the loader, executor, and dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// A long-form word was cut off by the end of the code region.
    #[error("TruncatedInstruction")]
    TruncatedInstruction = 0x01,
    /// The program does not fit in unified memory.
    #[error("ProgramTooLarge")]
    ProgramTooLarge = 0x02,
    /// A data access resolved to an address outside memory.
    #[error("MemoryOutOfRange")]
    MemoryOutOfRange = 0x03,
    /// The decoded `A` field is not an assigned opcode.
    #[error("UnknownOpcode")]
    UnknownOpcode = 0x04,
    /// A dump range is inverted or extends past the end of memory.
    #[error("RangeOutOfBounds")]
    RangeOutOfBounds = 0x05,
    /// The requested memory size exceeds the address space or cannot be allocated.
    #[error("MemoryTooLarge")]
    MemoryTooLarge = 0x06,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns the kind name used as the prefix of every error message.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TruncatedInstruction => "TruncatedInstruction",
            Self::ProgramTooLarge => "ProgramTooLarge",
            Self::MemoryOutOfRange => "MemoryOutOfRange",
            Self::UnknownOpcode => "UnknownOpcode",
            Self::RangeOutOfBounds => "RangeOutOfBounds",
            Self::MemoryTooLarge => "MemoryTooLarge",
        }
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::TruncatedInstruction),
            0x02 => Some(Self::ProgramTooLarge),
            0x03 => Some(Self::MemoryOutOfRange),
            0x04 => Some(Self::UnknownOpcode),
            0x05 => Some(Self::RangeOutOfBounds),
            0x06 => Some(Self::MemoryTooLarge),
            _ => None,
        }
    }
}

/// Fatal error raised while loading, executing, or dumping a machine.
///
/// Every message starts with the [`FaultCode`] name followed by the
/// offending value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum VmError {
    /// Long-form opcode at `pc` with fewer than 4 bytes left in the code region.
    #[error("{}: opcode {opcode} at pc {pc} needs 4 bytes but only {available} remain", FaultCode::TruncatedInstruction)]
    TruncatedInstruction {
        /// Offset of the partial word.
        pc: usize,
        /// Opcode read from the first two bytes.
        opcode: u8,
        /// Bytes left between `pc` and the end of the code region.
        available: usize,
    },
    /// Program length exceeds memory capacity.
    #[error("{}: program of {len} bytes does not fit in {capacity} bytes of memory", FaultCode::ProgramTooLarge)]
    ProgramTooLarge {
        /// Program length in bytes.
        len: usize,
        /// Memory capacity in bytes.
        capacity: usize,
    },
    /// Register-held address outside `[0, memory_size)`.
    #[error("{}: address {addr} is outside memory of {size} bytes", FaultCode::MemoryOutOfRange)]
    MemoryOutOfRange {
        /// Address taken from the register named by field `C`.
        addr: u32,
        /// Memory size in bytes.
        size: usize,
    },
    /// Decoded opcode not in the instruction set.
    #[error("{}: opcode {opcode} at pc {pc}", FaultCode::UnknownOpcode)]
    UnknownOpcode {
        /// Raw `A` field value.
        opcode: u8,
        /// Offset of the offending word.
        pc: usize,
    },
    /// Dump range is inverted or not inside memory.
    #[error("{}: range [{start}, {end}] is not within memory of {size} bytes", FaultCode::RangeOutOfBounds)]
    RangeOutOfBounds {
        /// First requested address.
        start: usize,
        /// Last requested address (inclusive).
        end: usize,
        /// Memory size in bytes.
        size: usize,
    },
    /// Memory size above the 32-bit address space or refused by the allocator.
    #[error("{}: memory of {size} bytes cannot be allocated (limit {limit} bytes)", FaultCode::MemoryTooLarge)]
    MemoryTooLarge {
        /// Requested size in bytes.
        size: usize,
        /// Largest addressable size in bytes.
        limit: usize,
    },
}

impl VmError {
    /// Returns the stable fault tag for this error.
    #[must_use]
    pub const fn code(&self) -> FaultCode {
        match self {
            Self::TruncatedInstruction { .. } => FaultCode::TruncatedInstruction,
            Self::ProgramTooLarge { .. } => FaultCode::ProgramTooLarge,
            Self::MemoryOutOfRange { .. } => FaultCode::MemoryOutOfRange,
            Self::UnknownOpcode { .. } => FaultCode::UnknownOpcode,
            Self::RangeOutOfBounds { .. } => FaultCode::RangeOutOfBounds,
            Self::MemoryTooLarge { .. } => FaultCode::MemoryTooLarge,
        }
    }
}
