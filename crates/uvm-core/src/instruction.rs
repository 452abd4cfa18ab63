//! Logical instruction type shared by the assembler and the executor.
//!
//! Field widths live in one place: each variant maps to `(A, B, C)` through
//! [`Instruction::fields`] and back through `TryFrom<DecodedWord>`.

use std::fmt;

use crate::codec::{encode_word, DecodedWord, EncodedWord};
use crate::encoding::{Opcode, WordWidth, IMMEDIATE_FIELD_MASK};
use crate::state::Register;

/// One instruction of the UVM instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Instruction {
    /// `dst := value` with a 17-bit zero-extended immediate.
    LoadConst {
        /// Destination register (field `B`).
        dst: Register,
        /// Immediate (field `C`); bits above 17 are dropped on encode.
        value: u32,
    },
    /// `dst := memory[addr_reg]`.
    Load {
        /// Destination register (field `B`).
        dst: Register,
        /// Register holding the address (field `C`).
        addr_reg: Register,
    },
    /// `memory[addr_reg] := src`.
    Store {
        /// Source register (field `B`).
        src: Register,
        /// Register holding the address (field `C`).
        addr_reg: Register,
    },
    /// `dst := rotate_right_32(dst, memory[mem_reg] mod 32)`.
    Ror {
        /// Register rotated in place (field `B`).
        dst: Register,
        /// Register holding the address of the shift amount (field `C`).
        mem_reg: Register,
    },
}

impl Instruction {
    /// Returns the opcode of this instruction.
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::LoadConst { .. } => Opcode::LoadConst,
            Self::Load { .. } => Opcode::Load,
            Self::Store { .. } => Opcode::Store,
            Self::Ror { .. } => Opcode::Ror,
        }
    }

    /// Returns the raw `(A, B, C)` fields.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn fields(&self) -> (u8, u8, u32) {
        let a = self.opcode().as_u8();
        match *self {
            Self::LoadConst { dst, value } => (a, dst.as_u8(), value),
            Self::Load { dst, addr_reg } => (a, dst.as_u8(), addr_reg.as_u8() as u32),
            Self::Store { src, addr_reg } => (a, src.as_u8(), addr_reg.as_u8() as u32),
            Self::Ror { dst, mem_reg } => (a, dst.as_u8(), mem_reg.as_u8() as u32),
        }
    }

    /// Returns the encoded word width.
    #[must_use]
    pub const fn width(&self) -> WordWidth {
        self.opcode().width()
    }

    /// Encodes this instruction.
    #[must_use]
    pub fn encode(&self) -> EncodedWord {
        let (a, b, c) = self.fields();
        encode_word(a, u32::from(b), c)
    }
}

impl TryFrom<DecodedWord> for Instruction {
    /// The unassigned raw opcode.
    type Error = u8;

    fn try_from(word: DecodedWord) -> Result<Self, Self::Error> {
        let opcode = Opcode::from_u6(word.opcode).ok_or(word.opcode)?;
        let b = Register::from_bits_truncate(u32::from(word.b));
        let c_reg = Register::from_bits_truncate(word.c);

        Ok(match opcode {
            Opcode::LoadConst => Self::LoadConst {
                dst: b,
                value: word.c & IMMEDIATE_FIELD_MASK,
            },
            Opcode::Load => Self::Load {
                dst: b,
                addr_reg: c_reg,
            },
            Opcode::Store => Self::Store {
                src: b,
                addr_reg: c_reg,
            },
            Opcode::Ror => Self::Ror {
                dst: b,
                mem_reg: c_reg,
            },
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match self {
            Self::LoadConst { dst, value } => write!(f, "{mnemonic} {dst}, {value}"),
            Self::Load { dst, addr_reg } => write!(f, "{mnemonic} {dst}, [{addr_reg}]"),
            Self::Store { src, addr_reg } => write!(f, "{mnemonic} {src}, [{addr_reg}]"),
            Self::Ror { dst, mem_reg } => write!(f, "{mnemonic} {dst}, [{mem_reg}]"),
        }
    }
}
