/// Mask for the 6-bit opcode field `A` (bits 5..0).
pub const OPCODE_MASK: u32 = 0x3F;
/// Mask for the 3-bit register fields `B` and short-form `C`.
pub const REGISTER_FIELD_MASK: u32 = 0x07;
/// Width in bits of the long-form immediate `C` field.
pub const IMMEDIATE_FIELD_BITS: u32 = 17;
/// Mask for the 17-bit long-form immediate `C` field (bits 25..9).
pub const IMMEDIATE_FIELD_MASK: u32 = (1 << IMMEDIATE_FIELD_BITS) - 1;
/// Bit position of field `B`.
pub const B_FIELD_SHIFT: u32 = 6;
/// Bit position of field `C`.
pub const C_FIELD_SHIFT: u32 = 9;

/// Byte length of one encoded instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum WordWidth {
    /// Two-byte word with a 3-bit register `C` field.
    Short = 2,
    /// Four-byte word with a 17-bit immediate `C` field.
    Long = 4,
}

impl WordWidth {
    /// Returns the number of bytes occupied by a word of this width.
    #[must_use]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Returns the mask applied to field `C` for this width.
    #[must_use]
    pub const fn c_field_mask(self) -> u32 {
        match self {
            Self::Short => REGISTER_FIELD_MASK,
            Self::Long => IMMEDIATE_FIELD_MASK,
        }
    }
}

/// Operations of the instruction set, keyed by their `A` field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Opcode {
    /// `registers[B] := memory[registers[C]]`.
    Load = 5,
    /// `registers[B] := C`.
    LoadConst = 30,
    /// `memory[registers[C]] := registers[B]`.
    Store = 33,
    /// `registers[B] := ror32(registers[B], memory[registers[C]])`.
    Ror = 37,
}

/// Single source-of-truth opcode table: `(A, opcode, word width)`.
///
/// Any `A` value not present here is illegal by definition.
pub const OPCODE_TABLE: &[(u8, Opcode, WordWidth)] = &[
    (5, Opcode::Load, WordWidth::Short),
    (30, Opcode::LoadConst, WordWidth::Long),
    (33, Opcode::Store, WordWidth::Short),
    (37, Opcode::Ror, WordWidth::Short),
];

impl Opcode {
    /// Converts a raw `A` field value into an assigned opcode.
    #[must_use]
    pub fn from_u6(value: u8) -> Option<Self> {
        OPCODE_TABLE
            .iter()
            .find_map(|(code, opcode, _)| (*code == value).then_some(*opcode))
    }

    /// Returns the raw `A` field value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns the encoded word width for this opcode.
    #[must_use]
    pub const fn width(self) -> WordWidth {
        word_width_for(self as u8)
    }

    /// Returns the mask applied to field `C` for this opcode.
    #[must_use]
    pub const fn c_field_mask(self) -> u32 {
        self.width().c_field_mask()
    }

    /// Canonical upper-case mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Load => "LOAD",
            Self::LoadConst => "LOAD_CONST",
            Self::Store => "STORE",
            Self::Ror => "ROR",
        }
    }
}

/// Returns the word width selected by a raw (already masked) `A` value.
///
/// Only `LOAD_CONST` uses the long form. Unassigned values commit to the
/// short form so the executor can report them as unknown opcodes.
#[must_use]
pub const fn word_width_for(opcode: u8) -> WordWidth {
    if opcode == Opcode::LoadConst as u8 {
        WordWidth::Long
    } else {
        WordWidth::Short
    }
}
