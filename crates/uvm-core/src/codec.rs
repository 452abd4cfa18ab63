//! Bit packing of the `(A, B, C)` instruction fields into little-endian words.
//!
//! Word layout (bit 0 is the least significant bit of the first byte):
//!
//! ```text
//! long  (A = 30): [C:17 @ 25..9][B:3 @ 8..6][A:6 @ 5..0]   4 bytes
//! short (other) : [C:3  @ 11..9][B:3 @ 8..6][A:6 @ 5..0]   2 bytes
//! ```
//!
//! Encoding masks every field to its declared width. Out-of-range inputs are
//! truncated rather than rejected; [`EncodedWord::masked`] reports which
//! fields lost bits.

use thiserror::Error;

use crate::encoding::{
    word_width_for, WordWidth, B_FIELD_SHIFT, C_FIELD_SHIFT, OPCODE_MASK, REGISTER_FIELD_MASK,
};

/// Fields that lost significant bits while being packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaskedFields {
    /// Opcode `A` did not fit in 6 bits.
    pub opcode: bool,
    /// Field `B` did not fit in 3 bits.
    pub b: bool,
    /// Field `C` did not fit in the width selected by the opcode.
    pub c: bool,
}

impl MaskedFields {
    /// Returns `true` when any field was truncated.
    #[must_use]
    pub const fn any(self) -> bool {
        self.opcode || self.b || self.c
    }
}

/// One encoded instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedWord {
    bytes: [u8; 4],
    width: WordWidth,
    masked: MaskedFields,
}

impl EncodedWord {
    /// Returns the encoded bytes, 2 or 4 depending on width.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.width.bytes()]
    }

    /// Returns the word width.
    #[must_use]
    pub const fn width(&self) -> WordWidth {
        self.width
    }

    /// Reports which fields were truncated during encoding.
    #[must_use]
    pub const fn masked(&self) -> MaskedFields {
        self.masked
    }
}

/// A word split back into its raw fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodedWord {
    /// Raw 6-bit opcode `A`; not validated against the opcode table.
    pub opcode: u8,
    /// Raw 3-bit field `B`.
    pub b: u8,
    /// Raw field `C`, 17 bits wide for the long form and 3 bits otherwise.
    pub c: u32,
    /// Number of bytes consumed.
    pub width: WordWidth,
}

/// Decode failure for a byte stream that ends inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CodecError {
    /// A long-form opcode was read but fewer than 4 bytes remain.
    #[error("opcode {opcode} needs 4 bytes but only {available} remain")]
    Truncated {
        /// Opcode read from the first two bytes.
        opcode: u8,
        /// Bytes available at the decode position.
        available: usize,
    },
}

/// Packs `(A, B, C)` into a little-endian word whose width `A` selects.
#[must_use]
pub fn encode_word(opcode: u8, b: u32, c: u32) -> EncodedWord {
    let a = u32::from(opcode) & OPCODE_MASK;
    let width = word_width_for(opcode_byte(a));
    let c_mask = width.c_field_mask();

    let masked = MaskedFields {
        opcode: u32::from(opcode) != a,
        b: b & !REGISTER_FIELD_MASK != 0,
        c: c & !c_mask != 0,
    };

    let word = a | ((b & REGISTER_FIELD_MASK) << B_FIELD_SHIFT) | ((c & c_mask) << C_FIELD_SHIFT);

    EncodedWord {
        bytes: word.to_le_bytes(),
        width,
        masked,
    }
}

/// Decodes the word at the start of `bytes`.
///
/// The first two bytes are read unconditionally; only when they carry the
/// long-form opcode are two more bytes required and the word re-read with the
/// wide `C` field.
///
/// Returns `Ok(None)` when fewer than two bytes remain.
///
/// # Errors
///
/// Returns [`CodecError::Truncated`] when a long-form opcode is followed by
/// fewer than two further bytes.
pub fn decode_word(bytes: &[u8]) -> Result<Option<DecodedWord>, CodecError> {
    let [lo, hi, rest @ ..] = bytes else {
        return Ok(None);
    };

    let short = u32::from(u16::from_le_bytes([*lo, *hi]));
    let opcode = opcode_byte(short & OPCODE_MASK);

    let (word, width) = match word_width_for(opcode) {
        WordWidth::Short => (short, WordWidth::Short),
        WordWidth::Long => {
            let [b2, b3, ..] = rest else {
                return Err(CodecError::Truncated {
                    opcode,
                    available: bytes.len(),
                });
            };
            (
                u32::from_le_bytes([*lo, *hi, *b2, *b3]),
                WordWidth::Long,
            )
        }
    };

    Ok(Some(DecodedWord {
        opcode,
        b: register_byte(word >> B_FIELD_SHIFT),
        c: (word >> C_FIELD_SHIFT) & width.c_field_mask(),
        width,
    }))
}

#[allow(clippy::cast_possible_truncation)]
const fn opcode_byte(value: u32) -> u8 {
    (value & OPCODE_MASK) as u8
}

#[allow(clippy::cast_possible_truncation)]
const fn register_byte(value: u32) -> u8 {
    (value & REGISTER_FIELD_MASK) as u8
}
