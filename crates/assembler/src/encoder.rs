//! Record encoding.
//!
//! Resolves one [`SourceRecord`] to a [`uvm_core::Instruction`]. Field values
//! are wrapped to 32 bits and masked to their encoded width; any value that
//! does not survive masking is reported back so the caller can warn.

use uvm_core::{Instruction, Opcode, Register, REGISTER_FIELD_MASK};

use crate::mnemonic::{resolve_operation, OperationEntry};
use crate::source::SourceRecord;

/// Error during encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError {
    /// Kind of error.
    pub kind: EncodeErrorKind,
    /// 1-based record where the error occurred.
    pub record: usize,
}

/// Classification of encoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeErrorKind {
    /// Operation name not in the field-mapping table.
    UnknownOperation(String),
    /// A field the operation requires is absent.
    MissingField {
        /// Canonical operation name.
        op: &'static str,
        /// Missing field name.
        field: &'static str,
    },
    /// A field value is not an integer.
    InvalidField {
        /// Canonical operation name.
        op: &'static str,
        /// Field name.
        field: &'static str,
        /// Value as written.
        value: String,
    },
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOperation(name) => write!(f, "UnknownOperation: {name}"),
            Self::MissingField { op, field } => {
                write!(f, "MissingField: {op} requires `{field}`")
            }
            Self::InvalidField { op, field, value } => {
                write!(f, "InvalidField: {op}.{field} = {value} is not an integer")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// A field whose source value differs from what was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncatedField {
    /// Field name.
    pub field: &'static str,
    /// Value from the source.
    pub value: i64,
    /// Value actually encoded.
    pub kept: u32,
}

/// Encoded output for a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    /// Resolved instruction.
    pub instruction: Instruction,
    /// Fields that lost bits to masking.
    pub truncated: Vec<TruncatedField>,
}

/// Resolves `record` to an instruction.
///
/// # Errors
///
/// Returns [`EncodeErrorKind::UnknownOperation`] for an unmapped operation
/// name, [`EncodeErrorKind::MissingField`] when a required field is absent,
/// and [`EncodeErrorKind::InvalidField`] when a field is not an integer.
pub fn encode_record(record: &SourceRecord) -> Result<EncodedRecord, EncodeError> {
    let fail = |kind| EncodeError {
        kind,
        record: record.index,
    };

    let entry = resolve_operation(&record.op)
        .ok_or_else(|| fail(EncodeErrorKind::UnknownOperation(record.op.clone())))?;

    let mut truncated = Vec::new();
    let b = masked_field(record, entry, entry.b_field, REGISTER_FIELD_MASK, &mut truncated)
        .map_err(fail)?;
    let c = masked_field(
        record,
        entry,
        entry.c_field,
        entry.opcode.c_field_mask(),
        &mut truncated,
    )
    .map_err(fail)?;

    Ok(EncodedRecord {
        instruction: build_instruction(entry.opcode, b, c),
        truncated,
    })
}

fn masked_field(
    record: &SourceRecord,
    entry: &OperationEntry,
    field: &'static str,
    mask: u32,
    truncated: &mut Vec<TruncatedField>,
) -> Result<u32, EncodeErrorKind> {
    let raw = record.field(field).ok_or(EncodeErrorKind::MissingField {
        op: entry.name,
        field,
    })?;
    let value = raw.as_integer().ok_or_else(|| EncodeErrorKind::InvalidField {
        op: entry.name,
        field,
        value: raw.to_string(),
    })?;

    let kept = wrap_to_u32(value) & mask;
    if i64::from(kept) != value {
        truncated.push(TruncatedField { field, value, kept });
    }
    Ok(kept)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn wrap_to_u32(value: i64) -> u32 {
    value as u32
}

const fn build_instruction(opcode: Opcode, b: u32, c: u32) -> Instruction {
    let b = Register::from_bits_truncate(b);
    match opcode {
        Opcode::LoadConst => Instruction::LoadConst { dst: b, value: c },
        Opcode::Load => Instruction::Load {
            dst: b,
            addr_reg: Register::from_bits_truncate(c),
        },
        Opcode::Store => Instruction::Store {
            src: b,
            addr_reg: Register::from_bits_truncate(c),
        },
        Opcode::Ror => Instruction::Ror {
            dst: b,
            mem_reg: Register::from_bits_truncate(c),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::OPERATION_TABLE;
    use crate::source::{FieldValue, SourceRecord};
    use uvm_core::IMMEDIATE_FIELD_MASK;

    #[test]
    fn reference_records_resolve_to_instructions() {
        let cases = [
            (
                SourceRecord::new(1, "LOAD_CONST", &[("dst", 5), ("value", 748)]),
                Instruction::LoadConst {
                    dst: Register::R5,
                    value: 748,
                },
            ),
            (
                SourceRecord::new(2, "LOAD", &[("dst", 6), ("addr_reg", 0)]),
                Instruction::Load {
                    dst: Register::R6,
                    addr_reg: Register::R0,
                },
            ),
            (
                SourceRecord::new(3, "STORE", &[("src", 1), ("addr_reg", 7)]),
                Instruction::Store {
                    src: Register::R1,
                    addr_reg: Register::R7,
                },
            ),
            (
                SourceRecord::new(4, "ROR", &[("dst", 7), ("mem_reg", 5)]),
                Instruction::Ror {
                    dst: Register::R7,
                    mem_reg: Register::R5,
                },
            ),
        ];

        for (record, expected) in cases {
            let encoded = encode_record(&record).expect("valid record");
            assert_eq!(encoded.instruction, expected);
            assert!(encoded.truncated.is_empty());
        }
    }

    #[test]
    fn unknown_operation_names_the_token() {
        let err = encode_record(&SourceRecord::new(4, "JUMP", &[])).expect_err("unknown");
        assert_eq!(
            err,
            EncodeError {
                kind: EncodeErrorKind::UnknownOperation("JUMP".to_string()),
                record: 4,
            }
        );
        assert_eq!(err.to_string(), "UnknownOperation: JUMP");
    }

    #[test]
    fn missing_field_is_reported_with_canonical_name() {
        let err = encode_record(&SourceRecord::new(1, "store", &[("src", 1)]))
            .expect_err("addr_reg missing");
        assert_eq!(
            err.kind,
            EncodeErrorKind::MissingField {
                op: "STORE",
                field: "addr_reg",
            }
        );
    }

    #[test]
    fn non_integer_field_is_rejected() {
        let mut record = SourceRecord::new(1, "LOAD", &[("dst", 1)]);
        record
            .fields
            .insert("addr_reg".to_string(), FieldValue::Text("r2".to_string()));
        let err = encode_record(&record).expect_err("not an integer");
        assert_eq!(err.to_string(), "InvalidField: LOAD.addr_reg = \"r2\" is not an integer");
    }

    #[test]
    fn oversized_fields_are_masked_and_reported() {
        let encoded = encode_record(&SourceRecord::new(
            1,
            "LOAD_CONST",
            &[("dst", 9), ("value", 0x2_0001)],
        ))
        .expect("masked, not rejected");

        assert_eq!(
            encoded.instruction,
            Instruction::LoadConst {
                dst: Register::R1,
                value: 1,
            }
        );
        assert_eq!(
            encoded.truncated,
            vec![
                TruncatedField {
                    field: "dst",
                    value: 9,
                    kept: 1,
                },
                TruncatedField {
                    field: "value",
                    value: 0x2_0001,
                    kept: 1,
                },
            ]
        );
    }

    #[test]
    fn negative_values_wrap_before_masking() {
        let encoded = encode_record(&SourceRecord::new(1, "LOAD_CONST", &[("dst", 0), ("value", -1)]))
            .expect("masked");
        assert_eq!(
            encoded.instruction,
            Instruction::LoadConst {
                dst: Register::R0,
                value: IMMEDIATE_FIELD_MASK,
            }
        );
        assert_eq!(encoded.truncated.len(), 1);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let encoded = encode_record(&SourceRecord::new(
            1,
            "LOAD",
            &[("dst", 2), ("addr_reg", 3), ("comment", 0)],
        ))
        .expect("valid");
        assert_eq!(
            encoded.instruction,
            Instruction::Load {
                dst: Register::R2,
                addr_reg: Register::R3,
            }
        );
    }

    #[test]
    fn c_field_keeps_exactly_the_opcode_width() {
        for entry in OPERATION_TABLE {
            let mask = entry.opcode.c_field_mask();
            let widest = i64::from(mask);

            let kept = encode_record(&SourceRecord::new(
                1,
                entry.name,
                &[(entry.b_field, 0), (entry.c_field, widest)],
            ))
            .expect("valid");
            assert!(kept.truncated.is_empty(), "{}", entry.name);
            assert_eq!(kept.instruction.fields(), (entry.opcode.as_u8(), 0, mask));

            let cut = encode_record(&SourceRecord::new(
                1,
                entry.name,
                &[(entry.b_field, 0), (entry.c_field, widest + 1)],
            ))
            .expect("masked, not rejected");
            assert_eq!(
                cut.truncated,
                vec![TruncatedField {
                    field: entry.c_field,
                    value: widest + 1,
                    kept: 0,
                }],
                "{}",
                entry.name
            );
        }
    }
}
