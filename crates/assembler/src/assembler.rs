//! Top-level assembler pipeline.
//!
//! Records are resolved and encoded in program order and the words are
//! concatenated with no padding. Assembly is all-or-nothing: the first
//! error aborts it and no binary is returned.

use std::fs;
use std::path::Path;

use uvm_core::Instruction;

use crate::encoder::encode_record;
use crate::errors::{
    AssembleError, AssembleErrorKind, AssembleWarning, AssembleWarningKind, SourceLocation,
};
use crate::source::{parse_program, SourceFormat, SourceRecord};

/// Result of assembly containing binary output and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleResult {
    /// Assembled binary bytes.
    pub binary: Vec<u8>,
    /// One entry per record, in program order.
    pub listing: Vec<ListingEntry>,
    /// Warnings generated during assembly.
    pub warnings: Vec<AssembleWarning>,
}

/// An entry in the offset-to-record listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// 1-based record index.
    pub record: usize,
    /// Byte offset of the word in the binary.
    pub offset: usize,
    /// Encoded `(A, B, C)` fields.
    pub fields: (u8, u8, u32),
    /// Word bytes.
    pub bytes: Vec<u8>,
    /// Resolved instruction.
    pub instruction: Instruction,
}

/// Assembles `records` into a binary program.
///
/// # Errors
///
/// Returns the first record that cannot be resolved.
pub fn assemble(records: &[SourceRecord]) -> Result<AssembleResult, AssembleError> {
    let mut binary = Vec::new();
    let mut listing = Vec::with_capacity(records.len());
    let mut warnings = Vec::new();

    for record in records {
        let encoded = encode_record(record)?;

        warnings.extend(encoded.truncated.iter().map(|field| AssembleWarning {
            kind: AssembleWarningKind::FieldTruncated {
                op: record.op.clone(),
                field: field.field,
                value: field.value,
                kept: field.kept,
            },
            location: SourceLocation::record(record.index),
        }));

        let word = encoded.instruction.encode();
        listing.push(ListingEntry {
            record: record.index,
            offset: binary.len(),
            fields: encoded.instruction.fields(),
            bytes: word.as_bytes().to_vec(),
            instruction: encoded.instruction,
        });
        binary.extend_from_slice(word.as_bytes());
    }

    Ok(AssembleResult {
        binary,
        listing,
        warnings,
    })
}

/// Encodes already-resolved instructions back to back.
#[must_use]
pub fn assemble_instructions(instructions: &[Instruction]) -> Vec<u8> {
    instructions
        .iter()
        .flat_map(|instruction| instruction.encode().as_bytes().to_vec())
        .collect()
}

/// Reads, parses, and assembles the program document at `path`.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not a valid program
/// document, or contains an unresolvable record. Every error and warning
/// carries the file path.
pub fn assemble_file(path: &Path) -> Result<AssembleResult, AssembleError> {
    let file = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| {
        AssembleError::new(AssembleErrorKind::Io(e.to_string())).with_file(file.clone())
    })?;
    let records = parse_program(&content, SourceFormat::from_path(path))
        .map_err(|e| AssembleError::from(e).with_file(file.clone()))?;

    let mut result = assemble(&records).map_err(|e| e.with_file(file.clone()))?;
    for warning in &mut result.warnings {
        warning.location.file = Some(file.clone());
    }
    Ok(result)
}
