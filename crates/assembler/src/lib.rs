//! Assembler library for the UVM instruction set.
//!
//! Turns a YAML or JSON program document into the packed little-endian word
//! stream that `uvm-core` executes.

/// Top-level assembler pipeline.
pub mod assembler;
/// Record-to-instruction encoding.
pub mod encoder;
/// Structured assembly error and warning types.
pub mod errors;
/// Operation-name resolution against the core opcode table.
pub mod mnemonic;
/// Program document loading.
pub mod source;

pub use assembler::{assemble, assemble_file, assemble_instructions, AssembleResult, ListingEntry};
pub use errors::{AssembleError, AssembleErrorKind, AssembleWarning, SourceLocation};
pub use source::{parse_program, SourceFormat, SourceRecord};
