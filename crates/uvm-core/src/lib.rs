//! Core virtual machine crate for the UVM instruction set.
//!
//! Holds the bit-level word codec, the logical instruction model, and an
//! execution engine over eight 32-bit registers and one byte-addressed
//! memory shared by code and data.

/// Opcode assignments and field layout constants.
pub mod encoding;
pub use encoding::{
    word_width_for, Opcode, WordWidth, B_FIELD_SHIFT, C_FIELD_SHIFT, IMMEDIATE_FIELD_BITS,
    IMMEDIATE_FIELD_MASK, OPCODE_MASK, OPCODE_TABLE, REGISTER_FIELD_MASK,
};

/// Bit-level word encode and decode.
pub mod codec;
pub use codec::{decode_word, encode_word, CodecError, DecodedWord, EncodedWord, MaskedFields};

/// Fault taxonomy and the error type for load, execute, and dump.
pub mod fault;
pub use fault::{FaultCode, VmError};

/// Architectural register and run state.
pub mod state;
pub use state::{Register, RegisterFile, RunState, GENERAL_REGISTER_COUNT};

/// Unified code + data memory.
pub mod memory;
pub use memory::{validate_data_address, Memory, DEFAULT_MEMORY_SIZE, MAX_MEMORY_SIZE};

pub mod instruction;
pub use instruction::Instruction;

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    MachineState, NullTrace, RecordingTrace, RunOutcome, StepOutcome, TraceEvent, TraceSink,
    VmConfig,
};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    execute_instruction, rotate_right_32, run, run_program, run_program_traced, step_one,
};

/// Memory and register snapshots.
pub mod dump;
pub use dump::{capture_dump, MemoryCell, RegisterEntry, StateDump};

#[cfg(test)]
use proptest as _;
