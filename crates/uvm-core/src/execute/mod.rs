//! Fetch-decode-execute loop.
//!
//! Each step decodes one word at `PC`, bounded by the code region, executes
//! it against registers and unified memory, and advances `PC` by the word
//! width. Memory addresses are validated before any register or memory
//! write, so a faulting instruction leaves no partial side effects.
//!
//! `PC` only grows and is bounded by `code_size`, which guarantees
//! termination as long as the instruction set has no control flow.

mod helpers;

pub use helpers::rotate_right_32;

use crate::api::{MachineState, NullTrace, RunOutcome, StepOutcome, TraceEvent, TraceSink, VmConfig};
use crate::codec::{decode_word, CodecError, DecodedWord};
use crate::{Instruction, Register, RunState, VmError};

/// Executes one instruction at `PC`.
///
/// A halted or fault-latched state is reported again without executing
/// anything.
pub fn step_one(state: &mut MachineState, sink: &mut dyn TraceSink) -> StepOutcome {
    match &state.run_state {
        RunState::FaultLatched(error) => {
            return StepOutcome::Fault {
                error: error.clone(),
            };
        }
        RunState::Halted => return StepOutcome::Halted,
        RunState::Running => {}
    }

    let pc = state.pc;
    let word = match fetch_and_decode(state.memory.as_slice(), pc, state.code_size) {
        Ok(Some(word)) => word,
        Ok(None) => {
            state.run_state = RunState::Halted;
            sink.on_event(TraceEvent::Halted { pc });
            return StepOutcome::Halted;
        }
        Err(error) => return latch_fault(state, sink, error),
    };

    let instruction = match Instruction::try_from(word) {
        Ok(instruction) => instruction,
        Err(opcode) => return latch_fault(state, sink, VmError::UnknownOpcode { opcode, pc }),
    };

    sink.on_event(TraceEvent::InstructionStart { pc, instruction });

    if let Err(error) = execute_instruction(&instruction, state, sink) {
        return latch_fault(state, sink, error);
    }

    let width = word.width.bytes();
    state.pc = pc + width;
    sink.on_event(TraceEvent::InstructionRetired { pc, width });

    StepOutcome::Retired { pc, width }
}

/// Steps until the code region is exhausted or a fault occurs.
///
/// On a fault the state keeps whatever the faulting run left behind and
/// stays latched; it is inspectable but must not be resumed.
///
/// # Errors
///
/// Returns the fault that stopped execution.
pub fn run(state: &mut MachineState, sink: &mut dyn TraceSink) -> Result<RunOutcome, VmError> {
    let mut steps = 0_u64;
    loop {
        match step_one(state, sink) {
            StepOutcome::Retired { .. } => steps += 1,
            StepOutcome::Halted => {
                return Ok(RunOutcome {
                    steps,
                    final_pc: state.pc,
                })
            }
            StepOutcome::Fault { error } => return Err(error),
        }
    }
}

/// Loads `program` and runs it to completion.
///
/// # Errors
///
/// Returns [`VmError::ProgramTooLarge`] or [`VmError::MemoryTooLarge`] before
/// execution, or the execution fault that aborted the run.
pub fn run_program(program: &[u8], config: &VmConfig) -> Result<MachineState, VmError> {
    run_program_traced(program, config, &mut NullTrace)
}

/// Loads and runs `program`, forwarding trace events to `sink` when
/// `config.tracing_enabled` is set.
///
/// # Errors
///
/// Same as [`run_program`].
pub fn run_program_traced(
    program: &[u8],
    config: &VmConfig,
    sink: &mut dyn TraceSink,
) -> Result<MachineState, VmError> {
    let mut state = MachineState::load(program, config)?;
    if config.tracing_enabled {
        run(&mut state, sink)?;
    } else {
        run(&mut state, &mut NullTrace)?;
    }
    Ok(state)
}

/// Applies one decoded instruction to registers and memory.
///
/// `PC` is not touched.
///
/// # Errors
///
/// Returns [`VmError::MemoryOutOfRange`] when the address register of a
/// `LOAD`, `STORE`, or `ROR` points outside memory. Nothing is written in
/// that case.
pub fn execute_instruction(
    instruction: &Instruction,
    state: &mut MachineState,
    sink: &mut dyn TraceSink,
) -> Result<(), VmError> {
    match *instruction {
        Instruction::LoadConst { dst, value } => {
            write_register(state, sink, dst, value);
        }
        Instruction::Load { dst, addr_reg } => {
            let addr = state.registers.get(addr_reg);
            let value = read_memory(state, sink, addr)?;
            write_register(state, sink, dst, u32::from(value));
        }
        Instruction::Store { src, addr_reg } => {
            let addr = state.registers.get(addr_reg);
            let [value, ..] = state.registers.get(src).to_le_bytes();
            state.memory.write_byte(addr, value)?;
            sink.on_event(TraceEvent::MemoryWrite { addr, value });
        }
        Instruction::Ror { dst, mem_reg } => {
            let addr = state.registers.get(mem_reg);
            let shift = read_memory(state, sink, addr)?;
            let rotated = rotate_right_32(state.registers.get(dst), u32::from(shift));
            write_register(state, sink, dst, rotated);
        }
    }

    Ok(())
}

fn read_memory(
    state: &MachineState,
    sink: &mut dyn TraceSink,
    addr: u32,
) -> Result<u8, VmError> {
    let value = state.memory.read_byte(addr)?;
    sink.on_event(TraceEvent::MemoryRead { addr, value });
    Ok(value)
}

fn write_register(
    state: &mut MachineState,
    sink: &mut dyn TraceSink,
    reg: Register,
    value: u32,
) {
    state.registers.set(reg, value);
    sink.on_event(TraceEvent::RegisterWrite { reg, value });
}

fn latch_fault(state: &mut MachineState, sink: &mut dyn TraceSink, error: VmError) -> StepOutcome {
    sink.on_event(TraceEvent::FaultRaised {
        cause: error.code(),
        pc: state.pc,
    });
    state.run_state = RunState::FaultLatched(error.clone());
    StepOutcome::Fault { error }
}

fn fetch_and_decode(
    memory: &[u8],
    pc: usize,
    code_size: usize,
) -> Result<Option<DecodedWord>, VmError> {
    let end = code_size.min(memory.len());
    let window = memory.get(pc..end).unwrap_or_default();

    decode_word(window).map_err(|error| match error {
        CodecError::Truncated { opcode, available } => VmError::TruncatedInstruction {
            pc,
            opcode,
            available,
        },
    })
}
