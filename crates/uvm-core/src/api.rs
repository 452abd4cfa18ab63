//! Host-facing configuration, machine state, and trace contracts.

use crate::{
    capture_dump, FaultCode, Instruction, Memory, Register, RegisterFile, RunState, StateDump,
    VmError, DEFAULT_MEMORY_SIZE,
};

/// Top-level configuration for one machine run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct VmConfig {
    /// Size in bytes of unified memory.
    pub memory_size: usize,
    /// Forwards [`TraceEvent`]s to the caller's sink when set.
    pub tracing_enabled: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            tracing_enabled: false,
        }
    }
}

/// Complete state of one machine: memory, registers, and control state.
///
/// Owned by exactly one run; independent runs use independent values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    /// Unified code + data memory.
    pub memory: Memory,
    /// General-purpose registers.
    pub registers: RegisterFile,
    /// Offset of the next instruction.
    pub pc: usize,
    /// Length of the loaded program; execution stops at this offset.
    pub code_size: usize,
    /// Current execution state.
    pub run_state: RunState,
}

impl MachineState {
    /// Loads `program` at address 0 of a fresh memory sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::ProgramTooLarge`] when the program does not fit, or
    /// [`VmError::MemoryTooLarge`] when `config.memory_size` cannot be allocated.
    pub fn load(program: &[u8], config: &VmConfig) -> Result<Self, VmError> {
        Ok(Self {
            memory: Memory::with_program(program, config.memory_size)?,
            registers: RegisterFile::default(),
            pc: 0,
            code_size: program.len(),
            run_state: RunState::Running,
        })
    }

    /// Zeroes registers and `PC` and clears any latched fault.
    ///
    /// Memory, including anything the program stored, is preserved.
    pub fn reset(&mut self) {
        self.registers = RegisterFile::default();
        self.pc = 0;
        self.run_state = RunState::Running;
    }

    /// Captures memory `[start, end]` and all registers.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::RangeOutOfBounds`] for an inverted range or one
    /// extending past the end of memory.
    pub fn dump(&self, start: usize, end: usize) -> Result<StateDump, VmError> {
        capture_dump(self.memory.as_slice(), &self.registers, start, end)
    }
}

/// Result of one fetch-decode-execute attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction executed.
    Retired {
        /// Offset of the executed instruction.
        pc: usize,
        /// Bytes consumed.
        width: usize,
    },
    /// The code region is exhausted.
    Halted,
    /// The run stopped on a fault.
    Fault {
        /// Error describing the fault.
        error: VmError,
    },
}

/// Summary of a run that reached the end of the code region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Number of retired instructions.
    pub steps: u64,
    /// `PC` at halt.
    pub final_pc: usize,
}

/// Observational events emitted during execution, in commit order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// An instruction was decoded and is about to execute.
    InstructionStart {
        /// Offset of the instruction.
        pc: usize,
        /// Decoded instruction.
        instruction: Instruction,
    },
    /// A data byte was read.
    MemoryRead {
        /// Address read.
        addr: u32,
        /// Byte value.
        value: u8,
    },
    /// A data byte was written.
    MemoryWrite {
        /// Address written.
        addr: u32,
        /// Byte value.
        value: u8,
    },
    /// A register was written.
    RegisterWrite {
        /// Register written.
        reg: Register,
        /// New value.
        value: u32,
    },
    /// An instruction retired.
    InstructionRetired {
        /// Offset of the instruction.
        pc: usize,
        /// Bytes consumed.
        width: usize,
    },
    /// Execution reached the end of the code region.
    Halted {
        /// `PC` at halt.
        pc: usize,
    },
    /// A fault stopped the run.
    FaultRaised {
        /// Fault tag.
        cause: FaultCode,
        /// `PC` of the faulting instruction.
        pc: usize,
    },
}

/// Sink trait for execution trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Sink that keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingTrace {
    /// Events in emission order.
    pub events: Vec<TraceEvent>,
}

impl TraceSink for RecordingTrace {
    fn on_event(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
