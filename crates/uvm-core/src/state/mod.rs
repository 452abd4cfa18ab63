//! Architectural machine state primitives.

/// Register identifiers and the register file.
pub mod registers;

pub use registers::{Register, RegisterFile, GENERAL_REGISTER_COUNT};

use crate::VmError;

/// Execution state of a loaded machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the instruction at `PC`.
    #[default]
    Running,
    /// The code region is exhausted.
    Halted,
    /// A fault stopped the run; the state must not be resumed.
    FaultLatched(VmError),
}

impl RunState {
    /// Returns the latched fault, if any.
    #[must_use]
    pub const fn latched_fault(&self) -> Option<&VmError> {
        match self {
            Self::FaultLatched(error) => Some(error),
            Self::Running | Self::Halted => None,
        }
    }

    /// Returns `true` once no further instruction can execute.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        !matches!(self, Self::Running)
    }
}
