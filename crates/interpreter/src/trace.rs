//! Human-readable execution tracing.

use uvm_core::{TraceEvent, TraceSink};

/// Trace sink that prints one line per event to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrTrace;

impl TraceSink for StderrTrace {
    fn on_event(&mut self, event: TraceEvent) {
        eprintln!("{}", format_event(&event));
    }
}

/// Formats one trace event as a single line.
#[must_use]
pub fn format_event(event: &TraceEvent) -> String {
    match event {
        TraceEvent::InstructionStart { pc, instruction } => {
            format!("trace: [{pc:04X}] {instruction}")
        }
        TraceEvent::MemoryRead { addr, value } => {
            format!("trace:        mem[{addr}] -> {value}")
        }
        TraceEvent::MemoryWrite { addr, value } => {
            format!("trace:        mem[{addr}] <- {value}")
        }
        TraceEvent::RegisterWrite { reg, value } => {
            format!("trace:        {reg} <- {value:#010X}")
        }
        TraceEvent::InstructionRetired { pc, width } => {
            format!("trace: [{pc:04X}] retired ({width} bytes)")
        }
        TraceEvent::Halted { pc } => format!("trace: halted at {pc:04X}"),
        TraceEvent::FaultRaised { cause, pc } => {
            format!("trace: fault {cause} at {pc:04X}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_event;
    use uvm_core::{FaultCode, Instruction, Register, TraceEvent};

    #[test]
    fn instruction_start_shows_pc_and_disassembly() {
        let line = format_event(&TraceEvent::InstructionStart {
            pc: 4,
            instruction: Instruction::Load {
                dst: Register::R6,
                addr_reg: Register::R0,
            },
        });
        assert_eq!(line, "trace: [0004] LOAD r6, [r0]");
    }

    #[test]
    fn register_write_is_hex() {
        let line = format_event(&TraceEvent::RegisterWrite {
            reg: Register::R5,
            value: 748,
        });
        assert!(line.ends_with("r5 <- 0x000002EC"));
    }

    #[test]
    fn fault_names_its_code() {
        let line = format_event(&TraceEvent::FaultRaised {
            cause: FaultCode::MemoryOutOfRange,
            pc: 8,
        });
        assert_eq!(line, "trace: fault MemoryOutOfRange at 0008");
    }
}
