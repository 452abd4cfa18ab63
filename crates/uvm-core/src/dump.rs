//! Post-run snapshot of a memory range and the register file.

use crate::{RegisterFile, VmError};

/// One captured memory byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemoryCell {
    /// Byte address.
    pub addr: usize,
    /// Byte value.
    pub value: u8,
}

/// One captured register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterEntry {
    /// Register index, 0 through 7.
    pub index: u8,
    /// Register value.
    pub value: u32,
}

/// Format-neutral dump of `memory[start..=end]` and all registers.
///
/// Cells are in ascending address order and registers in ascending index
/// order; renderers only choose the surface syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct StateDump {
    /// First captured address.
    pub start: usize,
    /// Last captured address (inclusive).
    pub end: usize,
    /// `end - start + 1` cells.
    pub cells: Vec<MemoryCell>,
    /// Eight register entries.
    pub registers: Vec<RegisterEntry>,
}

/// Captures the inclusive range `[start, end]` of `memory` together with
/// every register.
///
/// # Errors
///
/// Returns [`VmError::RangeOutOfBounds`] when `start > end` or
/// `end >= memory.len()`.
pub fn capture_dump(
    memory: &[u8],
    registers: &RegisterFile,
    start: usize,
    end: usize,
) -> Result<StateDump, VmError> {
    let out_of_bounds = || VmError::RangeOutOfBounds {
        start,
        end,
        size: memory.len(),
    };

    if start > end {
        return Err(out_of_bounds());
    }
    let window = memory.get(start..=end).ok_or_else(out_of_bounds)?;

    let cells = window
        .iter()
        .zip(start..)
        .map(|(&value, addr)| MemoryCell { addr, value })
        .collect();

    let registers = registers
        .iter()
        .map(|(reg, value)| RegisterEntry {
            index: reg.as_u8(),
            value,
        })
        .collect();

    Ok(StateDump {
        start,
        end,
        cells,
        registers,
    })
}

#[cfg(test)]
mod tests {
    use super::{capture_dump, MemoryCell, RegisterEntry};
    use crate::{Register, RegisterFile, VmError};
    use rstest::rstest;

    fn memory() -> Vec<u8> {
        (0u8..16).collect()
    }

    #[test]
    fn captures_inclusive_range_and_all_registers() {
        let mut registers = RegisterFile::default();
        registers.set(Register::R3, 0xDEAD_BEEF);

        let dump = capture_dump(&memory(), &registers, 4, 6).expect("in range");

        assert_eq!(
            dump.cells,
            vec![
                MemoryCell { addr: 4, value: 4 },
                MemoryCell { addr: 5, value: 5 },
                MemoryCell { addr: 6, value: 6 },
            ]
        );
        assert_eq!(dump.registers.len(), 8);
        assert_eq!(
            dump.registers[3],
            RegisterEntry {
                index: 3,
                value: 0xDEAD_BEEF,
            }
        );
        assert!(dump
            .registers
            .iter()
            .enumerate()
            .all(|(i, entry)| usize::from(entry.index) == i));
    }

    #[test]
    fn single_cell_range_is_allowed() {
        let dump = capture_dump(&memory(), &RegisterFile::default(), 15, 15).expect("last byte");
        assert_eq!(dump.cells, vec![MemoryCell { addr: 15, value: 15 }]);
    }

    #[rstest]
    #[case(0, 16)]
    #[case(5, 4)]
    #[case(100, 200)]
    fn rejects_inverted_or_overlong_ranges(#[case] start: usize, #[case] end: usize) {
        assert_eq!(
            capture_dump(&memory(), &RegisterFile::default(), start, end),
            Err(VmError::RangeOutOfBounds {
                start,
                end,
                size: 16,
            })
        );
    }

    #[test]
    fn max_end_does_not_overflow() {
        assert!(capture_dump(&memory(), &RegisterFile::default(), 0, usize::MAX).is_err());
    }
}
