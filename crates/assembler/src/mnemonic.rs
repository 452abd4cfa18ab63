//! Operation-name resolution and the per-operation field mapping.

use uvm_core::Opcode;

/// How one source operation maps its named fields onto `B` and `C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationEntry {
    /// Canonical operation name.
    pub name: &'static str,
    /// Opcode placed in field `A`.
    pub opcode: Opcode,
    /// Source field encoded into `B`.
    pub b_field: &'static str,
    /// Source field encoded into `C`.
    pub c_field: &'static str,
}

/// Field mapping for every operation the assembler accepts.
pub const OPERATION_TABLE: &[OperationEntry] = &[
    OperationEntry {
        name: "LOAD_CONST",
        opcode: Opcode::LoadConst,
        b_field: "dst",
        c_field: "value",
    },
    OperationEntry {
        name: "LOAD",
        opcode: Opcode::Load,
        b_field: "dst",
        c_field: "addr_reg",
    },
    OperationEntry {
        name: "STORE",
        opcode: Opcode::Store,
        b_field: "src",
        c_field: "addr_reg",
    },
    OperationEntry {
        name: "ROR",
        opcode: Opcode::Ror,
        b_field: "dst",
        c_field: "mem_reg",
    },
];

/// Resolves an operation name to its table entry.
///
/// Matching is ASCII case-insensitive and ignores `_`, so `LoadConst`,
/// `load_const`, and `LOAD_CONST` all resolve alike.
#[must_use]
pub fn resolve_operation(name: &str) -> Option<&'static OperationEntry> {
    let wanted = normalize(name);
    if wanted.is_empty() {
        return None;
    }
    OPERATION_TABLE
        .iter()
        .find(|entry| normalize(entry.name) == wanted)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use uvm_core::{Opcode, OPCODE_TABLE};

    use super::{resolve_operation, OPERATION_TABLE};

    #[test]
    fn every_operation_resolves_to_itself() {
        for entry in OPERATION_TABLE {
            assert_eq!(resolve_operation(entry.name), Some(entry));
        }
    }

    #[test]
    fn lookup_ignores_case_and_underscores() {
        for name in ["LoadConst", "load_const", "LOADCONST", "Load_Const"] {
            assert_eq!(
                resolve_operation(name).map(|entry| entry.opcode),
                Some(Opcode::LoadConst),
                "{name}"
            );
        }
        assert_eq!(
            resolve_operation("ror").map(|entry| entry.opcode),
            Some(Opcode::Ror)
        );
    }

    #[test]
    fn unknown_operation_returns_none() {
        assert_eq!(resolve_operation("JUMP"), None);
        assert_eq!(resolve_operation(""), None);
        assert_eq!(resolve_operation("___"), None);
    }

    #[test]
    fn table_covers_every_assigned_opcode() {
        let mapped: HashSet<u8> = OPERATION_TABLE
            .iter()
            .map(|entry| entry.opcode.as_u8())
            .collect();
        let assigned: HashSet<u8> = OPCODE_TABLE.iter().map(|(a, _, _)| *a).collect();
        assert_eq!(mapped, assigned);
    }

    #[test]
    fn canonical_names_match_core_mnemonics() {
        for entry in OPERATION_TABLE {
            assert_eq!(entry.name, entry.opcode.mnemonic());
        }
    }
}
