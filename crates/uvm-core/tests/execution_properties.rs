//! Property coverage for the word codec and the execution engine.

#![allow(clippy::pedantic, clippy::nursery)]

use proptest::prelude::*;
use uvm_core::{
    decode_word, encode_word, rotate_right_32, run_program, Instruction, Register, VmConfig,
    VmError, IMMEDIATE_FIELD_MASK, OPCODE_TABLE,
};
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn register() -> impl Strategy<Value = Register> {
    (0u8..8).prop_map(|bits| Register::from_u3(bits).expect("three bits"))
}

fn instruction() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        (register(), 0..=IMMEDIATE_FIELD_MASK)
            .prop_map(|(dst, value)| Instruction::LoadConst { dst, value }),
        (register(), register()).prop_map(|(dst, addr_reg)| Instruction::Load { dst, addr_reg }),
        (register(), register()).prop_map(|(src, addr_reg)| Instruction::Store { src, addr_reg }),
        (register(), register()).prop_map(|(dst, mem_reg)| Instruction::Ror { dst, mem_reg }),
    ]
}

proptest! {
    #[test]
    fn assigned_opcodes_roundtrip_through_codec(
        index in 0..OPCODE_TABLE.len(),
        b in 0u32..8,
        c in any::<u32>(),
    ) {
        let (a, _, width) = OPCODE_TABLE[index];
        let c = c & width.c_field_mask();

        let encoded = encode_word(a, b, c);
        prop_assert_eq!(encoded.as_bytes().len(), width.bytes());

        let decoded = decode_word(encoded.as_bytes())
            .expect("complete")
            .expect("present");
        prop_assert_eq!(decoded.opcode, a);
        prop_assert_eq!(u32::from(decoded.b), b);
        prop_assert_eq!(decoded.c, c);
    }

    #[test]
    fn instruction_roundtrips_through_bytes(instruction in instruction()) {
        let decoded = decode_word(instruction.encode().as_bytes())
            .expect("complete")
            .expect("present");
        prop_assert_eq!(Instruction::try_from(decoded), Ok(instruction));
    }

    #[test]
    fn decode_never_panics_on_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..8)) {
        match decode_word(&bytes) {
            Ok(Some(word)) => prop_assert!(word.width.bytes() <= bytes.len()),
            Ok(None) => prop_assert!(bytes.len() < 2),
            Err(_) => prop_assert!(bytes.len() < 4),
        }
    }

    #[test]
    fn rotate_by_zero_is_identity_and_thirty_two_wraps(value in any::<u32>(), shift in any::<u32>()) {
        prop_assert_eq!(rotate_right_32(value, 0), value);
        prop_assert_eq!(rotate_right_32(value, shift), rotate_right_32(value, shift % 32));
        prop_assert_eq!(rotate_right_32(value, shift.wrapping_add(32)), rotate_right_32(value, shift));
    }

    #[test]
    fn arbitrary_programs_terminate_deterministically(
        program in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let config = VmConfig {
            memory_size: 256,
            ..VmConfig::default()
        };

        let first = run_program(&program, &config);
        let second = run_program(&program, &config);
        prop_assert_eq!(&first, &second);

        if let Ok(state) = first {
            prop_assert!(state.pc <= program.len());
            prop_assert!(program.len() - state.pc < 2);
        }
    }

    #[test]
    fn memory_faults_report_the_register_address(addr in 256u32..=IMMEDIATE_FIELD_MASK) {
        let program: Vec<u8> = [
            Instruction::LoadConst { dst: Register::R1, value: addr },
            Instruction::Load { dst: Register::R2, addr_reg: Register::R1 },
        ]
        .iter()
        .flat_map(|instruction| instruction.encode().as_bytes().to_vec())
        .collect();
        let config = VmConfig {
            memory_size: 256,
            ..VmConfig::default()
        };

        prop_assert_eq!(
            run_program(&program, &config),
            Err(VmError::MemoryOutOfRange { addr, size: 256 })
        );
    }
}
