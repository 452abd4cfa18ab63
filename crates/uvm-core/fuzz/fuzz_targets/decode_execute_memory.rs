#![no_main]

use libfuzzer_sys::fuzz_target;
use uvm_core::{decode_word, run_program, validate_data_address, VmConfig};

fuzz_target!(|data: &[u8]| {
    let _ = decode_word(data);

    let config = VmConfig {
        memory_size: 1024,
        ..VmConfig::default()
    };
    if let Ok(state) = run_program(data, &config) {
        assert!(state.pc <= data.len());
        let _ = state.dump(0, data.len().saturating_sub(1));
    }

    if let [a, b, c, d, ..] = *data {
        let _ = validate_data_address(u32::from_le_bytes([a, b, c, d]), config.memory_size);
    }
});
