//! Helper functions for instruction execution.

/// Rotates `value` right by `shift mod 32` bits.
///
/// A shift of zero, or any multiple of 32, returns `value` unchanged.
#[must_use]
pub const fn rotate_right_32(value: u32, shift: u32) -> u32 {
    let shift = shift % 32;
    if shift == 0 {
        value
    } else {
        (value >> shift) | (value << (32 - shift))
    }
}
