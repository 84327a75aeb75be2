#![doc = r#"
Bit-range extraction and byte-order helpers.

MIDI files store every multi-byte integer big-endian, and several header
fields pack independent values into single words (the time-division word,
the status byte's nibbles). These helpers are pure functions; the reader
converts wire integers with `from_be_bytes` at the point of use, so no
runtime endianness state exists anywhere in the crate.
"#]

/// True if the host stores integers least-significant byte first.
pub const fn host_is_little_endian() -> bool {
    cfg!(target_endian = "little")
}

/// Extract the inclusive bit range `[a, b]` from an 8-bit value.
///
/// Bits are numbered 1 (most significant) through 8 (least significant),
/// and the extracted range is right-aligned in the result.
pub const fn extract_bits_8(value: u8, a: u32, b: u32) -> u8 {
    debug_assert!(a <= b);
    debug_assert!(a >= 1 && b <= 8);
    (value << (a - 1)) >> (7 - (b - a))
}

/// Extract the inclusive bit range `[a, b]` from a 16-bit value.
///
/// Same numbering as [`extract_bits_8`]: 1 is the most significant bit,
/// 16 the least significant.
pub const fn extract_bits_16(value: u16, a: u32, b: u32) -> u16 {
    debug_assert!(a <= b);
    debug_assert!(a >= 1 && b <= 16);
    (value << (a - 1)) >> (15 - (b - a))
}

/// Extract the inclusive bit range `[a, b]` from a 32-bit value.
pub const fn extract_bits_32(value: u32, a: u32, b: u32) -> u32 {
    debug_assert!(a <= b);
    debug_assert!(a >= 1 && b <= 32);
    (value << (a - 1)) >> (31 - (b - a))
}

/// Reverse the byte order of a 16-bit integer.
pub const fn swap_u16(x: u16) -> u16 {
    ((x & 0x00FF) << 8) | ((x & 0xFF00) >> 8)
}

/// Reverse the byte order of a 32-bit integer.
pub const fn swap_u32(x: u32) -> u32 {
    let x = ((x & 0x0000_FFFF) << 16) | ((x & 0xFFFF_0000) >> 16);
    ((x & 0x00FF_00FF) << 8) | ((x & 0xFF00_FF00) >> 8)
}
