#![doc = r#"
Variable-length quantities.

MIDI encodes delta times and chunk-internal lengths as big-endian
integers of up to four bytes, seven payload bits per byte, with the top
bit of each byte signalling that another byte follows. Four bytes give
28 significant bits; a fourth byte that still carries a continuation bit
makes the chunk invalid.
"#]

use crate::error::ChunkError;
use crate::reader::{ReadResult, ReadSession};
use crate::stream::MidiStream;

/// The largest value a variable-length quantity can carry.
pub const MAX: u32 = 0x0FFF_FFFF;

/// Decode a variable-length quantity from the parse session.
///
/// Fails with [`ChunkError::VlqTooLong`] if the fourth byte still has
/// its continuation bit set, or with an unexpected-end error if the
/// stream runs dry.
pub(crate) fn read<S: MidiStream>(session: &mut ReadSession<'_, S>) -> ReadResult<u32> {
    let mut value = 0u32;
    for i in 0..4 {
        let byte = session.read_u8()?;
        let keep_going = byte & 0x80 != 0;
        if keep_going && i == 3 {
            return Err(session.chunk_error(ChunkError::VlqTooLong));
        }
        value = (value << 7) | u32::from(byte & 0x7F);
        if !keep_going {
            break;
        }
    }
    Ok(value)
}

/// Encode `value` as a variable-length quantity, most significant
/// seven-bit group first, continuation bit set on every byte but the
/// last. Returns the buffer and the number of bytes used.
///
/// `value` must not exceed [`MAX`].
pub fn encode(value: u32) -> ([u8; 4], usize) {
    debug_assert!(value <= MAX);
    let mut buf = [0u8; 4];
    let mut len = 1;
    let mut rest = value >> 7;
    while rest != 0 {
        len += 1;
        rest >>= 7;
    }
    let mut v = value;
    for i in (0..len).rev() {
        buf[i] = (v & 0x7F) as u8;
        v >>= 7;
    }
    for byte in buf.iter_mut().take(len - 1) {
        *byte |= 0x80;
    }
    (buf, len)
}
