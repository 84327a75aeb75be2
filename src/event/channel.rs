#![doc = r#"
Channel message kinds and pitch-bend packing.

A channel event's status byte carries the message kind in its high
nibble and the channel number (0–15) in its low nibble. The kind
determines how many data bytes follow: two for everything except
program change and channel aftertouch, which take one.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Center position of the pitch-bend range: no pitch change.
pub const PITCH_BEND_CENTER: u16 = 8192;

/// The channel-message kinds, with their status-nibble values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum ChannelMessage {
    /// Key released: key number, release velocity.
    NoteOff = 0x8,
    /// Key pressed: key number, velocity.
    NoteOn = 0x9,
    /// Per-key pressure change: key number, pressure.
    PolyphonicAftertouch = 0xA,
    /// Controller change: controller number, value.
    Controller = 0xB,
    /// Program (patch) change: program number.
    ProgramChange = 0xC,
    /// Channel-wide pressure change: pressure.
    ChannelAftertouch = 0xD,
    /// Pitch wheel move: two 7-bit bytes forming a 14-bit amount.
    PitchBend = 0xE,
}

impl ChannelMessage {
    /// Number of data bytes this message carries on the wire.
    pub const fn data_len(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelAftertouch => 1,
            _ => 2,
        }
    }
}

/// Pack the two 7-bit pitch-bend data bytes into a 14-bit amount.
///
/// The first wire byte supplies the low seven bits, the second the high
/// seven. The result is in `0..=16383`, where [`PITCH_BEND_CENTER`]
/// leaves the pitch unchanged, lower values decrease it and higher
/// values increase it.
pub const fn pack_pitch_bend(first: u8, second: u8) -> u16 {
    (((second & 0x7F) as u16) << 7) | (first & 0x7F) as u16
}

/// Split a 14-bit pitch-bend amount back into its two wire bytes,
/// low seven bits first.
pub const fn unpack_pitch_bend(value: u16) -> (u8, u8) {
    ((value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pitch_bend_round_trips_the_entire_range() {
        for value in 0..=16383u16 {
            let (first, second) = unpack_pitch_bend(value);
            assert!(first <= 0x7F && second <= 0x7F);
            assert_eq!(pack_pitch_bend(first, second), value);
        }
    }

    #[test]
    fn center_is_a_cleared_low_byte() {
        assert_eq!(pack_pitch_bend(0x00, 0x40), PITCH_BEND_CENTER);
        assert_eq!(unpack_pitch_bend(PITCH_BEND_CENTER), (0x00, 0x40));
    }

    #[test]
    fn status_nibbles_map_to_kinds() {
        assert_eq!(ChannelMessage::try_from(0x8).unwrap(), ChannelMessage::NoteOff);
        assert_eq!(ChannelMessage::try_from(0xE).unwrap(), ChannelMessage::PitchBend);
        assert!(ChannelMessage::try_from(0x7).is_err());
        assert!(ChannelMessage::try_from(0xF).is_err());
    }

    #[test]
    fn data_lengths() {
        assert_eq!(ChannelMessage::ProgramChange.data_len(), 1);
        assert_eq!(ChannelMessage::ChannelAftertouch.data_len(), 1);
        assert_eq!(ChannelMessage::NoteOn.data_len(), 2);
        assert_eq!(ChannelMessage::PitchBend.data_len(), 2);
    }
}
