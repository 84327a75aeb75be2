#![doc = r#"
Meta-event types.

Meta events are non-audio annotations embedded in a track: names,
markers, tempo and signature changes, and the mandatory end-of-track
marker. The discriminants are the wire values of the meta-type byte that
follows an `0xFF` status. Types outside this set are tolerated by the
decoder and skipped.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The known meta-event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MetaKind {
    /// Sequence number, a 16-bit value.
    SequenceNumber = 0x00,
    /// Free text.
    Text = 0x01,
    /// Copyright notice.
    CopyrightNotice = 0x02,
    /// Sequence or track name.
    SequenceOrTrackName = 0x03,
    /// Instrument name.
    InstrumentName = 0x04,
    /// Lyrics.
    Lyrics = 0x05,
    /// Rehearsal marker.
    Marker = 0x06,
    /// Cue point.
    CuePoint = 0x07,
    /// The following meta events apply to the given channel.
    ChannelPrefix = 0x20,
    /// Terminates a track; never materialized as an event.
    EndOfTrack = 0x2F,
    /// Tempo in microseconds per quarter note (24-bit on the wire).
    SetTempo = 0x51,
    /// SMPTE starting offset, five bytes.
    SmpteOffset = 0x54,
    /// Time signature: numerator, log2 denominator, metronome clicks,
    /// thirty-seconds per 24 clock signals.
    TimeSignature = 0x58,
    /// Key signature: signed sharps/flats count, major/minor flag.
    KeySignature = 0x59,
    /// Sequencer-specific opaque data.
    SequencerSpecific = 0x7F,
}

impl MetaKind {
    /// True for the eight subtypes whose payload is free-form bytes of
    /// the declared length, copied verbatim.
    pub const fn is_data(&self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::CopyrightNotice
                | Self::SequenceOrTrackName
                | Self::InstrumentName
                | Self::Lyrics
                | Self::Marker
                | Self::CuePoint
                | Self::SequencerSpecific
        )
    }
}
