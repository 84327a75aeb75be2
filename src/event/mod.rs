#![doc = r#"
The decoded event record and its payload storage.

An [`Event`] is one time-stamped unit on a track: a channel message, a
meta annotation or a system-exclusive fragment. Events are owned by a
[`MidiDocument`](crate::file::MidiDocument) arena and addressed through
stable [`EventId`] handles; the intrusive `previous`/`next` links that
form each track's list are handles too, so removal and insertion are
index rewiring with no dangling pointers.

Payloads of two bytes or fewer — the overwhelming majority of channel
messages — are stored inline in the record and never touch the heap.
The representation is an explicit tag, not a pointer comparison.
"#]

mod channel;
pub use channel::*;

mod meta;
pub use meta::*;

/// Stable handle to an event inside a document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub(crate) u32);

/// Payload bytes of an event.
///
/// The tag decides the storage: `Inline` for payloads of at most two
/// bytes, `Owned` for anything larger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Up to two bytes embedded in the event record.
    Inline {
        /// The embedded buffer.
        buf: [u8; 2],
        /// How many of the buffer's bytes are in use.
        len: u8,
    },
    /// A separately allocated buffer for larger payloads.
    Owned(Vec<u8>),
}

impl Payload {
    /// An empty inline payload.
    pub(crate) const fn empty() -> Self {
        Self::Inline { buf: [0; 2], len: 0 }
    }

    /// Copy `data`, choosing inline storage when it fits.
    pub(crate) fn from_bytes(data: &[u8]) -> Self {
        match *data {
            [] => Self::empty(),
            [a] => Self::Inline { buf: [a, 0], len: 1 },
            [a, b] => Self::Inline { buf: [a, b], len: 2 },
            _ => Self::Owned(data.to_vec()),
        }
    }

    /// Take ownership of an already-read buffer, demoting it to inline
    /// storage when it is short enough.
    pub(crate) fn from_vec(data: Vec<u8>) -> Self {
        if data.len() <= 2 {
            Self::from_bytes(&data)
        } else {
            Self::Owned(data)
        }
    }

    /// The payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Inline { buf, len } => &buf[..usize::from(*len)],
            Self::Owned(data) => data,
        }
    }

    /// Number of payload bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Inline { len, .. } => usize::from(*len),
            Self::Owned(data) => data.len(),
        }
    }

    /// True if the payload has no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the bytes live in the record itself.
    pub const fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

/// What kind of event this is, with the kind-specific fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A channel voice message.
    Channel {
        /// The message kind from the status byte's high nibble.
        message: ChannelMessage,
        /// The channel (0–15) from the status byte's low nibble.
        channel: u8,
    },
    /// A meta annotation.
    Meta(MetaKind),
    /// A system-exclusive fragment.
    Sysex {
        /// False only for a non-final fragment of a message split
        /// across several events.
        end_of_sysex: bool,
    },
}

/// A decoded MIDI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub(crate) track: Option<u16>,
    pub(crate) time: u32,
    pub(crate) kind: EventKind,
    pub(crate) payload: Payload,
    pub(crate) previous: Option<EventId>,
    pub(crate) next: Option<EventId>,
}

impl Event {
    pub(crate) fn new(kind: EventKind, payload: Payload) -> Self {
        Self {
            track: None,
            time: 0,
            kind,
            payload,
            previous: None,
            next: None,
        }
    }

    /// The track this event is attached to, if any. Set exactly once,
    /// when the event is attached.
    pub fn track(&self) -> Option<u16> {
        self.track
    }

    /// Delta ticks since the previous event on the track (or since the
    /// track start if this is the first event).
    pub fn time(&self) -> u32 {
        self.time
    }

    /// The event kind and its kind-specific fields.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The raw payload bytes.
    pub fn data(&self) -> &[u8] {
        self.payload.as_bytes()
    }

    /// The payload storage itself, tag included.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Handle of the previous event on the track.
    pub fn previous(&self) -> Option<EventId> {
        self.previous
    }

    /// Handle of the next event on the track.
    pub fn next(&self) -> Option<EventId> {
        self.next
    }

    /// The channel this event applies to: the status-byte channel for
    /// channel events, the referenced channel for the channel-prefix
    /// meta event, `None` otherwise.
    pub fn channel(&self) -> Option<u8> {
        match self.kind {
            EventKind::Channel { channel, .. } => Some(channel),
            EventKind::Meta(MetaKind::ChannelPrefix) => self.data().first().copied(),
            _ => None,
        }
    }

    /// The 14-bit pitch-bend amount, for pitch-bend events.
    ///
    /// `0..=16383`, where [`PITCH_BEND_CENTER`] means no change.
    pub fn pitch_bend(&self) -> Option<u16> {
        match self.kind {
            EventKind::Channel {
                message: ChannelMessage::PitchBend,
                ..
            } => self.native_u16(),
            _ => None,
        }
    }

    /// The sequence number, for sequence-number meta events.
    pub fn sequence_number(&self) -> Option<u16> {
        match self.kind {
            EventKind::Meta(MetaKind::SequenceNumber) => self.native_u16(),
            _ => None,
        }
    }

    /// Microseconds per quarter note, for tempo meta events.
    pub fn tempo(&self) -> Option<u32> {
        match self.kind {
            EventKind::Meta(MetaKind::SetTempo) => {
                let bytes: [u8; 4] = self.data().try_into().ok()?;
                Some(u32::from_ne_bytes(bytes))
            }
            _ => None,
        }
    }

    /// Time-signature fields: numerator, log2 denominator, metronome
    /// clicks per quarter note (of 24 clock signals), thirty-seconds
    /// per 24 clock signals.
    pub fn time_signature(&self) -> Option<(u8, u8, u8, u8)> {
        match self.kind {
            EventKind::Meta(MetaKind::TimeSignature) => match *self.data() {
                [n, d, m, t] => Some((n, d, m, t)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Key-signature fields: signed sharps/flats count (negative for
    /// flats, zero for C) and the scale byte (0 major, 1 minor).
    pub fn key_signature(&self) -> Option<(i8, u8)> {
        match self.kind {
            EventKind::Meta(MetaKind::KeySignature) => match *self.data() {
                [key, scale] => Some((key as i8, scale)),
                _ => None,
            },
            _ => None,
        }
    }

    /// True unless this is a non-final fragment of a split
    /// system-exclusive message. `None` for non-sysex events.
    pub fn end_of_sysex(&self) -> Option<bool> {
        match self.kind {
            EventKind::Sysex { end_of_sysex } => Some(end_of_sysex),
            _ => None,
        }
    }

    fn native_u16(&self) -> Option<u16> {
        let bytes: [u8; 2] = self.data().try_into().ok()?;
        Some(u16::from_ne_bytes(bytes))
    }
}
