#![doc = r#"
Error kinds shared across the crate.

Decode errors are wrapped with the byte position at which they occurred by
[`ReadError`](crate::reader::ReadError); the kinds below describe what
went wrong. [`EventError`] is returned synchronously by the track
mutation API and never leaves the document in a modified state.
"#]

use thiserror::Error;

/// A malformed chunk encountered while decoding track data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The chunk did not start with the `MTrk` magic.
    #[error("expected an MTrk chunk")]
    BadTrackMagic,
    /// The track chunk declared a length of zero.
    #[error("track chunk declares a length of zero")]
    EmptyTrack,
    /// A variable-length quantity ran past its four-byte limit.
    #[error("variable-length quantity exceeds four bytes")]
    VlqTooLong,
    /// A status byte carried a channel-message nibble outside the
    /// defined set. Also produced when running status is consulted
    /// before any status byte has been seen on the track.
    #[error("unknown channel status nibble {0:#x}")]
    UnknownChannelStatus(u8),
}

/// A structural violation in the header chunk. Any of these mean the
/// stream is not a usable Standard MIDI File.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The file did not start with the `MThd` magic.
    #[error("not a standard MIDI file")]
    BadMagic,
    /// The header chunk must declare exactly six bytes of data.
    #[error("header chunk declares {0} bytes (expected 6)")]
    BadLength(u32),
    /// The format word was not 0, 1 or 2.
    #[error("unknown file format {0}")]
    BadFormat(u16),
    /// The file declared zero tracks.
    #[error("file declares no tracks")]
    NoTracks,
    /// The SMPTE frame-rate code was not 24, 25, 29 or 30.
    #[error("unsupported SMPTE frame rate {0}")]
    BadFrameRate(u8),
    /// Metrical time division with zero ticks per beat.
    #[error("ticks per beat must be nonzero")]
    ZeroTicksPerBeat,
    /// SMPTE time division with zero ticks per frame.
    #[error("ticks per frame must be nonzero")]
    ZeroTicksPerFrame,
}

/// Misuse of the event factory or track mutation API.
///
/// These are reported to the caller without touching the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventError {
    /// The event is already attached to a track and is owned by the
    /// document; it cannot be attached again or discarded directly.
    #[error("event is already attached to a track")]
    AlreadyAdded,
    /// Removal was requested for an event that is not attached to any
    /// track.
    #[error("event has not been attached to a track")]
    NotAdded,
    /// The event is attached, but to a different track than the one
    /// named in the call.
    #[error("event is not part of the specified track")]
    NotPartOfTrack,
    /// The track index does not refer to a declared track.
    #[error("track {0} is out of range")]
    TrackOutOfRange(u16),
    /// The event id does not refer to a live event (it was never issued
    /// by this document, or its event has been released).
    #[error("unknown event id")]
    UnknownEvent,
    /// Channel numbers run from 0 to 15.
    #[error("channel {0} is out of range")]
    ChannelOutOfRange(u8),
    /// The raw-data meta factory only accepts the eight
    /// variable-length text/data subtypes.
    #[error("meta type {0:?} does not carry free-form data")]
    NotADataMeta(crate::event::MetaKind),
}

/// Failure reported by the stream while writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WriteError {
    /// The byte stream refused or failed the write.
    #[error("writing to the stream failed")]
    WritingFailed,
}
