#![doc = r#"
The streaming decode state machine.

Decoding runs off a [`ReadSession`], which owns everything that is only
meaningful while a read is in progress: the borrowed stream, the logical
cursor (the decoder's own notion of the stream position, used for the
one-byte push-back that running status needs and for error reporting),
the remembered running-status byte and the sysex-continuation flag. The
long-lived document never carries parse state.

Layout of a decode, mirroring the wire format: header chunk, then one
event loop per declared track. Each track's loop reads a delta time and
a status byte, dispatches on the status (meta / sysex start / sysex
continuation-or-escape / channel message), builds the event through the
document's factories and appends it at the track tail. The loop ends at
the end-of-track meta event, which never materializes as an event.

The declared 32-bit length of a track chunk is validated to be nonzero
but does not bound the event loop; only end-of-track stops it, which
tolerates padding after the event stream.
"#]

mod error;
pub use error::*;

use crate::bits::{extract_bits_8, extract_bits_16};
use crate::error::{ChunkError, HeaderError};
use crate::event::{ChannelMessage, EventId, EventKind, MetaKind, Payload};
use crate::file::{FormatType, MidiDocument, SmpteFps, Timing};
use crate::stream::MidiStream;
use crate::vlq;

/// Transient per-read state: the stream, the logical cursor, and the
/// per-track running-status / sysex-continuation registers.
pub(crate) struct ReadSession<'a, S: MidiStream> {
    stream: &'a mut S,
    cursor: u64,
    pub(crate) running_status: u8,
    pub(crate) sysex_continuation: bool,
}

impl<'a, S: MidiStream> ReadSession<'a, S> {
    pub(crate) fn new(stream: &'a mut S) -> Self {
        Self {
            stream,
            cursor: 0,
            running_status: 0,
            sysex_continuation: false,
        }
    }

    pub(crate) fn read_bytes(&mut self, buf: &mut [u8]) -> ReadResult<()> {
        match self.stream.read(buf) {
            Ok(()) => {
                self.cursor += buf.len() as u64;
                Ok(())
            }
            Err(_) => Err(self.unexpected_end()),
        }
    }

    pub(crate) fn read_u8(&mut self) -> ReadResult<u8> {
        let mut buf = [0u8; 1];
        self.read_bytes(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self) -> ReadResult<u16> {
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn read_u24(&mut self) -> ReadResult<u32> {
        let mut buf = [0u8; 3];
        self.read_bytes(&mut buf)?;
        Ok(u32::from_be_bytes([0, buf[0], buf[1], buf[2]]))
    }

    fn read_u32(&mut self) -> ReadResult<u32> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    fn read_vec(&mut self, len: usize) -> ReadResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_bytes(&mut buf)?;
        Ok(buf)
    }

    /// Seek forward without delivering the bytes.
    fn skip_ahead(&mut self, len: u64) -> ReadResult<()> {
        match self.stream.seek(self.cursor + len) {
            Ok(()) => {
                self.cursor += len;
                Ok(())
            }
            Err(_) => Err(self.unexpected_end()),
        }
    }

    /// Hand the byte just read back to the stream. Used when a running
    /// status event's first data byte arrives where a status byte was
    /// expected.
    fn push_back_one(&mut self) -> ReadResult<()> {
        debug_assert!(self.cursor >= 1);
        match self.stream.seek(self.cursor - 1) {
            Ok(()) => {
                self.cursor -= 1;
                Ok(())
            }
            Err(_) => Err(self.unexpected_end()),
        }
    }

    pub(crate) fn chunk_error(&self, kind: ChunkError) -> ReadError {
        ReadError::new(self.cursor, kind.into())
    }

    fn header_error(&self, kind: HeaderError) -> ReadError {
        ReadError::new(self.cursor, kind.into())
    }

    fn unexpected_end(&self) -> ReadError {
        ReadError::new(self.cursor, ReadErrorKind::UnexpectedEnd)
    }
}

/// Decode a whole file into `document`. The caller has already reset
/// the document and handles the failure-side reset.
pub(crate) fn read_document<S: MidiStream>(
    document: &mut MidiDocument,
    session: &mut ReadSession<'_, S>,
) -> ReadResult<()> {
    read_header(document, session)?;
    for track in 0..document.track_count() {
        read_track(document, session, track)?;
    }
    Ok(())
}

fn read_header<S: MidiStream>(
    document: &mut MidiDocument,
    session: &mut ReadSession<'_, S>,
) -> ReadResult<()> {
    let mut magic = [0u8; 4];
    session.read_bytes(&mut magic)?;
    if &magic != b"MThd" {
        return Err(session.header_error(HeaderError::BadMagic));
    }

    let length = session.read_u32()?;
    if length != 6 {
        return Err(session.header_error(HeaderError::BadLength(length)));
    }

    let format_word = session.read_u16()?;
    let format = FormatType::try_from(format_word)
        .map_err(|_| session.header_error(HeaderError::BadFormat(format_word)))?;

    let track_count = session.read_u16()?;
    if track_count == 0 {
        return Err(session.header_error(HeaderError::NoTracks));
    }

    let division = session.read_u16()?;
    let timing = if extract_bits_16(division, 1, 1) == 0 {
        let ticks_per_beat = extract_bits_16(division, 2, 16);
        if ticks_per_beat == 0 {
            return Err(session.header_error(HeaderError::ZeroTicksPerBeat));
        }
        Timing::TicksPerBeat(ticks_per_beat)
    } else {
        // The high byte is a negated frame-rate code.
        let code = (extract_bits_16(division, 1, 8) as u8 as i8).unsigned_abs();
        let fps = SmpteFps::try_from(code)
            .map_err(|_| session.header_error(HeaderError::BadFrameRate(code)))?;
        let ticks_per_frame = extract_bits_16(division, 9, 16) as u8;
        if ticks_per_frame == 0 {
            return Err(session.header_error(HeaderError::ZeroTicksPerFrame));
        }
        Timing::Smpte {
            fps,
            ticks_per_frame,
        }
    };

    document.set_header(format, timing, track_count);
    Ok(())
}

fn read_track<S: MidiStream>(
    document: &mut MidiDocument,
    session: &mut ReadSession<'_, S>,
    track: u16,
) -> ReadResult<()> {
    let mut magic = [0u8; 4];
    session.read_bytes(&mut magic)?;
    if &magic != b"MTrk" {
        return Err(session.chunk_error(ChunkError::BadTrackMagic));
    }

    let declared_length = session.read_u32()?;
    if declared_length == 0 {
        return Err(session.chunk_error(ChunkError::EmptyTrack));
    }

    session.running_status = 0;
    session.sysex_continuation = false;

    read_track_events(document, session, track)
}

fn read_track_events<S: MidiStream>(
    document: &mut MidiDocument,
    session: &mut ReadSession<'_, S>,
    track: u16,
) -> ReadResult<()> {
    loop {
        let delta_time = vlq::read(session)?;
        let status = session.read_u8()?;

        let (event, end_of_track) = match status {
            0xFF => read_meta_event(document, session)?,
            0xF0 => (read_sysex_event(document, session)?, false),
            // 0xF7 continues a split sysex message when one is pending;
            // otherwise it is a standalone escape packet.
            0xF7 if session.sysex_continuation => (read_sysex_event(document, session)?, false),
            0xF7 => (read_escape_event(document, session)?, false),
            status => (read_channel_event(document, session, status)?, false),
        };

        if let Some(id) = event {
            document.append_parsed_event(track, id, delta_time);
        }
        if end_of_track {
            return Ok(());
        }
    }
}

fn read_meta_event<S: MidiStream>(
    document: &mut MidiDocument,
    session: &mut ReadSession<'_, S>,
) -> ReadResult<(Option<EventId>, bool)> {
    let type_byte = session.read_u8()?;
    let declared_length = vlq::read(session)?;

    let event = match MetaKind::try_from(type_byte) {
        Ok(MetaKind::SequenceNumber) => {
            let sequence_number = session.read_u16()?;
            Some(document.create_sequence_number_event(sequence_number))
        }
        Ok(kind) if kind.is_data() => {
            let data = session.read_vec(declared_length as usize)?;
            Some(document.insert_event(EventKind::Meta(kind), Payload::from_vec(data)))
        }
        Ok(MetaKind::ChannelPrefix) => {
            let channel = session.read_u8()?;
            Some(document.create_channel_prefix_event(channel))
        }
        Ok(MetaKind::EndOfTrack) => return Ok((None, true)),
        Ok(MetaKind::SetTempo) => {
            let tempo = session.read_u24()?;
            Some(document.create_tempo_event(tempo))
        }
        Ok(MetaKind::SmpteOffset) => {
            // Not modeled yet; consume the five payload bytes.
            session.skip_ahead(5)?;
            None
        }
        Ok(MetaKind::TimeSignature) => {
            let numerator = session.read_u8()?;
            let denominator = session.read_u8()?;
            let metronome = session.read_u8()?;
            let thirtyseconds = session.read_u8()?;
            Some(document.create_time_signature_event(
                numerator,
                denominator,
                metronome,
                thirtyseconds,
            ))
        }
        Ok(MetaKind::KeySignature) => {
            let key = session.read_u8()? as i8;
            let scale = session.read_u8()?;
            Some(document.create_key_signature_event(key, scale))
        }
        Ok(_) | Err(_) => {
            // Unknown meta types are tolerated, not fatal.
            session.skip_ahead(u64::from(declared_length))?;
            None
        }
    };
    Ok((event, false))
}

/// Decode a sysex payload of declared length L: the first L−1 bytes are
/// data, the final byte decides whether the message is complete (0xF7)
/// or continues in a later 0xF7-prefixed event.
fn read_sysex_event<S: MidiStream>(
    document: &mut MidiDocument,
    session: &mut ReadSession<'_, S>,
) -> ReadResult<Option<EventId>> {
    let declared_length = vlq::read(session)?;
    if declared_length == 0 {
        // Degenerate but tolerated.
        return Ok(None);
    }

    let data = session.read_vec(declared_length as usize - 1)?;
    let final_byte = session.read_u8()?;
    let end_of_sysex = final_byte == 0xF7;
    session.sysex_continuation = !end_of_sysex;

    Ok(Some(document.insert_event(
        EventKind::Sysex { end_of_sysex },
        Payload::from_vec(data),
    )))
}

/// Decode a standalone 0xF7 escape packet: its declared bytes are
/// consumed verbatim and the event is always terminal.
fn read_escape_event<S: MidiStream>(
    document: &mut MidiDocument,
    session: &mut ReadSession<'_, S>,
) -> ReadResult<Option<EventId>> {
    let declared_length = vlq::read(session)?;
    if declared_length == 0 {
        return Ok(None);
    }

    let data = session.read_vec(declared_length as usize)?;
    Ok(Some(document.insert_event(
        EventKind::Sysex { end_of_sysex: true },
        Payload::from_vec(data),
    )))
}

fn read_channel_event<S: MidiStream>(
    document: &mut MidiDocument,
    session: &mut ReadSession<'_, S>,
    status: u8,
) -> ReadResult<Option<EventId>> {
    let mut status = status;
    if extract_bits_8(status, 1, 1) == 0 {
        // Running status: this byte is the event's first data byte, not
        // a status byte. Hand it back and reuse the remembered status.
        status = session.running_status;
        session.push_back_one()?;
    }
    session.running_status = status;

    let nibble = extract_bits_8(status, 1, 4);
    let channel = extract_bits_8(status, 5, 8);
    let message = ChannelMessage::try_from(nibble)
        .map_err(|_| session.chunk_error(ChunkError::UnknownChannelStatus(nibble)))?;

    let data1 = session.read_u8()?;
    let data2 = if message.data_len() == 2 {
        session.read_u8()?
    } else {
        0
    };

    Ok(Some(document.push_channel_event(
        channel, message, data1, data2,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn session_reads_big_endian_integers() {
        let bytes = [0x01u8, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let mut stream = Cursor::new(&bytes[..]);
        let mut session = ReadSession::new(&mut stream);
        assert_eq!(session.read_u16().unwrap(), 0x0102);
        assert_eq!(session.read_u24().unwrap(), 0x0304_05);
        assert_eq!(session.read_u32().unwrap(), 0x0607_0809);
        assert_eq!(session.cursor, 9);
    }

    #[test]
    fn push_back_rewinds_exactly_one_byte() {
        let bytes = [0xAAu8, 0xBB, 0xCC];
        let mut stream = Cursor::new(&bytes[..]);
        let mut session = ReadSession::new(&mut stream);
        assert_eq!(session.read_u8().unwrap(), 0xAA);
        assert_eq!(session.read_u8().unwrap(), 0xBB);
        session.push_back_one().unwrap();
        assert_eq!(session.read_u8().unwrap(), 0xBB);
        assert_eq!(session.cursor, 2);
    }

    #[test]
    fn exhausted_streams_report_unexpected_end_with_position() {
        let bytes = [0x00u8];
        let mut stream = Cursor::new(&bytes[..]);
        let mut session = ReadSession::new(&mut stream);
        session.read_u8().unwrap();
        let err = session.read_u16().unwrap_err();
        assert!(err.is_unexpected_end());
        assert_eq!(err.position(), 1);
    }
}
