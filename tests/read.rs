//! Wire-level decode tests over hand-built files.

use mtrk::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Cursor;

/// Build a header chunk. `division` is the raw 16-bit time-division
/// word, big-endian.
fn header(format: u16, tracks: u16, division: [u8; 2]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&tracks.to_be_bytes());
    bytes.extend_from_slice(&division);
    bytes
}

/// Wrap `body` in an MTrk chunk with an accurate declared length.
fn track(body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(body);
    bytes
}

const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

fn parse(bytes: Vec<u8>) -> Result<MidiDocument, ReadError> {
    let mut document = MidiDocument::new();
    document.read(&mut Cursor::new(bytes))?;
    Ok(document)
}

fn collect_kinds(document: &MidiDocument, track: u16) -> Vec<EventKind> {
    document
        .track_events(track)
        .unwrap()
        .map(|(_, event)| event.kind())
        .collect()
}

#[test]
fn minimal_single_track_file() {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0x90, 60, 100]); // note on, C4
    body.extend_from_slice(&[0x60, 0x80, 60, 0]); // note off after 96 ticks
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let document = parse(bytes).unwrap();
    assert!(document.is_valid());
    assert_eq!(document.format(), Some(FormatType::SingleMultiChannel));
    assert_eq!(document.timing(), Some(Timing::TicksPerBeat(96)));
    assert_eq!(document.track_count(), 1);

    let events: Vec<_> = document.track_events(0).unwrap().collect();
    assert_eq!(events.len(), 2);

    let (_, on) = events[0];
    assert_eq!(
        on.kind(),
        EventKind::Channel {
            message: ChannelMessage::NoteOn,
            channel: 0
        }
    );
    assert_eq!(on.time(), 0);
    assert_eq!(on.data(), &[60, 100]);
    assert_eq!(on.track(), Some(0));

    let (_, off) = events[1];
    assert_eq!(
        off.kind(),
        EventKind::Channel {
            message: ChannelMessage::NoteOff,
            channel: 0
        }
    );
    assert_eq!(off.time(), 96);
}

#[test]
fn format_one_with_two_tracks() {
    let mut bytes = header(1, 2, [0x01, 0xE0]);
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0xC5, 12]); // program change, channel 5
    body.extend_from_slice(&END_OF_TRACK);
    bytes.extend_from_slice(&track(&body));
    bytes.extend_from_slice(&track(&END_OF_TRACK));

    let document = parse(bytes).unwrap();
    assert_eq!(document.format(), Some(FormatType::Simultaneous));
    assert_eq!(document.timing(), Some(Timing::TicksPerBeat(480)));
    assert_eq!(document.track_count(), 2);

    let kinds = collect_kinds(&document, 0);
    assert_eq!(
        kinds,
        vec![EventKind::Channel {
            message: ChannelMessage::ProgramChange,
            channel: 5
        }]
    );
    assert_eq!(document.first_event(1).unwrap(), None);
}

#[test]
fn running_status_reuses_the_previous_status_byte() {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0x93, 60, 100]); // note on, channel 3
    body.extend_from_slice(&[0x10, 62, 101]); // running status
    body.extend_from_slice(&[0x10, 64, 102]); // still running
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let document = parse(bytes).unwrap();
    let events: Vec<_> = document.track_events(0).unwrap().collect();
    assert_eq!(events.len(), 3);
    for (i, (_, event)) in events.iter().enumerate() {
        assert_eq!(
            event.kind(),
            EventKind::Channel {
                message: ChannelMessage::NoteOn,
                channel: 3
            },
            "event {i}"
        );
    }
    assert_eq!(events[1].1.data(), &[62, 101]);
    assert_eq!(events[2].1.time(), 0x10);
}

#[test]
fn running_status_with_no_remembered_status_is_invalid() {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0x40, 0x40]); // data byte where a status must be
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let err = parse(bytes).unwrap_err();
    assert_eq!(
        *err.kind(),
        ReadErrorKind::Chunk(ChunkError::UnknownChannelStatus(0))
    );
}

#[test]
fn pitch_bend_packs_low_bits_first() {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0xE2, 0x00, 0x40]); // center
    body.extend_from_slice(&[0x00, 0xE2, 0x7F, 0x7F]); // maximum
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let document = parse(bytes).unwrap();
    let events: Vec<_> = document.track_events(0).unwrap().collect();
    assert_eq!(events[0].1.pitch_bend(), Some(PITCH_BEND_CENTER));
    assert_eq!(events[0].1.channel(), Some(2));
    assert_eq!(events[1].1.pitch_bend(), Some(16383));
}

#[test]
fn meta_events_dispatch_by_type() {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0xFF, 0x00, 0x02, 0x00, 0x2A]); // sequence number 42
    body.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]); // tempo 500000
    body.extend_from_slice(&[0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08]); // 4/4
    body.extend_from_slice(&[0x00, 0xFF, 0x59, 0x02, 0xFE, 0x01]); // two flats, minor
    body.extend_from_slice(&[0x00, 0xFF, 0x20, 0x01, 0x09]); // channel prefix 9
    body.extend_from_slice(&[0x00, 0xFF, 0x03, 0x04]); // track name...
    body.extend_from_slice(b"lead");
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let document = parse(bytes).unwrap();
    let events: Vec<_> = document.track_events(0).unwrap().collect();
    assert_eq!(events.len(), 6);

    assert_eq!(events[0].1.sequence_number(), Some(42));
    assert_eq!(events[1].1.tempo(), Some(500_000));
    assert_eq!(events[2].1.time_signature(), Some((4, 2, 24, 8)));
    assert_eq!(events[3].1.key_signature(), Some((-2, 1)));
    assert_eq!(events[4].1.channel(), Some(9));
    assert_eq!(
        events[5].1.kind(),
        EventKind::Meta(MetaKind::SequenceOrTrackName)
    );
    assert_eq!(events[5].1.data(), b"lead");
}

#[test]
fn unknown_meta_and_smpte_offset_are_skipped() {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0xFF, 0x21, 0x01, 0x03]); // port prefix, not modeled
    body.extend_from_slice(&[0x00, 0xFF, 0x54, 0x05, 0x41, 0x17, 0x2D, 0x0C, 0x22]); // SMPTE offset
    body.extend_from_slice(&[0x00, 0x99, 36, 127]); // the only real event
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let document = parse(bytes).unwrap();
    let kinds = collect_kinds(&document, 0);
    assert_eq!(
        kinds,
        vec![EventKind::Channel {
            message: ChannelMessage::NoteOn,
            channel: 9
        }]
    );
}

#[test]
fn sysex_split_across_a_continuation() {
    let mut body = Vec::new();
    // F0 fragment: three declared bytes, final byte is not F7, so the
    // message continues.
    body.extend_from_slice(&[0x00, 0xF0, 0x03, 0x43, 0x12, 0x00]);
    // F7 while a continuation is pending: two more data bytes, then the
    // terminator.
    body.extend_from_slice(&[0x00, 0xF7, 0x03, 0x34, 0x56, 0xF7]);
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let document = parse(bytes).unwrap();
    let events: Vec<_> = document.track_events(0).unwrap().collect();
    assert_eq!(events.len(), 2);

    assert_eq!(events[0].1.kind(), EventKind::Sysex { end_of_sysex: false });
    assert_eq!(events[0].1.data(), &[0x43, 0x12]);
    assert_eq!(events[1].1.kind(), EventKind::Sysex { end_of_sysex: true });
    assert_eq!(events[1].1.data(), &[0x34, 0x56]);
}

#[test]
fn standalone_escape_packet_is_terminal() {
    let mut body = Vec::new();
    // No continuation pending: F7 introduces an escape packet whose two
    // declared bytes are consumed verbatim.
    body.extend_from_slice(&[0x00, 0xF7, 0x02, 0xF3, 0x01]);
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let document = parse(bytes).unwrap();
    let events: Vec<_> = document.track_events(0).unwrap().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].1.kind(), EventKind::Sysex { end_of_sysex: true });
    assert_eq!(events[0].1.data(), &[0xF3, 0x01]);
}

#[test]
fn zero_length_sysex_produces_no_event() {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0xF0, 0x00]);
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let document = parse(bytes).unwrap();
    assert_eq!(document.first_event(0).unwrap(), None);
}

#[test]
fn smpte_timing_header() {
    // 0xE8 is -24: 24 fps, 40 ticks per frame.
    let mut bytes = header(0, 1, [0xE8, 40]);
    bytes.extend_from_slice(&track(&END_OF_TRACK));

    let document = parse(bytes).unwrap();
    assert_eq!(
        document.timing(),
        Some(Timing::Smpte {
            fps: SmpteFps::TwentyFour,
            ticks_per_frame: 40
        })
    );
}

fn assert_fully_reset(document: &MidiDocument) {
    assert!(!document.is_valid());
    assert_eq!(document.track_count(), 0);
    assert_eq!(document.format(), None);
    assert_eq!(document.timing(), None);
}

#[test]
fn wrong_header_magic() {
    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes[0..4].copy_from_slice(b"RIFF");
    bytes.extend_from_slice(&track(&END_OF_TRACK));

    let mut document = MidiDocument::new();
    let err = document.read(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(*err.kind(), ReadErrorKind::Header(HeaderError::BadMagic));
    assert_fully_reset(&document);
}

#[test]
fn wrong_header_length() {
    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes[4..8].copy_from_slice(&7u32.to_be_bytes());

    let err = parse(bytes).unwrap_err();
    assert_eq!(*err.kind(), ReadErrorKind::Header(HeaderError::BadLength(7)));
}

#[test]
fn unknown_format_word() {
    let bytes = header(3, 1, [0x00, 0x60]);
    let err = parse(bytes).unwrap_err();
    assert_eq!(*err.kind(), ReadErrorKind::Header(HeaderError::BadFormat(3)));
}

#[test]
fn zero_declared_tracks() {
    let mut document = MidiDocument::new();
    let err = document
        .read(&mut Cursor::new(header(1, 0, [0x00, 0x60])))
        .unwrap_err();
    assert_eq!(*err.kind(), ReadErrorKind::Header(HeaderError::NoTracks));
    assert_fully_reset(&document);
}

#[test]
fn zero_ticks_per_beat() {
    let err = parse(header(0, 1, [0x00, 0x00])).unwrap_err();
    assert_eq!(
        *err.kind(),
        ReadErrorKind::Header(HeaderError::ZeroTicksPerBeat)
    );
}

#[test]
fn unsupported_smpte_frame_rate() {
    // -28 is not one of the four defined rates.
    let mut document = MidiDocument::new();
    let err = document
        .read(&mut Cursor::new(header(0, 1, [0xE4, 40])))
        .unwrap_err();
    assert_eq!(
        *err.kind(),
        ReadErrorKind::Header(HeaderError::BadFrameRate(28))
    );
    assert_fully_reset(&document);
}

#[test]
fn zero_smpte_ticks_per_frame() {
    let err = parse(header(0, 1, [0xE8, 0])).unwrap_err();
    assert_eq!(
        *err.kind(),
        ReadErrorKind::Header(HeaderError::ZeroTicksPerFrame)
    );
}

#[test]
fn wrong_track_magic() {
    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(b"Trak");
    bytes.extend_from_slice(&4u32.to_be_bytes());
    bytes.extend_from_slice(&END_OF_TRACK);

    let err = parse(bytes).unwrap_err();
    assert_eq!(*err.kind(), ReadErrorKind::Chunk(ChunkError::BadTrackMagic));
}

#[test]
fn zero_length_track_chunk() {
    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&0u32.to_be_bytes());

    let err = parse(bytes).unwrap_err();
    assert_eq!(*err.kind(), ReadErrorKind::Chunk(ChunkError::EmptyTrack));
}

#[test]
fn truncated_track_without_end_of_track() {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0x90, 60, 100]);
    // stream just stops; no end-of-track meta event

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let mut document = MidiDocument::new();
    let err = document.read(&mut Cursor::new(bytes)).unwrap_err();
    assert!(err.is_unexpected_end());
    assert_fully_reset(&document);
}

#[test]
fn system_common_status_bytes_are_invalid_in_a_track() {
    let mut body = Vec::new();
    body.extend_from_slice(&[0x00, 0xF1, 0x00]); // MTC quarter frame, not valid in SMF
    body.extend_from_slice(&END_OF_TRACK);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&body));

    let err = parse(bytes).unwrap_err();
    assert_eq!(
        *err.kind(),
        ReadErrorKind::Chunk(ChunkError::UnknownChannelStatus(0xF))
    );
}

#[test]
fn a_successful_read_replaces_a_failed_document() {
    let mut document = MidiDocument::new();
    assert!(document.read(&mut Cursor::new(b"junk".to_vec())).is_err());
    assert_fully_reset(&document);

    let mut bytes = header(0, 1, [0x00, 0x60]);
    bytes.extend_from_slice(&track(&END_OF_TRACK));
    document.read(&mut Cursor::new(bytes)).unwrap();
    assert!(document.is_valid());
    assert_eq!(document.track_count(), 1);
}
