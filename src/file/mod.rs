#![doc = r#"
The in-memory MIDI document: format and timing read from the header,
plus one doubly-linked list of events per track.

# Ownership

Events are created detached through the `create_*` factories, which hand
back an [`EventId`]. A detached event belongs to whoever created it:
attach it to a track with [`MidiDocument::add_event`] (or the start/end
conveniences), or give it back with [`MidiDocument::discard_event`].
Once attached the document owns the event exclusively — attaching it
again fails with [`EventError::AlreadyAdded`], and the only way to
release it is [`MidiDocument::remove_event`].

# All-or-nothing reads

[`MidiDocument::read`] resets the document, decodes the stream, and
either replaces the entire track set (setting the valid flag) or resets
again, so a half-built document is never observable.
"#]

mod format;
pub use format::*;

mod timing;
pub use timing::*;

mod track;
pub use track::TrackEvents;
pub(crate) use track::{EventArena, TrackLinks};

use crate::error::EventError;
use crate::event::{
    ChannelMessage, Event, EventId, EventKind, MetaKind, Payload, pack_pitch_bend,
};
use crate::reader::{ReadResult, ReadSession};
use crate::stream::MidiStream;

/// A Standard MIDI File held in memory.
#[derive(Debug, Default)]
pub struct MidiDocument {
    format: Option<FormatType>,
    timing: Option<Timing>,
    tracks: Vec<TrackLinks>,
    arena: EventArena,
    valid: bool,
}

impl MidiDocument {
    /// Create an empty, invalid document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The file format, once a read has succeeded.
    pub fn format(&self) -> Option<FormatType> {
        self.format
    }

    /// The time-division mode, once a read has succeeded.
    pub fn timing(&self) -> Option<Timing> {
        self.timing
    }

    /// Number of declared tracks.
    pub fn track_count(&self) -> u16 {
        self.tracks.len() as u16
    }

    /// True only after a fully successful [`read`](Self::read).
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Decode a Standard MIDI File from `stream`, replacing the whole
    /// document. On any failure the document is left fully reset.
    pub fn read<S: MidiStream>(&mut self, stream: &mut S) -> ReadResult<()> {
        self.reset();
        let mut session = ReadSession::new(stream);
        match crate::reader::read_document(self, &mut session) {
            Ok(()) => {
                self.valid = true;
                Ok(())
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Release every event on every track and clear all format,
    /// timing and validity state. Detached events survive; they are
    /// still owned by their creators.
    pub fn reset(&mut self) {
        self.arena.release_attached();
        self.tracks.clear();
        self.format = None;
        self.timing = None;
        self.valid = false;
    }

    /// Remove every event from the given track. A no-op on an
    /// out-of-range or already-empty track.
    pub fn wipe_track(&mut self, track: u16) {
        let track = usize::from(track);
        if track >= self.tracks.len() {
            return;
        }
        self.wipe_track_slots(track);
    }

    fn wipe_track_slots(&mut self, track: usize) {
        let mut current = self.tracks[track].head;
        while let Some(id) = current {
            current = self.arena.get(id).and_then(|event| event.next);
            self.arena.remove(id);
        }
        self.tracks[track] = TrackLinks::default();
    }

    // ------------------------------------------------------------------
    // Event factories
    // ------------------------------------------------------------------

    /// Create a detached channel event.
    ///
    /// `data2` is ignored for the one-byte messages (program change and
    /// channel aftertouch). For pitch bend, `data1` and `data2` are the
    /// two 7-bit wire bytes, low bits first.
    pub fn create_channel_event(
        &mut self,
        channel: u8,
        message: ChannelMessage,
        data1: u8,
        data2: u8,
    ) -> Result<EventId, EventError> {
        if channel > 15 {
            return Err(EventError::ChannelOutOfRange(channel));
        }
        Ok(self.push_channel_event(channel, message, data1, data2))
    }

    pub(crate) fn push_channel_event(
        &mut self,
        channel: u8,
        message: ChannelMessage,
        data1: u8,
        data2: u8,
    ) -> EventId {
        let payload = match message {
            ChannelMessage::PitchBend => {
                Payload::from_bytes(&pack_pitch_bend(data1, data2).to_ne_bytes())
            }
            _ if message.data_len() == 2 => Payload::from_bytes(&[data1, data2]),
            _ => Payload::from_bytes(&[data1]),
        };
        self.insert_event(EventKind::Channel { message, channel }, payload)
    }

    /// Create a detached sequence-number meta event.
    pub fn create_sequence_number_event(&mut self, sequence_number: u16) -> EventId {
        self.insert_event(
            EventKind::Meta(MetaKind::SequenceNumber),
            Payload::from_bytes(&sequence_number.to_ne_bytes()),
        )
    }

    /// Create a detached tempo meta event. The tempo is given in
    /// microseconds per quarter note.
    pub fn create_tempo_event(&mut self, tempo: u32) -> EventId {
        self.insert_event(
            EventKind::Meta(MetaKind::SetTempo),
            Payload::from_vec(tempo.to_ne_bytes().to_vec()),
        )
    }

    /// Create a detached meta event of one of the raw-data subtypes
    /// (text, copyright, names, lyrics, marker, cue point or
    /// sequencer-specific); `data` is copied verbatim.
    pub fn create_meta_data_event(
        &mut self,
        kind: MetaKind,
        data: &[u8],
    ) -> Result<EventId, EventError> {
        if !kind.is_data() {
            return Err(EventError::NotADataMeta(kind));
        }
        Ok(self.insert_event(EventKind::Meta(kind), Payload::from_bytes(data)))
    }

    /// Create a detached channel-prefix meta event: the following meta
    /// events belong to `channel` until a non-meta event occurs.
    pub fn create_channel_prefix_event(&mut self, channel: u8) -> EventId {
        self.insert_event(
            EventKind::Meta(MetaKind::ChannelPrefix),
            Payload::from_bytes(&[channel]),
        )
    }

    /// Create a detached time-signature meta event.
    ///
    /// `denominator` is the power of two (2 = quarter note), and
    /// `metronome` counts clock signals per click, 24 to the quarter
    /// note. `thirtyseconds_per_24_signals` is nearly always 8.
    pub fn create_time_signature_event(
        &mut self,
        numerator: u8,
        denominator: u8,
        metronome: u8,
        thirtyseconds_per_24_signals: u8,
    ) -> EventId {
        self.insert_event(
            EventKind::Meta(MetaKind::TimeSignature),
            Payload::from_vec(vec![
                numerator,
                denominator,
                metronome,
                thirtyseconds_per_24_signals,
            ]),
        )
    }

    /// Create a detached key-signature meta event. Negative `key`
    /// counts flats, positive counts sharps, zero is C; `scale` is 0
    /// for major and 1 for minor.
    pub fn create_key_signature_event(&mut self, key: i8, scale: u8) -> EventId {
        self.insert_event(
            EventKind::Meta(MetaKind::KeySignature),
            Payload::from_bytes(&[key as u8, scale]),
        )
    }

    /// Create a detached system-exclusive event. Pass
    /// `end_of_sysex = false` for every fragment of a split message
    /// except the last.
    pub fn create_sysex_event(&mut self, data: &[u8], end_of_sysex: bool) -> EventId {
        self.insert_event(EventKind::Sysex { end_of_sysex }, Payload::from_bytes(data))
    }

    pub(crate) fn insert_event(&mut self, kind: EventKind, payload: Payload) -> EventId {
        self.arena.insert(Event::new(kind, payload))
    }

    /// Release a detached event that will not be attached after all.
    /// Fails with [`EventError::AlreadyAdded`] if the event is attached
    /// (the document owns it; use [`remove_event`](Self::remove_event)).
    pub fn discard_event(&mut self, event: EventId) -> Result<(), EventError> {
        match self.arena.get(event) {
            None => Err(EventError::UnknownEvent),
            Some(e) if e.track.is_some() => Err(EventError::AlreadyAdded),
            Some(_) => {
                self.arena.remove(event);
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Track mutation
    // ------------------------------------------------------------------

    /// Attach a detached event to `track`, `delta_time` ticks after
    /// `after` (or after the track start when `after` is `None`, which
    /// inserts at the head). Ownership passes to the document.
    pub fn add_event(
        &mut self,
        track: u16,
        event: EventId,
        delta_time: u32,
        after: Option<EventId>,
    ) -> Result<(), EventError> {
        match self.arena.get(event) {
            None => return Err(EventError::UnknownEvent),
            Some(e) if e.track.is_some() => return Err(EventError::AlreadyAdded),
            Some(_) => {}
        }
        if usize::from(track) >= self.tracks.len() {
            return Err(EventError::TrackOutOfRange(track));
        }
        if let Some(anchor) = after {
            match self.arena.get(anchor) {
                None => return Err(EventError::UnknownEvent),
                Some(a) if a.track != Some(track) => return Err(EventError::NotPartOfTrack),
                Some(_) => {}
            }
        }
        self.link_event(usize::from(track), event, delta_time, after);
        Ok(())
    }

    /// Attach a detached event at the very beginning of `track`.
    pub fn add_event_to_start(
        &mut self,
        track: u16,
        event: EventId,
        delta_time: u32,
    ) -> Result<(), EventError> {
        self.add_event(track, event, delta_time, None)
    }

    /// Attach a detached event at the very end of `track`.
    pub fn add_event_to_end(
        &mut self,
        track: u16,
        event: EventId,
        delta_time: u32,
    ) -> Result<(), EventError> {
        match self.arena.get(event) {
            None => return Err(EventError::UnknownEvent),
            Some(e) if e.track.is_some() => return Err(EventError::AlreadyAdded),
            Some(_) => {}
        }
        if usize::from(track) >= self.tracks.len() {
            return Err(EventError::TrackOutOfRange(track));
        }
        let tail = self.tracks[usize::from(track)].tail;
        self.link_event(usize::from(track), event, delta_time, tail);
        Ok(())
    }

    /// Append used by the decoder; track and event are known good.
    pub(crate) fn append_parsed_event(&mut self, track: u16, event: EventId, delta_time: u32) {
        let tail = self.tracks[usize::from(track)].tail;
        self.link_event(usize::from(track), event, delta_time, tail);
    }

    fn link_event(&mut self, track: usize, id: EventId, delta_time: u32, after: Option<EventId>) {
        {
            let event = self.arena.get_mut(id).unwrap();
            event.track = Some(track as u16);
            event.time = delta_time;
        }
        match after {
            Some(anchor) => {
                let old_next = self.arena.get(anchor).unwrap().next;
                {
                    let event = self.arena.get_mut(id).unwrap();
                    event.previous = Some(anchor);
                    event.next = old_next;
                }
                self.arena.get_mut(anchor).unwrap().next = Some(id);
                if let Some(next) = old_next {
                    self.arena.get_mut(next).unwrap().previous = Some(id);
                }
                if self.tracks[track].tail == Some(anchor) {
                    self.tracks[track].tail = Some(id);
                }
            }
            None => {
                let old_head = self.tracks[track].head;
                {
                    let event = self.arena.get_mut(id).unwrap();
                    event.previous = None;
                    event.next = old_head;
                }
                if let Some(head) = old_head {
                    self.arena.get_mut(head).unwrap().previous = Some(id);
                }
                self.tracks[track].head = Some(id);
                if self.tracks[track].tail.is_none() {
                    self.tracks[track].tail = Some(id);
                }
            }
        }
    }

    /// Detach an event from `track` and release its storage.
    pub fn remove_event(&mut self, track: u16, event: EventId) -> Result<(), EventError> {
        if usize::from(track) >= self.tracks.len() {
            return Err(EventError::TrackOutOfRange(track));
        }
        let (previous, next) = match self.arena.get(event) {
            None => return Err(EventError::UnknownEvent),
            Some(e) => match e.track {
                None => return Err(EventError::NotAdded),
                Some(t) if t != track => return Err(EventError::NotPartOfTrack),
                Some(_) => (e.previous, e.next),
            },
        };
        if let Some(p) = previous {
            self.arena.get_mut(p).unwrap().next = next;
        }
        if let Some(n) = next {
            self.arena.get_mut(n).unwrap().previous = previous;
        }
        let track = usize::from(track);
        if self.tracks[track].head == Some(event) {
            self.tracks[track].head = next;
        }
        if self.tracks[track].tail == Some(event) {
            self.tracks[track].tail = previous;
        }
        self.arena.remove(event);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// First event on `track`, if any.
    pub fn first_event(&self, track: u16) -> Result<Option<EventId>, EventError> {
        self.links(track).map(|links| links.head)
    }

    /// Last event on `track`, if any.
    pub fn last_event(&self, track: u16) -> Result<Option<EventId>, EventError> {
        self.links(track).map(|links| links.tail)
    }

    /// The event after `event` on its track, if any.
    pub fn next_event(&self, event: EventId) -> Result<Option<EventId>, EventError> {
        self.arena
            .get(event)
            .map(|e| e.next)
            .ok_or(EventError::UnknownEvent)
    }

    /// The event before `event` on its track, if any.
    pub fn previous_event(&self, event: EventId) -> Result<Option<EventId>, EventError> {
        self.arena
            .get(event)
            .map(|e| e.previous)
            .ok_or(EventError::UnknownEvent)
    }

    /// Read access to an event. The document still owns it; there is no
    /// mutable counterpart.
    pub fn event(&self, event: EventId) -> Option<&Event> {
        self.arena.get(event)
    }

    /// Iterate `track` head to tail.
    pub fn track_events(&self, track: u16) -> Result<TrackEvents<'_>, EventError> {
        self.links(track).map(|links| TrackEvents {
            arena: &self.arena,
            next: links.head,
        })
    }

    fn links(&self, track: u16) -> Result<&TrackLinks, EventError> {
        self.tracks
            .get(usize::from(track))
            .ok_or(EventError::TrackOutOfRange(track))
    }

    /// Header fields decoded; allocate the per-track anchors.
    pub(crate) fn set_header(&mut self, format: FormatType, timing: Timing, track_count: u16) {
        self.format = Some(format);
        self.timing = Some(timing);
        self.tracks = vec![TrackLinks::default(); usize::from(track_count)];
    }
}
