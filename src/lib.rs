#![doc = r#"
Standard MIDI File decoding with editable per-track event lists.

`mtrk` reads an SMF byte stream — header chunk plus `MTrk` chunks full
of variable-length-quantity delta times, running-status channel
messages, meta annotations and split system-exclusive payloads — into a
[`MidiDocument`]: one doubly-linked event list per track, addressed
through stable ids, with short payloads stored inline in the event
record.

# Reading a file

```no_run
use mtrk::prelude::*;
use std::io::Cursor;

# fn main() -> Result<(), ReadError> {
let bytes: Vec<u8> = std::fs::read("song.mid").unwrap();
let mut document = MidiDocument::new();
document.read(&mut Cursor::new(bytes))?;

for (_, event) in document.track_events(0).unwrap() {
    println!("{} ticks: {:?}", event.time(), event.kind());
}
# Ok(())
# }
```

Reads are all-or-nothing: a failure anywhere resets the document, so a
partially decoded file is never observable.

# Editing tracks

Events are created detached through the document's `create_*` factories
and attached with [`MidiDocument::add_event`] and friends; removal
unlinks in O(1) and releases the event's storage. See
[`file`](crate::file) for the ownership rules.
"#]

pub mod bits;

pub mod error;

pub mod event;

pub mod file;

pub mod reader;

pub mod stream;

pub mod vlq;

pub use file::MidiDocument;

/// Everything a typical caller needs.
pub mod prelude {
    pub use crate::error::{ChunkError, EventError, HeaderError, WriteError};
    pub use crate::event::{
        ChannelMessage, Event, EventId, EventKind, MetaKind, PITCH_BEND_CENTER, Payload,
    };
    pub use crate::file::{FormatType, MidiDocument, SmpteFps, Timing, TrackEvents};
    pub use crate::reader::{ReadError, ReadErrorKind, ReadResult};
    pub use crate::stream::{MidiStream, StreamError};
}
