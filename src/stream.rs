#![doc = r#"
The byte-stream adapter supplied by the caller.

[`MidiStream`] is the crate's only view of the underlying storage: three
blocking operations over an absolute byte space. The decoder layers a
logical cursor on top (see [`crate::reader`]) so it can seek relative to
its own position; the stream itself only ever sees absolute offsets.

Implementations are provided for in-memory cursors and files. A stream is
free to support only the operations its backing store allows; a read-only
slice simply fails `write`, which the writers surface as
[`WriteError::WritingFailed`].
"#]

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use thiserror::Error;

use crate::error::WriteError;
use crate::vlq;

/// The adapter reports failure only; the decoder decides what it means
/// (an unexpected end during reads, a failed write during writes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the byte stream reported a failure")]
pub struct StreamError;

/// A blocking byte source/sink with absolute addressing.
///
/// Contract: `read` fills the whole buffer or fails, `write` consumes
/// the whole buffer or fails, `seek` positions the stream at an absolute
/// byte offset. An implementation must not call back into the document
/// it is currently servicing; reentrancy is undefined behavior by
/// contract and is not enforced at runtime.
pub trait MidiStream {
    /// Read exactly `buf.len()` bytes into `buf`.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), StreamError>;
    /// Write all of `buf`.
    fn write(&mut self, buf: &[u8]) -> Result<(), StreamError>;
    /// Seek to an absolute byte offset.
    fn seek(&mut self, position: u64) -> Result<(), StreamError>;
}

impl MidiStream for Cursor<Vec<u8>> {
    fn read(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        self.read_exact(buf).map_err(|_| StreamError)
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), StreamError> {
        self.write_all(buf).map_err(|_| StreamError)
    }

    fn seek(&mut self, position: u64) -> Result<(), StreamError> {
        Seek::seek(self, SeekFrom::Start(position))
            .map(|_| ())
            .map_err(|_| StreamError)
    }
}

impl MidiStream for Cursor<&[u8]> {
    fn read(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        self.read_exact(buf).map_err(|_| StreamError)
    }

    fn write(&mut self, _buf: &[u8]) -> Result<(), StreamError> {
        // A borrowed slice is read-only.
        Err(StreamError)
    }

    fn seek(&mut self, position: u64) -> Result<(), StreamError> {
        Seek::seek(self, SeekFrom::Start(position))
            .map(|_| ())
            .map_err(|_| StreamError)
    }
}

impl MidiStream for File {
    fn read(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        self.read_exact(buf).map_err(|_| StreamError)
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), StreamError> {
        self.write_all(buf).map_err(|_| StreamError)
    }

    fn seek(&mut self, position: u64) -> Result<(), StreamError> {
        Seek::seek(self, SeekFrom::Start(position))
            .map(|_| ())
            .map_err(|_| StreamError)
    }
}

/// Write a 16-bit integer big-endian, as the wire format requires.
pub fn write_u16_be<S: MidiStream>(stream: &mut S, value: u16) -> Result<(), WriteError> {
    stream
        .write(&value.to_be_bytes())
        .map_err(|_| WriteError::WritingFailed)
}

/// Write a 32-bit integer big-endian.
pub fn write_u32_be<S: MidiStream>(stream: &mut S, value: u32) -> Result<(), WriteError> {
    stream
        .write(&value.to_be_bytes())
        .map_err(|_| WriteError::WritingFailed)
}

/// Write a delta time or length as a variable-length quantity.
///
/// `value` must fit in 28 bits (see [`vlq::encode`]).
pub fn write_vlq<S: MidiStream>(stream: &mut S, value: u32) -> Result<(), WriteError> {
    let (buf, len) = vlq::encode(value);
    stream
        .write(&buf[..len])
        .map_err(|_| WriteError::WritingFailed)
}
