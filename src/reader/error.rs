use crate::error::{ChunkError, HeaderError};
use thiserror::Error;

#[doc = r#"
A decode failure, annotated with the logical cursor position at which it
occurred.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("reading at byte {position}, {kind}")]
pub struct ReadError {
    position: u64,
    kind: ReadErrorKind,
}

/// What went wrong during a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadErrorKind {
    /// The stream reported failure mid-read; the file (or the adapter)
    /// ended before the document was complete.
    #[error("unexpected end of stream")]
    UnexpectedEnd,
    /// A malformed track chunk.
    #[error("{0}")]
    Chunk(#[from] ChunkError),
    /// A header-level structural violation: this is not a usable
    /// Standard MIDI File.
    #[error("{0}")]
    Header(#[from] HeaderError),
}

impl ReadError {
    /// Wrap a kind with the position it was detected at.
    pub const fn new(position: u64, kind: ReadErrorKind) -> Self {
        Self { position, kind }
    }

    /// The error kind.
    pub const fn kind(&self) -> &ReadErrorKind {
        &self.kind
    }

    /// Logical byte offset at which the error was detected.
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// True if the stream ended (or failed) mid-read.
    pub const fn is_unexpected_end(&self) -> bool {
        matches!(self.kind, ReadErrorKind::UnexpectedEnd)
    }
}

/// Result alias for the decode path.
pub type ReadResult<T> = Result<T, ReadError>;
