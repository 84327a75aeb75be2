use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The file's format word.
///
/// Format 0 holds one track carrying every channel; format 1 holds
/// simultaneous tracks sharing a time base; format 2 holds sequentially
/// independent patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}
