#![doc = r#"
Time-division modes.

The header's 16-bit time-division word selects one of two clocks: a
metrical one (ticks per beat, the low 15 bits) or an absolute SMPTE one
(a negated frame-rate code in the high byte, ticks per frame in the low
byte). A tick's real-world duration follows from whichever mode is in
effect, combined with tempo meta events in the metrical case.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The SMPTE frame rates the format allows.
///
/// The discriminants are the absolute values of the frame-rate code in
/// the time-division word. `TwentyNine` is the NTSC drop-frame rate,
/// nominally 29.97 fps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SmpteFps {
    /// 24 frames per second, the film standard.
    TwentyFour = 24,
    /// 25 frames per second, PAL/SECAM.
    TwentyFive = 25,
    /// 29.97 frames per second, NTSC drop-frame.
    TwentyNine = 29,
    /// 30 frames per second.
    Thirty = 30,
}

/// The precise NTSC drop-frame rate: 30000/1001 fps.
const DROP_FRAME: f64 = 30_000. / 1001.;

impl SmpteFps {
    /// The nominal integer rate used in timing division. Note that
    /// drop-frame returns 30, not 29.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 30,
            Self::Thirty => 30,
        }
    }

    /// The exact rate, including the fractional drop-frame value.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// How delta ticks are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    /// Metrical time: ticks per beat (quarter note), 1–32767.
    TicksPerBeat(u16),
    /// Absolute time: SMPTE frame rate and ticks per frame.
    Smpte {
        /// Frames per second.
        fps: SmpteFps,
        /// Subdivisions of a frame, nonzero.
        ticks_per_frame: u8,
    },
}

impl Timing {
    /// Returns the tick rate if this is metrical timing.
    pub const fn ticks_per_beat(&self) -> Option<u16> {
        match self {
            Self::TicksPerBeat(t) => Some(*t),
            Self::Smpte { .. } => None,
        }
    }

    /// Returns the frame rate and ticks per frame if this is SMPTE
    /// timing.
    pub const fn smpte(&self) -> Option<(SmpteFps, u8)> {
        match self {
            Self::TicksPerBeat(_) => None,
            Self::Smpte {
                fps,
                ticks_per_frame,
            } => Some((*fps, *ticks_per_frame)),
        }
    }
}
