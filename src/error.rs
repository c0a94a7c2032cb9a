//! Configuration-data errors raised while turning a brightness request into
//! register bytes.

use thiserror::Error;

use crate::gamma::CodeRange;
use crate::level::GammaLevel;
use crate::offset::{Channel, GrayStep};

/// The compiled-in tables do not fit the panel variant or gamma table in use.
///
/// These are never retried: the tables have to be fixed at the data level. A
/// caller receiving one should keep the previously applied brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalibrationError {
    /// A corrected gamma code left the panel's valid code range.
    #[error("{level:?} {step:?}/{channel:?}: corrected code {code} outside {range}")]
    CodeOutOfRange {
        level: GammaLevel,
        step: GrayStep,
        channel: Channel,
        code: i32,
        range: CodeRange,
    },
    /// A gamma code does not fit the width of its register field.
    #[error("{step:?}/{channel:?}: code {code} does not fit a {bits}-bit register field")]
    CodeOverflow {
        step: GrayStep,
        channel: Channel,
        code: u16,
        bits: u8,
    },
    /// Two offset rows target the same (level, step, channel).
    #[error("duplicate colour-shift entry for {level:?} {step:?}/{channel:?}")]
    DuplicateOffset {
        level: GammaLevel,
        step: GrayStep,
        channel: Channel,
    },
    /// The AID row at `index` is keyed by another level.
    #[error("AID row {index} is keyed {found:?}, expected {expected:?}")]
    MisorderedAid {
        index: usize,
        expected: GammaLevel,
        found: GammaLevel,
    },
    /// A raw gamma register image has the wrong length or selector byte.
    #[error("malformed gamma register image ({len} bytes)")]
    MalformedGammaTable { len: usize },
}
