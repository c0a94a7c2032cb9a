//! Per-bucket colour-shift corrections for the low gray steps.
//!
//! OLED sub-pixels drift apart in colour at low drive, most visibly on the two
//! darkest calibrated steps (IV_15 and IV_35). The table below is sparse: a
//! (level, step, channel) triple without a row has no correction.

use crate::error::CalibrationError;
use crate::gamma::{CodeRange, GammaTable};
use crate::level::GammaLevel::{self, *};

use Channel::{Blue, Green, Red};
use GrayStep::{Iv15, Iv35};

/// Sub-pixel colour channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Green,
    Blue,
}

impl Channel {
    pub const COUNT: usize = 3;
    pub const ALL: [Channel; Channel::COUNT] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Column in a [`GammaTable`](crate::gamma::GammaTable) row.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Rung of the panel's gray ladder, named after the panel's IV registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum GrayStep {
    Iv1 = 0,
    Iv15,
    Iv35,
    Iv59,
    Iv87,
    Iv171,
    Iv255,
}

impl GrayStep {
    pub const COUNT: usize = 7;
    pub const ALL: [GrayStep; GrayStep::COUNT] = [
        GrayStep::Iv1,
        GrayStep::Iv15,
        GrayStep::Iv35,
        GrayStep::Iv59,
        GrayStep::Iv87,
        GrayStep::Iv171,
        GrayStep::Iv255,
    ];

    /// Row in a [`GammaTable`](crate::gamma::GammaTable).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Additive correction, in gamma-code units, for one channel at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetEntry {
    pub level: GammaLevel,
    pub step: GrayStep,
    pub channel: Channel,
    pub delta: i16,
}

const fn shift(level: GammaLevel, step: GrayStep, channel: Channel, delta: i16) -> OffsetEntry {
    OffsetEntry {
        level,
        step,
        channel,
        delta,
    }
}

const COLOR_SHIFT_ROWS: [OffsetEntry; 47] = [
    shift(Gamma180Cd, Iv15, Red, 1),
    shift(Gamma180Cd, Iv15, Green, -1),
    shift(Gamma180Cd, Iv15, Blue, 5),
    shift(Gamma170Cd, Iv15, Red, 1),
    shift(Gamma170Cd, Iv15, Green, -1),
    shift(Gamma170Cd, Iv15, Blue, 5),
    shift(Gamma160Cd, Iv15, Red, 1),
    shift(Gamma160Cd, Iv15, Green, -1),
    shift(Gamma160Cd, Iv15, Blue, 5),
    shift(Gamma150Cd, Iv15, Red, 1),
    shift(Gamma150Cd, Iv15, Green, -1),
    shift(Gamma150Cd, Iv15, Blue, 5),
    shift(Gamma140Cd, Iv15, Red, 1),
    shift(Gamma140Cd, Iv15, Green, -1),
    shift(Gamma140Cd, Iv15, Blue, 5),
    shift(Gamma130Cd, Iv15, Red, 1),
    shift(Gamma130Cd, Iv15, Green, -1),
    shift(Gamma130Cd, Iv15, Blue, 5),
    shift(Gamma120Cd, Iv15, Red, 1),
    shift(Gamma120Cd, Iv15, Green, -1),
    shift(Gamma120Cd, Iv15, Blue, 5),
    shift(Gamma110Cd, Iv15, Red, 1),
    shift(Gamma110Cd, Iv15, Green, -1),
    shift(Gamma110Cd, Iv15, Blue, 5),
    shift(Gamma100Cd, Iv15, Red, -2),
    shift(Gamma100Cd, Iv15, Green, -3),
    shift(Gamma90Cd, Iv15, Red, -6),
    shift(Gamma90Cd, Iv15, Green, -7),
    shift(Gamma80Cd, Iv15, Red, -10),
    shift(Gamma80Cd, Iv15, Green, -12),
    shift(Gamma70Cd, Iv15, Red, -17),
    shift(Gamma70Cd, Iv15, Green, -20),
    shift(Gamma60Cd, Iv15, Red, -27),
    shift(Gamma60Cd, Iv15, Green, -32),
    shift(Gamma50Cd, Iv15, Red, -44),
    shift(Gamma50Cd, Iv15, Green, -53),
    shift(Gamma40Cd, Iv15, Red, -44),
    shift(Gamma40Cd, Iv15, Green, -53),
    shift(Gamma40Cd, Iv15, Blue, 14),
    shift(Gamma30Cd, Iv15, Red, -44),
    shift(Gamma30Cd, Iv15, Green, -53),
    shift(Gamma30Cd, Iv15, Blue, 32),
    shift(Gamma20Cd, Iv15, Red, -33),
    shift(Gamma20Cd, Iv15, Green, -53),
    shift(Gamma20Cd, Iv15, Blue, 62),
    shift(Gamma20Cd, Iv35, Red, -15),
    shift(Gamma20Cd, Iv35, Green, -12),
];

/// Colour-shift corrections, brightest bucket first.
pub static COLOR_SHIFT_TABLE: [OffsetEntry; 47] = COLOR_SHIFT_ROWS;

const fn same_cell(a: &OffsetEntry, b: &OffsetEntry) -> bool {
    a.level as u8 == b.level as u8
        && a.step as u8 == b.step as u8
        && a.channel as u8 == b.channel as u8
}

/// Index of the first row whose (level, step, channel) appears again later.
const fn first_duplicate_row(rows: &[OffsetEntry]) -> Option<usize> {
    let mut i = 0;
    while i < rows.len() {
        let mut j = i + 1;
        while j < rows.len() {
            if same_cell(&rows[i], &rows[j]) {
                return Some(i);
            }
            j += 1;
        }
        i += 1;
    }
    None
}

const _: () = assert!(
    first_duplicate_row(&COLOR_SHIFT_ROWS).is_none(),
    "one colour-shift row per (level, step, channel)"
);

/// Rows that apply at `level`.
pub fn offsets_for(level: GammaLevel) -> impl Iterator<Item = &'static OffsetEntry> {
    COLOR_SHIFT_TABLE.iter().filter(move |e| e.level == level)
}

/// Correction for one cell; 0 when the table has no row for it.
pub fn delta(level: GammaLevel, step: GrayStep, channel: Channel) -> i16 {
    offsets_for(level)
        .find(|e| e.step == step && e.channel == channel)
        .map_or(0, |e| e.delta)
}

/// Reject tables with more than one row per (level, step, channel).
pub fn validate_offset_table() -> Result<(), CalibrationError> {
    validate_offset_rows(&COLOR_SHIFT_TABLE)
}

fn validate_offset_rows(rows: &[OffsetEntry]) -> Result<(), CalibrationError> {
    match first_duplicate_row(rows) {
        None => Ok(()),
        Some(i) => Err(CalibrationError::DuplicateOffset {
            level: rows[i].level,
            step: rows[i].step,
            channel: rows[i].channel,
        }),
    }
}

/// Add the corrections for `level` to a copy of `base`.
///
/// Cells without a row pass through untouched. A corrected cell outside
/// `range` fails the whole call; nothing is clamped. Applying twice to an
/// already corrected table corrects twice.
pub fn apply_offsets(
    level: GammaLevel,
    base: &GammaTable,
    range: CodeRange,
) -> Result<GammaTable, CalibrationError> {
    let mut corrected = base.clone();
    for entry in offsets_for(level) {
        let code = i32::from(base.get(entry.step, entry.channel)) + i32::from(entry.delta);
        if !range.contains(code) {
            let err = CalibrationError::CodeOutOfRange {
                level,
                step: entry.step,
                channel: entry.channel,
                code,
                range,
            };
            log::error!("colour-shift table does not fit gamma table: {}", err);
            return Err(err);
        }
        // `range` lies within u16, so the cast is lossless.
        corrected.set(entry.step, entry.channel, code as u16);
    }
    Ok(corrected)
}
