//! AID (analog/digital compensation) register fragments per brightness bucket.
//!
//! Each bucket maps to three bytes that are patched into the panel condition
//! (`0xF8`) and display condition (`0xD9`) commands. Several buckets share one
//! physical AID setting; those rows reuse the same named constant.

use crate::error::CalibrationError;
use crate::level::GammaLevel;

/// Panel condition register carrying the AID strength and selector.
pub const REG_F8: u8 = 0xF8;
/// Display condition register carrying the AID latch.
pub const REG_D9: u8 = 0xD9;

// Byte positions inside the command buffer, the register address being byte 0.
pub const F8_AID_STRENGTH_OFFSET: u8 = 18;
pub const F8_AID_SELECTOR_OFFSET: u8 = 1;
pub const D9_AID_LATCH_OFFSET: u8 = 9;

/// Three AID bytes for one brightness bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AidFragment {
    /// `0xF8` byte 18: AID strength.
    pub f8_18th: u8,
    /// `0xF8` byte 1: coarse AID selector.
    pub f8_1st: u8,
    /// `0xD9` byte 9: AID control / latch.
    pub d9_9th: u8,
}

impl AidFragment {
    const fn new(f8_18th: u8, f8_1st: u8) -> Self {
        Self {
            f8_18th,
            f8_1st,
            d9_9th: AID_LATCH,
        }
    }

    /// Bytes in `[F8 18th, F8 1st, D9 9th]` order.
    #[inline]
    pub const fn as_bytes(&self) -> [u8; 3] {
        [self.f8_18th, self.f8_1st, self.d9_9th]
    }
}

const AID_LATCH: u8 = 0xC0;

// Coarse selectors.
const SELECT_LOW: u8 = 0x59; // 20..=188 nit
const SELECT_HIGH: u8 = 0x19; // 190..=300 nit

// Shared rows.
const AID_110_180: AidFragment = AidFragment::new(0x42, SELECT_LOW);
const AID_190_250: AidFragment = AidFragment::new(0x04, SELECT_HIGH);
const AID_300: AidFragment = AidFragment::new(0x04, SELECT_HIGH);

/// Explicit level -> fragment mapping, in `GammaLevel` order.
const AID_TABLE: [(GammaLevel, AidFragment); GammaLevel::COUNT] = [
    (GammaLevel::Gamma20Cd, AidFragment::new(0x88, SELECT_LOW)),
    (GammaLevel::Gamma30Cd, AidFragment::new(0x7A, SELECT_LOW)),
    (GammaLevel::Gamma40Cd, AidFragment::new(0x6C, SELECT_LOW)),
    (GammaLevel::Gamma50Cd, AidFragment::new(0x5E, SELECT_LOW)),
    (GammaLevel::Gamma60Cd, AidFragment::new(0x50, SELECT_LOW)),
    (GammaLevel::Gamma70Cd, AidFragment::new(0x41, SELECT_LOW)),
    (GammaLevel::Gamma80Cd, AidFragment::new(0x32, SELECT_LOW)),
    (GammaLevel::Gamma90Cd, AidFragment::new(0x22, SELECT_LOW)),
    (GammaLevel::Gamma100Cd, AidFragment::new(0x12, SELECT_LOW)),
    (GammaLevel::Gamma110Cd, AID_110_180),
    (GammaLevel::Gamma120Cd, AID_110_180),
    (GammaLevel::Gamma130Cd, AID_110_180),
    (GammaLevel::Gamma140Cd, AID_110_180),
    (GammaLevel::Gamma150Cd, AID_110_180),
    (GammaLevel::Gamma160Cd, AID_110_180),
    (GammaLevel::Gamma170Cd, AID_110_180),
    (GammaLevel::Gamma180Cd, AID_110_180),
    (GammaLevel::Gamma182Cd, AidFragment::new(0x34, SELECT_LOW)),
    (GammaLevel::Gamma184Cd, AidFragment::new(0x27, SELECT_LOW)),
    (GammaLevel::Gamma186Cd, AidFragment::new(0x1A, SELECT_LOW)),
    (GammaLevel::Gamma188Cd, AidFragment::new(0x0D, SELECT_LOW)),
    (GammaLevel::Gamma190Cd, AID_190_250),
    (GammaLevel::Gamma200Cd, AID_190_250),
    (GammaLevel::Gamma210Cd, AID_190_250),
    (GammaLevel::Gamma220Cd, AID_190_250),
    (GammaLevel::Gamma230Cd, AID_190_250),
    (GammaLevel::Gamma240Cd, AID_190_250),
    (GammaLevel::Gamma250Cd, AID_190_250),
    (GammaLevel::Gamma300Cd, AID_300),
];

/// AID bytes for a bucket.
#[inline]
pub fn aid_fragment(level: GammaLevel) -> AidFragment {
    let (key, fragment) = AID_TABLE[level.index()];
    debug_assert_eq!(key, level);
    fragment
}

/// Index of the first row not keyed by the level with that ordinal.
const fn first_misordered_row(rows: &[(GammaLevel, AidFragment)]) -> Option<usize> {
    let mut i = 0;
    while i < rows.len() {
        if rows[i].0 as usize != i {
            return Some(i);
        }
        i += 1;
    }
    None
}

const _: () = assert!(
    first_misordered_row(&AID_TABLE).is_none(),
    "AID rows must follow GammaLevel order"
);

/// Check that row `i` of the AID table is keyed by the `i`th bucket.
pub fn validate_aid_table() -> Result<(), CalibrationError> {
    validate_aid_rows(&AID_TABLE)
}

fn validate_aid_rows(rows: &[(GammaLevel, AidFragment)]) -> Result<(), CalibrationError> {
    match first_misordered_row(rows) {
        None => Ok(()),
        Some(index) => Err(CalibrationError::MisorderedAid {
            index,
            expected: GammaLevel::ALL[index],
            found: rows[index].0,
        }),
    }
}
