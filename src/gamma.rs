//! Gamma code table and its `0xFA` register image.
//! Works in no_std.

use core::fmt;

use crate::error::CalibrationError;
use crate::offset::{Channel, GrayStep};

/// Gamma table register.
pub const REG_GAMMA: u8 = 0xFA;
/// First parameter of `0xFA`: selects the gamma set being written.
pub const GAMMA_SET_SELECTOR: u8 = 0x01;
/// Register address + selector + 6 steps x RGB x 1 byte + IV_255 x RGB x 2 bytes.
pub const GAMMA_TABLE_LEN: usize = 26;

/// Gamma update register; writing [`GAMMA_UPDATE`] commits the `0xFA` table.
pub const REG_GAMMA_UPDATE: u8 = 0xF7;
pub const GAMMA_UPDATE: u8 = 0x03;

// First byte of IV_255 in the register image.
const IV255_OFFSET: usize = 2 + (GrayStep::COUNT - 1) * Channel::COUNT;

/// Closed interval of gamma codes the panel accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeRange {
    pub min: u16,
    pub max: u16,
}

impl CodeRange {
    /// `min..=max`, or `None` when `min > max`.
    pub const fn new(min: u16, max: u16) -> Option<Self> {
        if min > max {
            return None;
        }
        Some(Self { min, max })
    }

    /// `0..=2^bits - 1` for a panel with `bits`-bit gamma codes.
    ///
    /// `bits` is clamped to 1..=16: 0 gives `0..=1`, anything above 16 gives
    /// the full `u16` range.
    pub const fn for_bit_depth(bits: u8) -> Self {
        let bits = if bits == 0 {
            1
        } else if bits > 16 {
            16
        } else {
            bits
        };
        Self {
            min: 0,
            max: ((1u32 << bits) - 1) as u16,
        }
    }

    /// Whether `code` lies in the closed interval.
    #[inline]
    pub fn contains(&self, code: i32) -> bool {
        i32::from(self.min) <= code && code <= i32::from(self.max)
    }
}

impl Default for CodeRange {
    fn default() -> Self {
        Self::for_bit_depth(8)
    }
}

impl fmt::Display for CodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Gamma codes indexed by (gray step, channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GammaTable {
    codes: [[u16; Channel::COUNT]; GrayStep::COUNT],
}

impl GammaTable {
    /// Table from `[step][channel]` codes in register order.
    pub const fn new(codes: [[u16; Channel::COUNT]; GrayStep::COUNT]) -> Self {
        Self { codes }
    }

    /// Every cell set to `code`.
    pub const fn filled(code: u16) -> Self {
        Self {
            codes: [[code; Channel::COUNT]; GrayStep::COUNT],
        }
    }

    /// Code of one cell.
    #[inline]
    pub fn get(&self, step: GrayStep, channel: Channel) -> u16 {
        self.codes[step.index()][channel.index()]
    }

    /// Overwrite one cell.
    #[inline]
    pub fn set(&mut self, step: GrayStep, channel: Channel, code: u16) {
        self.codes[step.index()][channel.index()] = code;
    }

    /// Cells in register order: steps dimmest first, R, G, B within a step.
    pub fn iter(&self) -> impl Iterator<Item = (GrayStep, Channel, u16)> + '_ {
        GrayStep::ALL.into_iter().flat_map(move |step| {
            Channel::ALL
                .into_iter()
                .map(move |channel| (step, channel, self.get(step, channel)))
        })
    }

    /// Byte position of a cell in the `0xFA` image (big-endian high byte for IV_255).
    pub const fn register_offset(step: GrayStep, channel: Channel) -> usize {
        match step {
            GrayStep::Iv255 => IV255_OFFSET + channel.index() * 2,
            _ => 2 + step.index() * Channel::COUNT + channel.index(),
        }
    }

    /// Width in bits of a cell's register field.
    pub const fn register_bits(step: GrayStep) -> u8 {
        match step {
            GrayStep::Iv255 => 16,
            _ => 8,
        }
    }

    /// Parse a full `0xFA` command image, address byte included.
    pub fn from_register_bytes(bytes: &[u8]) -> Result<Self, CalibrationError> {
        if bytes.len() != GAMMA_TABLE_LEN || bytes[0] != REG_GAMMA || bytes[1] != GAMMA_SET_SELECTOR
        {
            return Err(CalibrationError::MalformedGammaTable { len: bytes.len() });
        }
        let mut table = Self::filled(0);
        for step in GrayStep::ALL {
            for channel in Channel::ALL {
                let at = Self::register_offset(step, channel);
                let code = match step {
                    GrayStep::Iv255 => u16::from_be_bytes([bytes[at], bytes[at + 1]]),
                    _ => u16::from(bytes[at]),
                };
                table.set(step, channel, code);
            }
        }
        Ok(table)
    }

    /// Encode as a full `0xFA` command image, address byte included.
    pub fn to_register_bytes(&self) -> Result<[u8; GAMMA_TABLE_LEN], CalibrationError> {
        let mut out = [0u8; GAMMA_TABLE_LEN];
        out[0] = REG_GAMMA;
        out[1] = GAMMA_SET_SELECTOR;
        for (step, channel, code) in self.iter() {
            let at = Self::register_offset(step, channel);
            match step {
                GrayStep::Iv255 => out[at..at + 2].copy_from_slice(&code.to_be_bytes()),
                _ => {
                    out[at] = u8::try_from(code).map_err(|_| CalibrationError::CodeOverflow {
                        step,
                        channel,
                        code,
                        bits: Self::register_bits(step),
                    })?;
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A stock 300 nit table for this panel.
    pub(crate) const GAMMA_300CD: [u8; GAMMA_TABLE_LEN] = [
        0xFA, 0x01, 0x71, 0x31, 0x7B, 0x62, 0x55, 0x55, 0xAF, 0xB1, 0xB1, 0xBD, 0xCE, 0xB7, 0x9A,
        0xB1, 0x90, 0xB2, 0xC4, 0xAE, 0x00, 0x60, 0x00, 0x40, 0x00, 0x70,
    ];

    #[test]
    fn parses_stock_table() {
        let table = GammaTable::from_register_bytes(&GAMMA_300CD).unwrap();
        assert_eq!(table.get(GrayStep::Iv1, Channel::Red), 0x71);
        assert_eq!(table.get(GrayStep::Iv15, Channel::Red), 0x62);
        assert_eq!(table.get(GrayStep::Iv15, Channel::Blue), 0x55);
        assert_eq!(table.get(GrayStep::Iv171, Channel::Blue), 0xAE);
        assert_eq!(table.get(GrayStep::Iv255, Channel::Red), 0x60);
        assert_eq!(table.get(GrayStep::Iv255, Channel::Green), 0x40);
        assert_eq!(table.get(GrayStep::Iv255, Channel::Blue), 0x70);
        assert_eq!(table.to_register_bytes().unwrap(), GAMMA_300CD);
    }

    #[test]
    fn rejects_malformed_images() {
        assert_eq!(
            GammaTable::from_register_bytes(&GAMMA_300CD[..25]),
            Err(CalibrationError::MalformedGammaTable { len: 25 })
        );
        let mut wrong_reg = GAMMA_300CD;
        wrong_reg[0] = 0xF8;
        assert!(GammaTable::from_register_bytes(&wrong_reg).is_err());
    }

    #[test]
    fn register_offsets_cover_the_image() {
        assert_eq!(GammaTable::register_offset(GrayStep::Iv1, Channel::Red), 2);
        assert_eq!(GammaTable::register_offset(GrayStep::Iv15, Channel::Green), 6);
        assert_eq!(GammaTable::register_offset(GrayStep::Iv171, Channel::Blue), 19);
        assert_eq!(GammaTable::register_offset(GrayStep::Iv255, Channel::Red), 20);
        assert_eq!(GammaTable::register_offset(GrayStep::Iv255, Channel::Blue), 24);
    }

    #[test]
    fn wide_code_on_byte_field_overflows() {
        let mut table = GammaTable::filled(0x80);
        table.set(GrayStep::Iv35, Channel::Green, 0x100);
        assert_eq!(
            table.to_register_bytes(),
            Err(CalibrationError::CodeOverflow {
                step: GrayStep::Iv35,
                channel: Channel::Green,
                code: 0x100,
                bits: 8,
            })
        );
        // IV_255 carries two bytes.
        let mut table = GammaTable::filled(0x80);
        table.set(GrayStep::Iv255, Channel::Green, 0x1A5);
        let bytes = table.to_register_bytes().unwrap();
        assert_eq!(&bytes[22..24], &[0x01, 0xA5]);
    }

    #[test]
    fn code_range_bounds() {
        assert_eq!(Some(CodeRange::for_bit_depth(8)), CodeRange::new(0, 255));
        assert_eq!(CodeRange::for_bit_depth(10).max, 1023);
        assert_eq!(CodeRange::for_bit_depth(0).max, 1);
        assert_eq!(CodeRange::for_bit_depth(24).max, u16::MAX);
        assert_eq!(CodeRange::new(20, 10), None);
        assert_eq!(CodeRange::new(7, 7), Some(CodeRange { min: 7, max: 7 }));
        let r = CodeRange::new(10, 20).unwrap();
        assert!(r.contains(10) && r.contains(20));
        assert!(!r.contains(9) && !r.contains(21));
    }
}
