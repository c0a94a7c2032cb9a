//! Brightness request -> complete register write list.

use crate::aid::{
    aid_fragment, AidFragment, D9_AID_LATCH_OFFSET, F8_AID_SELECTOR_OFFSET,
    F8_AID_STRENGTH_OFFSET, REG_D9, REG_F8,
};
use crate::config::PanelConfig;
use crate::error::CalibrationError;
use crate::gamma::{GammaTable, GAMMA_TABLE_LEN, GAMMA_UPDATE, REG_GAMMA, REG_GAMMA_UPDATE};
use crate::level::{resolve, GammaLevel};
use crate::offset::apply_offsets;

/// One byte to place at `offset` of `register`'s command buffer (address = byte 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterWrite {
    pub register: u8,
    pub offset: u8,
    pub value: u8,
}

impl RegisterWrite {
    pub const fn new(register: u8, offset: u8, value: u8) -> Self {
        Self {
            register,
            offset,
            value,
        }
    }
}

/// Everything needed to move the panel to one brightness bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrightnessCommand {
    level: GammaLevel,
    aid: AidFragment,
    gamma: GammaTable,
    gamma_bytes: [u8; GAMMA_TABLE_LEN],
}

impl BrightnessCommand {
    /// Bucket the request resolved to.
    pub fn level(&self) -> GammaLevel {
        self.level
    }

    /// AID bytes for [`Self::level`].
    pub fn aid(&self) -> AidFragment {
        self.aid
    }

    /// Colour-shift corrected gamma codes.
    pub fn gamma(&self) -> &GammaTable {
        &self.gamma
    }

    /// Full `0xFA` command image of [`Self::gamma`].
    pub fn gamma_register_bytes(&self) -> &[u8; GAMMA_TABLE_LEN] {
        &self.gamma_bytes
    }

    /// The three AID patches: `F8[18]`, `F8[1]`, `D9[9]`.
    pub fn aid_writes(&self) -> [RegisterWrite; 3] {
        [
            RegisterWrite::new(REG_F8, F8_AID_STRENGTH_OFFSET, self.aid.f8_18th),
            RegisterWrite::new(REG_F8, F8_AID_SELECTOR_OFFSET, self.aid.f8_1st),
            RegisterWrite::new(REG_D9, D9_AID_LATCH_OFFSET, self.aid.d9_9th),
        ]
    }

    /// Write order: AID patches, gamma table, gamma commit.
    pub fn writes(&self) -> impl Iterator<Item = RegisterWrite> + '_ {
        let gamma = self.gamma_bytes[1..]
            .iter()
            .zip(1u8..)
            .map(|(&value, offset)| RegisterWrite::new(REG_GAMMA, offset, value));
        self.aid_writes()
            .into_iter()
            .chain(gamma)
            .chain(core::iter::once(RegisterWrite::new(
                REG_GAMMA_UPDATE,
                1,
                GAMMA_UPDATE,
            )))
    }
}

/// Build the instruction for `requested_nits` from the panel's base gamma table.
///
/// All or nothing: on error no part of the command is produced and the caller
/// should leave the panel at its current brightness.
pub fn synthesize(
    requested_nits: i32,
    base: &GammaTable,
    config: &PanelConfig,
) -> Result<BrightnessCommand, CalibrationError> {
    let level = resolve(requested_nits);
    let aid = aid_fragment(level);
    let gamma = apply_offsets(level, base, config.code_range)?;
    let gamma_bytes = gamma.to_register_bytes().map_err(|err| {
        log::error!("corrected gamma table cannot be encoded: {}", err);
        err
    })?;

    log::debug!(
        "{} nit -> {} nit bucket, aid {:02x?}, aor40 base {:?}",
        requested_nits,
        level.nits(),
        aid.as_bytes(),
        config.aor40.base(level)
    );

    Ok(BrightnessCommand {
        level,
        aid,
        gamma,
        gamma_bytes,
    })
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::gamma::{tests::GAMMA_300CD, CodeRange};
    use crate::offset::{Channel, GrayStep};

    fn base() -> GammaTable {
        GammaTable::from_register_bytes(&GAMMA_300CD).unwrap()
    }

    #[test]
    fn synthesize_100_nit() {
        let cmd = synthesize(100, &base(), &PanelConfig::default()).unwrap();
        assert_eq!(cmd.level(), GammaLevel::Gamma100Cd);
        assert_eq!(cmd.aid().as_bytes(), [0x12, 0x59, 0xC0]);
        let expected = apply_offsets(GammaLevel::Gamma100Cd, &base(), CodeRange::default()).unwrap();
        assert_eq!(cmd.gamma(), &expected);

        let writes: Vec<RegisterWrite> = cmd.writes().collect();
        assert_eq!(
            &writes[..3],
            &[
                RegisterWrite::new(0xF8, 18, 0x12),
                RegisterWrite::new(0xF8, 1, 0x59),
                RegisterWrite::new(0xD9, 9, 0xC0),
            ]
        );

        // Gamma bytes read back from the write list equal the corrected table.
        let mut image = [0u8; GAMMA_TABLE_LEN];
        image[0] = REG_GAMMA;
        for w in writes.iter().filter(|w| w.register == REG_GAMMA) {
            image[usize::from(w.offset)] = w.value;
        }
        assert_eq!(GammaTable::from_register_bytes(&image).unwrap(), expected);
        assert_eq!(image[GammaTable::register_offset(GrayStep::Iv15, Channel::Red)], 0x62 - 2);
        assert_eq!(image[GammaTable::register_offset(GrayStep::Iv15, Channel::Green)], 0x55 - 3);
        assert_eq!(image[GammaTable::register_offset(GrayStep::Iv15, Channel::Blue)], 0x55);

        assert_eq!(writes.len(), 3 + (GAMMA_TABLE_LEN - 1) + 1);
        assert_eq!(writes.last(), Some(&RegisterWrite::new(0xF7, 1, 0x03)));
    }

    #[test]
    fn odd_requests_still_synthesize() {
        let cfg = PanelConfig::default();
        assert_eq!(synthesize(185, &base(), &cfg).unwrap().level(), GammaLevel::Gamma184Cd);
        assert_eq!(synthesize(-1, &base(), &cfg).unwrap().level(), GammaLevel::Gamma20Cd);
        assert_eq!(synthesize(1000, &base(), &cfg).unwrap().level(), GammaLevel::Gamma300Cd);
    }

    #[test]
    fn bright_buckets_keep_base_gamma() {
        let cmd = synthesize(300, &base(), &PanelConfig::default()).unwrap();
        assert_eq!(cmd.gamma_register_bytes(), &GAMMA_300CD);
    }

    #[test]
    fn out_of_range_produces_nothing() {
        let mut near_floor = base();
        near_floor.set(GrayStep::Iv15, Channel::Green, 20);
        let err = synthesize(40, &near_floor, &PanelConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CalibrationError::CodeOutOfRange {
                level: GammaLevel::Gamma40Cd,
                step: GrayStep::Iv15,
                channel: Channel::Green,
                code: -33,
                ..
            }
        ));
    }

    #[test]
    fn wide_range_still_fails_on_encoding() {
        // A 10-bit range lets the offset through but the byte field cannot hold it.
        let mut near_ceiling = base();
        near_ceiling.set(GrayStep::Iv15, Channel::Blue, 0xF0);
        let cfg = PanelConfig::default().with_code_range(CodeRange::for_bit_depth(10));
        assert!(matches!(
            synthesize(20, &near_ceiling, &cfg),
            Err(CalibrationError::CodeOverflow { code: 0x12E, .. })
        ));
    }
}
