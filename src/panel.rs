//! Reference transport: pushes a [`BrightnessCommand`] to the panel over SPI.
//!
//! The panel controller keeps whole command buffers, so the AID bytes are
//! patched into shadows of the `0xF8` and `0xD9` buffers which are then written
//! in full. Holding `&mut Panel` for the whole update keeps one brightness change
//! in flight per panel.

use embedded_hal::{digital::OutputPin, spi::SpiDevice};

use crate::aid::{
    D9_AID_LATCH_OFFSET, F8_AID_SELECTOR_OFFSET, F8_AID_STRENGTH_OFFSET, REG_D9, REG_F8,
};
use crate::config::PanelConfig;
use crate::error::CalibrationError;
use crate::gamma::{GammaTable, GAMMA_UPDATE, REG_GAMMA, REG_GAMMA_UPDATE};
use crate::level::GammaLevel;
use crate::synth::{synthesize, BrightnessCommand};

/// `0xF8` command buffer length, address byte included.
pub const F8_LEN: usize = 39;
/// `0xD9` command buffer length, address byte included.
pub const D9_LEN: usize = 15;

/// Power-on panel condition image (AID bytes at 1 and 18 get patched).
pub const F8_PANEL_CONDITION: [u8; F8_LEN] = [
    REG_F8, 0x19, 0x35, 0x00, 0x00, 0x00, 0x93, 0x00, 0x3C, 0x78, 0x08, 0x27, 0x7D, 0x3F, 0x00,
    0x00, 0x00, 0x20, 0x04, 0x08, 0x6E, 0x00, 0x00, 0x00, 0x02, 0x08, 0x08, 0x23, 0x23, 0xC0,
    0xC8, 0x08, 0x48, 0xC1, 0x00, 0xC1, 0xFF, 0xFF, 0xC8,
];

/// Power-on display condition image (AID latch at 9 gets patched).
pub const D9_DISPLAY_CONDITION: [u8; D9_LEN] = [
    REG_D9, 0x14, 0x40, 0x0C, 0xCB, 0xCE, 0x6E, 0xC4, 0x0F, 0x40, 0x41, 0xD9, 0x00, 0x60, 0x19,
];

/// Error type for the transport.
#[derive(Debug)]
pub enum Error<SpiE, PinE> {
    /// SPI communication error.
    Spi(SpiE),
    /// GPIO pin error.
    Pin(PinE),
    /// Nothing was written; the panel keeps its previous brightness.
    Calibration(CalibrationError),
}

impl<SpiE, PinE> From<CalibrationError> for Error<SpiE, PinE> {
    fn from(err: CalibrationError) -> Self {
        Error::Calibration(err)
    }
}

impl<SpiE: core::fmt::Debug, PinE: core::fmt::Debug> core::fmt::Display for Error<SpiE, PinE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Spi(e) => write!(f, "SPI error: {:?}", e),
            Error::Pin(e) => write!(f, "pin error: {:?}", e),
            Error::Calibration(e) => write!(f, "calibration error: {}", e),
        }
    }
}

macro_rules! pin_try {
    ($expr:expr) => {
        $expr.map_err(Error::Pin)?
    };
}

/// Brightness side of an S6E8AA0 panel.
///
/// Requires an SPI device (chip select handled by the device) and a
/// data/command pin.
pub struct Panel<SPI, DC> {
    spi: SPI,
    /// Data/command pin (high for data, low for command).
    dc: DC,
    f8: [u8; F8_LEN],
    d9: [u8; D9_LEN],
    /// Bucket of the last fully written command.
    level: Option<GammaLevel>,
}

impl<SPI, DC, SpiE, PinE> Panel<SPI, DC>
where
    SPI: SpiDevice<u8, Error = SpiE>,
    DC: OutputPin<Error = PinE>,
{
    /// Creates a panel with the stock register images and no level applied yet.
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self {
            spi,
            dc,
            f8: F8_PANEL_CONDITION,
            d9: D9_DISPLAY_CONDITION,
            level: None,
        }
    }

    /// Replace the stock `0xF8` / `0xD9` images, e.g. with values read back from
    /// a different panel revision. Byte 0 is always the register address and is
    /// overwritten with `0xF8` / `0xD9`.
    pub fn with_register_images(mut self, mut f8: [u8; F8_LEN], mut d9: [u8; D9_LEN]) -> Self {
        f8[0] = REG_F8;
        d9[0] = REG_D9;
        self.f8 = f8;
        self.d9 = d9;
        self
    }

    /// Bucket of the last command that reached the panel in full.
    pub fn level(&self) -> Option<GammaLevel> {
        self.level
    }

    /// `0xF8` image as last written to the panel.
    pub fn f8_shadow(&self) -> &[u8; F8_LEN] {
        &self.f8
    }

    /// `0xD9` image as last written to the panel.
    pub fn d9_shadow(&self) -> &[u8; D9_LEN] {
        &self.d9
    }

    /// Synthesize and write. On a calibration error nothing reaches the bus.
    pub fn set_brightness(
        &mut self,
        nits: i32,
        base: &GammaTable,
        config: &PanelConfig,
    ) -> Result<GammaLevel, Error<SpiE, PinE>> {
        let command = synthesize(nits, base, config)?;
        self.apply(&command)?;
        Ok(command.level())
    }

    /// Write `0xF8`, `0xD9`, the gamma table and the gamma commit, in that order.
    ///
    /// The shadows and [`Self::level`] only change once all four writes succeed.
    pub fn apply(&mut self, command: &BrightnessCommand) -> Result<(), Error<SpiE, PinE>> {
        let aid = command.aid();
        let mut f8 = self.f8;
        let mut d9 = self.d9;
        f8[usize::from(F8_AID_STRENGTH_OFFSET)] = aid.f8_18th;
        f8[usize::from(F8_AID_SELECTOR_OFFSET)] = aid.f8_1st;
        d9[usize::from(D9_AID_LATCH_OFFSET)] = aid.d9_9th;

        let gamma = command.gamma_register_bytes();
        self.command_with_data(REG_F8, &f8[1..])?;
        self.command_with_data(REG_D9, &d9[1..])?;
        self.command_with_data(REG_GAMMA, &gamma[1..])?;
        self.command_with_data(REG_GAMMA_UPDATE, &[GAMMA_UPDATE])?;

        log::trace!("panel at {} nit", command.level().nits());
        self.f8 = f8;
        self.d9 = d9;
        self.level = Some(command.level());
        Ok(())
    }

    /// Give back the bus and pin.
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    fn write_command(&mut self, command: u8) -> Result<(), Error<SpiE, PinE>> {
        pin_try!(self.dc.set_low());
        self.spi.write(&[command]).map_err(Error::Spi)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), Error<SpiE, PinE>> {
        pin_try!(self.dc.set_high());
        self.spi.write(data).map_err(Error::Spi)
    }

    fn command_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), Error<SpiE, PinE>> {
        log::trace!("write {:#04x} ({} bytes)", command, data.len());
        self.write_command(command)?;
        self.write_data(data)
    }
}
