//! AID and colour-shift brightness tables for the Samsung S6E8AA0 AMOLED panel.
//!
//! Turns a requested luminance into the exact register bytes that move the
//! panel to that brightness: the AID (analog/digital compensation) bytes of the
//! `0xF8` / `0xD9` commands and a colour-shift corrected `0xFA` gamma table.
//!
//! ## Features
//! - 29 brightness buckets from 20 to 300 nit ([`GammaLevel`]), with a total
//!   downward-rounding resolver ([`resolve`]).
//! - Compiled-in AID fragments ([`aid_fragment`]) and sparse per-channel
//!   offsets for the darkest gray steps ([`apply_offsets`]).
//! - [`synthesize`] combines both into one ordered [`RegisterWrite`] list.
//! - [`Panel`]: reference SPI transport built on `embedded-hal`.
//!
//! All tables are immutable statics; every function is pure and can be called
//! from any context without locking.
//!
//! ## Usage
//!
//! 1. Read (or compute) the panel's base gamma table and wrap it in a [`GammaTable`].
//! 2. Pick a [`PanelConfig`] with the code range of your panel variant.
//! 3. Call [`synthesize`] and hand [`BrightnessCommand::writes`] to your transport,
//!    or let [`Panel::set_brightness`] do both.
//!
//! ```
//! use s6e8aa0_aid::{synthesize, GammaLevel, GammaTable, PanelConfig};
//!
//! let base = GammaTable::filled(0x80);
//! let cmd = synthesize(105, &base, &PanelConfig::default()).expect("tables fit");
//! assert_eq!(cmd.level(), GammaLevel::Gamma100Cd);
//! for write in cmd.writes() {
//!     // bus.write(write.register, write.offset, write.value)
//!     let _ = write;
//! }
//! ```

#![no_std]

extern crate alloc;

pub mod aid;
pub mod config;
pub mod error;
pub mod gamma;
pub mod level;
pub mod offset;
pub mod panel;
pub mod synth;

pub use aid::{aid_fragment, AidFragment};
pub use config::{Aor40Table, PanelConfig};
pub use error::CalibrationError;
pub use gamma::{CodeRange, GammaTable};
pub use level::{resolve, GammaLevel};
pub use offset::{apply_offsets, Channel, GrayStep, OffsetEntry};
pub use panel::{Error, Panel};
pub use synth::{synthesize, BrightnessCommand, RegisterWrite};

/// Check the compiled-in tables for misordered or duplicate rows.
///
/// Integrators can call this once at start-up; the crate's own tests run it too.
pub fn validate_tables() -> Result<(), CalibrationError> {
    aid::validate_aid_table()?;
    offset::validate_offset_table()
}

/// Prelude module for easy importing of common traits and types.
pub mod prelude {
    pub use embedded_hal::{digital::OutputPin, spi::SpiDevice};

    pub use super::{
        resolve, synthesize, BrightnessCommand, CalibrationError, Channel, CodeRange, Error,
        GammaLevel, GammaTable, GrayStep, Panel, PanelConfig, RegisterWrite,
    };
}
