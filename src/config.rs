//! Caller-supplied configuration: gamma code bounds and the AOR40 baselines.
//!
//! Nothing here is computed by this crate. The smart-dimming side owns these
//! values and passes them in; the stock constructors carry the panel's published
//! numbers so a plain integration works out of the box.

use crate::gamma::CodeRange;
use crate::level::GammaLevel;

/// Baseline shared by every bucket from 20 to 100 nit.
const AOR40_BASE_20_TO_100: u16 = 110;

/// Per-bucket "40% AOR" reference magnitudes used to scale offsets upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aor40Table {
    bases: [Option<u16>; GammaLevel::COUNT],
}

impl Aor40Table {
    /// No baselines.
    pub const fn empty() -> Self {
        Self {
            bases: [None; GammaLevel::COUNT],
        }
    }

    /// Panel-published baselines; buckets above 188 nit have none.
    pub const fn stock() -> Self {
        let mut bases = [None; GammaLevel::COUNT];
        let mut i = 0;
        while i <= GammaLevel::Gamma100Cd.index() {
            bases[i] = Some(AOR40_BASE_20_TO_100);
            i += 1;
        }
        bases[GammaLevel::Gamma110Cd.index()] = Some(171);
        bases[GammaLevel::Gamma120Cd.index()] = Some(186);
        bases[GammaLevel::Gamma130Cd.index()] = Some(200);
        bases[GammaLevel::Gamma140Cd.index()] = Some(215);
        bases[GammaLevel::Gamma150Cd.index()] = Some(229);
        bases[GammaLevel::Gamma160Cd.index()] = Some(244);
        bases[GammaLevel::Gamma170Cd.index()] = Some(258);
        bases[GammaLevel::Gamma180Cd.index()] = Some(273);
        bases[GammaLevel::Gamma182Cd.index()] = Some(250);
        bases[GammaLevel::Gamma184Cd.index()] = Some(234);
        bases[GammaLevel::Gamma186Cd.index()] = Some(214);
        bases[GammaLevel::Gamma188Cd.index()] = Some(201);
        Self { bases }
    }

    /// Baseline for `level`, or `None` when the bucket has none.
    pub fn base(&self, level: GammaLevel) -> Option<u16> {
        self.bases[level.index()]
    }

    /// Replace one bucket's baseline.
    pub fn with_base(mut self, level: GammaLevel, base: Option<u16>) -> Self {
        self.bases[level.index()] = base;
        self
    }
}

impl Default for Aor40Table {
    fn default() -> Self {
        Self::stock()
    }
}

/// Everything the synthesizer needs besides the request and the base table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelConfig {
    /// Valid gamma codes after colour-shift correction.
    pub code_range: CodeRange,
    /// AOR40 baselines reported alongside each command.
    pub aor40: Aor40Table,
}

impl PanelConfig {
    /// Config from an explicit code range and AOR40 table.
    pub const fn new(code_range: CodeRange, aor40: Aor40Table) -> Self {
        Self { code_range, aor40 }
    }

    /// Replace the valid gamma code range.
    pub fn with_code_range(mut self, code_range: CodeRange) -> Self {
        self.code_range = code_range;
        self
    }

    /// Replace the AOR40 baselines.
    pub fn with_aor40(mut self, aor40: Aor40Table) -> Self {
        self.aor40 = aor40;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_baselines() {
        let t = Aor40Table::stock();
        assert_eq!(t.base(GammaLevel::Gamma20Cd), Some(110));
        assert_eq!(t.base(GammaLevel::Gamma100Cd), Some(110));
        assert_eq!(t.base(GammaLevel::Gamma110Cd), Some(171));
        assert_eq!(t.base(GammaLevel::Gamma180Cd), Some(273));
        assert_eq!(t.base(GammaLevel::Gamma182Cd), Some(250));
        assert_eq!(t.base(GammaLevel::Gamma188Cd), Some(201));
        assert_eq!(t.base(GammaLevel::Gamma190Cd), None);
        assert_eq!(t.base(GammaLevel::Gamma300Cd), None);
    }

    #[test]
    fn overrides() {
        let t = Aor40Table::empty().with_base(GammaLevel::Gamma50Cd, Some(99));
        assert_eq!(t.base(GammaLevel::Gamma50Cd), Some(99));
        assert_eq!(t.base(GammaLevel::Gamma60Cd), None);

        let cfg = PanelConfig::default().with_code_range(CodeRange::for_bit_depth(10));
        assert_eq!(cfg.code_range.max, 1023);
        assert_eq!(cfg.aor40, Aor40Table::stock());
    }
}
