//! Brightness buckets supported by the panel and the nit -> bucket resolver.
//! Works in no_std.

/// Luminance buckets, in panel order. The discriminant is the table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum GammaLevel {
    Gamma20Cd = 0,
    Gamma30Cd,
    Gamma40Cd,
    Gamma50Cd,
    Gamma60Cd,
    Gamma70Cd,
    Gamma80Cd,
    Gamma90Cd,
    Gamma100Cd,
    Gamma110Cd,
    Gamma120Cd,
    Gamma130Cd,
    Gamma140Cd,
    Gamma150Cd,
    Gamma160Cd,
    Gamma170Cd,
    Gamma180Cd,
    Gamma182Cd,
    Gamma184Cd,
    Gamma186Cd,
    Gamma188Cd,
    Gamma190Cd,
    Gamma200Cd,
    Gamma210Cd,
    Gamma220Cd,
    Gamma230Cd,
    Gamma240Cd,
    Gamma250Cd,
    Gamma300Cd,
}

/// Nit value of each bucket, indexed by `GammaLevel as usize`.
const NITS: [u16; GammaLevel::COUNT] = [
    20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120, 130, 140, 150, 160, 170, 180, 182, 184, 186,
    188, 190, 200, 210, 220, 230, 240, 250, 300,
];

const fn strictly_increasing(values: &[u16]) -> bool {
    let mut i = 1;
    while i < values.len() {
        if values[i] <= values[i - 1] {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(strictly_increasing(&NITS), "bucket nits must be strictly increasing");

impl GammaLevel {
    /// Number of buckets.
    pub const COUNT: usize = 29;

    /// Every bucket, dimmest first.
    pub const ALL: [GammaLevel; GammaLevel::COUNT] = [
        GammaLevel::Gamma20Cd,
        GammaLevel::Gamma30Cd,
        GammaLevel::Gamma40Cd,
        GammaLevel::Gamma50Cd,
        GammaLevel::Gamma60Cd,
        GammaLevel::Gamma70Cd,
        GammaLevel::Gamma80Cd,
        GammaLevel::Gamma90Cd,
        GammaLevel::Gamma100Cd,
        GammaLevel::Gamma110Cd,
        GammaLevel::Gamma120Cd,
        GammaLevel::Gamma130Cd,
        GammaLevel::Gamma140Cd,
        GammaLevel::Gamma150Cd,
        GammaLevel::Gamma160Cd,
        GammaLevel::Gamma170Cd,
        GammaLevel::Gamma180Cd,
        GammaLevel::Gamma182Cd,
        GammaLevel::Gamma184Cd,
        GammaLevel::Gamma186Cd,
        GammaLevel::Gamma188Cd,
        GammaLevel::Gamma190Cd,
        GammaLevel::Gamma200Cd,
        GammaLevel::Gamma210Cd,
        GammaLevel::Gamma220Cd,
        GammaLevel::Gamma230Cd,
        GammaLevel::Gamma240Cd,
        GammaLevel::Gamma250Cd,
        GammaLevel::Gamma300Cd,
    ];

    /// Dimmest and brightest buckets.
    pub const MIN: GammaLevel = GammaLevel::Gamma20Cd;
    pub const MAX: GammaLevel = GammaLevel::Gamma300Cd;

    /// Position of this bucket in every per-level table.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bucket at table position `index`, if any.
    #[inline]
    pub fn from_index(index: usize) -> Option<GammaLevel> {
        Self::ALL.get(index).copied()
    }

    /// Luminance this bucket is calibrated for, in nits (cd/m²).
    #[inline]
    pub const fn nits(self) -> u16 {
        NITS[self as usize]
    }

    /// Exact match only; use [`resolve`] for arbitrary requests.
    pub fn from_nits(nits: u16) -> Option<GammaLevel> {
        NITS.binary_search(&nits).ok().map(|i| Self::ALL[i])
    }
}

/// Map any requested luminance to a supported bucket.
///
/// Picks the brightest bucket that does not exceed the request, so the panel is
/// never driven harder than asked. Requests below 20 nit land on the dimmest
/// bucket and requests above 300 nit on the brightest one.
pub fn resolve(requested_nits: i32) -> GammaLevel {
    if requested_nits <= i32::from(GammaLevel::MIN.nits()) {
        return GammaLevel::MIN;
    }
    if requested_nits >= i32::from(GammaLevel::MAX.nits()) {
        return GammaLevel::MAX;
    }
    // In range, so the cast cannot truncate.
    let nits = requested_nits as u16;
    let at_or_below = NITS.partition_point(|&n| n <= nits);
    GammaLevel::ALL[at_or_below - 1]
}
