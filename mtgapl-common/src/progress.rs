// mtgapl-common/src/progress.rs
//! Permille progress accounting shared by every pipeline stage.

use std::fmt;

/// Completion of one operation in thousandths, always within `0..=1000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProgressUnit(u16);

impl ProgressUnit {
    pub const MAX_VALUE: u16 = 1000;
    pub const ZERO: ProgressUnit = ProgressUnit(0);
    pub const DONE: ProgressUnit = ProgressUnit(Self::MAX_VALUE);

    /// Builds a unit from a raw permille value, clamping anything above 1000.
    pub fn new(permille: u64) -> Self {
        ProgressUnit(permille.min(Self::MAX_VALUE as u64) as u16)
    }

    /// `floor(done * 1000 / total)`. A zero total counts as finished.
    pub fn ratio(done: u64, total: u64) -> Self {
        if total == 0 {
            return Self::DONE;
        }
        let permille = (done as u128 * Self::MAX_VALUE as u128) / total as u128;
        Self::new(permille.min(Self::MAX_VALUE as u128) as u64)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ProgressUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}%", self.0 / 10, self.0 % 10)
    }
}

impl From<ProgressUnit> for u64 {
    fn from(unit: ProgressUnit) -> Self {
        unit.0 as u64
    }
}

/// Callback type used by the individual stages.
pub type ProgressFn<'a> = dyn FnMut(ProgressUnit) + 'a;
