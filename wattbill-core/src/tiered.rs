//! Declining-block demand charge.

use serde::{Deserialize, Serialize};
use wattbill_quantities::{Cost, Kilowatts, KilowattRate};

/// End of the first block.
pub const FIRST_BLOCK_END: Kilowatts = Kilowatts::new(3.0);

/// End of the second block, everything above is billed at the third rate.
pub const SECOND_BLOCK_END: Kilowatts = Kilowatts::new(10.0);

/// Per-kilowatt rates of the three demand blocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandTiers {
    /// Up to [`FIRST_BLOCK_END`].
    pub first: KilowattRate,

    /// From [`FIRST_BLOCK_END`] up to [`SECOND_BLOCK_END`].
    pub second: KilowattRate,

    /// Above [`SECOND_BLOCK_END`].
    pub third: KilowattRate,
}

impl DemandTiers {
    pub fn new(first: f64, second: f64, third: f64) -> Self {
        Self { first: first.into(), second: second.into(), third: third.into() }
    }

    /// Demand charge for the period peak.
    ///
    /// Any non-zero peak within the first block is billed a flat minimum of the first rate,
    /// not a fraction of it.
    pub fn charge(&self, peak: Kilowatts) -> Cost {
        if peak <= Kilowatts::ZERO {
            Cost::ZERO
        } else if peak <= FIRST_BLOCK_END {
            Cost::new(self.first.get())
        } else if peak <= SECOND_BLOCK_END {
            FIRST_BLOCK_END * self.first + (peak - FIRST_BLOCK_END) * self.second
        } else {
            FIRST_BLOCK_END * self.first
                + (SECOND_BLOCK_END - FIRST_BLOCK_END) * self.second
                + (peak - SECOND_BLOCK_END) * self.third
        }
    }
}
