use alloc::vec::Vec;

use crate::common::TargetingError;
use crate::ship::ShipType;
use crate::targeting::RiskPosture;
use crate::tiers::TierThresholds;

pub const BOARD_SIZE: u8 = 10;
pub const GRID_SIZE: usize = BOARD_SIZE as usize;

pub const NUM_SHIPS: usize = 4;
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new("Submarine", 2),
    ShipType::new("Destroyer", 3),
    ShipType::new("Battleship", 4),
    ShipType::new("Carrier", 5),
];

/// Default region footprint as (rows, cols). 1×1 turns every cell into its own region.
pub const REGION_SIZE: (usize, usize) = (3, 3);

/// Smallest probability a region maximum needs to sit in any tier.
pub const LOWPROB_BASE: u32 = 1;

/// Region samples attempted before tiered selection gives up for the turn.
pub const MAX_PICK_RETRIES: usize = 8;

/// Lengths of the standard fleet, in table order.
pub fn ship_lengths() -> Vec<usize> {
    SHIPS.iter().map(|s| s.length()).collect()
}

/// Look up a ship of the standard fleet by name.
pub fn ship_by_name(name: &str) -> Option<ShipType> {
    SHIPS.iter().copied().find(|s| s.name() == name)
}

/// Tunables of one bot's targeting engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct TargetingConfig {
    pub region_rows: usize,
    pub region_cols: usize,
    pub thresholds: TierThresholds,
    pub risk: RiskPosture,
    pub max_pick_retries: usize,
}

impl TargetingConfig {
    /// Defaults with tier thresholds scaled to the given fleet.
    pub fn for_fleet(lengths: &[usize]) -> Self {
        Self {
            region_rows: REGION_SIZE.0,
            region_cols: REGION_SIZE.1,
            thresholds: TierThresholds::for_fleet(lengths),
            risk: RiskPosture::Normal,
            max_pick_retries: MAX_PICK_RETRIES,
        }
    }

    pub fn with_risk(mut self, risk: RiskPosture) -> Self {
        self.risk = risk;
        self
    }

    pub fn with_region_size(mut self, rows: usize, cols: usize) -> Self {
        self.region_rows = rows;
        self.region_cols = cols;
        self
    }

    pub fn validate(&self) -> Result<(), TargetingError> {
        if self.region_rows == 0 || self.region_cols == 0 {
            return Err(TargetingError::InvalidRegionSize {
                rows: self.region_rows,
                cols: self.region_cols,
            });
        }
        self.thresholds.validate()
    }
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self::for_fleet(&ship_lengths())
    }
}
