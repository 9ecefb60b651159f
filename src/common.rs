//! Shared types: cell states, shot outcomes and error enums.

use core::fmt;

use crate::bitboard::BitBoardError;
use crate::config::GRID_SIZE;
use crate::region::RegionId;
use crate::ship::ShipType;

/// What is known about one cell of the opponent grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Unknown,
    Hit,
    Miss,
}

impl CellState {
    /// Hit or miss: the cell has been fired at.
    pub fn is_resolved(self) -> bool {
        !matches!(self, CellState::Unknown)
    }
}

/// Outcome of firing at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    /// Struck a ship that is still afloat.
    Hit,
    /// Open water.
    Miss,
    /// Struck the last intact segment of the given ship.
    Sink(ShipType),
}

impl GuessResult {
    pub fn is_hit(self) -> bool {
        !matches!(self, GuessResult::Miss)
    }
}

/// Errors returned by [`Board`](crate::Board) operations.
#[derive(Debug, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error (invalid size or index).
    BitBoardError(BitBoardError),
    /// Ship index is out of range for the fleet.
    InvalidIndex,
    /// Attempted to place a ship that is already placed.
    ShipAlreadyPlaced,
    /// Ship placement overlaps another ship.
    ShipOverlaps,
    /// Ship does not fit inside the grid.
    ShipOutOfBounds,
    /// Random placement gave up.
    UnableToPlaceShip,
    /// Cell was already fired at.
    AlreadyGuessed,
    /// A ship cell was struck but no placed ship claims it.
    UnknownShipHit,
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoardError(err)
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            BoardError::InvalidIndex => write!(f, "Ship index is out of range"),
            BoardError::ShipAlreadyPlaced => write!(f, "Ship is already placed on the board"),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
            BoardError::AlreadyGuessed => write!(f, "Cell was already fired at"),
            BoardError::UnknownShipHit => write!(f, "Hit a ship cell that no ship owns"),
        }
    }
}

/// Errors raised by the targeting engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetingError {
    /// Coordinate outside the grid.
    OutOfBounds { row: usize, col: usize },
    /// A result was already recorded for this cell.
    AlreadyRecorded { row: usize, col: usize },
    /// Region index outside the partition.
    InvalidRegion(usize),
    /// Region footprint with a zero side.
    InvalidRegionSize { rows: usize, cols: usize },
    /// Fleet entry that cannot fit on the grid.
    InvalidShipLength(usize),
    /// Tier thresholds that are not strictly increasing above the low base.
    InvalidThresholds { average: u32, high: u32 },
    /// Tier bookkeeping lost track of a region heap.
    RegionNotTiered(RegionId),
    /// No region heap sits in any tier.
    AllTiersEmpty,
    /// Every sampled region came back empty or stale.
    RetriesExhausted,
    /// Every cell of the grid has been fired at.
    NoTargetsRemain,
}

impl fmt::Display for TargetingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetingError::OutOfBounds { row, col } => {
                write!(f, "Cell ({}, {}) is outside the grid", row, col)
            }
            TargetingError::AlreadyRecorded { row, col } => {
                write!(f, "Cell ({}, {}) already has a recorded result", row, col)
            }
            TargetingError::InvalidRegion(idx) => write!(f, "Region index {} is out of range", idx),
            TargetingError::InvalidRegionSize { rows, cols } => {
                write!(f, "Region size {}x{} is invalid", rows, cols)
            }
            TargetingError::InvalidShipLength(len) => {
                write!(f, "Ship length {} does not fit a {}x{} grid", len, GRID_SIZE, GRID_SIZE)
            }
            TargetingError::InvalidThresholds { average, high } => write!(
                f,
                "Tier thresholds average={} high={} are not increasing",
                average, high
            ),
            TargetingError::RegionNotTiered(id) => {
                write!(f, "Region {} could not be found in its tier", id.index())
            }
            TargetingError::AllTiersEmpty => write!(f, "All probability tiers are empty"),
            TargetingError::RetriesExhausted => write!(f, "Gave up sampling probability tiers"),
            TargetingError::NoTargetsRemain => write!(f, "No unresolved cells remain"),
        }
    }
}

/// Failure while playing one turn of a game.
#[derive(Debug, PartialEq, Eq)]
pub enum TurnError {
    Board(BoardError),
    Targeting(TargetingError),
    /// The game did not finish within the allowed number of turns.
    TurnLimit(usize),
}

impl From<BoardError> for TurnError {
    fn from(err: BoardError) -> Self {
        TurnError::Board(err)
    }
}

impl From<TargetingError> for TurnError {
    fn from(err: TargetingError) -> Self {
        TurnError::Targeting(err)
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::Board(e) => write!(f, "Board error: {}", e),
            TurnError::Targeting(e) => write!(f, "Targeting error: {}", e),
            TurnError::TurnLimit(n) => write!(f, "Game still running after {} turns", n),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
#[cfg(feature = "std")]
impl std::error::Error for TargetingError {}
#[cfg(feature = "std")]
impl std::error::Error for TurnError {}
