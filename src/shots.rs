//! The bot's record of its own shots against the opponent grid.

use core::fmt;

use crate::bitboard::GridMask;
use crate::board::GridView;
use crate::common::{CellState, TargetingError};
use crate::config::GRID_SIZE;

/// Hits and misses observed so far, plus the hit cells already attributed to
/// sunk ships. Sunk cells block ship placements the same way misses do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotGrid {
    hits: GridMask,
    misses: GridMask,
    sunk: GridMask,
}

impl ShotGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> GridMask {
        self.hits
    }

    pub fn misses(&self) -> GridMask {
        self.misses
    }

    pub fn sunk(&self) -> GridMask {
        self.sunk
    }

    /// Number of cells fired at.
    pub fn shots(&self) -> usize {
        self.hits.len() + self.misses.len()
    }

    pub fn is_hit(&self, row: usize, col: usize) -> bool {
        self.hits.contains(row, col).unwrap_or(false)
    }

    /// A ship placement may not cover this cell.
    pub fn is_blocked(&self, row: usize, col: usize) -> bool {
        self.misses.contains(row, col).unwrap_or(true) || self.sunk.contains(row, col).unwrap_or(true)
    }

    /// Store the outcome of a shot. Rejects out-of-range and repeated cells.
    pub fn record(&mut self, row: usize, col: usize, hit: bool) -> Result<(), TargetingError> {
        match self.state(row, col) {
            None => Err(TargetingError::OutOfBounds { row, col }),
            Some(CellState::Unknown) => {
                let mask = if hit { &mut self.hits } else { &mut self.misses };
                mask.insert(row, col)
                    .map_err(|_| TargetingError::OutOfBounds { row, col })?;
                Ok(())
            }
            Some(_) => Err(TargetingError::AlreadyRecorded { row, col }),
        }
    }

    /// Mark a hit cell as belonging to a sunk ship.
    pub fn mark_sunk(&mut self, row: usize, col: usize) -> bool {
        self.is_hit(row, col) && self.sunk.insert(row, col).unwrap_or(false)
    }
}

impl GridView for ShotGrid {
    fn state(&self, row: usize, col: usize) -> Option<CellState> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            None
        } else if self.is_hit(row, col) {
            Some(CellState::Hit)
        } else if self.misses.contains(row, col).unwrap_or(false) {
            Some(CellState::Miss)
        } else {
            Some(CellState::Unknown)
        }
    }
}

impl fmt::Display for ShotGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for c in 0..GRID_SIZE {
            write!(f, " {}", (b'A' + c as u8) as char)?;
        }
        writeln!(f)?;
        for r in 0..GRID_SIZE {
            write!(f, "{:2} ", r + 1)?;
            for c in 0..GRID_SIZE {
                let ch = if self.sunk.contains(r, c).unwrap_or(false) {
                    '#'
                } else {
                    match self.state(r, c) {
                        Some(CellState::Hit) => 'X',
                        Some(CellState::Miss) => 'o',
                        _ => '.',
                    }
                };
                write!(f, " {}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
