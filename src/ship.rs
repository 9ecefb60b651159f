//! Ship definitions and placed ships tracked on a [`GridMask`].

use core::fmt;

use crate::bitboard::GridMask;
use crate::common::BoardError;
use crate::config::GRID_SIZE;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Cell `offset` steps from (row, col) along this orientation.
    pub fn step(self, row: usize, col: usize, offset: usize) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (row, col + offset),
            Orientation::Vertical => (row + offset, col),
        }
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShipType {
    name: &'static str,
    length: usize,
}

impl ShipType {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship placed on the grid, remembering which of its segments were struck.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    ship_type: ShipType,
    orientation: Orientation,
    row: usize,
    col: usize,
    mask: GridMask,
    hits: GridMask,
}

impl Ship {
    /// Place `ship_type` with its bow at (`row`, `col`).
    pub fn new(
        ship_type: ShipType,
        orientation: Orientation,
        row: usize,
        col: usize,
    ) -> Result<Self, BoardError> {
        let len = ship_type.length();
        let (end_row, end_col) = orientation.step(row, col, len.saturating_sub(1));
        if len == 0 || end_row >= GRID_SIZE || end_col >= GRID_SIZE {
            return Err(BoardError::ShipOutOfBounds);
        }
        let mask = GridMask::from_cells((0..len).map(|k| orientation.step(row, col, k)))?;
        Ok(Ship {
            ship_type,
            orientation,
            row,
            col,
            mask,
            hits: GridMask::new(),
        })
    }

    /// Record a strike at (`row`, `col`); returns `true` if it lands on this ship.
    pub fn strike(&mut self, row: usize, col: usize) -> bool {
        if self.mask.contains(row, col).unwrap_or(false) {
            let _ = self.hits.insert(row, col);
            true
        } else {
            false
        }
    }

    pub fn occupies(&self, row: usize, col: usize) -> bool {
        self.mask.contains(row, col).unwrap_or(false)
    }

    pub fn is_sunk(&self) -> bool {
        self.hits.len() == self.ship_type.length()
    }

    pub fn ship_type(&self) -> ShipType {
        self.ship_type
    }

    pub fn origin(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn mask(&self) -> GridMask {
        self.mask
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", origin: ({}, {}), orientation: {:?}, hits: {} }}",
            self.ship_type.name(),
            self.row,
            self.col,
            self.orientation,
            self.hits.len(),
        )
    }
}
