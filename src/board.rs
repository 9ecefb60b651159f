//! The opponent's fleet board: ship placement and the `fire` primitive the
//! targeting engine shoots through.

use alloc::vec::Vec;
use core::fmt;
use rand::Rng;

use crate::bitboard::GridMask;
use crate::common::{BoardError, CellState, GuessResult};
use crate::config::{GRID_SIZE, SHIPS};
use crate::ship::{Orientation, Ship, ShipType};

/// Read access to the public face of a grid: which cells were fired at and how
/// they resolved.
pub trait GridView {
    /// State of (row, col), or `None` when the cell lies outside the grid.
    fn state(&self, row: usize, col: usize) -> Option<CellState>;

    fn is_resolved(&self, row: usize, col: usize) -> bool {
        self.state(row, col).is_some_and(CellState::is_resolved)
    }
}

/// Ship placements plus the record of shots taken against them.
pub struct Board {
    fleet: Vec<ShipType>,
    ships: Vec<Option<Ship>>,
    ship_map: GridMask,
    hits: GridMask,
    misses: GridMask,
}

impl Board {
    /// Empty board for the standard fleet.
    pub fn new() -> Self {
        Self::with_fleet(&SHIPS)
    }

    /// Empty board for an arbitrary fleet.
    pub fn with_fleet(fleet: &[ShipType]) -> Self {
        Board {
            fleet: fleet.to_vec(),
            ships: alloc::vec![None; fleet.len()],
            ship_map: GridMask::new(),
            hits: GridMask::new(),
            misses: GridMask::new(),
        }
    }

    pub fn fleet(&self) -> &[ShipType] {
        &self.fleet
    }

    /// Lengths of the fleet, in fleet order.
    pub fn fleet_lengths(&self) -> Vec<usize> {
        self.fleet.iter().map(|s| s.length()).collect()
    }

    /// Occupancy mask of all placed ships.
    pub fn ship_map(&self) -> GridMask {
        self.ship_map
    }

    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().flatten()
    }

    /// Every placed ship is sunk. An empty board counts as defeated.
    pub fn all_sunk(&self) -> bool {
        self.ships().all(Ship::is_sunk)
    }

    /// Place fleet entry `ship_index` at (row, col).
    pub fn place(
        &mut self,
        ship_index: usize,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<(), BoardError> {
        let def = *self.fleet.get(ship_index).ok_or(BoardError::InvalidIndex)?;
        if self.ships[ship_index].is_some() {
            return Err(BoardError::ShipAlreadyPlaced);
        }
        let ship = Ship::new(def, orientation, row, col)?;
        if !self.ship_map.is_disjoint(&ship.mask()) {
            return Err(BoardError::ShipOverlaps);
        }
        self.ship_map = self.ship_map | ship.mask();
        self.ships[ship_index] = Some(ship);
        Ok(())
    }

    /// A random in-bounds, non-overlapping spot for fleet entry `ship_index`.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        ship_index: usize,
    ) -> Result<(usize, usize, Orientation), BoardError> {
        let def = *self.fleet.get(ship_index).ok_or(BoardError::InvalidIndex)?;
        if def.length() == 0 || def.length() > GRID_SIZE {
            return Err(BoardError::ShipOutOfBounds);
        }
        for _ in 0..100 {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let span = GRID_SIZE - def.length();
            let (max_r, max_c) = match orient {
                Orientation::Horizontal => (GRID_SIZE - 1, span),
                Orientation::Vertical => (span, GRID_SIZE - 1),
            };
            let r = rng.random_range(0..=max_r);
            let c = rng.random_range(0..=max_c);
            let ship = Ship::new(def, orient, r, c)?;
            if self.ship_map.is_disjoint(&ship.mask()) {
                return Ok((r, c, orient));
            }
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Place every not-yet-placed ship at a random spot.
    pub fn place_randomly<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), BoardError> {
        for i in 0..self.fleet.len() {
            if self.ships[i].is_some() {
                continue;
            }
            let (r, c, o) = self.random_placement(rng, i)?;
            self.place(i, r, c, o)?;
        }
        Ok(())
    }

    /// Fire at (row, col).
    pub fn fire(&mut self, row: usize, col: usize) -> Result<GuessResult, BoardError> {
        if self.hits.contains(row, col)? || self.misses.contains(row, col)? {
            return Err(BoardError::AlreadyGuessed);
        }
        if !self.ship_map.contains(row, col)? {
            self.misses.insert(row, col)?;
            return Ok(GuessResult::Miss);
        }
        self.hits.insert(row, col)?;
        let ship = self
            .ships
            .iter_mut()
            .flatten()
            .find(|s| s.occupies(row, col))
            .ok_or(BoardError::UnknownShipHit)?;
        ship.strike(row, col);
        if ship.is_sunk() {
            Ok(GuessResult::Sink(ship.ship_type()))
        } else {
            Ok(GuessResult::Hit)
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl GridView for Board {
    fn state(&self, row: usize, col: usize) -> Option<CellState> {
        if self.hits.contains(row, col).ok()? {
            Some(CellState::Hit)
        } else if self.misses.contains(row, col).ok()? {
            Some(CellState::Miss)
        } else {
            Some(CellState::Unknown)
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  ship_map: {:?},\n  hits: {:?},\n  misses: {:?},\n  ships: {:?}\n}}",
            self.ship_map, self.hits, self.misses, self.ships
        )
    }
}
