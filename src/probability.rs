// Placement-count model of the opponent grid.
// Integer counts only; no normalization is needed for ranking cells.

use core::fmt;

use crate::board::GridView;
use crate::common::TargetingError;
use crate::config::GRID_SIZE;
use crate::heap::ProbEntry;
use crate::region::Area;
use crate::shots::ShotGrid;

/// Fit count of every cell: how many placements of the remaining ships cover it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbabilityGrid {
    cells: [[u32; GRID_SIZE]; GRID_SIZE],
}

impl ProbabilityGrid {
    /// All zeros.
    pub fn new() -> Self {
        ProbabilityGrid {
            cells: [[0; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Full computation for every cell.
    pub fn initialize(shots: &ShotGrid, lengths: &[usize]) -> Self {
        let mut grid = Self::new();
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                grid.cells[r][c] = fit_count(shots, lengths, r, c);
            }
        }
        grid
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.cells.get(row)?.get(col).copied()
    }

    /// Recompute a single cell after a nearby shot and return its new count.
    pub fn recompute(
        &mut self,
        shots: &ShotGrid,
        lengths: &[usize],
        row: usize,
        col: usize,
    ) -> Result<u32, TargetingError> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(TargetingError::OutOfBounds { row, col });
        }
        let count = fit_count(shots, lengths, row, col);
        self.cells[row][col] = count;
        Ok(count)
    }

    /// Recompute every in-grid cell of `area`.
    pub fn refresh_area(
        &mut self,
        area: Area,
        shots: &ShotGrid,
        lengths: &[usize],
    ) -> Result<(), TargetingError> {
        for (r, c) in area.cells().filter(|&(r, c)| r < GRID_SIZE && c < GRID_SIZE) {
            self.recompute(shots, lengths, r, c)?;
        }
        Ok(())
    }

    /// Sum over the whole grid.
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().map(|&v| v as u64).sum()
    }

    /// Linear scan for the best unresolved cell. Falls back to the first
    /// unresolved zero-count cell when nothing has a positive count.
    pub fn best_unresolved(&self, shots: &ShotGrid) -> Option<ProbEntry> {
        let mut best: Option<ProbEntry> = None;
        let mut spare = None;
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                if shots.is_resolved(r, c) {
                    continue;
                }
                let entry = ProbEntry::new(self.cells[r][c], r, c);
                if entry.prob == 0 {
                    spare.get_or_insert(entry);
                } else if best.map_or(true, |b| entry > b) {
                    best = Some(entry);
                }
            }
        }
        best.or(spare)
    }
}

impl Default for ProbabilityGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of in-bounds placements of each length in `lengths` that cover
/// (row, col) without touching a blocked cell. Zero for resolved cells.
pub fn fit_count(shots: &ShotGrid, lengths: &[usize], row: usize, col: usize) -> u32 {
    if row >= GRID_SIZE || col >= GRID_SIZE || shots.is_resolved(row, col) {
        return 0;
    }
    let mut count = 0;
    for &len in lengths {
        if len == 0 || len > GRID_SIZE {
            continue;
        }
        count += line_fits(len, col, |k| shots.is_blocked(row, k));
        count += line_fits(len, row, |k| shots.is_blocked(k, col));
    }
    count
}

// Windows of `len` along one line that contain `pos` and avoid blocked cells.
fn line_fits<F: Fn(usize) -> bool>(len: usize, pos: usize, blocked: F) -> u32 {
    let first = (pos + 1).saturating_sub(len);
    let last = pos.min(GRID_SIZE - len);
    (first..=last)
        .filter(|&start| !(start..start + len).any(&blocked))
        .count() as u32
}

impl fmt::Display for ProbabilityGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for c in 0..GRID_SIZE {
            write!(f, " {:>3}", (b'A' + c as u8) as char)?;
        }
        writeln!(f)?;
        for (r, row) in self.cells.iter().enumerate() {
            write!(f, "{:2} ", r + 1)?;
            for v in row {
                write!(f, " {:>3}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
