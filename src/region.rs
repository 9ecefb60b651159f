//! Spatial partition of the grid into fixed-size rectangular regions.
//!
//! Regions are numbered row-major. The last region in a row or column may be
//! partial when the grid side is not a multiple of the region side.

use crate::common::TargetingError;

/// Stable handle of a region: its row-major index in the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(usize);

impl RegionId {
    pub const fn new(index: usize) -> Self {
        RegionId(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Inclusive rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub row0: usize,
    pub row1: usize,
    pub col0: usize,
    pub col1: usize,
}

impl Area {
    /// Every cell within `reach` of (row, col) on both axes, clamped to a
    /// `rows × cols` grid.
    pub fn around(row: usize, col: usize, reach: usize, rows: usize, cols: usize) -> Self {
        Area {
            row0: row.saturating_sub(reach),
            row1: row.saturating_add(reach).min(rows.saturating_sub(1)),
            col0: col.saturating_sub(reach),
            col1: col.saturating_add(reach).min(cols.saturating_sub(1)),
        }
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row0..=self.row1).contains(&row) && (self.col0..=self.col1).contains(&col)
    }

    /// Cells of the rectangle, row-major.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.row0..=self.row1).flat_map(move |r| (self.col0..=self.col1).map(move |c| (r, c)))
    }
}

/// Region geometry for a `rows × cols` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionLayout {
    rows: usize,
    cols: usize,
    region_rows: usize,
    region_cols: usize,
    regions_per_row: usize,
    regions_per_col: usize,
}

impl RegionLayout {
    pub fn new(
        rows: usize,
        cols: usize,
        region_rows: usize,
        region_cols: usize,
    ) -> Result<Self, TargetingError> {
        if region_rows == 0 || region_cols == 0 {
            return Err(TargetingError::InvalidRegionSize {
                rows: region_rows,
                cols: region_cols,
            });
        }
        Ok(RegionLayout {
            rows,
            cols,
            region_rows,
            region_cols,
            regions_per_row: cols.div_ceil(region_cols),
            regions_per_col: rows.div_ceil(region_rows),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Region footprint as (rows, cols).
    pub fn region_size(&self) -> (usize, usize) {
        (self.region_rows, self.region_cols)
    }

    pub fn regions_per_row(&self) -> usize {
        self.regions_per_row
    }

    pub fn region_count(&self) -> usize {
        self.regions_per_row * self.regions_per_col
    }

    /// Owning region of (row, col), or `None` outside the grid.
    pub fn region_of(&self, row: usize, col: usize) -> Option<RegionId> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(RegionId(
            (row / self.region_rows) * self.regions_per_row + col / self.region_cols,
        ))
    }

    /// Checks that `index` names a region of this partition.
    pub fn region(&self, index: usize) -> Result<RegionId, TargetingError> {
        if index < self.region_count() {
            Ok(RegionId(index))
        } else {
            Err(TargetingError::InvalidRegion(index))
        }
    }

    /// Cell rectangle covered by a region.
    pub fn bounds(&self, id: RegionId) -> Option<Area> {
        if id.0 >= self.region_count() {
            return None;
        }
        let row0 = (id.0 / self.regions_per_row) * self.region_rows;
        let col0 = (id.0 % self.regions_per_row) * self.region_cols;
        Some(Area {
            row0,
            row1: (row0 + self.region_rows).min(self.rows) - 1,
            col0,
            col1: (col0 + self.region_cols).min(self.cols) - 1,
        })
    }

    /// Cells of a region, row-major. Empty for an unknown id.
    pub fn cells(&self, id: RegionId) -> impl Iterator<Item = (usize, usize)> {
        self.bounds(id).into_iter().flat_map(Area::cells)
    }

    /// Every region intersecting `area`, each exactly once.
    ///
    /// A cursor starts at the region origin of the area's top-left corner and
    /// jumps by whole region strides, so no per-cell lookup or dedup is needed.
    pub fn regions_in(&self, area: Area) -> RegionsIn {
        let row1 = area.row1.min(self.rows.saturating_sub(1));
        let col1 = area.col1.min(self.cols.saturating_sub(1));
        let empty = self.rows == 0 || self.cols == 0 || area.row0 > row1 || area.col0 > col1;
        let row_start = area.row0 - area.row0 % self.region_rows;
        let col_start = area.col0 - area.col0 % self.region_cols;
        RegionsIn {
            layout: *self,
            row: if empty { usize::MAX } else { row_start },
            col: col_start,
            col_start,
            row1,
            col1,
        }
    }
}

/// Iterator returned by [`RegionLayout::regions_in`].
#[derive(Debug, Clone)]
pub struct RegionsIn {
    layout: RegionLayout,
    row: usize,
    col: usize,
    col_start: usize,
    row1: usize,
    col1: usize,
}

impl Iterator for RegionsIn {
    type Item = RegionId;

    fn next(&mut self) -> Option<RegionId> {
        if self.row > self.row1 {
            return None;
        }
        let id = self.layout.region_of(self.row, self.col)?;
        self.col += self.layout.region_cols;
        if self.col > self.col1 {
            self.col = self.col_start;
            self.row += self.layout.region_rows;
        }
        Some(id)
    }
}
