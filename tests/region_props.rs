use std::collections::BTreeSet;

use battleship_targeting::{Area, RegionId, RegionLayout, TargetingError};
use proptest::prelude::*;

#[test]
fn standard_layout_numbering() {
    let layout = RegionLayout::new(10, 10, 3, 3).unwrap();
    assert_eq!(layout.region_count(), 16);
    assert_eq!(layout.regions_per_row(), 4);
    assert_eq!(layout.region_of(0, 0), Some(RegionId::new(0)));
    assert_eq!(layout.region_of(4, 2), Some(RegionId::new(4)));
    assert_eq!(layout.region_of(9, 9), Some(RegionId::new(15)));
    assert_eq!(layout.region_of(10, 0), None);

    // the last column of regions is a single cell wide
    let corner = layout.bounds(RegionId::new(15)).unwrap();
    assert_eq!(corner, Area { row0: 9, row1: 9, col0: 9, col1: 9 });
    assert_eq!(layout.cells(RegionId::new(3)).count(), 3);
}

#[test]
fn invalid_region_inputs() {
    assert_eq!(
        RegionLayout::new(10, 10, 0, 3).unwrap_err(),
        TargetingError::InvalidRegionSize { rows: 0, cols: 3 }
    );
    let layout = RegionLayout::new(10, 10, 3, 3).unwrap();
    assert_eq!(layout.region(16), Err(TargetingError::InvalidRegion(16)));
    assert!(layout.bounds(RegionId::new(16)).is_none());
    assert_eq!(layout.cells(RegionId::new(99)).count(), 0);
}

#[test]
fn single_cell_regions() {
    let layout = RegionLayout::new(10, 10, 1, 1).unwrap();
    assert_eq!(layout.region_count(), 100);
    assert_eq!(layout.region_of(7, 3), Some(RegionId::new(73)));
    let area = Area::around(0, 0, 1, 10, 10);
    let ids: Vec<_> = layout.regions_in(area).map(RegionId::index).collect();
    assert_eq!(ids, vec![0, 1, 10, 11]);
}

#[test]
fn area_around_clamps_to_grid() {
    let area = Area::around(1, 8, 3, 10, 10);
    assert_eq!(area, Area { row0: 0, row1: 4, col0: 5, col1: 9 });
    assert!(area.contains(4, 9));
    assert!(!area.contains(5, 9));
    assert_eq!(area.cells().count(), 25);
}

#[test]
fn area_around_saturates_huge_reach() {
    let area = Area::around(4, 4, usize::MAX, 10, 10);
    assert_eq!(area, Area { row0: 0, row1: 9, col0: 0, col1: 9 });
    let area = Area::around(usize::MAX - 1, 3, usize::MAX, 10, 10);
    assert_eq!((area.row0, area.row1), (0, 9));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_cell_maps_into_range(grid in 1usize..16, size in 1usize..6) {
        let layout = RegionLayout::new(grid, grid, size, size).unwrap();
        let per_side = grid.div_ceil(size);
        prop_assert_eq!(layout.region_count(), per_side * per_side);
        for r in 0..grid {
            for c in 0..grid {
                let id = layout.region_of(r, c).unwrap();
                prop_assert!(id.index() < per_side * per_side);
                prop_assert_eq!(layout.region_of(r, c), Some(id));
                let bounds = layout.bounds(id).unwrap();
                prop_assert!(bounds.contains(r, c));
            }
        }
    }

    #[test]
    fn regions_partition_the_grid(grid in 1usize..16, rows in 1usize..6, cols in 1usize..6) {
        let layout = RegionLayout::new(grid, grid, rows, cols).unwrap();
        let mut seen = BTreeSet::new();
        for idx in 0..layout.region_count() {
            for cell in layout.cells(RegionId::new(idx)) {
                prop_assert_eq!(layout.region_of(cell.0, cell.1), Some(RegionId::new(idx)));
                prop_assert!(seen.insert(cell));
            }
        }
        prop_assert_eq!(seen.len(), grid * grid);
    }

    #[test]
    fn regions_in_matches_cell_scan(
        grid in 1usize..16,
        rows in 1usize..6,
        cols in 1usize..6,
        row in 0usize..16,
        col in 0usize..16,
        reach in 0usize..6,
    ) {
        let (row, col) = (row % grid, col % grid);
        let layout = RegionLayout::new(grid, grid, rows, cols).unwrap();
        let area = Area::around(row, col, reach, grid, grid);

        let listed: Vec<RegionId> = layout.regions_in(area).collect();
        let unique: BTreeSet<RegionId> = listed.iter().copied().collect();
        prop_assert_eq!(unique.len(), listed.len(), "a region was listed twice");

        let expected: BTreeSet<RegionId> = area
            .cells()
            .filter_map(|(r, c)| layout.region_of(r, c))
            .collect();
        prop_assert_eq!(unique, expected);
    }
}
