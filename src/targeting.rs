//! Targeting controller for one bot.
//!
//! Owns the probability grid, one [`RegionHeap`] per region, the
//! [`TierClassifier`] over those heaps and the [`HuntScheduler`]. Each turn the
//! caller asks for a target with [`Targeting::choose_target`], fires it, then
//! reports the outcome with [`Targeting::notify_result`] before asking again.

use alloc::vec::Vec;
use rand::Rng;

use crate::bitboard::GridMask;
use crate::board::GridView;
use crate::common::{GuessResult, TargetingError};
use crate::config::{TargetingConfig, GRID_SIZE};
use crate::heap::{ProbEntry, RegionHeap};
use crate::hunt::{HuntScheduler, HuntState};
use crate::probability::ProbabilityGrid;
use crate::region::{Area, RegionId, RegionLayout};
use crate::shots::ShotGrid;
use crate::tiers::{Tier, TierClassifier};

/// How deterministic target selection is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize, clap::ValueEnum)
)]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum RiskPosture {
    /// Round-robin over the tiers, random region within the tier.
    #[default]
    Normal,
    /// Random region within the best non-empty tier.
    High,
    /// Always the single best cell.
    Extreme,
}

pub struct Targeting {
    config: TargetingConfig,
    layout: RegionLayout,
    fleet: Vec<usize>,
    remaining: Vec<usize>,
    shots: ShotGrid,
    open_hits: GridMask,
    grid: ProbabilityGrid,
    heaps: Vec<RegionHeap>,
    tiers: TierClassifier,
    hunt: HuntScheduler,
    cursor: Tier,
}

impl Targeting {
    /// Fresh state for a game against a fleet with the given ship lengths.
    pub fn new(config: TargetingConfig, fleet: &[usize]) -> Result<Self, TargetingError> {
        config.validate()?;
        if let Some(&len) = fleet.iter().find(|&&len| len == 0 || len > GRID_SIZE) {
            return Err(TargetingError::InvalidShipLength(len));
        }
        let layout = RegionLayout::new(GRID_SIZE, GRID_SIZE, config.region_rows, config.region_cols)?;
        let mut targeting = Targeting {
            config,
            layout,
            fleet: fleet.to_vec(),
            remaining: fleet.to_vec(),
            shots: ShotGrid::new(),
            open_hits: GridMask::new(),
            grid: ProbabilityGrid::new(),
            heaps: Vec::new(),
            tiers: TierClassifier::new(layout.region_count()),
            hunt: HuntScheduler::new(),
            cursor: Tier::High,
        };
        targeting.rebuild_all();
        Ok(targeting)
    }

    /// Back to the game-start state, keeping configuration and fleet.
    pub fn reset(&mut self) {
        self.remaining = self.fleet.clone();
        self.shots = ShotGrid::new();
        self.open_hits = GridMask::new();
        self.hunt.clear();
        self.cursor = Tier::High;
        self.rebuild_all();
    }

    pub fn config(&self) -> &TargetingConfig {
        &self.config
    }

    pub fn risk(&self) -> RiskPosture {
        self.config.risk
    }

    pub fn layout(&self) -> &RegionLayout {
        &self.layout
    }

    pub fn shots(&self) -> &ShotGrid {
        &self.shots
    }

    pub fn grid(&self) -> &ProbabilityGrid {
        &self.grid
    }

    pub fn tiers(&self) -> &TierClassifier {
        &self.tiers
    }

    pub fn hunt(&self) -> &HuntScheduler {
        &self.hunt
    }

    pub fn hunt_state(&self) -> HuntState {
        self.hunt.state()
    }

    /// Lengths of ships not yet reported sunk.
    pub fn remaining_lengths(&self) -> &[usize] {
        &self.remaining
    }

    /// Hits not yet attributed to a sunk ship.
    pub fn open_hits(&self) -> GridMask {
        self.open_hits
    }

    pub fn probability(&self, row: usize, col: usize) -> Option<u32> {
        self.grid.get(row, col)
    }

    pub fn heap(&self, id: RegionId) -> Option<&RegionHeap> {
        self.heaps.get(id.index())
    }

    /// Current maximum entry of a region heap.
    pub fn region_top(&self, id: RegionId) -> Option<ProbEntry> {
        self.heaps.get(id.index())?.peek_max()
    }

    /// Next cell to fire at. Pending hunt tasks come first, then tiered
    /// selection according to the risk posture. Never returns a resolved cell.
    pub fn choose_target<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(usize, usize), TargetingError> {
        if self.shots.shots() >= GRID_SIZE * GRID_SIZE {
            return Err(TargetingError::NoTargetsRemain);
        }

        let (shots, grid) = (&self.shots, &self.grid);
        if let Some(task) = self.hunt.next_valid(|r, c| is_live(grid, shots, r, c)) {
            let (row, col) = task.target();
            log::debug!("hunting ({}, {}), {} tasks left", row, col, self.hunt.len());
            return Ok((row, col));
        }

        let picked = match self.config.risk {
            RiskPosture::Normal => self.pick_round_robin(rng),
            RiskPosture::High => self.pick_random_top(rng),
            RiskPosture::Extreme => self.pick_best_top(),
        };
        match picked {
            Ok(entry) => {
                log::debug!(
                    "targeting ({}, {}) with fit count {}",
                    entry.row,
                    entry.col,
                    entry.prob
                );
                Ok((entry.row, entry.col))
            }
            Err(err) => {
                log::error!("tiered selection failed: {}; scanning the full grid", err);
                self.rebuild_all();
                self.grid
                    .best_unresolved(&self.shots)
                    .map(|e| (e.row, e.col))
                    .ok_or(TargetingError::NoTargetsRemain)
            }
        }
    }

    /// Record the outcome of a shot at (row, col). Must be called exactly once
    /// per shot, before the next [`choose_target`](Self::choose_target).
    pub fn notify_result(
        &mut self,
        row: usize,
        col: usize,
        result: GuessResult,
    ) -> Result<(), TargetingError> {
        self.shots.record(row, col, result.is_hit())?;
        match result {
            GuessResult::Miss => self.refresh_around(row, col)?,
            GuessResult::Hit => {
                let _ = self.open_hits.insert(row, col);
                self.refresh_around(row, col)?;
                let queued = self.schedule_follow_ups(row, col);
                log::debug!("hit at ({}, {}), {} follow-ups queued", row, col, queued);
            }
            GuessResult::Sink(ship) => {
                let _ = self.open_hits.insert(row, col);
                self.settle_sunk(row, col, ship.length());
                match self.remaining.iter().position(|&len| len == ship.length()) {
                    Some(i) => {
                        self.remaining.remove(i);
                    }
                    None => log::warn!(
                        "{} (length {}) reported sunk but no such ship remains",
                        ship.name(),
                        ship.length()
                    ),
                }
                log::info!("{} sunk at ({}, {})", ship.name(), row, col);
                self.rebuild_all();
                self.prune_hunt();
            }
        }
        Ok(())
    }

    /// Post-shot update: recompute fit counts in the box a remaining ship could
    /// span from (row, col), then rebuild and reclassify every region heap that
    /// box touches. A failing region is logged and skipped.
    pub fn refresh_around(&mut self, row: usize, col: usize) -> Result<(), TargetingError> {
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(TargetingError::OutOfBounds { row, col });
        }
        let reach = self.remaining.iter().copied().max().unwrap_or(1);
        let area = Area::around(row, col, reach, GRID_SIZE, GRID_SIZE);
        self.grid.refresh_area(area, &self.shots, &self.remaining)?;
        for id in self.layout.regions_in(area) {
            if let Err(err) = self.refresh_region(id) {
                log::error!("region {} not refreshed: {}", id.index(), err);
            }
        }
        Ok(())
    }

    /// Drain one region heap, re-read every entry from the grid, keep the live
    /// ones and move the region to the tier its new maximum belongs to.
    pub fn refresh_region(&mut self, id: RegionId) -> Result<(), TargetingError> {
        let heap = self
            .heaps
            .get_mut(id.index())
            .ok_or(TargetingError::InvalidRegion(id.index()))?;
        let mut fresh = RegionHeap::with_capacity(heap.len());
        for entry in heap.drain_max() {
            if let Some(updated) = live_entry(&self.grid, &self.shots, entry.row, entry.col) {
                fresh.insert(updated);
            }
        }
        *heap = fresh;
        self.reclassify(id)?;
        Ok(())
    }

    fn reclassify(&mut self, id: RegionId) -> Result<bool, TargetingError> {
        let max = self
            .heaps
            .get(id.index())
            .ok_or(TargetingError::InvalidRegion(id.index()))?
            .peek_max()
            .map_or(0, |e| e.prob);
        let target = self.config.thresholds.classify(max);
        self.tiers.relocate(id, target)
    }

    /// Recompute everything from the shot record: grid, heaps and tiers.
    fn rebuild_all(&mut self) {
        self.grid = ProbabilityGrid::initialize(&self.shots, &self.remaining);
        self.tiers.clear();
        let (layout, grid, shots) = (&self.layout, &self.grid, &self.shots);
        self.heaps = (0..layout.region_count())
            .map(|idx| {
                layout
                    .cells(RegionId::new(idx))
                    .filter_map(|(r, c)| live_entry(grid, shots, r, c))
                    .collect()
            })
            .collect();
        for idx in 0..self.heaps.len() {
            if let Err(err) = self.reclassify(RegionId::new(idx)) {
                log::error!("region {} not classified: {}", idx, err);
            }
        }
    }

    /// Top live entry of a region, dropping stale entries on the way.
    fn peek_live(&mut self, id: RegionId) -> Result<Option<ProbEntry>, TargetingError> {
        let (shots, grid) = (&self.shots, &self.grid);
        let heap = self
            .heaps
            .get_mut(id.index())
            .ok_or(TargetingError::InvalidRegion(id.index()))?;
        let before = heap.len();
        let top = heap.peek_max_where(|e| is_live(grid, shots, e.row, e.col));
        let dropped = before - heap.len();
        if dropped > 0 {
            log::warn!("region {} dropped {} stale entries", id.index(), dropped);
            self.reclassify(id)?;
        }
        Ok(top)
    }

    fn sample_tier<R: Rng + ?Sized>(
        &mut self,
        tier: Tier,
        rng: &mut R,
    ) -> Result<Option<ProbEntry>, TargetingError> {
        match self.tiers.pick(tier, rng) {
            Some(id) => self.peek_live(id),
            None => Ok(None),
        }
    }

    fn pick_round_robin<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<ProbEntry, TargetingError> {
        for _ in 0..self.config.max_pick_retries.max(1) {
            let tier = self.next_nonempty_tier()?;
            if let Some(entry) = self.sample_tier(tier, rng)? {
                self.cursor = tier.next();
                return Ok(entry);
            }
        }
        Err(TargetingError::RetriesExhausted)
    }

    fn next_nonempty_tier(&mut self) -> Result<Tier, TargetingError> {
        let mut tier = self.cursor;
        for _ in 0..Tier::COUNT {
            if !self.tiers.is_empty(tier) {
                self.cursor = tier;
                return Ok(tier);
            }
            tier = tier.next();
        }
        Err(TargetingError::AllTiersEmpty)
    }

    fn pick_random_top<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<ProbEntry, TargetingError> {
        for _ in 0..self.config.max_pick_retries.max(1) {
            let tier = self.tiers.top_tier().ok_or(TargetingError::AllTiersEmpty)?;
            if let Some(entry) = self.sample_tier(tier, rng)? {
                return Ok(entry);
            }
        }
        Err(TargetingError::RetriesExhausted)
    }

    fn pick_best_top(&mut self) -> Result<ProbEntry, TargetingError> {
        for _ in 0..self.config.max_pick_retries.max(1) {
            let tier = self.tiers.top_tier().ok_or(TargetingError::AllTiersEmpty)?;
            let members = self.tiers.members(tier).to_vec();
            let mut best: Option<ProbEntry> = None;
            let mut moved = false;
            for id in members {
                let top = self.peek_live(id)?;
                moved |= self.tiers.tier_of(id) != Some(tier);
                if let Some(entry) = top {
                    if best.map_or(true, |b| entry > b) {
                        best = Some(entry);
                    }
                }
            }
            // a stale purge reshuffled the tiers; the scan has to start over
            if !moved {
                return best.ok_or(TargetingError::AllTiersEmpty);
            }
        }
        Err(TargetingError::RetriesExhausted)
    }

    fn schedule_follow_ups(&mut self, row: usize, col: usize) -> usize {
        let (shots, grid) = (&self.shots, &self.grid);
        self.hunt
            .schedule_neighbors(row, col, GRID_SIZE, GRID_SIZE, |r, c| is_live(grid, shots, r, c))
    }

    /// Attribute `len` open hits through (row, col) to the ship just sunk.
    ///
    /// Uses the run of open hits along whichever axis is long enough, preferring
    /// an exact fit and then the horizontal axis.
    fn settle_sunk(&mut self, row: usize, col: usize, len: usize) {
        let len = len.max(1);
        let open = self.open_hits;
        let is_open = |r: usize, c: usize| open.contains(r, c).unwrap_or(false);
        let (h0, h1) = run_bounds(col, |k| is_open(row, k));
        let (v0, v1) = run_bounds(row, |k| is_open(k, col));
        let (h_len, v_len) = (h1 - h0 + 1, v1 - v0 + 1);

        let horizontal = match (h_len >= len, v_len >= len) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            (true, true) => Some(!(v_len == len && h_len != len)),
            (false, false) => None,
        };
        let cells: Vec<(usize, usize)> = match horizontal {
            Some(true) => window(h0, h1, col, len).map(|c| (row, c)).collect(),
            Some(false) => window(v0, v1, row, len).map(|r| (r, col)).collect(),
            None => {
                log::warn!(
                    "no run of {} open hits through ({}, {}); settling that cell only",
                    len,
                    row,
                    col
                );
                alloc::vec![(row, col)]
            }
        };
        for (r, c) in cells {
            let _ = self.open_hits.remove(r, c);
            self.shots.mark_sunk(r, c);
        }
    }

    /// After a sink, keep only follow-ups next to hits that are still open.
    fn prune_hunt(&mut self) {
        if self.open_hits.is_empty() {
            self.hunt.clear();
            return;
        }
        let open = self.open_hits;
        self.hunt.retain(|task| {
            let (row, col) = task.target();
            orthogonal(row, col).any(|(r, c)| open.contains(r, c).unwrap_or(false))
        });
    }
}

fn is_live(grid: &ProbabilityGrid, shots: &ShotGrid, row: usize, col: usize) -> bool {
    !shots.is_resolved(row, col) && grid.get(row, col).unwrap_or(0) > 0
}

fn live_entry(grid: &ProbabilityGrid, shots: &ShotGrid, row: usize, col: usize) -> Option<ProbEntry> {
    let prob = grid.get(row, col)?;
    is_live(grid, shots, row, col).then(|| ProbEntry::new(prob, row, col))
}

/// Inclusive extent of the open run through `pos` along one line.
fn run_bounds<F: Fn(usize) -> bool>(pos: usize, open: F) -> (usize, usize) {
    let mut lo = pos;
    while lo > 0 && open(lo - 1) {
        lo -= 1;
    }
    let mut hi = pos;
    while hi + 1 < GRID_SIZE && open(hi + 1) {
        hi += 1;
    }
    (lo, hi)
}

/// `len` consecutive positions inside [lo, hi] that include `pos`.
/// Requires `hi - lo + 1 >= len`.
fn window(lo: usize, hi: usize, pos: usize, len: usize) -> core::ops::Range<usize> {
    let start = pos.saturating_sub(len - 1).max(lo).min(hi + 1 - len);
    start..start + len
}

fn orthogonal(row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
    [
        (row.checked_sub(1), Some(col)),
        (row.checked_add(1), Some(col)),
        (Some(row), col.checked_sub(1)),
        (Some(row), col.checked_add(1)),
    ]
    .into_iter()
    .filter_map(|(r, c)| Some((r?, c?)))
    .filter(|&(r, c)| r < GRID_SIZE && c < GRID_SIZE)
}
