//! Low / average / high buckets of region heaps, keyed by each region's
//! current maximum probability.

use alloc::vec::Vec;
use rand::Rng;

use crate::common::TargetingError;
use crate::config::{GRID_SIZE, LOWPROB_BASE};
use crate::region::RegionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Low,
    Average,
    High,
}

impl Tier {
    pub const COUNT: usize = 3;

    /// Best tier first.
    pub const SEARCH_ORDER: [Tier; Tier::COUNT] = [Tier::High, Tier::Average, Tier::Low];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Round-robin successor: low, average, high, then low again.
    pub fn next(self) -> Tier {
        match self {
            Tier::Low => Tier::Average,
            Tier::Average => Tier::High,
            Tier::High => Tier::Low,
        }
    }
}

/// Lower bounds of the average and high tiers. The low tier starts at
/// [`LOWPROB_BASE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct TierThresholds {
    pub average: u32,
    pub high: u32,
}

impl TierThresholds {
    pub fn new(average: u32, high: u32) -> Result<Self, TargetingError> {
        let t = TierThresholds { average, high };
        t.validate()?;
        Ok(t)
    }

    /// Thresholds at a third and two thirds of the peak fit count a cell can
    /// reach on an empty grid with this fleet.
    pub fn for_fleet(lengths: &[usize]) -> Self {
        let peak: u32 = lengths
            .iter()
            .filter(|&&len| len > 0 && len <= GRID_SIZE)
            .map(|&len| 2 * len as u32)
            .sum();
        let average = (peak / 3).max(LOWPROB_BASE + 1);
        let high = (peak * 2 / 3).max(average + 1);
        TierThresholds { average, high }
    }

    pub fn validate(&self) -> Result<(), TargetingError> {
        if self.average <= LOWPROB_BASE || self.high <= self.average {
            return Err(TargetingError::InvalidThresholds {
                average: self.average,
                high: self.high,
            });
        }
        Ok(())
    }

    /// Tier whose range holds `prob`; `None` below the low base.
    pub fn classify(&self, prob: u32) -> Option<Tier> {
        if prob >= self.high {
            Some(Tier::High)
        } else if prob >= self.average {
            Some(Tier::Average)
        } else if prob >= LOWPROB_BASE {
            Some(Tier::Low)
        } else {
            None
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self::for_fleet(&crate::config::ship_lengths())
    }
}

/// Tier membership of every region heap.
///
/// Each tier is an unordered list of region ids; `slots` maps a region to its
/// tier and position so removal is a swap-remove instead of a search.
#[derive(Debug, Clone)]
pub struct TierClassifier {
    members: [Vec<RegionId>; Tier::COUNT],
    slots: Vec<Option<(Tier, usize)>>,
}

impl TierClassifier {
    pub fn new(region_count: usize) -> Self {
        TierClassifier {
            members: [Vec::new(), Vec::new(), Vec::new()],
            slots: alloc::vec![None; region_count],
        }
    }

    pub fn region_count(&self) -> usize {
        self.slots.len()
    }

    pub fn members(&self, tier: Tier) -> &[RegionId] {
        &self.members[tier.index()]
    }

    pub fn len(&self, tier: Tier) -> usize {
        self.members[tier.index()].len()
    }

    pub fn is_empty(&self, tier: Tier) -> bool {
        self.members[tier.index()].is_empty()
    }

    pub fn all_empty(&self) -> bool {
        self.members.iter().all(Vec::is_empty)
    }

    pub fn tier_of(&self, id: RegionId) -> Option<Tier> {
        self.slots.get(id.index()).copied().flatten().map(|(t, _)| t)
    }

    /// First non-empty tier in [`Tier::SEARCH_ORDER`].
    pub fn top_tier(&self) -> Option<Tier> {
        Tier::SEARCH_ORDER.into_iter().find(|&t| !self.is_empty(t))
    }

    /// Uniformly random member of `tier`.
    pub fn pick<R: Rng + ?Sized>(&self, tier: Tier, rng: &mut R) -> Option<RegionId> {
        let list = &self.members[tier.index()];
        if list.is_empty() {
            return None;
        }
        Some(list[rng.random_range(0..list.len())])
    }

    /// Moves `id` into `target` (or out of every tier for `None`).
    /// Returns `true` when membership changed.
    pub fn relocate(&mut self, id: RegionId, target: Option<Tier>) -> Result<bool, TargetingError> {
        let current = self
            .slots
            .get(id.index())
            .ok_or(TargetingError::InvalidRegion(id.index()))?
            .map(|(t, _)| t);
        if current == target {
            return Ok(false);
        }
        self.remove(id)?;
        if let Some(tier) = target {
            let list = &mut self.members[tier.index()];
            list.push(id);
            self.slots[id.index()] = Some((tier, list.len() - 1));
        }
        Ok(true)
    }

    /// Takes `id` out of its tier, returning the tier it was in.
    pub fn remove(&mut self, id: RegionId) -> Result<Option<Tier>, TargetingError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(TargetingError::InvalidRegion(id.index()))?;
        let Some((tier, pos)) = *slot else {
            return Ok(None);
        };
        let list = &mut self.members[tier.index()];
        if list.get(pos) != Some(&id) {
            return Err(TargetingError::RegionNotTiered(id));
        }
        *slot = None;
        list.swap_remove(pos);
        if let Some(&moved) = list.get(pos) {
            self.slots[moved.index()] = Some((tier, pos));
        }
        Ok(Some(tier))
    }

    pub fn clear(&mut self) {
        self.members.iter_mut().for_each(Vec::clear);
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    /// Verifies that every listed region points back at its list position and
    /// that no region is listed twice.
    pub fn check_consistency(&self) -> Result<(), TargetingError> {
        for tier in Tier::SEARCH_ORDER {
            for (pos, &id) in self.members[tier.index()].iter().enumerate() {
                match self.slots.get(id.index()) {
                    Some(Some((t, p))) if *t == tier && *p == pos => {}
                    Some(_) => return Err(TargetingError::RegionNotTiered(id)),
                    None => return Err(TargetingError::InvalidRegion(id.index())),
                }
            }
        }
        for (idx, slot) in self.slots.iter().enumerate() {
            if let Some((tier, pos)) = slot {
                let id = RegionId::new(idx);
                if self.members[tier.index()].get(*pos) != Some(&id) {
                    return Err(TargetingError::RegionNotTiered(id));
                }
            }
        }
        Ok(())
    }
}
