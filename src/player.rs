use alloc::vec::Vec;
use rand::rngs::SmallRng;

use crate::{
    board::Board,
    common::{BoardError, GuessResult, TargetingError},
    config::{ship_lengths, TargetingConfig},
    targeting::Targeting,
};

/// Interface implemented by different player types.
pub trait Player {
    /// Place all ships onto the provided board.
    fn place_ships(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError>;

    /// Choose the next cell to fire at on the opponent grid.
    fn select_target(&mut self, rng: &mut SmallRng) -> Result<(usize, usize), TargetingError>;

    /// Inform the player of the result of its last guess.
    fn handle_guess_result(
        &mut self,
        _coord: (usize, usize),
        _result: GuessResult,
    ) -> Result<(), TargetingError> {
        Ok(())
    }
}

/// Bot player driven by the probabilistic targeting engine.
pub struct AiPlayer {
    targeting: Targeting,
}

impl AiPlayer {
    /// Bot hunting a fleet with the given ship lengths.
    pub fn new(config: TargetingConfig, fleet: &[usize]) -> Result<Self, TargetingError> {
        Ok(Self {
            targeting: Targeting::new(config, fleet)?,
        })
    }

    /// Bot with default settings against the standard fleet.
    pub fn standard() -> Result<Self, TargetingError> {
        let fleet: Vec<usize> = ship_lengths();
        Self::new(TargetingConfig::for_fleet(&fleet), &fleet)
    }

    pub fn targeting(&self) -> &Targeting {
        &self.targeting
    }

    pub fn targeting_mut(&mut self) -> &mut Targeting {
        &mut self.targeting
    }
}

impl Player for AiPlayer {
    fn place_ships(&mut self, rng: &mut SmallRng, board: &mut Board) -> Result<(), BoardError> {
        board.place_randomly(rng)
    }

    fn select_target(&mut self, rng: &mut SmallRng) -> Result<(usize, usize), TargetingError> {
        self.targeting.choose_target(rng)
    }

    fn handle_guess_result(
        &mut self,
        coord: (usize, usize),
        result: GuessResult,
    ) -> Result<(), TargetingError> {
        self.targeting.notify_result(coord.0, coord.1, result)
    }
}
