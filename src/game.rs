use alloc::vec::Vec;
use rand::rngs::SmallRng;

use crate::{
    board::Board,
    common::{GuessResult, TurnError},
    player::Player,
};

/// Current status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum GameStatus {
    InProgress,
    Won,
}

/// One shot fired by the player and what it struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotRecord {
    pub row: usize,
    pub col: usize,
    pub result: GuessResult,
}

/// One player firing at a fixed target board until its fleet is gone.
pub struct GameEngine {
    target: Board,
    history: Vec<ShotRecord>,
}

impl GameEngine {
    /// Engine shooting at an already populated board.
    pub fn new(target: Board) -> Self {
        Self {
            target,
            history: Vec::new(),
        }
    }

    pub fn target(&self) -> &Board {
        &self.target
    }

    /// Mutable reference to the target board for ship placement.
    pub fn target_mut(&mut self) -> &mut Board {
        &mut self.target
    }

    pub fn history(&self) -> &[ShotRecord] {
        &self.history
    }

    pub fn shots_fired(&self) -> usize {
        self.history.len()
    }

    /// Evaluate the current game status.
    pub fn status(&self) -> GameStatus {
        if self.target.all_sunk() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    /// Select, fire and report back a single shot.
    pub fn play_turn(
        &mut self,
        player: &mut dyn Player,
        rng: &mut SmallRng,
    ) -> Result<ShotRecord, TurnError> {
        let (row, col) = player.select_target(rng)?;
        let result = self.target.fire(row, col)?;
        player.handle_guess_result((row, col), result)?;
        let record = ShotRecord { row, col, result };
        self.history.push(record);
        Ok(record)
    }

    /// Play until the target fleet is sunk, giving up after `max_turns`.
    /// Returns the number of shots fired.
    pub fn play_out(
        &mut self,
        player: &mut dyn Player,
        rng: &mut SmallRng,
        max_turns: usize,
    ) -> Result<usize, TurnError> {
        while self.status() == GameStatus::InProgress {
            if self.shots_fired() >= max_turns {
                return Err(TurnError::TurnLimit(max_turns));
            }
            self.play_turn(player, rng)?;
        }
        Ok(self.shots_fired())
    }
}
