use std::collections::HashSet;

use battleship_targeting::{
    ship_lengths, AiPlayer, Board, GameEngine, GameStatus, GuessResult, Player, RiskPosture,
    TargetingConfig, TurnError, GRID_SIZE, SHIPS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn play(seed: u64, risk: RiskPosture) -> (GameEngine, AiPlayer) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let fleet = ship_lengths();
    let config = TargetingConfig::for_fleet(&fleet).with_risk(risk);
    let mut player = AiPlayer::new(config, &fleet).unwrap();
    let mut engine = GameEngine::new(Board::new());
    player.place_ships(&mut rng, engine.target_mut()).unwrap();
    engine
        .play_out(&mut player, &mut rng, GRID_SIZE * GRID_SIZE)
        .unwrap();
    (engine, player)
}

#[test]
fn test_every_posture_finishes_games() {
    for risk in [RiskPosture::Normal, RiskPosture::High, RiskPosture::Extreme] {
        for seed in 0..10u64 {
            let (engine, player) = play(seed, risk);
            assert_eq!(engine.status(), GameStatus::Won);
            assert!(engine.shots_fired() <= GRID_SIZE * GRID_SIZE);

            let unique: HashSet<_> = engine.history().iter().map(|s| (s.row, s.col)).collect();
            assert_eq!(unique.len(), engine.shots_fired(), "duplicate shot with {:?}", risk);

            let sinks = engine
                .history()
                .iter()
                .filter(|s| matches!(s.result, GuessResult::Sink(_)))
                .count();
            assert_eq!(sinks, SHIPS.len());
            assert!(player.targeting().remaining_lengths().is_empty());
        }
    }
}

#[test]
fn test_bot_beats_blind_search() {
    // total shots over a batch of games stay well below firing at every cell
    let total: usize = (100..120u64)
        .map(|seed| play(seed, RiskPosture::Normal).0.shots_fired())
        .sum();
    assert!(total < 20 * 80, "averaged {} shots per game", total / 20);
}

#[test]
fn test_same_seed_same_game() {
    let (a, _) = play(42, RiskPosture::High);
    let (b, _) = play(42, RiskPosture::High);
    assert_eq!(a.history(), b.history());
}

#[test]
fn test_turn_limit() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut player = AiPlayer::standard().unwrap();
    let mut engine = GameEngine::new(Board::new());
    player.place_ships(&mut rng, engine.target_mut()).unwrap();
    assert_eq!(
        engine.play_out(&mut player, &mut rng, 5),
        Err(TurnError::TurnLimit(5))
    );
    assert_eq!(engine.shots_fired(), 5);
    assert_eq!(engine.status(), GameStatus::InProgress);
}
