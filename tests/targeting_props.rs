use std::collections::HashSet;

use battleship_targeting::{
    ship_lengths, Board, GameEngine, GameStatus, GridView, Player, RegionId, RiskPosture,
    Targeting, TargetingConfig, TargetingError, AiPlayer, GRID_SIZE,
};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Compares the incremental state against a from-scratch scan.
fn check_invariants(t: &Targeting) -> Result<(), TestCaseError> {
    let shots = t.shots();
    for r in 0..GRID_SIZE {
        for c in 0..GRID_SIZE {
            if shots.is_resolved(r, c) {
                prop_assert_eq!(t.probability(r, c), Some(0), "resolved cell ({}, {})", r, c);
            }
        }
    }

    let layout = t.layout();
    let thresholds = t.config().thresholds;
    for idx in 0..layout.region_count() {
        let id = RegionId::new(idx);
        let scanned = layout
            .cells(id)
            .filter(|&(r, c)| !shots.is_resolved(r, c))
            .filter_map(|(r, c)| t.probability(r, c))
            .filter(|&p| p > 0)
            .max();
        let top = t.region_top(id);
        prop_assert_eq!(top.map(|e| e.prob), scanned, "region {}", idx);
        if let Some(top) = top {
            prop_assert_eq!(layout.region_of(top.row, top.col), Some(id));
        }
        prop_assert_eq!(
            t.tiers().tier_of(id),
            thresholds.classify(scanned.unwrap_or(0)),
            "region {} sits in the wrong tier",
            idx
        );
    }
    prop_assert!(t.tiers().check_consistency().is_ok());
    Ok(())
}

fn posture() -> impl Strategy<Value = RiskPosture> {
    prop_oneof![
        Just(RiskPosture::Normal),
        Just(RiskPosture::High),
        Just(RiskPosture::Extreme),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn invariants_hold_after_every_shot(
        seed in any::<u64>(),
        risk in posture(),
        region_rows in 1usize..5,
        region_cols in 1usize..5,
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let fleet = ship_lengths();
        let config = TargetingConfig::for_fleet(&fleet)
            .with_risk(risk)
            .with_region_size(region_rows, region_cols);
        let mut player = AiPlayer::new(config, &fleet).unwrap();
        let mut engine = GameEngine::new(Board::new());
        player.place_ships(&mut rng, engine.target_mut()).unwrap();
        check_invariants(player.targeting())?;

        let mut fired = HashSet::new();
        while engine.status() == GameStatus::InProgress {
            prop_assert!(engine.shots_fired() < GRID_SIZE * GRID_SIZE);
            let shot = engine.play_turn(&mut player, &mut rng).unwrap();
            prop_assert!(fired.insert((shot.row, shot.col)), "duplicate target {:?}", shot);
            check_invariants(player.targeting())?;
        }
        prop_assert!(player.targeting().remaining_lengths().is_empty());
    }
}

fn played(seed: u64, shots: usize) -> (Targeting, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let fleet = ship_lengths();
    let mut board = Board::new();
    board.place_randomly(&mut rng).unwrap();
    let mut t = Targeting::new(TargetingConfig::for_fleet(&fleet), &fleet).unwrap();
    for _ in 0..shots {
        let (r, c) = t.choose_target(&mut rng).unwrap();
        let result = board.fire(r, c).unwrap();
        t.notify_result(r, c, result).unwrap();
    }
    (t, rng)
}

fn region_tops(t: &Targeting) -> Vec<Option<u32>> {
    (0..t.layout().region_count())
        .map(|i| t.region_top(RegionId::new(i)).map(|e| e.prob))
        .collect()
}

#[test]
fn repeated_refresh_is_idempotent() {
    for seed in [3u64, 17, 99] {
        let (mut t, _) = played(seed, 12);
        let before = region_tops(&t);
        let tiers_before: Vec<_> = (0..t.layout().region_count())
            .map(|i| t.tiers().tier_of(RegionId::new(i)))
            .collect();
        let last = t.shots().misses().cells().last().unwrap_or((0, 0));

        t.refresh_around(last.0, last.1).unwrap();
        let once = region_tops(&t);
        t.refresh_around(last.0, last.1).unwrap();
        assert_eq!(once, before);
        assert_eq!(region_tops(&t), once);
        let tiers_after: Vec<_> = (0..t.layout().region_count())
            .map(|i| t.tiers().tier_of(RegionId::new(i)))
            .collect();
        assert_eq!(tiers_after, tiers_before);
    }
}

#[test]
fn duplicate_notification_is_rejected_without_change() {
    let (mut t, _) = played(5, 6);
    let (r, c) = t.shots().misses().cells().next().unwrap();
    let before = region_tops(&t);
    let shots_before = *t.shots();
    assert_eq!(
        t.notify_result(r, c, battleship_targeting::GuessResult::Miss),
        Err(TargetingError::AlreadyRecorded { row: r, col: c })
    );
    assert_eq!(
        t.notify_result(GRID_SIZE, 0, battleship_targeting::GuessResult::Miss),
        Err(TargetingError::OutOfBounds { row: GRID_SIZE, col: 0 })
    );
    assert_eq!(*t.shots(), shots_before);
    assert_eq!(region_tops(&t), before);
    assert!(t.refresh_around(0, GRID_SIZE).is_err());
}

#[test]
fn reset_restores_the_opening_state() {
    let fleet = ship_lengths();
    let fresh = Targeting::new(TargetingConfig::for_fleet(&fleet), &fleet).unwrap();
    let (mut t, _) = played(11, 30);
    assert!(t.shots().shots() == 30);
    t.reset();
    assert_eq!(t.shots().shots(), 0);
    assert_eq!(t.remaining_lengths(), fleet.as_slice());
    assert_eq!(t.grid(), fresh.grid());
    assert_eq!(region_tops(&t), region_tops(&fresh));
    assert!(t.hunt().is_empty());
}

#[test]
fn invalid_configuration_is_rejected() {
    let fleet = ship_lengths();
    let bad_region = TargetingConfig::for_fleet(&fleet).with_region_size(0, 3);
    assert!(matches!(
        Targeting::new(bad_region, &fleet),
        Err(TargetingError::InvalidRegionSize { .. })
    ));
    let mut bad_tiers = TargetingConfig::for_fleet(&fleet);
    bad_tiers.thresholds.high = bad_tiers.thresholds.average;
    assert!(matches!(
        Targeting::new(bad_tiers, &fleet),
        Err(TargetingError::InvalidThresholds { .. })
    ));
}

#[test]
fn unplaceable_ship_lengths_are_rejected() {
    let huge = [3, usize::MAX];
    assert!(matches!(
        Targeting::new(TargetingConfig::for_fleet(&huge), &huge),
        Err(TargetingError::InvalidShipLength(usize::MAX))
    ));
    let empty = [0, 3];
    assert!(matches!(
        Targeting::new(TargetingConfig::for_fleet(&empty), &empty),
        Err(TargetingError::InvalidShipLength(0))
    ));
    let too_long = [GRID_SIZE + 1];
    assert!(matches!(
        Targeting::new(TargetingConfig::for_fleet(&too_long), &too_long),
        Err(TargetingError::InvalidShipLength(len)) if len == GRID_SIZE + 1
    ));

    // the longest placeable ship still plays
    let full = [GRID_SIZE];
    let mut t = Targeting::new(TargetingConfig::for_fleet(&full), &full).unwrap();
    t.notify_result(4, 4, battleship_targeting::GuessResult::Miss).unwrap();
    assert_eq!(t.probability(4, 4), Some(0));
}

#[test]
fn exhausted_grid_reports_no_targets() {
    let fleet = [2];
    let mut t = Targeting::new(TargetingConfig::for_fleet(&fleet), &fleet).unwrap();
    let mut rng = SmallRng::seed_from_u64(1);
    for _ in 0..GRID_SIZE * GRID_SIZE {
        let (r, c) = t.choose_target(&mut rng).unwrap();
        t.notify_result(r, c, battleship_targeting::GuessResult::Miss).unwrap();
    }
    assert_eq!(t.choose_target(&mut rng), Err(TargetingError::NoTargetsRemain));
}
