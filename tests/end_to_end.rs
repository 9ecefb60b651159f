use std::collections::HashSet;

use battleship_targeting::{
    Board, GuessResult, HuntState, Orientation, RiskPosture, ShipType, Targeting,
    TargetingConfig,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const DESTROYER: ShipType = ShipType::new("Destroyer", 3);

#[test]
fn single_ship_is_found_and_sunk_within_twenty_shots() {
    let mut board = Board::with_fleet(&[DESTROYER]);
    board.place(0, 4, 2, Orientation::Horizontal).unwrap();
    let fleet = board.fleet_lengths();
    let config = TargetingConfig::for_fleet(&fleet).with_risk(RiskPosture::Extreme);
    let mut t = Targeting::new(config, &fleet).unwrap();
    let mut rng = SmallRng::seed_from_u64(0);

    let mut fired = HashSet::new();
    let mut hits = 0;
    let mut idle_transitions = 0;
    for _ in 0..20 {
        let before = t.hunt_state();
        let (r, c) = t.choose_target(&mut rng).unwrap();
        assert!(fired.insert((r, c)), "({}, {}) chosen twice", r, c);
        let result = board.fire(r, c).unwrap();
        t.notify_result(r, c, result).unwrap();

        match result {
            GuessResult::Miss => {
                if hits == 0 {
                    assert_eq!(t.hunt_state(), HuntState::Idle);
                }
            }
            GuessResult::Hit => {
                hits += 1;
                assert_eq!(t.hunt_state(), HuntState::Hunting);
            }
            GuessResult::Sink(ship) => {
                hits += 1;
                assert_eq!(ship, DESTROYER);
                assert_eq!(hits, 3);
                assert_eq!(t.hunt_state(), HuntState::Idle);
            }
        }
        if before == HuntState::Hunting && t.hunt_state() == HuntState::Idle {
            idle_transitions += 1;
        }
        if board.all_sunk() {
            break;
        }
    }

    assert!(board.all_sunk(), "ship still afloat after 20 shots");
    assert_eq!(hits, 3);
    assert_eq!(idle_transitions, 1);
    assert!(t.remaining_lengths().is_empty());
    assert_eq!(t.shots().sunk().len(), 3);
}

#[test]
fn randomised_postures_sink_the_ship_and_go_idle_once() {
    for risk in [RiskPosture::Normal, RiskPosture::High] {
        for seed in 0..20u64 {
            let mut board = Board::with_fleet(&[DESTROYER]);
            board.place(0, 4, 2, Orientation::Horizontal).unwrap();
            let fleet = board.fleet_lengths();
            let config = TargetingConfig::for_fleet(&fleet).with_risk(risk);
            let mut t = Targeting::new(config, &fleet).unwrap();
            let mut rng = SmallRng::seed_from_u64(seed);

            let mut fired = HashSet::new();
            let mut hits = 0;
            let mut idle_transitions = 0;
            for _ in 0..100 {
                let before = t.hunt_state();
                let (r, c) = t.choose_target(&mut rng).unwrap();
                assert!(
                    fired.insert((r, c)),
                    "{:?}/{}: ({}, {}) chosen twice",
                    risk,
                    seed,
                    r,
                    c
                );
                let result = board.fire(r, c).unwrap();
                t.notify_result(r, c, result).unwrap();

                match result {
                    GuessResult::Miss => {}
                    GuessResult::Hit => hits += 1,
                    GuessResult::Sink(_) => {
                        hits += 1;
                        assert_eq!(t.hunt_state(), HuntState::Idle);
                    }
                }
                if before == HuntState::Hunting && t.hunt_state() == HuntState::Idle {
                    idle_transitions += 1;
                    assert!(
                        matches!(result, GuessResult::Sink(_)),
                        "{:?}/{}: idle before the sink",
                        risk,
                        seed
                    );
                }
                if board.all_sunk() {
                    break;
                }
            }

            assert!(board.all_sunk(), "{:?}/{}: ship still afloat after 100 shots", risk, seed);
            assert_eq!(hits, 3);
            assert_eq!(idle_transitions, 1, "{:?}/{}", risk, seed);
            assert!(t.remaining_lengths().is_empty());
        }
    }
}

#[test]
fn extreme_posture_is_deterministic() {
    let fleet = [3];
    let config = TargetingConfig::for_fleet(&fleet).with_risk(RiskPosture::Extreme);
    let mut a = Targeting::new(config, &fleet).unwrap();
    let mut b = Targeting::new(config, &fleet).unwrap();
    let mut rng_a = SmallRng::seed_from_u64(1);
    let mut rng_b = SmallRng::seed_from_u64(2);
    for _ in 0..15 {
        let pick = a.choose_target(&mut rng_a).unwrap();
        assert_eq!(pick, b.choose_target(&mut rng_b).unwrap());
        a.notify_result(pick.0, pick.1, GuessResult::Miss).unwrap();
        b.notify_result(pick.0, pick.1, GuessResult::Miss).unwrap();
    }
}

#[test]
fn corner_hit_queues_two_follow_ups() {
    let fleet = [2, 3, 4, 5];
    let mut t = Targeting::new(TargetingConfig::for_fleet(&fleet), &fleet).unwrap();
    t.notify_result(0, 0, GuessResult::Hit).unwrap();
    let queued: Vec<_> = t.hunt().iter().map(|task| task.target()).collect();
    assert_eq!(queued, vec![(0, 1), (1, 0)]);

    let mut rng = SmallRng::seed_from_u64(9);
    assert_eq!(t.choose_target(&mut rng).unwrap(), (0, 1));
}

#[test]
fn sink_keeps_follow_ups_of_the_other_ship() {
    let submarine = ShipType::new("Submarine", 2);
    let fleet = [2, 3];
    let mut t = Targeting::new(TargetingConfig::for_fleet(&fleet), &fleet).unwrap();

    // submarine on (0,0)-(0,1), destroyer on (1,0)-(1,2)
    t.notify_result(1, 0, GuessResult::Hit).unwrap();
    t.notify_result(0, 0, GuessResult::Hit).unwrap();
    t.notify_result(0, 1, GuessResult::Sink(submarine)).unwrap();

    assert_eq!(t.remaining_lengths(), &[3]);
    assert_eq!(t.hunt_state(), HuntState::Hunting);
    assert!(t.open_hits().contains(1, 0).unwrap());
    assert!(t.shots().sunk().contains(0, 0).unwrap());
    assert!(t.shots().sunk().contains(0, 1).unwrap());
    for task in t.hunt().iter() {
        let (r, c) = task.target();
        assert_eq!(r.abs_diff(1) + c.abs_diff(0), 1, "({}, {}) is not next to (1, 0)", r, c);
    }

    let mut rng = SmallRng::seed_from_u64(4);
    assert_eq!(t.choose_target(&mut rng).unwrap(), (1, 1));
}

#[test]
fn sink_with_no_open_hits_clears_the_hunt() {
    let submarine = ShipType::new("Submarine", 2);
    let fleet = [2, 3];
    let mut t = Targeting::new(TargetingConfig::for_fleet(&fleet), &fleet).unwrap();
    t.notify_result(5, 5, GuessResult::Hit).unwrap();
    assert_eq!(t.hunt().len(), 4);
    t.notify_result(5, 6, GuessResult::Sink(submarine)).unwrap();
    assert_eq!(t.hunt_state(), HuntState::Idle);
    assert!(t.open_hits().is_empty());
    // the sunk cells block the remaining destroyer on row 5
    assert_eq!(t.probability(5, 4), Some(1 + 3));
    assert_eq!(t.probability(5, 7), Some(1 + 3));
    assert_eq!(t.probability(5, 6), Some(0));
}
