//! Integration test: attrition law behaviour over many battles
//!
//! Every law must halt, stay within the initial strengths and stop exactly
//! when one side reaches its historical remainder.

use lanchester_abc::abc::distance;
use lanchester_abc::attrition::{simulate, simulate_all, simulate_traced, CasualtyPair};
use lanchester_abc::{AttritionLaw, Battle, BattleSet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn random_battle(rng: &mut ChaCha8Rng) -> Battle {
    let red_initial = rng.gen_range(1..200_000);
    let blue_initial = rng.gen_range(1..200_000);
    Battle::new(
        rng.gen_range(1600..1900),
        red_initial,
        rng.gen_range(1..=red_initial),
        blue_initial,
        rng.gen_range(1..=blue_initial),
    )
}

// =============================================================================
// Termination and bounds
// =============================================================================

#[test]
fn test_every_law_halts_within_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(1815);
    for _ in 0..300 {
        let battle = random_battle(&mut rng);
        let ratio: f64 = rng.gen_range(0.01..20.0);
        for law in AttritionLaw::ALL {
            let trace = simulate_traced(law, ratio, &battle, 0).unwrap();
            assert!(trace.casualties.red <= battle.red_initial);
            assert!(trace.casualties.blue <= battle.blue_initial);
            assert!(
                trace.num_steps() <= battle.red_casualties as usize,
                "{law} took {} steps for {battle}",
                trace.num_steps()
            );
        }
    }
}

#[test]
fn test_loop_stops_once_a_side_reaches_its_remainder() {
    let mut rng = ChaCha8Rng::seed_from_u64(1805);
    for _ in 0..200 {
        let battle = random_battle(&mut rng);
        let ratio: f64 = rng.gen_range(0.1..5.0);
        for law in AttritionLaw::ALL {
            let trace = simulate_traced(law, ratio, &battle, 0).unwrap();
            let last = trace.steps.last().unwrap();
            assert!(last.red <= battle.red_remaining() || last.blue <= battle.blue_remaining());
            for step in &trace.steps[..trace.steps.len() - 1] {
                assert!(step.red > battle.red_remaining() && step.blue > battle.blue_remaining());
            }
        }
    }
}

#[test]
fn test_extreme_ratios_stay_bounded() {
    let battle = Battle::new(1757, 40_000, 6_000, 65_000, 22_000);
    for ratio in [1e-12, 1e-3, 1e3, 1e9] {
        for law in AttritionLaw::ALL {
            let pair = simulate(law, ratio, &battle, 0).unwrap();
            assert!(pair.red <= battle.red_initial && pair.blue <= battle.blue_initial);
        }
    }
}

// =============================================================================
// Reference battle
// =============================================================================

#[test]
fn test_reference_battle_logarithmic() {
    let battle = Battle::new(1809, 1000, 200, 800, 100);
    let pair = simulate(AttritionLaw::Logarithmic, 1.5, &battle, 0).unwrap();
    assert_eq!(pair, CasualtyPair { red: 100, blue: 120 });

    let set = BattleSet::new(vec![battle]);
    let simulated = simulate_all(AttritionLaw::Logarithmic, &[1.5], set.battles()).unwrap();
    let d = distance(&simulated, set.historical()).unwrap();
    assert!((d - 0.7).abs() < 1e-12);

    let again = simulate_all(AttritionLaw::Logarithmic, &[1.5], set.battles()).unwrap();
    assert_eq!(simulated, again);
}

#[test]
fn test_stronger_red_fire_costs_blue_more() {
    let battle = Battle::new(1813, 100_000, 30_000, 100_000, 30_000);
    for law in AttritionLaw::ALL {
        let weak = simulate(law, 0.5, &battle, 0).unwrap();
        let strong = simulate(law, 2.0, &battle, 0).unwrap();
        assert!(strong.blue >= weak.blue, "{law}");
        assert!(strong.red <= weak.red, "{law}");
    }
}
